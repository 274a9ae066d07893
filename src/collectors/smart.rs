use super::tool;
use crate::error::ToolError;
use std::time::Duration;

/// Run `smartctl -a <path>` and return the combined text dump.
///
/// smartctl sets exit bits for failing disks and for its own open errors
/// alike, so the status is ignored and the text decides.
pub fn read_smart(path: &str, timeout: Duration) -> Result<String, ToolError> {
    let out = tool::run("smartctl", &["-a", path], timeout)?;
    Ok(out.text())
}
