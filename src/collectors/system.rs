use super::tool;
use crate::error::ToolError;
use nix::unistd::Uid;
use std::fs;
use std::time::Duration;
use tracing::debug;

/// Run `dmidecode -t memory`.
pub fn read_dmi_memory(timeout: Duration) -> Result<String, ToolError> {
    let out = tool::run("dmidecode", &["-t", "memory"], timeout)?;
    Ok(out.text())
}

pub fn read_meminfo() -> Option<String> {
    read_proc("/proc/meminfo")
}

pub fn read_cpuinfo() -> Option<String> {
    read_proc("/proc/cpuinfo")
}

fn read_proc(path: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            debug!(path, error = %e, "unreadable");
            None
        }
    }
}

/// Effective UID 0. SMART and DMI reads need it on most systems.
pub fn is_root() -> bool {
    Uid::effective().is_root()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_check_follows_effective_uid() {
        // "Uid:\treal\teffective\tsaved\tfs"
        let status = fs::read_to_string("/proc/self/status").unwrap();
        let euid: u32 = status
            .lines()
            .find_map(|l| l.strip_prefix("Uid:"))
            .and_then(|rest| rest.split_whitespace().nth(1))
            .and_then(|v| v.parse().ok())
            .unwrap();
        assert_eq!(is_root(), euid == 0);
    }
}
