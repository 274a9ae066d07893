use crate::error::ToolError;
use process_control::{ChildExt, Control};
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::debug;

/// Captured output of one utility run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout:  String,
    pub stderr:  String,
    pub success: bool,
}

impl ToolOutput {
    /// stdout followed by stderr. Restriction messages land on either stream
    /// depending on the tool, so the extractor sees both.
    pub fn text(&self) -> String {
        if self.stderr.trim().is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Run `program args..` and wait at most `timeout`. A process still running
/// at the deadline is killed and reported as `TimedOut`.
///
/// A non-zero exit is not an error: smartctl encodes disk state in its exit
/// bits and still prints a full dump.
///
/// Children run under the C locale so numbers keep `,` as the thousands
/// separator whatever the caller's locale is.
pub fn run(program: &str, args: &[&str], timeout: Duration) -> Result<ToolOutput, ToolError> {
    debug!(program, ?args, "running");

    let child = Command::new(program)
        .args(args)
        .env("LC_ALL", "C")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ToolError::from_io(program, e))?;

    let output = child
        .controlled_with_output()
        .time_limit(timeout)
        .terminate_for_timeout()
        .wait()
        .map_err(|e| ToolError::from_io(program, e))?
        .ok_or_else(|| ToolError::TimedOut { tool: program.to_string(), secs: timeout.as_secs() })?;

    debug!(program, status = ?output.status.code(), "finished");
    Ok(ToolOutput {
        stdout:  String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr:  String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_not_installed() {
        let err = run("hwcheck-no-such-tool", &[], Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ToolError::NotInstalled(_)));
    }

    #[test]
    fn captures_both_streams() {
        let out = run("sh", &["-c", "echo out; echo err >&2; exit 3"], Duration::from_secs(5)).unwrap();
        assert!(!out.success);
        assert_eq!(out.stdout.trim(), "out");
        assert!(out.text().contains("err"));
    }

    #[test]
    fn children_run_in_c_locale() {
        let out = run("sh", &["-c", "echo \"$LC_ALL\""], Duration::from_secs(5)).unwrap();
        assert_eq!(out.stdout.trim(), "C");
    }

    #[test]
    fn slow_tool_times_out() {
        let err = run("sleep", &["5"], Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, ToolError::TimedOut { .. }));
    }
}
