use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to get any output out of an external utility.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0} is not installed")]
    NotInstalled(String),

    #[error("{0} could not be executed: permission denied")]
    PermissionDenied(String),

    #[error("{tool} timed out after {secs}s")]
    TimedOut { tool: String, secs: u64 },

    #[error("{tool} failed: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },
}

impl ToolError {
    pub fn tool(&self) -> &str {
        match self {
            ToolError::NotInstalled(t) | ToolError::PermissionDenied(t) => t,
            ToolError::TimedOut { tool, .. } | ToolError::Io { tool, .. } => tool,
        }
    }

    pub(crate) fn from_io(tool: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound         => ToolError::NotInstalled(tool.to_string()),
            io::ErrorKind::PermissionDenied => ToolError::PermissionDenied(tool.to_string()),
            _ => ToolError::Io { tool: tool.to_string(), source: err },
        }
    }
}

/// Why a disk could not be benchmarked.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("no writable mounted filesystem")]
    NoWritableMount,

    #[error("only {free} bytes free on {}, need {needed}", mount.display())]
    InsufficientSpace { mount: PathBuf, free: u64, needed: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_kinds_map_to_variants() {
        let e = ToolError::from_io("smartctl", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(e, ToolError::NotInstalled(ref t) if t == "smartctl"));

        let e = ToolError::from_io("dmidecode", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(e, ToolError::PermissionDenied(_)));

        let e = ToolError::from_io("mdadm", io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(matches!(e, ToolError::Io { .. }));
        assert_eq!(e.tool(), "mdadm");
    }

    #[test]
    fn messages_name_the_tool() {
        let e = ToolError::TimedOut { tool: "smartctl".into(), secs: 30 };
        assert_eq!(e.to_string(), "smartctl timed out after 30s");
    }
}
