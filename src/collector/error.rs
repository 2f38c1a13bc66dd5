//! Error type shared by the readers, calculators and the router.

use std::io;
use std::path::PathBuf;

/// Error type for collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// Counter file missing or unreadable.
    Read { path: PathBuf, source: io::Error },
    /// Malformed numeric field or missing expected key.
    Parse(String),
    /// Requested block device has no line in diskstats.
    DeviceNotFound(String),
    /// Metric identifier matches no known domain/operation.
    UnknownMetric(String),
    /// `MemTotal` in meminfo is zero or negative.
    InvalidMemTotal(i64),
    /// Two-point sampler driven out of order.
    Sampling(String),
}

impl CollectError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CollectError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        CollectError::Parse(msg.into())
    }
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Read { path, source } => {
                write!(f, "unable to read {}: {}", path.display(), source)
            }
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
            CollectError::DeviceNotFound(name) => write!(f, "device not found: {}", name),
            CollectError::UnknownMetric(ns) => write!(f, "unrecognized metric identifier {}", ns),
            CollectError::InvalidMemTotal(total) => {
                write!(f, "total memory must be positive, got {}", total)
            }
            CollectError::Sampling(msg) => write!(f, "sampling error: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_path() {
        let err = CollectError::read(
            "/proc/stat",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/proc/stat"));
        assert!(msg.contains("no such file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_device_not_found_names_device() {
        let err = CollectError::DeviceNotFound("sdz".to_string());
        assert_eq!(err.to_string(), "device not found: sdz");
    }
}
