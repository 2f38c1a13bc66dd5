//! Engine configuration: the proc root and the counter-file paths derived from it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default root of the proc filesystem.
pub const DEFAULT_PROC_PATH: &str = "/proc";

/// Option key recognized in a plugin option map.
pub const PROC_PATH_OPTION: &str = "proc_path";

/// Options understood by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UseConfig {
    /// Root directory holding `stat`, `loadavg`, `diskstats`, `meminfo` and `vmstat`.
    pub proc_path: PathBuf,
}

impl Default for UseConfig {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from(DEFAULT_PROC_PATH),
        }
    }
}

impl UseConfig {
    pub fn new(proc_path: impl Into<PathBuf>) -> Self {
        Self {
            proc_path: proc_path.into(),
        }
    }

    /// Reads `proc_path` from a key/value option map, defaulting to `/proc`.
    pub fn from_options(options: &HashMap<String, String>) -> Self {
        match options.get(PROC_PATH_OPTION) {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }

    pub fn paths(&self) -> ProcPaths {
        ProcPaths::from_root(&self.proc_path)
    }
}

/// Counter-file paths resolved once from the proc root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcPaths {
    pub root: PathBuf,
    pub stat: PathBuf,
    pub loadavg: PathBuf,
    pub diskstats: PathBuf,
    pub meminfo: PathBuf,
    pub vmstat: PathBuf,
}

impl ProcPaths {
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            root: root.to_path_buf(),
            stat: root.join("stat"),
            loadavg: root.join("loadavg"),
            diskstats: root.join("diskstats"),
            meminfo: root.join("meminfo"),
            vmstat: root.join("vmstat"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let paths = UseConfig::default().paths();
        assert_eq!(paths.stat, Path::new("/proc/stat"));
        assert_eq!(paths.loadavg, Path::new("/proc/loadavg"));
        assert_eq!(paths.diskstats, Path::new("/proc/diskstats"));
        assert_eq!(paths.meminfo, Path::new("/proc/meminfo"));
        assert_eq!(paths.vmstat, Path::new("/proc/vmstat"));
    }

    #[test]
    fn test_from_options() {
        let mut options = HashMap::new();
        assert_eq!(UseConfig::from_options(&options), UseConfig::default());

        options.insert("proc_path".to_string(), "/host/proc".to_string());
        let paths = UseConfig::from_options(&options).paths();
        assert_eq!(paths.root, Path::new("/host/proc"));
        assert_eq!(paths.meminfo, Path::new("/host/proc/meminfo"));
    }

    #[test]
    fn test_deserialize_with_default() {
        let config: UseConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, UseConfig::default());

        let config: UseConfig = serde_json::from_str(r#"{"proc_path": "/tmp/proc"}"#).unwrap();
        assert_eq!(config.proc_path, Path::new("/tmp/proc"));
    }
}
