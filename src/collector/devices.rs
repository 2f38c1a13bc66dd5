//! Block device enumeration.
//!
//! The storage catalog needs the list of block devices on the host. The
//! default enumerator runs `lsblk`; tests substitute a fixed list.

use std::process::Command;

use tracing::{debug, warn};

/// Source of block device names.
pub trait DeviceEnumerator: Send + Sync {
    /// Lists device names. An enumerator that cannot list anything returns
    /// an empty vector rather than failing.
    fn list_devices(&self) -> Vec<String>;
}

/// Lists whole-disk devices with `lsblk -d --noheadings --list -o NAME`.
#[derive(Debug, Clone)]
pub struct LsblkEnumerator {
    program: String,
    args: Vec<String>,
}

impl Default for LsblkEnumerator {
    fn default() -> Self {
        Self {
            program: "lsblk".to_string(),
            args: ["-d", "--noheadings", "--list", "-o", "NAME"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl LsblkEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a different listing command that prints one device per line.
    pub fn with_command(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl DeviceEnumerator for LsblkEnumerator {
    fn list_devices(&self) -> Vec<String> {
        let output = match Command::new(&self.program).args(&self.args).output() {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to run {}: {}", self.program, e);
                return Vec::new();
            }
        };
        if !output.status.success() {
            warn!("{} exited with {}", self.program, output.status);
            return Vec::new();
        }

        let devices = filter_device_listing(&String::from_utf8_lossy(&output.stdout));
        debug!("{} listed {} devices: {:?}", self.program, devices.len(), devices);
        devices
    }
}

/// Fixed device list.
#[derive(Debug, Clone, Default)]
pub struct StaticDevices(pub Vec<String>);

impl DeviceEnumerator for StaticDevices {
    fn list_devices(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Keeps lines of a listing that consist of exactly one token.
///
/// A multi-token line is a diagnostic such as
/// `lsblk: dm-0: failed to get device path`, not a device.
pub fn filter_device_listing(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(name), None) => Some(name.to_string()),
                (Some(_), Some(_)) => {
                    debug!("Skipping device listing line {:?}", line);
                    None
                }
                _ => None,
            }
        })
        .collect()
}
