//! Host collaborators: metadata tags attached to every sample, and the
//! logical CPU count used by compute saturation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use sysinfo::System;

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::count_cpus;
use crate::collector::reader::read_lines;
use crate::collector::traits::FileSystem;
use crate::util::virtualization;

/// Tag mapping attached to each `MetricSample`.
pub type HostTags = BTreeMap<String, String>;

/// Source of host metadata tags.
pub trait HostInfo: Send + Sync {
    /// Returns `hostname`, `os`, `platform`, `platform_family`,
    /// `platform_version`, `virtualization_role` and `virtualization_system`.
    fn tags(&self) -> Result<HostTags, CollectError>;
}

/// Host metadata from `sysinfo` plus container detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoHost;

impl HostInfo for SysinfoHost {
    fn tags(&self) -> Result<HostTags, CollectError> {
        let hostname = System::host_name()
            .ok_or_else(|| CollectError::parse("unable to get host name"))?;
        let platform = System::distribution_id();
        let virt = virtualization();

        let mut tags = HostTags::new();
        tags.insert("hostname".to_string(), hostname);
        tags.insert("os".to_string(), std::env::consts::OS.to_string());
        tags.insert(
            "platform_family".to_string(),
            platform_family(&platform).to_string(),
        );
        tags.insert("platform".to_string(), platform);
        tags.insert(
            "platform_version".to_string(),
            System::os_version().unwrap_or_default(),
        );
        tags.insert("virtualization_role".to_string(), virt.role.to_string());
        tags.insert("virtualization_system".to_string(), virt.system.to_string());
        Ok(tags)
    }
}

/// Groups a distribution id into its family.
pub fn platform_family(platform: &str) -> &str {
    match platform {
        "debian" | "ubuntu" | "linuxmint" | "raspbian" | "pop" => "debian",
        "rhel" | "centos" | "fedora" | "rocky" | "almalinux" | "ol" | "amzn" | "scientific" => {
            "rhel"
        }
        "sles" | "opensuse" | "opensuse-leap" | "opensuse-tumbleweed" | "suse" => "suse",
        "arch" | "manjaro" | "endeavouros" => "arch",
        "alpine" => "alpine",
        "gentoo" => "gentoo",
        other => other,
    }
}

/// Source of the logical CPU count.
pub trait CpuTopology: Send + Sync {
    fn logical_cpus(&self) -> Result<usize, CollectError>;
}

/// Counts the per-CPU `cpuN` lines of `/proc/stat`.
#[derive(Debug, Clone)]
pub struct ProcStatTopology<F: FileSystem> {
    fs: F,
    stat_path: PathBuf,
}

impl<F: FileSystem> ProcStatTopology<F> {
    pub fn new(fs: F, stat_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            stat_path: stat_path.into(),
        }
    }
}

impl<F: FileSystem> CpuTopology for ProcStatTopology<F> {
    fn logical_cpus(&self) -> Result<usize, CollectError> {
        let lines = read_lines(&self.fs, &self.stat_path)?;
        match count_cpus(&lines) {
            0 => Err(CollectError::parse(format!(
                "no per-cpu lines in {}",
                self.stat_path.display()
            ))),
            n => Ok(n),
        }
    }
}
