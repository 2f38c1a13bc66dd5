//! Namespace router that turns requested identifiers into samples.
//!
//! `UseCollector` resolves each identifier to a domain calculator, builds a
//! fresh calculator per request, and stamps the result with a timestamp and
//! host tags. Requests in a batch are processed one after another.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

use crate::catalog;
use crate::collector::devices::{DeviceEnumerator, LsblkEnumerator};
use crate::collector::error::CollectError;
use crate::collector::host::{CpuTopology, HostInfo, HostTags, ProcStatTopology, SysinfoHost};
use crate::collector::procfs::{CpuStat, DiskStat, MemInfo};
use crate::collector::traits::FileSystem;
use crate::config::{ProcPaths, UseConfig};
use crate::model::MetricSample;
use crate::namespace::{Domain, MetricIdentifier, MetricTarget, Operation};

/// Routes metric identifiers to the CPU, disk and memory calculators.
pub struct UseCollector<F: FileSystem + Clone> {
    fs: F,
    paths: ProcPaths,
    devices: Box<dyn DeviceEnumerator>,
    host: Box<dyn HostInfo>,
    topology: Box<dyn CpuTopology>,
}

impl<F: FileSystem + Clone + 'static> UseCollector<F> {
    /// Creates a collector reading counter files under `config.proc_path`.
    ///
    /// Paths are resolved here once. Devices come from `lsblk`, host tags
    /// from `sysinfo`, and the CPU count from the per-CPU lines of `stat`.
    pub fn new(fs: F, config: &UseConfig) -> Self {
        let paths = config.paths();
        let topology = ProcStatTopology::new(fs.clone(), paths.stat.clone());
        Self {
            fs,
            paths,
            devices: Box::new(LsblkEnumerator::new()),
            host: Box::new(SysinfoHost),
            topology: Box::new(topology),
        }
    }
}

impl<F: FileSystem + Clone> UseCollector<F> {
    /// Replaces the block device enumerator.
    pub fn with_devices(mut self, devices: impl DeviceEnumerator + 'static) -> Self {
        self.devices = Box::new(devices);
        self
    }

    /// Replaces the host metadata source.
    pub fn with_host_info(mut self, host: impl HostInfo + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Lists every identifier this collector can serve.
    pub fn metric_types(&self) -> Vec<MetricIdentifier> {
        let devices = self.devices.list_devices();
        debug!("Building catalog for {} devices", devices.len());
        catalog::metric_types(&devices)
    }

    /// Evaluates the calculator a target names.
    pub fn measure(&self, target: &MetricTarget) -> Result<f64, CollectError> {
        let paths = &self.paths;
        match (target.domain, target.operation) {
            (Domain::Compute, Operation::Utilization) => {
                CpuStat::new(&self.fs, &paths.stat, &paths.loadavg).utilization()
            }
            (Domain::Compute, Operation::Saturation) => {
                CpuStat::new(&self.fs, &paths.stat, &paths.loadavg)
                    .saturation(self.topology.as_ref())
            }
            (Domain::Storage, op) => {
                let device = target.device.as_deref().unwrap_or_default();
                let disk = DiskStat::new(&self.fs, device, &paths.diskstats);
                match op {
                    Operation::Utilization => disk.utilization(),
                    Operation::Saturation => disk.saturation(),
                }
            }
            (Domain::Memory, Operation::Utilization) => {
                MemInfo::new(&self.fs, &paths.meminfo, &paths.vmstat).utilization()
            }
            (Domain::Memory, Operation::Saturation) => {
                MemInfo::new(&self.fs, &paths.meminfo, &paths.vmstat).saturation()
            }
        }
    }

    /// Resolves, measures and stamps a single identifier.
    pub fn collect_metric(&self, ns: &MetricIdentifier) -> Result<MetricSample, CollectError> {
        let target = ns.resolve()?;
        let start = Instant::now();
        let value = self.measure(&target)?;
        debug!("{} = {} in {:?}", ns, value, start.elapsed());

        Ok(MetricSample {
            identifier: ns.clone(),
            value,
            timestamp: Utc::now(),
            tags: self.host_tags(),
        })
    }

    /// Collects a batch, aborting on the first failing identifier.
    pub fn collect_metrics(
        &self,
        mts: &[MetricIdentifier],
    ) -> Result<Vec<MetricSample>, CollectError> {
        mts.iter().map(|ns| self.collect_metric(ns)).collect()
    }

    /// Collects a batch, keeping one result per identifier.
    pub fn collect_each(
        &self,
        mts: &[MetricIdentifier],
    ) -> Vec<(MetricIdentifier, Result<MetricSample, CollectError>)> {
        mts.iter()
            .map(|ns| (ns.clone(), self.collect_metric(ns)))
            .collect()
    }

    /// Host tags for a sample; empty when metadata lookup fails.
    fn host_tags(&self) -> HostTags {
        self.host.tags().unwrap_or_else(|e| {
            warn!("Unable to get host tags: {}", e);
            HostTags::new()
        })
    }
}
