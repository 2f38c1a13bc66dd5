//! Storage domain: per-device utilization and saturation from `/proc/diskstats`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{DiskCounters, find_disk_counters};
use crate::collector::procfs::sample::{SAMPLE_INTERVAL, SampleWindow, sample_twice};
use crate::collector::reader::read_lines;
use crate::collector::traits::FileSystem;

/// Divides busy milliseconds gained over one [`SAMPLE_INTERVAL`] into a percentage.
///
/// Coupled to `SAMPLE_INTERVAL` (10 ms); change both together.
pub const UTILIZATION_DIVISOR: f64 = 10.0;

/// 10 ms * 10 ticks.
pub const SATURATION_DIVISOR: f64 = 100.0;

/// Which diskstats counter a read extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskCounter {
    /// Field 12: time spent doing I/Os (ms).
    IoTime,
    /// Field 13: weighted time spent doing I/Os (ms).
    WeightedIoTime,
}

impl DiskCounter {
    fn pick(self, counters: DiskCounters) -> u64 {
        match self {
            DiskCounter::IoTime => counters.io_time,
            DiskCounter::WeightedIoTime => counters.io_weighted_time,
        }
    }
}

/// Single-use calculator bound to one block device.
pub struct DiskStat<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    device: String,
    diskstats_path: PathBuf,
}

impl<'a, F: FileSystem + ?Sized> DiskStat<'a, F> {
    pub fn new(fs: &'a F, device: impl Into<String>, diskstats_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            device: device.into(),
            diskstats_path: diskstats_path.into(),
        }
    }

    /// Busy time gained across a [`SAMPLE_INTERVAL`] window, as a percentage.
    pub fn utilization(self) -> Result<f64, CollectError> {
        let window = sample_twice(Some(SAMPLE_INTERVAL), || {
            read_disk_counter(self.fs, &self.diskstats_path, &self.device, DiskCounter::IoTime)
        })?;
        let value = delta(&window) / UTILIZATION_DIVISOR;
        debug!("disk {} utilization {:.2} ({:?})", self.device, value, window);
        Ok(value)
    }

    /// Weighted I/O time gained between two back-to-back reads.
    ///
    /// No pause separates the reads, so on a live system this is close to zero.
    pub fn saturation(self) -> Result<f64, CollectError> {
        let window = sample_twice(None, || {
            read_disk_counter(
                self.fs,
                &self.diskstats_path,
                &self.device,
                DiskCounter::WeightedIoTime,
            )
        })?;
        let value = delta(&window) / SATURATION_DIVISOR;
        debug!("disk {} saturation {:.2} ({:?})", self.device, value, window);
        Ok(value)
    }
}

fn delta(window: &SampleWindow<u64>) -> f64 {
    window.current as f64 - window.last as f64
}

/// Reads one counter of `device` from the diskstats file.
pub fn read_disk_counter<F: FileSystem + ?Sized>(
    fs: &F,
    diskstats_path: &Path,
    device: &str,
    counter: DiskCounter,
) -> Result<u64, CollectError> {
    if device.is_empty() {
        return Err(CollectError::parse("empty device name"));
    }

    let lines = read_lines(fs, diskstats_path)?;
    let counters = find_disk_counters(&lines, device)
        .map_err(|e| CollectError::Parse(e.message))?
        .ok_or_else(|| CollectError::DeviceNotFound(device.to_string()))?;
    Ok(counter.pick(counters))
}
