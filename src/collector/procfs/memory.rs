//! Memory domain: utilization from `/proc/meminfo`, saturation from `/proc/vmstat`.
//!
//! Both values come from a single snapshot. Utilization is an instantaneous
//! ratio and saturation is a ratio of cumulative swap counters, unlike the
//! two-point CPU and disk metrics.

use std::path::PathBuf;

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{MemCounters, SwapCounters, parse_meminfo, parse_vmstat};
use crate::collector::reader::read_lines;
use crate::collector::traits::FileSystem;

/// Single-use memory calculator.
pub struct MemInfo<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    meminfo_path: PathBuf,
    vmstat_path: PathBuf,
}

impl<'a, F: FileSystem + ?Sized> MemInfo<'a, F> {
    pub fn new(fs: &'a F, meminfo_path: impl Into<PathBuf>, vmstat_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            meminfo_path: meminfo_path.into(),
            vmstat_path: vmstat_path.into(),
        }
    }

    /// Percentage of `MemTotal` not reported as `MemFree`.
    pub fn utilization(self) -> Result<f64, CollectError> {
        let lines = read_lines(self.fs, &self.meminfo_path)?;
        let mem = parse_meminfo(&lines).map_err(|e| CollectError::Parse(e.message))?;
        let value = memory_utilization(mem)?;
        debug!("memory utilization {:.2} ({:?})", value, mem);
        Ok(value)
    }

    /// Swap-in pages as a percentage of swap-out pages.
    pub fn saturation(self) -> Result<f64, CollectError> {
        let lines = read_lines(self.fs, &self.vmstat_path)?;
        let swap = parse_vmstat(&lines).map_err(|e| CollectError::Parse(e.message))?;
        let value = memory_saturation(swap);
        debug!("memory saturation {:.2} ({:?})", value, swap);
        Ok(value)
    }
}

/// `100 - MemFree / MemTotal * 100`; fails unless `MemTotal` is positive.
pub fn memory_utilization(mem: MemCounters) -> Result<f64, CollectError> {
    if mem.mem_total <= 0 {
        return Err(CollectError::InvalidMemTotal(mem.mem_total));
    }
    Ok(100.0 - (mem.mem_free as f64 / mem.mem_total as f64 * 100.0))
}

/// `SwapIn / SwapOut * 100`, or `0.0` unless `SwapOut` is positive.
pub fn memory_saturation(swap: SwapCounters) -> f64 {
    if swap.swap_out <= 0 {
        return 0.0;
    }
    swap.swap_in as f64 / swap.swap_out as f64 * 100.0
}
