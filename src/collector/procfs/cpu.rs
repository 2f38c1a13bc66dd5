//! Compute domain: CPU utilization from `/proc/stat`, saturation from `/proc/loadavg`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::host::CpuTopology;
use crate::collector::procfs::parser::{CpuCounters, LoadAvg, parse_cpu_counters, parse_loadavg};
use crate::collector::procfs::sample::{SAMPLE_INTERVAL, SampleWindow, sample_twice};
use crate::collector::reader::read_lines;
use crate::collector::traits::FileSystem;

/// Single-use CPU calculator.
///
/// Each instance answers exactly one `utilization` or `saturation` call;
/// both consume `self`.
pub struct CpuStat<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    stat_path: PathBuf,
    loadavg_path: PathBuf,
}

impl<'a, F: FileSystem + ?Sized> CpuStat<'a, F> {
    pub fn new(fs: &'a F, stat_path: impl Into<PathBuf>, loadavg_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            stat_path: stat_path.into(),
            loadavg_path: loadavg_path.into(),
        }
    }

    /// Percentage of non-idle ticks over a [`SAMPLE_INTERVAL`] window.
    pub fn utilization(self) -> Result<f64, CollectError> {
        let window = sample_twice(Some(SAMPLE_INTERVAL), || {
            read_cpu_counters(self.fs, &self.stat_path)
        })?;
        let value = cpu_utilization(&window);
        debug!(
            "cpu utilization {:.2} (last={:?}, current={:?})",
            value, window.last, window.current
        );
        Ok(value)
    }

    /// One-minute load average divided by the number of logical CPUs.
    pub fn saturation(self, topology: &dyn CpuTopology) -> Result<f64, CollectError> {
        let cpus = topology.logical_cpus()?;
        if cpus == 0 {
            return Err(CollectError::parse("no logical CPUs reported"));
        }
        let load = read_loadavg(self.fs, &self.loadavg_path)?;
        debug!("cpu saturation: load1={} cpus={}", load.load1, cpus);
        Ok(load.load1 / cpus as f64)
    }
}

/// Evaluates the utilization formula over two CPU snapshots.
///
/// A window in which either the idle or the non-idle delta is zero yields `0.0`.
pub fn cpu_utilization(window: &SampleWindow<CpuCounters>) -> f64 {
    let delta_idle = window.current.idle() as f64 - window.last.idle() as f64;
    let delta_non_idle = window.current.non_idle() - window.last.non_idle();
    if delta_idle == 0.0 || delta_non_idle == 0.0 {
        return 0.0;
    }
    100.0 * (delta_non_idle / (delta_idle + delta_non_idle))
}

/// Reads the aggregate CPU counters from the first line of the stat file.
pub fn read_cpu_counters<F: FileSystem + ?Sized>(
    fs: &F,
    stat_path: &Path,
) -> Result<CpuCounters, CollectError> {
    let lines = read_lines(fs, stat_path)?;
    let first = lines
        .first()
        .ok_or_else(|| CollectError::parse(format!("{} is empty", stat_path.display())))?;
    parse_cpu_counters(first).map_err(|e| CollectError::Parse(e.message))
}

/// Reads the three load averages from the first line of the loadavg file.
pub fn read_loadavg<F: FileSystem + ?Sized>(
    fs: &F,
    loadavg_path: &Path,
) -> Result<LoadAvg, CollectError> {
    let lines = read_lines(fs, loadavg_path)?;
    let first = lines
        .first()
        .ok_or_else(|| CollectError::parse(format!("{} is empty", loadavg_path.display())))?;
    parse_loadavg(first).map_err(|e| CollectError::Parse(e.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    struct FixedCpus(usize);

    impl CpuTopology for FixedCpus {
        fn logical_cpus(&self) -> Result<usize, CollectError> {
            Ok(self.0)
        }
    }

    fn counters(user: u64, nice: u64, system: u64, idle: u64) -> CpuCounters {
        CpuCounters {
            user,
            nice,
            system,
            idle,
            ..Default::default()
        }
    }

    #[test]
    fn test_cpu_utilization_formula() {
        let window = SampleWindow {
            last: counters(0, 0, 0, 100),
            current: counters(10, 0, 0, 190),
        };
        assert_eq!(cpu_utilization(&window), 10.0);
    }

    #[test]
    fn test_cpu_utilization_flat_idle_is_zero() {
        let window = SampleWindow {
            last: counters(0, 0, 0, 100),
            current: counters(50, 5, 5, 100),
        };
        assert_eq!(cpu_utilization(&window), 0.0);
    }

    #[test]
    fn test_cpu_utilization_flat_non_idle_is_zero() {
        let window = SampleWindow {
            last: counters(10, 1, 1, 100),
            current: counters(10, 1, 1, 900),
        };
        assert_eq!(cpu_utilization(&window), 0.0);
    }

    #[test]
    fn test_cpu_utilization_counters_near_max() {
        let last = parse_cpu_counters("cpu 18446744073709551615 1 0 200 0 0 0 0 0 0").unwrap();
        let current = parse_cpu_counters("cpu 18446744073709551615 1 0 300 0 0 0 0 0 0").unwrap();
        let window = SampleWindow { last, current };
        assert_eq!(cpu_utilization(&window), 0.0);
    }

    #[test]
    fn test_cpu_utilization_ignores_other_counters() {
        let mut current = counters(30, 0, 10, 60);
        current.iowait = 1000;
        current.steal = 1000;
        let window = SampleWindow {
            last: counters(0, 0, 0, 0),
            current,
        };
        assert_eq!(cpu_utilization(&window), 40.0);
    }

    #[test]
    fn test_utilization_from_busy_system() {
        let fs = MockFs::busy_system();
        let cpu = CpuStat::new(&fs, "/proc/stat", "/proc/loadavg");
        assert_eq!(cpu.utilization().unwrap(), 10.0);
    }

    #[test]
    fn test_utilization_from_static_counters() {
        let fs = MockFs::typical_system();
        let cpu = CpuStat::new(&fs, "/proc/stat", "/proc/loadavg");
        assert_eq!(cpu.utilization().unwrap(), 0.0);
    }

    #[test]
    fn test_utilization_missing_stat_file() {
        let mut fs = MockFs::typical_system();
        fs.remove_file("/proc/stat");
        let cpu = CpuStat::new(&fs, "/proc/stat", "/proc/loadavg");
        assert!(matches!(cpu.utilization(), Err(CollectError::Read { .. })));
    }

    #[test]
    fn test_utilization_malformed_stat() {
        let mut fs = MockFs::typical_system();
        fs.add_file("/proc/stat", "cpu 1 2 3\n");
        let cpu = CpuStat::new(&fs, "/proc/stat", "/proc/loadavg");
        assert!(matches!(cpu.utilization(), Err(CollectError::Parse(_))));
    }

    #[test]
    fn test_saturation() {
        let fs = MockFs::busy_system();
        let cpu = CpuStat::new(&fs, "/proc/stat", "/proc/loadavg");
        assert_eq!(cpu.saturation(&FixedCpus(2)).unwrap(), 1.5);
    }

    #[test]
    fn test_saturation_zero_cpus() {
        let fs = MockFs::typical_system();
        let cpu = CpuStat::new(&fs, "/proc/stat", "/proc/loadavg");
        assert!(cpu.saturation(&FixedCpus(0)).is_err());
    }

    #[test]
    fn test_saturation_bad_loadavg() {
        let mut fs = MockFs::typical_system();
        fs.add_file("/proc/loadavg", "high\n");
        let cpu = CpuStat::new(&fs, "/proc/stat", "/proc/loadavg");
        assert!(matches!(
            cpu.saturation(&FixedCpus(4)),
            Err(CollectError::Parse(_))
        ));
    }
}
