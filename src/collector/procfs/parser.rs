//! Parsers for `/proc` counter files.
//!
//! These are pure functions over file lines so they can be tested with
//! string inputs. Positions and labels follow the kernel's documented
//! layouts for `stat`, `loadavg`, `diskstats`, `meminfo` and `vmstat`.

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

// ============ CPU Stat Parser ============

/// Counter names of the aggregate `cpu` line, in column order.
pub const CPU_COUNTER_NAMES: [&str; 10] = [
    "user",
    "nice",
    "system",
    "idle",
    "iowait",
    "irq",
    "softirq",
    "steal",
    "guest",
    "guest_nice",
];

/// One snapshot of the aggregate CPU tick counters from `/proc/stat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuCounters {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuCounters {
    /// Looks a counter up by its `/proc/stat` column name.
    pub fn get(&self, name: &str) -> Option<u64> {
        let value = match name {
            "user" => self.user,
            "nice" => self.nice,
            "system" => self.system,
            "idle" => self.idle,
            "iowait" => self.iowait,
            "irq" => self.irq,
            "softirq" => self.softirq,
            "steal" => self.steal,
            "guest" => self.guest,
            "guest_nice" => self.guest_nice,
            _ => return None,
        };
        Some(value)
    }

    /// Idle ticks.
    pub fn idle(&self) -> u64 {
        self.idle
    }

    /// Busy ticks: `user + nice + system`, summed as floats so counters
    /// near `u64::MAX` cannot overflow.
    pub fn non_idle(&self) -> f64 {
        self.user as f64 + self.nice as f64 + self.system as f64
    }
}

/// Parses one `/proc/stat` CPU line: a label followed by ten tick counters.
pub fn parse_cpu_counters(line: &str) -> Result<CpuCounters, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < CPU_COUNTER_NAMES.len() + 1 {
        return Err(ParseError::new(format!(
            "not enough fields in cpu line: expected {}, got {}",
            CPU_COUNTER_NAMES.len() + 1,
            parts.len()
        )));
    }

    let mut values = [0u64; 10];
    for (i, name) in CPU_COUNTER_NAMES.iter().enumerate() {
        values[i] = parts[i + 1]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}: {:?}", name, parts[i + 1])))?;
    }

    Ok(CpuCounters {
        user: values[0],
        nice: values[1],
        system: values[2],
        idle: values[3],
        iowait: values[4],
        irq: values[5],
        softirq: values[6],
        steal: values[7],
        guest: values[8],
        guest_nice: values[9],
    })
}

/// Counts per-CPU `cpuN` lines in `/proc/stat` content.
pub fn count_cpus(lines: &[String]) -> usize {
    lines
        .iter()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|label| {
            label
                .strip_prefix("cpu")
                .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
        })
        .count()
}

// ============ Load Average Parser ============

/// Parsed data from `/proc/loadavg`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAvg {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

/// Parses the first line of `/proc/loadavg`. Fields after the third are ignored.
pub fn parse_loadavg(line: &str) -> Result<LoadAvg, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(ParseError::new("invalid loadavg format"));
    }

    let load1 = parts[0]
        .parse()
        .map_err(|_| ParseError::new("invalid load1"))?;
    let load5 = parts[1]
        .parse()
        .map_err(|_| ParseError::new("invalid load5"))?;
    let load15 = parts[2]
        .parse()
        .map_err(|_| ParseError::new("invalid load15"))?;

    Ok(LoadAvg {
        load1,
        load5,
        load15,
    })
}

// ============ Disk Stats Parser ============

/// Column of the device name in `/proc/diskstats`.
const DISK_NAME_FIELD: usize = 2;
/// Column of "time spent doing I/Os (ms)".
const DISK_IO_TIME_FIELD: usize = 12;
/// Column of "weighted time spent doing I/Os (ms)".
const DISK_WEIGHTED_IO_TIME_FIELD: usize = 13;

/// The two I/O time counters of one block device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskCounters {
    /// Time spent doing I/Os (ms)
    pub io_time: u64,
    /// Weighted time spent doing I/Os (ms)
    pub io_weighted_time: u64,
}

/// Finds the counters of `device` in `/proc/diskstats` lines.
///
/// Format: major minor name reads r_merged r_sectors r_time writes w_merged w_sectors w_time io_pending io_time w_io_time [discards ...]
///
/// The device name must match exactly; the first matching line wins.
/// Returns `Ok(None)` when no line names the device.
pub fn find_disk_counters(
    lines: &[String],
    device: &str,
) -> Result<Option<DiskCounters>, ParseError> {
    for line in lines {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.get(DISK_NAME_FIELD) != Some(&device) {
            continue;
        }

        let get_val = |idx: usize, name: &str| -> Result<u64, ParseError> {
            parts
                .get(idx)
                .ok_or_else(|| ParseError::new(format!("missing {} for {}", name, device)))?
                .parse()
                .map_err(|_| ParseError::new(format!("invalid {} for {}", name, device)))
        };

        return Ok(Some(DiskCounters {
            io_time: get_val(DISK_IO_TIME_FIELD, "io_time")?,
            io_weighted_time: get_val(DISK_WEIGHTED_IO_TIME_FIELD, "io_weighted_time")?,
        }));
    }

    Ok(None)
}

// ============ Memory Parsers ============

/// `MemTotal` and `MemFree` from `/proc/meminfo`, in kB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemCounters {
    pub mem_total: i64,
    pub mem_free: i64,
}

/// Parses `/proc/meminfo` lines (`Key:    value kB`).
///
/// Keys that are absent stay at zero.
pub fn parse_meminfo(lines: &[String]) -> Result<MemCounters, ParseError> {
    let mut info = MemCounters::default();

    for line in lines {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let target = match key {
            "MemTotal:" => &mut info.mem_total,
            "MemFree:" => &mut info.mem_free,
            _ => continue,
        };
        *target = value
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {} {:?}", key, value)))?;
    }

    Ok(info)
}

/// Cumulative swap counters from `/proc/vmstat`, in pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapCounters {
    pub swap_in: i64,
    pub swap_out: i64,
}

/// Parses `/proc/vmstat` lines (`key value`) for `pswpin` / `pswpout`.
pub fn parse_vmstat(lines: &[String]) -> Result<SwapCounters, ParseError> {
    let mut info = SwapCounters::default();

    for line in lines {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let target = match key {
            "pswpin" => &mut info.swap_in,
            "pswpout" => &mut info.swap_out,
            _ => continue,
        };
        *target = value
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {} {:?}", key, value)))?;
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(content: &str) -> Vec<String> {
        content.lines().map(str::to_owned).collect()
    }

    #[test]
    fn test_parse_cpu_counters() {
        let cpu = parse_cpu_counters("cpu  10000 500 3000 80000 1000 200 100 7 3 1").unwrap();

        assert_eq!(cpu.user, 10000);
        assert_eq!(cpu.nice, 500);
        assert_eq!(cpu.system, 3000);
        assert_eq!(cpu.idle, 80000);
        assert_eq!(cpu.steal, 7);
        assert_eq!(cpu.guest_nice, 1);
        assert_eq!(cpu.non_idle(), 13500.0);
        assert_eq!(cpu.get("iowait"), Some(1000));
        assert_eq!(cpu.get("bogus"), None);
    }

    #[test]
    fn test_cpu_counter_names_cover_all_fields() {
        let cpu = parse_cpu_counters("cpu 1 2 3 4 5 6 7 8 9 10").unwrap();
        let values: Vec<u64> = CPU_COUNTER_NAMES
            .iter()
            .map(|name| cpu.get(name).unwrap())
            .collect();
        assert_eq!(values, (1..=10).collect::<Vec<u64>>());
    }

    #[test]
    fn test_parse_cpu_counters_short_line() {
        let err = parse_cpu_counters("cpu 1 2 3 4").unwrap_err();
        assert!(err.message.contains("not enough fields"));
    }

    #[test]
    fn test_parse_cpu_counters_invalid_number() {
        let err = parse_cpu_counters("cpu 1 2 x 4 5 6 7 8 9 10").unwrap_err();
        assert!(err.message.contains("system"));
    }

    #[test]
    fn test_count_cpus() {
        let content = lines(
            "cpu  1 2 3 4 5 6 7 8 9 10\ncpu0 1 2 3 4 5 6 7 8 9 10\ncpu1 1 2 3 4 5 6 7 8 9 10\nctxt 5\ncpufreq 1\n",
        );
        assert_eq!(count_cpus(&content), 2);
    }

    #[test]
    fn test_parse_loadavg() {
        let load = parse_loadavg("4.50 2.25 1.00 8/300 5678").unwrap();
        assert!((load.load1 - 4.50).abs() < f64::EPSILON);
        assert!((load.load5 - 2.25).abs() < f64::EPSILON);
        assert!((load.load15 - 1.00).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_loadavg_invalid() {
        assert!(parse_loadavg("0.15 0.10").is_err());
        assert!(parse_loadavg("0.15 abc 0.05 1/150 1234").is_err());
    }

    #[test]
    fn test_find_disk_counters() {
        let content = lines(
            "\
   8       0 sda 12345 100 987654 5000 6789 50 456789 3000 0 4000 8000 0 0 0 0
   8       1 sda1 10000 80 800000 4000 5000 40 400000 2500 0 3500 6500 0 0 0 0
",
        );

        let sda = find_disk_counters(&content, "sda").unwrap().unwrap();
        assert_eq!(sda.io_time, 4000);
        assert_eq!(sda.io_weighted_time, 8000);

        let sda1 = find_disk_counters(&content, "sda1").unwrap().unwrap();
        assert_eq!(sda1.io_time, 3500);
        assert_eq!(sda1.io_weighted_time, 6500);
    }

    #[test]
    fn test_find_disk_counters_exact_match_only() {
        let content = lines("   8       1 sda1 10000 80 800000 4000 5000 40 400000 2500 0 3500 6500\n");
        assert_eq!(find_disk_counters(&content, "sda").unwrap(), None);
    }

    #[test]
    fn test_find_disk_counters_first_match_wins() {
        let content = lines(
            "\
   8 0 sda 1 1 1 1 1 1 1 1 0 10 20
   8 0 sda 1 1 1 1 1 1 1 1 0 30 40
",
        );
        let sda = find_disk_counters(&content, "sda").unwrap().unwrap();
        assert_eq!(sda.io_time, 10);
    }

    #[test]
    fn test_find_disk_counters_truncated_line() {
        let content = lines("   8 0 sda 1 1 1 1\n\n");
        assert!(find_disk_counters(&content, "sda").is_err());
    }

    #[test]
    fn test_parse_meminfo() {
        let content = lines(
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
",
        );
        let info = parse_meminfo(&content).unwrap();
        assert_eq!(info.mem_total, 16384000);
        assert_eq!(info.mem_free, 8192000);
    }

    #[test]
    fn test_parse_meminfo_invalid_value() {
        let content = lines("MemTotal: lots kB\n");
        assert!(parse_meminfo(&content).is_err());
    }

    #[test]
    fn test_parse_vmstat() {
        let content = lines("pgpgin 1\npswpin 100\npswpout 200\nlonely\n");
        let info = parse_vmstat(&content).unwrap();
        assert_eq!(info.swap_in, 100);
        assert_eq!(info.swap_out, 200);
    }

    #[test]
    fn test_parse_vmstat_missing_keys() {
        let info = parse_vmstat(&lines("pgpgin 1\n")).unwrap();
        assert_eq!(info, SwapCounters::default());
    }
}
