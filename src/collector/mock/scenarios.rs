//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc` states for the five counter
//! files the USE calculators read.

use super::filesystem::MockFs;

const TYPICAL_DISKSTATS: &str = "\
   8       0 sda 12345 100 987654 5000 6789 50 456789 3000 0 4000 8000 0 0 0 0
   8       1 sda1 10000 80 800000 4000 5000 40 400000 2500 0 3500 6500 0 0 0 0
 259       0 nvme0n1 50000 200 2000000 10000 30000 150 1500000 8000 5 15000 18000 0 0 0 0
";

impl MockFs {
    /// Creates a quiet 4-CPU system whose counters do not move between reads.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file("/proc/loadavg", "0.15 0.10 0.05 1/150 1234\n");
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
",
        );
        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
",
        );
        fs.add_file("/proc/diskstats", TYPICAL_DISKSTATS);
        fs.add_file(
            "/proc/vmstat",
            "\
pgpgin 123456
pgpgout 654321
pswpin 100
pswpout 200
pgfault 999999
pgmajfault 1234
oom_kill 0
",
        );

        fs
    }

    /// Creates a 2-CPU system whose CPU and `sda` counters advance between
    /// the first and second read.
    ///
    /// CPU: 10 non-idle and 90 idle ticks elapse (10% utilization).
    /// sda: io_time grows by 5 ms, weighted io_time by 250 ms.
    pub fn busy_system() -> Self {
        let mut fs = Self::typical_system();

        fs.add_file_sequence(
            "/proc/stat",
            [
                "cpu  0 0 0 100 0 0 0 0 0 0\ncpu0 0 0 0 50 0 0 0 0 0 0\ncpu1 0 0 0 50 0 0 0 0 0 0\n",
                "cpu  10 0 0 190 0 0 0 0 0 0\ncpu0 5 0 0 95 0 0 0 0 0 0\ncpu1 5 0 0 95 0 0 0 0 0 0\n",
            ],
        );
        fs.add_file("/proc/loadavg", "3.00 2.00 1.00 3/200 4321\n");
        fs.add_file_sequence(
            "/proc/diskstats",
            [
                TYPICAL_DISKSTATS.to_string(),
                TYPICAL_DISKSTATS.replace(" 0 4000 8000 ", " 2 4005 8250 "),
            ],
        );

        fs
    }

    /// Creates a system with 75% memory in use and more swap-in than swap-out.
    pub fn memory_pressure() -> Self {
        let mut fs = Self::typical_system();

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:           1000 kB
MemFree:             250 kB
MemAvailable:        300 kB
SwapTotal:       4096000 kB
SwapFree:        1024000 kB
",
        );
        fs.add_file(
            "/proc/vmstat",
            "\
pgpgin 123456
pgpgout 654321
pswpin 300
pswpout 150
",
        );

        fs
    }

    /// Creates a system that has swapped in pages but never swapped any out.
    pub fn no_swap_out() -> Self {
        let mut fs = Self::typical_system();
        fs.add_file("/proc/vmstat", "pswpin 5\npswpout 0\n");
        fs
    }
}
