//! usestatd - USE-method metrics collector.
//!
//! Reads `/proc` counter files and prints utilization and saturation samples
//! as JSON lines on stdout.
//!
//! Usage:
//!   usestatd --list                                  # print the metric catalog
//!   usestatd                                         # collect every catalog metric once
//!   usestatd -m /intel/use/memory/utilization        # collect selected metrics
//!   usestatd -i 10                                   # repeat every 10 seconds until Ctrl-C
//!   usestatd --proc-path /host/proc                  # read a different proc root

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(target_os = "linux")]
use usestat::collector::RealFs;
#[cfg(not(target_os = "linux"))]
use usestat::collector::mock::MockFs;
use usestat::collector::{FileSystem, UseCollector};
use usestat::config::UseConfig;
use usestat::model::MetricSample;
use usestat::namespace::MetricIdentifier;

/// USE-method metrics collector.
#[derive(Parser)]
#[command(name = "usestatd", about = "USE-method metrics collector", version)]
struct Args {
    /// Path to /proc filesystem. Overrides `proc_path` from --config.
    #[arg(long)]
    proc_path: Option<PathBuf>,

    /// JSON file with engine options, e.g. {"proc_path": "/host/proc"}.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Metric identifier to collect (repeatable). Default: the whole catalog.
    #[arg(short, long = "metric", value_name = "ID")]
    metrics: Vec<MetricIdentifier>,

    /// Print the metric catalog and exit.
    #[arg(short, long)]
    list: bool,

    /// Collection interval in seconds. 0 collects once and exits.
    #[arg(short, long, default_value = "0")]
    interval: u64,

    /// Abort the whole batch on the first failing metric.
    #[arg(long)]
    fail_fast: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["usestatd", "usestat"] {
        match format!("{}={}", target, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("invalid log directive for {}: {}", target, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads engine options from --config, then applies --proc-path.
fn load_config(args: &Args) -> Result<UseConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("unable to read {}: {}", path.display(), e))?;
            serde_json::from_str(&content)
                .map_err(|e| format!("invalid config {}: {}", path.display(), e))?
        }
        None => UseConfig::default(),
    };
    if let Some(proc_path) = &args.proc_path {
        config.proc_path = proc_path.clone();
    }
    Ok(config)
}

fn print_samples(samples: &[MetricSample]) {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for sample in samples {
        match serde_json::to_string(sample) {
            Ok(line) => {
                if let Err(e) = writeln!(out, "{}", line) {
                    error!("Failed to write sample: {}", e);
                    return;
                }
            }
            Err(e) => error!("Failed to serialize {}: {}", sample.identifier, e),
        }
    }
}

/// Collects one batch. Returns `false` if any metric failed.
fn collect_batch<F: FileSystem + Clone>(
    collector: &UseCollector<F>,
    metrics: &[MetricIdentifier],
    fail_fast: bool,
) -> bool {
    if fail_fast {
        return match collector.collect_metrics(metrics) {
            Ok(samples) => {
                print_samples(&samples);
                true
            }
            Err(e) => {
                error!("Batch aborted: {}", e);
                false
            }
        };
    }

    let mut samples = Vec::with_capacity(metrics.len());
    let mut failures = 0usize;
    for (ns, result) in collector.collect_each(metrics) {
        match result {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                failures += 1;
                warn!("Unable to collect {}: {}", ns, e);
            }
        }
    }
    print_samples(&samples);
    debug!("Collected {} samples, {} failures", samples.len(), failures);
    failures == 0
}

fn run<F: FileSystem + Clone>(collector: UseCollector<F>, args: &Args) -> ExitCode {
    if args.list {
        for ns in collector.metric_types() {
            println!("{}", ns);
        }
        return ExitCode::SUCCESS;
    }

    let metrics = if args.metrics.is_empty() {
        collector.metric_types()
    } else {
        args.metrics.clone()
    };
    info!("Collecting {} metrics", metrics.len());

    if args.interval == 0 {
        return if collect_batch(&collector, &metrics, args.fail_fast) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let interval = Duration::from_secs(args.interval);
    while running.load(Ordering::SeqCst) {
        collect_batch(&collector, &metrics, args.fail_fast);

        // Sleep in small steps so shutdown is not delayed by a long interval
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!("usestatd stopped");
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "usestatd {} starting, proc={}",
        env!("CARGO_PKG_VERSION"),
        config.proc_path.display()
    );

    #[cfg(target_os = "linux")]
    let collector = UseCollector::new(RealFs::new(), &config);
    #[cfg(not(target_os = "linux"))]
    let collector = UseCollector::new(MockFs::typical_system(), &config);

    run(collector, &args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_metrics() {
        let args = Args::try_parse_from([
            "usestatd",
            "-m",
            "/intel/use/memory/utilization",
            "--metric",
            "/intel/use/storage/sda/saturation",
            "--proc-path",
            "/host/proc",
        ])
        .unwrap();

        assert_eq!(args.metrics.len(), 2);
        assert_eq!(args.metrics[1].segments()[3], "sda");
        assert_eq!(load_config(&args).unwrap().proc_path, PathBuf::from("/host/proc"));
    }

    #[test]
    fn test_load_config_default() {
        let args = Args::try_parse_from(["usestatd"]).unwrap();
        assert_eq!(load_config(&args).unwrap(), UseConfig::default());
    }
}
