//! End-to-end collection over a fake proc root on disk.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use usestat::collector::{
    CollectError, HostInfo, HostTags, RealFs, StaticDevices, UseCollector,
};
use usestat::config::UseConfig;
use usestat::namespace::{Domain, MetricIdentifier};

struct NoHost;

impl HostInfo for NoHost {
    fn tags(&self) -> Result<HostTags, CollectError> {
        Ok(HostTags::new())
    }
}

fn write_proc_root(dir: &Path) {
    fs::write(
        dir.join("stat"),
        "cpu  100 0 50 1000 0 0 0 0 0 0\ncpu0 50 0 25 500 0 0 0 0 0 0\ncpu1 50 0 25 500 0 0 0 0 0 0\nctxt 42\n",
    )
    .unwrap();
    fs::write(dir.join("loadavg"), "1.00 0.50 0.25 2/120 999\n").unwrap();
    fs::write(
        dir.join("diskstats"),
        "   8       0 sda 1 0 8 0 1 0 8 0 0 120 340 0 0 0 0\n 253       0 dm-0 1 0 8 0 1 0 8 0 0 10 20 0 0 0 0\n",
    )
    .unwrap();
    fs::write(
        dir.join("meminfo"),
        "MemTotal:        2000 kB\nMemFree:          500 kB\nMemAvailable:     700 kB\n",
    )
    .unwrap();
    fs::write(dir.join("vmstat"), "pswpin 30\npswpout 60\n").unwrap();
}

fn collector(dir: &TempDir) -> UseCollector<RealFs> {
    UseCollector::new(RealFs::new(), &UseConfig::new(dir.path()))
        .with_devices(StaticDevices(vec!["sda".to_string(), "dm-0".to_string()]))
        .with_host_info(NoHost)
}

fn id(s: &str) -> MetricIdentifier {
    s.parse().unwrap()
}

#[test]
fn collects_whole_catalog_from_files() {
    let dir = TempDir::new().unwrap();
    write_proc_root(dir.path());
    let collector = collector(&dir);

    let catalog = collector.metric_types();
    assert_eq!(catalog.len(), 8);

    let samples = collector.collect_metrics(&catalog).unwrap();
    assert_eq!(samples.len(), catalog.len());

    for sample in &samples {
        let target = sample.identifier.resolve().unwrap();
        let expected = match (target.domain, target.operation.as_str()) {
            // Counters do not move on disk, so every delta metric is zero.
            (Domain::Compute, "utilization") => 0.0,
            (Domain::Compute, _) => 0.5,
            (Domain::Storage, _) => 0.0,
            (Domain::Memory, "utilization") => 75.0,
            (Domain::Memory, _) => 50.0,
        };
        assert_eq!(sample.value, expected, "{}", sample.identifier);
        assert!(sample.tags.is_empty());
    }
}

#[test]
fn missing_counter_file_fails_only_its_metric() {
    let dir = TempDir::new().unwrap();
    write_proc_root(dir.path());
    fs::remove_file(dir.path().join("vmstat")).unwrap();
    let collector = collector(&dir);

    let results = collector.collect_each(&[
        id("/intel/use/memory/utilization"),
        id("/intel/use/memory/saturation"),
    ]);
    assert!(results[0].1.is_ok());
    match &results[1].1 {
        Err(CollectError::Read { path, .. }) => assert!(path.ends_with("vmstat")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn unknown_device_is_reported() {
    let dir = TempDir::new().unwrap();
    write_proc_root(dir.path());
    let collector = collector(&dir);

    let err = collector
        .collect_metric(&id("/intel/use/storage/sdq/utilization"))
        .unwrap_err();
    assert!(err.to_string().contains("sdq"));
}

#[test]
fn samples_serialize_as_json_lines() {
    let dir = TempDir::new().unwrap();
    write_proc_root(dir.path());
    let collector = collector(&dir);

    let sample = collector
        .collect_metric(&id("/intel/use/memory/utilization"))
        .unwrap();
    let line = serde_json::to_string(&sample).unwrap();
    assert!(line.starts_with("{\"identifier\":\"/intel/use/memory/utilization\",\"value\":75.0"));
}
