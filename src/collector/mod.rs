//! USE-method metrics collector for Linux.
//!
//! This module reads `/proc` counter files, derives utilization and
//! saturation for compute, storage and memory, and routes metric
//! identifiers to the right calculator.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        UseCollector                         │
//! │   identifier ──► MetricTarget ──► calculator ──► sample     │
//! │  ┌────────────┐  ┌────────────┐  ┌──────────────────────┐   │
//! │  │  CpuStat   │  │  DiskStat  │  │       MemInfo        │   │
//! │  │ stat       │  │ diskstats  │  │ meminfo / vmstat     │   │
//! │  │ loadavg    │  │            │  │                      │   │
//! │  └─────┬──────┘  └─────┬──────┘  └──────────┬───────────┘   │
//! │        └───────────────┼────────────────────┘               │
//! │                 ┌──────▼──────┐                             │
//! │                 │  FileSystem │ (trait)                     │
//! │                 └──────┬──────┘                             │
//! └────────────────────────┼────────────────────────────────────┘
//!                 ┌────────┴────────┐
//!          ┌──────▼──────┐   ┌──────▼──────┐
//!          │   RealFs    │   │   MockFs    │
//!          │  (Linux)    │   │  (Testing)  │
//!          └─────────────┘   └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use usestat::collector::{RealFs, UseCollector};
//! use usestat::config::UseConfig;
//!
//! let collector = UseCollector::new(RealFs::new(), &UseConfig::default());
//! let samples = collector.collect_metrics(&collector.metric_types()).unwrap();
//! ```
//!
//! ## Testing (with MockFs)
//!
//! ```
//! use usestat::collector::{MockFs, StaticDevices, UseCollector};
//! use usestat::config::UseConfig;
//!
//! let collector = UseCollector::new(MockFs::memory_pressure(), &UseConfig::default())
//!     .with_devices(StaticDevices(vec!["sda".to_string()]));
//! let ns = "/intel/use/memory/utilization".parse().unwrap();
//! let sample = collector.collect_metric(&ns).unwrap();
//! assert_eq!(sample.value, 75.0);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod devices;
pub mod error;
pub mod host;
pub mod mock;
pub mod procfs;
pub mod reader;
pub mod traits;

pub use collector::UseCollector;
pub use devices::{DeviceEnumerator, LsblkEnumerator, StaticDevices};
pub use error::CollectError;
pub use host::{CpuTopology, HostInfo, HostTags, ProcStatTopology, SysinfoHost};
pub use mock::MockFs;
pub use traits::{FileSystem, RealFs};
