//! USE calculators over the Linux `/proc` filesystem.
//!
//! This module provides the counter-file parsers and the three domain
//! calculators: compute (`CpuStat`), storage (`DiskStat`) and memory (`MemInfo`).

pub mod cpu;
pub mod disk;
pub mod memory;
pub mod parser;
pub mod sample;

pub use cpu::CpuStat;
pub use disk::DiskStat;
pub use memory::MemInfo;
pub use sample::{SAMPLE_INTERVAL, SampleWindow, TwoPointSampler};
