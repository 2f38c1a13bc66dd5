//! Mock filesystem implementations for testing.
//!
//! This module provides `MockFs` and pre-built `/proc` scenarios for
//! exercising the USE calculators without a Linux `/proc`.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
