//! usestat - USE-method (utilization, saturation) metrics from `/proc`.
//!
//! This library provides:
//! - `collector` - counter-file readers, domain calculators and the router
//! - `namespace` - metric identifiers and their typed resolution
//! - `catalog` - the set of identifiers the engine can produce
//! - `config` - proc root configuration
//! - `model` - output samples

pub mod catalog;
pub mod collector;
pub mod config;
pub mod model;
pub mod namespace;
pub mod util;
