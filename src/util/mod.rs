//! Utility modules for usestat.

mod container;

pub use container::{Virtualization, virtualization};
