//! Metric identifiers and their typed resolution.
//!
//! Identifiers look like `/intel/use/compute/utilization` or
//! `/intel/use/storage/sda/saturation`. They are split into segments once
//! and resolved into a [`MetricTarget`] naming domain, device and operation.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::collector::error::CollectError;

/// Leading segments shared by every identifier this engine serves.
pub const NAMESPACE_PREFIX: [&str; 2] = ["intel", "use"];

/// An ordered, immutable sequence of path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricIdentifier {
    segments: Vec<String>,
}

impl MetricIdentifier {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolves the identifier into the calculator request it names.
    pub fn resolve(&self) -> Result<MetricTarget, CollectError> {
        let unknown = || CollectError::UnknownMetric(self.to_string());
        let segments: Vec<&str> = self.segments.iter().map(String::as_str).collect();

        let rest = match segments.as_slice() {
            [vendor, plugin, rest @ ..]
                if *vendor == NAMESPACE_PREFIX[0] && *plugin == NAMESPACE_PREFIX[1] =>
            {
                rest
            }
            _ => return Err(unknown()),
        };

        match rest {
            ["compute", op] => Ok(MetricTarget::compute(op.parse().map_err(|_| unknown())?)),
            ["memory", op] => Ok(MetricTarget::memory(op.parse().map_err(|_| unknown())?)),
            ["storage", device, .., op] if !device.is_empty() => Ok(MetricTarget::storage(
                *device,
                op.parse().map_err(|_| unknown())?,
            )),
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for MetricIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for MetricIdentifier {
    type Err = CollectError;

    /// Parses `/intel/use/memory/utilization`; the leading `/` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix('/').unwrap_or(s);
        if trimmed.is_empty() {
            return Err(CollectError::UnknownMetric(s.to_string()));
        }
        Ok(Self::new(trimmed.split('/')))
    }
}

impl Serialize for MetricIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resource domain of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Compute,
    Storage,
    Memory,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Compute => "compute",
            Domain::Storage => "storage",
            Domain::Memory => "memory",
        }
    }
}

/// USE operation evaluated by a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Utilization,
    Saturation,
}

impl Operation {
    /// Every operation, in catalog order.
    pub const ALL: [Operation; 2] = [Operation::Utilization, Operation::Saturation];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Utilization => "utilization",
            Operation::Saturation => "saturation",
        }
    }
}

impl FromStr for Operation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "utilization" => Ok(Operation::Utilization),
            "saturation" => Ok(Operation::Saturation),
            _ => Err(()),
        }
    }
}

/// A resolved metric request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricTarget {
    pub domain: Domain,
    /// Block device name; set only for [`Domain::Storage`].
    pub device: Option<String>,
    pub operation: Operation,
}

impl MetricTarget {
    pub fn compute(operation: Operation) -> Self {
        Self {
            domain: Domain::Compute,
            device: None,
            operation,
        }
    }

    pub fn storage(device: impl Into<String>, operation: Operation) -> Self {
        Self {
            domain: Domain::Storage,
            device: Some(device.into()),
            operation,
        }
    }

    pub fn memory(operation: Operation) -> Self {
        Self {
            domain: Domain::Memory,
            device: None,
            operation,
        }
    }

    /// Builds the identifier that resolves back to this target.
    pub fn identifier(&self) -> MetricIdentifier {
        let mut segments: Vec<&str> = NAMESPACE_PREFIX.to_vec();
        segments.push(self.domain.as_str());
        if let Some(device) = &self.device {
            segments.push(device);
        }
        segments.push(self.operation.as_str());
        MetricIdentifier::new(segments)
    }
}
