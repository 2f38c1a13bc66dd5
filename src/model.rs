//! Output records produced by the collector.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::collector::host::HostTags;
use crate::namespace::MetricIdentifier;

/// One measured value, stamped and tagged at collection time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub identifier: MetricIdentifier,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    /// Empty when host metadata could not be gathered.
    pub tags: HostTags,
}
