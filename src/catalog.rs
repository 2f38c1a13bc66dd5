//! Metric catalog: every identifier the engine can produce.

use crate::namespace::{MetricIdentifier, MetricTarget, Operation};

/// Compute metrics: one per operation.
pub fn compute_metric_types() -> Vec<MetricIdentifier> {
    Operation::ALL
        .iter()
        .map(|op| MetricTarget::compute(*op).identifier())
        .collect()
}

/// Storage metrics: every device crossed with every operation.
pub fn storage_metric_types(devices: &[String]) -> Vec<MetricIdentifier> {
    devices
        .iter()
        .flat_map(|device| {
            Operation::ALL
                .iter()
                .map(move |op| MetricTarget::storage(device.as_str(), *op).identifier())
        })
        .collect()
}

/// Memory metrics: one per operation.
pub fn memory_metric_types() -> Vec<MetricIdentifier> {
    Operation::ALL
        .iter()
        .map(|op| MetricTarget::memory(*op).identifier())
        .collect()
}

/// Full catalog in compute, storage, memory order.
pub fn metric_types(devices: &[String]) -> Vec<MetricIdentifier> {
    let mut mts = compute_metric_types();
    mts.extend(storage_metric_types(devices));
    mts.extend(memory_metric_types());
    mts
}
