//! Two-point sampling of monotonic counters.
//!
//! A [`TwoPointSampler`] walks `Created -> Sampled(last) -> Sampled(current)`
//! and is consumed by [`TwoPointSampler::finish`], which yields the
//! [`SampleWindow`] a formula is evaluated over. The `last` read always
//! strictly precedes the `current` read.

use std::time::Duration;

use crate::collector::error::CollectError;

/// Pause between the `last` and `current` reads of delta metrics.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(10);

/// A pair of counter snapshots taken in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow<T> {
    pub last: T,
    pub current: T,
}

#[derive(Debug)]
enum Phase<T> {
    Created,
    Last(T),
    Current(SampleWindow<T>),
}

/// State machine holding the `last` and `current` snapshots of one calculation.
#[derive(Debug)]
pub struct TwoPointSampler<T> {
    phase: Phase<T>,
}

impl<T> Default for TwoPointSampler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TwoPointSampler<T> {
    pub fn new() -> Self {
        Self {
            phase: Phase::Created,
        }
    }

    /// Records the next snapshot: the first call fills `last`, the second `current`.
    pub fn record(&mut self, sample: T) -> Result<(), CollectError> {
        let phase = std::mem::replace(&mut self.phase, Phase::Created);
        self.phase = match phase {
            Phase::Created => Phase::Last(sample),
            Phase::Last(last) => Phase::Current(SampleWindow {
                last,
                current: sample,
            }),
            Phase::Current(window) => {
                self.phase = Phase::Current(window);
                return Err(CollectError::Sampling(
                    "both samples already recorded".to_string(),
                ));
            }
        };
        Ok(())
    }

    /// Consumes the sampler, returning the completed window.
    pub fn finish(self) -> Result<SampleWindow<T>, CollectError> {
        match self.phase {
            Phase::Current(window) => Ok(window),
            Phase::Created => Err(CollectError::Sampling("no samples recorded".to_string())),
            Phase::Last(_) => Err(CollectError::Sampling(
                "current sample missing".to_string(),
            )),
        }
    }
}

/// Reads a snapshot twice, optionally sleeping in between.
///
/// `read` is invoked exactly twice and in order; any failure aborts the window.
pub fn sample_twice<T, R>(pause: Option<Duration>, mut read: R) -> Result<SampleWindow<T>, CollectError>
where
    R: FnMut() -> Result<T, CollectError>,
{
    let mut sampler = TwoPointSampler::new();
    sampler.record(read()?)?;
    if let Some(pause) = pause {
        std::thread::sleep(pause);
    }
    sampler.record(read()?)?;
    sampler.finish()
}
