use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::Sample;
use crate::core::windowing::{apply_hard_cap, canonicalize_samples, prune_window};
use crate::error::{ChartError, ChartResult};

/// Ingestion and retention tuning for one [`SampleBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferPolicy {
    /// Minimum spacing between consecutive samples. `0` disables the rule.
    pub min_step_ms: i64,
    /// Absolute per-series bound, independent of any window.
    pub hard_cap: usize,
    /// Fraction of `hard_cap` kept (newest first) once the cap is exceeded.
    pub hard_cap_retain_ratio: f64,
    /// Share of a compacted window reserved for the oldest samples.
    pub head_fraction: f64,
    /// Lower bound for the head share before it is clamped to half the capacity.
    pub min_head_points: usize,
    /// Raw samples kept when windowing would leave fewer than two points.
    pub rescue_points: usize,
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self {
            min_step_ms: 5_000,
            hard_cap: 10_000,
            hard_cap_retain_ratio: 0.8,
            head_fraction: 0.4,
            min_head_points: 50,
            rescue_points: 10,
        }
    }
}

impl BufferPolicy {
    pub fn validate(self) -> ChartResult<Self> {
        if self.min_step_ms < 0 {
            return Err(ChartError::InvalidData(
                "buffer min step must be >= 0".to_owned(),
            ));
        }
        if self.rescue_points < 2 {
            return Err(ChartError::InvalidData(
                "buffer rescue points must be >= 2".to_owned(),
            ));
        }
        if self.hard_cap < self.rescue_points {
            return Err(ChartError::InvalidData(
                "buffer hard cap must be >= rescue points".to_owned(),
            ));
        }
        if !self.hard_cap_retain_ratio.is_finite()
            || self.hard_cap_retain_ratio <= 0.0
            || self.hard_cap_retain_ratio > 1.0
        {
            return Err(ChartError::InvalidData(
                "buffer hard cap retain ratio must be in (0, 1]".to_owned(),
            ));
        }
        if !self.head_fraction.is_finite() || !(0.0..=1.0).contains(&self.head_fraction) {
            return Err(ChartError::InvalidData(
                "buffer head fraction must be in [0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// What [`SampleBuffer::append`] did with a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppendOutcome {
    /// Pushed after the current newest sample.
    Appended,
    /// Same timestamp as an existing sample with a different value.
    Replaced,
    /// Older than the newest sample and placed in time order.
    Inserted,
    /// Exact copy of the newest sample.
    Duplicate,
    /// Closer than the minimum step to the newest sample, or older than it.
    TooSoon,
    /// Non-finite value.
    Rejected,
}

impl AppendOutcome {
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Appended | Self::Replaced | Self::Inserted)
    }
}

/// Time-ordered, capacity-bounded samples for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
    policy: BufferPolicy,
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new(BufferPolicy::default())
    }
}

impl SampleBuffer {
    #[must_use]
    pub fn new(policy: BufferPolicy) -> Self {
        Self {
            samples: Vec::new(),
            policy,
        }
    }

    /// Builds a buffer from arbitrary samples (sorted, deduplicated, capped).
    #[must_use]
    pub fn with_samples(policy: BufferPolicy, samples: Vec<Sample>) -> Self {
        let mut buffer = Self::new(policy);
        buffer.replace_all(samples);
        buffer
    }

    #[must_use]
    pub fn policy(&self) -> BufferPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: BufferPolicy) {
        self.policy = policy;
        apply_hard_cap(&mut self.samples, &self.policy);
    }

    /// Ingests one live sample.
    ///
    /// - an exact copy of the newest sample is ignored
    /// - an equal timestamp with a different value replaces the newest sample
    /// - with a minimum step configured, samples closer than the step to the
    ///   newest sample (including older ones) are dropped
    /// - without a minimum step, older samples are inserted in time order
    pub fn append(&mut self, sample: Sample) -> AppendOutcome {
        if !sample.is_finite() {
            return AppendOutcome::Rejected;
        }

        let Some(last) = self.samples.last().copied() else {
            self.samples.push(sample);
            return AppendOutcome::Appended;
        };

        let outcome = if sample.t == last.t {
            if sample.y == last.y {
                AppendOutcome::Duplicate
            } else {
                if let Some(slot) = self.samples.last_mut() {
                    *slot = sample;
                }
                AppendOutcome::Replaced
            }
        } else if self.policy.min_step_ms > 0
            && sample.t.saturating_sub(last.t) < self.policy.min_step_ms
        {
            AppendOutcome::TooSoon
        } else if sample.t < last.t {
            self.insert_ordered(sample)
        } else {
            self.samples.push(sample);
            AppendOutcome::Appended
        };

        if matches!(outcome, AppendOutcome::Appended | AppendOutcome::Inserted) {
            self.enforce_hard_cap();
        }
        trace!(t = sample.t, ?outcome, len = self.samples.len(), "append sample");
        outcome
    }

    /// Merges a batch (for example a range query result) into the buffer.
    ///
    /// Incoming samples win on equal timestamps. Returns the resulting length.
    pub fn merge(&mut self, samples: impl IntoIterator<Item = Sample>) -> usize {
        let mut combined = std::mem::take(&mut self.samples);
        combined.extend(samples);
        self.samples = canonicalize_samples(combined);
        self.enforce_hard_cap();
        self.samples.len()
    }

    /// Replaces the buffer contents.
    pub fn replace_all(&mut self, samples: Vec<Sample>) {
        self.samples = canonicalize_samples(samples);
        self.enforce_hard_cap();
    }

    /// Applies the window/compaction policy in place and returns the result.
    pub fn prune(&mut self, now_ms: i64, window_ms: i64, max_points: usize) -> &[Sample] {
        let before = self.samples.len();
        self.samples = prune_window(&self.samples, now_ms, window_ms, max_points, &self.policy);
        if self.samples.len() != before {
            debug!(
                before,
                after = self.samples.len(),
                now_ms,
                window_ms,
                max_points,
                "pruned sample buffer"
            );
        }
        &self.samples
    }

    #[must_use]
    pub fn all(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn last(&self) -> Option<Sample> {
        self.samples.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    fn insert_ordered(&mut self, sample: Sample) -> AppendOutcome {
        let index = self.samples.partition_point(|existing| existing.t < sample.t);
        match self.samples.get_mut(index) {
            Some(existing) if existing.t == sample.t => {
                if existing.y == sample.y {
                    AppendOutcome::Duplicate
                } else {
                    *existing = sample;
                    AppendOutcome::Replaced
                }
            }
            _ => {
                self.samples.insert(index, sample);
                AppendOutcome::Inserted
            }
        }
    }

    fn enforce_hard_cap(&mut self) {
        let before = self.samples.len();
        apply_hard_cap(&mut self.samples, &self.policy);
        if self.samples.len() != before {
            debug!(
                before,
                after = self.samples.len(),
                hard_cap = self.policy.hard_cap,
                "compacted sample buffer at hard cap"
            );
        }
    }
}
