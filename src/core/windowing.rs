use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::Sample;
use crate::core::sample_buffer::BufferPolicy;

/// Which range a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowMode {
    /// Rolling window ending at the newest sample.
    Live,
    /// Full buffer, bounded by an explicit range query.
    Historical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartWindow {
    pub mode: WindowMode,
    pub window_ms: i64,
}

impl ChartWindow {
    #[must_use]
    pub const fn live(window_ms: i64) -> Self {
        Self {
            mode: WindowMode::Live,
            window_ms,
        }
    }

    #[must_use]
    pub const fn historical(window_ms: i64) -> Self {
        Self {
            mode: WindowMode::Historical,
            window_ms,
        }
    }

    /// Visible `(start, end)` bounds for a series whose newest sample is `last_t`.
    ///
    /// Live mode yields `[last_t - window_ms, last_t]`; Historical mode and
    /// empty series yield no bounds.
    #[must_use]
    pub fn visible_bounds(self, last_t: Option<i64>) -> (Option<i64>, Option<i64>) {
        match (self.mode, last_t) {
            (WindowMode::Live, Some(last)) => (Some(last.saturating_sub(self.window_ms)), Some(last)),
            _ => (None, None),
        }
    }
}

/// Returns samples inside an inclusive window; missing bounds are open.
#[must_use]
pub fn samples_in_time_window(
    samples: &[Sample],
    start: Option<i64>,
    end: Option<i64>,
) -> Vec<Sample> {
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) if s > e => (Some(e), Some(s)),
        bounds => bounds,
    };

    samples
        .iter()
        .copied()
        .filter(|sample| sample.is_finite())
        .filter(|sample| start.is_none_or(|s| sample.t >= s))
        .filter(|sample| end.is_none_or(|e| sample.t <= e))
        .collect()
}

/// Keeps at most `max_points` of the newest samples.
#[must_use]
pub fn most_recent(samples: &[Sample], max_points: usize) -> &[Sample] {
    let skip = samples.len().saturating_sub(max_points);
    &samples[skip..]
}

/// Drops non-finite samples, sorts by time and keeps the last value per timestamp.
#[must_use]
pub fn canonicalize_samples(mut samples: Vec<Sample>) -> Vec<Sample> {
    let original_len = samples.len();
    samples.retain(|sample| sample.is_finite());
    samples.sort_by_key(|sample| sample.t);

    let mut deduped: Vec<Sample> = Vec::with_capacity(samples.len());
    let mut duplicate_count = 0_usize;
    for sample in samples {
        if let Some(last) = deduped.last_mut() {
            if last.t == sample.t {
                *last = sample;
                duplicate_count += 1;
                continue;
            }
        }
        deduped.push(sample);
    }

    let filtered_count = original_len.saturating_sub(deduped.len() + duplicate_count);
    if filtered_count > 0 {
        warn!(
            filtered_count,
            duplicate_count,
            canonical_count = deduped.len(),
            "dropped non-finite samples"
        );
    }
    deduped
}

/// Trims a time-ordered sequence to the retained share of the hard cap.
pub fn apply_hard_cap(samples: &mut Vec<Sample>, policy: &BufferPolicy) {
    let cap = policy.hard_cap.max(1);
    if samples.len() <= cap {
        return;
    }
    let keep = ((cap as f64) * policy.hard_cap_retain_ratio).floor() as usize;
    let keep = keep.clamp(1, cap);
    let drop = samples.len() - keep;
    samples.drain(..drop);
}

/// Head share of a compacted window.
#[must_use]
pub fn compaction_head_len(max_points: usize, policy: &BufferPolicy) -> usize {
    let by_fraction = ((max_points as f64) * policy.head_fraction).floor() as usize;
    by_fraction
        .max(policy.min_head_points)
        .min(max_points / 2)
}

/// Windowing and compaction policy applied by [`crate::core::SampleBuffer::prune`].
///
/// 1. sort and deduplicate by timestamp
/// 2. drop samples older than `now_ms - window_ms`
/// 3. above `max_points`, keep a head of the oldest in-window samples plus the
///    newest remainder
/// 4. if fewer than two samples survive while the input had at least two,
///    keep the newest `rescue_points` raw samples instead
/// 5. apply the hard cap
#[must_use]
pub fn prune_window(
    samples: &[Sample],
    now_ms: i64,
    window_ms: i64,
    max_points: usize,
    policy: &BufferPolicy,
) -> Vec<Sample> {
    let canonical = canonicalize_samples(samples.to_vec());
    let cutoff = now_ms.saturating_sub(window_ms.max(0));
    let max_points = max_points.max(2);

    let mut pruned: Vec<Sample> = canonical
        .iter()
        .copied()
        .filter(|sample| sample.t >= cutoff)
        .collect();

    if pruned.len() > max_points {
        let head = compaction_head_len(max_points, policy);
        let tail = max_points - head;
        let mut compacted = Vec::with_capacity(max_points);
        compacted.extend_from_slice(&pruned[..head]);
        compacted.extend_from_slice(&pruned[pruned.len() - tail..]);
        pruned = compacted;
    }

    if pruned.len() < 2 && canonical.len() >= 2 {
        let keep = policy.rescue_points.max(2).min(canonical.len());
        pruned = canonical[canonical.len() - keep..].to_vec();
    }

    apply_hard_cap(&mut pruned, policy);
    pruned
}

#[cfg(test)]
mod tests {
    use super::{BufferPolicy, compaction_head_len, most_recent};
    use crate::core::Sample;

    #[test]
    fn head_share_never_exceeds_half_capacity() {
        let policy = BufferPolicy::default();
        assert_eq!(compaction_head_len(44, &policy), 22);
        assert_eq!(compaction_head_len(200, &policy), 80);
        assert_eq!(compaction_head_len(120, &policy), 50);
    }

    #[test]
    fn most_recent_keeps_tail() {
        let samples: Vec<Sample> = (0..5).map(|i| Sample::new(i, i as f64)).collect();
        let tail = most_recent(&samples, 2);
        assert_eq!(tail, &[Sample::new(3, 3.0), Sample::new(4, 4.0)]);
        assert_eq!(most_recent(&samples, 10).len(), 5);
    }
}
