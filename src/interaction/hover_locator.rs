use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::api::PlotProjection;
use crate::core::Sample;

/// Nearest-sample lookup under the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverLocator;

impl HoverLocator {
    /// Sample nearest in time to the pointer column, or `None` outside the
    /// plot box.
    ///
    /// `samples` must be time-ordered. Of the two neighbours around the binary
    /// search insertion point, the closer one wins; on a tie the later sample
    /// is returned.
    #[must_use]
    pub fn locate(
        x: f64,
        y: f64,
        samples: &[Sample],
        projection: &PlotProjection,
    ) -> Option<Sample> {
        if samples.is_empty() || !projection.bounds.contains(x, y) {
            return None;
        }
        let target = projection.time_at(x)?;
        Self::nearest_to_time(samples, target)
    }

    /// Binary-search nearest neighbour on a time-ordered slice.
    #[must_use]
    pub fn nearest_to_time(samples: &[Sample], target: f64) -> Option<Sample> {
        if samples.is_empty() || !target.is_finite() {
            return None;
        }
        let index = samples
            .partition_point(|sample| (sample.t as f64) < target)
            .min(samples.len() - 1);

        let mut candidates: SmallVec<[(OrderedFloat<f64>, Sample); 2]> = SmallVec::new();
        candidates.push(distance(samples[index], target));
        if index > 0 {
            candidates.push(distance(samples[index - 1], target));
        }

        candidates
            .into_iter()
            .min_by_key(|item| item.0)
            .map(|(_, sample)| sample)
    }
}

fn distance(sample: Sample, target: f64) -> (OrderedFloat<f64>, Sample) {
    (OrderedFloat((sample.t as f64 - target).abs()), sample)
}
