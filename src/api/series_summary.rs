use serde::{Deserialize, Serialize};

use crate::core::Sample;

/// Latest reading of a series and its change against the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub latest: Sample,
    pub previous: Option<Sample>,
    /// `latest - previous`.
    pub change: Option<f64>,
    /// Change relative to `previous`; absent when `previous` is zero.
    pub change_percent: Option<f64>,
}

impl SeriesSummary {
    #[must_use]
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let (latest, rest) = samples.split_last()?;
        let previous = rest.last().copied();
        let change = previous.map(|prev| latest.y - prev.y);
        let change_percent = previous
            .zip(change)
            .filter(|(prev, _)| prev.y != 0.0)
            .map(|(prev, change)| change / prev.y * 100.0);
        Some(Self {
            latest: *latest,
            previous,
            change,
            change_percent,
        })
    }

    #[must_use]
    pub fn latest_time_ms(&self) -> i64 {
        self.latest.t
    }
}
