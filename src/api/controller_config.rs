use serde::{Deserialize, Serialize};

use crate::core::BufferPolicy;
use crate::error::{ChartError, ChartResult};

const HOUR_MS: i64 = 60 * 60 * 1_000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Range selectable in Historical mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoricalRange {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "custom")]
    Custom { start_ms: i64, end_ms: i64 },
}

impl HistoricalRange {
    pub const PRESETS: [Self; 7] = [
        Self::OneHour,
        Self::SixHours,
        Self::OneDay,
        Self::FiveDays,
        Self::OneMonth,
        Self::SixMonths,
        Self::OneYear,
    ];

    /// Inclusive `(start_ms, end_ms)` of the range ending at `now_ms`.
    #[must_use]
    pub fn bounds(self, now_ms: i64) -> (i64, i64) {
        let span = match self {
            Self::OneHour => HOUR_MS,
            Self::SixHours => 6 * HOUR_MS,
            Self::OneDay => DAY_MS,
            Self::FiveDays => 5 * DAY_MS,
            Self::OneMonth => 30 * DAY_MS,
            Self::SixMonths => 182 * DAY_MS,
            Self::OneYear => 365 * DAY_MS,
            Self::Custom { start_ms, end_ms } => return (start_ms, end_ms),
        };
        (now_ms.saturating_sub(span), now_ms)
    }

    pub fn validate(self) -> ChartResult<Self> {
        if let Self::Custom { start_ms, end_ms } = self {
            if start_ms >= end_ms {
                return Err(ChartError::InvalidData(
                    "custom historical range must have start < end".to_owned(),
                ));
            }
        }
        Ok(self)
    }
}

/// Tuning of a [`crate::api::ChartController`].
///
/// Serializable so dashboards can keep it next to their parameter settings;
/// every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub live_window_ms: i64,
    pub live_window_presets_ms: Vec<i64>,
    pub buffer: BufferPolicy,
    /// Expected spacing of live samples, used to size the live window.
    pub sample_cadence_ms: i64,
    pub prune_headroom_points: usize,
    pub render_point_divisor_ms: i64,
    pub render_headroom_points: usize,
    pub render_min_points: usize,
    pub expanded_max_points: usize,
    /// Record limit of the backfill issued when entering Live mode.
    pub backfill_limit: usize,
    /// Record limit of Historical range queries.
    pub historical_limit: usize,
    pub live_poll_interval_ms: i64,
    pub historical_poll_interval_ms: i64,
    pub stack_id: Option<String>,
    pub utc_offset_minutes: i32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            live_window_ms: 300_000,
            live_window_presets_ms: vec![120_000, 300_000, 600_000, 1_200_000],
            buffer: BufferPolicy::default(),
            sample_cadence_ms: 5_000,
            prune_headroom_points: 20,
            render_point_divisor_ms: 10_000,
            render_headroom_points: 20,
            render_min_points: 120,
            expanded_max_points: 300,
            backfill_limit: 10_000,
            historical_limit: 50_000,
            live_poll_interval_ms: 5_000,
            historical_poll_interval_ms: 10_000,
            stack_id: None,
            utc_offset_minutes: 0,
        }
    }
}

impl ControllerConfig {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()
    }

    pub fn to_json_string_pretty(&self) -> ChartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(self) -> ChartResult<Self> {
        if self.live_window_presets_ms.is_empty()
            || self.live_window_presets_ms.iter().any(|window| *window <= 0)
        {
            return Err(ChartError::InvalidData(
                "live window presets must be non-empty and > 0".to_owned(),
            ));
        }
        self.check_live_window(self.live_window_ms)?;
        for (name, value) in [
            ("sample cadence", self.sample_cadence_ms),
            ("render point divisor", self.render_point_divisor_ms),
            ("live poll interval", self.live_poll_interval_ms),
            ("historical poll interval", self.historical_poll_interval_ms),
        ] {
            if value <= 0 {
                return Err(ChartError::InvalidData(format!("{name} must be > 0")));
            }
        }
        if self.backfill_limit == 0 || self.historical_limit == 0 {
            return Err(ChartError::InvalidData(
                "query limits must be > 0".to_owned(),
            ));
        }
        if self.expanded_max_points == 0 || self.render_min_points == 0 {
            return Err(ChartError::InvalidData(
                "render point counts must be > 0".to_owned(),
            ));
        }
        self.buffer.validate()?;
        Ok(self)
    }

    /// Rejects windows that are not one of the configured presets.
    pub fn check_live_window(&self, window_ms: i64) -> ChartResult<()> {
        if !self.live_window_presets_ms.contains(&window_ms) {
            return Err(ChartError::InvalidData(format!(
                "live window {window_ms} ms is not one of {:?}",
                self.live_window_presets_ms
            )));
        }
        Ok(())
    }

    /// Points kept per series by live pruning: `ceil(window / cadence) + headroom`.
    #[must_use]
    pub fn live_prune_capacity(&self, window_ms: i64) -> usize {
        ceil_div(window_ms, self.sample_cadence_ms) + self.prune_headroom_points
    }

    /// Points drawn per card: `max(ceil(window / divisor) + headroom, min)`.
    #[must_use]
    pub fn render_capacity(&self, window_ms: i64) -> usize {
        (ceil_div(window_ms, self.render_point_divisor_ms) + self.render_headroom_points)
            .max(self.render_min_points)
    }
}

fn ceil_div(value: i64, divisor: i64) -> usize {
    if value <= 0 || divisor <= 0 {
        return 0;
    }
    let quotient = value.unsigned_abs().div_ceil(divisor.unsigned_abs());
    usize::try_from(quotient).unwrap_or(usize::MAX)
}
