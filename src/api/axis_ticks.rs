/// Vertical grid divisions across the time axis (7 lines including edges).
pub const TIME_GRID_DIVISIONS: usize = 6;

const EMPTY_SCALE_MAX: f64 = 10.0;

/// Snapped value axis: `0..=nice_max` split into `divisions` steps of `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueAxis {
    pub step: f64,
    pub nice_max: f64,
    pub divisions: usize,
}

impl ValueAxis {
    /// Gridline values from top (`nice_max`) to bottom (`0`).
    pub fn gridline_values(self) -> impl Iterator<Item = f64> {
        let divisions = self.divisions.max(1);
        (0..=divisions).map(move |i| self.nice_max - self.nice_max * i as f64 / divisions as f64)
    }
}

/// Snaps a data maximum to a round ceiling.
///
/// `step = ceil(max / 7) * 5` and `nice_max = ceil(max / step) * step`. A
/// non-positive or non-finite maximum is treated as 10.
#[must_use]
pub fn value_axis(data_max: f64) -> ValueAxis {
    let max = if data_max.is_finite() && data_max > 0.0 {
        data_max
    } else {
        EMPTY_SCALE_MAX
    };
    let step = (max / 7.0).ceil() * 5.0;
    let divisions = (max / step).ceil().max(1.0);
    ValueAxis {
        step,
        nice_max: divisions * step,
        divisions: divisions as usize,
    }
}

/// Evenly spaced times for the vertical grid, both edges included.
#[must_use]
pub fn time_grid_ticks(x_min: i64, span_ms: i64, divisions: usize) -> Vec<f64> {
    let divisions = divisions.max(1);
    let span = span_ms.max(1) as f64;
    (0..=divisions)
        .map(|i| x_min as f64 + span * i as f64 / divisions as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{time_grid_ticks, value_axis};

    #[test]
    fn snaps_to_round_ceiling() {
        let axis = value_axis(100.0);
        assert_eq!(axis.step, 75.0);
        assert_eq!(axis.nice_max, 150.0);
        assert_eq!(axis.divisions, 2);

        let axis = value_axis(3.2);
        assert_eq!(axis.step, 5.0);
        assert_eq!(axis.nice_max, 5.0);
        assert_eq!(axis.divisions, 1);
    }

    #[test]
    fn zero_or_negative_maximum_uses_ten() {
        assert_eq!(value_axis(0.0), value_axis(10.0));
        assert_eq!(value_axis(-42.0).nice_max, 10.0);
        assert_eq!(value_axis(f64::NAN).nice_max, 10.0);
    }

    #[test]
    fn gridline_values_run_top_to_bottom() {
        let values: Vec<f64> = value_axis(100.0).gridline_values().collect();
        assert_eq!(values, vec![150.0, 75.0, 0.0]);
    }

    #[test]
    fn time_grid_includes_both_edges() {
        let ticks = time_grid_ticks(0, 6_000, 6);
        assert_eq!(ticks.len(), 7);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(ticks[6], 6_000.0);
    }
}
