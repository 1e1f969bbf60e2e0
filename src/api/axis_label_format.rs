use chrono::{DateTime, FixedOffset, Offset, Utc};

const DAY_MS: i64 = 24 * 60 * 60 * 1_000;
const PLACEHOLDER: &str = "--";

/// Offset for label rendering; out-of-range minutes fall back to UTC.
#[must_use]
pub fn utc_offset(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Value-axis label: integers without a decimal point, otherwise one decimal.
#[must_use]
pub fn format_value_label(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_owned();
    }
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Time-axis label whose granularity follows the visible span:
/// `HH:MM` up to one day, `Mon D` up to a week, `Mon 'YY` beyond.
#[must_use]
pub fn format_time_label(t_ms: f64, span_ms: i64, offset: FixedOffset) -> String {
    let pattern = if span_ms <= DAY_MS {
        "%H:%M"
    } else if span_ms <= 7 * DAY_MS {
        "%b %-d"
    } else {
        "%b '%y"
    };
    format_epoch_ms(t_ms, offset, pattern)
}

/// Tooltip time, `HH:MM:SS`.
#[must_use]
pub fn format_tooltip_time(t_ms: i64, offset: FixedOffset) -> String {
    format_epoch_ms(t_ms as f64, offset, "%H:%M:%S")
}

/// Latest-value pill text: two decimals then the unit.
#[must_use]
pub fn format_value_pill(value: f64, unit: &str) -> String {
    format!("{value:.2} {unit}").trim().to_owned()
}

/// Width estimate for proportional UI fonts, without a text shaper.
#[must_use]
pub fn estimate_text_width(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * font_px * 0.6
}

fn format_epoch_ms(t_ms: f64, offset: FixedOffset, pattern: &str) -> String {
    if !t_ms.is_finite() {
        return PLACEHOLDER.to_owned();
    }
    match DateTime::<Utc>::from_timestamp_millis(t_ms.round() as i64) {
        Some(time) => time.with_timezone(&offset).format(pattern).to_string(),
        None => PLACEHOLDER.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        format_time_label, format_tooltip_time, format_value_label, format_value_pill, utc_offset,
    };

    // 2025-09-12T08:30:15Z
    const T: i64 = 1_757_665_815_000;

    #[test]
    fn value_labels_drop_trailing_zero_decimals() {
        assert_eq!(format_value_label(150.0), "150");
        assert_eq!(format_value_label(7.5), "7.5");
        assert_eq!(format_value_label(3.333), "3.3");
    }

    #[test]
    fn time_label_granularity_tracks_span() {
        let utc = utc_offset(0);
        assert_eq!(format_time_label(T as f64, 3_600_000, utc), "08:30");
        assert_eq!(format_time_label(T as f64, 3 * 86_400_000, utc), "Sep 12");
        assert_eq!(format_time_label(T as f64, 90 * 86_400_000, utc), "Sep '25");
    }

    #[test]
    fn offsets_shift_labels() {
        assert_eq!(format_tooltip_time(T, utc_offset(7 * 60)), "15:30:15");
        assert_eq!(format_tooltip_time(T, utc_offset(i32::MAX)), "08:30:15");
    }

    #[test]
    fn pill_trims_missing_unit() {
        assert_eq!(format_value_pill(12.0, "ppm"), "12.00 ppm");
        assert_eq!(format_value_pill(12.0, ""), "12.00");
    }
}
