use crate::core::{CanvasSurface, LinearScale};

use super::PlotPadding;
use super::axis_ticks::ValueAxis;

/// Interior plot box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotBounds {
    /// Plot box of `surface` inset by `padding`. A canvas smaller than its
    /// padding collapses the box to zero size instead of inverting it.
    #[must_use]
    pub fn from_surface(surface: CanvasSurface, padding: PlotPadding) -> Self {
        let left = padding.left.max(0.0);
        let top = padding.top.max(0.0);
        let right = (surface.width() - padding.right.max(0.0)).max(left);
        let bottom = (surface.height() - padding.bottom.max(0.0)).max(top);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    /// Inclusive hit test.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Data-to-pixel mapping of one rendered chart.
///
/// Produced by the frame builder and reused by hover lookup so both agree on
/// where every sample sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotProjection {
    pub bounds: PlotBounds,
    pub x_min: i64,
    pub x_max: i64,
    pub value_axis: ValueAxis,
    x_scale: LinearScale,
    y_scale: LinearScale,
}

impl PlotProjection {
    /// `x_min..=x_max` is widened to at least 1 ms; the value domain is
    /// `0..=value_axis.nice_max`.
    #[must_use]
    pub fn new(bounds: PlotBounds, x_min: i64, x_max: i64, value_axis: ValueAxis) -> Option<Self> {
        let x_span = x_max.saturating_sub(x_min).max(1);
        let x_scale = LinearScale::new(
            x_min as f64,
            x_min as f64 + x_span as f64,
            bounds.left,
            bounds.right,
        )
        .ok()?;
        let y_scale =
            LinearScale::new(0.0, value_axis.nice_max, bounds.bottom, bounds.top).ok()?;
        Some(Self {
            bounds,
            x_min,
            x_max,
            value_axis,
            x_scale,
            y_scale,
        })
    }

    /// Time span used for scaling and label selection.
    #[must_use]
    pub fn x_span_ms(&self) -> i64 {
        self.x_max.saturating_sub(self.x_min).max(1)
    }

    #[must_use]
    pub fn x_for_time(&self, t: f64) -> f64 {
        self.x_scale.to_pixel(t)
    }

    #[must_use]
    pub fn y_for_value(&self, value: f64) -> f64 {
        self.y_scale.to_pixel(value)
    }

    /// Inverse of [`PlotProjection::x_for_time`].
    #[must_use]
    pub fn time_at(&self, x: f64) -> Option<f64> {
        self.x_scale.to_domain(x).ok()
    }
}
