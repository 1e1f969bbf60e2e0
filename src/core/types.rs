use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Raster size in physical (backing) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One timestamped reading: epoch milliseconds and a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub t: i64,
    pub y: f64,
}

impl Sample {
    #[must_use]
    pub const fn new(t: i64, y: f64) -> Self {
        Self { t, y }
    }

    /// Builds a sample, rejecting non-finite values.
    pub fn checked(t: i64, y: f64) -> ChartResult<Self> {
        if !y.is_finite() {
            return Err(ChartError::InvalidData(
                "sample value must be finite".to_owned(),
            ));
        }
        Ok(Self { t, y })
    }

    #[must_use]
    pub fn from_datetime(time: DateTime<Utc>, y: f64) -> Self {
        Self {
            t: time.timestamp_millis(),
            y,
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.y.is_finite()
    }
}

const FALLBACK_CSS_WIDTH: f64 = 600.0;
const FALLBACK_CSS_HEIGHT: f64 = 300.0;

/// Displayed canvas size in CSS pixels plus the device pixel ratio.
///
/// Unset (zero or non-finite) sizes fall back to 600x300 and an unusable
/// pixel ratio falls back to 1.0, so a freshly mounted canvas still paints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSurface {
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
}

impl CanvasSurface {
    #[must_use]
    pub const fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            css_width,
            css_height,
            device_pixel_ratio,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        if self.css_width.is_finite() && self.css_width > 0.0 {
            self.css_width
        } else {
            FALLBACK_CSS_WIDTH
        }
    }

    #[must_use]
    pub fn height(self) -> f64 {
        if self.css_height.is_finite() && self.css_height > 0.0 {
            self.css_height
        } else {
            FALLBACK_CSS_HEIGHT
        }
    }

    #[must_use]
    pub fn pixel_ratio(self) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }

    /// Backing raster size: displayed size scaled by the pixel ratio.
    #[must_use]
    pub fn backing_viewport(self) -> Viewport {
        let ratio = self.pixel_ratio();
        let width = (self.width() * ratio).round().max(1.0) as u32;
        let height = (self.height() * ratio).round().max(1.0) as u32;
        Viewport::new(width, height)
    }
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new(FALLBACK_CSS_WIDTH, FALLBACK_CSS_HEIGHT, 1.0)
    }
}
