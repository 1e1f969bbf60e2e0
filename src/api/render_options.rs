use serde::{Deserialize, Serialize};

use crate::core::Sample;
use crate::render::Color;

/// Point-marker policy for series with at least two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerMode {
    /// A marker is drawn only once it is `marker_pixel_gap` px right of the
    /// previously drawn one.
    #[default]
    Auto,
    All,
    None,
}

/// Space between the canvas edge and the plot box, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPadding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for PlotPadding {
    fn default() -> Self {
        Self {
            left: 60.0,
            right: 70.0,
            top: 40.0,
            bottom: 40.0,
        }
    }
}

/// Colors and font sizes of the dark dashboard theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartTheme {
    pub background: Color,
    pub grid_line: Color,
    pub axis_label: Color,
    pub title: Color,
    pub no_data_text: Color,
    pub now_line: Color,
    pub marker_outline: Color,
    pub value_pill_fill: Color,
    pub value_pill_text: Color,
    pub baseline_line: Color,
    pub baseline_label: Color,
    pub crosshair: Color,
    /// Series colors by position, used when a series has no explicit color.
    pub palette: Vec<Color>,
    pub axis_font_px: f64,
    pub title_font_px: f64,
    pub label_font_px: f64,
    pub no_data_font_px: f64,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u32(0x0f172a),
            grid_line: Color::from_rgb_u32(0x1e293b),
            axis_label: Color::from_rgb_u32(0x64748b),
            title: Color::from_rgb_u32(0xf8fafc),
            no_data_text: Color::from_rgb_u32(0x94a3b8),
            now_line: Color::from_rgb_u32(0x94a3b8),
            marker_outline: Color::from_rgb_u32(0x0b1220),
            value_pill_fill: Color::from_rgb_u32(0x0b1220),
            value_pill_text: Color::from_rgb_u32(0xe2e8f0),
            baseline_line: Color::from_rgb_u32(0x64748b),
            baseline_label: Color::from_rgb_u32(0xcbd5e1),
            crosshair: Color::from_rgb_u32(0xe2e8f0),
            palette: [
                0x10b981, 0x3b82f6, 0xf59e0b, 0xef4444, 0x22d3ee, 0x8b5cf6, 0xf97316, 0xec4899,
            ]
            .into_iter()
            .map(Color::from_rgb_u32)
            .collect(),
            axis_font_px: 11.0,
            title_font_px: 16.0,
            label_font_px: 12.0,
            no_data_font_px: 13.0,
        }
    }
}

impl ChartTheme {
    /// Palette color for the series at `index`; white if the palette is empty.
    #[must_use]
    pub fn palette_color(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return Color::rgb(1.0, 1.0, 1.0);
        }
        self.palette[index % self.palette.len()]
    }
}

/// Per-call drawing options for [`crate::api::ChartRenderer::render`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub title: String,
    pub unit: String,
    /// Most-recent samples kept per series after window filtering.
    pub max_points: usize,
    pub marker_mode: MarkerMode,
    pub marker_pixel_gap: f64,
    pub marker_radius: f64,
    /// Inclusive visible range in epoch ms; `None` leaves that side open.
    pub window_start: Option<i64>,
    pub window_end: Option<i64>,
    /// Reference value drawn as a dashed horizontal line.
    pub baseline: Option<f64>,
    /// Sample under the pointer; drawn with crosshair guides.
    pub hover: Option<Sample>,
    pub padding: PlotPadding,
    pub theme: ChartTheme,
    /// Offset applied to time labels.
    pub utc_offset_minutes: i32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::card()
    }
}

impl RenderOptions {
    /// Small dashboard tile: adaptive markers, 120 points.
    #[must_use]
    pub fn card() -> Self {
        Self {
            title: "Realtime Chart".to_owned(),
            unit: "ppm".to_owned(),
            max_points: 120,
            marker_mode: MarkerMode::Auto,
            marker_pixel_gap: 28.0,
            marker_radius: 2.5,
            window_start: None,
            window_end: None,
            baseline: None,
            hover: None,
            padding: PlotPadding::default(),
            theme: ChartTheme::default(),
            utc_offset_minutes: 0,
        }
    }

    /// Enlarged single-series view: every point marked, 300 points.
    #[must_use]
    pub fn expanded() -> Self {
        Self {
            max_points: 300,
            marker_mode: MarkerMode::All,
            marker_radius: 2.2,
            ..Self::card()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    #[must_use]
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    #[must_use]
    pub fn with_window(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.window_start = start;
        self.window_end = end;
        self
    }

    #[must_use]
    pub fn with_marker_mode(mut self, marker_mode: MarkerMode) -> Self {
        self.marker_mode = marker_mode;
        self
    }

    #[must_use]
    pub fn with_baseline(mut self, baseline: Option<f64>) -> Self {
        self.baseline = baseline;
        self
    }

    #[must_use]
    pub fn with_hover(mut self, hover: Option<Sample>) -> Self {
        self.hover = hover;
        self
    }

    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }
}
