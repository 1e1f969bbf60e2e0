mod hover_locator;

use serde::{Deserialize, Serialize};

use crate::core::Sample;

pub use hover_locator::HoverLocator;

/// Tooltip content for the sample under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverTooltip {
    pub series: String,
    pub label: String,
    pub unit: String,
    /// `HH:MM:SS` in the configured offset.
    pub time_label: String,
    pub value: f64,
    pub sample: Sample,
    /// Pixel position of the sample on its canvas.
    pub x: f64,
    pub y: f64,
}

/// Pointer position and the tooltip it currently resolves to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoverState {
    pointer: Option<(String, f64, f64)>,
    tooltip: Option<HoverTooltip>,
}

impl HoverState {
    pub fn on_pointer_move(&mut self, series: &str, x: f64, y: f64) {
        self.pointer = Some((series.to_owned(), x, y));
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
        self.tooltip = None;
    }

    pub fn set_tooltip(&mut self, tooltip: Option<HoverTooltip>) {
        self.tooltip = tooltip;
    }

    /// Series and CSS position of the pointer, if it is over a canvas.
    #[must_use]
    pub fn pointer(&self) -> Option<(&str, f64, f64)> {
        self.pointer
            .as_ref()
            .map(|(series, x, y)| (series.as_str(), *x, *y))
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&HoverTooltip> {
        self.tooltip.as_ref()
    }
}
