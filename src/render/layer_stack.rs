use serde::{Deserialize, Serialize};

/// Paint layers of one chart, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    Series,
    Overlay,
    Legend,
}

impl CanvasLayerKind {
    /// Canonical paint order.
    pub const ORDER: [Self; 5] = [
        Self::Background,
        Self::Grid,
        Self::Series,
        Self::Overlay,
        Self::Legend,
    ];
}
