use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless controllers.
///
/// It still validates frame content so tests catch invalid geometry, and keeps
/// the last frame around for inspection.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_primitive_count: usize,
    pub last_text_count: usize,
    pub last_viewport: Option<Viewport>,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_primitive_count = frame.primitive_count();
        self.last_text_count = frame.texts().count();
        self.last_viewport = Some(frame.backing_viewport());
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
