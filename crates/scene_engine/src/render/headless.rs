//! Renderer that records frames instead of drawing them

use super::{DrawItem, Frame, RenderError, Renderer};

/// Keeps the most recent frame and a count of everything presented
///
/// Used for headless runs and to assert on what objects drew.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    presented: u64,
    last: Option<Vec<DrawItem>>,
    size: Option<(u32, u32)>,
    fail_after: Option<u64>,
}

impl RecordingRenderer {
    /// Create a recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every present after `frames` successful ones
    pub fn fail_after(mut self, frames: u64) -> Self {
        self.fail_after = Some(frames);
        self
    }

    /// Number of frames presented
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Draw items of the last presented frame, in paint order
    pub fn last_frame(&self) -> Option<&[DrawItem]> {
        self.last.as_deref()
    }

    /// Last size reported through [`Renderer::resize`]
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }
}

impl Renderer for RecordingRenderer {
    fn present(&mut self, frame: &Frame) -> Result<(), RenderError> {
        if self.fail_after.is_some_and(|limit| self.presented >= limit) {
            return Err(RenderError::SurfaceLost("recording renderer closed".to_string()));
        }
        self.presented += 1;
        self.last = Some(frame.paint_order().into_iter().cloned().collect());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }
}
