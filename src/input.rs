//! Adapters that bridge winit to the host seam.

use winit::event::MouseScrollDelta;
use winit::window::Window;

use crate::host::FrameScheduler;

/// Pixels one wheel line is worth. Touchpads report pixel deltas directly.
const LINE_HEIGHT: f32 = 40.0;

/// Accumulates wheel and touchpad deltas into the vertical page offset the
/// scroll handler expects. Scrolling down increases the offset; the top of
/// the page is a hard stop at zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrollTracker {
    offset: f32,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one wheel event in and return the updated offset.
    pub fn apply(&mut self, delta: MouseScrollDelta) -> f32 {
        let pixels = match delta {
            MouseScrollDelta::LineDelta(_, lines) => lines * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
        };
        // Wheel-up is positive in winit but means scrolling toward the top.
        self.offset = (self.offset - pixels).max(0.0);
        self.offset
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }
}

impl FrameScheduler for Window {
    fn schedule_frame(&self) {
        self.request_redraw();
    }
}
