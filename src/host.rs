//! Boundary between the windowing host and the animation core.
//!
//! The host hands the backdrop three kinds of triggers and one capability:
//! the ability to get the per-frame callback invoked again before the next
//! repaint. Everything behind this seam runs without a window.

use crate::update::Backdrop;

/// Viewport dimensions in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// External triggers, delivered in whatever order the host produces them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostSignal {
    /// The repaint tick: run one animation step.
    Frame,
    /// Vertical page offset in pixels, already accumulated by the input side.
    Scroll { offset: f32 },
    /// The drawable area changed.
    Resize { width: u32, height: u32 },
}

/// Frame scheduling seam.
pub trait FrameScheduler {
    /// Arrange for the per-frame callback to run before the next repaint.
    fn schedule_frame(&self);
}

/// Route one host signal to the matching backdrop operation.
pub fn dispatch(backdrop: &mut Backdrop, signal: HostSignal, scheduler: &dyn FrameScheduler) {
    match signal {
        HostSignal::Frame => backdrop.advance(scheduler),
        HostSignal::Scroll { offset } => backdrop.handle_scroll(offset),
        HostSignal::Resize { width, height } => backdrop.handle_resize(width, height),
    }
}
