/// Fixed step added to scene time once per frame tick.
pub const TIME_STEP: f32 = 0.01;

/// Minimal scene clock - a scalar that only moves forward
/// Animation state is derived from it, never stored against wall time
#[derive(Debug, Clone, Copy)]
pub struct SceneClock {
    time: f32,
}

impl SceneClock {
    /// Create new clock starting at zero
    pub fn new() -> Self {
        Self { time: 0.0 }
    }

    /// Advance by the fixed step and return the new time
    pub fn tick(&mut self) -> f32 {
        self.time += TIME_STEP;
        self.time
    }

    /// Current time without advancing
    pub fn time(&self) -> f32 {
        self.time
    }
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::new()
    }
}
