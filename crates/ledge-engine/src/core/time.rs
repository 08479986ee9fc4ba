/// Reference frame rate all tuning constants are expressed against.
/// A speed factor of 1.0 means "one 60 Hz frame elapsed".
pub const REFERENCE_FPS: f32 = 60.0;

/// Converts wall-clock deltas into per-frame speed factors.
///
/// Game logic scales accelerations and timers by the speed factor, so
/// the simulation slows down gracefully instead of exploding when the
/// host hitches.
pub struct FrameClock {
    speed_factor: f32,
    frame: u64,
    elapsed: f32,
    max_factor: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            speed_factor: 1.0,
            frame: 0,
            elapsed: 0.0,
            // A stall longer than 4 reference frames steps in slow motion.
            max_factor: 4.0,
        }
    }

    /// Feed one frame's wall-clock delta (seconds). Returns the speed
    /// factor to simulate with.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = dt.max(0.0);
        self.speed_factor = (dt * REFERENCE_FPS).min(self.max_factor);
        self.frame += 1;
        self.elapsed += dt;
        self.speed_factor
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    /// Frames advanced since construction or `reset`.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Wall-clock seconds consumed.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.speed_factor = 1.0;
        self.frame = 0;
        self.elapsed = 0.0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
