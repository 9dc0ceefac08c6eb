//! FPS overlay surface

use crate::core::engine::ProcessArg;
use crate::core::event::Listener;
use crate::display::hud::Surface;

/// HUD surface showing the measured frame rate.
///
/// Attached to the engine's process phase so its counter advances every tick;
/// the display text (and with it the surface version) refreshes roughly once
/// per second to keep uploads cheap.
pub struct FpsSurface {
    frames: u32,
    accumulated: f32,
    fps: f32,
    text: String,
    version: u64,
}

impl Default for FpsSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsSurface {
    /// Interval between text refreshes, in seconds.
    const REFRESH_INTERVAL: f32 = 1.0;

    /// Create a surface with no measurements yet.
    pub fn new() -> Self {
        Self {
            frames: 0,
            accumulated: 0.0,
            fps: 0.0,
            text: String::from("-- fps"),
            version: 0,
        }
    }

    /// Frame rate measured over the last completed interval.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Current display text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Listener<ProcessArg> for FpsSurface {
    fn handle(&mut self, event: &ProcessArg) {
        self.frames += 1;
        self.accumulated += event.delta;
        if self.accumulated >= Self::REFRESH_INTERVAL {
            self.fps = self.frames as f32 / self.accumulated;
            self.text = format!("{:.0} fps", self.fps);
            self.version += 1;
            self.frames = 0;
            self.accumulated = 0.0;
        }
    }
}

impl Surface for FpsSurface {
    fn dimensions(&self) -> (u32, u32) {
        (128, 32)
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn name(&self) -> &str {
        "fps"
    }
}
