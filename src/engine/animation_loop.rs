use std::time::Instant;

use crate::engine::graphics::VulkanoRenderer;
use crate::engine::user_input::InputState;
use crate::engine::{EngineResult, Universe};

/// Delta reported by the very first tick, before there is a previous frame.
pub const FIRST_FRAME_DELTA_SEC: f32 = 1.0 / 30.0;

/// Upper bound on a single frame's delta (window drags, breakpoints...).
pub const MAX_FRAME_DELTA_SEC: f32 = 0.25;

pub const MIN_SPEED: f32 = 0.0;
pub const MAX_SPEED: f32 = 10.0;
pub const SPEED_STEP: f32 = 1.25;
/// Speeding up from a stop starts at this speed before stepping.
pub const SPEED_UP_FLOOR: f32 = 0.05;

/// Per-frame delta source. Owned by the loop and passed down explicitly.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick, never negative and capped at
    /// [`MAX_FRAME_DELTA_SEC`].
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last.replace(now) {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f32(),
            None => FIRST_FRAME_DELTA_SEC,
        };
        dt.min(MAX_FRAME_DELTA_SEC)
    }
}

/// Driver-owned animation state: pause, one-shot reset and time scale.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationControls {
    pub paused: bool,
    reset_requested: bool,
    speed: f32,
}

impl Default for AnimationControls {
    fn default() -> Self {
        Self {
            paused: false,
            reset_requested: false,
            speed: 1.0,
        }
    }
}

impl AnimationControls {
    pub fn new(speed: f32, paused: bool) -> Self {
        let mut controls = Self {
            paused,
            ..Self::default()
        };
        controls.set_speed(speed);
        controls
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_finite() {
            speed.clamp(MIN_SPEED, MAX_SPEED)
        } else {
            1.0
        };
    }

    pub fn speed_up(&mut self) {
        self.set_speed(self.speed.max(SPEED_UP_FLOOR) * SPEED_STEP);
    }

    pub fn slow_down(&mut self) {
        self.set_speed(self.speed / SPEED_STEP);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }

    /// Consume a pending reset request.
    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_requested)
    }

    /// Simulation delta for a frame of `dt_sec` wall time, or `None` while paused.
    pub fn scaled_delta(&self, dt_sec: f32) -> Option<f32> {
        (!self.paused).then_some(dt_sec * self.speed)
    }
}

/// One iteration of the app: clock, simulation step, render.
#[derive(Debug, Default)]
pub struct AnimationLoop {
    clock: FrameClock,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(
        &mut self,
        universe: &mut Universe,
        renderer: &mut VulkanoRenderer,
        input: &InputState,
    ) -> EngineResult<()> {
        let dt = self.clock.tick(Instant::now());
        universe.update(dt, input);
        universe.render(renderer)
    }
}
