use crate::engine::animation_loop::AnimationControls;
use crate::engine::ecs::World;
use crate::engine::ecs::system::System;
use crate::engine::graphics::VisualWorld;
use crate::engine::user_input::InputState;

/// Steps every body once per frame, honoring pause, reset and speed.
///
/// A pending reset wins over the frame's advance: the bodies land exactly on
/// their initial pose and start moving again on the next frame.
#[derive(Debug, Default)]
pub struct OrbitSystem {
    pub controls: AnimationControls,
}

impl OrbitSystem {
    pub fn new(controls: AnimationControls) -> Self {
        Self { controls }
    }
}

impl System for OrbitSystem {
    fn tick(&mut self, world: &mut World, _visuals: &mut VisualWorld, _input: &InputState, dt_sec: f32) {
        if self.controls.take_reset() {
            world.reset_all();
            log::info!("[OrbitSystem] reset {} bodies to their initial pose", world.len());
            return;
        }

        if let Some(sim_dt) = self.controls.scaled_delta(dt_sec) {
            world.advance_all(sim_dt);
        }
    }
}
