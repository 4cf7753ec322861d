pub mod camera_system;
pub mod input_system;
pub mod orbit_system;
pub mod renderable_system;
pub mod system_world;

pub use camera_system::{CameraSystem, Lens};
pub use input_system::{CameraInputSettings, InputSystem};
pub use orbit_system::OrbitSystem;
pub use renderable_system::RenderableSystem;
pub use system_world::SystemWorld;

use super::World;
use crate::engine::graphics::VisualWorld;
use crate::engine::user_input::InputState;

/// Individual system trait, run once per frame by `SystemWorld`.
pub trait System: std::fmt::Debug {
    fn tick(&mut self, world: &mut World, visuals: &mut VisualWorld, input: &InputState, dt_sec: f32);
}
