use glam::Mat4;

use crate::engine::ecs::World;
use crate::engine::ecs::component::TurntableCamera;
use crate::engine::ecs::system::System;
use crate::engine::graphics::VisualWorld;
use crate::engine::user_input::InputState;

/// Projection settings. `fov_y` in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_y: 60f32.to_radians(),
            z_near: 0.01,
            z_far: 100.0,
        }
    }
}

impl Lens {
    /// Right-handed perspective projection for Vulkan clip space.
    ///
    /// Assumptions:
    /// - Column-major mat4 (matches how we pack instance matrices / GLSL default).
    /// - NDC depth range is z in [0, 1].
    /// - Vulkan's clip-space Y points down, so Y is flipped here rather than in the shader.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let mut proj = Mat4::perspective_rh(self.fov_y, aspect, self.z_near, self.z_far);
        proj.y_axis.y = -proj.y_axis.y;
        proj
    }
}

/// Owns the turntable camera and publishes its matrices to `VisualWorld` each frame.
#[derive(Debug, Default)]
pub struct CameraSystem {
    pub camera: TurntableCamera,
    pub lens: Lens,
}

impl CameraSystem {
    pub fn new(camera: TurntableCamera, lens: Lens) -> Self {
        Self { camera, lens }
    }
}

impl System for CameraSystem {
    fn tick(&mut self, _world: &mut World, visuals: &mut VisualWorld, _input: &InputState, _dt_sec: f32) {
        let view = self.camera.view_matrix();
        let eye = self.camera.eye_position();
        let proj = self.lens.projection_matrix(visuals.aspect_ratio());

        visuals.set_camera(
            view.to_cols_array_2d(),
            proj.to_cols_array_2d(),
            eye.to_array(),
        );
    }
}
