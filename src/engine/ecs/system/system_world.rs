use super::World;
use crate::engine::ecs::system::{CameraSystem, InputSystem, OrbitSystem, RenderableSystem, System};
use crate::engine::graphics::{MeshUploader, RenderAssets, VisualWorld};
use crate::engine::user_input::InputState;

/// System world that holds and runs all registered systems.
#[derive(Debug, Default)]
pub struct SystemWorld {
    pub input: InputSystem,
    pub orbit: OrbitSystem,
    pub camera: CameraSystem,
    pub renderable: RenderableSystem,
}

impl SystemWorld {
    pub fn new(
        input: InputSystem,
        orbit: OrbitSystem,
        camera: CameraSystem,
    ) -> Self {
        Self {
            input,
            orbit,
            camera,
            renderable: RenderableSystem::new(),
        }
    }

    /// Prepare render state before issuing a frame.
    ///
    /// Uploads meshes for bodies that don't have an instance yet and inserts
    /// their GPU-ready instances into `VisualWorld`.
    pub fn prepare_render(
        &mut self,
        world: &mut World,
        visuals: &mut VisualWorld,
        render_assets: &mut RenderAssets,
        uploader: &mut dyn MeshUploader,
    ) {
        self.renderable
            .prepare_render(world, visuals, render_assets, uploader);
    }

    /// One frame: input, then bodies (parents first), then camera, then the
    /// instance sync that reads the freshly computed matrices.
    pub fn tick(&mut self, world: &mut World, visuals: &mut VisualWorld, input: &InputState, dt_sec: f32) {
        self.input.process_input(
            input,
            dt_sec,
            &mut self.orbit.controls,
            &mut self.camera.camera,
        );
        self.orbit.tick(world, visuals, input, dt_sec);
        self.camera.tick(world, visuals, input, dt_sec);
        self.renderable.tick(world, visuals, input, dt_sec);
    }
}
