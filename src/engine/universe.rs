use crate::engine::ecs::system::{CameraSystem, InputSystem, OrbitSystem};
use crate::engine::scene::SceneConfig;
use crate::engine::user_input::InputState;
use crate::engine::{EngineResult, ecs, graphics};

/// Everything the app simulates and draws: bodies, systems and the render cache.
pub struct Universe {
    pub world: ecs::World,
    pub visuals: graphics::VisualWorld,
    pub systems: ecs::SystemWorld,
    pub render_assets: graphics::RenderAssets,
}

impl Universe {
    pub fn new(world: ecs::World, systems: ecs::SystemWorld) -> Self {
        Self {
            world,
            visuals: graphics::VisualWorld::new(),
            systems,
            render_assets: graphics::RenderAssets::new(),
        }
    }

    pub fn from_scene(scene: &SceneConfig) -> EngineResult<Self> {
        let world = scene.build()?;
        let systems = ecs::SystemWorld::new(
            InputSystem::new(scene.camera.input_settings()),
            OrbitSystem::new(scene.animation.controls()),
            CameraSystem::new(scene.camera.turntable(), scene.camera.lens()),
        );
        log::info!(
            "[Universe] {} bodies, speed {:.2}x{}",
            world.len(),
            systems.orbit.controls.speed(),
            if systems.orbit.controls.paused { ", paused" } else { "" }
        );
        Ok(Self::new(world, systems))
    }

    /// Output size changed; the camera picks up the new aspect on the next update.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.visuals.set_viewport([width as f32, height as f32]);
    }

    /// Upload meshes and create instances for bodies the renderer hasn't seen yet.
    pub fn prepare_render(&mut self, uploader: &mut dyn graphics::MeshUploader) {
        self.systems.prepare_render(
            &mut self.world,
            &mut self.visuals,
            &mut self.render_assets,
            uploader,
        );
    }

    /// Simulation step for one frame of `dt_sec` wall time.
    pub fn update(&mut self, dt_sec: f32, input: &InputState) {
        self.systems
            .tick(&mut self.world, &mut self.visuals, input, dt_sec);
    }

    pub fn render(&mut self, renderer: &mut graphics::VulkanoRenderer) -> EngineResult<()> {
        if self.systems.renderable.pending_count(&self.world) > 0 {
            self.prepare_render(renderer);
        }
        renderer.render_visual_world(&mut self.visuals)?;
        Ok(())
    }
}
