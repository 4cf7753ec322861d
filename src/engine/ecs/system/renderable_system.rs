use slotmap::SecondaryMap;

use crate::engine::ecs::component::Shading;
use crate::engine::ecs::system::System;
use crate::engine::ecs::{BodyId, BodyNode, World};
use crate::engine::graphics::{Instance, InstanceHandle, MeshUploader, RenderAssets, VisualWorld};
use crate::engine::user_input::InputState;

/// System that mirrors bodies into `VisualWorld`.
///
/// Contract / intent:
/// - **Each body corresponds to exactly one `VisualWorld` `Instance`.**
/// - A body only gets its instance once its GPU mesh exists (`prepare_render`).
/// - `tick` copies every body's world matrix, colour and shading into its
///   instance, and moves the scene light onto the first `Shading::Light` body.
#[derive(Debug, Default)]
pub struct RenderableSystem {
    instances: SecondaryMap<BodyId, InstanceHandle>,
}

fn instance_for(node: &BodyNode) -> Instance {
    Instance {
        model: node.body.world_matrix().to_cols_array_2d(),
        color: node.renderable.color,
        emissive: node.renderable.shading.is_emissive(),
    }
}

impl RenderableSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instance_of(&self, id: BodyId) -> Option<InstanceHandle> {
        self.instances.get(id).copied()
    }

    /// Bodies that still lack a `VisualWorld` instance.
    pub fn pending_count(&self, world: &World) -> usize {
        world
            .bodies()
            .filter(|(id, _)| !self.instances.contains_key(*id))
            .count()
    }

    /// Upload any meshes new bodies need and insert their instances.
    ///
    /// A body whose upload fails is logged and retried on the next call.
    pub fn prepare_render(
        &mut self,
        world: &mut World,
        visuals: &mut VisualWorld,
        render_assets: &mut RenderAssets,
        uploader: &mut dyn MeshUploader,
    ) {
        let order: Vec<BodyId> = world.update_order().to_vec();

        for id in order {
            if self.instances.contains_key(id) {
                continue;
            }
            let Some(node) = world.node(id) else {
                continue;
            };

            let cpu_mesh = render_assets.mesh_for_kind(node.renderable.mesh);
            let mesh = match render_assets.gpu_mesh_handle(uploader, cpu_mesh) {
                Ok(h) => h,
                Err(err) => {
                    log::warn!(
                        "[RenderableSystem] mesh upload failed for body '{}' ({:?}): {}",
                        node.name,
                        node.renderable.mesh,
                        err
                    );
                    continue;
                }
            };

            let handle = visuals.register(mesh, instance_for(node));
            self.instances.insert(id, handle);
            log::debug!(
                "[RenderableSystem] registered body '{}' -> instance {:?} mesh {:?}",
                node.name,
                handle,
                mesh
            );
        }
    }
}

impl System for RenderableSystem {
    fn tick(&mut self, world: &mut World, visuals: &mut VisualWorld, _input: &InputState, _dt_sec: f32) {
        let mut light = None;

        for (id, node) in world.bodies() {
            if light.is_none() && node.renderable.shading == Shading::Light {
                light = Some(node.body.world_position());
            }

            if let Some(&handle) = self.instances.get(id) {
                visuals.update(handle, instance_for(node));
            }
        }

        if let Some(position) = light {
            visuals.set_light_position(position.to_array());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ecs::component::{MeshKind, OrbitingBody, RenderableComponent};
    use crate::engine::graphics::{CpuMesh, MeshHandle};

    #[derive(Default)]
    struct FakeUploader {
        uploads: u32,
        fail: bool,
    }

    impl MeshUploader for FakeUploader {
        fn upload_mesh(&mut self, _mesh: &CpuMesh) -> Result<MeshHandle, Box<dyn std::error::Error>> {
            if self.fail {
                return Err("device lost".into());
            }
            self.uploads += 1;
            Ok(MeshHandle(self.uploads - 1))
        }
    }

    fn scene() -> (World, BodyId, BodyId) {
        let mut world = World::new();
        let sun = world
            .add_body(
                "sun",
                OrbitingBody::new().with_orbit_radius(1.5).with_orbit_spin_rate(0.0),
                RenderableComponent::new(MeshKind::Sphere, [1.0, 0.9, 0.3, 1.0], Shading::Light),
                None,
            )
            .unwrap();
        let cube = world
            .add_body(
                "probe",
                OrbitingBody::new().with_orbit_radius(3.0).with_scale(0.2),
                RenderableComponent::new(MeshKind::Cube, [0.5, 0.5, 0.5, 1.0], Shading::Lit),
                Some(sun),
            )
            .unwrap();
        (world, sun, cube)
    }

    #[test]
    fn prepare_render_registers_each_body_once() {
        let (mut world, sun, probe) = scene();
        let mut system = RenderableSystem::new();
        let mut visuals = VisualWorld::new();
        let mut assets = RenderAssets::new();
        let mut uploader = FakeUploader::default();

        system.prepare_render(&mut world, &mut visuals, &mut assets, &mut uploader);
        system.prepare_render(&mut world, &mut visuals, &mut assets, &mut uploader);

        assert_eq!(visuals.instances().len(), 2);
        assert_eq!(uploader.uploads, 2);
        assert_eq!(system.pending_count(&world), 0);

        let sun_inst = visuals.instance(system.instance_of(sun).unwrap()).unwrap();
        assert!(sun_inst.emissive);
        let probe_inst = visuals.instance(system.instance_of(probe).unwrap()).unwrap();
        assert!(!probe_inst.emissive);
    }

    #[test]
    fn failed_upload_stays_pending() {
        let (mut world, _, _) = scene();
        let mut system = RenderableSystem::new();
        let mut visuals = VisualWorld::new();
        let mut assets = RenderAssets::new();
        let mut uploader = FakeUploader {
            fail: true,
            ..Default::default()
        };

        system.prepare_render(&mut world, &mut visuals, &mut assets, &mut uploader);
        assert!(visuals.is_empty());
        assert_eq!(system.pending_count(&world), 2);

        uploader.fail = false;
        system.prepare_render(&mut world, &mut visuals, &mut assets, &mut uploader);
        assert_eq!(system.pending_count(&world), 0);
    }

    #[test]
    fn tick_syncs_matrices_and_light() {
        let (mut world, _sun, probe) = scene();
        let mut system = RenderableSystem::new();
        let mut visuals = VisualWorld::new();
        let mut assets = RenderAssets::new();
        let mut uploader = FakeUploader::default();
        system.prepare_render(&mut world, &mut visuals, &mut assets, &mut uploader);

        world.advance_all(0.7);
        system.tick(&mut world, &mut visuals, &InputState::default(), 0.7);

        let expected = world.body(probe).unwrap().world_matrix().to_cols_array_2d();
        let inst = visuals.instance(system.instance_of(probe).unwrap()).unwrap();
        assert_eq!(inst.model, expected);
        assert_eq!(visuals.light_position(), [1.5, 0.0, 0.0]);
    }
}
