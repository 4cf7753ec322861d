use crate::engine::graphics::primitives::{InstanceHandle, MeshHandle};

const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// CPU-side per-body instance payload, packed into the GPU instance buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    /// Column-major model matrix (`model[c]` is column `c`).
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// Emissive instances skip lighting (the sun, the star backdrop).
    pub emissive: bool,
}

impl Default for Instance {
    fn default() -> Self {
        Self {
            model: IDENTITY,
            color: [1.0; 4],
            emissive: false,
        }
    }
}

/// Contiguous range of `draw_order` sharing one mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatch {
    pub mesh: MeshHandle,
    pub start: usize,
    pub count: usize,
}

/// Renderer-friendly cache, organized for instanced draws.
///
/// Contract:
/// - Instances are only ever appended; an `InstanceHandle` stays valid.
/// - After `prepare_draw_cache`, `draw_order` lists every instance exactly once,
///   grouped by mesh, and `draw_batches` cover `draw_order` without gaps.
#[derive(Debug)]
pub struct VisualWorld {
    instances: Vec<Instance>,
    meshes: Vec<MeshHandle>,

    draw_order: Vec<u32>,
    draw_batches: Vec<DrawBatch>,
    draw_cache_dirty: bool,

    camera_view: [[f32; 4]; 4],
    camera_proj: [[f32; 4]; 4],
    camera_eye: [f32; 3],
    light_position: [f32; 3],

    /// Output size in pixels, written back by the renderer.
    viewport: [f32; 2],
}

impl Default for VisualWorld {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
            meshes: Vec::new(),
            draw_order: Vec::new(),
            draw_batches: Vec::new(),
            draw_cache_dirty: false,
            camera_view: IDENTITY,
            camera_proj: IDENTITY,
            camera_eye: [0.0; 3],
            light_position: [0.0; 3],
            viewport: [1.0, 1.0],
        }
    }
}

impl VisualWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mesh: MeshHandle, instance: Instance) -> InstanceHandle {
        let handle = InstanceHandle(self.instances.len() as u32);
        self.instances.push(instance);
        self.meshes.push(mesh);
        self.draw_cache_dirty = true;
        handle
    }

    /// Overwrite an instance in place. Returns `false` for an unknown handle.
    pub fn update(&mut self, handle: InstanceHandle, instance: Instance) -> bool {
        match self.instances.get_mut(handle.0 as usize) {
            Some(slot) => {
                *slot = instance;
                true
            }
            None => false,
        }
    }

    pub fn instance(&self, handle: InstanceHandle) -> Option<&Instance> {
        self.instances.get(handle.0 as usize)
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Rebuild `draw_order`/`draw_batches` if instances were added since the last call.
    pub fn prepare_draw_cache(&mut self) {
        if !self.draw_cache_dirty {
            return;
        }

        let mut order: Vec<u32> = (0..self.instances.len() as u32).collect();
        // Stable sort keeps registration order within a mesh.
        order.sort_by_key(|&i| self.meshes[i as usize]);

        self.draw_batches.clear();
        for (pos, &idx) in order.iter().enumerate() {
            let mesh = self.meshes[idx as usize];
            match self.draw_batches.last_mut() {
                Some(batch) if batch.mesh == mesh => batch.count += 1,
                _ => self.draw_batches.push(DrawBatch {
                    mesh,
                    start: pos,
                    count: 1,
                }),
            }
        }

        self.draw_order = order;
        self.draw_cache_dirty = false;
    }

    pub fn draw_order(&self) -> &[u32] {
        &self.draw_order
    }

    pub fn draw_batches(&self) -> &[DrawBatch] {
        &self.draw_batches
    }

    pub fn set_camera(&mut self, view: [[f32; 4]; 4], proj: [[f32; 4]; 4], eye: [f32; 3]) {
        self.camera_view = view;
        self.camera_proj = proj;
        self.camera_eye = eye;
    }

    pub fn camera_view(&self) -> [[f32; 4]; 4] {
        self.camera_view
    }

    pub fn camera_proj(&self) -> [[f32; 4]; 4] {
        self.camera_proj
    }

    pub fn camera_eye(&self) -> [f32; 3] {
        self.camera_eye
    }

    pub fn set_light_position(&mut self, position: [f32; 3]) {
        self.light_position = position;
    }

    pub fn light_position(&self) -> [f32; 3] {
        self.light_position
    }

    pub fn set_viewport(&mut self, size: [f32; 2]) {
        self.viewport = size;
    }

    pub fn viewport(&self) -> [f32; 2] {
        self.viewport
    }

    /// Width over height; 1.0 while the viewport is degenerate (minimized window).
    pub fn aspect_ratio(&self) -> f32 {
        let [w, h] = self.viewport;
        if w > 0.0 && h > 0.0 { w / h } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colored(r: f32) -> Instance {
        Instance {
            color: [r, 0.0, 0.0, 1.0],
            ..Instance::default()
        }
    }

    #[test]
    fn batches_group_by_mesh_and_cover_every_instance() {
        let mut vw = VisualWorld::new();
        let sphere = MeshHandle(0);
        let cube = MeshHandle(1);

        vw.register(sphere, colored(0.1));
        vw.register(cube, colored(0.2));
        vw.register(sphere, colored(0.3));
        vw.register(cube, colored(0.4));
        vw.register(sphere, colored(0.5));
        vw.prepare_draw_cache();

        let batches = vw.draw_batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches.iter().map(|b| b.count).sum::<usize>(), 5);

        let mut next = 0;
        for batch in batches {
            assert_eq!(batch.start, next);
            next += batch.count;
        }

        let mut seen: Vec<u32> = vw.draw_order().to_vec();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);

        // Registration order survives inside a batch.
        let first = batches[0];
        let reds: Vec<f32> = vw.draw_order()[first.start..first.start + first.count]
            .iter()
            .map(|&i| vw.instances()[i as usize].color[0])
            .collect();
        assert_eq!(reds, vec![0.1, 0.3, 0.5]);
    }

    #[test]
    fn update_keeps_draw_cache() {
        let mut vw = VisualWorld::new();
        let h = vw.register(MeshHandle(0), Instance::default());
        vw.prepare_draw_cache();

        assert!(vw.update(h, colored(0.7)));
        assert_eq!(vw.instance(h).map(|i| i.color[0]), Some(0.7));
        assert_eq!(vw.draw_batches().len(), 1);
        assert!(!vw.update(InstanceHandle(9), Instance::default()));
    }

    #[test]
    fn aspect_ratio_survives_zero_height() {
        let mut vw = VisualWorld::new();
        vw.set_viewport([1600.0, 900.0]);
        assert!((vw.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
        vw.set_viewport([1600.0, 0.0]);
        assert_eq!(vw.aspect_ratio(), 1.0);
    }
}
