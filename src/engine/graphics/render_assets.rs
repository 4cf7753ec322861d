use std::collections::HashMap;

use crate::engine::ecs::component::MeshKind;
use crate::engine::graphics::MeshUploader;
use crate::engine::graphics::mesh::{CpuMesh, MeshFactory};
use crate::engine::graphics::primitives::{CpuMeshHandle, MeshHandle};

/// Renderer-side asset registry used by ECS systems.
///
/// Design:
/// - Bodies refer to geometry by `MeshKind`; each kind is generated once and
///   gets a `CpuMeshHandle`.
/// - The renderer owns GPU resources and returns `MeshHandle`.
/// - `RenderAssets` bridges the two and caches uploads.
#[derive(Debug, Default)]
pub struct RenderAssets {
    cpu_meshes: Vec<CpuMesh>,
    by_kind: HashMap<MeshKind, CpuMeshHandle>,
    gpu_meshes: HashMap<CpuMeshHandle, MeshHandle>,
}

impl RenderAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register CPU mesh data and get a stable CPU-side handle.
    pub fn register_mesh(&mut self, mesh: CpuMesh) -> CpuMeshHandle {
        let h = CpuMeshHandle(self.cpu_meshes.len() as u32);
        self.cpu_meshes.push(mesh);
        h
    }

    /// Shared CPU mesh for a built-in shape, generated on first request.
    pub fn mesh_for_kind(&mut self, kind: MeshKind) -> CpuMeshHandle {
        if let Some(h) = self.by_kind.get(&kind).copied() {
            return h;
        }

        let mesh = match kind {
            MeshKind::Sphere => MeshFactory::default_sphere(),
            MeshKind::Cube => MeshFactory::cube(),
        };
        let h = self.register_mesh(mesh);
        self.by_kind.insert(kind, h);
        h
    }

    pub fn cpu_mesh(&self, h: CpuMeshHandle) -> Option<&CpuMesh> {
        self.cpu_meshes.get(h.0 as usize)
    }

    /// Get (or upload) a mesh into the renderer and return a renderer-owned `MeshHandle`.
    pub fn gpu_mesh_handle(
        &mut self,
        uploader: &mut dyn MeshUploader,
        cpu_mesh: CpuMeshHandle,
    ) -> Result<MeshHandle, Box<dyn std::error::Error>> {
        if let Some(h) = self.gpu_meshes.get(&cpu_mesh).copied() {
            return Ok(h);
        }

        let mesh = self
            .cpu_mesh(cpu_mesh)
            .ok_or("RenderAssets: invalid CpuMeshHandle")?;
        let h = uploader.upload_mesh(mesh)?;
        self.gpu_meshes.insert(cpu_mesh, h);
        Ok(h)
    }
}
