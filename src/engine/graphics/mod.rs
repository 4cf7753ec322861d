pub mod mesh;
pub mod pipeline_descriptor_set_layouts;
pub mod primitives;
pub mod render_assets;
pub mod visual_world;
pub mod vulkano_renderer;

pub use mesh::{CpuMesh, CpuVertex, MeshFactory};
pub use primitives::{CpuMeshHandle, InstanceHandle, MeshHandle};
pub use render_assets::RenderAssets;
pub use visual_world::{DrawBatch, Instance, VisualWorld};
pub use vulkano_renderer::VulkanoRenderer;

/// Uploads CPU meshes into renderer-owned GPU buffers.
pub trait MeshUploader {
    fn upload_mesh(&mut self, mesh: &CpuMesh) -> Result<MeshHandle, Box<dyn std::error::Error>>;
}
