/// Renderer-owned GPU mesh (vertex + index buffers), looked up by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// CPU-side mesh identity inside `RenderAssets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuMeshHandle(pub u32);

/// Stable handle to an entry in `VisualWorld`'s instance list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(pub u32);
