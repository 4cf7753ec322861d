use serde::{Deserialize, Serialize};

/// Which built-in mesh a body is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    Sphere,
    Cube,
}

/// How a body is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// Diffuse-lit by the scene's light body.
    Lit,
    /// Flat colour (backdrops).
    Unlit,
    /// Flat colour, and its centre is the scene's point light.
    Light,
}

impl Shading {
    pub fn is_emissive(self) -> bool {
        !matches!(self, Shading::Lit)
    }
}

/// Render data attached to each body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableComponent {
    pub mesh: MeshKind,
    pub color: [f32; 4],
    pub shading: Shading,
}

impl RenderableComponent {
    pub fn new(mesh: MeshKind, color: [f32; 4], shading: Shading) -> Self {
        Self {
            mesh,
            color,
            shading,
        }
    }

    pub fn lit_sphere(color: [f32; 4]) -> Self {
        Self::new(MeshKind::Sphere, color, Shading::Lit)
    }
}

impl Default for RenderableComponent {
    fn default() -> Self {
        Self::lit_sphere([1.0, 1.0, 1.0, 1.0])
    }
}
