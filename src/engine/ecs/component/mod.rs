pub mod orbiting_body;
pub mod renderable;
pub mod turntable_camera;

pub use orbiting_body::{OrbitingBody, ParentPose};
pub use renderable::{MeshKind, RenderableComponent, Shading};
pub use turntable_camera::{TurntableCamera, TurntableParams};
