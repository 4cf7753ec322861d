pub mod animation_loop;
pub mod cli;
pub mod ecs;
pub mod graphics;
pub mod scene;
pub mod universe;
pub mod user_input;
pub mod windowing;

pub use animation_loop::{AnimationControls, AnimationLoop, FrameClock};
pub use universe::Universe;
pub use windowing::Windowing;

use thiserror::Error;

/// Engine-level error type.
///
/// The orbit and camera math is total; everything here comes from the edges
/// (scene files, arena lookups, windowing, the GPU backend).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("scene file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("scene json is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("body '{0}' is declared more than once")]
    DuplicateBody(String),

    #[error("body '{body}' names unknown parent '{parent}'")]
    UnknownParent { body: String, parent: String },

    #[error("parent chain of body '{0}' forms a cycle")]
    ParentCycle(String),

    #[error("no body with id {0:?} in the world")]
    UnknownBody(ecs::BodyId),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("renderer failed: {0}")]
    Render(String),
}

impl From<Box<dyn std::error::Error>> for EngineError {
    fn from(e: Box<dyn std::error::Error>) -> Self {
        EngineError::Render(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
