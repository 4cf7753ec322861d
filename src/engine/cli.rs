//! Command-line interface for little-orrery.

use std::path::PathBuf;

use clap::Parser;

use crate::engine::scene::SceneConfig;

/// Interactive sun / earth / moon orrery.
///
/// Right-drag orbits the camera, the wheel zooms, arrow keys orbit too.
/// Space pauses, R resets, +/- change speed, 0 restores it, Escape quits.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "little-orrery", version, about)]
pub struct Cli {
    /// Load this scene JSON instead of the built-in solar system.
    #[arg(long, value_name = "FILE")]
    pub scene: Option<PathBuf>,

    /// Write the active scene as pretty JSON to FILE and exit without opening a window.
    #[arg(long, value_name = "FILE")]
    pub write_scene: Option<PathBuf>,

    /// Initial animation speed multiplier (clamped to 0..=10).
    #[arg(long, value_name = "F")]
    pub speed: Option<f32>,

    /// Start with the animation paused.
    #[arg(long)]
    pub paused: bool,
}

impl Cli {
    /// Fold the animation overrides into a loaded scene.
    pub fn apply_overrides(&self, scene: &mut SceneConfig) {
        if let Some(speed) = self.speed {
            scene.animation.speed = speed;
        }
        if self.paused {
            scene.animation.paused = true;
        }
    }
}
