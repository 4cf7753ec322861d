mod engine;
mod utils;

use clap::Parser;

use engine::cli::Cli;
use engine::scene::SceneConfig;

fn main() -> engine::EngineResult<()> {
    utils::logger::init();

    let cli = Cli::parse();

    let mut scene = match &cli.scene {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default_solar_system(),
    };
    cli.apply_overrides(&mut scene);

    if let Some(path) = &cli.write_scene {
        return scene.save(path);
    }

    let universe = engine::Universe::from_scene(&scene)?;
    let renderer = engine::graphics::VulkanoRenderer::new();
    let user_input = engine::user_input::UserInput::new();

    engine::Windowing::run_app(universe, renderer, user_input)
}
