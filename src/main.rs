use clap::Parser;
use winit::event_loop::EventLoop;

use hero_backdrop::app::App;
use hero_backdrop::cli::Cli;
use hero_backdrop::settings::Settings;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let params = settings.scene_params(cli.seed);
    let model_path = settings.resolve_model_path(cli.model.as_deref());
    log::info!("scene seed: {}", params.seed);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(params, model_path, !cli.no_ui);

    println!("Hero Backdrop - Scroll to fly the camera, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
