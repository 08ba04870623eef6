// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "hero-backdrop")]
#[command(about = "Animated 3D hero backdrop", long_about = None)]
pub struct Cli {
    /// JSON settings file
    #[arg(long = "settings")]
    pub settings: Option<PathBuf>,

    /// Model file to load into the scene, overriding settings
    #[arg(long = "model")]
    pub model: Option<PathBuf>,

    /// Seed for scene randomness, overriding settings
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Disable the FPS overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
