// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::scenes::SceneKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "galaxy-gallery")]
#[command(about = "Procedural galaxy and animated scene gallery", long_about = None)]
pub struct Cli {
    /// Scene to open
    #[arg(long, value_enum, default_value_t = SceneKind::Galaxy)]
    pub scene: SceneKind,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the galaxy particle count
    #[arg(long)]
    pub count: Option<usize>,

    /// Disable UI elements and console output
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Run without a window, rendering into the bookkeeping-only engine
    #[arg(long)]
    pub headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    pub frames: u64,
}
