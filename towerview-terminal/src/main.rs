/// Towerview Terminal - ASCII tower viewer
///
/// Renders a tower with its mount levels and devices from a JSON dataset.
/// Controls:
///   - WASD / Arrow Keys: Orbit the camera
///   - +/-: Zoom
///   - Space: Toggle auto-rotation
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use towerview_core::{AzimuthMode, ViewerConfig};
use towerview_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "towerview-terminal", version, about = "View a telecom tower in the terminal")]
struct Args {
    /// Tower dataset (JSON with tower, levels and devices)
    #[arg(default_value = "data/sample_tower.json")]
    dataset: PathBuf,

    /// Viewer configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// STL model to show instead of the generated tower column
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Show the primitive demo tower described by this JSON file instead of the dataset
    #[arg(short, long)]
    primitive: Option<PathBuf>,

    /// Turn devices around the tower by their azimuth
    #[arg(long)]
    azimuth: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if args.azimuth {
        config.placement.azimuth = AzimuthMode::Angular;
    }

    let mut app = TerminalApp::new(config)?;
    match &args.primitive {
        Some(path) => app.load_primitive(path)?,
        None => app.load_dataset(&args.dataset)?,
    }
    if let Some(path) = &args.model {
        app.load_model(path)?;
    }

    app.run()?;

    println!("Thank you for using Towerview!");
    Ok(())
}
