use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};

use course_slideshow::{
    assign::JsonFileStore,
    composition::{FallbackReason, ImageChoice, SlideshowEngine},
    config::Config,
    render::RecordingRenderer,
};

/// Print the scene plan (key, duration, image) without composing or encoding anything
#[derive(Parser)]
#[command(name = "slideshow-plan", version)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.config {
        Some(config_path) => Config::from_file(&config_path)?,
        None => Config::default(),
    };
    config.validate()?;

    let store = JsonFileStore::new(config.paths.mapping_path());
    let mut engine = SlideshowEngine::new(config, Box::new(store), Box::new(RecordingRenderer::new()));

    let plans = engine.plan()?;
    let mut total = 0.0;

    for plan in &plans {
        let note = match &plan.image {
            ImageChoice::Mapped(_) => String::new(),
            ImageChoice::Fallback {
                reason: FallbackReason::Unmapped,
                ..
            } => "  (fallback: unmapped)".to_string(),
            ImageChoice::Fallback {
                reason: FallbackReason::MissingFile(missing),
                ..
            } => format!("  (fallback: {} missing)", missing.display()),
        };
        println!("{}  {:>6.2}s  {}{}", plan.key, plan.duration, plan.image.path().display(), note);
        total += plan.duration;
    }

    info!("{} scenes planned", plans.len());
    println!("{} scenes, {:.1}s total", plans.len(), total);
    Ok(())
}
