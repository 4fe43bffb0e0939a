use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn, Level};

use course_slideshow::{
    assign::JsonFileStore,
    composition::SlideshowEngine,
    config::Config,
    render::FfmpegRenderer,
};

#[derive(Parser)]
#[command(
    name = "course-slideshow",
    version,
    about = "Build a narrated slideshow course video from a Markdown script and a folder of images",
    long_about = "Course-Slideshow parses every scene of a Markdown narration script, pairs it with a picture, captions the picture with the narration and encodes all scenes into one video with FFmpeg."
)]
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

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Course-Slideshow v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    config.validate()?;

    let store = JsonFileStore::new(config.paths.mapping_path());
    let renderer = FfmpegRenderer::new(
        config.encode.clone(),
        config.frame.width,
        config.frame.height,
        config.paths.concat_list_path(),
    );
    if !renderer.check_ffmpeg_available() {
        warn!("{} did not respond to -version; rendering will likely fail", config.encode.ffmpeg_path.display());
    }

    let build_dir = config.paths.build_dir.clone();
    let mut engine = SlideshowEngine::new(config, Box::new(store), Box::new(renderer));

    let report = match engine.run() {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e.user_message());
            if e.is_external() {
                error!("Frames and clips written so far are kept in {:?}", build_dir);
            }
            return Err(e.into());
        }
    };

    println!("{}", report.output.display());
    Ok(())
}
