//! # Course Slideshow
//!
//! Turn a Markdown narration script and a folder of pictures into a single
//! narrated-slideshow course video.
//!
//! Every scene of the script becomes one still frame: a picture letterboxed onto
//! a 1920×1080 canvas with the scene's narration as a caption. Each frame is
//! encoded into a short slowly zooming clip whose length follows the narration,
//! and the clips are joined into one file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use course_slideshow::{
//!     assign::JsonFileStore,
//!     composition::SlideshowEngine,
//!     config::Config,
//!     render::FfmpegRenderer,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let store = JsonFileStore::new(config.paths.mapping_path());
//! let renderer = FfmpegRenderer::new(
//!     config.encode.clone(),
//!     config.frame.width,
//!     config.frame.height,
//!     config.paths.concat_list_path(),
//! );
//!
//! let mut engine = SlideshowEngine::new(config, Box::new(store), Box::new(renderer));
//! let report = engine.run()?;
//! println!("{}", report.output.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`script`] - Markdown script parsing into videos and scenes
//! - [`timing`] - Narration-based clip durations
//! - [`assign`] - Image discovery, scene-to-image assignment and its persisted cache
//! - [`frame`] - Captioned frame composition
//! - [`render`] - External encoder boundary
//! - [`composition`] - Main build engine
//! - [`config`] - Configuration management
//!
//! ## Custom Renderers
//!
//! Encoding goes through the [`SceneRenderer`](render::SceneRenderer) trait:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use course_slideshow::render::{ClipHandle, OutputHandle, SceneRenderer, StillClipRequest};
//! use course_slideshow::Result;
//!
//! struct MyRenderer;
//!
//! impl SceneRenderer for MyRenderer {
//!     fn name(&self) -> &str {
//!         "my_renderer"
//!     }
//!
//!     fn render_still(&mut self, request: &StillClipRequest) -> Result<ClipHandle> {
//!         Ok(ClipHandle { key: request.key, path: request.clip_path.clone() })
//!     }
//!
//!     fn concatenate(&mut self, _clips: &[ClipHandle], output: &Path) -> Result<OutputHandle> {
//!         Ok(OutputHandle { path: output.to_path_buf() })
//!     }
//! }
//! ```

pub mod assign;
pub mod composition;
pub mod config;
pub mod error;
pub mod frame;
pub mod render;
pub mod script;
pub mod timing;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{BuildReport, SlideshowEngine},
    config::Config,
    error::{BuildError, Result},
    render::SceneRenderer,
};
