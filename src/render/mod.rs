//! # Scene Rendering
//!
//! Boundary to the external video encoder. The pipeline asks for one zooming clip
//! per scene still, then for a stream-copy concatenation of all clips in order.
//!
//! - [`FfmpegRenderer`] shells out to `ffmpeg`
//! - [`RecordingRenderer`] records requests without encoding anything

pub mod ffmpeg;
pub mod recording;
pub mod traits;

pub use ffmpeg::FfmpegRenderer;
pub use recording::RecordingRenderer;
pub use traits::{ClipHandle, OutputHandle, SceneRenderer, StillClipRequest, ZoomSpec};
