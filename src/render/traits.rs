use std::path::{Path, PathBuf};

use crate::config::EncodeConfig;
use crate::error::Result;
use crate::script::SceneKey;

/// Slow zoom ("Ken Burns") applied across a still clip
///
/// The first frame is shown unzoomed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSpec {
    /// Zoom added on every output frame
    pub step_per_frame: f64,

    /// Zoom never exceeds this factor
    pub ceiling: f64,

    pub fps: u32,
}

impl ZoomSpec {
    pub fn from_config(config: &EncodeConfig) -> Self {
        Self {
            step_per_frame: config.zoom_step,
            ceiling: config.zoom_ceiling,
            fps: config.fps,
        }
    }

    /// Zoom factor at output frame `frame`; monotonic and capped at the ceiling
    pub fn zoom_at(&self, frame: u64) -> f64 {
        (1.0 + self.step_per_frame * frame as f64).min(self.ceiling)
    }

    /// Output frames in a clip of `duration` seconds
    pub fn frame_count(&self, duration: f64) -> u64 {
        (duration * self.fps as f64).round().max(1.0) as u64
    }
}

impl Default for ZoomSpec {
    fn default() -> Self {
        Self::from_config(&EncodeConfig::default())
    }
}

/// One "render still frame with zoom over duration" request
#[derive(Debug, Clone, PartialEq)]
pub struct StillClipRequest {
    pub key: SceneKey,

    /// Composed PNG frame
    pub frame_path: PathBuf,

    /// Clip length in seconds
    pub duration: f64,

    pub zoom: ZoomSpec,

    /// Where the encoded clip should be written
    pub clip_path: PathBuf,
}

/// An encoded per-scene clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipHandle {
    pub key: SceneKey,
    pub path: PathBuf,
}

/// The final concatenated video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputHandle {
    pub path: PathBuf,
}

/// Narrow interface to the external encoder
///
/// Implementations must report any encoder failure as an error; callers treat it
/// as fatal and never retry.
pub trait SceneRenderer {
    /// Returns the unique name of this renderer
    fn name(&self) -> &str;

    /// Encode one still frame into a clip with the requested zoom
    fn render_still(&mut self, request: &StillClipRequest) -> Result<ClipHandle>;

    /// Join `clips` in order into `output` without re-encoding
    fn concatenate(&mut self, clips: &[ClipHandle], output: &Path) -> Result<OutputHandle>;
}
