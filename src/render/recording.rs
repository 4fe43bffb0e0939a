use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RenderError, Result};
use crate::render::traits::{ClipHandle, OutputHandle, SceneRenderer, StillClipRequest};
use crate::script::SceneKey;

/// Renderer that records every request and encodes nothing
///
/// Used by tests and dry runs. It can be told to fail on a given scene or on
/// concatenation to exercise error propagation.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    stills: Vec<StillClipRequest>,
    concatenations: Vec<(Vec<ClipHandle>, PathBuf)>,
    fail_on: Option<SceneKey>,
    fail_concat: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a tool failure when asked to render `key`
    pub fn failing_on(key: SceneKey) -> Self {
        Self {
            fail_on: Some(key),
            ..Self::default()
        }
    }

    /// Report a tool failure when asked to concatenate
    pub fn failing_concat() -> Self {
        Self {
            fail_concat: true,
            ..Self::default()
        }
    }

    pub fn stills(&self) -> &[StillClipRequest] {
        &self.stills
    }

    pub fn concatenations(&self) -> &[(Vec<ClipHandle>, PathBuf)] {
        &self.concatenations
    }

    fn simulated_failure(&self) -> RenderError {
        RenderError::ToolFailed {
            tool: self.name().to_string(),
            status: "exit status: 1".to_string(),
            stderr: "simulated failure".to_string(),
        }
    }
}

impl SceneRenderer for RecordingRenderer {
    fn name(&self) -> &str {
        "recording"
    }

    fn render_still(&mut self, request: &StillClipRequest) -> Result<ClipHandle> {
        debug!("Recorded still request for {}", request.key);
        self.stills.push(request.clone());

        if self.fail_on == Some(request.key) {
            return Err(self.simulated_failure().into());
        }

        Ok(ClipHandle {
            key: request.key,
            path: request.clip_path.clone(),
        })
    }

    fn concatenate(&mut self, clips: &[ClipHandle], output: &Path) -> Result<OutputHandle> {
        debug!("Recorded concatenation of {} clips", clips.len());
        self.concatenations.push((clips.to_vec(), output.to_path_buf()));

        if self.fail_concat {
            return Err(self.simulated_failure().into());
        }

        Ok(OutputHandle {
            path: output.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::render::traits::ZoomSpec;

    fn request(video: u32, scene: u32) -> StillClipRequest {
        let key = SceneKey::new(video, scene);
        StillClipRequest {
            key,
            frame_path: PathBuf::from(format!("frames/{}", key.file_name("png"))),
            duration: 4.0,
            zoom: ZoomSpec::default(),
            clip_path: PathBuf::from(format!("scenes/{}", key.file_name("mp4"))),
        }
    }

    #[test]
    fn test_records_in_order() {
        let mut renderer = RecordingRenderer::new();
        let a = renderer.render_still(&request(1, 1)).unwrap();
        let b = renderer.render_still(&request(1, 2)).unwrap();
        let out = renderer.concatenate(&[a.clone(), b.clone()], Path::new("out.mp4")).unwrap();

        assert_eq!(out.path, PathBuf::from("out.mp4"));
        assert_eq!(renderer.stills().len(), 2);
        assert_eq!(renderer.stills()[1].key, SceneKey::new(1, 2));
        assert_eq!(renderer.concatenations()[0].0, vec![a, b]);
        assert!(!Path::new("out.mp4").exists());
    }

    #[test]
    fn test_injected_failures() {
        let mut renderer = RecordingRenderer::failing_on(SceneKey::new(2, 1));
        assert!(renderer.render_still(&request(1, 1)).is_ok());
        let err = renderer.render_still(&request(2, 1)).unwrap_err();
        assert!(matches!(err, BuildError::Render(RenderError::ToolFailed { .. })));

        let mut renderer = RecordingRenderer::failing_concat();
        assert!(renderer.concatenate(&[], Path::new("out.mp4")).is_err());
    }
}
