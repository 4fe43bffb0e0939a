use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::EncodeConfig;
use crate::error::{RenderError, Result};
use crate::render::traits::{ClipHandle, OutputHandle, SceneRenderer, StillClipRequest, ZoomSpec};

/// Scene renderer that shells out to the `ffmpeg` command line tool
pub struct FfmpegRenderer {
    config: EncodeConfig,
    width: u32,
    height: u32,
    concat_list: PathBuf,
}

impl FfmpegRenderer {
    /// `concat_list` is the text file handed to the concat demuxer
    pub fn new<P: Into<PathBuf>>(config: EncodeConfig, width: u32, height: u32, concat_list: P) -> Self {
        Self {
            config,
            width,
            height,
            concat_list: concat_list.into(),
        }
    }

    fn tool(&self) -> String {
        self.config.ffmpeg_path.display().to_string()
    }

    pub fn check_ffmpeg_available(&self) -> bool {
        Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Scale to the canvas, zoom slowly towards the ceiling, and convert to the output pixel format
    pub fn video_filter(&self, zoom: &ZoomSpec) -> String {
        format!(
            "scale={w}:{h},zoompan=z='min(zoom+{step},{ceiling})':d=1:fps={fps}:s={w}x{h},format={pix}",
            w = self.width,
            h = self.height,
            step = zoom.step_per_frame,
            ceiling = zoom.ceiling,
            fps = zoom.fps,
            pix = self.config.pixel_format,
        )
    }

    pub fn still_clip_args(&self, request: &StillClipRequest) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-loop".to_string(),
            "1".to_string(),
            "-t".to_string(),
            request.duration.to_string(),
            "-i".to_string(),
            request.frame_path.display().to_string(),
            "-vf".to_string(),
            self.video_filter(&request.zoom),
            "-c:v".to_string(),
            self.config.codec.clone(),
            "-preset".to_string(),
            self.config.preset.clone(),
            "-crf".to_string(),
            self.config.crf.to_string(),
            "-pix_fmt".to_string(),
            self.config.pixel_format.clone(),
            "-frames:v".to_string(),
            request.zoom.frame_count(request.duration).to_string(),
            request.clip_path.display().to_string(),
        ]
    }

    pub fn concat_args(&self, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            self.concat_list.display().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            output.display().to_string(),
        ]
    }

    /// Contents of the concat demuxer list, one `file '<path>'` line per clip
    ///
    /// The demuxer resolves relative entries against the list's own directory,
    /// so clip paths are made absolute first.
    pub fn concat_list_contents(clips: &[ClipHandle]) -> String {
        let mut list = String::new();
        for clip in clips {
            let path = absolute(&clip.path);
            let escaped = path.display().to_string().replace('\'', r"'\''");
            list.push_str(&format!("file '{}'\n", escaped));
        }
        list
    }

    fn run(&self, args: &[String]) -> Result<()> {
        let tool = self.tool();
        debug!("Running: {} {}", tool, args.join(" "));

        let output = Command::new(&self.config.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RenderError::SpawnFailed {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::ToolFailed {
                tool,
                status: output.status.to_string(),
                stderr: stderr.into_owned(),
            }
            .into());
        }

        Ok(())
    }
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}

impl SceneRenderer for FfmpegRenderer {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn render_still(&mut self, request: &StillClipRequest) -> Result<ClipHandle> {
        info!("🎬 Rendering {} ({:.2}s) -> {}", request.key, request.duration, request.clip_path.display());
        let frames = request.zoom.frame_count(request.duration);
        debug!("{} frames, zoom ends at {:.4}", frames, request.zoom.zoom_at(frames - 1));

        ensure_parent_dir(&request.clip_path)?;
        self.run(&self.still_clip_args(request))?;

        Ok(ClipHandle {
            key: request.key,
            path: request.clip_path.clone(),
        })
    }

    fn concatenate(&mut self, clips: &[ClipHandle], output: &Path) -> Result<OutputHandle> {
        info!("🔗 Concatenating {} clips into {}", clips.len(), output.display());
        ensure_parent_dir(&self.concat_list)?;
        fs::write(&self.concat_list, Self::concat_list_contents(clips))?;
        debug!("Wrote concat list {}", self.concat_list.display());

        ensure_parent_dir(output)?;
        self.run(&self.concat_args(output))?;

        Ok(OutputHandle {
            path: output.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::script::SceneKey;
    use tempfile::tempdir;

    fn renderer() -> FfmpegRenderer {
        FfmpegRenderer::new(EncodeConfig::default(), 1920, 1080, "build/concat_list.txt")
    }

    fn request() -> StillClipRequest {
        StillClipRequest {
            key: SceneKey::new(1, 2),
            frame_path: PathBuf::from("build/frames/V01_S02.png"),
            duration: 7.2,
            zoom: ZoomSpec::default(),
            clip_path: PathBuf::from("build/scenes/V01_S02.mp4"),
        }
    }

    #[test]
    fn test_video_filter() {
        assert_eq!(
            renderer().video_filter(&ZoomSpec::default()),
            "scale=1920:1080,zoompan=z='min(zoom+0.0008,1.06)':d=1:fps=30:s=1920x1080,format=yuv420p"
        );
    }

    #[test]
    fn test_still_clip_args() {
        let args = renderer().still_clip_args(&request());
        assert_eq!(&args[..7], ["-y", "-loop", "1", "-t", "7.2", "-i", "build/frames/V01_S02.png"]);
        assert_eq!(args[7], "-vf");
        assert_eq!(
            &args[9..],
            [
                "-c:v",
                "libx264",
                "-preset",
                "veryfast",
                "-crf",
                "18",
                "-pix_fmt",
                "yuv420p",
                "-frames:v",
                "216",
                "build/scenes/V01_S02.mp4"
            ]
        );
    }

    #[test]
    fn test_encoder_settings_are_configurable() {
        let config = EncodeConfig {
            codec: "libx265".to_string(),
            preset: "slow".to_string(),
            crf: 23,
            ..EncodeConfig::default()
        };
        let args = FfmpegRenderer::new(config, 1280, 720, "list.txt").still_clip_args(&request());
        assert!(args.contains(&"libx265".to_string()));
        assert!(args.contains(&"slow".to_string()));
        assert!(args.contains(&"23".to_string()));
        assert!(args.iter().any(|arg| arg.starts_with("scale=1280:720,")));
    }

    #[test]
    fn test_concat_args() {
        let args = renderer().concat_args(Path::new("output/course.mp4"));
        assert_eq!(
            args,
            [
                "-y",
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                "build/concat_list.txt",
                "-c",
                "copy",
                "output/course.mp4"
            ]
        );
    }

    #[test]
    fn test_concat_list_contents() {
        let clips = vec![
            ClipHandle {
                key: SceneKey::new(1, 1),
                path: PathBuf::from("/work/build/scenes/V01_S01.mp4"),
            },
            ClipHandle {
                key: SceneKey::new(1, 2),
                path: PathBuf::from("/work/it's/V01_S02.mp4"),
            },
        ];
        assert_eq!(
            FfmpegRenderer::concat_list_contents(&clips),
            "file '/work/build/scenes/V01_S01.mp4'\nfile '/work/it'\\''s/V01_S02.mp4'\n"
        );
    }

    #[test]
    fn test_missing_binary_is_spawn_failure() {
        let dir = tempdir().unwrap();
        let config = EncodeConfig {
            ffmpeg_path: dir.path().join("no-such-ffmpeg"),
            ..EncodeConfig::default()
        };
        let mut renderer = FfmpegRenderer::new(config, 1920, 1080, dir.path().join("concat_list.txt"));
        assert!(!renderer.check_ffmpeg_available());

        let mut request = request();
        request.clip_path = dir.path().join("scenes").join("V01_S02.mp4");
        let err = renderer.render_still(&request).unwrap_err();
        assert!(matches!(err, BuildError::Render(RenderError::SpawnFailed { .. })));
        assert!(err.is_external());
    }

    #[test]
    fn test_concatenate_writes_list_before_running() {
        let dir = tempdir().unwrap();
        let config = EncodeConfig {
            ffmpeg_path: dir.path().join("no-such-ffmpeg"),
            ..EncodeConfig::default()
        };
        let list = dir.path().join("build").join("concat_list.txt");
        let mut renderer = FfmpegRenderer::new(config, 1920, 1080, &list);

        let clips = vec![ClipHandle {
            key: SceneKey::new(1, 1),
            path: dir.path().join("V01_S01.mp4"),
        }];
        assert!(renderer.concatenate(&clips, &dir.path().join("out.mp4")).is_err());

        let written = fs::read_to_string(&list).unwrap();
        assert!(written.starts_with("file '"));
        assert!(written.trim_end().ends_with("V01_S01.mp4'"));
    }
}
