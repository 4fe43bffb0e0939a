use std::path::{Path, PathBuf};

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for the course slideshow build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations
    pub paths: PathsConfig,

    /// Narration-based clip timing
    pub timing: TimingConfig,

    /// Image-to-scene assignment
    pub assignment: AssignmentConfig,

    /// Caption frame geometry and fonts
    pub frame: FrameConfig,

    /// External encoder settings
    pub encode: EncodeConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.timing.validate()?;
        self.assignment.validate()?;
        self.frame.validate()?;
        self.encode.validate()?;
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// File system locations used by a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Markdown narration script
    pub script: PathBuf,

    /// Directory scanned recursively for still images
    pub images_dir: PathBuf,

    /// Working directory for the mapping, frames and clips
    pub build_dir: PathBuf,

    /// Final concatenated video
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            script: PathBuf::from("script.md"),
            images_dir: PathBuf::from("images"),
            build_dir: PathBuf::from("build"),
            output: PathBuf::from("output/course.mp4"),
        }
    }
}

impl PathsConfig {
    /// Build every path relative to a single root directory
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        let defaults = Self::default();
        Self {
            script: root.join(defaults.script),
            images_dir: root.join(defaults.images_dir),
            build_dir: root.join(defaults.build_dir),
            output: root.join(defaults.output),
        }
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.build_dir.join("image_mapping.json")
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.build_dir.join("frames")
    }

    pub fn scenes_dir(&self) -> PathBuf {
        self.build_dir.join("scenes")
    }

    pub fn concat_list_path(&self) -> PathBuf {
        self.build_dir.join("concat_list.txt")
    }
}

/// Narration timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Speaking rate, seconds per word (0.36 is roughly 166 wpm)
    pub seconds_per_word: f64,

    /// Shortest clip in seconds
    pub min_seconds: f64,

    /// Longest clip in seconds
    pub max_seconds: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            seconds_per_word: 0.36,
            min_seconds: 4.0,
            max_seconds: 22.0,
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<()> {
        if !(self.seconds_per_word > 0.0) {
            return Err(invalid("timing.seconds_per_word", self.seconds_per_word).into());
        }

        if !(self.min_seconds > 0.0) || !self.max_seconds.is_finite() || self.min_seconds > self.max_seconds {
            return Err(invalid(
                "timing.duration_range",
                format!("{}-{}", self.min_seconds, self.max_seconds),
            )
            .into());
        }

        Ok(())
    }
}

/// Image assignment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// Case-insensitive patterns marking the product title card image
    pub title_tokens: Vec<String>,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            title_tokens: vec![
                r"ai\s*\+\s*me".to_string(),
                "aime".to_string(),
                "alme".to_string(),
            ],
        }
    }
}

impl AssignmentConfig {
    fn validate(&self) -> Result<()> {
        for token in &self.title_tokens {
            if RegexBuilder::new(token).case_insensitive(true).build().is_err() {
                return Err(invalid("assignment.title_tokens", token).into());
            }
        }
        Ok(())
    }
}

/// Caption frame configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub width: u32,
    pub height: u32,

    /// Letterbox / pillarbox colour
    pub background: [u8; 3],

    /// Caption font size in pixels
    pub font_size: f32,

    /// TrueType files tried in order; the first that loads wins
    pub font_candidates: Vec<PathBuf>,

    /// Extra pixels between caption lines
    pub line_spacing: u32,

    /// Distance from the canvas edge to the caption text box
    pub box_margin: u32,

    /// Caption text box top, as a fraction of the canvas height
    pub panel_top_ratio: f32,

    /// How far the rounded panel extends past the text box
    pub panel_padding: u32,

    pub panel_radius: u32,

    /// RGBA panel fill
    pub panel_fill: [u8; 4],

    /// RGBA panel outline
    pub panel_outline: [u8; 4],

    pub outline_width: u32,

    pub shadow_offset: i32,

    pub text_color: [u8; 3],

    pub shadow_color: [u8; 3],
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            background: [10, 10, 12],
            font_size: 44.0,
            font_candidates: vec![
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSansCondensed.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf"),
            ],
            line_spacing: 10,
            box_margin: 40,
            panel_top_ratio: 0.66,
            panel_padding: 10,
            panel_radius: 16,
            panel_fill: [0, 0, 0, 150],
            panel_outline: [255, 255, 255, 40],
            outline_width: 2,
            shadow_offset: 2,
            text_color: [240, 240, 240],
            shadow_color: [0, 0, 0],
        }
    }
}

impl FrameConfig {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(invalid("frame.resolution", format!("{}x{}", self.width, self.height)).into());
        }

        if !(self.font_size > 0.0) {
            return Err(invalid("frame.font_size", self.font_size).into());
        }

        if !(self.panel_top_ratio > 0.0 && self.panel_top_ratio < 1.0) {
            return Err(invalid("frame.panel_top_ratio", self.panel_top_ratio).into());
        }

        if self.box_margin >= self.width / 2 || self.box_margin >= self.height {
            return Err(invalid("frame.box_margin", self.box_margin).into());
        }

        // The caption box must keep a positive height below the panel top
        let panel_top = (self.height as f32 * self.panel_top_ratio) as u32;
        if panel_top >= self.height - self.box_margin {
            return Err(invalid("frame.panel_top_ratio", self.panel_top_ratio).into());
        }

        Ok(())
    }
}

/// External encoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Encoder executable, looked up on PATH when not absolute
    pub ffmpeg_path: PathBuf,

    pub fps: u32,

    /// Zoom added per output frame
    pub zoom_step: f64,

    /// Zoom never exceeds this factor
    pub zoom_ceiling: f64,

    pub codec: String,

    pub preset: String,

    /// Constant rate factor (0-51, lower is better)
    pub crf: u8,

    pub pixel_format: String,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            fps: 30,
            zoom_step: 0.0008,
            zoom_ceiling: 1.06,
            codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 18,
            pixel_format: "yuv420p".to_string(),
        }
    }
}

impl EncodeConfig {
    fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(invalid("encode.fps", self.fps).into());
        }

        if !(self.zoom_ceiling >= 1.0) || !(self.zoom_step >= 0.0) {
            return Err(invalid(
                "encode.zoom",
                format!("step {} ceiling {}", self.zoom_step, self.zoom_ceiling),
            )
            .into());
        }

        if self.crf > 51 {
            return Err(invalid("encode.crf", self.crf).into());
        }

        Ok(())
    }
}
