use thiserror::Error;

/// Main error type for the course slideshow library
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Image mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Frame composition error: {0}")]
    Frame(#[from] FrameError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Missing or empty pipeline inputs
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Script file not found: {path}")]
    ScriptNotFound { path: String },

    #[error("Images directory not found: {path}")]
    ImageDirNotFound { path: String },

    #[error("No images found in {path}")]
    NoImages { path: String },
}

/// Errors reading or writing the persisted scene-to-image mapping
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Failed to read image mapping {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse image mapping {path}: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write image mapping {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// Frame composition errors
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Failed to load source image {path}: {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save frame {path}: {source}")]
    SaveFailed {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Failures reported by the external encoding tool
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to run {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using BuildError
pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    /// Whether the error stems from the external encoder rather than the pipeline itself
    pub fn is_external(&self) -> bool {
        matches!(self, Self::Render(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Input(InputError::ScriptNotFound { path }) => {
                format!("Script file '{}' does not exist. Check [paths].script in the configuration.", path)
            }
            Self::Input(InputError::ImageDirNotFound { path }) => {
                format!("Images directory '{}' does not exist. Check [paths].images_dir in the configuration.", path)
            }
            Self::Input(InputError::NoImages { path }) => {
                format!("No png, jpg, jpeg, webp, bmp, tiff or gif files were found under '{}'.", path)
            }
            Self::Mapping(MappingError::ParseFailed { path, .. }) => {
                format!("Image mapping '{}' is not valid JSON. Fix it by hand or delete it to recompute.", path)
            }
            Self::Render(RenderError::SpawnFailed { tool, .. }) => {
                format!("Could not start '{}'. Please install FFmpeg or set [encode].ffmpeg_path.", tool)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_names_path() {
        let err: BuildError = InputError::NoImages { path: "imgs".to_string() }.into();
        assert!(err.user_message().contains("'imgs'"));
        assert!(!err.is_external());
    }

    #[test]
    fn test_spawn_failure_is_external() {
        let err: BuildError = RenderError::SpawnFailed {
            tool: "ffmpeg".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        }
        .into();
        assert!(err.is_external());
        assert!(err.user_message().contains("ffmpeg"));
    }
}
