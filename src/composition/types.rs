use std::path::{Path, PathBuf};

use crate::assign::{ImageMapping, MappingOrigin};
use crate::render::ClipHandle;
use crate::script::SceneKey;

/// Why a scene did not get its mapped image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The mapping has no entry for the scene
    Unmapped,
    /// The mapping names a file that no longer exists
    MissingFile(PathBuf),
}

/// Image resolved for a scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChoice {
    Mapped(PathBuf),
    Fallback { path: PathBuf, reason: FallbackReason },
}

impl ImageChoice {
    /// Look `key` up in `mapping`, substituting `fallback` for absent keys and missing files
    pub fn resolve(mapping: &ImageMapping, key: &SceneKey, fallback: &Path) -> Self {
        match mapping.get(key) {
            Some(path) if path.is_file() => Self::Mapped(path.to_path_buf()),
            Some(path) => Self::Fallback {
                path: fallback.to_path_buf(),
                reason: FallbackReason::MissingFile(path.to_path_buf()),
            },
            None => Self::Fallback {
                path: fallback.to_path_buf(),
                reason: FallbackReason::Unmapped,
            },
        }
    }

    /// The image that will actually be composed
    pub fn path(&self) -> &Path {
        match self {
            Self::Mapped(path) => path,
            Self::Fallback { path, .. } => path,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Everything decided about a scene before anything is drawn or encoded
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePlan {
    pub key: SceneKey,
    pub narration: String,

    /// Clip length in seconds
    pub duration: f64,

    pub image: ImageChoice,
}

/// Result of building one scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneOutcome {
    pub plan: ScenePlan,
    pub frame_path: PathBuf,
    pub clip: ClipHandle,
}

/// Summary of a full build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub mapping_origin: MappingOrigin,
    pub scenes: Vec<SceneOutcome>,
}

impl BuildReport {
    pub fn total_duration(&self) -> f64 {
        self.scenes.iter().map(|scene| scene.plan.duration).sum()
    }

    pub fn fallback_count(&self) -> usize {
        self.scenes.iter().filter(|scene| scene.plan.image.is_fallback()).count()
    }
}
