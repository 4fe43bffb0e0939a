use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One video section of the course script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Number from the `Video N:` heading
    pub video_number: u32,

    pub title: String,

    /// Scenes in table row order
    pub scenes: Vec<Scene>,
}

impl Video {
    pub fn new<S: Into<String>>(video_number: u32, title: S) -> Self {
        Self {
            video_number,
            title: title.into(),
            scenes: Vec::new(),
        }
    }

    /// Key of the given scene within this video
    pub fn key_for(&self, scene: &Scene) -> SceneKey {
        SceneKey::new(self.video_number, scene.scene_number)
    }
}

/// One row of a video's scene table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub scene_number: u32,

    /// Free-text description of what should be on screen
    pub visual: String,

    /// Caption text with surrounding quotes removed
    pub narration: String,
}

impl Scene {
    pub fn new<V: Into<String>, N: Into<String>>(scene_number: u32, visual: V, narration: N) -> Self {
        Self {
            scene_number,
            visual: visual.into(),
            narration: narration.into(),
        }
    }
}

/// Identifier joining a video number and a scene number, rendered as `V01_S03`
///
/// Used as the mapping key and to name per-scene artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SceneKey {
    pub video_number: u32,
    pub scene_number: u32,
}

impl SceneKey {
    pub fn new(video_number: u32, scene_number: u32) -> Self {
        Self {
            video_number,
            scene_number,
        }
    }

    /// Artifact file name for this key with the given extension
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self, extension)
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:02}_S{:02}", self.video_number, self.scene_number)
    }
}

impl FromStr for SceneKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || format!("malformed scene key '{}'", s);

        let (video, scene) = s
            .strip_prefix('V')
            .and_then(|rest| rest.split_once("_S"))
            .ok_or_else(malformed)?;

        let video_number = video.parse().map_err(|_| malformed())?;
        let scene_number = scene.parse().map_err(|_| malformed())?;
        Ok(Self::new(video_number, scene_number))
    }
}

impl TryFrom<String> for SceneKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SceneKey> for String {
    fn from(key: SceneKey) -> Self {
        key.to_string()
    }
}

/// Every (video, scene) pair in document order
pub fn scene_pairs(videos: &[Video]) -> impl Iterator<Item = (&Video, &Scene)> {
    videos
        .iter()
        .flat_map(|video| video.scenes.iter().map(move |scene| (video, scene)))
}
