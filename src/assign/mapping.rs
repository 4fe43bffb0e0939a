use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::script::SceneKey;

/// Scene key to image path mapping, persisted as a JSON object
///
/// Keys are stored as strings so a hand-edited file loads unchanged even when it
/// contains keys the current script no longer produces. Entries are kept sorted,
/// which makes the serialized form stable. A `null` or empty path marks a scene
/// as unmapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageMapping {
    entries: BTreeMap<String, Option<PathBuf>>,
}

impl ImageMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<P: Into<PathBuf>>(&mut self, key: SceneKey, path: P) {
        self.entries.insert(key.to_string(), Some(path.into()));
    }

    /// Image for `key`, if one is set
    pub fn get(&self, key: &SceneKey) -> Option<&Path> {
        self.entries
            .get(&key.to_string())
            .and_then(|entry| entry.as_deref())
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub fn contains(&self, key: &SceneKey) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order; cleared entries yield `None`
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Path>)> {
        self.entries.iter().map(|(key, path)| {
            let path = path.as_deref().filter(|path| !path.as_os_str().is_empty());
            (key.as_str(), path)
        })
    }

    /// Pretty-printed JSON with two-space indentation
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
