use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::assign::mapping::ImageMapping;
use crate::error::{MappingError, Result};

/// Where the mapping used by a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingOrigin {
    /// Read from the store; the assignment algorithm did not run
    Loaded,
    /// Computed by the assignment algorithm and written to the store
    Computed,
}

/// Mapping plus its origin
#[derive(Debug, Clone, PartialEq)]
pub struct CachedMapping {
    pub mapping: ImageMapping,
    pub origin: MappingOrigin,
}

/// Cache abstraction over the persisted scene-to-image mapping
///
/// A stored mapping is the sole source of truth until [`MappingStore::invalidate`]
/// removes it, even if it no longer matches the script or the image set.
pub trait MappingStore {
    /// Human-readable location, used in log messages
    fn describe(&self) -> String;

    /// Load the stored mapping, if there is one
    fn load(&self) -> Result<Option<ImageMapping>>;

    /// Persist `mapping`, replacing anything stored before
    fn store(&mut self, mapping: &ImageMapping) -> Result<()>;

    /// Drop the stored mapping so the next run recomputes it
    fn invalidate(&mut self) -> Result<()>;

    /// Load the stored mapping, or compute, store and return a new one
    ///
    /// `compute` is not called when a mapping is already stored. A computed mapping
    /// is persisted before it is returned.
    fn load_or_compute(&mut self, compute: &mut dyn FnMut() -> ImageMapping) -> Result<CachedMapping> {
        if let Some(mapping) = self.load()? {
            info!("Loaded existing image mapping from {} ({} entries)", self.describe(), mapping.len());
            if mapping.is_empty() {
                warn!("Image mapping {} is empty; every scene will use the fallback image", self.describe());
            }
            return Ok(CachedMapping {
                mapping,
                origin: MappingOrigin::Loaded,
            });
        }

        let mapping = compute();
        self.store(&mapping)?;
        info!("Saved new image mapping to {} ({} entries)", self.describe(), mapping.len());

        Ok(CachedMapping {
            mapping,
            origin: MappingOrigin::Computed,
        })
    }
}

/// Mapping stored as a hand-editable JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MappingStore for JsonFileStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Option<ImageMapping>> {
        if !self.path.exists() {
            debug!("No image mapping at {}", self.path.display());
            return Ok(None);
        }

        let text = std::fs::read_to_string(&self.path).map_err(|source| MappingError::ReadFailed {
            path: self.describe(),
            source,
        })?;

        let mapping = ImageMapping::from_json(&text).map_err(|source| MappingError::ParseFailed {
            path: self.describe(),
            source,
        })?;

        for (key, _) in mapping.iter().filter(|(_, path)| path.is_none()) {
            debug!("Mapping entry {} is cleared", key);
        }

        Ok(Some(mapping))
    }

    fn store(&mut self, mapping: &ImageMapping) -> Result<()> {
        let write_failed = |reason: String| MappingError::WriteFailed {
            path: self.describe(),
            reason,
        };

        let json = mapping.to_json().map_err(|e| write_failed(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
        }
        std::fs::write(&self.path, json).map_err(|e| write_failed(e.to_string()))?;
        Ok(())
    }

    fn invalidate(&mut self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Removed image mapping {}", self.path.display());
        }
        Ok(())
    }
}

/// In-memory store for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<ImageMapping>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `mapping`, as if a previous run had persisted it
    pub fn with_mapping(mapping: ImageMapping) -> Self {
        Self {
            slot: Some(mapping),
            writes: 0,
        }
    }

    /// Number of times a mapping was written
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl MappingStore for MemoryStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<Option<ImageMapping>> {
        Ok(self.slot.clone())
    }

    fn store(&mut self, mapping: &ImageMapping) -> Result<()> {
        self.slot = Some(mapping.clone());
        self.writes += 1;
        Ok(())
    }

    fn invalidate(&mut self) -> Result<()> {
        self.slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::SceneKey;
    use tempfile::tempdir;

    fn sample() -> ImageMapping {
        let mut mapping = ImageMapping::new();
        mapping.insert(SceneKey::new(1, 1), "images/a.png");
        mapping
    }

    #[test]
    fn test_compute_runs_once_then_loads() {
        let mut store = MemoryStore::new();
        let mut calls = 0;

        let first = store
            .load_or_compute(&mut || {
                calls += 1;
                sample()
            })
            .unwrap();
        assert_eq!(first.origin, MappingOrigin::Computed);

        let second = store
            .load_or_compute(&mut || {
                calls += 1;
                ImageMapping::new()
            })
            .unwrap();
        assert_eq!(second.origin, MappingOrigin::Loaded);
        assert_eq!(second.mapping, sample());
        assert_eq!(calls, 1);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let mut store = MemoryStore::with_mapping(sample());
        store.invalidate().unwrap();
        assert!(store.slot.is_none());

        let cached = store.load_or_compute(&mut ImageMapping::new).unwrap();
        assert_eq!(cached.origin, MappingOrigin::Computed);
        assert!(cached.mapping.is_empty());
    }

    #[test]
    fn test_json_store_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("build/image_mapping.json");
        let mut store = JsonFileStore::new(&path);

        assert!(store.load().unwrap().is_none());
        let cached = store.load_or_compute(&mut sample).unwrap();
        assert_eq!(cached.origin, MappingOrigin::Computed);
        assert!(path.exists());

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_json_store_loads_hand_edits_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("image_mapping.json");
        std::fs::write(&path, r#"{"V01_S01": "/elsewhere/custom.png"}"#).unwrap();

        let mut store = JsonFileStore::new(&path);
        let cached = store.load_or_compute(&mut sample).unwrap();
        assert_eq!(cached.origin, MappingOrigin::Loaded);
        assert_eq!(
            cached.mapping.get(&SceneKey::new(1, 1)),
            Some(Path::new("/elsewhere/custom.png"))
        );
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("image_mapping.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().is_err());
    }

    #[test]
    fn test_json_store_invalidate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("image_mapping.json");
        let mut store = JsonFileStore::new(&path);
        store.store(&sample()).unwrap();

        store.invalidate().unwrap();
        assert!(!path.exists());
        // Invalidating twice is fine
        store.invalidate().unwrap();
    }
}
