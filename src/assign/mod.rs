//! # Image Assignment
//!
//! Discovers still images and decides which one illustrates each scene.
//!
//! The decision is made once: the computed [`ImageMapping`] is persisted through a
//! [`MappingStore`] and every later run loads it verbatim, even when the script or
//! the image directory has changed since. Delete the stored mapping to recompute.

pub mod assigner;
pub mod discovery;
pub mod mapping;
pub mod store;

pub use assigner::ImageAssigner;
pub use discovery::{discover_images, is_supported_image, IMAGE_EXTENSIONS};
pub use mapping::ImageMapping;
pub use store::{CachedMapping, JsonFileStore, MappingOrigin, MappingStore, MemoryStore};
