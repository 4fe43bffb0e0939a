//! # Composition Engine
//!
//! The composition engine sequences script parsing, image assignment, frame
//! composition and clip rendering into one course video.

pub mod engine;
pub mod types;

// Re-exports for convenience
pub use engine::SlideshowEngine;
pub use types::{BuildReport, FallbackReason, ImageChoice, SceneOutcome, ScenePlan};
