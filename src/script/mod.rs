//! # Script Module
//!
//! Turns the markdown narration script into ordered [`Video`] and [`Scene`] entities.
//!
//! A script is a sequence of sections, each introduced by a level-2 bold heading
//! (`## **Video 1: Welcome**`) and optionally followed by a `Scene | Visual | Narration`
//! table. Anything the parser does not recognise is skipped silently.

pub mod parser;
pub mod types;

pub use parser::parse_script;
pub use types::{Scene, SceneKey, Video};
