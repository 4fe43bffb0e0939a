//! # Frame Composition
//!
//! Builds the fixed-size captioned still for each scene: the source image is
//! contain-fitted onto a dark canvas, a translucent rounded panel is laid over the
//! bottom third, and the narration is word-wrapped into it with a drop shadow.
//!
//! Captions use the first TrueType font that loads from the configured candidates.
//! When none is available a small built-in bitmap font is used instead; captions
//! then render smaller and blockier but the frame is otherwise identical.

pub mod builtin_font;
pub mod composer;
pub mod font;
pub mod layout;
pub mod paint;
pub mod types;

pub use composer::FrameComposer;
pub use font::CaptionFont;
pub use layout::wrap_text;
pub use types::{CaptionBox, CaptionLayout, ComposedFrame};
