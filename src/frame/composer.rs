use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::frame::font::CaptionFont;
use crate::frame::layout::wrap_text;
use crate::frame::paint::{fill_rounded_panel, letterbox, RoundedRect};
use crate::frame::types::{CaptionBox, CaptionLayout, ComposedFrame};

/// Composes the captioned still for a scene
///
/// The canvas size, caption panel and font are fixed for the lifetime of the
/// composer, so every frame it produces shares the same panel geometry; only the
/// number of wrapped lines depends on the narration.
pub struct FrameComposer {
    config: FrameConfig,
    font: CaptionFont,
}

impl FrameComposer {
    /// Create a composer, picking the caption font from the configured candidates
    pub fn new(config: FrameConfig) -> Self {
        let font = CaptionFont::load(&config.font_candidates, config.font_size);
        debug!("Caption font {:?} (built-in: {})", font, font.is_builtin());
        Self { config, font }
    }

    pub fn with_font(config: FrameConfig, font: CaptionFont) -> Self {
        Self { config, font }
    }

    /// Area the caption text is wrapped into
    pub fn text_box(&self) -> CaptionBox {
        let margin = self.config.box_margin;
        CaptionBox {
            left: margin,
            top: (self.config.height as f32 * self.config.panel_top_ratio) as u32,
            right: self.config.width - margin,
            bottom: self.config.height - margin,
        }
    }

    /// The translucent panel drawn behind the text box
    fn panel_shape(&self, text_box: CaptionBox) -> RoundedRect {
        let padding = self.config.panel_padding as f32;
        RoundedRect {
            left: text_box.left as f32 - padding,
            top: text_box.top as f32 - padding,
            right: text_box.right as f32 + padding + 1.0,
            bottom: text_box.bottom as f32 + padding + 1.0,
            radius: self.config.panel_radius as f32,
        }
    }

    pub fn line_height(&self) -> u32 {
        self.font.size() + self.config.line_spacing
    }

    /// Wrap narration to the text box width using rendered glyph widths
    pub fn wrap(&self, narration: &str) -> Vec<String> {
        wrap_text(narration, self.text_box().width(), |text| self.font.measure(text))
    }

    /// Load `image_path` and compose its captioned frame
    pub fn compose(&self, image_path: &Path, narration: &str) -> Result<ComposedFrame> {
        let source = image::open(image_path).map_err(|source| FrameError::LoadFailed {
            path: image_path.display().to_string(),
            source,
        })?;
        Ok(self.compose_image(&source, narration))
    }

    /// Compose a frame from an already decoded image
    pub fn compose_image(&self, source: &DynamicImage, narration: &str) -> ComposedFrame {
        let config = &self.config;
        let mut canvas = letterbox(source, config.width, config.height, config.background);

        let text_box = self.text_box();
        fill_rounded_panel(
            &mut canvas,
            self.panel_shape(text_box),
            config.panel_fill,
            config.panel_outline,
            config.outline_width,
        );

        let lines = self.wrap(narration);
        let line_height = self.line_height();
        let block_height = line_height * lines.len() as u32;
        let first_line_y = text_box.top + text_box.height().saturating_sub(block_height) / 2;

        debug!(
            "Caption wrapped into {} lines ({}px block)",
            lines.len(),
            block_height
        );

        let offset = config.shadow_offset;
        for (index, line) in lines.iter().enumerate() {
            let x = text_box.left as i32;
            let y = (first_line_y + index as u32 * line_height) as i32;
            self.font.draw(&mut canvas, x + offset, y + offset, line, config.shadow_color);
            self.font.draw(&mut canvas, x, y, line, config.text_color);
        }

        ComposedFrame::new(
            canvas,
            CaptionLayout {
                text_box,
                lines,
                first_line_y,
                line_height,
            },
        )
    }

    /// Compose and write the frame as PNG
    pub fn compose_to_file(&self, image_path: &Path, narration: &str, out_path: &Path) -> Result<ComposedFrame> {
        let frame = self.compose(image_path, narration)?;
        frame.save_png(out_path).map_err(|source| FrameError::SaveFailed {
            path: out_path.display().to_string(),
            source,
        })?;
        Ok(frame)
    }
}
