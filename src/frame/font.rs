use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use image::RgbImage;
use tracing::{info, warn};

use crate::frame::builtin_font::{self, CELL_WIDTH, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::frame::paint::blend_coverage;

/// Pixel scale applied to the 5x7 built-in glyphs
pub const BUILTIN_SCALE: u32 = 3;

/// Font used to measure and draw captions
pub enum CaptionFont {
    /// A TrueType face rasterised at a fixed pixel size
    TrueType {
        font: Font,
        size: f32,
        ascent: f32,
        source: PathBuf,
    },
    /// The built-in bitmap font, scaled by a whole number
    Builtin { scale: u32 },
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrueType { size, source, .. } => f
                .debug_struct("TrueType")
                .field("size", size)
                .field("source", source)
                .finish(),
            Self::Builtin { scale } => f.debug_struct("Builtin").field("scale", scale).finish(),
        }
    }
}

impl CaptionFont {
    /// First candidate that exists and parses, else the built-in font
    pub fn load(candidates: &[PathBuf], size: f32) -> Self {
        for candidate in candidates {
            if !candidate.exists() {
                continue;
            }
            match Self::from_file(candidate, size) {
                Ok(font) => {
                    info!("Using caption font {} at {}px", candidate.display(), size);
                    return font;
                }
                Err(reason) => warn!("Skipping font {}: {}", candidate.display(), reason),
            }
        }

        warn!("No caption font candidate could be loaded, falling back to the built-in bitmap font");
        Self::builtin()
    }

    pub fn from_file(path: &Path, size: f32) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
        let settings = FontSettings {
            scale: size,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings).map_err(|e| e.to_string())?;
        let ascent = font
            .horizontal_line_metrics(size)
            .map(|metrics| metrics.ascent)
            .unwrap_or(size);

        Ok(Self::TrueType {
            font,
            size,
            ascent,
            source: path.to_path_buf(),
        })
    }

    pub fn builtin() -> Self {
        Self::Builtin {
            scale: BUILTIN_SCALE,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    /// Nominal pixel size, used for line spacing
    pub fn size(&self) -> u32 {
        match self {
            Self::TrueType { size, .. } => size.round() as u32,
            Self::Builtin { scale } => GLYPH_HEIGHT * scale,
        }
    }

    /// Rendered advance width of `text` in pixels
    pub fn measure(&self, text: &str) -> u32 {
        match self {
            Self::TrueType { font, size, .. } => {
                let mut width = 0.0f32;
                let mut previous = None;
                for c in text.chars() {
                    if let Some(prev) = previous {
                        width += font.horizontal_kern(prev, c, *size).unwrap_or(0.0);
                    }
                    width += font.metrics(c, *size).advance_width;
                    previous = Some(c);
                }
                width.ceil().max(0.0) as u32
            }
            Self::Builtin { scale } => {
                let count = text.chars().count() as u32;
                if count == 0 {
                    0
                } else {
                    // The last cell has no trailing spacing column
                    ((count - 1) * CELL_WIDTH + GLYPH_WIDTH) * scale
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`)
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: [u8; 3]) {
        match self {
            Self::TrueType {
                font, size, ascent, ..
            } => {
                let baseline = y as f32 + ascent;
                let mut pen_x = x as f32;
                let mut previous = None;

                for c in text.chars() {
                    if let Some(prev) = previous {
                        pen_x += font.horizontal_kern(prev, c, *size).unwrap_or(0.0);
                    }
                    let (metrics, bitmap) = font.rasterize(c, *size);
                    let glyph_x = (pen_x + metrics.xmin as f32).round() as i32;
                    let glyph_y = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i32;
                    blend_coverage(canvas, glyph_x, glyph_y, metrics.width, metrics.height, &bitmap, color);

                    pen_x += metrics.advance_width;
                    previous = Some(c);
                }
            }
            Self::Builtin { scale } => {
                let scale = *scale as usize;
                let cell = (GLYPH_WIDTH as usize) * scale;
                let rows = (GLYPH_HEIGHT as usize) * scale;

                for (index, c) in text.chars().enumerate() {
                    let Some(glyph) = builtin_font::glyph(c) else {
                        continue;
                    };
                    let mut mask = vec![0u8; cell * rows];
                    for (row, bits) in glyph.iter().enumerate() {
                        for col in 0..GLYPH_WIDTH as usize {
                            if bits & (1 << (GLYPH_WIDTH as usize - 1 - col)) == 0 {
                                continue;
                            }
                            for dy in 0..scale {
                                let start = (row * scale + dy) * cell + col * scale;
                                mask[start..start + scale].fill(255);
                            }
                        }
                    }
                    let glyph_x = x + (index * CELL_WIDTH as usize * scale) as i32;
                    blend_coverage(canvas, glyph_x, y, cell, rows, &mask, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_missing_candidates_fall_back_to_builtin() {
        let font = CaptionFont::load(&[PathBuf::from("/definitely/not/here.ttf")], 44.0);
        assert!(font.is_builtin());
        assert_eq!(font.size(), GLYPH_HEIGHT * BUILTIN_SCALE);
    }

    #[test]
    fn test_unparsable_candidate_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"this is not a font").unwrap();

        let font = CaptionFont::load(&[bogus], 44.0);
        assert!(font.is_builtin());
    }

    #[test]
    fn test_builtin_measure() {
        let font = CaptionFont::builtin();
        assert_eq!(font.measure(""), 0);
        assert_eq!(font.measure("A"), GLYPH_WIDTH * BUILTIN_SCALE);
        assert_eq!(font.measure("AB"), (CELL_WIDTH + GLYPH_WIDTH) * BUILTIN_SCALE);
        assert!(font.measure("hello world") > font.measure("hello"));
    }

    #[test]
    fn test_builtin_draw_marks_pixels_inside_measured_box() {
        let font = CaptionFont::builtin();
        let mut canvas = RgbImage::from_pixel(200, 60, Rgb([0, 0, 0]));
        font.draw(&mut canvas, 10, 10, "HI", [240, 240, 240]);

        let width = font.measure("HI");
        let mut lit = 0;
        for (x, y, pixel) in canvas.enumerate_pixels() {
            if pixel.0 != [0, 0, 0] {
                lit += 1;
                assert!(x >= 10 && x < 10 + width, "x {} outside", x);
                assert!(y >= 10 && y < 10 + font.size(), "y {} outside", y);
            }
        }
        assert!(lit > 0);
    }
}
