use std::path::Path;

use image::RgbImage;

/// Caption text box in canvas pixels; `right` and `bottom` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CaptionBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Where the caption ended up on a composed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLayout {
    pub text_box: CaptionBox,

    /// Wrapped caption lines, top to bottom
    pub lines: Vec<String>,

    /// Top of the first line
    pub first_line_y: u32,

    pub line_height: u32,
}

/// A fully composed scene still
///
/// Wraps the RGB canvas together with the caption layout that was drawn on it.
#[derive(Clone, Debug)]
pub struct ComposedFrame {
    buffer: RgbImage,
    layout: CaptionLayout,
}

impl ComposedFrame {
    pub fn new(buffer: RgbImage, layout: CaptionLayout) -> Self {
        Self { buffer, layout }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn layout(&self) -> &CaptionLayout {
        &self.layout
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.as_image()
            .save_with_format(path, image::ImageFormat::Png)
    }
}
