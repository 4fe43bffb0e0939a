//! Pixel-level helpers: alpha blending, rounded panels and contain-fit scaling.

use image::{imageops, imageops::FilterType, DynamicImage, Rgb, RgbImage};

/// Source-over blend of an RGBA colour onto one RGB pixel
pub fn blend_pixel(canvas: &mut RgbImage, x: u32, y: u32, src: [u8; 4]) {
    let alpha = u16::from(src[3]);
    if alpha == 0 || x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let inv_alpha = 255 - alpha;
    let dst = canvas.get_pixel_mut(x, y);
    for channel in 0..3 {
        let d = u16::from(dst[channel]);
        let s = u16::from(src[channel]);
        dst[channel] = ((s * alpha + d * inv_alpha + 127) / 255) as u8;
    }
}

/// Blend an 8-bit coverage mask, positioned at (`x`, `y`), in a solid colour
pub fn blend_coverage(
    canvas: &mut RgbImage,
    x: i32,
    y: i32,
    mask_width: usize,
    mask_height: usize,
    mask: &[u8],
    color: [u8; 3],
) {
    for row in 0..mask_height {
        let py = y + row as i32;
        if py < 0 || py >= canvas.height() as i32 {
            continue;
        }

        for col in 0..mask_width {
            let px = x + col as i32;
            if px < 0 || px >= canvas.width() as i32 {
                continue;
            }
            let coverage = mask[row * mask_width + col];
            if coverage == 0 {
                continue;
            }
            blend_pixel(canvas, px as u32, py as u32, [color[0], color[1], color[2], coverage]);
        }
    }
}

/// Rounded rectangle in canvas coordinates; `right` and `bottom` are exclusive edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub radius: f32,
}

impl RoundedRect {
    /// Whether the point lies inside the shape
    pub fn contains(&self, px: f32, py: f32) -> bool {
        if px < self.left || px > self.right || py < self.top || py > self.bottom {
            return false;
        }
        let radius = self.radius.max(0.0);
        let cx = px.clamp(self.left + radius, (self.right - radius).max(self.left + radius));
        let cy = py.clamp(self.top + radius, (self.bottom - radius).max(self.top + radius));
        let (dx, dy) = (px - cx, py - cy);
        dx * dx + dy * dy <= radius * radius
    }

    /// The same shape shrunk by `by` pixels on every side
    pub fn inset(&self, by: f32) -> Self {
        Self {
            left: self.left + by,
            top: self.top + by,
            right: self.right - by,
            bottom: self.bottom - by,
            radius: (self.radius - by).max(0.0),
        }
    }
}

/// Blend a filled rounded panel with an inner outline of `outline_width` pixels
pub fn fill_rounded_panel(
    canvas: &mut RgbImage,
    shape: RoundedRect,
    fill: [u8; 4],
    outline: [u8; 4],
    outline_width: u32,
) {
    let inner = shape.inset(outline_width as f32);

    let x0 = shape.left.floor().max(0.0) as u32;
    let y0 = shape.top.floor().max(0.0) as u32;
    let x1 = (shape.right.ceil().max(0.0) as u32).min(canvas.width());
    let y1 = (shape.bottom.ceil().max(0.0) as u32).min(canvas.height());

    for y in y0..y1 {
        for x in x0..x1 {
            // Sample at the pixel centre
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            if !shape.contains(px, py) {
                continue;
            }
            let color = if outline_width == 0 || inner.contains(px, py) {
                fill
            } else {
                outline
            };
            blend_pixel(canvas, x, y, color);
        }
    }
}

/// Largest size with the source aspect ratio that fits inside the target
pub fn contain_fit(src_width: u32, src_height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let (src_width, src_height) = (u64::from(src_width.max(1)), u64::from(src_height.max(1)));
    let (max_w, max_h) = (u64::from(max_width), u64::from(max_height));

    // Compare aspect ratios by cross-multiplying to stay exact
    if src_width * max_h > max_w * src_height {
        let height = (max_w * src_height / src_width) as u32;
        (max_width, height.clamp(1, max_height))
    } else {
        let width = (max_h * src_width / src_height) as u32;
        (width.clamp(1, max_width), max_height)
    }
}

/// Canvas of `width`x`height` in `background` with `source` contain-fitted and centred
pub fn letterbox(source: &DynamicImage, width: u32, height: u32, background: [u8; 3]) -> RgbImage {
    let rgb = source.to_rgb8();
    let (fit_width, fit_height) = contain_fit(rgb.width(), rgb.height(), width, height);

    let scaled = if (fit_width, fit_height) == rgb.dimensions() {
        rgb
    } else {
        imageops::resize(&rgb, fit_width, fit_height, FilterType::Lanczos3)
    };

    let mut canvas = RgbImage::from_pixel(width, height, Rgb(background));
    let offset_x = (width - fit_width) / 2;
    let offset_y = (height - fit_height) / 2;
    imageops::replace(&mut canvas, &scaled, offset_x as i64, offset_y as i64);
    canvas
}
