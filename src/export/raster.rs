//! Minimal software rasterizer over an RGBA image buffer.

use image::{Rgba, RgbaImage};

/// Drawing surface for the exported plot image.
pub(super) struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        let [r, g, b] = background;
        let image = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));
        Self { image }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn put(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let [r, g, b] = color;
        self.image.put_pixel(x as u32, y as u32, Rgba([r, g, b, 255]));
    }

    /// Blend `color` over the existing pixel with `alpha` in [0, 255].
    pub fn blend(&mut self, x: i64, y: i64, color: [u8; 3], alpha: u8) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let existing = self.image.get_pixel(x as u32, y as u32).0;
        let a = alpha as u16;
        let mut blended = [0u8; 4];
        for channel in 0..3 {
            let over = color[channel] as u16;
            let under = existing[channel] as u16;
            blended[channel] = ((over * a + under * (255 - a)) / 255) as u8;
        }
        blended[3] = 255;
        self.image.put_pixel(x as u32, y as u32, Rgba(blended));
    }

    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.put(x, y, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
        self.line(x0, y0, x1, y0, color);
        self.line(x1, y0, x1, y1, color);
        self.line(x1, y1, x0, y1, color);
        self.line(x0, y1, x0, y0, color);
    }

    /// Bresenham line.
    pub fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += sx;
            }
            if doubled <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn fill_circle(&mut self, cx: i64, cy: i64, radius: i64, color: [u8; 3]) {
        for y in -radius..=radius {
            for x in -radius..=radius {
                if x * x + y * y <= radius * radius {
                    self.put(cx + x, cy + y, color);
                }
            }
        }
    }

    /// Translucent filled circle for the background point layer.
    pub fn blend_circle(&mut self, cx: i64, cy: i64, radius: i64, color: [u8; 3], alpha: u8) {
        for y in -radius..=radius {
            for x in -radius..=radius {
                if x * x + y * y <= radius * radius {
                    self.blend(cx + x, cy + y, color, alpha);
                }
            }
        }
    }
}
