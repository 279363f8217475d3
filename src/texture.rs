//! Image textures sampled by normalized (u, v) coordinates.

use std::path::Path;

use image::RgbImage;

use crate::screen::Color;

/// A color grid addressed by (u, v) in [0, 1], with u running right
/// and v running up. Coordinates outside the unit square tile.
pub struct Texture {
    pixels: RgbImage,
}

impl Texture {
    /// Loads a texture from an image file.
    pub fn load(path: &Path) -> Result<Texture, image::ImageError> {
        let pixels = image::open(path)?.to_rgb8();
        return Ok(Texture { pixels });
    }

    /// Wraps an already decoded image.
    pub fn new(pixels: RgbImage) -> Texture {
        return Texture { pixels };
    }

    pub fn width(&self) -> u32 {
        return self.pixels.width();
    }

    pub fn height(&self) -> u32 {
        return self.pixels.height();
    }

    /// Nearest-neighbor lookup. v = 0 addresses the bottom row, so
    /// meshes can use the usual bottom-left texture origin.
    pub fn sample(&self, u: f64, v: f64) -> Color {
        let width = self.pixels.width();
        let height = self.pixels.height();
        let u = u - u.floor();
        let v = v - v.floor();
        let x = ((u * width as f64) as u32).min(width - 1);
        let y_up = ((v * height as f64) as u32).min(height - 1);
        let y = height - 1 - y_up;
        let pixel = self.pixels.get_pixel(x, y);
        return Color {
            r: pixel[0],
            g: pixel[1],
            b: pixel[2],
        };
    }
}
