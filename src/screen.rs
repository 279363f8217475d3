//! Pixel surface the renderer draws into, plus a small color type.

use std::path::Path;

/// RGB color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

/// Neutral gray used to clear every new frame.
pub const BACKGROUND: Color = Color { r: 0x5C, g: 0x5C, b: 0x5C };

impl Color {
    /// Blends the color with another one.
    /// `ratio` gives the weight of `self`, 1.0 keeps it unchanged.
    pub fn blend(&self, other: &Color, ratio: f64) -> Color {
        let ratio = ratio.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (ratio * a as f64 + (1.0 - ratio) * b as f64).round() as u8;
        return Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        };
    }
}

/// Row-major RGB pixel buffer. Row 0 is the top of the image.
pub struct Screen {
    pub width: u32,
    pub height: u32,
    pixel_data: Vec<u8>,
}

impl Screen {
    /// Creates a screen cleared to the background color.
    pub fn new(width: u32, height: u32) -> Screen {
        let mut pixel_data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            pixel_data.push(BACKGROUND.r);
            pixel_data.push(BACKGROUND.g);
            pixel_data.push(BACKGROUND.b);
        }
        return Screen {
            width,
            height,
            pixel_data,
        };
    }

    /// Checking if a coordinate falls outside the drawable area.
    pub fn is_clipped(&self, x: i32, y: i32) -> bool {
        return x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32;
    }

    /// Writes one pixel. Clipped coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.is_clipped(x, y) {
            return;
        }
        let index = ((y * self.width as i32 + x) * 3) as usize;
        self.pixel_data[index] = color.r;
        self.pixel_data[index + 1] = color.g;
        self.pixel_data[index + 2] = color.b;
    }

    /// Reads one pixel back. Clipped coordinates return the background.
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        if self.is_clipped(x, y) {
            return BACKGROUND;
        }
        let index = ((y * self.width as i32 + x) * 3) as usize;
        return Color {
            r: self.pixel_data[index],
            g: self.pixel_data[index + 1],
            b: self.pixel_data[index + 2],
        };
    }

    /// Raw RGB8 bytes, row by row from the top.
    pub fn as_pixel_data(&self) -> &[u8] {
        return &self.pixel_data;
    }

    /// Saves the screen as an image file, with the format picked from
    /// the file extension.
    pub fn save(&self, path: &Path) -> image::ImageResult<()> {
        return image::save_buffer(
            path,
            &self.pixel_data,
            self.width,
            self.height,
            image::ColorType::Rgb8,
        );
    }
}
