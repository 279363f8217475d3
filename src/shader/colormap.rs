//! Color lookup tables for mapping scalar values to colors.

use crate::screen::{Color, BLACK, WHITE};

/// A lookup table of colors addressed either by index or by a
/// normalized value in [0, 1].
#[derive(Clone)]
pub struct ColorMap {
    lut: Vec<Color>,
}

impl ColorMap {
    pub fn new(lut: Vec<Color>) -> ColorMap {
        assert!(!lut.is_empty(), "color map needs at least one color");
        return ColorMap { lut };
    }

    /// Builds a map by blending linearly between the given stops.
    pub fn gradient(stops: &[Color], size: usize) -> ColorMap {
        assert!(stops.len() >= 2, "gradient needs at least two stops");
        assert!(size >= stops.len(), "gradient needs at least one entry per stop");
        let mut lut = Vec::with_capacity(size);
        let segments = stops.len() - 1;
        for i in 0..size {
            let t = i as f64 / (size - 1) as f64;
            let scaled = t * segments as f64;
            let segment = (scaled as usize).min(segments - 1);
            let local = scaled - segment as f64;
            lut.push(stops[segment + 1].blend(&stops[segment], local));
        }
        return ColorMap { lut };
    }

    /// Black to white ramp with one entry per byte value.
    pub fn grayscale() -> ColorMap {
        let mut lut = Vec::with_capacity(256);
        for value in 0..=255u8 {
            lut.push(Color { r: value, g: value, b: value });
        }
        return ColorMap { lut };
    }

    /// Classic heat ramp: black over red and yellow to white.
    pub fn heat() -> ColorMap {
        let red = Color { r: 255, g: 0, b: 0 };
        let yellow = Color { r: 255, g: 255, b: 0 };
        return ColorMap::gradient(&[BLACK, red, yellow, WHITE], 256);
    }

    /// Looks up a map by the name used on the command line.
    pub fn by_name(name: &str) -> Option<ColorMap> {
        match name {
            "gray" | "grayscale" => return Some(ColorMap::grayscale()),
            "heat" => return Some(ColorMap::heat()),
            _ => return None,
        }
    }

    pub fn len(&self) -> usize {
        return self.lut.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.lut.is_empty();
    }

    /// Color at a table index. Out of range indices abort.
    pub fn color(&self, index: usize) -> Color {
        return self.lut[index];
    }

    /// Color for a normalized value; 0 maps to the first entry, 1 to
    /// the last. The value is clamped into [0, 1] first.
    pub fn sample(&self, value: f64) -> Color {
        let value = value.clamp(0.0, 1.0);
        let index = (value * (self.lut.len() - 1) as f64).round() as usize;
        return self.lut[index];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_covers_all_byte_values() {
        let map = ColorMap::grayscale();
        assert_eq!(map.len(), 256);
        assert_eq!(map.color(0), BLACK);
        assert_eq!(map.color(255), WHITE);
        assert_eq!(map.color(42), Color { r: 42, g: 42, b: 42 });
    }

    #[test]
    fn sample_clamps_and_interpolates_the_index() {
        let map = ColorMap::grayscale();
        assert_eq!(map.sample(-1.0), BLACK);
        assert_eq!(map.sample(0.0), BLACK);
        assert_eq!(map.sample(2.0), WHITE);
        assert_eq!(map.sample(0.5), Color { r: 128, g: 128, b: 128 });
    }

    #[test]
    fn gradient_hits_its_stops() {
        let red = Color { r: 255, g: 0, b: 0 };
        let map = ColorMap::gradient(&[BLACK, red, WHITE], 5);
        assert_eq!(map.color(0), BLACK);
        assert_eq!(map.color(2), red);
        assert_eq!(map.color(4), WHITE);
    }

    #[test]
    fn heat_runs_from_black_to_white() {
        let map = ColorMap::heat();
        assert_eq!(map.color(0), BLACK);
        assert_eq!(map.color(map.len() - 1), WHITE);
    }

    #[test]
    fn lookup_by_name() {
        assert!(ColorMap::by_name("gray").is_some());
        assert!(ColorMap::by_name("grayscale").is_some());
        assert!(ColorMap::by_name("heat").is_some());
        assert!(ColorMap::by_name("viridis").is_none());
    }

    #[test]
    #[should_panic(expected = "at least one color")]
    fn empty_maps_are_rejected() {
        ColorMap::new(Vec::new());
    }
}
