//! Fragments are the currency between projection, rasterization and
//! shading: a pixel position plus the interpolated surface attributes.

use crate::algebra::Vector;
use crate::screen::Color;

const MAX_PIXEL_VALUE: f64 = 255.0;

/// Tolerance used when validating color ranges, so that interpolation
/// noise right at 0 or 1 does not get rejected.
const EPSILON: f64 = 1e-6;

/// Converts a normalized color channel into its byte value.
///
/// Values outside [0, 1] (beyond a small tolerance) abort, since they
/// point at a bug upstream of the conversion.
pub fn color_to_int(value: f64) -> u8 {
    assert!(
        in_range(value, 0.0, 1.0),
        "color value must be between 0 and 1, got {}",
        value
    );
    return (MAX_PIXEL_VALUE * value.clamp(0.0, 1.0)).round() as u8;
}

/// Converts a color byte into its normalized channel value.
pub fn color_to_float(value: u8) -> f64 {
    return value as f64 / MAX_PIXEL_VALUE;
}

fn in_range(value: f64, min: f64, max: f64) -> bool {
    return min - EPSILON <= value && value <= max + EPSILON;
}

/// A projected point on the screen together with its attributes.
///
/// Attributes live in one flat vector indexed by the `Fragment::*`
/// constants, which lets the rasterizers interpolate all of them with
/// a single loop.
#[derive(Debug, Clone)]
pub struct Fragment {
    x: i32,
    y: i32,
    attributes: Vec<f64>,
}

impl Fragment {
    pub const NUM_ATTRIBUTES: usize = 9;

    pub const DEPTH: usize = 0;
    pub const COLOR_R: usize = 1;
    pub const COLOR_G: usize = 2;
    pub const COLOR_B: usize = 3;
    pub const NORMAL_X: usize = 4;
    pub const NORMAL_Y: usize = 5;
    pub const NORMAL_Z: usize = 6;
    pub const TEXTURE_U: usize = 7;
    pub const TEXTURE_V: usize = 8;

    /// Creates a fragment at the given pixel with all attributes zeroed.
    pub fn new(x: i32, y: i32) -> Fragment {
        return Fragment {
            x,
            y,
            attributes: vec![0.0; Fragment::NUM_ATTRIBUTES],
        };
    }

    pub fn x(&self) -> i32 {
        return self.x;
    }

    pub fn y(&self) -> i32 {
        return self.y;
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn num_attributes(&self) -> usize {
        return self.attributes.len();
    }

    pub fn attribute(&self, index: usize) -> f64 {
        return self.attributes[index];
    }

    /// Contiguous run of attributes starting at `index`.
    pub fn attributes(&self, index: usize, dimension: usize) -> &[f64] {
        return &self.attributes[index..index + dimension];
    }

    pub fn set_attribute(&mut self, index: usize, value: f64) {
        self.attributes[index] = value;
    }

    pub fn depth(&self) -> f64 {
        return self.attributes[Fragment::DEPTH];
    }

    pub fn set_depth(&mut self, depth: f64) {
        self.attributes[Fragment::DEPTH] = depth;
    }

    /// Surface normal carried by this fragment.
    pub fn normal(&self) -> Vector {
        return Vector::from_values(self.attributes(Fragment::NORMAL_X, 3));
    }

    pub fn set_normal(&mut self, normal: &Vector) {
        self.attributes[Fragment::NORMAL_X] = normal.get(0);
        self.attributes[Fragment::NORMAL_Y] = normal.get(1);
        self.attributes[Fragment::NORMAL_Z] = normal.get(2);
    }

    /// Color of the fragment, converted to bytes.
    pub fn color(&self) -> Color {
        return Color {
            r: color_to_int(self.attributes[Fragment::COLOR_R]),
            g: color_to_int(self.attributes[Fragment::COLOR_G]),
            b: color_to_int(self.attributes[Fragment::COLOR_B]),
        };
    }

    /// Sets the color from normalized channel values.
    pub fn set_color(&mut self, r: f64, g: f64, b: f64) {
        assert!(
            in_range(r, 0.0, 1.0) && in_range(g, 0.0, 1.0) && in_range(b, 0.0, 1.0),
            "color values must be between 0 and 1, got ({}, {}, {})",
            r,
            g,
            b
        );
        self.attributes[Fragment::COLOR_R] = r;
        self.attributes[Fragment::COLOR_G] = g;
        self.attributes[Fragment::COLOR_B] = b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_bytes_round_trip_exactly() {
        for value in [0u8, 1, 17, 127, 128, 254, 255] {
            assert_eq!(color_to_int(color_to_float(value)), value);
        }
    }

    #[test]
    fn color_floats_round_trip_within_one_step() {
        for value in [0.0, 0.1, 1.0 / 3.0, 0.5, 0.7, 0.999, 1.0] {
            let recovered = color_to_float(color_to_int(value));
            assert!((recovered - value).abs() <= 1.0 / 255.0);
        }
    }

    #[test]
    fn color_conversion_covers_the_endpoints() {
        assert_eq!(color_to_int(0.0), 0);
        assert_eq!(color_to_int(1.0), 255);
        assert_eq!(color_to_float(255), 1.0);
        assert_eq!(color_to_float(0), 0.0);
    }

    #[test]
    fn color_conversion_tolerates_interpolation_noise() {
        assert_eq!(color_to_int(1.0 + 1e-7), 255);
        assert_eq!(color_to_int(-1e-7), 0);
    }

    #[test]
    #[should_panic(expected = "between 0 and 1")]
    fn out_of_range_color_is_rejected() {
        color_to_int(1.5);
    }

    #[test]
    fn new_fragment_is_zeroed() {
        let f = Fragment::new(3, 4);
        assert_eq!(f.x(), 3);
        assert_eq!(f.y(), 4);
        assert_eq!(f.num_attributes(), Fragment::NUM_ATTRIBUTES);
        for i in 0..f.num_attributes() {
            assert_eq!(f.attribute(i), 0.0);
        }
    }

    #[test]
    fn depth_and_normal_accessors() {
        let mut f = Fragment::new(0, 0);
        f.set_depth(2.5);
        assert_eq!(f.depth(), 2.5);
        f.set_normal(&Vector::from_values(&[0.0, 1.0, 0.0]));
        let n = f.normal();
        assert_eq!(n.get(0), 0.0);
        assert_eq!(n.get(1), 1.0);
        assert_eq!(n.get(2), 0.0);
    }

    #[test]
    fn color_accessors_convert_to_bytes() {
        let mut f = Fragment::new(0, 0);
        f.set_color(1.0, 0.5, 0.0);
        let c = f.color();
        assert_eq!(c.r, 255);
        assert_eq!(c.g, 128);
        assert_eq!(c.b, 0);
    }

    #[test]
    #[should_panic(expected = "between 0 and 1")]
    fn set_color_validates_its_inputs() {
        Fragment::new(0, 0).set_color(0.0, 2.0, 0.0);
    }

    #[test]
    fn attribute_runs_are_contiguous() {
        let mut f = Fragment::new(0, 0);
        f.set_attribute(Fragment::TEXTURE_U, 0.25);
        f.set_attribute(Fragment::TEXTURE_V, 0.75);
        assert_eq!(f.attributes(Fragment::TEXTURE_U, 2), &[0.25, 0.75]);
    }

    #[test]
    fn cloning_copies_the_attributes() {
        let mut f = Fragment::new(1, 2);
        f.set_depth(3.0);
        let mut g = f.clone();
        g.set_depth(9.0);
        assert_eq!(f.depth(), 3.0);
        assert_eq!(g.depth(), 9.0);
    }
}
