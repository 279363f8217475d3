//! Depth buffer shared by the shaders that resolve occlusion.

use crate::fragment::Fragment;

/// Per pixel depth storage with a strict nearer-wins test.
///
/// Coordinates outside the buffer fail the test and are ignored on
/// write, so callers can feed it unclipped fragments.
#[derive(Debug)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    buffer: Vec<f64>,
}

impl DepthBuffer {
    /// Creates a cleared buffer of the given size.
    pub fn new(width: usize, height: usize) -> DepthBuffer {
        return DepthBuffer {
            width,
            height,
            buffer: vec![f64::INFINITY; width * height],
        };
    }

    /// Resets every pixel to "infinitely far away".
    pub fn clear(&mut self) {
        self.buffer.fill(f64::INFINITY);
    }

    /// Changes the buffer size. Always leaves the buffer cleared, even
    /// when the size does not change.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            self.clear();
            return;
        }
        self.width = width;
        self.height = height;
        self.buffer = vec![f64::INFINITY; width * height];
    }

    /// Checks whether the fragment is strictly nearer than what the
    /// buffer holds at its pixel. Out of bounds fragments never pass.
    pub fn test_fragment(&self, fragment: &Fragment) -> bool {
        let index = match self.index_of(fragment) {
            Some(index) => index,
            None => return false,
        };
        return fragment.depth() < self.buffer[index];
    }

    /// Stores the fragment depth at its pixel. Out of bounds fragments
    /// are dropped silently.
    pub fn write_fragment(&mut self, fragment: &Fragment) {
        if let Some(index) = self.index_of(fragment) {
            self.buffer[index] = fragment.depth();
        }
    }

    fn index_of(&self, fragment: &Fragment) -> Option<usize> {
        let x = fragment.x();
        let y = fragment.y();
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        return Some(y as usize * self.width + x as usize);
    }
}
