use crate::fragment::Fragment;
use crate::screen::Screen;
use crate::shader::Shader;

/// Writes the fragment color as-is, last writer wins.
///
/// With no depth handling the drawing order decides visibility, which
/// makes this shader mostly useful for wireframes and debugging.
pub struct SimpleShader;

impl Shader for SimpleShader {
    fn shade(&mut self, fragment: &Fragment, screen: &mut Screen) {
        screen.set_pixel(fragment.x(), fragment.y(), fragment.color());
    }

    fn reset(&mut self) {}

    fn init(&mut self, _width: u32, _height: u32) {}
}
