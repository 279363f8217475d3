use crate::depth::DepthBuffer;
use crate::fragment::Fragment;
use crate::screen::Screen;
use crate::shader::Shader;

/// Depth tested flat shading: the nearest fragment per pixel wins,
/// independent of drawing order.
pub struct PainterShader {
    depth: DepthBuffer,
}

impl PainterShader {
    pub fn new() -> PainterShader {
        return PainterShader {
            depth: DepthBuffer::new(0, 0),
        };
    }
}

impl Default for PainterShader {
    fn default() -> PainterShader {
        return PainterShader::new();
    }
}

impl Shader for PainterShader {
    fn shade(&mut self, fragment: &Fragment, screen: &mut Screen) {
        if !self.depth.test_fragment(fragment) {
            return;
        }
        screen.set_pixel(fragment.x(), fragment.y(), fragment.color());
        self.depth.write_fragment(fragment);
    }

    fn reset(&mut self) {
        self.depth.clear();
    }

    fn init(&mut self, width: u32, height: u32) {
        self.depth.resize(width as usize, height as usize);
    }
}
