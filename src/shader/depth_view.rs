use crate::depth::DepthBuffer;
use crate::fragment::Fragment;
use crate::screen::Screen;
use crate::shader::{ColorMap, Shader};

/// Visualizes depth instead of surface color.
///
/// The fragment depth d is squashed into (0, 1] with 1 / (1 + d), so
/// near surfaces land at the top of the color map and the horizon
/// fades towards its first entry.
pub struct DepthShader {
    depth: DepthBuffer,
    map: ColorMap,
}

impl DepthShader {
    pub fn new() -> DepthShader {
        return DepthShader {
            depth: DepthBuffer::new(0, 0),
            map: ColorMap::grayscale(),
        };
    }
}

impl Default for DepthShader {
    fn default() -> DepthShader {
        return DepthShader::new();
    }
}

impl Shader for DepthShader {
    fn shade(&mut self, fragment: &Fragment, screen: &mut Screen) {
        if !self.depth.test_fragment(fragment) {
            return;
        }
        let squashed = 1.0 / (1.0 + fragment.depth().max(0.0));
        screen.set_pixel(fragment.x(), fragment.y(), self.map.sample(squashed));
        self.depth.write_fragment(fragment);
    }

    fn reset(&mut self) {
        self.depth.clear();
    }

    fn init(&mut self, width: u32, height: u32) {
        self.depth.resize(width as usize, height as usize);
    }

    fn set_color_map(&mut self, map: ColorMap) {
        self.map = map;
    }

    fn supports_color_map(&self) -> bool {
        return true;
    }
}
