use crate::depth::DepthBuffer;
use crate::fragment::Fragment;
use crate::screen::{Color, Screen};
use crate::shader::Shader;
use crate::texture::Texture;

/// Depth tested texture mapping.
///
/// Samples the texture at the fragment's (u, v) and either replaces
/// the vertex color or modulates it with the sampled color. Without a
/// texture it behaves like the painter shader.
pub struct TextureShader {
    depth: DepthBuffer,
    texture: Option<Texture>,
    combine_with_base_color: bool,
}

impl TextureShader {
    pub fn new() -> TextureShader {
        return TextureShader {
            depth: DepthBuffer::new(0, 0),
            texture: None,
            combine_with_base_color: false,
        };
    }

    fn fragment_color(&self, fragment: &Fragment) -> Color {
        let texture = match &self.texture {
            Some(texture) => texture,
            None => return fragment.color(),
        };
        let sampled = texture.sample(
            fragment.attribute(Fragment::TEXTURE_U),
            fragment.attribute(Fragment::TEXTURE_V),
        );
        if !self.combine_with_base_color {
            return sampled;
        }
        return modulate(sampled, fragment);
    }
}

/// Scales the sampled color channel-wise by the fragment's base color.
fn modulate(sampled: Color, fragment: &Fragment) -> Color {
    let scale = |channel: u8, factor: f64| (channel as f64 * factor.clamp(0.0, 1.0)).round() as u8;
    return Color {
        r: scale(sampled.r, fragment.attribute(Fragment::COLOR_R)),
        g: scale(sampled.g, fragment.attribute(Fragment::COLOR_G)),
        b: scale(sampled.b, fragment.attribute(Fragment::COLOR_B)),
    };
}

impl Default for TextureShader {
    fn default() -> TextureShader {
        return TextureShader::new();
    }
}

impl Shader for TextureShader {
    fn shade(&mut self, fragment: &Fragment, screen: &mut Screen) {
        if !self.depth.test_fragment(fragment) {
            return;
        }
        screen.set_pixel(fragment.x(), fragment.y(), self.fragment_color(fragment));
        self.depth.write_fragment(fragment);
    }

    fn reset(&mut self) {
        self.depth.clear();
    }

    fn init(&mut self, width: u32, height: u32) {
        self.depth.resize(width as usize, height as usize);
    }

    fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }

    fn set_combine_with_base_color(&mut self, combine: bool) {
        self.combine_with_base_color = combine;
    }
}
