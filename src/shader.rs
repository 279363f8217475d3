//! Per fragment shading stages and the registry they are created from.

pub mod colormap;
mod depth_view;
mod painter;
mod simple;
mod textured;

pub use colormap::ColorMap;
pub use depth_view::DepthShader;
pub use painter::PainterShader;
pub use simple::SimpleShader;
pub use textured::TextureShader;

use crate::fragment::Fragment;
use crate::screen::Screen;
use crate::texture::Texture;

/// Final stage of the pipeline: turns rasterized fragments into pixels.
///
/// Shaders own whatever state they need across a frame (typically a
/// depth buffer), so `init` must be called whenever the target size
/// changes and `reset` before each frame.
pub trait Shader {
    /// Computes and writes the pixel for one fragment.
    fn shade(&mut self, fragment: &Fragment, screen: &mut Screen);

    /// Drops all per frame state.
    fn reset(&mut self);

    /// Adapts internal buffers to the render target size. Safe to call
    /// repeatedly.
    fn init(&mut self, width: u32, height: u32);

    /// Hands over a texture. Shaders that do not sample ignore it.
    fn set_texture(&mut self, _texture: Texture) {}

    /// Switches between replacing the vertex color with the sampled
    /// texture color and modulating it. Ignored by untextured shaders.
    fn set_combine_with_base_color(&mut self, _combine: bool) {}

    /// Replaces the color map. Ignored by shaders without one.
    fn set_color_map(&mut self, _map: ColorMap) {}

    /// Whether `set_color_map` has any effect on this shader.
    fn supports_color_map(&self) -> bool {
        return false;
    }
}

type ShaderFactory = fn() -> Box<dyn Shader>;

/// Creates shaders from the names users type on the command line.
pub struct ShaderRegistry {
    factories: Vec<(&'static str, ShaderFactory)>,
}

impl ShaderRegistry {
    pub fn new() -> ShaderRegistry {
        return ShaderRegistry { factories: Vec::new() };
    }

    /// Registry preloaded with all shaders shipped by the crate.
    pub fn with_builtin_shaders() -> ShaderRegistry {
        let mut registry = ShaderRegistry::new();
        registry.register("simple", || Box::new(SimpleShader));
        registry.register("painter", || Box::new(PainterShader::new()));
        registry.register("texture", || Box::new(TextureShader::new()));
        registry.register("depth", || Box::new(DepthShader::new()));
        return registry;
    }

    /// Registers a factory under a name. Registering a name twice
    /// replaces the old factory.
    pub fn register(&mut self, name: &'static str, factory: ShaderFactory) {
        for entry in self.factories.iter_mut() {
            if entry.0 == name {
                entry.1 = factory;
                return;
            }
        }
        self.factories.push((name, factory));
    }

    /// Creates a fresh shader, or None for unknown names.
    pub fn create(&self, name: &str) -> Option<Box<dyn Shader>> {
        return self
            .factories
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, factory)| factory());
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        return self.factories.iter().map(|(name, _)| *name).collect();
    }
}

impl Default for ShaderRegistry {
    fn default() -> ShaderRegistry {
        return ShaderRegistry::with_builtin_shaders();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_registered_in_order() {
        let registry = ShaderRegistry::with_builtin_shaders();
        assert_eq!(registry.names(), vec!["simple", "painter", "texture", "depth"]);
    }

    #[test]
    fn create_returns_none_for_unknown_names() {
        let registry = ShaderRegistry::with_builtin_shaders();
        assert!(registry.create("gouraud").is_none());
        assert!(registry.create("painter").is_some());
    }

    #[test]
    fn each_create_returns_a_fresh_instance() {
        let registry = ShaderRegistry::with_builtin_shaders();
        let mut first = registry.create("painter").unwrap();
        first.init(4, 4);
        // A second instance starts with its own empty state and can be
        // initialized independently.
        let mut second = registry.create("painter").unwrap();
        second.init(8, 8);
    }

    #[test]
    fn registering_twice_replaces_the_factory() {
        let mut registry = ShaderRegistry::new();
        registry.register("only", || Box::new(SimpleShader));
        registry.register("only", || Box::new(DepthShader::new()));
        assert_eq!(registry.names().len(), 1);
        assert!(registry.create("only").unwrap().supports_color_map());
    }

    #[test]
    fn color_map_support_is_opt_in() {
        let registry = ShaderRegistry::with_builtin_shaders();
        assert!(!registry.create("simple").unwrap().supports_color_map());
        assert!(!registry.create("painter").unwrap().supports_color_map());
        assert!(!registry.create("texture").unwrap().supports_color_map());
        assert!(registry.create("depth").unwrap().supports_color_map());
    }
}
