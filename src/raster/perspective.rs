use crate::algebra::Vector;
use crate::fragment::Fragment;
use crate::raster::{
    barycentric_epsilon, barycentric_matrix, common_attribute_count, triangle_bounding_box,
    Rasterizer,
};
use crate::screen::Screen;
use crate::shader::Shader;

/// Fills triangles with perspective correct attribute interpolation.
///
/// Screen-space barycentric weights are computed by inverting the
/// triangle's coordinate matrix once per face. Attributes are then
/// interpolated divided by depth and renormalized per pixel, which
/// undoes the distortion the projection introduces on faces spanning
/// a depth range. For equal vertex depths this reduces to the linear
/// interpolation exactly.
pub struct PerspectiveCorrectRasterizer;

impl Rasterizer for PerspectiveCorrectRasterizer {
    fn rasterize_face(
        &self,
        v1: &Fragment,
        v2: &Fragment,
        v3: &Fragment,
        shader: &mut dyn Shader,
        screen: &mut Screen,
    ) {
        let num_attributes = common_attribute_count(v1, v2, v3);
        let coords = match barycentric_matrix(v1, v2, v3) {
            Some(coords) => coords,
            None => return,
        };
        let bbox = triangle_bounding_box(v1, v2, v3);
        let eps = barycentric_epsilon(&bbox);
        let mut fragment = Fragment::new(0, 0);
        for x in bbox.x_min..=bbox.x_max {
            for y in bbox.y_min..=bbox.y_max {
                fragment.set_position(x, y);
                if screen.is_clipped(x, y) {
                    continue;
                }
                let bar = coords.multiply_vector(&Vector::from_values(&[1.0, x as f64, y as f64]));
                if bar.get(0) < -eps || bar.get(1) < -eps || bar.get(2) < -eps {
                    continue;
                }
                let one_over_z =
                    bar.get(0) / v1.depth() + bar.get(1) / v2.depth() + bar.get(2) / v3.depth();
                for i in 0..num_attributes {
                    let over_z = bar.get(0) * v1.attribute(i) / v1.depth()
                        + bar.get(1) * v2.attribute(i) / v2.depth()
                        + bar.get(2) * v3.attribute(i) / v3.depth();
                    let mut value = over_z / one_over_z;
                    if (Fragment::COLOR_R..=Fragment::COLOR_B).contains(&i) {
                        value = value.clamp(0.0, 1.0);
                    }
                    fragment.set_attribute(i, value);
                }
                shader.shade(&fragment, screen);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::tests::{fragment_at, CollectingShader};
    use crate::raster::LinearRasterizer;

    fn textured(x: i32, y: i32, depth: f64, u: f64) -> Fragment {
        let mut f = Fragment::new(x, y);
        f.set_depth(depth);
        f.set_attribute(Fragment::TEXTURE_U, u);
        return f;
    }

    #[test]
    fn degenerate_triangles_shade_nothing() {
        let rasterizer = PerspectiveCorrectRasterizer;
        let mut shader = CollectingShader::new();
        let mut screen = Screen::new(16, 16);
        rasterizer.rasterize_face(
            &fragment_at(1, 1),
            &fragment_at(3, 3),
            &fragment_at(5, 5),
            &mut shader,
            &mut screen,
        );
        assert!(shader.shaded.is_empty());
    }

    #[test]
    fn corners_keep_their_own_attributes() {
        let rasterizer = PerspectiveCorrectRasterizer;
        let mut shader = CollectingShader::new();
        let mut screen = Screen::new(16, 16);
        rasterizer.rasterize_face(
            &textured(0, 0, 1.0, 0.0),
            &textured(6, 0, 3.0, 1.0),
            &textured(0, 6, 3.0, 0.5),
            &mut shader,
            &mut screen,
        );
        let corner = shader
            .shaded
            .iter()
            .find(|f| f.x() == 6 && f.y() == 0)
            .unwrap();
        assert!((corner.attribute(Fragment::TEXTURE_U) - 1.0).abs() < 1e-6);
        assert!((corner.depth() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn interpolation_is_biased_towards_the_nearer_vertex() {
        // Screen midpoint between a vertex at depth 1 and one at depth
        // 3 shows the texture point u = 0.25, not u = 0.5: half of the
        // screen span covers the nearer quarter of the surface.
        let rasterizer = PerspectiveCorrectRasterizer;
        let mut shader = CollectingShader::new();
        let mut screen = Screen::new(16, 16);
        rasterizer.rasterize_face(
            &textured(0, 0, 1.0, 0.0),
            &textured(6, 0, 3.0, 1.0),
            &textured(0, 6, 1.0, 0.0),
            &mut shader,
            &mut screen,
        );
        let middle = shader
            .shaded
            .iter()
            .find(|f| f.x() == 3 && f.y() == 0)
            .unwrap();
        assert!((middle.attribute(Fragment::TEXTURE_U) - 0.25).abs() < 1e-6);
        // The interpolated depth at that pixel is the harmonic mix.
        assert!((middle.depth() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn equal_depths_reduce_to_linear_interpolation() {
        let depth = 2.0;
        let mut linear_shader = CollectingShader::new();
        let mut perspective_shader = CollectingShader::new();
        let mut screen = Screen::new(32, 32);
        let v1 = {
            let mut f = fragment_at(1, 2);
            f.set_depth(depth);
            f.set_color(1.0, 0.0, 0.2);
            f
        };
        let v2 = {
            let mut f = fragment_at(20, 4);
            f.set_depth(depth);
            f.set_color(0.0, 1.0, 0.4);
            f
        };
        let v3 = {
            let mut f = fragment_at(7, 25);
            f.set_depth(depth);
            f.set_color(0.5, 0.5, 1.0);
            f
        };
        LinearRasterizer.rasterize_face(&v1, &v2, &v3, &mut linear_shader, &mut screen);
        PerspectiveCorrectRasterizer.rasterize_face(&v1, &v2, &v3, &mut perspective_shader, &mut screen);
        assert_eq!(linear_shader.shaded.len(), perspective_shader.shaded.len());
        for (a, b) in linear_shader.shaded.iter().zip(perspective_shader.shaded.iter()) {
            assert_eq!((a.x(), a.y()), (b.x(), b.y()));
            for i in 0..a.num_attributes() {
                assert!(
                    (a.attribute(i) - b.attribute(i)).abs() < 1e-6,
                    "attribute {} differs at ({}, {})",
                    i,
                    a.x(),
                    a.y()
                );
            }
        }
    }

    #[test]
    fn offscreen_pixels_are_clipped_before_shading() {
        let rasterizer = PerspectiveCorrectRasterizer;
        let mut shader = CollectingShader::new();
        let mut screen = Screen::new(4, 4);
        rasterizer.rasterize_face(
            &textured(-3, -3, 1.0, 0.0),
            &textured(9, -3, 1.0, 1.0),
            &textured(-3, 9, 1.0, 0.5),
            &mut shader,
            &mut screen,
        );
        for f in &shader.shaded {
            assert!(!screen.is_clipped(f.x(), f.y()));
        }
    }
}
