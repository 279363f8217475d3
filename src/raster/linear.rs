use crate::fragment::Fragment;
use crate::raster::{
    barycentric_epsilon, common_attribute_count, is_degenerate, signed_area, triangle_bounding_box,
    Rasterizer,
};
use crate::screen::Screen;
use crate::shader::Shader;

/// Fills triangles with plain barycentric interpolation.
///
/// Attributes vary linearly across the projected triangle, which is
/// exact for attributes measured on the image plane but bends
/// world-space quantities on surfaces seen at an angle. Cheap, and
/// good enough whenever the depth range of a face is small.
pub struct LinearRasterizer;

impl Rasterizer for LinearRasterizer {
    fn rasterize_face(
        &self,
        v1: &Fragment,
        v2: &Fragment,
        v3: &Fragment,
        shader: &mut dyn Shader,
        screen: &mut Screen,
    ) {
        let num_attributes = common_attribute_count(v1, v2, v3);
        if is_degenerate(v1, v2, v3) {
            return;
        }
        let bbox = triangle_bounding_box(v1, v2, v3);
        let eps = barycentric_epsilon(&bbox);
        let denominator = 2.0 * signed_area(v1, v2, v3);
        let x1 = v1.x() as f64;
        let y1 = v1.y() as f64;
        let x2 = v2.x() as f64;
        let y2 = v2.y() as f64;
        let x3 = v3.x() as f64;
        let y3 = v3.y() as f64;
        let mut fragment = Fragment::new(0, 0);
        for x in bbox.x_min..=bbox.x_max {
            for y in bbox.y_min..=bbox.y_max {
                fragment.set_position(x, y);
                if screen.is_clipped(x, y) {
                    continue;
                }
                let px = x as f64;
                let py = y as f64;
                // Area ratios: weight of a vertex is the subtriangle
                // area spanned by the pixel and the two other vertices.
                let bar2 = ((px - x1) * (y3 - y1) - (x3 - x1) * (py - y1)) / denominator;
                let bar3 = ((x2 - x1) * (py - y1) - (px - x1) * (y2 - y1)) / denominator;
                let bar1 = 1.0 - bar2 - bar3;
                if bar1 < -eps || bar2 < -eps || bar3 < -eps {
                    continue;
                }
                for i in 0..num_attributes {
                    let mut value =
                        bar1 * v1.attribute(i) + bar2 * v2.attribute(i) + bar3 * v3.attribute(i);
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
