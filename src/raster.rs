//! Scan conversion of projected fragments into shaded pixels.

mod linear;
mod perspective;

pub use linear::LinearRasterizer;
pub use perspective::PerspectiveCorrectRasterizer;

use crate::algebra::{Matrix, Vector};
use crate::fragment::Fragment;
use crate::screen::Screen;
use crate::shader::Shader;

/// Triangles with less signed area than this are dropped entirely.
const MIN_AREA: f64 = 1e-6;

/// Turns projected vertices, edges and faces into shaded fragments.
///
/// The vertex and edge stages are shared: singles map to one fragment,
/// edges walk a DDA line interpolating every attribute linearly. Face
/// filling is what distinguishes the implementations.
pub trait Rasterizer {
    /// Shades the single pixel a projected vertex lands on.
    fn rasterize_vertex(&self, v: &Fragment, shader: &mut dyn Shader, screen: &mut Screen) {
        if screen.is_clipped(v.x(), v.y()) {
            return;
        }
        shader.shade(v, screen);
    }

    /// Walks the edge pixel by pixel, stepping along the longer axis so
    /// no gaps appear, and interpolates all attributes linearly.
    fn rasterize_edge(&self, v1: &Fragment, v2: &Fragment, shader: &mut dyn Shader, screen: &mut Screen) {
        let num_attributes = v1.num_attributes();
        let dx = v2.x() - v1.x();
        let dy = v2.y() - v1.y();
        let steps = dx.abs().max(dy.abs());
        let mut fragment = Fragment::new(v1.x(), v1.y());
        if steps == 0 {
            for i in 0..num_attributes {
                fragment.set_attribute(i, v1.attribute(i));
            }
            self.rasterize_vertex(&fragment, shader, screen);
            return;
        }
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = (v1.x() as f64 + step as f64 * dx as f64 / steps as f64).round() as i32;
            let y = (v1.y() as f64 + step as f64 * dy as f64 / steps as f64).round() as i32;
            fragment.set_position(x, y);
            if screen.is_clipped(x, y) {
                continue;
            }
            for i in 0..num_attributes {
                fragment.set_attribute(i, (1.0 - t) * v1.attribute(i) + t * v2.attribute(i));
            }
            shader.shade(&fragment, screen);
        }
    }

    /// Fills the triangle spanned by three projected vertices.
    fn rasterize_face(
        &self,
        v1: &Fragment,
        v2: &Fragment,
        v3: &Fragment,
        shader: &mut dyn Shader,
        screen: &mut Screen,
    );
}

/// Pixel-aligned bounding box of a triangle.
pub(crate) struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

pub(crate) fn triangle_bounding_box(v1: &Fragment, v2: &Fragment, v3: &Fragment) -> BoundingBox {
    return BoundingBox {
        x_min: v1.x().min(v2.x()).min(v3.x()),
        y_min: v1.y().min(v2.y()).min(v3.y()),
        x_max: v1.x().max(v2.x()).max(v3.x()),
        y_max: v1.y().max(v2.y()).max(v3.y()),
    };
}

/// Inside tolerance for the barycentric tests, scaled with the size of
/// the triangle so thin slivers along shared edges still close up.
pub(crate) fn barycentric_epsilon(bbox: &BoundingBox) -> f64 {
    let dx = (bbox.x_max - bbox.x_min) as f64;
    let dy = (bbox.y_max - bbox.y_min) as f64;
    return dx.hypot(dy) / 1e6;
}

/// Signed area of the triangle in pixel space. Positive for counter
/// clockwise winding in raster coordinates.
pub(crate) fn signed_area(v1: &Fragment, v2: &Fragment, v3: &Fragment) -> f64 {
    let x1 = v1.x() as f64;
    let y1 = v1.y() as f64;
    let x2 = v2.x() as f64;
    let y2 = v2.y() as f64;
    let x3 = v3.x() as f64;
    let y3 = v3.y() as f64;
    return 0.5 * ((x2 - x1) * (y3 - y1) - (x3 - x1) * (y2 - y1));
}

/// Returns true when the triangle is too small or degenerate to fill.
pub(crate) fn is_degenerate(v1: &Fragment, v2: &Fragment, v3: &Fragment) -> bool {
    return signed_area(v1, v2, v3).abs() < MIN_AREA;
}

/// Common attribute count of three fragments; aborts if they disagree,
/// since interpolating between different layouts has no meaning.
pub(crate) fn common_attribute_count(v1: &Fragment, v2: &Fragment, v3: &Fragment) -> usize {
    let count = v1.num_attributes();
    if v2.num_attributes() != count || v3.num_attributes() != count {
        panic!(
            "size mismatch: fragments carry {} / {} / {} attributes",
            count,
            v2.num_attributes(),
            v3.num_attributes()
        );
    }
    return count;
}

/// Matrix turning a pixel position (1, x, y) into the barycentric
/// coordinates of the triangle, or None for degenerate triangles.
pub(crate) fn barycentric_matrix(v1: &Fragment, v2: &Fragment, v3: &Fragment) -> Option<Matrix> {
    let mut m = Matrix::named("C", 3, 3);
    m.set_row(0, &Vector::from_values(&[1.0, 1.0, 1.0]));
    m.set_row(1, &Vector::from_values(&[v1.x() as f64, v2.x() as f64, v3.x() as f64]));
    m.set_row(2, &Vector::from_values(&[v1.y() as f64, v2.y() as f64, v3.y() as f64]));
    return m.try_inverse();
}
