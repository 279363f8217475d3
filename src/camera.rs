//! Pinhole camera built from three stacked transforms.
//!
//! World coordinates go through the world-to-camera rigid transform,
//! the projection onto the image plane and the calibration that maps
//! onto pixels. `project_point` applies all three and performs the
//! perspective division.

use std::error::Error;
use std::fmt;

use log::debug;

use crate::algebra::{Matrix, Vector};

/// Error returned when the look-at basis cannot be built, i.e. the up
/// direction is parallel to the viewing direction.
#[derive(Debug)]
pub struct DegenerateLookAt;

impl fmt::Display for DegenerateLookAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "up direction is parallel to the viewing direction");
    }
}

impl Error for DegenerateLookAt {}

pub struct Transformation {
    world_to_camera: Matrix,
    projection: Matrix,
    calibration: Matrix,
}

impl Default for Transformation {
    fn default() -> Transformation {
        return Transformation::new();
    }
}

impl Transformation {
    /// Creates an identity transformation: the world-to-camera matrix
    /// and the calibration start as identities, the projection as zero.
    pub fn new() -> Transformation {
        return Transformation {
            world_to_camera: Matrix::named_identity("W2C", 4),
            projection: Matrix::named("P", 3, 4),
            calibration: Matrix::named_identity("K", 3),
        };
    }

    /// Places the camera at `eye`, looking towards `look_at`, with `up`
    /// fixing the roll. On error the previous transform stays in place.
    pub fn set_look_at(
        &mut self,
        eye: &Vector,
        look_at: &Vector,
        up: &Vector,
    ) -> Result<(), DegenerateLookAt> {
        let forward = look_at.subtract(eye).normalize();
        let right = forward.cross(up);
        if right.norm() < 1e-9 {
            return Err(DegenerateLookAt);
        }
        let right = right.normalize();
        // Recomputed so the basis is orthonormal even for a tilted up hint.
        let true_up = right.cross(&forward);

        let mut w2c = Matrix::named_identity("W2C", 4);
        for j in 0..3 {
            w2c.set(0, j, right.get(j));
            w2c.set(1, j, true_up.get(j));
            w2c.set(2, j, forward.get(j));
        }
        w2c.set(0, 3, -right.dot(eye));
        w2c.set(1, 3, -true_up.dot(eye));
        w2c.set(2, 3, -forward.dot(eye));
        self.world_to_camera = w2c;
        debug!("{}", self.world_to_camera);
        return Ok(());
    }

    /// Sets the canonical projection onto the image plane.
    pub fn set_projection(&mut self) {
        let mut p = Matrix::named("P", 3, 4);
        for i in 0..3 {
            p.set(i, i, 1.0);
        }
        self.projection = p;
        debug!("{}", self.projection);
    }

    /// Sets the calibration for a focal length and a target size in
    /// pixels. The negated vertical focal flips the camera's up into
    /// the raster's downward y, and the half sizes center the image.
    pub fn set_calibration(&mut self, focal: f64, width: f64, height: f64) {
        let mut k = Matrix::named_identity("K", 3);
        k.set(0, 0, focal);
        k.set(1, 1, -focal);
        k.set(0, 2, width / 2.0);
        k.set(1, 2, height / 2.0);
        self.calibration = k;
        debug!("{}", self.calibration);
    }

    /// Projects a 3D world point into pixel coordinates.
    ///
    /// The first two components of the result are the pixel position,
    /// the third is the depth along the viewing direction before the
    /// perspective division.
    pub fn project_point(&self, point: &Vector) -> Vector {
        assert_eq!(
            point.size(),
            3,
            "cannot project {}[{}], expected a 3D point",
            point.name(),
            point.size()
        );
        let m = self.calibration.multiply(&self.projection).multiply(&self.world_to_camera);
        let projected = m.multiply_vector(&point.homogeneous_point());
        let depth = projected.get(2);
        return Vector::from_values(&[
            projected.get(0) / depth,
            projected.get(1) / depth,
            depth,
        ]);
    }

    /// Applies only the rotational part of the world-to-camera
    /// transform, which is what directions and normals need.
    pub fn transform_vector(&self, v: &Vector) -> Vector {
        return self.world_to_camera.sub_matrix(0, 0, 3, 3).multiply_vector(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    fn camera_on_z_axis(width: f64, height: f64, focal: f64) -> Transformation {
        let mut xform = Transformation::new();
        xform
            .set_look_at(
                &Vector::from_values(&[0.0, 0.0, 5.0]),
                &Vector::from_values(&[0.0, 0.0, 0.0]),
                &Vector::from_values(&[0.0, 1.0, 0.0]),
            )
            .unwrap();
        xform.set_projection();
        xform.set_calibration(focal, width, height);
        return xform;
    }

    #[test]
    fn origin_projects_to_the_screen_center() {
        let xform = camera_on_z_axis(640.0, 480.0, 450.0);
        let p = xform.project_point(&Vector::from_values(&[0.0, 0.0, 0.0]));
        assert_close(p.get(0), 320.0);
        assert_close(p.get(1), 240.0);
        assert_close(p.get(2), 5.0);
    }

    #[test]
    fn depth_grows_along_the_viewing_direction() {
        let xform = camera_on_z_axis(640.0, 480.0, 450.0);
        let near = xform.project_point(&Vector::from_values(&[0.0, 0.0, 1.0]));
        let far = xform.project_point(&Vector::from_values(&[0.0, 0.0, -1.0]));
        assert_close(near.get(2), 4.0);
        assert_close(far.get(2), 6.0);
    }

    #[test]
    fn world_up_maps_to_smaller_row_numbers() {
        let xform = camera_on_z_axis(640.0, 480.0, 450.0);
        let above = xform.project_point(&Vector::from_values(&[0.0, 1.0, 0.0]));
        assert!(above.get(1) < 240.0);
        let below = xform.project_point(&Vector::from_values(&[0.0, -1.0, 0.0]));
        assert!(below.get(1) > 240.0);
    }

    #[test]
    fn world_right_maps_to_larger_column_numbers() {
        // Looking down -z, world +x stays on the camera's right.
        let xform = camera_on_z_axis(640.0, 480.0, 450.0);
        let right = xform.project_point(&Vector::from_values(&[1.0, 0.0, 0.0]));
        assert!(right.get(0) > 320.0);
    }

    #[test]
    fn identity_transformation_divides_by_depth() {
        // Without look-at and calibration the projection is the
        // canonical pinhole at the origin.
        let mut xform = Transformation::new();
        xform.set_projection();
        let p = xform.project_point(&Vector::from_values(&[2.0, 4.0, 4.0]));
        assert_close(p.get(0), 0.5);
        assert_close(p.get(1), 1.0);
        assert_close(p.get(2), 4.0);
    }

    #[test]
    fn parallel_up_is_rejected() {
        let mut xform = Transformation::new();
        let result = xform.set_look_at(
            &Vector::from_values(&[0.0, 0.0, 5.0]),
            &Vector::from_values(&[0.0, 0.0, 0.0]),
            &Vector::from_values(&[0.0, 0.0, 1.0]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn eye_equal_to_look_at_is_rejected() {
        let mut xform = Transformation::new();
        let eye = Vector::from_values(&[1.0, 2.0, 3.0]);
        let result = xform.set_look_at(&eye, &eye, &Vector::from_values(&[0.0, 1.0, 0.0]));
        assert!(result.is_err());
    }

    #[test]
    #[should_panic(expected = "expected a 3D point")]
    fn projecting_a_non_3d_point_is_rejected() {
        let xform = Transformation::new();
        xform.project_point(&Vector::from_values(&[1.0, 2.0]));
    }

    #[test]
    fn transform_vector_applies_only_the_rotation() {
        let mut xform = Transformation::new();
        xform
            .set_look_at(
                &Vector::from_values(&[0.0, 0.0, 5.0]),
                &Vector::from_values(&[0.0, 0.0, 0.0]),
                &Vector::from_values(&[0.0, 1.0, 0.0]),
            )
            .unwrap();
        // World +z points straight at the camera, so it maps to the
        // negative viewing direction regardless of the eye position.
        let v = xform.transform_vector(&Vector::from_values(&[0.0, 0.0, 1.0]));
        assert_close(v.get(0), 0.0);
        assert_close(v.get(1), 0.0);
        assert_close(v.get(2), -1.0);
    }
}
