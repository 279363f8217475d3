//! Light sources and the Blinn-Phong shading they apply to vertices.

use crate::algebra::Vector;

/// Surface reflection coefficients, straight from the scene file.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
}

/// A single light source.
///
/// Every source answers with a scalar intensity contribution for a
/// surface point; the caller sums them up and modulates the base color.
#[derive(Debug)]
pub enum Light {
    Ambient { intensity: f64 },
    Point { position: Vector, intensity: f64 },
}

impl Light {
    /// Intensity this source contributes at a surface point.
    ///
    /// Point lights evaluate the Blinn-Phong diffuse and specular
    /// terms with the half vector between the light and eye
    /// directions. The base color is accepted so custom models can
    /// tint per channel, the built-in ones do not use it.
    pub fn contribution(
        &self,
        position: &Vector,
        normal: &Vector,
        _base_color: &[f64; 3],
        camera_position: &Vector,
        material: &Material,
    ) -> f64 {
        match self {
            Light::Ambient { intensity } => {
                return *intensity;
            }
            Light::Point { position: source, intensity } => {
                let to_light = source.subtract(position).normalize();
                let to_eye = camera_position.subtract(position).normalize();
                let half = to_eye.add(&to_light).normalize();
                let diffuse = material.diffuse * normal.dot(&to_light).max(0.0) * intensity;
                let specular =
                    material.specular * normal.dot(&half).max(0.0).powf(material.shininess) * intensity;
                return diffuse + specular;
            }
        }
    }
}

/// The set of lights illuminating a scene.
#[derive(Debug, Default)]
pub struct Lighting {
    lights: Vec<Light>,
}

impl Lighting {
    pub fn new() -> Lighting {
        return Lighting { lights: Vec::new() };
    }

    pub fn add_ambient_light(&mut self, intensity: f64) {
        self.lights.push(Light::Ambient { intensity });
    }

    pub fn add_point_light(&mut self, x: f64, y: f64, z: f64, intensity: f64) {
        self.lights.push(Light::Point {
            position: Vector::from_values(&[x, y, z]),
            intensity,
        });
    }

    pub fn reset(&mut self) {
        self.lights.clear();
    }

    /// Applies all lights to a surface point and returns the lit color,
    /// clamped to the displayable range.
    pub fn apply_lights(
        &self,
        position: &Vector,
        normal: &Vector,
        base_color: &[f64; 3],
        camera_position: &Vector,
        material: &Material,
    ) -> [f64; 3] {
        let mut intensity = 0.0;
        for light in &self.lights {
            intensity += light.contribution(position, normal, base_color, camera_position, material);
        }
        return [
            (base_color[0] * intensity).clamp(0.0, 1.0),
            (base_color[1] * intensity).clamp(0.0, 1.0),
            (base_color[2] * intensity).clamp(0.0, 1.0),
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    fn plain_material() -> Material {
        return Material {
            ambient: 1.0,
            diffuse: 1.0,
            specular: 1.0,
            shininess: 10.0,
        };
    }

    #[test]
    fn ambient_light_contributes_its_raw_intensity() {
        // The ambient coefficient of the material intentionally does
        // not scale the ambient term.
        let light = Light::Ambient { intensity: 0.5 };
        let origin = Vector::new(3);
        let normal = Vector::from_values(&[0.0, 0.0, 1.0]);
        let c = light.contribution(
            &origin,
            &normal,
            &[1.0, 1.0, 1.0],
            &Vector::from_values(&[0.0, 0.0, 5.0]),
            &plain_material(),
        );
        assert_close(c, 0.5);
    }

    #[test]
    fn head_on_point_light_gives_full_diffuse_and_specular() {
        // Light and eye share the surface normal direction, so both
        // dot products are exactly 1.
        let light = Light::Point {
            position: Vector::from_values(&[0.0, 0.0, 1.0]),
            intensity: 1.0,
        };
        let surface = Vector::new(3);
        let normal = Vector::from_values(&[0.0, 0.0, 1.0]);
        let camera = Vector::from_values(&[0.0, 0.0, 1.0]);
        let c = light.contribution(&surface, &normal, &[1.0, 1.0, 1.0], &camera, &plain_material());
        assert_close(c, 2.0);
    }

    #[test]
    fn surfaces_facing_away_receive_nothing() {
        let light = Light::Point {
            position: Vector::from_values(&[0.0, 0.0, 1.0]),
            intensity: 1.0,
        };
        let surface = Vector::new(3);
        let normal = Vector::from_values(&[0.0, 0.0, -1.0]);
        let camera = Vector::from_values(&[0.0, 0.0, 1.0]);
        let c = light.contribution(&surface, &normal, &[1.0, 1.0, 1.0], &camera, &plain_material());
        assert_close(c, 0.0);
    }

    #[test]
    fn grazing_light_only_keeps_the_specular_half_vector_term() {
        // Light comes along the surface, eye looks straight down.
        let light = Light::Point {
            position: Vector::from_values(&[1.0, 0.0, 0.0]),
            intensity: 1.0,
        };
        let surface = Vector::new(3);
        let normal = Vector::from_values(&[0.0, 0.0, 1.0]);
        let camera = Vector::from_values(&[0.0, 0.0, 1.0]);
        let material = Material {
            ambient: 0.0,
            diffuse: 1.0,
            specular: 1.0,
            shininess: 2.0,
        };
        let c = light.contribution(&surface, &normal, &[1.0, 1.0, 1.0], &camera, &material);
        // diffuse term is zero, half vector is (1, 0, 1) normalized.
        let half_dot = 1.0 / 2.0_f64.sqrt();
        assert_close(c, half_dot.powf(2.0));
    }

    #[test]
    fn apply_lights_sums_and_modulates_the_base_color() {
        let mut lighting = Lighting::new();
        lighting.add_ambient_light(0.25);
        lighting.add_point_light(0.0, 0.0, 1.0, 1.0);
        let surface = Vector::new(3);
        let normal = Vector::from_values(&[0.0, 0.0, 1.0]);
        let camera = Vector::from_values(&[0.0, 0.0, 1.0]);
        let material = Material {
            ambient: 1.0,
            diffuse: 0.5,
            specular: 0.0,
            shininess: 1.0,
        };
        // Total intensity: 0.25 ambient + 0.5 diffuse.
        let lit = lighting.apply_lights(&surface, &normal, &[0.4, 1.0, 0.0], &camera, &material);
        assert_close(lit[0], 0.3);
        assert_close(lit[1], 0.75);
        assert_close(lit[2], 0.0);
    }

    #[test]
    fn lone_ambient_light_scales_each_channel() {
        let mut lighting = Lighting::new();
        lighting.add_ambient_light(0.5);
        let lit = lighting.apply_lights(
            &Vector::new(3),
            &Vector::from_values(&[0.0, 0.0, 1.0]),
            &[0.8, 0.4, 0.2],
            &Vector::from_values(&[0.0, 0.0, 1.0]),
            &plain_material(),
        );
        assert_close(lit[0], 0.4);
        assert_close(lit[1], 0.2);
        assert_close(lit[2], 0.1);
    }

    #[test]
    fn overdriven_lighting_clamps_to_one() {
        let mut lighting = Lighting::new();
        lighting.add_ambient_light(3.0);
        let lit = lighting.apply_lights(
            &Vector::new(3),
            &Vector::from_values(&[0.0, 0.0, 1.0]),
            &[1.0, 0.5, 0.1],
            &Vector::from_values(&[0.0, 0.0, 1.0]),
            &plain_material(),
        );
        assert_close(lit[0], 1.0);
        assert_close(lit[1], 1.0);
        assert_close(lit[2], 0.3);
    }

    #[test]
    fn reset_forgets_all_sources() {
        let mut lighting = Lighting::new();
        lighting.add_ambient_light(1.0);
        lighting.reset();
        let lit = lighting.apply_lights(
            &Vector::new(3),
            &Vector::from_values(&[0.0, 0.0, 1.0]),
            &[1.0, 1.0, 1.0],
            &Vector::from_values(&[0.0, 0.0, 1.0]),
            &plain_material(),
        );
        assert_close(lit[0], 0.0);
    }
}
