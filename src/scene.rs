//! Scene descriptions: which mesh to show, from where, and under
//! which light.
//!
//! A scene file is a fixed sequence of value lines. Comment lines
//! (leading '#') and blank lines may be sprinkled anywhere:
//!
//! ```text
//! <mesh file>
//! <camera x> <camera y> <camera z>     (one value per line)
//! <look-at x> <look-at y> <look-at z>  (one value per line)
//! <up x> <up y> <up z>                 (one value per line)
//! <focal length>
//! <width> <height>
//! <ambient intensity>
//! <light x> <light y> <light z> <light intensity>
//! <ambient> <diffuse> <specular> <shininess>
//! ```

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::algebra::Vector;
use crate::light::Material;

/// Error raised while loading a scene description.
#[derive(Debug)]
pub enum SceneError {
    Io(io::Error),
    Parse { line: usize, message: String },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io(e) => return write!(f, "scene i/o error: {}", e),
            SceneError::Parse { line, message } => {
                return write!(f, "scene parse error at line {}: {}", line, message)
            }
        }
    }
}

impl Error for SceneError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SceneError::Io(e) => return Some(e),
            SceneError::Parse { .. } => return None,
        }
    }
}

impl From<io::Error> for SceneError {
    fn from(e: io::Error) -> SceneError {
        return SceneError::Io(e);
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug)]
pub struct Scene {
    pub mesh_file_name: String,
    pub camera_position: Vector,
    pub camera_look_at: Vector,
    pub camera_up: Vector,
    pub focal_length: f64,
    pub screen_width: u32,
    pub screen_height: u32,
    pub ambient_intensity: f64,
    pub light_position: [f64; 3],
    pub light_intensity: f64,
    pub material: Material,
}

impl Scene {
    /// Loads a scene description from a file.
    pub fn load(path: &Path) -> Result<Scene, SceneError> {
        debug!("loading scene from {}", path.display());
        return Scene::parse(BufReader::new(File::open(path)?));
    }

    /// Parses a scene description from any buffered reader.
    pub fn parse<R: BufRead>(reader: R) -> Result<Scene, SceneError> {
        let mut lines = ValueLines::new(reader);

        let mesh_file_name = lines.next_value()?.1.trim().to_string();

        let camera_position = read_vector3(&mut lines, "camera position")?;
        let camera_look_at = read_vector3(&mut lines, "look-at point")?;
        let camera_up = read_vector3(&mut lines, "up direction")?;

        let (line, focal_length) = read_numbers::<_, 1>(&mut lines, "focal length")?;
        let focal_length = focal_length[0];
        if focal_length <= 0.0 {
            return Err(SceneError::Parse {
                line,
                message: format!("focal length must be positive, got {}", focal_length),
            });
        }

        let (line, size) = read_numbers::<_, 2>(&mut lines, "screen size")?;
        if size[0] < 1.0 || size[1] < 1.0 || size[0].fract() != 0.0 || size[1].fract() != 0.0 {
            return Err(SceneError::Parse {
                line,
                message: format!("invalid screen size {}x{}", size[0], size[1]),
            });
        }

        let (_, ambient) = read_numbers::<_, 1>(&mut lines, "ambient intensity")?;
        let (_, light) = read_numbers::<_, 4>(&mut lines, "light source")?;
        let (_, material) = read_numbers::<_, 4>(&mut lines, "material coefficients")?;

        let scene = Scene {
            mesh_file_name,
            camera_position,
            camera_look_at,
            camera_up,
            focal_length,
            screen_width: size[0] as u32,
            screen_height: size[1] as u32,
            ambient_intensity: ambient[0],
            light_position: [light[0], light[1], light[2]],
            light_intensity: light[3],
            material: Material {
                ambient: material[0],
                diffuse: material[1],
                specular: material[2],
                shininess: material[3],
            },
        };
        debug!(
            "scene loaded: mesh '{}', {}x{}",
            scene.mesh_file_name, scene.screen_width, scene.screen_height
        );
        return Ok(scene);
    }
}

/// Reads three single-value lines into a 3D vector.
fn read_vector3<R: BufRead>(lines: &mut ValueLines<R>, what: &str) -> Result<Vector, SceneError> {
    let mut v = Vector::new(3);
    for i in 0..3 {
        let (_, values) = read_numbers::<_, 1>(lines, what)?;
        v.set(i, values[0]);
    }
    return Ok(v);
}

/// Reads one line containing exactly N numbers.
fn read_numbers<R: BufRead, const N: usize>(
    lines: &mut ValueLines<R>,
    what: &str,
) -> Result<(usize, [f64; N]), SceneError> {
    let (line, text) = lines.next_value()?;
    let mut values = [0.0; N];
    let mut tokens = text.split_whitespace();
    for slot in values.iter_mut() {
        let token = match tokens.next() {
            Some(token) => token,
            None => {
                return Err(SceneError::Parse {
                    line,
                    message: format!("{}: expected {} values", what, N),
                })
            }
        };
        *slot = token.parse::<f64>().map_err(|_| SceneError::Parse {
            line,
            message: format!("{}: invalid number '{}'", what, token),
        })?;
    }
    if tokens.next().is_some() {
        return Err(SceneError::Parse {
            line,
            message: format!("{}: expected {} values", what, N),
        });
    }
    return Ok((line, values));
}

/// Line iterator skipping comments and blank lines.
struct ValueLines<R: BufRead> {
    lines: io::Lines<R>,
    number: usize,
}

impl<R: BufRead> ValueLines<R> {
    fn new(reader: R) -> ValueLines<R> {
        return ValueLines {
            lines: reader.lines(),
            number: 0,
        };
    }

    fn next_value(&mut self) -> Result<(usize, String), SceneError> {
        loop {
            let line = match self.lines.next() {
                None => {
                    return Err(SceneError::Parse {
                        line: self.number,
                        message: "unexpected end of file".to_string(),
                    })
                }
                Some(line) => line?,
            };
            self.number += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok((self.number, line));
        }
    }
}
