//! Triangle meshes loaded from OFF files.
//!
//! The accepted dialect stores per vertex colors after the positions
//! and, optionally, texture coordinates after the colors:
//!
//! ```text
//! OFF
//! <num-vertices> <num-faces>
//! x y z r g b [u v]      (one line per vertex)
//! 3 i j k                (one line per face)
//! ```
//!
//! Lines whose first non-blank character is '#' are comments. Vertex
//! normals are not part of the format, they are derived by averaging
//! the unit normals of the faces sharing each vertex.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::algebra::Vector;

/// Error raised while loading a mesh.
#[derive(Debug)]
pub enum MeshError {
    Io(io::Error),
    Parse { line: usize, message: String },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::Io(e) => return write!(f, "mesh i/o error: {}", e),
            MeshError::Parse { line, message } => {
                return write!(f, "mesh parse error at line {}: {}", line, message)
            }
        }
    }
}

impl Error for MeshError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MeshError::Io(e) => return Some(e),
            MeshError::Parse { .. } => return None,
        }
    }
}

impl From<io::Error> for MeshError {
    fn from(e: io::Error) -> MeshError {
        return MeshError::Io(e);
    }
}

/// An indexed triangle mesh with per vertex attributes.
#[derive(Debug)]
pub struct Mesh {
    vertices: Vec<Vector>,
    faces: Vec<usize>,
    colors: Vec<f64>,
    texture_coordinates: Option<Vec<f64>>,
    normals: Vec<Vector>,
}

impl Mesh {
    /// Loads a mesh from an OFF file.
    pub fn load(path: &Path) -> Result<Mesh, MeshError> {
        debug!("loading mesh from {}", path.display());
        return Mesh::parse(BufReader::new(File::open(path)?));
    }

    /// Parses OFF data from any buffered reader.
    pub fn parse<R: BufRead>(reader: R) -> Result<Mesh, MeshError> {
        let mut lines = ContentLines::new(reader);

        let (line, header) = lines.next_content()?;
        if header.trim() != "OFF" {
            return Err(MeshError::Parse {
                line,
                message: "not an OFF file".to_string(),
            });
        }

        let (line, counts) = lines.next_content()?;
        let mut tokens = counts.split_whitespace();
        let num_vertices = parse_count(tokens.next(), line, "vertex count")?;
        let num_faces = parse_count(tokens.next(), line, "face count")?;

        let mut vertices = Vec::with_capacity(num_vertices);
        let mut colors = Vec::with_capacity(3 * num_vertices);
        let mut texture_coordinates: Option<Vec<f64>> = None;
        for i in 0..num_vertices {
            let (line, text) = lines.next_content()?;
            let fields = parse_numbers(&text, line)?;
            if fields.len() < 6 {
                return Err(MeshError::Parse {
                    line,
                    message: format!(
                        "vertex needs at least 6 values (position and color), got {}",
                        fields.len()
                    ),
                });
            }
            let mut vertex = Vector::named(&format!("v{}", i), 3);
            vertex.set_values(&fields[0..3]);
            vertices.push(vertex);
            for channel in &fields[3..6] {
                if !(0.0..=1.0).contains(channel) {
                    return Err(MeshError::Parse {
                        line,
                        message: format!("color channel {} is outside [0, 1]", channel),
                    });
                }
                colors.push(*channel);
            }
            if fields.len() >= 8 {
                let uv = texture_coordinates.get_or_insert_with(|| vec![0.0; 2 * num_vertices]);
                uv[2 * i] = fields[6];
                uv[2 * i + 1] = fields[7];
            }
        }

        let mut faces = Vec::with_capacity(3 * num_faces);
        for _ in 0..num_faces {
            let (line, text) = lines.next_content()?;
            let mut tokens = text.split_whitespace();
            let arity = parse_count(tokens.next(), line, "face arity")?;
            if arity != 3 {
                return Err(MeshError::Parse {
                    line,
                    message: "non-triangular meshes are not supported".to_string(),
                });
            }
            for _ in 0..3 {
                let index = parse_count(tokens.next(), line, "face index")?;
                if index >= num_vertices {
                    return Err(MeshError::Parse {
                        line,
                        message: format!(
                            "face references vertex {} but the mesh has {}",
                            index, num_vertices
                        ),
                    });
                }
                faces.push(index);
            }
        }

        let normals = compute_normals(&vertices, &faces);
        debug!(
            "mesh loaded: {} vertices, {} faces, textured: {}",
            vertices.len(),
            faces.len() / 3,
            texture_coordinates.is_some()
        );
        return Ok(Mesh {
            vertices,
            faces,
            colors,
            texture_coordinates,
            normals,
        });
    }

    pub fn num_vertices(&self) -> usize {
        return self.vertices.len();
    }

    pub fn num_faces(&self) -> usize {
        return self.faces.len() / 3;
    }

    pub fn vertices(&self) -> &[Vector] {
        return &self.vertices;
    }

    /// Vertex indices, three consecutive entries per face.
    pub fn faces(&self) -> &[usize] {
        return &self.faces;
    }

    /// Normalized color channels, three consecutive entries per vertex.
    pub fn colors(&self) -> &[f64] {
        return &self.colors;
    }

    /// (u, v) pairs per vertex, or None when the file had no texture
    /// coordinates at all.
    pub fn texture_coordinates(&self) -> Option<&[f64]> {
        return self.texture_coordinates.as_deref();
    }

    /// Per vertex unit normals. Vertices that are not part of any face
    /// carry a zero normal.
    pub fn normals(&self) -> &[Vector] {
        return &self.normals;
    }
}

/// Averages the unit normals of all faces sharing each vertex.
fn compute_normals(vertices: &[Vector], faces: &[usize]) -> Vec<Vector> {
    let mut sums: Vec<Vector> = (0..vertices.len())
        .map(|i| Vector::named(&format!("n{}", i), 3))
        .collect();
    for face in faces.chunks_exact(3) {
        let a = &vertices[face[0]];
        let b = &vertices[face[1]];
        let c = &vertices[face[2]];
        let face_normal = b.subtract(a).cross(&c.subtract(a)).normalize();
        for &index in face {
            sums[index] = sums[index].add(&face_normal);
        }
    }
    // Normalizing also settles orphan vertices: their zero sum stays
    // a zero vector instead of becoming NaN.
    return sums.iter().map(|sum| sum.normalize()).collect();
}

fn parse_count(token: Option<&str>, line: usize, what: &str) -> Result<usize, MeshError> {
    let token = match token {
        Some(token) => token,
        None => {
            return Err(MeshError::Parse {
                line,
                message: format!("missing {}", what),
            })
        }
    };
    return token.parse::<usize>().map_err(|_| MeshError::Parse {
        line,
        message: format!("invalid {} '{}'", what, token),
    });
}

fn parse_numbers(text: &str, line: usize) -> Result<Vec<f64>, MeshError> {
    let mut numbers = Vec::new();
    for token in text.split_whitespace() {
        let value = token.parse::<f64>().map_err(|_| MeshError::Parse {
            line,
            message: format!("invalid number '{}'", token),
        })?;
        numbers.push(value);
    }
    return Ok(numbers);
}

/// Line iterator that skips comments and keeps track of line numbers.
struct ContentLines<R: BufRead> {
    lines: io::Lines<R>,
    number: usize,
}

impl<R: BufRead> ContentLines<R> {
    fn new(reader: R) -> ContentLines<R> {
        return ContentLines {
            lines: reader.lines(),
            number: 0,
        };
    }

    fn next_content(&mut self) -> Result<(usize, String), MeshError> {
        loop {
            let line = match self.lines.next() {
                None => {
                    return Err(MeshError::Parse {
                        line: self.number,
                        message: "unexpected end of file".to_string(),
                    })
                }
                Some(line) => line?,
            };
            self.number += 1;
            if !line.trim_start().starts_with('#') {
                return Ok((self.number, line));
            }
        }
    }
}
