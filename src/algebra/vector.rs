use std::fmt;

use nalgebra::DVector;

use crate::algebra::size_mismatch;

const DEFAULT_NAME: &str = "v";

/// Struct, representing a named column vector of f64 components.
///
/// The name travels with the vector so that failed operations can
/// report which operands were involved.
#[derive(Debug, Clone)]
pub struct Vector {
    pub(crate) name: String,
    pub(crate) data: DVector<f64>,
}

impl Vector {
    /// Creates a zero vector with the default name.
    pub fn new(size: usize) -> Vector {
        return Vector::named(DEFAULT_NAME, size);
    }

    /// Creates a named zero vector.
    pub fn named(name: &str, size: usize) -> Vector {
        assert!(size >= 1, "size must be strictly positive");
        return Vector {
            name: name.to_string(),
            data: DVector::zeros(size),
        };
    }

    /// Creates a vector holding the given components.
    pub fn from_values(values: &[f64]) -> Vector {
        assert!(!values.is_empty(), "size must be strictly positive");
        return Vector {
            name: DEFAULT_NAME.to_string(),
            data: DVector::from_row_slice(values),
        };
    }

    /// Creates a named vector with components drawn uniformly from [0, 1).
    pub fn random(name: &str, size: usize) -> Vector {
        assert!(size >= 1, "size must be strictly positive");
        return Vector {
            name: name.to_string(),
            data: DVector::new_random(size),
        };
    }

    pub fn name(&self) -> &str {
        return &self.name;
    }

    pub fn size(&self) -> usize {
        return self.data.len();
    }

    /// Dimension of the vector as text, for diagnostics.
    pub fn dimension_string(&self) -> String {
        return self.size().to_string();
    }

    pub fn get(&self, index: usize) -> f64 {
        return self.data[index];
    }

    pub fn set(&mut self, index: usize, value: f64) {
        self.data[index] = value;
    }

    /// Replaces all components at once.
    pub fn set_values(&mut self, values: &[f64]) {
        assert_eq!(
            values.len(),
            self.size(),
            "wrong number of values for {}[{}]",
            self.name,
            self.size()
        );
        for (i, value) in values.iter().enumerate() {
            self.data[i] = *value;
        }
    }

    pub fn set_all(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn zeros(&mut self) {
        self.set_all(0.0);
    }

    pub fn ones(&mut self) {
        self.set_all(1.0);
    }

    /// Component slice in storage order.
    pub fn values(&self) -> &[f64] {
        return self.data.as_slice();
    }

    pub fn x(&self) -> f64 {
        assert!(self.size() >= 1, "{}[{}] has no x component", self.name, self.size());
        return self.data[0];
    }

    pub fn y(&self) -> f64 {
        assert!(self.size() >= 2, "{}[{}] has no y component", self.name, self.size());
        return self.data[1];
    }

    pub fn z(&self) -> f64 {
        assert!(self.size() >= 3, "{}[{}] has no z component", self.name, self.size());
        return self.data[2];
    }

    pub fn norm(&self) -> f64 {
        return self.data.norm();
    }

    /// Returns the vector scaled to unit length. A zero vector stays zero
    /// instead of turning into NaNs.
    pub fn normalize(&self) -> Vector {
        if self.norm() == 0.0 {
            return Vector::new(self.size());
        }
        return Vector {
            name: DEFAULT_NAME.to_string(),
            data: self.data.normalize(),
        };
    }

    pub fn add(&self, v: &Vector) -> Vector {
        if self.size() != v.size() {
            size_mismatch(&self.name, &self.dimension_string(), &v.name, &v.dimension_string());
        }
        return Vector {
            name: DEFAULT_NAME.to_string(),
            data: &self.data + &v.data,
        };
    }

    pub fn subtract(&self, v: &Vector) -> Vector {
        if self.size() != v.size() {
            size_mismatch(&self.name, &self.dimension_string(), &v.name, &v.dimension_string());
        }
        return Vector {
            name: DEFAULT_NAME.to_string(),
            data: &self.data - &v.data,
        };
    }

    pub fn scale(&self, factor: f64) -> Vector {
        return Vector {
            name: DEFAULT_NAME.to_string(),
            data: self.data.scale(factor),
        };
    }

    pub fn dot(&self, v: &Vector) -> f64 {
        if self.size() != v.size() {
            size_mismatch(&self.name, &self.dimension_string(), &v.name, &v.dimension_string());
        }
        return self.data.dot(&v.data);
    }

    /// Cross product, defined for 3-dimensional vectors only.
    pub fn cross(&self, v: &Vector) -> Vector {
        assert!(
            self.size() == 3 && v.size() == 3,
            "cross product needs 3-dimensional vectors: {}[{}], {}[{}]",
            self.name,
            self.size(),
            v.name,
            v.size()
        );
        let a = &self.data;
        let b = &v.data;
        return Vector::from_values(&[
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]);
    }

    /// Appends a 1 component, turning a point into homogeneous coordinates.
    pub fn homogeneous_point(&self) -> Vector {
        let mut values = self.data.as_slice().to_vec();
        values.push(1.0);
        return Vector::from_values(&values);
    }

    /// Appends a 0 component, marking the vector as a direction.
    pub fn homogeneous_direction(&self) -> Vector {
        let mut values = self.data.as_slice().to_vec();
        values.push(0.0);
        return Vector::from_values(&values);
    }

    /// Copies `count` components starting at `start` into a new vector.
    pub fn sub_vector(&self, start: usize, count: usize) -> Vector {
        assert!(
            count >= 1 && start + count <= self.size(),
            "invalid subvector [{}..{}) of {}[{}]",
            start,
            start + count,
            self.name,
            self.size()
        );
        return Vector {
            name: DEFAULT_NAME.to_string(),
            data: self.data.rows(start, count).into_owned(),
        };
    }

    /// Clamps every component into [min, max].
    pub fn clamp(&self, min: f64, max: f64) -> Vector {
        return Vector {
            name: DEFAULT_NAME.to_string(),
            data: self.data.map(|value| value.clamp(min, max)),
        };
    }

    /// Reinterprets the vector as a single column matrix.
    pub fn to_matrix(&self) -> crate::algebra::Matrix {
        let mut m = crate::algebra::Matrix::named(&self.name, self.size(), 1);
        for i in 0..self.size() {
            m.set(i, 0, self.data[i]);
        }
        return m;
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = [", self.name)?;
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        return write!(f, "]';");
    }
}
