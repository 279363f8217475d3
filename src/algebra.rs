//! Small linear algebra layer used by the whole pipeline.
//!
//! Vectors and matrices carry a name so that dimension errors can point
//! at the operands involved instead of just reporting two numbers.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;

/// Aborts with a message naming both operands and their dimensions.
pub(crate) fn size_mismatch(a_name: &str, a_dims: &str, b_name: &str, b_dims: &str) -> ! {
    panic!(
        "size mismatch: {}[{}] != {}[{}]",
        a_name, a_dims, b_name, b_dims
    );
}
