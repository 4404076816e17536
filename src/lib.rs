//! Dense linear algebra on fixed-size matrices, without allocating.
//!
//! # Motivation
//!
//! Solving small linear systems, inverting matrices and computing determinants comes up all the
//! time in filters, controllers and geometry code, often on targets where heap allocation is
//! unavailable or unwelcome. This library provides those operations on top of two well-understood
//! factorizations instead of naive formulas (cofactor expansion and Cramer's rule are both
//! numerically unstable and exponentially expensive):
//!
//! - [`LuDecomposition`]: Gaussian elimination with partial (row) pivoting, for general square
//!   matrices. Used for [`Matrix::solve`], [`Matrix::inverse`] and [`Matrix::determinant`].
//! - [`Cholesky`]: `L * L^T` factorization of symmetric positive-definite matrices, roughly twice
//!   as fast as LU and reading only the upper triangle of its input.
//!
//! # Goals & Non-Goals
//!
//! - Matrix dimensions are const generics. All storage is a plain nested array inside the
//!   [`Matrix`] value, and mismatched operand dimensions are compile errors rather than runtime
//!   errors. Dynamically-sized and sparse matrices are out of scope.
//! - Failure is reported through flags on the factorization results
//!   ([`LuDecomposition::is_singular`], [`Cholesky::is_positive_definite`]), with checked
//!   `Result`-returning variants on top. Nothing panics on numerically bad input.
//! - Be generic over the element type via the small traits in this crate ([`Number`], [`Scalar`],
//!   [`Sqrt`]), implemented for [`f32`] and [`f64`].
//! - Single-threaded and deterministic: the same input always produces the same factorization,
//!   including how ties between equally large pivot candidates are broken.
//!
//! # Logging
//!
//! Decompositions report detected singularity (and pivot row exchanges, at `trace` level) through
//! the [`log`] facade. No logger is installed by this crate.

mod cholesky;
mod error;
mod lu;
mod matrix;
mod traits;

pub use cholesky::Cholesky;
pub use error::Error;
pub use lu::LuDecomposition;
pub use matrix::*;
pub use traits::*;
