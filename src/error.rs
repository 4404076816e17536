/// Reasons a factorization cannot be used to solve, invert, or take a determinant.
///
/// The factorization types report these conditions through flags
/// ([`LuDecomposition::is_singular`], [`Cholesky::is_positive_definite`]); this type is what the
/// checked entry points (`try_solve`, `inverse`, ...) return instead of a meaningless result.
///
/// [`LuDecomposition::is_singular`]: crate::LuDecomposition::is_singular
/// [`Cholesky::is_positive_definite`]: crate::Cholesky::is_positive_definite
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No usable pivot was found while eliminating column `stage`.
    #[error("matrix is singular (no pivot above tolerance in column {stage})")]
    Singular { stage: usize },
    /// The diagonal factor of column `column` would be the square root of a non-positive value.
    #[error("matrix is not positive-definite (diagonal factor {column} is not positive)")]
    NotPositiveDefinite { column: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::Singular { stage: 2 }.to_string(),
            "matrix is singular (no pivot above tolerance in column 2)"
        );
        assert_eq!(
            Error::NotPositiveDefinite { column: 0 }.to_string(),
            "matrix is not positive-definite (diagonal factor 0 is not positive)"
        );
    }
}
