//! Cholesky decomposition of symmetric positive-definite matrices.

use std::borrow::{Borrow, BorrowMut};

use crate::{Error, Matrix, Scalar, Sqrt, Vector};

/// The Cholesky decomposition `A = L * L^T` of a symmetric positive-definite matrix `A`.
///
/// Only the upper triangle (including the diagonal) of the input is read; the strict lower
/// triangle is treated as redundant and overwritten. After decomposition the matrix stored in
/// the decomposition (see [`Cholesky::packed`]) holds:
///
/// - strictly below the diagonal: the sub-diagonal entries of `L`,
/// - on and above the diagonal: the caller's original values, untouched.
///
/// The diagonal of `L` is kept in a separate vector ([`Cholesky::diagonal`]), so a failed
/// decomposition never clobbers the input diagonal, and the original matrix can always be rebuilt
/// with [`Cholesky::symmetric`].
///
/// The storage `S` is either an owned [`Matrix`] ([`Matrix::cholesky`] copies the input) or a
/// mutable borrow of the caller's matrix ([`Matrix::cholesky_in_place`] transforms it in place).
///
/// If the matrix turns out not to be positive-definite, decomposition stops at the offending
/// column and [`Cholesky::is_positive_definite`] returns `false`. [`Cholesky::solve`] returns
/// garbage in that case, the checked methods return [`Error::NotPositiveDefinite`].
///
/// # Examples
///
/// ```
/// # use fixed_linalg::*;
/// let a = Matrix::from_rows([
///     [4.0, 2.0],
///     [0.0, 3.0], // lower triangle is ignored
/// ]);
/// let chol = a.cholesky();
/// assert!(chol.is_positive_definite());
/// assert_eq!(chol.l(), Matrix::from_rows([[2.0, 0.0], [1.0, 2.0f64.sqrt()]]));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Cholesky<T, const N: usize, S = Matrix<T, N, N>> {
    storage: S,
    diagonal: Vector<T, N>,
    failed_at: Option<usize>,
}

impl<T, const N: usize, S> Cholesky<T, N, S>
where
    T: Scalar + Sqrt,
    S: BorrowMut<Matrix<T, N, N>>,
{
    /// Decomposes the matrix in `storage`, overwriting its strict lower triangle.
    pub fn new(mut storage: S) -> Self {
        let a: &mut Matrix<T, N, N> = storage.borrow_mut();
        let mut diagonal = Vector::<T, N>::ZERO;
        let mut failed_at = None;

        for k in 0..N {
            // Entries left of the diagonal in row `k` already hold `L`.
            let mut d = a[(k, k)];
            for m in 0..k {
                d = d - a[(k, m)] * a[(k, m)];
            }

            // Negated `>` so a NaN also counts as failure.
            if !(d > T::ZERO) {
                log::debug!(
                    "Cholesky decomposition: diagonal factor {k} would be sqrt({d:?}), \
                     matrix is not positive-definite"
                );
                failed_at = Some(k);
                break;
            }

            let diag = d.sqrt();
            diagonal[k] = diag;

            for i in k + 1..N {
                // `A(i, k)` comes from its upper-triangle mirror, `(i, k)` is overwritten below.
                let mut s = a[(k, i)];
                for m in 0..k {
                    s = s - a[(i, m)] * a[(k, m)];
                }
                a[(i, k)] = s / diag;
            }
        }

        Self {
            storage,
            diagonal,
            failed_at,
        }
    }
}

impl<T, const N: usize, S> Cholesky<T, N, S>
where
    T: Scalar + Sqrt,
    S: Borrow<Matrix<T, N, N>>,
{
    /// Returns whether every diagonal factor was computed from a positive value.
    ///
    /// This must be checked before trusting [`Cholesky::solve`] or the factors.
    #[inline]
    pub fn is_positive_definite(&self) -> bool {
        self.failed_at.is_none()
    }

    fn check(&self) -> Result<(), Error> {
        match self.failed_at {
            Some(column) => Err(Error::NotPositiveDefinite { column }),
            None => Ok(()),
        }
    }

    /// Returns the diagonal of `L`.
    ///
    /// Entries at and after the column where decomposition failed are zero.
    #[inline]
    pub fn diagonal(&self) -> &Vector<T, N> {
        &self.diagonal
    }

    /// Returns the transformed matrix: `L` strictly below the diagonal, the input elsewhere.
    #[inline]
    pub fn packed(&self) -> &Matrix<T, N, N> {
        self.storage.borrow()
    }

    /// Returns the lower-triangular factor `L`.
    pub fn l(&self) -> Matrix<T, N, N> {
        let a = self.packed();
        Matrix::from_fn(|row, col| match row.cmp(&col) {
            std::cmp::Ordering::Greater => a[(row, col)],
            std::cmp::Ordering::Equal => self.diagonal[row],
            std::cmp::Ordering::Less => T::ZERO,
        })
    }

    /// Rebuilds the symmetric input matrix from the preserved upper triangle.
    pub fn symmetric(&self) -> Matrix<T, N, N> {
        let a = self.packed();
        Matrix::from_fn(|row, col| a[(row.min(col), row.max(col))])
    }

    /// Releases the storage, which holds the transformed matrix described in [`Cholesky`].
    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Solves `A * x = b` for `x`.
    ///
    /// The result is meaningless if the matrix was not [positive-definite]. Use
    /// [`Cholesky::try_solve`] to have that checked.
    ///
    /// [positive-definite]: Cholesky::is_positive_definite
    pub fn solve(&self, b: Vector<T, N>) -> Vector<T, N> {
        let a = self.packed();
        let mut x = b;

        // Forward substitution through `L`.
        for i in 0..N {
            for m in 0..i {
                x[i] = x[i] - a[(i, m)] * x[m];
            }
            x[i] = x[i] / self.diagonal[i];
        }

        // Back substitution through `L^T`: row `i` of `L^T` is column `i` of `L`.
        for i in (0..N).rev() {
            for m in i + 1..N {
                x[i] = x[i] - a[(m, i)] * x[m];
            }
            x[i] = x[i] / self.diagonal[i];
        }

        x
    }

    /// Solves `A * x = b` for `x`, or returns [`Error::NotPositiveDefinite`].
    pub fn try_solve(&self, b: Vector<T, N>) -> Result<Vector<T, N>, Error> {
        self.check()?;
        Ok(self.solve(b))
    }

    /// Solves `A * X = B` for every column of `B` at once, without checking definiteness.
    pub fn solve_matrix<const K: usize>(&self, mut b: Matrix<T, N, K>) -> Matrix<T, N, K> {
        for col in 0..K {
            b.set_column(col, self.solve(b.column(col)));
        }
        b
    }

    /// Returns the determinant of the decomposed matrix (the squared product of `L`'s diagonal),
    /// or [`Error::NotPositiveDefinite`].
    ///
    /// A matrix that is not positive-definite can still have a nonzero determinant;
    /// [`Matrix::determinant`] computes it through LU.
    pub fn determinant(&self) -> Result<T, Error> {
        self.check()?;
        let prod = self
            .diagonal
            .into_array()
            .into_iter()
            .fold(T::ONE, |acc, d| acc * d);
        Ok(prod * prod)
    }

    /// Computes the inverse of the decomposed matrix.
    pub fn inverse(&self) -> Result<Matrix<T, N, N>, Error> {
        self.check()?;
        Ok(self.solve_matrix(Matrix::identity()))
    }
}

impl<T: Scalar + Sqrt, const N: usize> Matrix<T, N, N> {
    /// Computes the Cholesky decomposition of a copy of this matrix, leaving `self` untouched.
    ///
    /// Only the upper triangle of `self` is read.
    pub fn cholesky(&self) -> Cholesky<T, N> {
        Cholesky::new(*self)
    }

    /// Computes the Cholesky decomposition of this matrix, which becomes the decomposition's
    /// storage. [`Cholesky::into_inner`] returns it in transformed form.
    pub fn into_cholesky(self) -> Cholesky<T, N> {
        Cholesky::new(self)
    }

    /// Computes the Cholesky decomposition in place.
    ///
    /// The strict lower triangle of `self` is overwritten with `L`; the diagonal and upper triangle
    /// keep their values. The returned decomposition borrows `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fixed_linalg::*;
    /// let mut a = Matrix::from_rows([
    ///     [4.0, 2.0],
    ///     [0.0, 3.0],
    /// ]);
    /// let x = a.cholesky_in_place().try_solve(Vector::from_column([2.0, 1.0]))?;
    /// approx::assert_abs_diff_eq!(x, Vector::from_column([0.5, 0.0]), epsilon = 1e-12);
    /// assert_eq!(a, Matrix::from_rows([[4.0, 2.0], [1.0, 3.0]]));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn cholesky_in_place(&mut self) -> Cholesky<T, N, &mut Self> {
        Cholesky::new(self)
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use crate::{Mat2, Mat3};

    use super::*;

    #[rustfmt::skip]
    fn spd() -> Mat3<f64> {
        Matrix::from_rows([
            [ 4.0,  12.0, -16.0],
            [12.0,  37.0, -43.0],
            [-16.0, -43.0, 98.0],
        ])
    }

    #[test]
    fn factor() {
        let chol = spd().cholesky();
        assert!(chol.is_positive_definite());

        #[rustfmt::skip]
        let expected = Mat3::from_rows([
            [ 2.0, 0.0, 0.0],
            [ 6.0, 1.0, 0.0],
            [-8.0, 5.0, 3.0],
        ]);
        assert_relative_eq!(chol.l(), expected, max_relative = 1e-12);
        assert_relative_eq!(chol.l() * chol.l().transpose(), spd(), max_relative = 1e-12);
    }

    #[test]
    fn lower_triangle_is_ignored() {
        let mut a = spd();
        a[(1, 0)] = 1000.0;
        a[(2, 0)] = f64::NAN;
        a[(2, 1)] = -7.0;
        assert_eq!(a.cholesky().l(), spd().cholesky().l());
    }

    #[test]
    fn in_place_keeps_upper_triangle_and_diagonal() {
        let mut a = spd();
        let chol = a.cholesky_in_place();
        let l = chol.l();
        let diagonal = *chol.diagonal();
        drop(chol);

        for i in 0..3 {
            assert_eq!(a[(i, i)], spd()[(i, i)]);
            assert_eq!(diagonal[i], l[(i, i)]);
            for j in i + 1..3 {
                assert_eq!(a[(i, j)], spd()[(i, j)]);
                assert_eq!(a[(j, i)], l[(j, i)]);
            }
        }
    }

    #[test]
    fn symmetric_rebuilds_input() {
        let mut a = spd();
        a[(2, 0)] = 0.0;
        let chol = a.cholesky();
        assert_eq!(chol.symmetric(), spd());
        assert_eq!(chol.into_inner()[(0, 2)], -16.0);
    }

    #[test]
    fn into_inner_holds_factor() {
        let packed = spd().into_cholesky().into_inner();
        assert_eq!(packed[(2, 0)], -8.0);
        assert_eq!(packed[(2, 1)], 5.0);
        assert_eq!(packed[(1, 1)], 37.0);
        assert_eq!(packed[(0, 2)], -16.0);
    }

    #[test]
    fn not_positive_definite() {
        // Eigenvalues 3 and -1.
        let chol = Mat2::from_rows([[1.0, 2.0], [2.0, 1.0]]).cholesky();
        assert!(!chol.is_positive_definite());
        assert_eq!(
            chol.try_solve(Vector::from_column([1.0, 1.0])),
            Err(Error::NotPositiveDefinite { column: 1 })
        );
        assert_eq!(
            chol.inverse(),
            Err(Error::NotPositiveDefinite { column: 1 })
        );
        assert_eq!(
            chol.determinant(),
            Err(Error::NotPositiveDefinite { column: 1 })
        );
        assert_eq!(chol.diagonal()[1], 0.0);
    }

    #[test]
    fn negative_leading_entry() {
        let mut a = Mat2::from_rows([[-1.0f32, 0.0], [5.0, 1.0]]);
        let chol = a.cholesky_in_place();
        assert!(!chol.is_positive_definite());
        drop(chol);
        // Nothing was written before failing.
        assert_eq!(a, Mat2::from_rows([[-1.0f32, 0.0], [5.0, 1.0]]));
    }

    #[test]
    fn solve() {
        let a = spd();
        let b = Vector::from_column([1.0, 2.0, 3.0]);
        let x = a.cholesky().try_solve(b).unwrap();
        assert_relative_eq!(a * x, b, max_relative = 1e-10);
        assert_relative_eq!(x, a.solve(b).unwrap(), max_relative = 1e-10);
    }

    #[test]
    fn determinant_and_inverse() {
        let a = spd();
        let chol = a.cholesky();
        // (2 * 1 * 3)^2
        let det = chol.determinant().unwrap();
        assert_relative_eq!(det, 36.0, max_relative = 1e-12);
        assert_relative_eq!(det, a.determinant(), max_relative = 1e-10);

        let inv = chol.inverse().unwrap();
        assert_abs_diff_eq!(inv * a, Mat3::<f64>::identity(), epsilon = 1e-10);
    }
}
