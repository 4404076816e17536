//! LU decomposition with partial pivoting.

use std::array;

use crate::{Error, Matrix, Scalar, Vector};

/// The LU decomposition of a square matrix `A`, such that `A = P * L * U`.
///
/// - `P` is a permutation matrix describing the row exchanges performed while pivoting.
/// - `L` is unit lower-triangular (ones on its diagonal).
/// - `U` is upper-triangular.
///
/// `L` and `U` are stored packed into a single `N`x`N` matrix (`L` below the diagonal, `U` on and
/// above it) and `P` is stored as an index array. [`LuDecomposition::p`], [`LuDecomposition::l`]
/// and [`LuDecomposition::u`] materialize the explicit matrices on demand.
///
/// Decomposing never fails outright. If no pivot above the tolerance can be found in some column,
/// elimination stops there and the decomposition is flagged as singular
/// ([`LuDecomposition::is_singular`]). The partially eliminated factors of a singular
/// decomposition have no useful meaning: [`LuDecomposition::solve`] returns garbage for them,
/// [`LuDecomposition::determinant`] returns exactly zero, and the checked methods
/// ([`LuDecomposition::try_solve`], [`LuDecomposition::inverse`]) return an [`Error`].
///
/// # Examples
///
/// ```
/// # use fixed_linalg::*;
/// let a = Matrix::from_rows([
///     [2.0, 5.0, 8.0],
///     [0.0, 8.0, 6.0],
///     [6.0, 7.0, 5.0],
/// ]);
/// let lu = a.lu();
/// assert!(!lu.is_singular());
///
/// let x = lu.solve(Vector::from_column([10.0, 11.0, 12.0]));
/// approx::assert_abs_diff_eq!(x, Vector::from_column([0.41826923, 0.97115385, 0.53846154]), epsilon = 1e-7);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LuDecomposition<T, const N: usize> {
    /// `permutation[k]` is the index of the input row that ended up in row `k`.
    permutation: [usize; N],
    lu: Matrix<T, N, N>,
    row_swaps: usize,
    singular_at: Option<usize>,
}

impl<T: Scalar, const N: usize> LuDecomposition<T, N> {
    /// Decomposes `a`, using [`LuDecomposition::default_tolerance`] to detect singularity.
    pub fn new(a: Matrix<T, N, N>) -> Self {
        let tolerance = Self::default_tolerance(&a);
        Self::with_tolerance(a, tolerance)
    }

    /// Returns the singularity threshold used by [`LuDecomposition::new`]: `N * EPSILON` times the
    /// largest element magnitude of `a`.
    ///
    /// The threshold scales with the matrix, so multiplying `a` by a constant does not change
    /// whether it is considered singular. A zero matrix gets a threshold of zero, which still
    /// rejects its zero pivots.
    pub fn default_tolerance(a: &Matrix<T, N, N>) -> T {
        // NaN elements never compare greater and are skipped here; they are caught at the pivot.
        let scale = (0..N)
            .flat_map(|row| (0..N).map(move |col| (row, col)))
            .map(|pos| a[pos].abs())
            .fold(T::ZERO, |max, x| if x > max { x } else { max });
        let n = (0..N).fold(T::ZERO, |acc, _| acc + T::ONE);
        n * T::EPSILON * scale
    }

    /// Decomposes `a`, treating every pivot whose magnitude is at or below `tolerance` as zero.
    ///
    /// `a` is taken by value and becomes the factor store. Callers that want to keep their matrix
    /// can use [`Matrix::lu`], or simply pass a copy.
    pub fn with_tolerance(mut a: Matrix<T, N, N>, tolerance: T) -> Self {
        let mut permutation = array::from_fn(|i| i);
        let mut row_swaps = 0;
        let mut singular_at = None;

        for k in 0..N {
            // Ties go to the lowest row index, so the result is reproducible.
            let mut pivot_row = k;
            let mut max = a[(k, k)].abs();
            for i in k + 1..N {
                let magnitude = a[(i, k)].abs();
                if magnitude > max {
                    max = magnitude;
                    pivot_row = i;
                }
            }

            // Written as a negated `>` so that a NaN pivot is also treated as singular.
            if !(max > tolerance) {
                log::debug!(
                    "LU decomposition: largest pivot candidate in column {k} is {max:?} \
                     (tolerance {tolerance:?}), matrix is singular"
                );
                singular_at = Some(k);
                break;
            }

            if pivot_row != k {
                log::trace!("LU decomposition: swapping rows {k} and {pivot_row}");
                a.swap_rows(k, pivot_row);
                permutation.swap(k, pivot_row);
                row_swaps += 1;
            }

            let pivot = a[(k, k)];
            for i in k + 1..N {
                let multiplier = a[(i, k)] / pivot;
                a[(i, k)] = multiplier;
                for j in k + 1..N {
                    a[(i, j)] = a[(i, j)] - multiplier * a[(k, j)];
                }
            }
        }

        Self {
            permutation,
            lu: a,
            row_swaps,
            singular_at,
        }
    }

    /// Returns whether elimination hit a pivot at or below the tolerance.
    ///
    /// This must be checked before trusting [`LuDecomposition::solve`] or the factors.
    #[inline]
    pub fn is_singular(&self) -> bool {
        self.singular_at.is_some()
    }

    fn check(&self) -> Result<(), Error> {
        match self.singular_at {
            Some(stage) => Err(Error::Singular { stage }),
            None => Ok(()),
        }
    }

    /// Returns the row permutation: entry `k` is the index of the input row moved to row `k`.
    #[inline]
    pub fn permutation(&self) -> &[usize; N] {
        &self.permutation
    }

    /// Returns the number of row exchanges performed while pivoting.
    #[inline]
    pub fn row_swaps(&self) -> usize {
        self.row_swaps
    }

    /// Returns the packed factor store (`L` strictly below the diagonal, `U` on and above it).
    #[inline]
    pub fn packed(&self) -> &Matrix<T, N, N> {
        &self.lu
    }

    /// Returns the permutation matrix `P`.
    pub fn p(&self) -> Matrix<T, N, N> {
        Matrix::from_fn(|row, col| {
            if self.permutation[col] == row {
                T::ONE
            } else {
                T::ZERO
            }
        })
    }

    /// Returns the unit lower-triangular factor `L`.
    pub fn l(&self) -> Matrix<T, N, N> {
        Matrix::from_fn(|row, col| match row.cmp(&col) {
            std::cmp::Ordering::Greater => self.lu[(row, col)],
            std::cmp::Ordering::Equal => T::ONE,
            std::cmp::Ordering::Less => T::ZERO,
        })
    }

    /// Returns the upper-triangular factor `U`.
    pub fn u(&self) -> Matrix<T, N, N> {
        Matrix::from_fn(|row, col| {
            if row <= col {
                self.lu[(row, col)]
            } else {
                T::ZERO
            }
        })
    }

    /// Solves `A * x = b` for `x`.
    ///
    /// The result is meaningless if the decomposition [is singular]. Use
    /// [`LuDecomposition::try_solve`] to have that checked.
    ///
    /// [is singular]: LuDecomposition::is_singular
    pub fn solve(&self, b: Vector<T, N>) -> Vector<T, N> {
        // Apply the row exchanges: `P^T * b`.
        let mut x: Vector<T, N> = Matrix::from_fn(|row, _| b[self.permutation[row]]);

        // Forward substitution through `L`. Its diagonal is 1, so no division.
        for i in 0..N {
            for k in 0..i {
                x[i] = x[i] - self.lu[(i, k)] * x[k];
            }
        }

        // Back substitution through `U`.
        for i in (0..N).rev() {
            for k in i + 1..N {
                x[i] = x[i] - self.lu[(i, k)] * x[k];
            }
            x[i] = x[i] / self.lu[(i, i)];
        }

        x
    }

    /// Solves `A * x = b` for `x`, or returns [`Error::Singular`].
    pub fn try_solve(&self, b: Vector<T, N>) -> Result<Vector<T, N>, Error> {
        self.check()?;
        Ok(self.solve(b))
    }

    /// Solves `A * X = B` for every column of `B` at once.
    ///
    /// Like [`LuDecomposition::solve`], this does not check for singularity.
    pub fn solve_matrix<const K: usize>(&self, mut b: Matrix<T, N, K>) -> Matrix<T, N, K> {
        for col in 0..K {
            b.set_column(col, self.solve(b.column(col)));
        }
        b
    }

    /// Returns the determinant of the decomposed matrix.
    ///
    /// This is exactly zero for a singular decomposition, otherwise the product of `U`'s diagonal,
    /// negated if an odd number of row exchanges took place.
    pub fn determinant(&self) -> T {
        if self.is_singular() {
            return T::ZERO;
        }

        let det = self
            .lu
            .into_diagonal()
            .into_array()
            .into_iter()
            .fold(T::ONE, |acc, d| acc * d);
        if self.row_swaps % 2 == 0 {
            det
        } else {
            -det
        }
    }

    /// Computes the inverse of the decomposed matrix, column by column.
    pub fn inverse(&self) -> Result<Matrix<T, N, N>, Error> {
        self.check()?;
        Ok(self.solve_matrix(Matrix::identity()))
    }
}

/// Operations on square matrices that go through an LU decomposition.
impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Computes the LU decomposition of this matrix, leaving `self` untouched.
    pub fn lu(&self) -> LuDecomposition<T, N> {
        LuDecomposition::new(*self)
    }

    /// Computes the LU decomposition, reusing this matrix's storage as the factor store.
    pub fn into_lu(self) -> LuDecomposition<T, N> {
        LuDecomposition::new(self)
    }

    /// Returns the [determinant] of the matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fixed_linalg::*;
    /// let mat = Matrix::from_rows([
    ///     [-2.0, -1.0,  2.0],
    ///     [ 2.0,  1.0,  4.0],
    ///     [-3.0,  3.0, -1.0],
    /// ]);
    /// approx::assert_relative_eq!(mat.determinant(), 54.0, max_relative = 1e-12);
    /// ```
    ///
    /// [determinant]: https://en.wikipedia.org/wiki/Determinant
    pub fn determinant(&self) -> T {
        self.lu().determinant()
    }

    /// Returns the inverse of this matrix, or [`Error::Singular`] if it has none.
    pub fn inverse(&self) -> Result<Self, Error> {
        self.lu().inverse()
    }

    /// Inverts this matrix in place.
    ///
    /// If the matrix is singular, an error is returned and `self` is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fixed_linalg::*;
    /// let mut mat = Mat2::from_rows([[4.0, 7.0], [2.0, 6.0]]);
    /// mat.invert()?;
    /// approx::assert_abs_diff_eq!(mat, Mat2::from_rows([[0.6, -0.7], [-0.2, 0.4]]), epsilon = 1e-12);
    ///
    /// let mut singular = Mat2::from_rows([[1.0, 2.0], [2.0, 4.0]]);
    /// assert_eq!(singular.invert(), Err(Error::Singular { stage: 1 }));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn invert(&mut self) -> Result<(), Error> {
        *self = self.inverse().map_err(|e| {
            log::debug!("matrix inversion failed: {e}");
            e
        })?;
        Ok(())
    }

    /// Solves `self * x = b` for `x`, or returns [`Error::Singular`].
    pub fn solve(&self, b: Vector<T, N>) -> Result<Vector<T, N>, Error> {
        self.lu().try_solve(b)
    }
}
