use std::{array, fmt};

use crate::{One, Zero};

mod ops;

/// A 2x2 matrix.
pub type Mat2<T> = Matrix<T, 2, 2>;
/// A 3x3 matrix.
pub type Mat3<T> = Matrix<T, 3, 3>;

/// An `N`-element column vector.
///
/// Vectors are ordinary single-column [`Matrix`] values, so everything that works on matrices
/// (multiplication, comparison, indexing by `(row, col)`) works on them too. They can additionally
/// be indexed with a single `usize`.
pub type Vector<T, const N: usize> = Matrix<T, N, 1>;

/// A row-major matrix with `R` rows and `C` columns, and element type `T`.
///
/// Both dimensions are part of the type, so the storage is a plain nested array that lives
/// wherever the [`Matrix`] itself lives (typically on the stack). Nothing in this crate allocates.
/// Operands with incompatible dimensions are rejected by the compiler.
///
/// # Construction
///
/// - [`Matrix::from_rows`] fills the matrix from an array of rows.
/// - [`Matrix::from_row_slice`] fills it from a flat, row-major slice of `R * C` elements.
/// - [`Matrix::from_fn`] creates each element by invoking a closure with its row and column.
/// - [`Vector::from_column`] creates a column vector from an array.
/// - [`Matrix::ZERO`] and [`Matrix::identity`] create the two most common matrices.
///
/// # Element Access
///
/// [`Matrix`] implements the [`Index`] and [`IndexMut`] traits for tuples of `(usize, usize)`. The
/// first element of the tuple is the *row*, the second is the *column*. Indices are 0-based.
///
/// ```
/// # use fixed_linalg::*;
/// let mut mat = Matrix::from_rows([
///     [0, 1],
///     [2, 3],
/// ]);
/// mat[(1, 0)] = 4;
/// assert_eq!(mat[(1, 0)], 4);
/// assert_eq!(mat[(0, 1)], 1);
/// ```
///
/// Indexing out of bounds panics. [`Matrix::get`] and [`Matrix::get_mut`] return [`Option`]s
/// instead.
///
/// [`Index`]: std::ops::Index
/// [`IndexMut`]: std::ops::IndexMut
#[derive(Clone, Copy, Hash)]
#[repr(transparent)]
pub struct Matrix<T, const R: usize, const C: usize>([[T; C]; R]);

unsafe impl<T: bytemuck::Zeroable, const R: usize, const C: usize> bytemuck::Zeroable
    for Matrix<T, R, C>
{
}
unsafe impl<T: bytemuck::Pod, const R: usize, const C: usize> bytemuck::Pod for Matrix<T, R, C> {}

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Number of rows.
    pub const ROWS: usize = R;
    /// Number of columns.
    pub const COLS: usize = C;

    /// Creates a [`Matrix`] from an array of rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fixed_linalg::*;
    /// let mat = Matrix::from_rows([
    ///     [0, 1, 2],
    ///     [3, 4, 5],
    /// ]);
    /// assert_eq!(mat[(1, 2)], 5);
    /// ```
    #[inline]
    pub const fn from_rows(rows: [[T; C]; R]) -> Self {
        Self(rows)
    }

    /// Creates a [`Matrix`] by invoking a closure with the position (row and column) of each element.
    ///
    /// Elements are produced in row-major order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fixed_linalg::*;
    /// let mat = Matrix::from_fn(|row, col| row * 10 + col);
    /// assert_eq!(mat, Matrix::from_rows([
    ///     [ 0,  1,  2],
    ///     [10, 11, 12],
    /// ]));
    /// ```
    pub fn from_fn<F>(mut cb: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        Self(array::from_fn(|row| array::from_fn(|col| cb(row, col))))
    }

    /// Creates a [`Matrix`] from a flat slice of `R * C` elements in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `elems` does not contain exactly `R * C` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fixed_linalg::*;
    /// let mat = Matrix::<_, 2, 2>::from_row_slice(&[1, 2, 3, 4]);
    /// assert_eq!(mat, Matrix::from_rows([[1, 2], [3, 4]]));
    /// ```
    #[track_caller]
    pub fn from_row_slice(elems: &[T]) -> Self
    where
        T: Copy,
    {
        assert_eq!(
            elems.len(),
            R * C,
            "a {}x{} matrix needs {} elements",
            R,
            C,
            R * C
        );
        Self::from_fn(|row, col| elems[row * C + col])
    }

    /// Applies a closure to each element, returning a new matrix.
    pub fn map<F, U>(self, mut f: F) -> Matrix<U, R, C>
    where
        F: FnMut(T) -> U,
    {
        Matrix(self.0.map(|row| row.map(&mut f)))
    }

    /// Swaps the rows and columns of this matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fixed_linalg::*;
    /// let mat = Matrix::from_rows([
    ///     [0, 1, 2],
    ///     [3, 4, 5],
    /// ]).transpose();
    /// assert_eq!(mat, Matrix::from_rows([
    ///     [0, 3],
    ///     [1, 4],
    ///     [2, 5],
    /// ]));
    /// ```
    pub fn transpose(&self) -> Matrix<T, C, R>
    where
        T: Copy,
    {
        Matrix::from_fn(|row, col| self.0[col][row])
    }

    /// Returns a reference to the element at `(row, col)`, or [`None`] if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.0.get(row).and_then(|r| r.get(col))
    }

    /// Returns a mutable reference to the element at `(row, col)`, or [`None`] if out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.0.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Exchanges rows `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.0.swap(a, b);
    }

    /// Returns column `col` as a [`Vector`].
    pub fn column(&self, col: usize) -> Vector<T, R>
    where
        T: Copy,
    {
        Vector::from_fn(|row, _| self.0[row][col])
    }

    /// Overwrites column `col` with the elements of `column`.
    pub fn set_column(&mut self, col: usize, column: Vector<T, R>) {
        for (row, [elem]) in self.0.iter_mut().zip(column.0) {
            row[col] = elem;
        }
    }
}

impl<T: Zero + Copy, const R: usize, const C: usize> Matrix<T, R, C> {
    /// A matrix with every element set to 0.
    pub const ZERO: Self = Self([[T::ZERO; C]; R]);
}

impl<T: Zero + One + Copy, const N: usize> Matrix<T, N, N> {
    /// Returns the identity matrix.
    ///
    /// The matrix has the value 1 on its diagonal and 0 everywhere else.
    pub fn identity() -> Self {
        Self::from_fn(|row, col| if row == col { T::ONE } else { T::ZERO })
    }
}

impl<T, const N: usize> Matrix<T, N, N> {
    /// Returns a [`Vector`] holding the diagonal elements of this square matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fixed_linalg::*;
    /// let mat = Matrix::from_rows([
    ///     [1, 2],
    ///     [3, 4],
    /// ]);
    /// assert_eq!(mat.into_diagonal(), Vector::from_column([1, 4]));
    /// ```
    pub fn into_diagonal(self) -> Vector<T, N>
    where
        T: Copy,
    {
        Vector::from_fn(|i, _| self.0[i][i])
    }
}

impl<T, const N: usize> Matrix<T, N, 1> {
    /// Creates a column vector from its elements.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fixed_linalg::*;
    /// let v = Vector::from_column([1, 2, 3]);
    /// assert_eq!(v[2], 3);
    /// assert_eq!(v[(2, 0)], 3);
    /// ```
    pub fn from_column(elems: [T; N]) -> Self {
        Self(elems.map(|elem| [elem]))
    }

    /// Converts this column vector into an array of its elements.
    pub fn into_array(self) -> [T; N] {
        self.0.map(|[elem]| elem)
    }
}

impl<T: fmt::Debug, const R: usize, const C: usize> fmt::Debug for Matrix<T, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct FormatRow<'a, T: fmt::Debug>(&'a [T]);
        impl<'a, T: fmt::Debug> fmt::Debug for FormatRow<'a, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "[")?;
                for (i, elem) in self.0.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", elem)?;
                }
                write!(f, "]")
            }
        }

        let mut list = f.debug_list();
        for row in &self.0 {
            list.entry(&FormatRow(row));
        }
        list.finish()
    }
}

impl<T, const R: usize, const C: usize> Default for Matrix<T, R, C>
where
    T: Default,
{
    fn default() -> Self {
        Self::from_fn(|_, _| T::default())
    }
}

impl<T, const R: usize, const C: usize> From<[[T; C]; R]> for Matrix<T, R, C> {
    #[inline]
    fn from(rows: [[T; C]; R]) -> Self {
        Self(rows)
    }
}

impl<T, const N: usize> From<[T; N]> for Matrix<T, N, 1> {
    #[inline]
    fn from(elems: [T; N]) -> Self {
        Self::from_column(elems)
    }
}
