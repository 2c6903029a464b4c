//! Dense, row-major matrices for small and medium sized problems.
//!
//! [`FullMatrix`] is the work horse for local element matrices: it supports linear combinations,
//! matrix-vector and matrix-matrix products in all transpose combinations, closed-form and
//! Gauss-Jordan inversion, Cholesky decomposition and a number of norms.
//!
//! Products and inversions of large enough `f32`/`f64` matrices may be routed to nalgebra's
//! GEMM and LU kernels, see [`DispatchPolicy`]. Which path is taken is never observable except
//! through performance and round-off.
use crate::Number;
use itertools::izip;
use nalgebra::{convert_ref, DMatrix, DVectorView, DVectorViewMut};
use simba::scalar::SupersetOf;
use num::Zero;
use num::FromPrimitive;
use nalgebra::ComplexField;
use numeric_literals::replace_float_literals;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::ops::{DivAssign, Index, IndexMut, MulAssign};

mod backend;
mod format;
mod inverse;
mod products;

pub use backend::{DispatchPolicy, Strategy};
pub use format::PrintSettings;
pub use products::Op;

/// Numerical failure reported by inversion and decomposition routines.
///
/// Shape and index errors are programming errors and cause a panic instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Gauss-Jordan elimination found no pivot above the singularity threshold in the given column.
    NotRegular { column: usize },
    /// The matrix is singular.
    Singular,
    /// The Cholesky recurrence produced a non-positive diagonal residual in the given row.
    NotPositiveDefinite { row: usize },
    /// The operation has no backend for this scalar type or size.
    NotImplemented(&'static str),
}

impl Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            MatrixError::NotRegular { column } => {
                write!(f, "Matrix is not regular: no acceptable pivot found in column {}.", column)
            }
            MatrixError::Singular => write!(f, "Matrix is singular."),
            MatrixError::NotPositiveDefinite { row } => {
                write!(f, "Matrix is not positive definite (failed in row {}).", row)
            }
            MatrixError::NotImplemented(what) => write!(f, "Not implemented: {}.", what),
        }
    }
}

impl Error for MatrixError {}

/// A dense matrix stored contiguously in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullMatrix<T> {
    nrows: usize,
    ncols: usize,
    values: Vec<T>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FullMatrix<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename = "FullMatrix")]
        struct RawFullMatrix<T> {
            nrows: usize,
            ncols: usize,
            values: Vec<T>,
        }

        let raw = RawFullMatrix::deserialize(deserializer)?;
        if raw.values.len() != raw.nrows * raw.ncols {
            return Err(D::Error::custom(format!(
                "matrix of size {}x{} must have {} values, but {} were given",
                raw.nrows,
                raw.ncols,
                raw.nrows * raw.ncols,
                raw.values.len()
            )));
        }
        Ok(Self {
            nrows: raw.nrows,
            ncols: raw.ncols,
            values: raw.values,
        })
    }
}

impl<T> FullMatrix<T> {
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Whether the matrix has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// The entries in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// The entries of row `i`.
    pub fn row(&self, i: usize) -> &[T] {
        assert!(i < self.nrows, "Row index {} out of bounds for {} rows.", i, self.nrows);
        &self.values[i * self.ncols..(i + 1) * self.ncols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        assert!(i < self.nrows, "Row index {} out of bounds for {} rows.", i, self.nrows);
        &mut self.values[i * self.ncols..(i + 1) * self.ncols]
    }

    #[inline]
    fn linear_index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.nrows && j < self.ncols,
            "Index ({}, {}) out of bounds for {}x{} matrix.",
            i,
            j,
            self.nrows,
            self.ncols
        );
        i * self.ncols + j
    }

    pub(crate) fn assert_not_empty(&self) {
        assert!(!self.is_empty(), "Operation is not allowed on an empty matrix.");
    }

    pub(crate) fn assert_square(&self) {
        assert!(
            self.is_square(),
            "Matrix must be square, but has dimensions {}x{}.",
            self.nrows,
            self.ncols
        );
    }

    pub(crate) fn assert_same_shape<U>(&self, other: &FullMatrix<U>) {
        assert_eq!(
            (self.nrows, self.ncols),
            (other.nrows, other.ncols),
            "Matrix dimensions must match."
        );
    }
}

impl<T> Index<(usize, usize)> for FullMatrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.values[self.linear_index(i, j)]
    }
}

impl<T> IndexMut<(usize, usize)> for FullMatrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        let idx = self.linear_index(i, j);
        &mut self.values[idx]
    }
}

impl<T: Number> FullMatrix<T> {
    /// A zero matrix with `nrows` rows and `ncols` columns.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            values: vec![T::zero(); nrows * ncols],
        }
    }

    /// A square zero matrix.
    pub fn square(n: usize) -> Self {
        Self::zeros(n, n)
    }

    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::square(n);
        for i in 0..n {
            matrix[(i, i)] = T::one();
        }
        matrix
    }

    /// Creates a matrix from entries given in row-major order.
    pub fn from_row_slice(nrows: usize, ncols: usize, entries: &[T]) -> Self {
        assert_eq!(
            entries.len(),
            nrows * ncols,
            "Number of entries must match the matrix dimensions."
        );
        Self {
            nrows,
            ncols,
            values: entries.to_vec(),
        }
    }

    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let values = (0..nrows)
            .flat_map(|i| (0..ncols).map(move |j| (i, j)))
            .map(|(i, j)| f(i, j))
            .collect();
        Self { nrows, ncols, values }
    }

    /// Resizes the matrix and sets all entries to zero.
    pub fn reinit(&mut self, nrows: usize, ncols: usize) {
        self.nrows = nrows;
        self.ncols = ncols;
        self.values.clear();
        self.values.resize(nrows * ncols, T::zero());
    }

    pub fn fill_zero(&mut self) {
        self.values.fill(T::zero());
    }

    /// Assigns the entries of a matrix of a possibly different scalar type.
    ///
    /// Panics if the dimensions do not match.
    pub fn copy_from<U>(&mut self, other: &FullMatrix<U>)
    where
        U: Copy,
        T: SupersetOf<U>,
    {
        self.assert_same_shape(other);
        for (dst, src) in self.values.iter_mut().zip(&other.values) {
            *dst = convert_ref::<U, T>(src);
        }
    }

    /// Returns a copy converted to another scalar type.
    pub fn cast<U>(&self) -> FullMatrix<U>
    where
        U: Number + SupersetOf<T>,
    {
        FullMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            values: self.values.iter().map(convert_ref::<T, U>).collect(),
        }
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }

    /// Returns `true` if all entries are zero.
    pub fn all_zero(&self) -> bool {
        self.assert_not_empty();
        self.values.iter().all(|x| x.is_zero())
    }

    /// Multiplies all entries by `factor`.
    pub fn scale(&mut self, factor: T) {
        self.assert_not_empty();
        for x in &mut self.values {
            *x *= factor;
        }
    }

    /// Divides all entries by `factor`.
    ///
    /// The division is carried out as a multiplication with the reciprocal.
    pub fn div_scale(&mut self, factor: T) {
        self.assert_not_empty();
        let inverse = T::one() / factor;
        assert!(inverse.is_finite(), "Division by {} produced a non-finite factor.", factor);
        self.scale(inverse);
    }

    /// `self = a * m`.
    pub fn equ<U>(&mut self, a: T, m: &FullMatrix<U>)
    where
        U: Copy,
        T: SupersetOf<U>,
    {
        self.assert_not_empty();
        self.assert_same_shape(m);
        for (x, &mij) in self.values.iter_mut().zip(&m.values) {
            *x = a * convert_ref::<U, T>(&mij);
        }
    }

    /// `self = a * m + b * n`.
    pub fn equ2<U>(&mut self, a: T, m: &FullMatrix<U>, b: T, n: &FullMatrix<U>)
    where
        U: Copy,
        T: SupersetOf<U>,
    {
        self.assert_not_empty();
        self.assert_same_shape(m);
        self.assert_same_shape(n);
        for (x, mij, nij) in izip!(&mut self.values, &m.values, &n.values) {
            *x = a * convert_ref::<U, T>(mij) + b * convert_ref::<U, T>(nij);
        }
    }

    /// `self = a * m + b * n + c * o`.
    pub fn equ3<U>(&mut self, a: T, m: &FullMatrix<U>, b: T, n: &FullMatrix<U>, c: T, o: &FullMatrix<U>)
    where
        U: Copy,
        T: SupersetOf<U>,
    {
        self.assert_not_empty();
        self.assert_same_shape(m);
        self.assert_same_shape(n);
        self.assert_same_shape(o);
        for (x, mij, nij, oij) in izip!(&mut self.values, &m.values, &n.values, &o.values) {
            *x = a * convert_ref::<U, T>(mij) + b * convert_ref::<U, T>(nij) + c * convert_ref::<U, T>(oij);
        }
    }

    /// `self += a * m`.
    pub fn add_scaled<U>(&mut self, a: T, m: &FullMatrix<U>)
    where
        U: Copy,
        T: SupersetOf<U>,
    {
        self.assert_not_empty();
        self.assert_same_shape(m);
        for (x, mij) in self.values.iter_mut().zip(&m.values) {
            *x += a * convert_ref::<U, T>(mij);
        }
    }

    /// `self += a * m + b * n`.
    pub fn add2<U>(&mut self, a: T, m: &FullMatrix<U>, b: T, n: &FullMatrix<U>)
    where
        U: Copy,
        T: SupersetOf<U>,
    {
        self.assert_not_empty();
        self.assert_same_shape(m);
        self.assert_same_shape(n);
        for (x, mij, nij) in izip!(&mut self.values, &m.values, &n.values) {
            *x += a * convert_ref::<U, T>(mij) + b * convert_ref::<U, T>(nij);
        }
    }

    /// `self += a * m + b * n + c * o`.
    pub fn add3<U>(&mut self, a: T, m: &FullMatrix<U>, b: T, n: &FullMatrix<U>, c: T, o: &FullMatrix<U>)
    where
        U: Copy,
        T: SupersetOf<U>,
    {
        self.assert_not_empty();
        self.assert_same_shape(m);
        self.assert_same_shape(n);
        self.assert_same_shape(o);
        for (x, mij, nij, oij) in izip!(&mut self.values, &m.values, &n.values, &o.values) {
            *x += a * convert_ref::<U, T>(mij) + b * convert_ref::<U, T>(nij) + c * convert_ref::<U, T>(oij);
        }
    }

    /// Adds `factor` times a block of `src` into a block of `self`.
    ///
    /// The block starts at `src_offset` in `src` and at `dst_offset` in `self`, and extends as far
    /// as both matrices allow.
    pub fn add_block(&mut self, src: &FullMatrix<T>, factor: T, dst_offset: (usize, usize), src_offset: (usize, usize)) {
        let (doi, doj) = dst_offset;
        let (soi, soj) = src_offset;
        let rows = self.nrows.saturating_sub(doi).min(src.nrows.saturating_sub(soi));
        let cols = self.ncols.saturating_sub(doj).min(src.ncols.saturating_sub(soj));
        for i in 0..rows {
            for j in 0..cols {
                self[(doi + i, doj + j)] += factor * src[(soi + i, soj + j)];
            }
        }
    }

    /// Adds `factor` times a block of `src^T` into a block of `self`.
    ///
    /// Entry `(dst_offset.0 + i, dst_offset.1 + j)` receives `src(src_offset.0 + j, src_offset.1 + i)`.
    pub fn tadd_block(
        &mut self,
        src: &FullMatrix<T>,
        factor: T,
        dst_offset: (usize, usize),
        src_offset: (usize, usize),
    ) {
        let (doi, doj) = dst_offset;
        let (soi, soj) = src_offset;
        let rows = self.nrows.saturating_sub(doi).min(src.ncols.saturating_sub(soj));
        let cols = self.ncols.saturating_sub(doj).min(src.nrows.saturating_sub(soi));
        for i in 0..rows {
            for j in 0..cols {
                self[(doi + i, doj + j)] += factor * src[(soi + j, soj + i)];
            }
        }
    }

    /// `self += a * src^T` for square matrices of equal size.
    pub fn tadd(&mut self, a: T, src: &FullMatrix<T>) {
        self.assert_not_empty();
        self.assert_square();
        self.assert_same_shape(src);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                self[(i, j)] += a * src[(j, i)];
            }
        }
    }

    /// Copies a block of `src` into `self`, clipped to the overlap of both matrices.
    pub fn fill(&mut self, src: &FullMatrix<T>, dst_offset: (usize, usize), src_offset: (usize, usize)) {
        let (doi, doj) = dst_offset;
        let (soi, soj) = src_offset;
        assert!(doi <= self.nrows && doj <= self.ncols, "Destination offset out of bounds.");
        assert!(soi <= src.nrows && soj <= src.ncols, "Source offset out of bounds.");
        let rows = (self.nrows - doi).min(src.nrows - soi);
        let cols = (self.ncols - doj).min(src.ncols - soj);
        for i in 0..rows {
            let src_row = &src.row(soi + i)[soj..soj + cols];
            self.row_mut(doi + i)[doj..doj + cols].copy_from_slice(src_row);
        }
    }

    /// Sets `self(i, j) = src(p_rows[i], p_cols[j])`.
    pub fn fill_permutation(&mut self, src: &FullMatrix<T>, p_rows: &[usize], p_cols: &[usize]) {
        assert_eq!(p_rows.len(), self.nrows, "Row permutation must have one entry per row.");
        assert_eq!(p_cols.len(), self.ncols, "Column permutation must have one entry per column.");
        for (i, &pi) in p_rows.iter().enumerate() {
            for (j, &pj) in p_cols.iter().enumerate() {
                self[(i, j)] = src[(pi, pj)];
            }
        }
    }

    /// Adds `s` times row `j` to row `i`.
    pub fn add_row(&mut self, i: usize, s: T, j: usize) {
        self.assert_not_empty();
        for k in 0..self.ncols {
            let v = self[(j, k)];
            self[(i, k)] += s * v;
        }
    }

    /// Adds `s` times row `j` and `t` times row `k` to row `i`.
    pub fn add_row2(&mut self, i: usize, s: T, j: usize, t: T, k: usize) {
        self.assert_not_empty();
        for l in 0..self.ncols {
            let v = s * self[(j, l)] + t * self[(k, l)];
            self[(i, l)] += v;
        }
    }

    /// Adds `s` times column `j` to column `i`.
    pub fn add_col(&mut self, i: usize, s: T, j: usize) {
        self.assert_not_empty();
        for k in 0..self.nrows {
            let v = self[(k, j)];
            self[(k, i)] += s * v;
        }
    }

    /// Adds `s` times column `j` and `t` times column `k` to column `i`.
    pub fn add_col2(&mut self, i: usize, s: T, j: usize, t: T, k: usize) {
        self.assert_not_empty();
        for l in 0..self.nrows {
            let v = s * self[(l, j)] + t * self[(l, k)];
            self[(l, i)] += v;
        }
    }

    pub fn swap_row(&mut self, i: usize, j: usize) {
        self.assert_not_empty();
        if i == j {
            return;
        }
        for k in 0..self.ncols {
            let (a, b) = (self.linear_index(i, k), self.linear_index(j, k));
            self.values.swap(a, b);
        }
    }

    pub fn swap_col(&mut self, i: usize, j: usize) {
        self.assert_not_empty();
        if i == j {
            return;
        }
        for k in 0..self.nrows {
            let (a, b) = (self.linear_index(k, i), self.linear_index(k, j));
            self.values.swap(a, b);
        }
    }

    /// Adds `s` to every diagonal entry of a square matrix.
    pub fn diagadd(&mut self, s: T) {
        self.assert_not_empty();
        self.assert_square();
        for i in 0..self.nrows {
            self[(i, i)] += s;
        }
    }

    /// Replaces the matrix by its symmetric part `(A + A^T) / 2`.
    #[replace_float_literals(T::from_f64(literal).unwrap())]
    pub fn symmetrize(&mut self) {
        self.assert_not_empty();
        self.assert_square();
        for i in 0..self.nrows {
            for j in 0..i {
                let t = (self[(i, j)] + self[(j, i)]) * 0.5;
                self[(i, j)] = t;
                self[(j, i)] = t;
            }
        }
    }

    /// Sets `self = v w^T`.
    pub fn outer_product<'a, 'b>(&mut self, v: impl Into<DVectorView<'a, T>>, w: impl Into<DVectorView<'b, T>>) {
        let v = v.into();
        let w = w.into();
        assert_eq!(v.len(), self.nrows, "Dimension mismatch between v and number of rows.");
        assert_eq!(w.len(), self.ncols, "Dimension mismatch between w and number of columns.");
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                self[(i, j)] = v[i] * w[j];
            }
        }
    }

    /// Jacobi preconditioning: `dst = omega * src ./ diag(self)`.
    pub fn precondition_jacobi<'a, 'b>(
        &self,
        dst: impl Into<DVectorViewMut<'a, T>>,
        src: impl Into<DVectorView<'b, T>>,
        omega: T,
    ) {
        self.assert_square();
        let mut dst = dst.into();
        let src = src.into();
        assert_eq!(dst.len(), self.nrows, "Dimension mismatch between dst and matrix.");
        assert_eq!(src.len(), self.ncols, "Dimension mismatch between src and matrix.");
        for i in 0..self.nrows {
            dst[i] = omega * src[i] / self[(i, i)];
        }
    }

    pub fn trace(&self) -> T {
        self.assert_not_empty();
        self.assert_square();
        (0..self.nrows).fold(T::zero(), |acc, i| acc + self[(i, i)])
    }

    /// `v^H A v`. The left vector is conjugated for complex scalars.
    pub fn matrix_norm_square<'a>(&self, v: impl Into<DVectorView<'a, T>>) -> T {
        self.assert_not_empty();
        self.assert_square();
        let v = v.into();
        assert_eq!(v.len(), self.nrows, "Dimension mismatch between v and matrix.");
        let mut sum = T::zero();
        for i in 0..self.nrows {
            let av_i = izip!(self.row(i), v.iter()).fold(T::zero(), |acc, (&a, &vj)| acc + a * vj);
            sum += v[i].conjugate() * av_i;
        }
        sum
    }

    /// `u^T A v`.
    pub fn matrix_scalar_product<'a, 'b>(&self, u: impl Into<DVectorView<'a, T>>, v: impl Into<DVectorView<'b, T>>) -> T {
        self.assert_not_empty();
        let u = u.into();
        let v = v.into();
        assert_eq!(u.len(), self.nrows, "Dimension mismatch between u and number of rows.");
        assert_eq!(v.len(), self.ncols, "Dimension mismatch between v and number of columns.");
        let mut sum = T::zero();
        for i in 0..self.nrows {
            let av_i = izip!(self.row(i), v.iter()).fold(T::zero(), |acc, (&a, &vj)| acc + a * vj);
            sum += u[i] * av_i;
        }
        sum
    }

    /// Maximum absolute column sum.
    pub fn l1_norm(&self) -> T::RealField {
        self.assert_not_empty();
        let mut max = T::RealField::zero();
        for j in 0..self.ncols {
            let col_sum = (0..self.nrows).fold(T::RealField::zero(), |acc, i| acc + self[(i, j)].modulus());
            if col_sum > max {
                max = col_sum;
            }
        }
        max
    }

    /// Maximum absolute row sum.
    pub fn linfty_norm(&self) -> T::RealField {
        self.assert_not_empty();
        let mut max = T::RealField::zero();
        for i in 0..self.nrows {
            let row_sum = self
                .row(i)
                .iter()
                .fold(T::RealField::zero(), |acc, x| acc + x.modulus());
            if row_sum > max {
                max = row_sum;
            }
        }
        max
    }

    pub fn frobenius_norm(&self) -> T::RealField {
        self.assert_not_empty();
        self.values
            .iter()
            .fold(T::RealField::zero(), |acc, x| acc + x.modulus_squared())
            .sqrt()
    }

    /// `|A - A^T|_F / |A|_F`, or zero for the zero matrix.
    ///
    /// The diagonal only enters through the scaling.
    #[replace_float_literals(T::RealField::from_f64(literal).unwrap())]
    pub fn relative_symmetry_norm2(&self) -> T::RealField {
        self.assert_not_empty();
        self.assert_square();
        let mut s = 0.0;
        let mut a = 0.0;
        for i in 0..self.nrows {
            for j in 0..i {
                let (x_ij, x_ji) = (self[(i, j)], self[(j, i)]);
                a += x_ij.modulus_squared() + x_ji.modulus_squared();
                // (i, j) and (j, i) contribute the same difference
                s += 2.0 * (x_ij - x_ji).modulus_squared();
            }
            a += self[(i, i)].modulus_squared();
        }
        if s != 0.0 {
            s.sqrt() / a.sqrt()
        } else {
            0.0
        }
    }
}

impl<T: Number> MulAssign<T> for FullMatrix<T> {
    fn mul_assign(&mut self, factor: T) {
        self.scale(factor);
    }
}

impl<T: Number> DivAssign<T> for FullMatrix<T> {
    fn div_assign(&mut self, factor: T) {
        self.div_scale(factor);
    }
}

impl<'a, T: Number> From<&'a FullMatrix<T>> for DMatrix<T> {
    fn from(matrix: &'a FullMatrix<T>) -> Self {
        DMatrix::from_row_slice(matrix.nrows, matrix.ncols, &matrix.values)
    }
}

impl<'a, T: Number> From<&'a DMatrix<T>> for FullMatrix<T> {
    fn from(matrix: &'a DMatrix<T>) -> Self {
        FullMatrix::from_fn(matrix.nrows(), matrix.ncols(), |i, j| matrix[(i, j)])
    }
}
