//! Selection between the native kernels and nalgebra's optimized GEMM and LU kernels.
use super::{FullMatrix, MatrixError, Op};
use crate::Number;
use log::debug;
use nalgebra::{DMatrix, DMatrixViewMut, Dyn, MatrixView};
use serde::{Deserialize, Serialize};
use std::any::TypeId;

/// Largest dimension handed to the optimized kernels, matching the 32-bit integers of LP64 BLAS.
const MAX_BLAS_INT: usize = i32::MAX as usize;

/// The kernel that carries out an operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Straightforward loops, available for every scalar type.
    Native,
    /// nalgebra's cache-blocked GEMM or LU kernels, only for `f32` and `f64`.
    Accelerated,
}

/// Settings that decide when products and inversions use the accelerated kernels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPolicy {
    /// Whether the accelerated kernels may be used at all.
    pub accelerate: bool,
    /// Products with more than this many multiply-add operations (`m * n * k`) are accelerated.
    pub gemm_threshold: usize,
    /// Gauss-Jordan inversion of matrices larger than this is carried out by LU decomposition.
    pub inversion_threshold: usize,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            accelerate: cfg!(feature = "accelerate"),
            gemm_threshold: 300,
            inversion_threshold: 15,
        }
    }
}

impl DispatchPolicy {
    /// A policy that always uses the native kernels.
    pub fn native() -> Self {
        Self {
            accelerate: false,
            ..Self::default()
        }
    }

    /// A policy that accelerates every eligible operation, regardless of size.
    pub fn always_accelerate() -> Self {
        Self {
            accelerate: true,
            gemm_threshold: 0,
            inversion_threshold: 0,
        }
    }

    /// Chooses the kernel for an `m x k` times `k x n` product.
    pub fn product_strategy<T: 'static>(&self, m: usize, n: usize, k: usize) -> Strategy {
        let fits = m <= MAX_BLAS_INT && n <= MAX_BLAS_INT && k <= MAX_BLAS_INT;
        let operations = m.saturating_mul(n).saturating_mul(k);
        if self.accelerate && has_accelerated_kernels::<T>() && fits && operations > self.gemm_threshold {
            Strategy::Accelerated
        } else {
            Strategy::Native
        }
    }

    /// Chooses the kernel for the in-place inversion of an `n x n` matrix.
    pub fn inversion_strategy<T: 'static>(&self, n: usize) -> Strategy {
        if self.accelerate && has_accelerated_kernels::<T>() && n <= MAX_BLAS_INT && n > self.inversion_threshold {
            Strategy::Accelerated
        } else {
            Strategy::Native
        }
    }
}

/// Whether `T` is one of the real floating point types served by the optimized kernels.
pub(crate) fn has_accelerated_kernels<T: 'static>() -> bool {
    let id = TypeId::of::<T>();
    id == TypeId::of::<f64>() || id == TypeId::of::<f32>()
}

/// Describes `op(matrix)` to nalgebra without moving any data.
///
/// A row-major `m x n` buffer is a matrix with row stride `n` and column stride `1`. Its
/// transpose is the same buffer read with the strides exchanged.
fn strided_view<'a, T: Number>(op: Op<&'a FullMatrix<T>>) -> MatrixView<'a, T, Dyn, Dyn, Dyn, Dyn> {
    let (matrix, transposed) = match op {
        Op::NoOp(matrix) => (matrix, false),
        Op::Transpose(matrix) => (matrix, true),
    };
    let (m, n) = (matrix.nrows(), matrix.ncols());
    if transposed {
        MatrixView::from_slice_with_strides_generic(matrix.as_slice(), Dyn(n), Dyn(m), Dyn(1), Dyn(n))
    } else {
        MatrixView::from_slice_with_strides_generic(matrix.as_slice(), Dyn(m), Dyn(n), Dyn(n), Dyn(1))
    }
}

/// `dst = op(a) op(b)`, or `dst += op(a) op(b)` when adding, with nalgebra's GEMM.
///
/// The row-major destination read in column-major order is `C^T`, so the kernel computes
/// `C^T = op(b)^T op(a)^T` and the result lands in row-major order without a transposition.
pub(crate) fn gemm<T: Number>(dst: &mut FullMatrix<T>, a: Op<&FullMatrix<T>>, b: Op<&FullMatrix<T>>, adding: bool) {
    let (m, n) = (dst.nrows(), dst.ncols());
    debug!("Dispatching {}x{} dense product to the GEMM kernel", m, n);
    let a_t = strided_view(a.transposed());
    let b_t = strided_view(b.transposed());
    let mut c_t = DMatrixViewMut::from_slice(dst.as_mut_slice(), n, m);
    let beta = if adding { T::one() } else { T::zero() };
    c_t.gemm(T::one(), &b_t, &a_t, beta);
}

/// Inverts the row-major `n x n` buffer in place by LU decomposition.
///
/// The buffer read in column-major order is the transpose `A^T`, and the column-major inverse of
/// `A^T` is `A^{-1}` in row-major order, so no explicit transposition is needed.
pub(crate) fn lu_invert_in_place<T: Number>(matrix: &mut FullMatrix<T>) -> Result<(), MatrixError> {
    let n = matrix.nrows();
    debug!("Inverting {}x{} matrix by LU decomposition", n, n);
    let transposed = DMatrix::from_column_slice(n, n, matrix.as_slice());
    let inverse = transposed.try_inverse().ok_or(MatrixError::Singular)?;
    matrix.as_mut_slice().copy_from_slice(inverse.as_slice());
    Ok(())
}

/// Determinant by LU decomposition, available for `f32` and `f64`.
pub(crate) fn lu_determinant<T: Number>(matrix: &FullMatrix<T>) -> Result<T, MatrixError> {
    if !has_accelerated_kernels::<T>() {
        return Err(MatrixError::NotImplemented(
            "determinant of matrices larger than 3x3 for this scalar type",
        ));
    }
    let n = matrix.nrows();
    debug!("Computing determinant of {}x{} matrix by LU decomposition", n, n);
    // det(A^T) = det(A)
    let transposed = DMatrix::from_column_slice(n, n, matrix.as_slice());
    Ok(transposed.lu().determinant())
}
