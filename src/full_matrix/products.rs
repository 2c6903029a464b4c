use super::backend::{gemm, DispatchPolicy, Strategy};
use super::FullMatrix;
use crate::Number;
use itertools::izip;
use nalgebra::{DVectorView, DVectorViewMut};
use num::Zero;
use nalgebra::ComplexField;
use std::ptr;

/// An operand that is used either as-is or transposed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Op<T> {
    NoOp(T),
    Transpose(T),
}

impl<T> Op<T> {
    pub fn inner(&self) -> &T {
        match self {
            Op::NoOp(x) | Op::Transpose(x) => x,
        }
    }

    pub fn is_transposed(&self) -> bool {
        matches!(self, Op::Transpose(_))
    }

    /// The transpose of the operand.
    pub fn transposed(self) -> Self {
        match self {
            Op::NoOp(x) => Op::Transpose(x),
            Op::Transpose(x) => Op::NoOp(x),
        }
    }
}

impl<'a, T> Op<&'a FullMatrix<T>> {
    /// Dimensions `(rows, cols)` of the operand after applying the operation.
    fn shape(&self) -> (usize, usize) {
        match self {
            Op::NoOp(m) => (m.nrows(), m.ncols()),
            Op::Transpose(m) => (m.ncols(), m.nrows()),
        }
    }
}

impl<'a, T: Copy> Op<&'a FullMatrix<T>> {
    #[inline]
    fn entry(&self, i: usize, j: usize) -> T {
        match self {
            Op::NoOp(m) => m[(i, j)],
            Op::Transpose(m) => m[(j, i)],
        }
    }
}

impl<T: Number> FullMatrix<T> {
    /// `dst = A src`, or `dst += A src` when adding.
    pub fn vmult<'a, 'b>(&self, dst: impl Into<DVectorViewMut<'a, T>>, src: impl Into<DVectorView<'b, T>>, adding: bool) {
        self.assert_not_empty();
        let mut dst = dst.into();
        let src = src.into();
        assert_eq!(dst.len(), self.nrows(), "Dimension mismatch between dst and number of rows.");
        assert_eq!(src.len(), self.ncols(), "Dimension mismatch between src and number of columns.");
        for i in 0..self.nrows() {
            let s = izip!(self.row(i), src.iter()).fold(T::zero(), |acc, (&a, &x)| acc + a * x);
            if adding {
                dst[i] += s;
            } else {
                dst[i] = s;
            }
        }
    }

    /// `dst = A^T src`, or `dst += A^T src` when adding.
    pub fn tr_vmult<'a, 'b>(&self, dst: impl Into<DVectorViewMut<'a, T>>, src: impl Into<DVectorView<'b, T>>, adding: bool) {
        self.assert_not_empty();
        let mut dst = dst.into();
        let src = src.into();
        assert_eq!(dst.len(), self.ncols(), "Dimension mismatch between dst and number of columns.");
        assert_eq!(src.len(), self.nrows(), "Dimension mismatch between src and number of rows.");
        if !adding {
            dst.fill(T::zero());
        }
        for i in 0..self.nrows() {
            let x = src[i];
            for (j, &a) in self.row(i).iter().enumerate() {
                dst[j] += a * x;
            }
        }
    }

    /// `dst = rhs - A src`. Returns the Euclidean norm of the residual.
    pub fn residual<'a, 'b, 'c>(
        &self,
        dst: impl Into<DVectorViewMut<'a, T>>,
        src: impl Into<DVectorView<'b, T>>,
        rhs: impl Into<DVectorView<'c, T>>,
    ) -> T::RealField {
        self.assert_not_empty();
        let mut dst = dst.into();
        let src = src.into();
        let rhs = rhs.into();
        assert_eq!(dst.len(), self.nrows(), "Dimension mismatch between dst and number of rows.");
        assert_eq!(src.len(), self.ncols(), "Dimension mismatch between src and number of columns.");
        assert_eq!(rhs.len(), self.nrows(), "Dimension mismatch between rhs and number of rows.");
        let mut norm_squared = T::RealField::zero();
        for i in 0..self.nrows() {
            let s = izip!(self.row(i), src.iter()).fold(rhs[i], |acc, (&a, &x)| acc - a * x);
            dst[i] = s;
            norm_squared += s.modulus_squared();
        }
        norm_squared.sqrt()
    }

    /// Forward substitution with the lower triangle: solves `L dst = src`.
    ///
    /// Only the first `min(m, n)` unknowns are computed. The diagonal is assumed to be non-zero.
    pub fn forward<'a, 'b>(&self, dst: impl Into<DVectorViewMut<'a, T>>, src: impl Into<DVectorView<'b, T>>) {
        self.assert_not_empty();
        let mut dst = dst.into();
        let src = src.into();
        assert_eq!(dst.len(), self.ncols(), "Dimension mismatch between dst and number of columns.");
        assert_eq!(src.len(), self.nrows(), "Dimension mismatch between src and number of rows.");
        let nu = self.nrows().min(self.ncols());
        for i in 0..nu {
            let mut s = src[i];
            for j in 0..i {
                s -= dst[j] * self[(i, j)];
            }
            dst[i] = s / self[(i, i)];
            debug_assert!(dst[i].is_finite(), "Forward substitution produced a non-finite value.");
        }
    }

    /// Backward substitution with the upper triangle: solves `U dst = src`.
    pub fn backward<'a, 'b>(&self, dst: impl Into<DVectorViewMut<'a, T>>, src: impl Into<DVectorView<'b, T>>) {
        self.assert_not_empty();
        let mut dst = dst.into();
        let src = src.into();
        assert_eq!(dst.len(), self.ncols(), "Dimension mismatch between dst and number of columns.");
        assert_eq!(src.len(), self.nrows(), "Dimension mismatch between src and number of rows.");
        let nu = self.nrows().min(self.ncols());
        for i in (0..nu).rev() {
            let mut s = src[i];
            for j in i + 1..nu {
                s -= dst[j] * self[(i, j)];
            }
            dst[i] = s / self[(i, i)];
            debug_assert!(dst[i].is_finite(), "Backward substitution produced a non-finite value.");
        }
    }

    /// `dst = op(a) op(b)`, or `dst += op(a) op(b)` when adding.
    ///
    /// The products `A^T A` and `A A^T` are recognized when both operands are the same matrix,
    /// and only their upper triangle is computed by the native kernel.
    pub fn gemm_with_policy(
        dst: &mut FullMatrix<T>,
        a: Op<&FullMatrix<T>>,
        b: Op<&FullMatrix<T>>,
        adding: bool,
        policy: &DispatchPolicy,
    ) {
        let (m, k) = a.shape();
        let (k_b, n) = b.shape();
        assert!(!a.inner().is_empty() && !b.inner().is_empty(), "Operands must not be empty.");
        assert_eq!(k, k_b, "Inner dimensions of the product must agree.");
        assert_eq!(
            (dst.nrows(), dst.ncols()),
            (m, n),
            "Destination must have the dimensions of the product."
        );

        match policy.product_strategy::<T>(m, n, k) {
            Strategy::Accelerated => gemm(dst, a, b, adding),
            Strategy::Native => {
                let self_product = ptr::eq(*a.inner(), *b.inner()) && a.is_transposed() != b.is_transposed();
                if self_product {
                    native_symmetric_product(dst, a, b, adding);
                } else {
                    native_product(dst, a, b, adding);
                }
            }
        }
    }

    /// `dst = A B`, or `dst += A B` when adding.
    pub fn mmult(&self, dst: &mut FullMatrix<T>, src: &FullMatrix<T>, adding: bool) {
        self.mmult_with_policy(dst, src, adding, &DispatchPolicy::default());
    }

    pub fn mmult_with_policy(&self, dst: &mut FullMatrix<T>, src: &FullMatrix<T>, adding: bool, policy: &DispatchPolicy) {
        Self::gemm_with_policy(dst, Op::NoOp(self), Op::NoOp(src), adding, policy);
    }

    /// `dst = A^T B`, or `dst += A^T B` when adding.
    ///
    /// Passing the receiver as `src` computes the symmetric product `A^T A`.
    pub fn tr_mmult(&self, dst: &mut FullMatrix<T>, src: &FullMatrix<T>, adding: bool) {
        self.tr_mmult_with_policy(dst, src, adding, &DispatchPolicy::default());
    }

    pub fn tr_mmult_with_policy(&self, dst: &mut FullMatrix<T>, src: &FullMatrix<T>, adding: bool, policy: &DispatchPolicy) {
        Self::gemm_with_policy(dst, Op::Transpose(self), Op::NoOp(src), adding, policy);
    }

    /// `dst = A B^T`, or `dst += A B^T` when adding.
    ///
    /// Passing the receiver as `src` computes the symmetric product `A A^T`.
    pub fn mmult_tr(&self, dst: &mut FullMatrix<T>, src: &FullMatrix<T>, adding: bool) {
        self.mmult_tr_with_policy(dst, src, adding, &DispatchPolicy::default());
    }

    pub fn mmult_tr_with_policy(&self, dst: &mut FullMatrix<T>, src: &FullMatrix<T>, adding: bool, policy: &DispatchPolicy) {
        Self::gemm_with_policy(dst, Op::NoOp(self), Op::Transpose(src), adding, policy);
    }

    /// `dst = A^T B^T`, or `dst += A^T B^T` when adding.
    pub fn tr_mmult_tr(&self, dst: &mut FullMatrix<T>, src: &FullMatrix<T>, adding: bool) {
        self.tr_mmult_tr_with_policy(dst, src, adding, &DispatchPolicy::default());
    }

    pub fn tr_mmult_tr_with_policy(
        &self,
        dst: &mut FullMatrix<T>,
        src: &FullMatrix<T>,
        adding: bool,
        policy: &DispatchPolicy,
    ) {
        Self::gemm_with_policy(dst, Op::Transpose(self), Op::Transpose(src), adding, policy);
    }

    /// `self += scaling * op(B) A op(D)`, where `op` transposes when the corresponding flag is set.
    ///
    /// The receiver is the "outer" matrix of a Galerkin product; `A` need not be square.
    pub fn triple_product(
        &mut self,
        a: &FullMatrix<T>,
        b: &FullMatrix<T>,
        d: &FullMatrix<T>,
        transpose_b: bool,
        transpose_d: bool,
        scaling: T,
    ) {
        let b = if transpose_b { Op::Transpose(b) } else { Op::NoOp(b) };
        let d = if transpose_d { Op::Transpose(d) } else { Op::NoOp(d) };
        let (b_rows, b_cols) = b.shape();
        let (d_rows, d_cols) = d.shape();
        assert_eq!(b_cols, a.nrows(), "Dimension mismatch between B and A.");
        assert_eq!(a.ncols(), d_rows, "Dimension mismatch between A and D.");
        assert_eq!(
            (self.nrows(), self.ncols()),
            (b_rows, d_cols),
            "Receiver must have the dimensions of the triple product."
        );

        // Form the smaller of the two intermediate products
        if a.nrows() * d_cols < b_rows * a.ncols() {
            let mut ad = FullMatrix::zeros(a.nrows(), d_cols);
            Self::gemm_with_policy(&mut ad, Op::NoOp(a), d, false, &DispatchPolicy::default());
            for i in 0..self.nrows() {
                for j in 0..self.ncols() {
                    let s = (0..a.nrows()).fold(T::zero(), |acc, k| acc + b.entry(i, k) * ad[(k, j)]);
                    self[(i, j)] += scaling * s;
                }
            }
        } else {
            let mut ba = FullMatrix::zeros(b_rows, a.ncols());
            Self::gemm_with_policy(&mut ba, b, Op::NoOp(a), false, &DispatchPolicy::default());
            for i in 0..self.nrows() {
                for j in 0..self.ncols() {
                    let s = (0..a.ncols()).fold(T::zero(), |acc, k| acc + ba[(i, k)] * d.entry(k, j));
                    self[(i, j)] += scaling * s;
                }
            }
        }
    }

    /// Kronecker product `A ⊗ B`.
    ///
    /// Without `adding` the receiver is resized to `(m_A m_B) x (n_A n_B)`; otherwise it must
    /// already have that size and the product is accumulated.
    pub fn kronecker_product(&mut self, a: &FullMatrix<T>, b: &FullMatrix<T>, adding: bool) {
        assert!(!a.is_empty() && !b.is_empty(), "Operands must not be empty.");
        let (m, n) = (a.nrows() * b.nrows(), a.ncols() * b.ncols());
        if adding {
            assert_eq!(
                (self.nrows(), self.ncols()),
                (m, n),
                "Receiver must have the dimensions of the Kronecker product."
            );
        } else {
            self.reinit(m, n);
        }
        for i in 0..a.nrows() {
            for j in 0..a.ncols() {
                let a_ij = a[(i, j)];
                for k in 0..b.nrows() {
                    for l in 0..b.ncols() {
                        self[(i * b.nrows() + k, j * b.ncols() + l)] += a_ij * b[(k, l)];
                    }
                }
            }
        }
    }
}

fn native_product<T: Number>(dst: &mut FullMatrix<T>, a: Op<&FullMatrix<T>>, b: Op<&FullMatrix<T>>, adding: bool) {
    let (m, k) = a.shape();
    let n = dst.ncols();
    for i in 0..m {
        for j in 0..n {
            let s = (0..k).fold(T::zero(), |acc, l| acc + a.entry(i, l) * b.entry(l, j));
            if adding {
                dst[(i, j)] += s;
            } else {
                dst[(i, j)] = s;
            }
        }
    }
}

/// `A^T A` or `A A^T`: computes the upper triangle and mirrors it.
fn native_symmetric_product<T: Number>(
    dst: &mut FullMatrix<T>,
    a: Op<&FullMatrix<T>>,
    b: Op<&FullMatrix<T>>,
    adding: bool,
) {
    let (n, k) = a.shape();
    for i in 0..n {
        for j in i..n {
            let s = (0..k).fold(T::zero(), |acc, l| acc + a.entry(i, l) * b.entry(l, j));
            if adding {
                dst[(i, j)] += s;
                if i != j {
                    dst[(j, i)] += s;
                }
            } else {
                dst[(i, j)] = s;
                dst[(j, i)] = s;
            }
        }
    }
}
