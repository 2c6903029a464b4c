use super::backend::{lu_determinant, lu_invert_in_place, DispatchPolicy, Strategy};
use super::{FullMatrix, MatrixError};
use crate::Number;
use log::debug;
use nalgebra::convert;
use num::Zero;
use num::FromPrimitive;
use numeric_literals::replace_float_literals;

/// Largest relative asymmetry accepted by the Cholesky decomposition.
const CHOLESKY_SYMMETRY_TOLERANCE: f64 = 1e-10;

impl<T: Number> FullMatrix<T> {
    /// Determinant of a square matrix.
    ///
    /// Sizes up to 3 use the closed-form expansion. Larger matrices are factored by LU
    /// decomposition, which is only available for `f32` and `f64`.
    pub fn determinant(&self) -> Result<T, MatrixError> {
        self.assert_not_empty();
        self.assert_square();
        let a = |i, j| self[(i, j)];
        match self.nrows() {
            1 => Ok(a(0, 0)),
            2 => Ok(a(0, 0) * a(1, 1) - a(1, 0) * a(0, 1)),
            3 => Ok(a(0, 0) * a(1, 1) * a(2, 2) - a(0, 0) * a(1, 2) * a(2, 1) - a(1, 0) * a(0, 1) * a(2, 2)
                + a(1, 0) * a(0, 2) * a(2, 1)
                + a(2, 0) * a(0, 1) * a(1, 2)
                - a(2, 0) * a(0, 2) * a(1, 1)),
            _ => lu_determinant(self),
        }
    }

    /// Sets the receiver to the inverse of `m`.
    ///
    /// Matrices up to size 4 are inverted with closed-form cofactor formulas, larger ones by
    /// Gauss-Jordan elimination. The receiver must be square with the dimensions of `m`.
    pub fn invert(&mut self, m: &FullMatrix<T>) -> Result<(), MatrixError> {
        self.invert_with_policy(m, &DispatchPolicy::default())
    }

    pub fn invert_with_policy(&mut self, m: &FullMatrix<T>, policy: &DispatchPolicy) -> Result<(), MatrixError> {
        self.assert_not_empty();
        self.assert_square();
        self.assert_same_shape(m);

        match self.nrows() {
            1 => {
                let m00 = m[(0, 0)];
                if m00.is_zero() {
                    return Err(MatrixError::Singular);
                }
                self[(0, 0)] = T::one() / m00;
                Ok(())
            }
            2 => self.invert_2x2(m),
            3 => self.invert_3x3(m),
            4 => self.invert_4x4(m),
            _ => {
                self.as_mut_slice().copy_from_slice(m.as_slice());
                self.gauss_jordan_with_policy(policy)
            }
        }
    }

    /// Inverts the matrix in place.
    pub fn invert_in_place(&mut self) -> Result<(), MatrixError> {
        if self.nrows() <= 4 {
            let m = self.clone();
            self.invert(&m)
        } else {
            self.gauss_jordan()
        }
    }

    fn invert_2x2(&mut self, m: &FullMatrix<T>) -> Result<(), MatrixError> {
        let (m00, m01, m10, m11) = (m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]);
        let det = m00 * m11 - m01 * m10;
        if det.is_zero() {
            return Err(MatrixError::Singular);
        }
        let t4 = T::one() / det;
        self[(0, 0)] = m11 * t4;
        self[(0, 1)] = -m01 * t4;
        self[(1, 0)] = -m10 * t4;
        self[(1, 1)] = m00 * t4;
        Ok(())
    }

    #[rustfmt::skip]
    fn invert_3x3(&mut self, m: &FullMatrix<T>) -> Result<(), MatrixError> {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = [
            m[(0, 0)], m[(0, 1)], m[(0, 2)],
            m[(1, 0)], m[(1, 1)], m[(1, 2)],
            m[(2, 0)], m[(2, 1)], m[(2, 2)],
        ];
        let t00 = m11 * m22 - m12 * m21;
        let t10 = m12 * m20 - m10 * m22;
        let t20 = m10 * m21 - m11 * m20;
        let det = m00 * t00 + m01 * t10 + m02 * t20;
        if det.is_zero() {
            return Err(MatrixError::Singular);
        }
        let inv_det = T::one() / det;
        self[(0, 0)] = t00 * inv_det;
        self[(0, 1)] = (m02 * m21 - m01 * m22) * inv_det;
        self[(0, 2)] = (m01 * m12 - m02 * m11) * inv_det;
        self[(1, 0)] = t10 * inv_det;
        self[(1, 1)] = (m00 * m22 - m02 * m20) * inv_det;
        self[(1, 2)] = (m02 * m10 - m00 * m12) * inv_det;
        self[(2, 0)] = t20 * inv_det;
        self[(2, 1)] = (m01 * m20 - m00 * m21) * inv_det;
        self[(2, 2)] = (m00 * m11 - m01 * m10) * inv_det;
        Ok(())
    }

    /// Cofactor inversion with shared 2x2 minors.
    ///
    /// `t_ab` are the minors of the first two rows (or columns) that appear repeatedly in the
    /// expansion; combining them keeps the operation count low.
    #[rustfmt::skip]
    fn invert_4x4(&mut self, m: &FullMatrix<T>) -> Result<(), MatrixError> {
        let [m00, m01, m02, m03] = [m[(0, 0)], m[(0, 1)], m[(0, 2)], m[(0, 3)]];
        let [m10, m11, m12, m13] = [m[(1, 0)], m[(1, 1)], m[(1, 2)], m[(1, 3)]];
        let [m20, m21, m22, m23] = [m[(2, 0)], m[(2, 1)], m[(2, 2)], m[(2, 3)]];
        let [m30, m31, m32, m33] = [m[(3, 0)], m[(3, 1)], m[(3, 2)], m[(3, 3)]];

        let t14 = m00 * m11 - m10 * m01;
        let t15 = m22 * m33 - m23 * m32;
        let t19 = m00 * m21 - m20 * m01;
        let t20 = m12 * m33 - m13 * m32;
        let t24 = m00 * m31 - m30 * m01;
        let t25 = m12 * m23 - m13 * m22;
        let t32 = m10 * m21 - m20 * m11;
        let t33 = m02 * m33 - m03 * m32;
        let t37 = m10 * m31 - m30 * m11;
        let t38 = m02 * m23 - m03 * m22;
        let t49 = m20 * m31 - m30 * m21;
        let t50 = m02 * m13 - m03 * m12;
        let det = t14 * t15 - t19 * t20 + t24 * t25 + t32 * t33 - t37 * t38 + t49 * t50;
        if det.is_zero() {
            return Err(MatrixError::Singular);
        }
        let inv_det = T::one() / det;

        let t81 = m01 * m12 - m02 * m11;
        let t83 = m01 * m13 - m03 * m11;
        let t93 = m01 * m22 - m02 * m21;
        let t95 = m11 * m23 - m13 * m21;
        let t97 = m01 * m23 - m03 * m21;
        let t99 = m11 * m22 - m12 * m21;
        let t101 = m10 * m22 - m20 * m12;
        let t103 = m10 * m23 - m20 * m13;
        let t115 = m00 * m22 - m20 * m02;
        let t117 = m00 * m23 - m20 * m03;
        let t129 = m00 * m12 - m10 * m02;
        let t131 = m00 * m13 - m10 * m03;

        self[(0, 0)] =  (m11 * t15 - m21 * t20 + m31 * t25) * inv_det;
        self[(0, 1)] = -(m01 * t15 - m21 * t33 + m31 * t38) * inv_det;
        self[(0, 2)] =  (m33 * t81 - m32 * t83 + m31 * t50) * inv_det;
        self[(0, 3)] = -(m23 * t81 - m22 * t83 + m21 * t50) * inv_det;
        self[(1, 0)] = -(m33 * t101 - m32 * t103 + m30 * t25) * inv_det;
        self[(1, 1)] =  (m33 * t115 - m32 * t117 + m30 * t38) * inv_det;
        self[(1, 2)] = -(m33 * t129 - m32 * t131 + m30 * t50) * inv_det;
        self[(1, 3)] =  (m23 * t129 - m22 * t131 + m20 * t50) * inv_det;
        self[(2, 0)] =  (m33 * t32 - m31 * t103 + m30 * t95) * inv_det;
        self[(2, 1)] = -(m33 * t19 - m31 * t117 + m30 * t97) * inv_det;
        self[(2, 2)] =  (m33 * t14 - m31 * t131 + m30 * t83) * inv_det;
        self[(2, 3)] = -(m23 * t14 - m21 * t131 + m20 * t83) * inv_det;
        self[(3, 0)] = -(m32 * t32 - m31 * t101 + m30 * t99) * inv_det;
        self[(3, 1)] =  (m32 * t19 - m31 * t115 + m30 * t93) * inv_det;
        self[(3, 2)] = -(m32 * t14 - m31 * t129 + m30 * t81) * inv_det;
        self[(3, 3)] =  (m22 * t14 - m21 * t129 + m20 * t81) * inv_det;
        Ok(())
    }

    /// Inverts the matrix in place by Gauss-Jordan elimination with row pivoting.
    pub fn gauss_jordan(&mut self) -> Result<(), MatrixError> {
        self.gauss_jordan_with_policy(&DispatchPolicy::default())
    }

    pub fn gauss_jordan_with_policy(&mut self, policy: &DispatchPolicy) -> Result<(), MatrixError> {
        self.assert_not_empty();
        self.assert_square();
        match policy.inversion_strategy::<T>(self.nrows()) {
            Strategy::Accelerated => lu_invert_in_place(self),
            Strategy::Native => self.native_gauss_jordan(),
        }
    }

    #[replace_float_literals(T::RealField::from_f64(literal).unwrap())]
    fn native_gauss_jordan(&mut self) -> Result<(), MatrixError> {
        let n = self.nrows();

        // The mean magnitude of the diagonal sets the scale for detecting singular pivots
        let diagonal_sum = (0..n).fold(T::RealField::zero(), |acc, i| acc + self[(i, i)].modulus());
        let typical_diagonal = diagonal_sum / convert::<f64, T::RealField>(n as f64);
        let pivot_threshold = 1e-16 * typical_diagonal;

        let mut permutation: Vec<usize> = (0..n).collect();

        for j in 0..n {
            let mut max = self[(j, j)].modulus();
            let mut r = j;
            for i in j + 1..n {
                let candidate = self[(i, j)].modulus();
                if candidate > max {
                    max = candidate;
                    r = i;
                }
            }

            if !(max > pivot_threshold) {
                debug!("Gauss-Jordan elimination: no pivot above {} in column {}", pivot_threshold, j);
                return Err(MatrixError::NotRegular { column: j });
            }

            if r > j {
                self.swap_row(j, r);
                permutation.swap(j, r);
            }

            let hr = T::one() / self[(j, j)];
            self[(j, j)] = hr;
            for k in 0..n {
                if k == j {
                    continue;
                }
                let a_jk = self[(j, k)];
                for i in 0..n {
                    if i == j {
                        continue;
                    }
                    let a_ij = self[(i, j)];
                    self[(i, k)] -= a_ij * a_jk * hr;
                }
            }
            for i in 0..n {
                self[(i, j)] *= hr;
                self[(j, i)] *= -hr;
            }
            self[(j, j)] = hr;
        }

        // Undo the row exchanges, which act on the columns of the inverse
        let mut row_buffer = vec![T::zero(); n];
        for i in 0..n {
            for (k, &pk) in permutation.iter().enumerate() {
                row_buffer[pk] = self[(i, k)];
            }
            self.row_mut(i).copy_from_slice(&row_buffer);
        }
        Ok(())
    }

    /// Sets the receiver to the lower triangular Cholesky factor `L` of `a`, with `L L^T = a`.
    ///
    /// `a` must be square and symmetric up to a relative tolerance. The receiver is resized to
    /// the dimensions of `a`.
    pub fn cholesky(&mut self, a: &FullMatrix<T>) -> Result<(), MatrixError> {
        a.assert_not_empty();
        a.assert_square();
        assert!(
            a.relative_symmetry_norm2() < convert(CHOLESKY_SYMMETRY_TOLERANCE),
            "Matrix must be symmetric."
        );

        self.reinit(a.nrows(), a.ncols());
        let n = a.nrows();
        for i in 0..n {
            let mut sum_lik2 = T::zero();
            for j in 0..i {
                let sum_lik_ljk = (0..j).fold(T::zero(), |acc, k| acc + self[(i, k)] * self[(j, k)]);
                let l_ij = (a[(i, j)] - sum_lik_ljk) / self[(j, j)];
                self[(i, j)] = l_ij;
                sum_lik2 += l_ij * l_ij;
            }
            let residual = a[(i, i)] - sum_lik2;
            if !(residual.real() > T::RealField::zero()) {
                debug!("Cholesky decomposition: non-positive diagonal residual in row {}", i);
                return Err(MatrixError::NotPositiveDefinite { row: i });
            }
            self[(i, i)] = residual.sqrt();
        }
        Ok(())
    }

    /// Replaces the matrix by its Cholesky factor.
    pub fn cholesky_in_place(&mut self) -> Result<(), MatrixError> {
        let a = self.clone();
        self.cholesky(&a)
    }

    /// Sets the receiver to the left inverse `(A^T A)^{-1} A^T` of a matrix with full column rank.
    ///
    /// `a` must have at least as many rows as columns, and the receiver must have the
    /// dimensions of `a^T`. Square matrices are inverted directly.
    pub fn left_invert(&mut self, a: &FullMatrix<T>) -> Result<(), MatrixError> {
        a.assert_not_empty();
        assert!(a.nrows() >= a.ncols(), "Left inverse requires at least as many rows as columns.");
        assert_eq!(
            (self.nrows(), self.ncols()),
            (a.ncols(), a.nrows()),
            "Receiver must have the dimensions of the transposed matrix."
        );

        if a.is_square() {
            return self.invert(a);
        }

        let n = a.ncols();
        let mut normal = FullMatrix::square(n);
        a.tr_mmult(&mut normal, a, false);
        if normal.determinant()?.is_zero() {
            return Err(MatrixError::Singular);
        }
        normal.invert_in_place()?;
        normal.mmult_tr(self, a, false);
        Ok(())
    }

    /// Sets the receiver to the right inverse `A^T (A A^T)^{-1}` of a matrix with full row rank.
    ///
    /// `a` must have at least as many columns as rows, and the receiver must have the
    /// dimensions of `a^T`. Square matrices are inverted directly.
    pub fn right_invert(&mut self, a: &FullMatrix<T>) -> Result<(), MatrixError> {
        a.assert_not_empty();
        assert!(a.ncols() >= a.nrows(), "Right inverse requires at least as many columns as rows.");
        assert_eq!(
            (self.nrows(), self.ncols()),
            (a.ncols(), a.nrows()),
            "Receiver must have the dimensions of the transposed matrix."
        );

        if a.is_square() {
            return self.invert(a);
        }

        let m = a.nrows();
        let mut normal = FullMatrix::square(m);
        a.mmult_tr(&mut normal, a, false);
        if normal.determinant()?.is_zero() {
            return Err(MatrixError::Singular);
        }
        normal.invert_in_place()?;
        a.tr_mmult(self, &normal, false);
        Ok(())
    }
}
