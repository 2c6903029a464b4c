//! Strategies for property-based testing with `proptest`.
use crate::full_matrix::FullMatrix;
use crate::geometry_info::{FaceOrientation, RefinementCase, SubfaceCase};
use ::proptest::collection::vec;
use ::proptest::prelude::*;
use nalgebra::{DVector, DimName};

/// Entries are drawn from a moderate range, so that products of a few matrices stay well
/// within the range where absolute tolerances are meaningful.
fn entry() -> impl Strategy<Value = f64> {
    -10.0..10.0
}

/// Matrices of the given shape with entries in `[-10, 10)`.
pub fn full_matrix_with_shape(nrows: usize, ncols: usize) -> impl Strategy<Value = FullMatrix<f64>> {
    vec(entry(), nrows * ncols).prop_map(move |values| FullMatrix::from_row_slice(nrows, ncols, &values))
}

/// Non-empty matrices with at most `max_dim` rows and columns.
pub fn full_matrix(max_dim: usize) -> impl Strategy<Value = FullMatrix<f64>> {
    (1..=max_dim, 1..=max_dim).prop_flat_map(|(nrows, ncols)| full_matrix_with_shape(nrows, ncols))
}

/// Non-empty square matrices of dimension at most `max_dim`.
pub fn square_matrix(max_dim: usize) -> impl Strategy<Value = FullMatrix<f64>> {
    (1..=max_dim).prop_flat_map(|n| full_matrix_with_shape(n, n))
}

/// Strictly diagonally dominant square matrices, which are guaranteed to be nonsingular.
pub fn nonsingular_matrix(max_dim: usize) -> impl Strategy<Value = FullMatrix<f64>> {
    (1..=max_dim)
        .prop_flat_map(|n| (full_matrix_with_shape(n, n), vec(any::<bool>(), n)))
        .prop_map(|(mut matrix, signs)| {
            let n = matrix.nrows();
            for (i, negative) in signs.into_iter().enumerate() {
                let off_diagonal: f64 = (0..n).filter(|&j| j != i).map(|j| matrix[(i, j)].abs()).sum();
                let diagonal = off_diagonal + 1.0;
                matrix[(i, i)] = if negative { -diagonal } else { diagonal };
            }
            matrix
        })
}

/// Symmetric positive definite matrices `B^T B + I` of dimension at most `max_dim`.
pub fn spd_matrix(max_dim: usize) -> impl Strategy<Value = FullMatrix<f64>> {
    square_matrix(max_dim).prop_map(|b| {
        let n = b.nrows();
        let mut a = FullMatrix::identity(n);
        b.tr_mmult(&mut a, &b, true);
        a
    })
}

/// Vectors of the given length with entries in `[-10, 10)`.
pub fn vector(len: usize) -> impl Strategy<Value = DVector<f64>> {
    vec(entry(), len).prop_map(DVector::from_vec)
}

impl Arbitrary for FaceOrientation {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        any::<(bool, bool, bool)>()
            .prop_map(|(orientation, flip, rotation)| FaceOrientation::new(orientation, flip, rotation))
            .boxed()
    }
}

impl<D: DimName> Arbitrary for RefinementCase<D> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (0..Self::n_refinement_cases())
            .prop_map(|bits| Self::new(bits as u8))
            .boxed()
    }
}

impl<D: DimName> Arbitrary for SubfaceCase<D> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (0..Self::n_subface_cases())
            .prop_map(|value| Self::new(value as u8))
            .boxed()
    }
}
