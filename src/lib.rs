//! Dense matrix kernel and reference cell combinatorics for finite element computations.
//!
//! - [`full_matrix`] provides [`FullMatrix`](full_matrix::FullMatrix), a row-major dense matrix
//!   with the products, inversions and decompositions needed for local element matrices.
//! - [`geometry_info`] describes the unit hypercube in one, two and three dimensions: the numbering
//!   of its vertices, lines and faces, how it is refined into children, and how a face seen from a
//!   neighboring cell relates to its standard orientation.
pub mod full_matrix;
pub mod geometry_info;

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate nalgebra;

pub use kjerne_traits::{Number, Real};
