use nalgebra::{ComplexField, RealField};

pub use nalgebra;

pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}

/// A real or complex scalar.
///
/// Dense matrix routines are generic over this trait. Norms and other magnitudes are
/// reported in the associated real type.
pub trait Number: ComplexField<RealField: Real> + Copy {}

impl<T> Number for T
where
    T: ComplexField + Copy,
    T::RealField: Real,
{
}

pub mod allocators;
