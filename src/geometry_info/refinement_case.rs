use nalgebra::{DimName, U0, U1, U2, U3};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{BitAnd, BitOr, Not};

/// The axes along which a cell of dimension `D` is cut when it is refined.
///
/// Bit `i` is set if the cell is cut along axis `i`, that is by a hyperplane perpendicular to
/// the `x_i` direction. The cases form a lattice under `|` and `&` with
/// [`no_refinement`](Self::no_refinement) at the bottom and
/// [`isotropic_refinement`](Self::isotropic_refinement) at the top.
pub struct RefinementCase<D> {
    bits: u8,
    marker: PhantomData<D>,
}

/// Returned when a bit pattern is not a refinement case of the requested dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InvalidRefinementCase {
    pub bits: u8,
    pub dim: usize,
}

impl Display for InvalidRefinementCase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#b} is not a valid refinement case in dimension {}",
            self.bits, self.dim
        )
    }
}

impl Error for InvalidRefinementCase {}

impl<D> RefinementCase<D> {
    const fn from_bits_unchecked(bits: u8) -> Self {
        Self {
            bits,
            marker: PhantomData,
        }
    }

    /// The raw bit pattern.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Whether the cell is cut along any axis.
    pub fn is_refined(&self) -> bool {
        self.bits != 0
    }

    /// Whether every axis cut by `other` is also cut by `self`.
    pub fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl<D: DimName> RefinementCase<D> {
    /// # Panics
    ///
    /// Panics if `bits` has a bit set beyond the dimension.
    pub fn new(bits: u8) -> Self {
        match Self::try_new(bits) {
            Ok(case) => case,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_new(bits: u8) -> Result<Self, InvalidRefinementCase> {
        if usize::from(bits) < Self::n_refinement_cases() {
            Ok(Self::from_bits_unchecked(bits))
        } else {
            Err(InvalidRefinementCase { bits, dim: D::dim() })
        }
    }

    pub fn no_refinement() -> Self {
        Self::from_bits_unchecked(0)
    }

    /// The case that cuts the cell along every axis.
    pub fn isotropic_refinement() -> Self {
        Self::from_bits_unchecked(Self::mask())
    }

    /// The case that cuts the cell along the given axis only.
    pub fn cut_axis(axis: usize) -> Self {
        assert!(axis < D::dim(), "axis {} out of range in dimension {}", axis, D::dim());
        Self::from_bits_unchecked(1 << axis)
    }

    /// Number of distinct refinement cases in this dimension.
    pub fn n_refinement_cases() -> usize {
        1 << D::dim()
    }

    /// All refinement cases in this dimension, in order of their bit patterns.
    pub fn all_refinement_cases() -> impl Iterator<Item = Self> {
        (0..Self::n_refinement_cases()).map(|bits| Self::from_bits_unchecked(bits as u8))
    }

    /// Whether the cell is cut along the given axis.
    pub fn is_cut_along(&self, axis: usize) -> bool {
        assert!(axis < D::dim(), "axis {} out of range in dimension {}", axis, D::dim());
        self.bits & (1 << axis) != 0
    }

    fn mask() -> u8 {
        ((1usize << D::dim()) - 1) as u8
    }
}

impl RefinementCase<U0> {
    pub const NO_REFINEMENT: Self = Self::from_bits_unchecked(0);
    pub const ISOTROPIC_REFINEMENT: Self = Self::NO_REFINEMENT;
}

impl RefinementCase<U1> {
    pub const NO_REFINEMENT: Self = Self::from_bits_unchecked(0);
    pub const CUT_X: Self = Self::from_bits_unchecked(0b1);
    pub const ISOTROPIC_REFINEMENT: Self = Self::CUT_X;
}

impl RefinementCase<U2> {
    pub const NO_REFINEMENT: Self = Self::from_bits_unchecked(0);
    pub const CUT_X: Self = Self::from_bits_unchecked(0b01);
    pub const CUT_Y: Self = Self::from_bits_unchecked(0b10);
    pub const CUT_XY: Self = Self::from_bits_unchecked(0b11);
    pub const ISOTROPIC_REFINEMENT: Self = Self::CUT_XY;
}

impl RefinementCase<U3> {
    pub const NO_REFINEMENT: Self = Self::from_bits_unchecked(0);
    pub const CUT_X: Self = Self::from_bits_unchecked(0b001);
    pub const CUT_Y: Self = Self::from_bits_unchecked(0b010);
    pub const CUT_XY: Self = Self::from_bits_unchecked(0b011);
    pub const CUT_Z: Self = Self::from_bits_unchecked(0b100);
    pub const CUT_XZ: Self = Self::from_bits_unchecked(0b101);
    pub const CUT_YZ: Self = Self::from_bits_unchecked(0b110);
    pub const CUT_XYZ: Self = Self::from_bits_unchecked(0b111);
    pub const ISOTROPIC_REFINEMENT: Self = Self::CUT_XYZ;
}

// Implemented by hand to avoid bounds on the dimension marker

impl<D> Clone for RefinementCase<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for RefinementCase<D> {}

impl<D> PartialEq for RefinementCase<D> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<D> Eq for RefinementCase<D> {}

impl<D> Hash for RefinementCase<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state)
    }
}

impl<D: DimName> Debug for RefinementCase<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "RefinementCase<{}>({:#b})", D::dim(), self.bits)
    }
}

impl<D: DimName> Default for RefinementCase<D> {
    fn default() -> Self {
        Self::no_refinement()
    }
}

impl<D> BitOr for RefinementCase<D> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self::from_bits_unchecked(self.bits | rhs.bits)
    }
}

impl<D> BitAnd for RefinementCase<D> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self::from_bits_unchecked(self.bits & rhs.bits)
    }
}

/// The complement with respect to the isotropic refinement.
impl<D: DimName> Not for RefinementCase<D> {
    type Output = Self;

    fn not(self) -> Self {
        Self::from_bits_unchecked(!self.bits & Self::mask())
    }
}

impl<D: DimName> TryFrom<u8> for RefinementCase<D> {
    type Error = InvalidRefinementCase;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::try_new(bits)
    }
}

impl<D> From<RefinementCase<D>> for u8 {
    fn from(case: RefinementCase<D>) -> Self {
        case.bits
    }
}

impl<D> Serialize for RefinementCase<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits)
    }
}

impl<'de, D: DimName> Deserialize<'de> for RefinementCase<D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let bits = u8::deserialize(deserializer)?;
        Self::try_new(bits).map_err(De::Error::custom)
    }
}
