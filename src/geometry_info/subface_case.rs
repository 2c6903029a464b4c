use nalgebra::{DimName, U1, U2, U3};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// How a face of a cell of dimension `D` is divided into subfaces.
///
/// Besides the refinement cases of the face itself, a face of a hexahedron can be split by two
/// successive anisotropic refinements, for example first along `x` and then one of the halves
/// along `y` (`CASE_X1Y`). In two dimensions a face is either split or not, and faces of lower
/// dimensional cells are never split.
pub struct SubfaceCase<D> {
    value: u8,
    marker: PhantomData<D>,
}

/// Returned when a value is not a subface case of the requested dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InvalidSubfaceCase {
    pub value: u8,
    pub dim: usize,
}

impl Display for InvalidSubfaceCase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a valid subface case in dimension {}", self.value, self.dim)
    }
}

impl Error for InvalidSubfaceCase {}

impl<D> SubfaceCase<D> {
    const fn from_value_unchecked(value: u8) -> Self {
        Self {
            value,
            marker: PhantomData,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

impl<D: DimName> SubfaceCase<D> {
    /// # Panics
    ///
    /// Panics if `value` is not a subface case in this dimension.
    pub fn new(value: u8) -> Self {
        match Self::try_new(value) {
            Ok(case) => case,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_new(value: u8) -> Result<Self, InvalidSubfaceCase> {
        if usize::from(value) < Self::n_subface_cases() {
            Ok(Self::from_value_unchecked(value))
        } else {
            Err(InvalidSubfaceCase { value, dim: D::dim() })
        }
    }

    pub fn case_none() -> Self {
        Self::from_value_unchecked(0)
    }

    /// Number of distinct subface cases in this dimension.
    pub fn n_subface_cases() -> usize {
        match D::dim() {
            2 => 2,
            3 => 10,
            _ => 1,
        }
    }

    pub fn all_subface_cases() -> impl Iterator<Item = Self> {
        (0..Self::n_subface_cases()).map(|value| Self::from_value_unchecked(value as u8))
    }
}

impl SubfaceCase<U1> {
    pub const CASE_NONE: Self = Self::from_value_unchecked(0);
}

impl SubfaceCase<U2> {
    pub const CASE_NONE: Self = Self::from_value_unchecked(0);
    pub const CASE_X: Self = Self::from_value_unchecked(1);
    pub const CASE_ISOTROPIC: Self = Self::CASE_X;
}

impl SubfaceCase<U3> {
    pub const CASE_NONE: Self = Self::from_value_unchecked(0);
    pub const CASE_X: Self = Self::from_value_unchecked(1);
    pub const CASE_X1Y: Self = Self::from_value_unchecked(2);
    pub const CASE_X2Y: Self = Self::from_value_unchecked(3);
    pub const CASE_X1Y2Y: Self = Self::from_value_unchecked(4);
    pub const CASE_Y: Self = Self::from_value_unchecked(5);
    pub const CASE_Y1X: Self = Self::from_value_unchecked(6);
    pub const CASE_Y2X: Self = Self::from_value_unchecked(7);
    pub const CASE_Y1X2X: Self = Self::from_value_unchecked(8);
    pub const CASE_XY: Self = Self::from_value_unchecked(9);
    pub const CASE_ISOTROPIC: Self = Self::CASE_XY;
}

impl<D> Clone for SubfaceCase<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for SubfaceCase<D> {}

impl<D> PartialEq for SubfaceCase<D> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<D> Eq for SubfaceCase<D> {}

impl<D> Hash for SubfaceCase<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state)
    }
}

impl<D: DimName> Debug for SubfaceCase<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SubfaceCase<{}>({})", D::dim(), self.value)
    }
}

impl<D: DimName> Default for SubfaceCase<D> {
    fn default() -> Self {
        Self::case_none()
    }
}

impl<D: DimName> TryFrom<u8> for SubfaceCase<D> {
    type Error = InvalidSubfaceCase;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl<D> From<SubfaceCase<D>> for u8 {
    fn from(case: SubfaceCase<D>) -> Self {
        case.value
    }
}

impl<D> Serialize for SubfaceCase<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value)
    }
}

impl<'de, D: DimName> Deserialize<'de> for SubfaceCase<D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let value = u8::deserialize(deserializer)?;
        Self::try_new(value).map_err(De::Error::custom)
    }
}
