//! Helper traits for allocator trait bounds.
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, U1};

/// Allocators needed for points, vectors and Jacobians on a reference cell of dimension `D`.
pub trait CellAllocator<D: DimName>: Allocator<f64, D> + Allocator<f64, D, D> + Allocator<f64, U1, D> {}

impl<D> CellAllocator<D> for DefaultAllocator
where
    D: DimName,
    DefaultAllocator: Allocator<f64, D> + Allocator<f64, D, D> + Allocator<f64, U1, D>,
{
}

/// Allocators needed for a reference cell of dimension `D` mapped into a space of dimension `S`.
pub trait EmbeddingAllocator<D: DimName, S: DimName>:
    CellAllocator<D> + CellAllocator<S> + Allocator<f64, S, D> + Allocator<f64, D, S>
{
}

impl<D, S> EmbeddingAllocator<D, S> for DefaultAllocator
where
    D: DimName,
    S: DimName,
    DefaultAllocator: CellAllocator<D> + CellAllocator<S> + Allocator<f64, S, D> + Allocator<f64, D, S>,
{
}
