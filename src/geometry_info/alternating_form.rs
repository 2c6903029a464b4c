use super::GeometryInfo;
use kjerne_traits::allocators::EmbeddingAllocator;
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, Matrix1, Matrix2, Matrix3, Matrix3x2, OMatrix, OPoint, Vector2, Vector3};
use nalgebra::{U1, U2, U3};

/// The wedge product of the columns of the Jacobian of a `Self`-dimensional cell embedded in
/// `SpaceDim` dimensions.
///
/// For a cell of full dimension this is the Jacobian determinant. For a cell of codimension one
/// it is a vector normal to the cell whose length is the area element.
pub trait WedgeProduct<SpaceDim: DimName>: GeometryInfo {
    type Form;

    fn wedge_product(jacobian: &OMatrix<f64, SpaceDim, Self>) -> Self::Form
    where
        DefaultAllocator: Allocator<f64, SpaceDim, Self>;
}

impl WedgeProduct<U1> for U1 {
    type Form = f64;

    fn wedge_product(jacobian: &Matrix1<f64>) -> f64 {
        jacobian[(0, 0)]
    }
}

impl WedgeProduct<U2> for U2 {
    type Form = f64;

    fn wedge_product(jacobian: &Matrix2<f64>) -> f64 {
        jacobian.determinant()
    }
}

impl WedgeProduct<U3> for U3 {
    type Form = f64;

    fn wedge_product(jacobian: &Matrix3<f64>) -> f64 {
        jacobian.determinant()
    }
}

impl WedgeProduct<U2> for U1 {
    type Form = Vector2<f64>;

    fn wedge_product(jacobian: &Vector2<f64>) -> Vector2<f64> {
        // Tangent rotated clockwise by 90 degrees
        Vector2::new(jacobian[1], -jacobian[0])
    }
}

impl WedgeProduct<U3> for U2 {
    type Form = Vector3<f64>;

    fn wedge_product(jacobian: &Matrix3x2<f64>) -> Vector3<f64> {
        jacobian.column(0).cross(&jacobian.column(1))
    }
}

/// Evaluates the alternating form of the d-linear map defined by the given vertices at each
/// vertex of the reference cell.
///
/// The sign of the form (for cells of full dimension) reveals inverted or degenerate cells.
///
/// # Panics
///
/// Panics if the number of vertices does not match the reference cell.
pub fn alternating_form_at_vertices<D, S>(vertices: &[OPoint<f64, S>]) -> Vec<D::Form>
where
    D: WedgeProduct<S>,
    S: DimName,
    DefaultAllocator: EmbeddingAllocator<D, S>,
{
    assert_eq!(
        vertices.len(),
        D::VERTICES_PER_CELL,
        "expected one vertex per vertex of the reference cell"
    );
    (0..D::VERTICES_PER_CELL)
        .map(|i| {
            let xi = D::unit_cell_vertex(i);
            let mut jacobian = OMatrix::<f64, S, D>::zeros();
            for (j, vertex) in vertices.iter().enumerate() {
                let gradient = D::d_linear_shape_function_gradient(&xi, j);
                jacobian.ger(1.0, &vertex.coords, &gradient, 1.0);
            }
            D::wedge_product(&jacobian)
        })
        .collect()
}
