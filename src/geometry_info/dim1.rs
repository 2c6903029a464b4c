use super::{
    assert_coordinates_in_unit_cell, assert_face_in_range, assert_line_in_range, assert_vertex_in_range, impossible,
    FaceOrientation, GeometryInfo, RefinementCase, SubfaceCase,
};
use nalgebra::{Point1, Vector1, U0, U1};

impl GeometryInfo for U1 {
    type FaceDim = U0;

    const DIM: usize = 1;

    fn ucd_to_lexicographic() -> &'static [usize] {
        &[0, 1]
    }

    fn dx_to_lexicographic() -> &'static [usize] {
        &[0, 1]
    }

    fn unit_normal_direction() -> &'static [usize] {
        &[0, 0]
    }

    fn unit_normal_orientation() -> &'static [i32] {
        &[-1, 1]
    }

    fn opposite_face() -> &'static [usize] {
        &[1, 0]
    }

    fn vertex_to_face(vertex: usize) -> &'static [usize] {
        const VERTEX_TO_FACE: [[usize; 1]; 2] = [[0], [1]];
        assert_vertex_in_range::<Self>(vertex);
        &VERTEX_TO_FACE[vertex]
    }

    fn unit_tangential_vectors(_face: usize, _i: usize) -> Vector1<f64> {
        impossible(Self::DIM, "unit_tangential_vectors")
    }

    fn subface_ratio(_subface_case: SubfaceCase<Self>, _subface: usize) -> f64 {
        1.0
    }

    fn line_refinement_case(cell_refinement_case: RefinementCase<Self>, line: usize) -> RefinementCase<U1> {
        assert_line_in_range::<Self>(line);
        cell_refinement_case
    }

    fn min_cell_refinement_case_for_line_refinement(line: usize) -> RefinementCase<Self> {
        assert_line_in_range::<Self>(line);
        RefinementCase::<U1>::CUT_X
    }

    fn child_cell_on_face(
        _refinement_case: RefinementCase<Self>,
        face: usize,
        _subface: usize,
        _face_orientation: FaceOrientation,
        _face_refinement_case: RefinementCase<U0>,
    ) -> usize {
        assert_face_in_range::<Self>(face);
        face
    }

    fn line_to_cell_vertices(line: usize, vertex: usize) -> usize {
        assert_line_in_range::<Self>(line);
        assert!(vertex < 2, "line vertex index {} out of range", vertex);
        vertex
    }

    fn unit_cell_vertex(vertex: usize) -> Point1<f64> {
        assert_vertex_in_range::<Self>(vertex);
        Point1::new(vertex as f64)
    }

    fn child_cell_from_point(p: &Point1<f64>) -> usize {
        assert_coordinates_in_unit_cell::<Self>(p);
        if p.x <= 0.5 {
            0
        } else {
            1
        }
    }

    fn cell_to_child_coordinates(p: &Point1<f64>, child: usize, refinement_case: RefinementCase<Self>) -> Point1<f64> {
        assert_eq!(refinement_case, RefinementCase::<U1>::CUT_X, "a line can only be cut along x");
        assert!(child < 2, "child index {} out of range", child);
        Point1::from(p.coords * 2.0 - Self::unit_cell_vertex(child).coords)
    }

    fn child_to_cell_coordinates(p: &Point1<f64>, child: usize, refinement_case: RefinementCase<Self>) -> Point1<f64> {
        assert_eq!(refinement_case, RefinementCase::<U1>::CUT_X, "a line can only be cut along x");
        assert!(child < 2, "child index {} out of range", child);
        Point1::from((p.coords + Self::unit_cell_vertex(child).coords) * 0.5)
    }

    fn d_linear_shape_function(xi: &Point1<f64>, vertex: usize) -> f64 {
        assert_vertex_in_range::<Self>(vertex);
        let x = xi.x;
        match vertex {
            0 => 1.0 - x,
            _ => x,
        }
    }

    fn d_linear_shape_function_gradient(_xi: &Point1<f64>, vertex: usize) -> Vector1<f64> {
        assert_vertex_in_range::<Self>(vertex);
        match vertex {
            0 => Vector1::new(-1.0),
            _ => Vector1::new(1.0),
        }
    }
}
