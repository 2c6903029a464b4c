use super::{
    assert_coordinates_in_unit_cell, assert_face_in_range, assert_line_in_range, assert_vertex_in_range,
    FaceOrientation, GeometryInfo, RefinementCase, SubfaceCase,
};
use nalgebra::{Point2, Vector2, U1, U2};

impl GeometryInfo for U2 {
    type FaceDim = U1;

    const DIM: usize = 2;

    fn ucd_to_lexicographic() -> &'static [usize] {
        &[0, 1, 3, 2]
    }

    fn dx_to_lexicographic() -> &'static [usize] {
        &[0, 2, 1, 3]
    }

    fn unit_normal_direction() -> &'static [usize] {
        &[0, 0, 1, 1]
    }

    fn unit_normal_orientation() -> &'static [i32] {
        &[-1, 1, -1, 1]
    }

    fn opposite_face() -> &'static [usize] {
        &[1, 0, 3, 2]
    }

    fn vertex_to_face(vertex: usize) -> &'static [usize] {
        const VERTEX_TO_FACE: [[usize; 2]; 4] = [[0, 2], [1, 2], [0, 3], [1, 3]];
        assert_vertex_in_range::<Self>(vertex);
        &VERTEX_TO_FACE[vertex]
    }

    fn unit_tangential_vectors(face: usize, i: usize) -> Vector2<f64> {
        assert_face_in_range::<Self>(face);
        assert_eq!(i, 0, "a face in two dimensions has a single tangential vector");
        match face {
            0 => Vector2::new(0.0, -1.0),
            1 => Vector2::new(0.0, 1.0),
            2 => Vector2::new(1.0, 0.0),
            _ => Vector2::new(-1.0, 0.0),
        }
    }

    fn n_subfaces(subface_case: SubfaceCase<Self>) -> usize {
        if subface_case == SubfaceCase::<U2>::CASE_X {
            2
        } else {
            0
        }
    }

    fn subface_ratio(_subface_case: SubfaceCase<Self>, _subface: usize) -> f64 {
        // An unrefined face reports the ratio of an isotropic child as well
        1.0 / Self::MAX_CHILDREN_PER_FACE as f64
    }

    fn face_refinement_case(
        cell_refinement_case: RefinementCase<Self>,
        face: usize,
        _face_orientation: FaceOrientation,
    ) -> RefinementCase<U1> {
        use RefinementCase as R;
        assert_face_in_range::<Self>(face);
        #[rustfmt::skip]
        const REF_CASES: [[RefinementCase<U1>; 2]; 4] = [
            [R::<U1>::NO_REFINEMENT, R::<U1>::NO_REFINEMENT], // no_refinement
            [R::<U1>::NO_REFINEMENT, R::<U1>::CUT_X],         // cut_x
            [R::<U1>::CUT_X,         R::<U1>::NO_REFINEMENT], // cut_y
            [R::<U1>::CUT_X,         R::<U1>::CUT_X],         // cut_xy
        ];
        REF_CASES[cell_refinement_case.bits() as usize][face / 2]
    }

    fn line_refinement_case(cell_refinement_case: RefinementCase<Self>, line: usize) -> RefinementCase<U1> {
        // Lines are the faces
        Self::face_refinement_case(cell_refinement_case, line, FaceOrientation::STANDARD)
    }

    fn min_cell_refinement_case_for_face_refinement(
        face_refinement_case: RefinementCase<U1>,
        face: usize,
        _face_orientation: FaceOrientation,
    ) -> RefinementCase<Self> {
        assert_face_in_range::<Self>(face);
        if face_refinement_case == RefinementCase::<U1>::CUT_X {
            if face / 2 != 0 {
                RefinementCase::<U2>::CUT_X
            } else {
                RefinementCase::<U2>::CUT_Y
            }
        } else {
            RefinementCase::<U2>::NO_REFINEMENT
        }
    }

    fn min_cell_refinement_case_for_line_refinement(line: usize) -> RefinementCase<Self> {
        assert_line_in_range::<Self>(line);
        if line / 2 != 0 {
            RefinementCase::<U2>::CUT_X
        } else {
            RefinementCase::<U2>::CUT_Y
        }
    }

    fn child_cell_on_face(
        refinement_case: RefinementCase<Self>,
        face: usize,
        subface: usize,
        face_orientation: FaceOrientation,
        _face_refinement_case: RefinementCase<U1>,
    ) -> usize {
        assert_face_in_range::<Self>(face);
        assert!(subface < Self::MAX_CHILDREN_PER_FACE, "subface index {} out of range", subface);
        assert!(refinement_case.is_refined(), "an unrefined cell has no children");

        // For faces the cell refinement does not split, both subfaces give the same child
        #[rustfmt::skip]
        const SUBCELLS: [[[[usize; 2]; 4]; 3]; 2] = [
            // face_orientation == false
            [
                [[0, 0], [1, 1], [1, 0], [1, 0]], // cut_x
                [[1, 0], [1, 0], [0, 0], [1, 1]], // cut_y
                [[2, 0], [3, 1], [1, 0], [3, 2]], // cut_xy
            ],
            // face_orientation == true
            [
                [[0, 0], [1, 1], [0, 1], [0, 1]], // cut_x
                [[0, 1], [0, 1], [0, 0], [1, 1]], // cut_y
                [[0, 2], [1, 3], [0, 1], [2, 3]], // cut_xy
            ],
        ];
        let case_index = refinement_case.bits() as usize - 1;
        SUBCELLS[face_orientation.orientation as usize][case_index][face][subface]
    }

    fn line_to_cell_vertices(line: usize, vertex: usize) -> usize {
        const LINE_VERTICES: [[usize; 2]; 4] = [[0, 2], [1, 3], [0, 1], [2, 3]];
        assert_line_in_range::<Self>(line);
        assert!(vertex < 2, "line vertex index {} out of range", vertex);
        LINE_VERTICES[line][vertex]
    }

    fn face_to_cell_lines(face: usize, line: usize, _face_orientation: FaceOrientation) -> usize {
        assert_face_in_range::<Self>(face);
        assert!(line < Self::LINES_PER_FACE, "face line index {} out of range", line);
        face
    }

    fn standard_to_real_face_vertex(vertex: usize, _face_orientation: FaceOrientation) -> usize {
        assert!(vertex < Self::VERTICES_PER_FACE, "face vertex index {} out of range", vertex);
        vertex
    }

    fn real_to_standard_face_vertex(vertex: usize, _face_orientation: FaceOrientation) -> usize {
        assert!(vertex < Self::VERTICES_PER_FACE, "face vertex index {} out of range", vertex);
        vertex
    }

    fn standard_to_real_line_vertex(vertex: usize, line_orientation: bool) -> usize {
        assert!(vertex < 2, "line vertex index {} out of range", vertex);
        if line_orientation {
            vertex
        } else {
            1 - vertex
        }
    }

    fn standard_quad_vertex_to_line_vertex_index(vertex: usize) -> [usize; 2] {
        assert_vertex_in_range::<Self>(vertex);
        [vertex % 2, vertex / 2]
    }

    fn unit_cell_vertex(vertex: usize) -> Point2<f64> {
        assert_vertex_in_range::<Self>(vertex);
        Point2::new((vertex % 2) as f64, (vertex / 2) as f64)
    }

    fn child_cell_from_point(p: &Point2<f64>) -> usize {
        assert_coordinates_in_unit_cell::<Self>(p);
        match (p.x <= 0.5, p.y <= 0.5) {
            (true, true) => 0,
            (false, true) => 1,
            (true, false) => 2,
            (false, false) => 3,
        }
    }

    fn cell_to_child_coordinates(p: &Point2<f64>, child: usize, refinement_case: RefinementCase<Self>) -> Point2<f64> {
        assert!(
            child < Self::n_children(refinement_case),
            "child index {} out of range for {:?}",
            child,
            refinement_case
        );
        let mut point = *p;
        if refinement_case == RefinementCase::<U2>::CUT_X {
            point.x *= 2.0;
            if child == 1 {
                point.x -= 1.0;
            }
        } else if refinement_case == RefinementCase::<U2>::CUT_Y {
            point.y *= 2.0;
            if child == 1 {
                point.y -= 1.0;
            }
        } else {
            point.coords = point.coords * 2.0 - Self::unit_cell_vertex(child).coords;
        }
        point
    }

    fn child_to_cell_coordinates(p: &Point2<f64>, child: usize, refinement_case: RefinementCase<Self>) -> Point2<f64> {
        assert!(
            child < Self::n_children(refinement_case),
            "child index {} out of range for {:?}",
            child,
            refinement_case
        );
        let mut point = *p;
        if refinement_case == RefinementCase::<U2>::CUT_X {
            if child == 1 {
                point.x += 1.0;
            }
            point.x *= 0.5;
        } else if refinement_case == RefinementCase::<U2>::CUT_Y {
            if child == 1 {
                point.y += 1.0;
            }
            point.y *= 0.5;
        } else {
            point.coords = (point.coords + Self::unit_cell_vertex(child).coords) * 0.5;
        }
        point
    }

    fn d_linear_shape_function(xi: &Point2<f64>, vertex: usize) -> f64 {
        assert_vertex_in_range::<Self>(vertex);
        let (x, y) = (xi.x, xi.y);
        match vertex {
            0 => (1.0 - x) * (1.0 - y),
            1 => x * (1.0 - y),
            2 => (1.0 - x) * y,
            _ => x * y,
        }
    }

    #[rustfmt::skip]
    fn d_linear_shape_function_gradient(xi: &Point2<f64>, vertex: usize) -> Vector2<f64> {
        assert_vertex_in_range::<Self>(vertex);
        let (x, y) = (xi.x, xi.y);
        match vertex {
            0 => Vector2::new(-(1.0 - y), -(1.0 - x)),
            1 => Vector2::new(   1.0 - y,        -x),
            2 => Vector2::new(        -y,   1.0 - x),
            _ => Vector2::new(         y,         x),
        }
    }
}
