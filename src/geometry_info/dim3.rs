use super::{
    assert_coordinates_in_unit_cell, assert_face_in_range, assert_line_in_range, assert_vertex_in_range,
    FaceOrientation, GeometryInfo, RefinementCase, SubfaceCase,
};
use nalgebra::{Point3, Vector3, U1, U2, U3};

/// Marks table entries that do not correspond to an existing subface.
const INVALID: usize = usize::MAX;

/// Exchanges `cut_x` and `cut_y` of a face refinement.
///
/// A face seen with exactly one of a non-standard orientation or a rotation has its local axes
/// swapped relative to the standard orientation.
fn to_standard_face_refinement(
    face_refinement_case: RefinementCase<U2>,
    face_orientation: FaceOrientation,
) -> RefinementCase<U2> {
    const FLIP: [RefinementCase<U2>; 4] = [
        RefinementCase::<U2>::NO_REFINEMENT,
        RefinementCase::<U2>::CUT_Y,
        RefinementCase::<U2>::CUT_X,
        RefinementCase::<U2>::CUT_XY,
    ];
    if face_orientation.orientation == face_orientation.rotation {
        FLIP[face_refinement_case.bits() as usize]
    } else {
        face_refinement_case
    }
}

fn assert_face_vertex_in_range(vertex: usize) {
    assert!(vertex < U3::VERTICES_PER_FACE, "face vertex index {} out of range", vertex);
}

fn assert_face_line_in_range(line: usize) {
    assert!(line < U3::LINES_PER_FACE, "face line index {} out of range", line);
}

impl GeometryInfo for U3 {
    type FaceDim = U2;

    const DIM: usize = 3;

    fn ucd_to_lexicographic() -> &'static [usize] {
        &[0, 4, 5, 1, 2, 6, 7, 3]
    }

    fn dx_to_lexicographic() -> &'static [usize] {
        &[0, 4, 2, 6, 1, 5, 3, 7]
    }

    fn unit_normal_direction() -> &'static [usize] {
        &[0, 0, 1, 1, 2, 2]
    }

    fn unit_normal_orientation() -> &'static [i32] {
        &[-1, 1, -1, 1, -1, 1]
    }

    fn opposite_face() -> &'static [usize] {
        &[1, 0, 3, 2, 5, 4]
    }

    fn vertex_to_face(vertex: usize) -> &'static [usize] {
        #[rustfmt::skip]
        const VERTEX_TO_FACE: [[usize; 3]; 8] = [
            [0, 2, 4], [1, 2, 4], [0, 3, 4], [1, 3, 4],
            [0, 2, 5], [1, 2, 5], [0, 3, 5], [1, 3, 5],
        ];
        assert_vertex_in_range::<Self>(vertex);
        &VERTEX_TO_FACE[vertex]
    }

    fn unit_tangential_vectors(face: usize, i: usize) -> Vector3<f64> {
        #[rustfmt::skip]
        const TANGENTIALS: [[[f64; 3]; 2]; 6] = [
            [[ 0.0, -1.0,  0.0], [0.0, 0.0, 1.0]],
            [[ 0.0,  1.0,  0.0], [0.0, 0.0, 1.0]],
            [[ 0.0,  0.0, -1.0], [1.0, 0.0, 0.0]],
            [[ 0.0,  0.0,  1.0], [1.0, 0.0, 0.0]],
            [[-1.0,  0.0,  0.0], [0.0, 1.0, 0.0]],
            [[ 1.0,  0.0,  0.0], [0.0, 1.0, 0.0]],
        ];
        assert_face_in_range::<Self>(face);
        assert!(i < 2, "a face in three dimensions has two tangential vectors, not {}", i + 1);
        Vector3::from(TANGENTIALS[face][i])
    }

    fn n_subfaces(subface_case: SubfaceCase<Self>) -> usize {
        const N_SUBFACES: [usize; 10] = [0, 2, 3, 3, 4, 2, 3, 3, 4, 4];
        N_SUBFACES[subface_case.value() as usize]
    }

    fn subface_ratio(subface_case: SubfaceCase<Self>, subface: usize) -> f64 {
        type S = SubfaceCase<U3>;
        assert!(subface < U2::MAX_CHILDREN_PER_CELL, "subface index {} out of range", subface);
        if subface_case == S::CASE_NONE {
            // Same convention as an isotropically refined face
            0.25
        } else if subface_case == S::CASE_X || subface_case == S::CASE_Y {
            0.5
        } else if subface_case == S::CASE_X1Y || subface_case == S::CASE_Y1X {
            // The first half is split again
            if subface < 2 {
                0.25
            } else {
                0.5
            }
        } else if subface_case == S::CASE_X2Y || subface_case == S::CASE_Y2X {
            // The second half is split again
            if subface == 0 {
                0.5
            } else {
                0.25
            }
        } else {
            0.25
        }
    }

    fn face_refinement_case(
        cell_refinement_case: RefinementCase<Self>,
        face: usize,
        face_orientation: FaceOrientation,
    ) -> RefinementCase<U2> {
        type R = RefinementCase<U2>;
        assert_face_in_range::<Self>(face);
        if cell_refinement_case == RefinementCase::<U3>::CUT_XYZ {
            return R::CUT_XY;
        }

        // Indexed by cell refinement case and the axis normal to the face
        #[rustfmt::skip]
        const REF_CASES: [[RefinementCase<U2>; 3]; 7] = [
            [R::NO_REFINEMENT, R::NO_REFINEMENT, R::NO_REFINEMENT], // no_refinement
            [R::NO_REFINEMENT, R::CUT_Y,         R::CUT_X],         // cut_x
            [R::CUT_X,         R::NO_REFINEMENT, R::CUT_Y],         // cut_y
            [R::CUT_X,         R::CUT_Y,         R::CUT_XY],        // cut_xy
            [R::CUT_Y,         R::CUT_X,         R::NO_REFINEMENT], // cut_z
            [R::CUT_Y,         R::CUT_XY,        R::CUT_X],         // cut_xz
            [R::CUT_XY,        R::CUT_X,         R::CUT_Y],         // cut_yz
        ];
        let standard_case = REF_CASES[cell_refinement_case.bits() as usize][face / 2];
        to_standard_face_refinement(standard_case, face_orientation)
    }

    fn line_refinement_case(cell_refinement_case: RefinementCase<Self>, line: usize) -> RefinementCase<U1> {
        assert_line_in_range::<Self>(line);
        if cell_refinement_case == RefinementCase::<U3>::CUT_XYZ {
            return RefinementCase::<U1>::CUT_X;
        }

        // The axis each line is parallel to
        const DIRECTION: [usize; 12] = [1, 1, 0, 0, 1, 1, 0, 0, 2, 2, 2, 2];
        if cell_refinement_case.is_cut_along(DIRECTION[line]) {
            RefinementCase::<U1>::CUT_X
        } else {
            RefinementCase::<U1>::NO_REFINEMENT
        }
    }

    fn min_cell_refinement_case_for_face_refinement(
        face_refinement_case: RefinementCase<U2>,
        face: usize,
        face_orientation: FaceOrientation,
    ) -> RefinementCase<Self> {
        type R = RefinementCase<U3>;
        assert_face_in_range::<Self>(face);
        let standard_case = to_standard_face_refinement(face_refinement_case, face_orientation);

        // Indexed by the axis normal to the face and the standard face refinement case
        #[rustfmt::skip]
        const FACE_TO_CELL: [[RefinementCase<U3>; 4]; 3] = [
            [R::NO_REFINEMENT, R::CUT_Y, R::CUT_Z, R::CUT_YZ],
            [R::NO_REFINEMENT, R::CUT_Z, R::CUT_X, R::CUT_XZ],
            [R::NO_REFINEMENT, R::CUT_X, R::CUT_Y, R::CUT_XY],
        ];
        FACE_TO_CELL[face / 2][standard_case.bits() as usize]
    }

    fn min_cell_refinement_case_for_line_refinement(line: usize) -> RefinementCase<Self> {
        assert_line_in_range::<Self>(line);
        type R = RefinementCase<U3>;
        // Lines come in pairs parallel to the same axis
        const LINE_TO_CELL: [RefinementCase<U3>; 6] = [R::CUT_Y, R::CUT_X, R::CUT_Y, R::CUT_X, R::CUT_Z, R::CUT_Z];
        LINE_TO_CELL[line / 2]
    }

    fn child_cell_on_face(
        refinement_case: RefinementCase<Self>,
        face: usize,
        subface: usize,
        face_orientation: FaceOrientation,
        face_refinement_case: RefinementCase<U2>,
    ) -> usize {
        const E: usize = INVALID;

        assert!(refinement_case.is_refined(), "an unrefined cell has no children");
        assert_face_in_range::<Self>(face);
        if subface != 0 || face_refinement_case.is_refined() {
            assert!(
                subface < U2::n_children(face_refinement_case),
                "subface index {} out of range for {:?}",
                subface,
                face_refinement_case
            );
        }

        let standard_face_refinement = to_standard_face_refinement(face_refinement_case, face_orientation);

        // Subface in the numbering of the standard face, indexed by
        // [face refinement case][orientation][flip][rotation][subface]. For anisotropic cases,
        // subface 0 of the result is the one at the origin of the face
        #[rustfmt::skip]
        const SUBFACE_EXCHANGE: [[[[[usize; 4]; 2]; 2]; 2]; 4] = [
            // no_refinement
            [[[[0, E, E, E], [0, E, E, E]], [[0, E, E, E], [0, E, E, E]]],
             [[[0, E, E, E], [0, E, E, E]], [[0, E, E, E], [0, E, E, E]]]],
            // cut_x
            [[[[0, 1, E, E], [0, 1, E, E]], [[1, 0, E, E], [1, 0, E, E]]],
             [[[0, 1, E, E], [0, 1, E, E]], [[1, 0, E, E], [1, 0, E, E]]]],
            // cut_y
            [[[[0, 1, E, E], [1, 0, E, E]], [[1, 0, E, E], [0, 1, E, E]]],
             [[[0, 1, E, E], [1, 0, E, E]], [[1, 0, E, E], [0, 1, E, E]]]],
            // cut_xy, the same permutation as real_to_standard_face_vertex
            [[[[0, 2, 1, 3], [2, 3, 0, 1]], [[3, 1, 2, 0], [1, 0, 3, 2]]],
             [[[0, 1, 2, 3], [1, 3, 0, 2]], [[3, 2, 1, 0], [2, 0, 3, 1]]]],
        ];
        let (o, f, r) = face_orientation.indices();
        let standard_subface = SUBFACE_EXCHANGE[face_refinement_case.bits() as usize][o][f][r][subface];
        debug_assert_ne!(standard_subface, E);

        let induced = Self::face_refinement_case(refinement_case, face, FaceOrientation::STANDARD);
        assert!(
            standard_face_refinement.contains(induced),
            "The face refinement case is too coarse for the given cell refinement case"
        );

        // An anisotropic subface neighbors the same child as one of the isotropic subfaces
        #[rustfmt::skip]
        const EQUIVALENT_ISO_SUBFACE: [[usize; 4]; 4] = [
            [0, E, E, E], // no_refinement
            [0, 3, E, E], // cut_x
            [0, 3, E, E], // cut_y
            [0, 1, 2, 3], // cut_xy
        ];
        let iso_subface = EQUIVALENT_ISO_SUBFACE[standard_face_refinement.bits() as usize][standard_subface];
        debug_assert_ne!(iso_subface, E);

        // Children at the subfaces of an isotropically refined face in standard orientation,
        // indexed by [refinement case - 1][face][subface]
        #[rustfmt::skip]
        const ISO_CHILDREN: [[[usize; 4]; 6]; 7] = [
            // cut_x
            [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 1, 1], [0, 0, 1, 1], [0, 1, 0, 1], [0, 1, 0, 1]],
            // cut_y
            [[0, 1, 0, 1], [0, 1, 0, 1], [0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 1, 1], [0, 0, 1, 1]],
            // cut_xy
            [[0, 2, 0, 2], [1, 3, 1, 3], [0, 0, 1, 1], [2, 2, 3, 3], [0, 1, 2, 3], [0, 1, 2, 3]],
            // cut_z
            [[0, 0, 1, 1], [0, 0, 1, 1], [0, 1, 0, 1], [0, 1, 0, 1], [0, 0, 0, 0], [1, 1, 1, 1]],
            // cut_xz
            [[0, 0, 1, 1], [2, 2, 3, 3], [0, 1, 2, 3], [0, 1, 2, 3], [0, 2, 0, 2], [1, 3, 1, 3]],
            // cut_yz
            [[0, 1, 2, 3], [0, 1, 2, 3], [0, 2, 0, 2], [1, 3, 1, 3], [0, 0, 1, 1], [2, 2, 3, 3]],
            // cut_xyz
            [[0, 2, 4, 6], [1, 3, 5, 7], [0, 4, 1, 5], [2, 6, 3, 7], [0, 1, 2, 3], [4, 5, 6, 7]],
        ];
        ISO_CHILDREN[refinement_case.bits() as usize - 1][face][iso_subface]
    }

    fn line_to_cell_vertices(line: usize, vertex: usize) -> usize {
        #[rustfmt::skip]
        const LINE_VERTICES: [[usize; 2]; 12] = [
            [0, 2], [1, 3], [0, 1], [2, 3], // bottom face
            [4, 6], [5, 7], [4, 5], [6, 7], // top face
            [0, 4], [1, 5], [2, 6], [3, 7], // vertical lines
        ];
        assert_line_in_range::<Self>(line);
        assert!(vertex < 2, "line vertex index {} out of range", vertex);
        LINE_VERTICES[line][vertex]
    }

    fn face_to_cell_lines(face: usize, line: usize, face_orientation: FaceOrientation) -> usize {
        #[rustfmt::skip]
        const FACE_LINES: [[usize; 4]; 6] = [
            [8, 10, 0, 4],
            [9, 11, 1, 5],
            [2, 6, 8, 9],
            [3, 7, 10, 11],
            [0, 1, 2, 3],
            [4, 5, 6, 7],
        ];
        assert_face_in_range::<Self>(face);
        assert_face_line_in_range(line);
        FACE_LINES[face][Self::real_to_standard_face_line(line, face_orientation)]
    }

    fn standard_to_real_face_vertex(vertex: usize, face_orientation: FaceOrientation) -> usize {
        // Indexed by [vertex][orientation][flip][rotation]
        #[rustfmt::skip]
        const VERTEX_TRANSLATION: [[[[usize; 2]; 2]; 2]; 4] = [
            [[[0, 2], [3, 1]], [[0, 2], [3, 1]]],
            [[[2, 3], [1, 0]], [[1, 0], [2, 3]]],
            [[[1, 0], [2, 3]], [[2, 3], [1, 0]]],
            [[[3, 1], [0, 2]], [[3, 1], [0, 2]]],
        ];
        assert_face_vertex_in_range(vertex);
        let (o, f, r) = face_orientation.indices();
        VERTEX_TRANSLATION[vertex][o][f][r]
    }

    fn real_to_standard_face_vertex(vertex: usize, face_orientation: FaceOrientation) -> usize {
        #[rustfmt::skip]
        const VERTEX_TRANSLATION: [[[[usize; 2]; 2]; 2]; 4] = [
            [[[0, 2], [3, 1]], [[0, 1], [3, 2]]],
            [[[2, 3], [1, 0]], [[1, 3], [2, 0]]],
            [[[1, 0], [2, 3]], [[2, 0], [1, 3]]],
            [[[3, 1], [0, 2]], [[3, 2], [0, 1]]],
        ];
        assert_face_vertex_in_range(vertex);
        let (o, f, r) = face_orientation.indices();
        VERTEX_TRANSLATION[vertex][o][f][r]
    }

    fn standard_to_real_face_line(line: usize, face_orientation: FaceOrientation) -> usize {
        #[rustfmt::skip]
        const LINE_TRANSLATION: [[[[usize; 2]; 2]; 2]; 4] = [
            [[[2, 0], [3, 1]], [[0, 3], [1, 2]]],
            [[[3, 1], [2, 0]], [[1, 2], [0, 3]]],
            [[[0, 3], [1, 2]], [[2, 0], [3, 1]]],
            [[[1, 2], [0, 3]], [[3, 1], [2, 0]]],
        ];
        assert_face_line_in_range(line);
        let (o, f, r) = face_orientation.indices();
        LINE_TRANSLATION[line][o][f][r]
    }

    fn real_to_standard_face_line(line: usize, face_orientation: FaceOrientation) -> usize {
        #[rustfmt::skip]
        const LINE_TRANSLATION: [[[[usize; 2]; 2]; 2]; 4] = [
            [[[2, 0], [3, 1]], [[0, 2], [1, 3]]],
            [[[3, 1], [2, 0]], [[1, 3], [0, 2]]],
            [[[0, 3], [1, 2]], [[2, 1], [3, 0]]],
            [[[1, 2], [0, 3]], [[3, 0], [2, 1]]],
        ];
        assert_face_line_in_range(line);
        let (o, f, r) = face_orientation.indices();
        LINE_TRANSLATION[line][o][f][r]
    }

    fn standard_hex_vertex_to_quad_vertex_index(vertex: usize) -> [usize; 2] {
        assert_vertex_in_range::<Self>(vertex);
        [4 + vertex / 4, vertex % 4]
    }

    fn standard_hex_line_to_quad_line_index(line: usize) -> [usize; 2] {
        // Bottom and top lines are taken from faces 4 and 5, vertical lines from faces 0 and 1
        #[rustfmt::skip]
        const TABLE: [[usize; 2]; 12] = [
            [4, 0], [4, 1], [4, 2], [4, 3],
            [5, 0], [5, 1], [5, 2], [5, 3],
            [0, 0], [1, 0], [0, 1], [1, 1],
        ];
        assert_line_in_range::<Self>(line);
        TABLE[line]
    }

    fn unit_cell_vertex(vertex: usize) -> Point3<f64> {
        assert_vertex_in_range::<Self>(vertex);
        Point3::new((vertex % 2) as f64, (vertex / 2 % 2) as f64, (vertex / 4) as f64)
    }

    fn child_cell_from_point(p: &Point3<f64>) -> usize {
        assert_coordinates_in_unit_cell::<Self>(p);
        let mut child = 0;
        if p.x > 0.5 {
            child += 1;
        }
        if p.y > 0.5 {
            child += 2;
        }
        if p.z > 0.5 {
            child += 4;
        }
        child
    }

    fn cell_to_child_coordinates(p: &Point3<f64>, child: usize, refinement_case: RefinementCase<Self>) -> Point3<f64> {
        assert!(
            child < Self::n_children(refinement_case),
            "child index {} out of range for {:?}",
            child,
            refinement_case
        );
        let offsets = child_offsets(child, refinement_case);
        let mut point = *p;
        for axis in 0..3 {
            if refinement_case.is_cut_along(axis) {
                point[axis] = 2.0 * point[axis] - offsets[axis];
            }
        }
        point
    }

    fn child_to_cell_coordinates(p: &Point3<f64>, child: usize, refinement_case: RefinementCase<Self>) -> Point3<f64> {
        assert!(
            child < Self::n_children(refinement_case),
            "child index {} out of range for {:?}",
            child,
            refinement_case
        );
        let offsets = child_offsets(child, refinement_case);
        let mut point = *p;
        for axis in 0..3 {
            if refinement_case.is_cut_along(axis) {
                point[axis] = 0.5 * (point[axis] + offsets[axis]);
            }
        }
        point
    }

    fn d_linear_shape_function(xi: &Point3<f64>, vertex: usize) -> f64 {
        assert_vertex_in_range::<Self>(vertex);
        let (x, y, z) = (xi.x, xi.y, xi.z);
        match vertex {
            0 => (1.0 - x) * (1.0 - y) * (1.0 - z),
            1 => x * (1.0 - y) * (1.0 - z),
            2 => (1.0 - x) * y * (1.0 - z),
            3 => x * y * (1.0 - z),
            4 => (1.0 - x) * (1.0 - y) * z,
            5 => x * (1.0 - y) * z,
            6 => (1.0 - x) * y * z,
            _ => x * y * z,
        }
    }

    #[rustfmt::skip]
    fn d_linear_shape_function_gradient(xi: &Point3<f64>, vertex: usize) -> Vector3<f64> {
        assert_vertex_in_range::<Self>(vertex);
        let (x, y, z) = (xi.x, xi.y, xi.z);
        match vertex {
            0 => Vector3::new(-(1.0 - y) * (1.0 - z), -(1.0 - x) * (1.0 - z), -(1.0 - x) * (1.0 - y)),
            1 => Vector3::new(  (1.0 - y) * (1.0 - z),         -x * (1.0 - z),         -x * (1.0 - y)),
            2 => Vector3::new(         -y * (1.0 - z),  (1.0 - x) * (1.0 - z),        -(1.0 - x) * y),
            3 => Vector3::new(          y * (1.0 - z),          x * (1.0 - z),                 -x * y),
            4 => Vector3::new(        -(1.0 - y) * z,         -(1.0 - x) * z,  (1.0 - x) * (1.0 - y)),
            5 => Vector3::new(         (1.0 - y) * z,                 -x * z,          x * (1.0 - y)),
            6 => Vector3::new(                -y * z,          (1.0 - x) * z,          (1.0 - x) * y),
            _ => Vector3::new(                 y * z,                  x * z,                  x * y),
        }
    }
}

/// Translation of a child along each cut axis, in units of half the cell.
///
/// For two cuts the children are numbered with the lower axis varying fastest, except for
/// `cut_xz`, whose children are numbered with `z` varying fastest.
fn child_offsets(child: usize, refinement_case: RefinementCase<U3>) -> [f64; 3] {
    type R = RefinementCase<U3>;
    let bit = |b: bool| if b { 1.0 } else { 0.0 };
    let (first, second) = (bit(child % 2 == 1), bit(child / 2 == 1));
    if refinement_case == R::CUT_X || refinement_case == R::CUT_Y || refinement_case == R::CUT_Z {
        let offset = bit(child == 1);
        [offset, offset, offset]
    } else if refinement_case == R::CUT_XY {
        [first, second, 0.0]
    } else if refinement_case == R::CUT_XZ {
        [second, 0.0, first]
    } else if refinement_case == R::CUT_YZ {
        [0.0, first, second]
    } else {
        let vertex = U3::unit_cell_vertex(child);
        [vertex.x, vertex.y, vertex.z]
    }
}
