use itertools::iproduct;
use kjerne::geometry_info::{
    alternating_form_at_vertices, FaceOrientation, GeometryInfo, GeometryPrimitive, RefinementCase, SubfaceCase,
};
use kjerne::geometry_info::{InvalidRefinementCase, InvalidSubfaceCase};
use matrixcompare::assert_scalar_eq;
use nalgebra::{Point1, Point2, Point3, Vector2, Vector3, Vector4, U0, U1, U2, U3, U4};
use proptest::prelude::*;
use std::collections::HashSet;
use util::{assert_approx_matrix_eq, assert_panics};

fn point_in_unit_square() -> impl Strategy<Value = Point2<f64>> {
    [0.0..=1.0, 0.0..=1.0].prop_map(|[x, y]| Point2::new(x, y))
}

fn point_in_unit_cube() -> impl Strategy<Value = Point3<f64>> {
    [0.0..=1.0, 0.0..=1.0, 0.0..=1.0].prop_map(|[x, y, z]| Point3::new(x, y, z))
}

fn is_permutation(indices: &[usize]) -> bool {
    let unique: HashSet<_> = indices.iter().collect();
    unique.len() == indices.len() && indices.iter().all(|&i| i < indices.len())
}

#[test]
fn object_counts() {
    assert_eq!(
        [U1::VERTICES_PER_CELL, U2::VERTICES_PER_CELL, U3::VERTICES_PER_CELL, U4::VERTICES_PER_CELL],
        [2, 4, 8, 16]
    );
    assert_eq!(
        [U1::LINES_PER_CELL, U2::LINES_PER_CELL, U3::LINES_PER_CELL, U4::LINES_PER_CELL],
        [1, 4, 12, 32]
    );
    assert_eq!(
        [U1::QUADS_PER_CELL, U2::QUADS_PER_CELL, U3::QUADS_PER_CELL, U4::QUADS_PER_CELL],
        [0, 1, 6, 24]
    );
    assert_eq!(
        [U1::HEXES_PER_CELL, U2::HEXES_PER_CELL, U3::HEXES_PER_CELL, U4::HEXES_PER_CELL],
        [0, 0, 1, 8]
    );
    assert_eq!(
        [U1::FACES_PER_CELL, U2::FACES_PER_CELL, U3::FACES_PER_CELL, U4::FACES_PER_CELL],
        [2, 4, 6, 8]
    );
    assert_eq!(
        [U1::MAX_CHILDREN_PER_CELL, U2::MAX_CHILDREN_PER_CELL, U3::MAX_CHILDREN_PER_CELL],
        [2, 4, 8]
    );
    assert_eq!(
        [U1::VERTICES_PER_FACE, U2::VERTICES_PER_FACE, U3::VERTICES_PER_FACE],
        [1, 2, 4]
    );
    assert_eq!([U1::LINES_PER_FACE, U2::LINES_PER_FACE, U3::LINES_PER_FACE], [0, 1, 4]);
    assert_eq!([U1::QUADS_PER_FACE, U2::QUADS_PER_FACE, U3::QUADS_PER_FACE], [0, 0, 1]);
    assert_eq!(
        [U1::MAX_CHILDREN_PER_FACE, U2::MAX_CHILDREN_PER_FACE, U3::MAX_CHILDREN_PER_FACE],
        [1, 2, 4]
    );
    assert_eq!(
        [U0::VERTICES_PER_CELL, U0::LINES_PER_CELL, U0::FACES_PER_CELL, U0::MAX_CHILDREN_PER_CELL],
        [1, 0, 0, 1]
    );
    assert_eq!(U3::N_REFINEMENT_CASES, 8);
}

#[test]
fn geometry_primitive_dimensions() {
    assert_eq!(GeometryPrimitive::from_dim(2), GeometryPrimitive::Quad);
    assert_eq!(usize::from(GeometryPrimitive::Hex), 3);
    for dim in 0..4 {
        assert_eq!(GeometryPrimitive::from_dim(dim).dim(), dim);
    }
    assert_panics!(GeometryPrimitive::from_dim(4));
}

#[test]
fn face_orientations_are_distinct() {
    let all: HashSet<_> = FaceOrientation::all().collect();
    assert_eq!(all.len(), 8);
    assert!(all.contains(&FaceOrientation::STANDARD));
    assert_eq!(FaceOrientation::default(), FaceOrientation::new(true, false, false));
}

#[test]
fn refinement_case_lattice() {
    type R = RefinementCase<U2>;
    assert_eq!(R::CUT_X | R::CUT_Y, R::CUT_XY);
    assert_eq!(R::CUT_XY & R::CUT_Y, R::CUT_Y);
    assert_eq!(!R::CUT_X, R::CUT_Y);
    assert_eq!(!R::NO_REFINEMENT, R::isotropic_refinement());
    assert!(R::CUT_XY.contains(R::CUT_X));
    assert!(!R::CUT_X.contains(R::CUT_Y));
    assert_eq!(R::cut_axis(1), R::CUT_Y);
    assert!(R::CUT_Y.is_cut_along(1));
    assert!(!R::CUT_Y.is_cut_along(0));
    assert_eq!(R::default(), R::no_refinement());
    assert_eq!(RefinementCase::<U3>::all_refinement_cases().count(), 8);
    assert_eq!(RefinementCase::<U3>::isotropic_refinement(), RefinementCase::<U3>::CUT_XYZ);
    assert_eq!(RefinementCase::<U1>::isotropic_refinement(), RefinementCase::<U1>::CUT_X);
}

#[test]
fn refinement_case_rejects_bits_beyond_dimension() {
    assert_eq!(
        RefinementCase::<U2>::try_new(4),
        Err(InvalidRefinementCase { bits: 4, dim: 2 })
    );
    assert_eq!(RefinementCase::<U3>::try_from(7u8).map(u8::from), Ok(7));
    assert_panics!(RefinementCase::<U1>::new(2));
    assert_panics!(RefinementCase::<U2>::cut_axis(2));
}

#[test]
fn refinement_case_serialization() {
    let json = serde_json::to_string(&RefinementCase::<U3>::CUT_XZ).unwrap();
    assert_eq!(json, "5");
    let case: RefinementCase<U3> = serde_json::from_str(&json).unwrap();
    assert_eq!(case, RefinementCase::<U3>::CUT_XZ);
    assert!(serde_json::from_str::<RefinementCase<U2>>("4").is_err());
}

#[test]
fn subface_cases() {
    assert_eq!(SubfaceCase::<U1>::n_subface_cases(), 1);
    assert_eq!(SubfaceCase::<U2>::n_subface_cases(), 2);
    assert_eq!(SubfaceCase::<U3>::n_subface_cases(), 10);
    assert_eq!(SubfaceCase::<U3>::all_subface_cases().count(), 10);
    assert_eq!(SubfaceCase::<U3>::CASE_ISOTROPIC.value(), 9);
    assert_eq!(
        SubfaceCase::<U2>::try_new(2),
        Err(InvalidSubfaceCase { value: 2, dim: 2 })
    );
    let json = serde_json::to_string(&SubfaceCase::<U3>::CASE_Y1X).unwrap();
    let case: SubfaceCase<U3> = serde_json::from_str(&json).unwrap();
    assert_eq!(case, SubfaceCase::<U3>::CASE_Y1X);
}

#[test]
fn n_children_counts_cut_axes() {
    for case in RefinementCase::<U3>::all_refinement_cases() {
        let expected = if case.is_refined() { 1 << case.bits().count_ones() } else { 0 };
        assert_eq!(U3::n_children(case), expected);
    }
    assert_eq!(U2::n_children(RefinementCase::<U2>::CUT_Y), 2);
    assert_eq!(U1::n_children(RefinementCase::<U1>::CUT_X), 2);
}

#[test]
fn n_subfaces_and_ratios() {
    type S = SubfaceCase<U3>;
    assert_eq!(U2::n_subfaces(SubfaceCase::<U2>::CASE_X), 2);
    assert_eq!(U2::n_subfaces(SubfaceCase::<U2>::CASE_NONE), 0);
    assert_eq!(U2::subface_ratio(SubfaceCase::<U2>::CASE_X, 1), 0.5);
    assert_eq!(U1::subface_ratio(SubfaceCase::<U1>::CASE_NONE, 0), 1.0);

    assert_eq!(U3::n_subfaces(S::CASE_X1Y), 3);
    assert_eq!(U3::n_subfaces(S::CASE_XY), 4);
    assert_eq!(U3::subface_ratio(S::CASE_X1Y, 0), 0.25);
    assert_eq!(U3::subface_ratio(S::CASE_X1Y, 2), 0.5);
    assert_eq!(U3::subface_ratio(S::CASE_Y2X, 0), 0.5);
    assert_eq!(U3::subface_ratio(S::CASE_Y2X, 1), 0.25);

    // The subfaces of a refined face cover it
    for case in S::all_subface_cases().filter(|&case| case != S::CASE_NONE) {
        let total: f64 = (0..U3::n_subfaces(case)).map(|i| U3::subface_ratio(case, i)).sum();
        assert_eq!(total, 1.0, "{:?}", case);
    }

    assert_panics!(U1::n_subfaces(SubfaceCase::<U1>::CASE_NONE));
}

#[test]
fn lexicographic_numberings_are_permutations() {
    assert!(is_permutation(U2::ucd_to_lexicographic()));
    assert!(is_permutation(U2::dx_to_lexicographic()));
    assert!(is_permutation(U3::ucd_to_lexicographic()));
    assert!(is_permutation(U3::dx_to_lexicographic()));
    assert_eq!(U3::ucd_to_lexicographic().len(), U3::VERTICES_PER_CELL);
}

#[test]
fn unit_normals_and_opposite_faces() {
    assert_eq!(U2::unit_normal_vector(0), Vector2::new(-1.0, 0.0));
    assert_eq!(U3::unit_normal_vector(3), Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(U4::unit_normal_vector(7), Vector4::new(0.0, 0.0, 0.0, 1.0));

    for face in 0..U3::FACES_PER_CELL {
        let opposite = U3::opposite_face()[face];
        assert_eq!(U3::unit_normal_vector(opposite), -U3::unit_normal_vector(face));
        assert_eq!(U3::opposite_face()[opposite], face);
    }
    for face in 0..U2::FACES_PER_CELL {
        let opposite = U2::opposite_face()[face];
        assert_eq!(U2::unit_normal_vector(opposite), -U2::unit_normal_vector(face));
    }
    assert_panics!(U3::unit_normal_vector(6));
}

#[test]
fn tangential_vectors_complete_the_normal() {
    for face in 0..U2::FACES_PER_CELL {
        let n = U2::unit_normal_vector(face);
        assert_eq!(U2::unit_tangential_vectors(face, 0), Vector2::new(-n.y, n.x));
    }
    for face in 0..U3::FACES_PER_CELL {
        let t0 = U3::unit_tangential_vectors(face, 0);
        let t1 = U3::unit_tangential_vectors(face, 1);
        assert_eq!(t0.cross(&t1), U3::unit_normal_vector(face));
    }
    for face in 0..U4::FACES_PER_CELL {
        let n = U4::unit_normal_vector(face);
        for i in 0..3 {
            assert_eq!(U4::unit_tangential_vectors(face, i).dot(&n), 0.0);
        }
    }
    assert_panics!(U1::unit_tangential_vectors(0, 0));
    assert_panics!(U3::unit_tangential_vectors(0, 2));
}

#[test]
fn vertices_lie_on_adjacent_faces() {
    for vertex in 0..U3::VERTICES_PER_CELL {
        let x = U3::unit_cell_vertex(vertex);
        assert_eq!(U3::vertex_to_face(vertex).len(), 3);
        for &face in U3::vertex_to_face(vertex) {
            assert_eq!(x[face / 2], (face % 2) as f64);
        }
    }
    for vertex in 0..U2::VERTICES_PER_CELL {
        let x = U2::unit_cell_vertex(vertex);
        for &face in U2::vertex_to_face(vertex) {
            assert_eq!(x[face / 2], (face % 2) as f64);
        }
    }
    assert_eq!(U1::vertex_to_face(1), &[1]);
}

#[test]
fn face_vertices_lie_on_the_face() {
    for (face, orientation) in iproduct!(0..U3::FACES_PER_CELL, FaceOrientation::all()) {
        let vertices: HashSet<_> = (0..U3::VERTICES_PER_FACE)
            .map(|v| U3::face_to_cell_vertices(face, v, orientation))
            .collect();
        assert_eq!(vertices.len(), 4);
        for &vertex in &vertices {
            assert_eq!(U3::unit_cell_vertex(vertex)[face / 2], (face % 2) as f64);
        }
    }
    for (face, orientation) in iproduct!(0..U2::FACES_PER_CELL, [true, false]) {
        let orientation = FaceOrientation::new(orientation, false, false);
        let v0 = U2::face_to_cell_vertices(face, 0, orientation);
        let v1 = U2::face_to_cell_vertices(face, 1, orientation);
        assert_ne!(v0, v1);
        assert_eq!(U2::unit_cell_vertex(v0)[face / 2], (face % 2) as f64);
        assert_eq!(U2::unit_cell_vertex(v1)[face / 2], (face % 2) as f64);
    }
    assert_eq!(U1::face_to_cell_vertices(1, 0, FaceOrientation::STANDARD), 1);
}

#[test]
fn standard_face_vertices() {
    let standard = FaceOrientation::STANDARD;
    let face_0: Vec<_> = (0..4).map(|v| U3::face_to_cell_vertices(0, v, standard)).collect();
    assert_eq!(face_0, vec![0, 2, 4, 6]);
    let face_5: Vec<_> = (0..4).map(|v| U3::face_to_cell_vertices(5, v, standard)).collect();
    assert_eq!(face_5, vec![4, 5, 6, 7]);
    assert_eq!(U2::face_to_cell_vertices(0, 1, standard), 2);
    assert_eq!(U2::face_to_cell_vertices(0, 1, FaceOrientation::new(false, false, false)), 0);
}

#[test]
fn lines_connect_vertices_along_one_axis() {
    for line in 0..U3::LINES_PER_CELL {
        let a = U3::unit_cell_vertex(U3::line_to_cell_vertices(line, 0));
        let b = U3::unit_cell_vertex(U3::line_to_cell_vertices(line, 1));
        let difference = b - a;
        assert_eq!(difference.iter().filter(|&&x| x != 0.0).count(), 1);
        assert_eq!(difference.sum(), 1.0);
    }
    for line in 0..U2::LINES_PER_CELL {
        let a = U2::unit_cell_vertex(U2::line_to_cell_vertices(line, 0));
        let b = U2::unit_cell_vertex(U2::line_to_cell_vertices(line, 1));
        assert_eq!((b - a).sum(), 1.0);
    }
    assert_panics!(U3::line_to_cell_vertices(12, 0));
}

#[test]
fn face_lines_lie_on_the_face() {
    for (face, orientation) in iproduct!(0..U3::FACES_PER_CELL, FaceOrientation::all()) {
        let lines: HashSet<_> = (0..U3::LINES_PER_FACE)
            .map(|l| U3::face_to_cell_lines(face, l, orientation))
            .collect();
        assert_eq!(lines.len(), 4);
        for &line in &lines {
            for v in 0..2 {
                let x = U3::unit_cell_vertex(U3::line_to_cell_vertices(line, v));
                assert_eq!(x[face / 2], (face % 2) as f64);
            }
        }
    }
    assert_eq!(U2::face_to_cell_lines(3, 0, FaceOrientation::STANDARD), 3);
}

#[test]
fn face_orientation_maps_round_trip() {
    for orientation in FaceOrientation::all() {
        for vertex in 0..U3::VERTICES_PER_FACE {
            let real = U3::standard_to_real_face_vertex(vertex, orientation);
            assert_eq!(U3::real_to_standard_face_vertex(real, orientation), vertex);
        }
        for line in 0..U3::LINES_PER_FACE {
            let real = U3::standard_to_real_face_line(line, orientation);
            assert_eq!(U3::real_to_standard_face_line(real, orientation), line);
        }
        assert_eq!(U2::standard_to_real_face_vertex(1, orientation), 1);
    }
    let standard = FaceOrientation::STANDARD;
    for vertex in 0..4 {
        assert_eq!(U3::standard_to_real_face_vertex(vertex, standard), vertex);
    }
    for line in 0..4 {
        assert_eq!(U3::standard_to_real_face_line(line, standard), line);
    }
    assert_eq!(U2::standard_to_real_line_vertex(0, false), 1);
    assert_eq!(U2::standard_to_real_line_vertex(1, true), 1);
    assert_panics!(U1::standard_to_real_face_vertex(0, FaceOrientation::STANDARD));
}

#[test]
fn sub_object_index_helpers() {
    for vertex in 0..U2::VERTICES_PER_CELL {
        let [line, line_vertex] = U2::standard_quad_vertex_to_line_vertex_index(vertex);
        assert_eq!(U2::line_to_cell_vertices(line, line_vertex), vertex);
    }
    for vertex in 0..U3::VERTICES_PER_CELL {
        let [face, face_vertex] = U3::standard_hex_vertex_to_quad_vertex_index(vertex);
        assert_eq!(U3::face_to_cell_vertices(face, face_vertex, FaceOrientation::STANDARD), vertex);
    }
    for line in 0..U3::LINES_PER_CELL {
        let [face, face_line] = U3::standard_hex_line_to_quad_line_index(line);
        assert_eq!(U3::face_to_cell_lines(face, face_line, FaceOrientation::STANDARD), line);
    }
}

#[test]
fn face_refinement_cases() {
    type R3 = RefinementCase<U3>;
    type R2 = RefinementCase<U2>;
    let standard = FaceOrientation::STANDARD;
    assert_eq!(U3::face_refinement_case(R3::CUT_X, 0, standard), R2::NO_REFINEMENT);
    assert_eq!(U3::face_refinement_case(R3::CUT_X, 4, standard), R2::CUT_X);
    assert_eq!(U3::face_refinement_case(R3::CUT_XYZ, 3, standard), R2::CUT_XY);
    // Seen without standard orientation, the local axes of the face are exchanged
    let flipped = FaceOrientation::new(false, false, false);
    assert_eq!(U3::face_refinement_case(R3::CUT_X, 4, flipped), R2::CUT_Y);

    assert_eq!(
        U2::face_refinement_case(RefinementCase::<U2>::CUT_X, 2, standard),
        RefinementCase::<U1>::CUT_X
    );
    assert_eq!(
        U2::face_refinement_case(RefinementCase::<U2>::CUT_X, 0, standard),
        RefinementCase::<U1>::NO_REFINEMENT
    );
    assert_eq!(
        U3::line_refinement_case(R3::CUT_Z, 8),
        RefinementCase::<U1>::CUT_X
    );
    assert_eq!(
        U3::line_refinement_case(R3::CUT_Z, 0),
        RefinementCase::<U1>::NO_REFINEMENT
    );
}

#[test]
fn minimal_cell_refinement_reproduces_face_refinement() {
    for (face, orientation) in iproduct!(0..U3::FACES_PER_CELL, FaceOrientation::all()) {
        for face_case in RefinementCase::<U2>::all_refinement_cases() {
            let cell_case = U3::min_cell_refinement_case_for_face_refinement(face_case, face, orientation);
            assert_eq!(U3::face_refinement_case(cell_case, face, orientation), face_case);
            assert_eq!(cell_case.bits().count_ones(), face_case.bits().count_ones());
        }
    }
    for face in 0..U2::FACES_PER_CELL {
        for face_case in RefinementCase::<U1>::all_refinement_cases() {
            let cell_case = U2::min_cell_refinement_case_for_face_refinement(face_case, face, FaceOrientation::STANDARD);
            assert_eq!(U2::face_refinement_case(cell_case, face, FaceOrientation::STANDARD), face_case);
        }
    }
}

#[test]
fn minimal_cell_refinement_refines_line() {
    for line in 0..U3::LINES_PER_CELL {
        let cell_case = U3::min_cell_refinement_case_for_line_refinement(line);
        assert_eq!(U3::line_refinement_case(cell_case, line), RefinementCase::<U1>::CUT_X);
        assert_eq!(U3::n_children(cell_case), 2);
    }
    for line in 0..U2::LINES_PER_CELL {
        let cell_case = U2::min_cell_refinement_case_for_line_refinement(line);
        assert_eq!(U2::line_refinement_case(cell_case, line), RefinementCase::<U1>::CUT_X);
    }
    assert_eq!(
        U1::min_cell_refinement_case_for_line_refinement(0),
        RefinementCase::<U1>::CUT_X
    );
}

#[test]
fn child_cell_on_face_examples() {
    type R2 = RefinementCase<U2>;
    let standard = FaceOrientation::STANDARD;
    let iso_line = RefinementCase::<U1>::CUT_X;
    assert_eq!(U2::child_cell_on_face(R2::CUT_X, 0, 0, standard, iso_line), 0);
    assert_eq!(U2::child_cell_on_face(R2::CUT_X, 0, 1, standard, iso_line), 0);
    assert_eq!(U2::child_cell_on_face(R2::CUT_XY, 0, 0, standard, iso_line), 0);
    assert_eq!(U2::child_cell_on_face(R2::CUT_XY, 0, 1, standard, iso_line), 2);
    assert_eq!(U2::child_cell_on_face(R2::CUT_Y, 3, 1, standard, iso_line), 1);

    type R3 = RefinementCase<U3>;
    let iso_quad = RefinementCase::<U2>::CUT_XY;
    assert_eq!(U3::child_cell_on_face(R3::CUT_XYZ, 4, 3, standard, iso_quad), 3);
    assert_eq!(U3::child_cell_on_face(R3::CUT_XYZ, 5, 0, standard, iso_quad), 4);
    assert_eq!(U3::child_cell_on_face(R3::CUT_X, 1, 2, standard, iso_quad), 1);

    assert_panics!(U2::child_cell_on_face(R2::NO_REFINEMENT, 0, 0, FaceOrientation::STANDARD, RefinementCase::<U1>::CUT_X));
    // A face refined along x only cannot resolve a cell cut along both face axes
    assert_panics!(U3::child_cell_on_face(
        RefinementCase::<U3>::CUT_XYZ,
        4,
        0,
        FaceOrientation::STANDARD,
        RefinementCase::<U2>::CUT_X
    ));
}

#[test]
fn child_on_face_touches_the_face() {
    for (case, face) in iproduct!(RefinementCase::<U3>::all_refinement_cases(), 0..U3::FACES_PER_CELL) {
        if !case.is_refined() {
            continue;
        }
        let face_case = U3::face_refinement_case(case, face, FaceOrientation::STANDARD);
        let n_subfaces = U2::n_children(face_case).max(1);
        for subface in 0..n_subfaces {
            let child = U3::child_cell_on_face(case, face, subface, FaceOrientation::STANDARD, face_case);
            assert!(child < U3::n_children(case));
            // The center of the child's own face must land on the face of the parent
            let mut center = Point3::new(0.5, 0.5, 0.5);
            center[face / 2] = (face % 2) as f64;
            let parent_point = U3::child_to_cell_coordinates(&center, child, case);
            assert_eq!(parent_point[face / 2], (face % 2) as f64, "{:?} face {} subface {}", case, face, subface);
        }
    }
    for (case, face, subface) in iproduct!(RefinementCase::<U2>::all_refinement_cases(), 0..4, 0..2) {
        if !case.is_refined() {
            continue;
        }
        let child = U2::child_cell_on_face(case, face, subface, FaceOrientation::STANDARD, RefinementCase::<U1>::CUT_X);
        let mut center = Point2::new(0.5, 0.5);
        center[face / 2] = (face % 2) as f64;
        let parent_point = U2::child_to_cell_coordinates(&center, child, case);
        assert_eq!(parent_point[face / 2], (face % 2) as f64);
    }
}

#[test]
fn child_cell_from_point_examples() {
    assert_eq!(U1::child_cell_from_point(&Point1::new(0.5)), 0);
    assert_eq!(U1::child_cell_from_point(&Point1::new(0.75)), 1);
    assert_eq!(U2::child_cell_from_point(&Point2::new(0.75, 0.25)), 1);
    assert_eq!(U3::child_cell_from_point(&Point3::new(0.75, 0.25, 0.6)), 5);
    assert_panics!(U2::child_cell_from_point(&Point2::new(1.5, 0.25)));
}

#[test]
fn child_coordinates_examples() {
    let p = Point1::new(0.25);
    assert_eq!(U1::cell_to_child_coordinates(&p, 1, RefinementCase::<U1>::CUT_X), Point1::new(-0.5));
    assert_eq!(U1::child_to_cell_coordinates(&p, 1, RefinementCase::<U1>::CUT_X), Point1::new(0.625));

    let p = Point3::new(0.25, 0.5, 0.75);
    // Children of cut_xz are numbered with z varying fastest
    assert_eq!(
        U3::child_to_cell_coordinates(&p, 1, RefinementCase::<U3>::CUT_XZ),
        Point3::new(0.125, 0.5, 0.875)
    );
    assert_eq!(
        U3::cell_to_child_coordinates(&p, 1, RefinementCase::<U3>::CUT_Y),
        Point3::new(0.25, 0.0, 0.75)
    );
    assert_panics!(U3::cell_to_child_coordinates(&Point3::origin(), 2, RefinementCase::<U3>::CUT_Z));
}

#[test]
fn unit_cell_membership_and_projection() {
    assert!(U2::is_inside_unit_cell(&Point2::new(0.0, 1.0)));
    assert!(!U2::is_inside_unit_cell(&Point2::new(-1e-10, 0.5)));
    assert!(U2::is_inside_unit_cell_with_tolerance(&Point2::new(-1e-10, 0.5), 1e-8));
    assert_eq!(U3::project_to_unit_cell(&Point3::new(-1.0, 0.5, 2.0)), Point3::new(0.0, 0.5, 1.0));
    assert_eq!(U3::distance_to_unit_cell(&Point3::new(-1.0, 0.5, 2.5)), 1.5);
    assert_eq!(U3::distance_to_unit_cell(&Point3::new(0.1, 0.5, 0.9)), 0.0);
    assert_eq!(U1::distance_to_unit_cell(&Point1::new(1.25)), 0.25);
}

#[test]
fn unimplemented_operations_panic() {
    assert_panics!(U0::unit_cell_vertex(0));
    assert_panics!(U4::child_cell_from_point(&nalgebra::Point4::origin()));
    assert_panics!(U4::face_refinement_case(
        RefinementCase::<U4>::no_refinement(),
        0,
        FaceOrientation::STANDARD
    ));
}

#[test]
fn d_linear_shape_functions_interpolate_vertices() {
    for (i, j) in iproduct!(0..U3::VERTICES_PER_CELL, 0..U3::VERTICES_PER_CELL) {
        let expected = if i == j { 1.0 } else { 0.0 };
        assert_eq!(U3::d_linear_shape_function(&U3::unit_cell_vertex(j), i), expected);
    }
    for (i, j) in iproduct!(0..U2::VERTICES_PER_CELL, 0..U2::VERTICES_PER_CELL) {
        let expected = if i == j { 1.0 } else { 0.0 };
        assert_eq!(U2::d_linear_shape_function(&U2::unit_cell_vertex(j), i), expected);
    }
    assert_eq!(U1::d_linear_shape_function(&Point1::new(0.25), 0), 0.75);
}

#[test]
fn alternating_form_of_unit_cells() {
    let unit_square: Vec<_> = (0..4).map(U2::unit_cell_vertex).collect();
    assert_eq!(alternating_form_at_vertices::<U2, U2>(&unit_square), vec![1.0; 4]);

    let scaled_cube: Vec<_> = (0..8).map(|v| U3::unit_cell_vertex(v) * 2.0).collect();
    for form in alternating_form_at_vertices::<U3, U3>(&scaled_cube) {
        assert_scalar_eq!(form, 8.0, comp = abs, tol = 1e-14);
    }

    let embedded_square: Vec<_> = unit_square.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
    for form in alternating_form_at_vertices::<U2, U3>(&embedded_square) {
        assert_eq!(form, Vector3::new(0.0, 0.0, 1.0));
    }

    let segment = [Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)];
    assert_eq!(alternating_form_at_vertices::<U1, U2>(&segment), vec![Vector2::new(0.0, -2.0); 2]);
}

#[test]
fn alternating_form_detects_inverted_cells() {
    // Swapping two vertices of a square inverts it
    let vertices = [
        Point2::new(0.0, 0.0),
        Point2::new(0.0, 1.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
    ];
    assert!(alternating_form_at_vertices::<U2, U2>(&vertices)
        .iter()
        .all(|&form| form < 0.0));
    assert_panics!(alternating_form_at_vertices::<U2, U2>(&vertices[..3]));
}

proptest! {
    #[test]
    fn cell_and_child_coordinates_round_trip(p in point_in_unit_cube(), case in any::<RefinementCase<U3>>()) {
        prop_assume!(case.is_refined());
        for child in 0..U3::n_children(case) {
            let child_point = U3::cell_to_child_coordinates(&p, child, case);
            let back = U3::child_to_cell_coordinates(&child_point, child, case);
            assert_approx_matrix_eq!(back.coords, p.coords, abstol = 1e-14);
        }
    }

    #[test]
    fn cell_and_child_coordinates_round_trip_2d(p in point_in_unit_square(), case in any::<RefinementCase<U2>>()) {
        prop_assume!(case.is_refined());
        for child in 0..U2::n_children(case) {
            let child_point = U2::cell_to_child_coordinates(&p, child, case);
            let back = U2::child_to_cell_coordinates(&child_point, child, case);
            assert_approx_matrix_eq!(back.coords, p.coords, abstol = 1e-14);
        }
    }

    #[test]
    fn point_lies_in_the_child_that_contains_it(p in point_in_unit_cube()) {
        let child = U3::child_cell_from_point(&p);
        let child_point = U3::cell_to_child_coordinates(&p, child, RefinementCase::<U3>::CUT_XYZ);
        prop_assert!(U3::is_inside_unit_cell_with_tolerance(&child_point, 1e-12));
    }

    #[test]
    fn d_linear_shape_functions_reproduce_linear_functions(p in point_in_unit_cube()) {
        let mut sum = 0.0;
        let mut interpolated = Vector3::zeros();
        let mut gradient_sum = Vector3::zeros();
        for v in 0..U3::VERTICES_PER_CELL {
            let phi = U3::d_linear_shape_function(&p, v);
            sum += phi;
            interpolated += U3::unit_cell_vertex(v).coords * phi;
            gradient_sum += U3::d_linear_shape_function_gradient(&p, v);
        }
        prop_assert!((sum - 1.0).abs() <= 1e-14);
        assert_approx_matrix_eq!(interpolated, p.coords, abstol = 1e-14);
        assert_approx_matrix_eq!(gradient_sum, Vector3::<f64>::zeros(), abstol = 1e-14);
    }

    #[test]
    fn d_linear_gradients_match_finite_differences(p in point_in_unit_square(), v in 0..4usize) {
        let h = 1e-6;
        let gradient = U2::d_linear_shape_function_gradient(&p, v);
        for axis in 0..2 {
            let mut forward = p;
            let mut backward = p;
            forward[axis] += h;
            backward[axis] -= h;
            let fd = (U2::d_linear_shape_function(&forward, v) - U2::d_linear_shape_function(&backward, v)) / (2.0 * h);
            prop_assert!((fd - gradient[axis]).abs() <= 1e-8);
        }
    }

    #[test]
    fn projection_lands_in_unit_cell(coords in [-2.0..3.0, -2.0..3.0, -2.0..3.0]) {
        let p = Point3::from(coords);
        let projected = U3::project_to_unit_cell(&p);
        prop_assert!(U3::is_inside_unit_cell(&projected));
        let distance = U3::distance_to_unit_cell(&p);
        prop_assert_eq!(distance, (p - projected).amax());
    }

    #[test]
    fn face_orientation_round_trip_is_consistent(orientation in any::<FaceOrientation>(), face in 0..6usize) {
        // Face vertices seen with any orientation are the same set as in standard orientation
        let standard: HashSet<_> = (0..4).map(|v| U3::face_to_cell_vertices(face, v, FaceOrientation::STANDARD)).collect();
        let oriented: HashSet<_> = (0..4).map(|v| U3::face_to_cell_vertices(face, v, orientation)).collect();
        prop_assert_eq!(standard, oriented);
    }
}
