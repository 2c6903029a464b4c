//! The point and the four-dimensional hypercube.
//!
//! Neither is used as a cell in practice. They exist so that code generic over the dimension
//! can refer to the faces of a line and to the cell a hexahedron is a face of.
use super::{assert_face_in_range, FaceOrientation, GeometryInfo};
use nalgebra::{Vector4, U0, U3, U4};

impl GeometryInfo for U0 {
    // A point has no faces
    type FaceDim = U0;

    const DIM: usize = 0;

    fn ucd_to_lexicographic() -> &'static [usize] {
        &[0]
    }

    fn dx_to_lexicographic() -> &'static [usize] {
        &[0]
    }

    fn unit_normal_direction() -> &'static [usize] {
        &[]
    }

    fn unit_normal_orientation() -> &'static [i32] {
        &[]
    }

    fn opposite_face() -> &'static [usize] {
        &[]
    }
}

impl GeometryInfo for U4 {
    type FaceDim = U3;

    const DIM: usize = 4;

    fn unit_normal_direction() -> &'static [usize] {
        &[0, 0, 1, 1, 2, 2, 3, 3]
    }

    fn unit_normal_orientation() -> &'static [i32] {
        &[-1, 1, -1, 1, -1, 1, -1, 1]
    }

    fn opposite_face() -> &'static [usize] {
        &[1, 0, 3, 2, 5, 4, 7, 6]
    }

    fn unit_tangential_vectors(face: usize, i: usize) -> Vector4<f64> {
        #[rustfmt::skip]
        const TANGENTIALS: [[[f64; 4]; 3]; 8] = [
            [[ 0.0, -1.0,  0.0,  0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]],
            [[ 0.0,  1.0,  0.0,  0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]],
            [[ 0.0,  0.0, -1.0,  0.0], [0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 0.0]],
            [[ 0.0,  0.0,  1.0,  0.0], [0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 0.0]],
            [[ 0.0,  0.0,  0.0, -1.0], [1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0]],
            [[ 0.0,  0.0,  0.0,  1.0], [1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0]],
            [[-1.0,  0.0,  0.0,  0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]],
            [[ 1.0,  0.0,  0.0,  0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]],
        ];
        assert_face_in_range::<Self>(face);
        assert!(i < 3, "a face in four dimensions has three tangential vectors, not {}", i + 1);
        Vector4::from(TANGENTIALS[face][i])
    }

    fn standard_to_real_face_vertex(vertex: usize, _face_orientation: FaceOrientation) -> usize {
        assert!(vertex < Self::VERTICES_PER_FACE, "face vertex index {} out of range", vertex);
        vertex
    }

    fn real_to_standard_face_vertex(vertex: usize, _face_orientation: FaceOrientation) -> usize {
        assert!(vertex < Self::VERTICES_PER_FACE, "face vertex index {} out of range", vertex);
        vertex
    }
}
