//! Combinatorics of the reference cell `[0, 1]^dim`.
//!
//! The reference cell of dimension `d` is described by the [`GeometryInfo`] trait, implemented
//! for the dimension types [`U0`](nalgebra::U0) to [`U4`](nalgebra::U4). Dimensions one, two
//! and three are fully described. Dimension zero (a point) and dimension four only provide the
//! object counts and the few tables that exist for them; everything else panics.
//!
//! Vertices are numbered lexicographically, so that vertex `v` of the unit cell has coordinate
//! `x_i = (v >> i) & 1`. Faces are numbered so that faces `2i` and `2i + 1` are perpendicular to
//! axis `i`, at `x_i = 0` and `x_i = 1` respectively.
use kjerne_traits::allocators::CellAllocator;
use nalgebra::{DefaultAllocator, DimName, OPoint, OVector, U1};
use serde::{Deserialize, Serialize};

mod alternating_form;
mod degenerate;
mod dim1;
mod dim2;
mod dim3;
mod refinement_case;
mod subface_case;

pub use alternating_form::{alternating_form_at_vertices, WedgeProduct};
pub use refinement_case::{InvalidRefinementCase, RefinementCase};
pub use subface_case::{InvalidSubfaceCase, SubfaceCase};

/// Number of vertices of the reference cell of the given dimension.
pub const fn vertices_per_cell(dim: usize) -> usize {
    1 << dim
}

/// Number of lines of the reference cell of the given dimension.
///
/// Extruding a cell of dimension `d - 1` doubles its lines and adds one line per vertex.
pub const fn lines_per_cell(dim: usize) -> usize {
    if dim == 0 {
        0
    } else {
        2 * lines_per_cell(dim - 1) + vertices_per_cell(dim - 1)
    }
}

/// Number of quadrilaterals of the reference cell of the given dimension.
pub const fn quads_per_cell(dim: usize) -> usize {
    if dim == 0 {
        0
    } else {
        2 * quads_per_cell(dim - 1) + lines_per_cell(dim - 1)
    }
}

/// Number of hexahedra of the reference cell of the given dimension.
pub const fn hexes_per_cell(dim: usize) -> usize {
    if dim == 0 {
        0
    } else {
        2 * hexes_per_cell(dim - 1) + quads_per_cell(dim - 1)
    }
}

/// Number of faces of the reference cell of the given dimension.
pub const fn faces_per_cell(dim: usize) -> usize {
    2 * dim
}

/// Number of children of the reference cell of the given dimension under isotropic refinement.
pub const fn max_children_per_cell(dim: usize) -> usize {
    1 << dim
}

/// Number of vertices of a face of the reference cell of the given dimension.
pub const fn vertices_per_face(dim: usize) -> usize {
    if dim == 0 {
        0
    } else {
        vertices_per_cell(dim - 1)
    }
}

pub const fn lines_per_face(dim: usize) -> usize {
    if dim == 0 {
        0
    } else {
        lines_per_cell(dim - 1)
    }
}

pub const fn quads_per_face(dim: usize) -> usize {
    if dim == 0 {
        0
    } else {
        quads_per_cell(dim - 1)
    }
}

/// Number of children of a face under isotropic refinement of the cell.
pub const fn max_children_per_face(dim: usize) -> usize {
    if dim == 0 {
        0
    } else {
        max_children_per_cell(dim - 1)
    }
}

/// The kinds of objects a reference cell is built from, named by their dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryPrimitive {
    Vertex,
    Line,
    Quad,
    Hex,
}

impl GeometryPrimitive {
    /// The primitive of the given dimension.
    ///
    /// # Panics
    ///
    /// Panics if `dim > 3`.
    pub fn from_dim(dim: usize) -> Self {
        match dim {
            0 => Self::Vertex,
            1 => Self::Line,
            2 => Self::Quad,
            3 => Self::Hex,
            _ => panic!("there is no geometry primitive of dimension {}", dim),
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            Self::Vertex => 0,
            Self::Line => 1,
            Self::Quad => 2,
            Self::Hex => 3,
        }
    }
}

impl From<GeometryPrimitive> for usize {
    fn from(primitive: GeometryPrimitive) -> Self {
        primitive.dim()
    }
}

/// How a face is seen from a cell, relative to the standard orientation of the face.
///
/// `orientation == false` means that the face normal points the other way, `flip` is a rotation
/// of the face by 180 degrees and `rotation` a rotation by 90 degrees. In two dimensions only
/// `orientation` is meaningful, in one dimension none of them are.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceOrientation {
    pub orientation: bool,
    pub flip: bool,
    pub rotation: bool,
}

impl Default for FaceOrientation {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl FaceOrientation {
    /// The orientation of a face seen from the cell that defines its standard numbering.
    pub const STANDARD: Self = Self {
        orientation: true,
        flip: false,
        rotation: false,
    };

    pub const fn new(orientation: bool, flip: bool, rotation: bool) -> Self {
        Self {
            orientation,
            flip,
            rotation,
        }
    }

    /// All eight combinations of the three flags.
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (0..8u8).map(|bits| Self::new(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0))
    }

    /// The flags as indices into the `[orientation][flip][rotation]` dimensions of a table.
    pub(crate) fn indices(&self) -> (usize, usize, usize) {
        (self.orientation as usize, self.flip as usize, self.rotation as usize)
    }
}

pub(crate) fn not_implemented(dim: usize, what: &str) -> ! {
    panic!("{} is not implemented for dimension {}", what, dim)
}

pub(crate) fn impossible(dim: usize, what: &str) -> ! {
    panic!("{} is impossible in dimension {}", what, dim)
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for nalgebra::U0 {}
    impl Sealed for nalgebra::U1 {}
    impl Sealed for nalgebra::U2 {}
    impl Sealed for nalgebra::U3 {}
    impl Sealed for nalgebra::U4 {}
}

/// Topology and geometry of the reference cell `[0, 1]^dim`, for `dim` given by `Self`.
///
/// All functions are pure lookups. Indices out of range are programming errors and panic, as do
/// functions that are not available for the dimension at hand.
pub trait GeometryInfo: DimName + sealed::Sealed {
    /// The dimension of the faces of the cell.
    type FaceDim: DimName;

    const DIM: usize;

    const VERTICES_PER_CELL: usize = vertices_per_cell(Self::DIM);
    const LINES_PER_CELL: usize = lines_per_cell(Self::DIM);
    const QUADS_PER_CELL: usize = quads_per_cell(Self::DIM);
    const HEXES_PER_CELL: usize = hexes_per_cell(Self::DIM);
    const FACES_PER_CELL: usize = faces_per_cell(Self::DIM);
    const MAX_CHILDREN_PER_CELL: usize = max_children_per_cell(Self::DIM);

    const VERTICES_PER_FACE: usize = vertices_per_face(Self::DIM);
    const LINES_PER_FACE: usize = lines_per_face(Self::DIM);
    const QUADS_PER_FACE: usize = quads_per_face(Self::DIM);
    const MAX_CHILDREN_PER_FACE: usize = max_children_per_face(Self::DIM);

    /// Number of distinct refinement cases of a cell, `2^dim`.
    const N_REFINEMENT_CASES: usize = 1 << Self::DIM;

    /// Maps the UCD numbering of vertices to the lexicographic numbering.
    fn ucd_to_lexicographic() -> &'static [usize] {
        not_implemented(Self::DIM, "ucd_to_lexicographic")
    }

    /// Maps the OpenDX numbering of vertices to the lexicographic numbering.
    fn dx_to_lexicographic() -> &'static [usize] {
        not_implemented(Self::DIM, "dx_to_lexicographic")
    }

    /// For each face, the axis its normal is parallel to.
    fn unit_normal_direction() -> &'static [usize];

    /// For each face, the sign of its outward normal along [`Self::unit_normal_direction`].
    fn unit_normal_orientation() -> &'static [i32];

    /// For each face, the face on the other side of the cell.
    fn opposite_face() -> &'static [usize];

    /// The faces adjacent to a vertex.
    fn vertex_to_face(vertex: usize) -> &'static [usize] {
        let _ = vertex;
        not_implemented(Self::DIM, "vertex_to_face")
    }

    /// The outward unit normal of a face.
    fn unit_normal_vector(face: usize) -> OVector<f64, Self>
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        assert!(face < Self::FACES_PER_CELL, "face index {} out of range", face);
        let mut normal = OVector::<f64, Self>::zeros();
        normal[Self::unit_normal_direction()[face]] = Self::unit_normal_orientation()[face] as f64;
        normal
    }

    /// Tangential vector `i` of a face, for `i < dim - 1`.
    ///
    /// The tangential vectors of a face and its outward normal form a right-handed system.
    fn unit_tangential_vectors(face: usize, i: usize) -> OVector<f64, Self>
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        let _ = (face, i);
        not_implemented(Self::DIM, "unit_tangential_vectors")
    }

    /// Number of children of a cell refined with the given case.
    fn n_children(refinement_case: RefinementCase<Self>) -> usize {
        const N_CHILDREN: [usize; 8] = [0, 2, 2, 4, 2, 4, 4, 8];
        let bits = refinement_case.bits();
        match N_CHILDREN.get(bits as usize) {
            Some(&n) => n,
            None => 1 << bits.count_ones(),
        }
    }

    /// Number of subfaces of a face refined with the given case.
    fn n_subfaces(subface_case: SubfaceCase<Self>) -> usize {
        let _ = subface_case;
        impossible(Self::DIM, "n_subfaces")
    }

    /// Area of a subface relative to the area of its face.
    fn subface_ratio(subface_case: SubfaceCase<Self>, subface: usize) -> f64 {
        let _ = (subface_case, subface);
        not_implemented(Self::DIM, "subface_ratio")
    }

    /// The refinement case a face inherits from its cell.
    fn face_refinement_case(
        cell_refinement_case: RefinementCase<Self>,
        face: usize,
        face_orientation: FaceOrientation,
    ) -> RefinementCase<Self::FaceDim> {
        let _ = (cell_refinement_case, face, face_orientation);
        impossible(Self::DIM, "face_refinement_case")
    }

    /// The refinement case a line inherits from its cell.
    fn line_refinement_case(cell_refinement_case: RefinementCase<Self>, line: usize) -> RefinementCase<U1> {
        let _ = (cell_refinement_case, line);
        not_implemented(Self::DIM, "line_refinement_case")
    }

    /// The coarsest cell refinement case that refines a face at least as given.
    fn min_cell_refinement_case_for_face_refinement(
        face_refinement_case: RefinementCase<Self::FaceDim>,
        face: usize,
        face_orientation: FaceOrientation,
    ) -> RefinementCase<Self> {
        let _ = (face_refinement_case, face, face_orientation);
        impossible(Self::DIM, "min_cell_refinement_case_for_face_refinement")
    }

    /// The coarsest cell refinement case that refines the given line.
    fn min_cell_refinement_case_for_line_refinement(line: usize) -> RefinementCase<Self> {
        let _ = line;
        not_implemented(Self::DIM, "min_cell_refinement_case_for_line_refinement")
    }

    /// The child of a refined cell that is adjacent to a subface of one of its faces.
    ///
    /// `face_refinement_case` is the refinement of the face in its standard orientation, which
    /// may be finer than the refinement the cell induces on the face. Subfaces are numbered
    /// according to `face_refinement_case`.
    ///
    /// # Panics
    ///
    /// Panics if `refinement_case` is no refinement, if `subface` does not exist, or if the face
    /// refinement is coarser than what the cell refinement induces on the face.
    fn child_cell_on_face(
        refinement_case: RefinementCase<Self>,
        face: usize,
        subface: usize,
        face_orientation: FaceOrientation,
        face_refinement_case: RefinementCase<Self::FaceDim>,
    ) -> usize {
        let _ = (refinement_case, face, subface, face_orientation, face_refinement_case);
        not_implemented(Self::DIM, "child_cell_on_face")
    }

    /// The cell vertex that is vertex `vertex` of line `line`.
    fn line_to_cell_vertices(line: usize, vertex: usize) -> usize {
        let _ = (line, vertex);
        not_implemented(Self::DIM, "line_to_cell_vertices")
    }

    /// The cell vertex that is vertex `vertex` of face `face`, seen with the given orientation.
    fn face_to_cell_vertices(face: usize, vertex: usize, face_orientation: FaceOrientation) -> usize {
        // Vertex i of a face touches child i of the isotropically refined face
        Self::child_cell_on_face(
            RefinementCase::isotropic_refinement(),
            face,
            vertex,
            face_orientation,
            RefinementCase::isotropic_refinement(),
        )
    }

    /// The cell line that is line `line` of face `face`, seen with the given orientation.
    fn face_to_cell_lines(face: usize, line: usize, face_orientation: FaceOrientation) -> usize {
        let _ = (face, line, face_orientation);
        not_implemented(Self::DIM, "face_to_cell_lines")
    }

    /// Maps a face vertex in standard numbering to the numbering seen with the given orientation.
    fn standard_to_real_face_vertex(vertex: usize, face_orientation: FaceOrientation) -> usize {
        let _ = (vertex, face_orientation);
        impossible(Self::DIM, "standard_to_real_face_vertex")
    }

    /// Maps a face vertex seen with the given orientation to the standard numbering.
    fn real_to_standard_face_vertex(vertex: usize, face_orientation: FaceOrientation) -> usize {
        let _ = (vertex, face_orientation);
        impossible(Self::DIM, "real_to_standard_face_vertex")
    }

    /// Maps a face line in standard numbering to the numbering seen with the given orientation.
    fn standard_to_real_face_line(line: usize, face_orientation: FaceOrientation) -> usize {
        let _ = (line, face_orientation);
        not_implemented(Self::DIM, "standard_to_real_face_line")
    }

    /// Maps a face line seen with the given orientation to the standard numbering.
    fn real_to_standard_face_line(line: usize, face_orientation: FaceOrientation) -> usize {
        let _ = (line, face_orientation);
        not_implemented(Self::DIM, "real_to_standard_face_line")
    }

    /// Maps a vertex of a line in standard numbering to the numbering seen with the given
    /// line orientation.
    fn standard_to_real_line_vertex(vertex: usize, line_orientation: bool) -> usize {
        let _ = (vertex, line_orientation);
        not_implemented(Self::DIM, "standard_to_real_line_vertex")
    }

    /// For a quad vertex, the index of a line of the quad containing it and the index of the
    /// vertex within that line.
    fn standard_quad_vertex_to_line_vertex_index(vertex: usize) -> [usize; 2] {
        let _ = vertex;
        not_implemented(Self::DIM, "standard_quad_vertex_to_line_vertex_index")
    }

    /// For a hex vertex, the index of a face of the hex containing it and the index of the
    /// vertex within that face.
    fn standard_hex_vertex_to_quad_vertex_index(vertex: usize) -> [usize; 2] {
        let _ = vertex;
        not_implemented(Self::DIM, "standard_hex_vertex_to_quad_vertex_index")
    }

    /// For a hex line, the index of a face of the hex containing it and the index of the line
    /// within that face.
    fn standard_hex_line_to_quad_line_index(line: usize) -> [usize; 2] {
        let _ = line;
        not_implemented(Self::DIM, "standard_hex_line_to_quad_line_index")
    }

    /// Coordinates of a vertex of the unit cell.
    fn unit_cell_vertex(vertex: usize) -> OPoint<f64, Self>
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        let _ = vertex;
        not_implemented(Self::DIM, "unit_cell_vertex")
    }

    /// The child of an isotropically refined cell that contains the point.
    ///
    /// Points on the boundary between children belong to the child with the lower index.
    fn child_cell_from_point(p: &OPoint<f64, Self>) -> usize
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        let _ = p;
        not_implemented(Self::DIM, "child_cell_from_point")
    }

    /// Maps a point of the unit cell to the unit cell coordinates of a child.
    fn cell_to_child_coordinates(
        p: &OPoint<f64, Self>,
        child: usize,
        refinement_case: RefinementCase<Self>,
    ) -> OPoint<f64, Self>
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        let _ = (p, child, refinement_case);
        not_implemented(Self::DIM, "cell_to_child_coordinates")
    }

    /// Maps a point in the unit cell coordinates of a child to the coordinates of the parent.
    fn child_to_cell_coordinates(
        p: &OPoint<f64, Self>,
        child: usize,
        refinement_case: RefinementCase<Self>,
    ) -> OPoint<f64, Self>
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        let _ = (p, child, refinement_case);
        not_implemented(Self::DIM, "child_to_cell_coordinates")
    }

    fn is_inside_unit_cell(p: &OPoint<f64, Self>) -> bool
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        Self::is_inside_unit_cell_with_tolerance(p, 0.0)
    }

    /// Whether the point lies in the unit cell enlarged by `eps` in every direction.
    fn is_inside_unit_cell_with_tolerance(p: &OPoint<f64, Self>, eps: f64) -> bool
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        if Self::DIM == 0 {
            not_implemented(Self::DIM, "is_inside_unit_cell")
        }
        p.coords.iter().all(|&x| x >= -eps && x <= 1.0 + eps)
    }

    /// The point of the unit cell closest to `p`.
    fn project_to_unit_cell(p: &OPoint<f64, Self>) -> OPoint<f64, Self>
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        p.map(|x| x.clamp(0.0, 1.0))
    }

    /// The infinity norm distance of the point to the unit cell, zero inside the cell.
    fn distance_to_unit_cell(p: &OPoint<f64, Self>) -> f64
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        p.coords
            .iter()
            .fold(0.0, |distance: f64, &x| distance.max(-x).max(x - 1.0))
    }

    /// The d-linear shape function associated with a vertex, evaluated at `xi`.
    fn d_linear_shape_function(xi: &OPoint<f64, Self>, vertex: usize) -> f64
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        let _ = (xi, vertex);
        not_implemented(Self::DIM, "d_linear_shape_function")
    }

    /// Gradient of the d-linear shape function associated with a vertex, evaluated at `xi`.
    fn d_linear_shape_function_gradient(xi: &OPoint<f64, Self>, vertex: usize) -> OVector<f64, Self>
    where
        DefaultAllocator: CellAllocator<Self>,
    {
        let _ = (xi, vertex);
        not_implemented(Self::DIM, "d_linear_shape_function_gradient")
    }
}

pub(crate) fn assert_vertex_in_range<D: GeometryInfo>(vertex: usize) {
    assert!(
        vertex < D::VERTICES_PER_CELL,
        "vertex index {} out of range for {} vertices",
        vertex,
        D::VERTICES_PER_CELL
    );
}

pub(crate) fn assert_line_in_range<D: GeometryInfo>(line: usize) {
    assert!(
        line < D::LINES_PER_CELL,
        "line index {} out of range for {} lines",
        line,
        D::LINES_PER_CELL
    );
}

pub(crate) fn assert_face_in_range<D: GeometryInfo>(face: usize) {
    assert!(
        face < D::FACES_PER_CELL,
        "face index {} out of range for {} faces",
        face,
        D::FACES_PER_CELL
    );
}

pub(crate) fn assert_coordinates_in_unit_cell<D: GeometryInfo>(p: &OPoint<f64, D>)
where
    DefaultAllocator: CellAllocator<D>,
{
    for &x in p.coords.iter() {
        assert!((0.0..=1.0).contains(&x), "coordinate {} is outside the unit cell", x);
    }
}
