//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! for polygonal meshes. This structure enables O(1) adjacency queries and is
//! the foundation for the discrete differential geometry operators.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions
//! - Each half-edge knows its **twin** (opposite half-edge), **next** (next half-edge
//!   around the face), **origin vertex**, **parent edge**, and **incident face**
//! - Each vertex stores one outgoing half-edge
//! - Each face stores one half-edge on its boundary
//! - Each interior half-edge owns a **corner**, the face angle at the half-edge's
//!   destination vertex
//!
//! # Boundary Handling
//!
//! Construction closes every boundary loop with a synthetic face so that all
//! half-edges have a twin and a valid face. Synthetic half-edges carry
//! `on_boundary = true` and their faces are flagged as boundary loops; queries
//! that enumerate faces skip them unless asked otherwise.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::{CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    pub halfedge: HalfEdgeId<I>,

    /// Named scalar values attached to this vertex (heat values, distances, ...).
    pub attributes: HashMap<String, f64>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
            attributes: HashMap::new(),
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge (pointing in the reverse direction).
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face (clockwise).
    /// This is redundant but speeds up many operations.
    pub prev: HalfEdgeId<I>,

    /// The full edge this half-edge belongs to.
    pub edge: EdgeId<I>,

    /// The face this half-edge belongs to. For synthetic half-edges this is
    /// the boundary-loop face.
    pub face: FaceId<I>,

    /// The corner at this half-edge's destination. Invalid for synthetic half-edges.
    pub corner: CornerId<I>,

    /// True for half-edges synthesized to close a boundary loop.
    pub on_boundary: bool,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new uninitialized half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            edge: EdgeId::invalid(),
            face: FaceId::invalid(),
            corner: CornerId::invalid(),
            on_boundary: false,
        }
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A full (undirected) edge, represented by one of its two half-edges.
#[derive(Debug, Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    /// The representative half-edge of this edge.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Edge<I> {
    /// Create a new edge with the given representative half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId<I>,

    /// True if this face closes a boundary loop instead of bounding a polygon.
    pub boundary_loop: bool,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new real face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self {
            halfedge,
            boundary_loop: false,
        }
    }
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self {
            halfedge: HalfEdgeId::invalid(),
            boundary_loop: false,
        }
    }
}

/// The face angle at a vertex of a face, addressed by its incoming half-edge.
///
/// The corner of half-edge `he` sits at `dest(he)`, between `he` and `next(he)`.
#[derive(Debug, Clone, Copy)]
pub struct Corner<I: MeshIndex = u32> {
    /// The half-edge opposite this corner.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Corner<I> {
    /// Create a new corner for the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

/// Classification of a mesh by its face degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    /// Every face is a triangle.
    Triangular,
    /// Every face is a quadrilateral.
    Quad,
    /// At least one face has five or more sides.
    Ngon,
    /// A mix of triangles and quadrilaterals.
    Mixed,
}

/// A half-edge mesh data structure for polygonal meshes.
///
/// This structure stores vertices, half-edges, edges, faces, and corners with
/// full connectivity information, enabling O(1) adjacency queries.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// All half-edges in the mesh, synthetic boundary half-edges included.
    pub(crate) halfedges: Vec<HalfEdge<I>>,

    /// All full edges in the mesh.
    pub(crate) edges: Vec<Edge<I>>,

    /// All faces: real faces first, boundary loops appended after them.
    pub(crate) faces: Vec<Face<I>>,

    /// All corners, one per interior half-edge.
    pub(crate) corners: Vec<Corner<I>>,

    /// The boundary-loop faces, in the order they were discovered.
    pub(crate) boundaries: Vec<FaceId<I>>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            corners: Vec::new(),
            boundaries: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Each triangle has 3 half-edges, but each interior edge is shared
        // For a closed mesh: E = 3F/2, so HE = 3F
        // For a mesh with boundary, slightly more
        let num_halfedges = num_faces * 3 + num_faces / 2;

        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            edges: Vec::with_capacity(num_halfedges / 2),
            faces: Vec::with_capacity(num_faces),
            corners: Vec::with_capacity(num_faces * 3),
            boundaries: Vec::new(),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges, synthetic boundary half-edges included.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of full edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of real faces (boundary loops excluded).
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len() - self.boundaries.len()
    }

    /// Get the number of corners.
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.corners.len()
    }

    /// Get the number of boundary loops.
    #[inline]
    pub fn num_boundary_loops(&self) -> usize {
        self.boundaries.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by ID.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get a full edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get a face by ID. Boundary-loop faces are addressable too.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get a mutable face by ID.
    #[inline]
    pub fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        &mut self.faces[id.index()]
    }

    /// Get a corner by ID.
    #[inline]
    pub fn corner(&self, id: CornerId<I>) -> &Corner<I> {
        &self.corners[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    /// Get a named scalar attribute of a vertex.
    pub fn scalar_attribute(&self, v: VertexId<I>, name: &str) -> Option<f64> {
        self.vertex(v).attributes.get(name).copied()
    }

    /// Set a named scalar attribute of a vertex.
    pub fn set_scalar_attribute(&mut self, v: VertexId<I>, name: &str, value: f64) {
        self.vertex_mut(v).attributes.insert(name.to_string(), value);
    }

    /// The boundary-loop faces of the mesh.
    #[inline]
    pub fn boundary_loops(&self) -> &[FaceId<I>] {
        &self.boundaries
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Get the full edge of a half-edge.
    #[inline]
    pub fn edge_of(&self, he: HalfEdgeId<I>) -> EdgeId<I> {
        self.halfedge(he).edge
    }

    /// Get the corner at a half-edge's destination. Invalid for synthetic half-edges.
    #[inline]
    pub fn corner_of(&self, he: HalfEdgeId<I>) -> CornerId<I> {
        self.halfedge(he).corner
    }

    /// The vertex a corner sits at.
    #[inline]
    pub fn corner_vertex(&self, c: CornerId<I>) -> VertexId<I> {
        self.dest(self.corner(c).halfedge)
    }

    /// The face a corner belongs to.
    #[inline]
    pub fn corner_face(&self, c: CornerId<I>) -> FaceId<I> {
        self.face_of(self.corner(c).halfedge)
    }

    /// Check if a half-edge was synthesized to close a boundary loop.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).on_boundary
    }

    /// Check if a face is a synthesized boundary loop.
    #[inline]
    pub fn is_boundary_loop(&self, f: FaceId<I>) -> bool {
        self.face(f).boundary_loop
    }

    /// Check if a vertex is on the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return true; // Isolated vertex
        }

        // Walk around the vertex using the same logic as VertexHalfEdgeIter
        let mut he = start;
        loop {
            if self.is_boundary_halfedge(he) {
                return true;
            }
            he = self.next(self.twin(he));
            if he == start {
                break;
            }
        }
        false
    }

    /// Check if an edge (represented by one of its half-edges) is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, he: HalfEdgeId<I>) -> bool {
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(|i| VertexId::new(i))
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs, synthetic boundary half-edges included.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(|i| HalfEdgeId::new(i))
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over all full-edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(|i| EdgeId::new(i))
    }

    /// Iterate over the IDs of real faces (boundary loops excluded).
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.num_faces()).map(|i| FaceId::new(i))
    }

    /// Iterate over all corner IDs.
    pub fn corner_ids(&self) -> impl Iterator<Item = CornerId<I>> + '_ {
        (0..self.corners.len()).map(|i| CornerId::new(i))
    }

    /// Iterate over half-edges around a vertex (outgoing half-edges).
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over real faces adjacent to a vertex.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v).filter_map(|he| {
            let f = self.face_of(he);
            if self.is_boundary_loop(f) {
                None
            } else {
                Some(f)
            }
        })
    }

    /// Iterate over full edges incident to a vertex.
    pub fn vertex_edges(&self, v: VertexId<I>) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.edge_of(he))
    }

    /// Iterate over the corners at a vertex, one per incident real face.
    ///
    /// The corner at `v` inside the face of an outgoing half-edge `he` is the
    /// corner opposite `prev(he)`, since `dest(prev(he)) == v`.
    pub fn vertex_corners(&self, v: VertexId<I>) -> impl Iterator<Item = CornerId<I>> + '_ {
        self.vertex_halfedges(v).filter_map(|he| {
            if self.is_boundary_halfedge(he) {
                None
            } else {
                Some(self.corner_of(self.prev(he)))
            }
        })
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// The number of sides of a face.
    pub fn face_degree(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// Get the three vertices of a triangular face.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    /// Get the positions of the three vertices of a triangular face.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Compute the valence (degree) of a vertex.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut min = self.vertices[0].position;
        let mut max = self.vertices[0].position;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Derived Properties ====================

    /// The Euler characteristic `V - E + F`, counting real faces only.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    /// Classify the mesh by its face degrees.
    pub fn kind(&self) -> MeshKind {
        let mut triangles = 0;
        let mut quads = 0;
        let mut ngons = 0;
        for f in self.face_ids() {
            match self.face_degree(f) {
                3 => triangles += 1,
                4 => quads += 1,
                _ => ngons += 1,
            }
        }

        if ngons > 0 {
            MeshKind::Ngon
        } else if quads == 0 {
            MeshKind::Triangular
        } else if triangles == 0 {
            MeshKind::Quad
        } else {
            MeshKind::Mixed
        }
    }

    /// Check if every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.kind() == MeshKind::Triangular
    }

    /// Check if every face is a quadrilateral.
    pub fn is_quad_mesh(&self) -> bool {
        self.kind() == MeshKind::Quad
    }

    /// Check for vertices that no face references.
    pub fn has_isolated_vertices(&self) -> bool {
        self.vertices.iter().any(|v| !v.halfedge.is_valid())
    }

    /// Check for faces that share no edge with the rest of the mesh.
    ///
    /// A face all of whose edges are boundary edges touches no other face.
    /// A mesh consisting of a single polygon is exempt.
    pub fn has_isolated_faces(&self) -> bool {
        if self.num_faces() <= 1 {
            return false;
        }
        self.face_ids()
            .any(|f| self.face_halfedges(f).all(|he| self.is_boundary_edge(he)))
    }

    /// A human-readable summary of the mesh.
    pub fn mesh_info(&self) -> String {
        let mut info = String::new();
        info.push_str(&format!("vertices: {}\n", self.num_vertices()));
        info.push_str(&format!("half-edges: {}\n", self.num_halfedges()));
        info.push_str(&format!("edges: {}\n", self.num_edges()));
        info.push_str(&format!("faces: {}\n", self.num_faces()));
        info.push_str(&format!("corners: {}\n", self.num_corners()));
        info.push_str(&format!("boundary loops: {}\n", self.num_boundary_loops()));
        info.push_str(&format!(
            "euler characteristic: {}\n",
            self.euler_characteristic()
        ));
        info.push_str(&format!("kind: {:?}\n", self.kind()));
        if let Some((min, max)) = self.bounding_box() {
            info.push_str(&format!(
                "bounding box: ({}, {}, {}) to ({}, {}, {})\n",
                min.x, min.y, min.z, max.x, max.y, max.z
            ));
        }
        info
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        // Check vertices
        for (vid, v) in self.vertices() {
            if v.halfedge.is_valid() {
                let he = self.halfedge(v.halfedge);
                if he.origin != vid {
                    return false;
                }
            }
        }

        // Check half-edges
        for (heid, he) in self.halfedges() {
            // Twin consistency
            if he.twin.is_valid() {
                let twin = self.halfedge(he.twin);
                if twin.twin != heid {
                    return false;
                }
            }

            // Next/prev consistency
            if he.next.is_valid() && self.halfedge(he.next).prev != heid {
                return false;
            }

            if he.prev.is_valid() && self.halfedge(he.prev).next != heid {
                return false;
            }

            // Edge membership
            if he.edge.is_valid() {
                let rep = self.edge(he.edge).halfedge;
                if rep != heid && self.twin(rep) != heid {
                    return false;
                }
            }

            // Corner reciprocity
            if he.corner.is_valid() && self.corner(he.corner).halfedge != heid {
                return false;
            }
        }

        // Check faces
        for f in &self.faces {
            if !f.halfedge.is_valid() {
                return false;
            }
        }

        // Boundary bookkeeping
        for &b in &self.boundaries {
            if !self.face(b).boundary_loop {
                return false;
            }
        }

        true
    }
}

/// Iterator over half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // Move to next outgoing half-edge: twin -> next
        // If he goes v -> w, then twin(he) goes w -> v.
        // next(twin(he)) is the half-edge after twin(he) in its face,
        // which originates at v (the next outgoing half-edge from v).
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
