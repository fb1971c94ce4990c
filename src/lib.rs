//! # Sliver
//!
//! A computational-geometry kernel: a half-edge mesh with its
//! differential-geometry operator layer, plus a NURBS evaluation engine.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe
//!   indices, n-gon faces, synthesized boundary loops
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Geometry operators**: areas, normals, curvatures, cotan Laplacian and
//!   mass matrices, discrete exterior calculus
//! - **Solvers**: geodesic distance by the heat method, the interior/boundary
//!   Laplacian split behind boundary first flattening
//! - **NURBS**: basis functions and derivatives, rational curve and surface
//!   evaluation with local frames and closest-point queries
//! - **OFF I/O**: reader and writer for the ASCII OFF format
//!
//! ## Quick Start
//!
//! ```no_run
//! use sliver::prelude::*;
//!
//! // Load a mesh
//! let mesh: HalfEdgeMesh = sliver::io::load("model.off").unwrap();
//!
//! // Query mesh properties
//! println!("Vertices: {}", mesh.num_vertices());
//! println!("Faces: {}", mesh.num_faces());
//!
//! // Iterate over faces
//! for face_id in mesh.face_ids() {
//!     let area = sliver::mesh::geometry::face_area(&mesh, face_id);
//!     println!("Face {:?}: area={}", face_id, area);
//! }
//!
//! // Save the mesh
//! sliver::io::save(&mesh, "output.off").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use sliver::prelude::*;
//! use nalgebra::Point3;
//!
//! // Define vertices and faces
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! // Build the mesh
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_faces(), 4);
//! ```
//!
//! ## Mesh Traversal
//!
//! The half-edge structure enables efficient traversal of mesh elements:
//!
//! ```
//! use sliver::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! // Iterate over neighbors of a vertex
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//!
//! // Iterate over faces around a vertex
//! for face in mesh.vertex_faces(v) {
//!     println!("Adjacent face: {:?}", face);
//! }
//!
//! // Get vertices of a face
//! let f = FaceId::new(0);
//! let [v0, v1, v2] = mesh.face_triangle(f);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod error;
pub mod io;
pub mod mesh;
pub mod nurbs;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use sliver::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::KernelConfig;
    pub use crate::error::{GeomError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_quads, build_from_triangles, to_face_vertex, Corner,
        CornerId, Edge, EdgeId, Face, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex,
        MeshKind, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let faces = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        // Closed mesh: 4 faces * 3 = 12 half-edges, no boundary
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.num_boundary_loops(), 0);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert!(mesh.is_valid());

        // Check that it's a closed mesh (no boundary vertices)
        for v in mesh.vertex_ids() {
            assert!(
                !mesh.is_boundary_vertex(v),
                "vertex {:?} should not be on boundary",
                v
            );
        }
    }
}
