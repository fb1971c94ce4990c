//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation and related types
//! for representing and manipulating polygonal meshes.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], which represents a polygonal mesh
//! using a half-edge (doubly-connected edge list) data structure. This
//! representation provides O(1) adjacency queries, making it efficient for
//! geometry processing algorithms. Every boundary of the input is closed with
//! a synthetic boundary-loop face during construction, so traversals never
//! fall off the mesh.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`EdgeId`] - Identifies a full edge
//! - [`FaceId`] - Identifies a face or a boundary loop
//! - [`CornerId`] - Identifies a corner (a face angle at a vertex)
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! Meshes are typically constructed from file I/O or from polygon soup:
//!
//! ```
//! use sliver::mesh::{HalfEdgeMesh, build_from_polygons};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2]];
//!
//! let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
//! ```
//!
//! # Geometry
//!
//! The discrete differential geometry operators over a mesh (areas, normals,
//! angles, curvatures, the cotan Laplacian) live in [`geometry`].

mod builder;
mod halfedge;
mod index;

pub mod geometry;

pub use builder::{build_from_polygons, build_from_quads, build_from_triangles, to_face_vertex};
pub use halfedge::{
    Corner, Edge, Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, MeshKind, Vertex,
    VertexHalfEdgeIter,
};
pub use index::{CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
