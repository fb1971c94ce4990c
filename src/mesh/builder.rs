//! Mesh construction utilities.
//!
//! This module provides functions for building half-edge meshes from
//! polygon soup (vertex positions plus per-face vertex index lists), the
//! representation used by mesh file formats.
//!
//! Construction closes every boundary of the input with a synthetic
//! boundary-loop face, so the finished mesh has no half-edge without a twin
//! and every traversal terminates.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Corner, Edge, Face, HalfEdge, HalfEdgeMesh};
use super::index::{CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{GeomError, Result};

/// Pairing state of an undirected edge during construction.
struct EdgeSlot<I: MeshIndex> {
    edge: EdgeId<I>,
    halfedge: HalfEdgeId<I>,
    count: usize,
}

/// Build a half-edge mesh from vertices and polygonal faces.
///
/// Faces may mix triangles, quads, and larger polygons. Each face lists its
/// vertex indices counter-clockwise.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of faces, each a list of at least three vertex indices
///
/// # Returns
/// A half-edge mesh, or an error if the input is empty, references an
/// out-of-range vertex, contains a degenerate face, leaves a vertex
/// unreferenced, or is non-manifold.
///
/// # Example
/// ```
/// use sliver::mesh::{build_from_polygons, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// assert_eq!(mesh.num_boundary_loops(), 1);
/// ```
pub fn build_from_polygons<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[Vec<usize>],
) -> Result<HalfEdgeMesh<I>> {
    if faces.is_empty() {
        return Err(GeomError::EmptyMesh);
    }

    // Validate vertex indices and face shapes
    for (fi, face) in faces.iter().enumerate() {
        if face.len() < 3 {
            return Err(GeomError::DegenerateFace { face: fi });
        }
        for (j, &vi) in face.iter().enumerate() {
            if vi >= vertices.len() {
                return Err(GeomError::InvalidVertexIndex { face: fi, vertex: vi });
            }
            if face[..j].contains(&vi) {
                return Err(GeomError::DegenerateFace { face: fi });
            }
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());

    // Add vertices
    let vertex_ids: Vec<VertexId<I>> = vertices.iter().map(|&pos| mesh.add_vertex(pos)).collect();

    // Pairing state per undirected edge, keyed by the sorted vertex pair.
    let mut edge_map: HashMap<(usize, usize), EdgeSlot<I>> = HashMap::new();

    // Tracks which half-edges have been matched with a twin. Kept separate
    // from the twin pointers themselves: boundary synthesis assigns twins
    // one cycle step ahead of marking them, and uses the unmarked state to
    // detect the end of each loop.
    let mut has_twin: Vec<bool> = Vec::new();

    // First pass: create all half-edges, edges, and real faces
    for face in faces {
        let n = face.len();
        let base = mesh.num_halfedges();
        for _ in 0..n {
            mesh.halfedges.push(HalfEdge::new());
            has_twin.push(false);
        }

        let face_id = FaceId::<I>::new(mesh.faces.len());
        mesh.faces.push(Face::new(HalfEdgeId::new(base)));

        for j in 0..n {
            let he = HalfEdgeId::<I>::new(base + j);
            let v0 = face[j];
            let v1 = face[(j + 1) % n];

            {
                let h = mesh.halfedge_mut(he);
                h.origin = vertex_ids[v0];
                h.next = HalfEdgeId::new(base + (j + 1) % n);
                h.prev = HalfEdgeId::new(base + (j + n - 1) % n);
                h.face = face_id;
            }
            mesh.vertex_mut(vertex_ids[v0]).halfedge = he;

            // Resolve the full edge and twin via the undirected key
            let key = (v0.min(v1), v0.max(v1));
            match edge_map.get_mut(&key) {
                None => {
                    let edge_id = EdgeId::<I>::new(mesh.edges.len());
                    mesh.edges.push(Edge::new(he));
                    mesh.halfedge_mut(he).edge = edge_id;
                    edge_map.insert(
                        key,
                        EdgeSlot {
                            edge: edge_id,
                            halfedge: he,
                            count: 1,
                        },
                    );
                }
                Some(slot) => {
                    slot.count += 1;
                    if slot.count > 2 {
                        return Err(GeomError::NonManifoldEdge {
                            v0: key.0,
                            v1: key.1,
                        });
                    }
                    let other = slot.halfedge;
                    let edge_id = slot.edge;
                    mesh.halfedge_mut(he).edge = edge_id;
                    mesh.halfedge_mut(he).twin = other;
                    mesh.halfedge_mut(other).twin = he;
                    has_twin[he.index()] = true;
                    has_twin[other.index()] = true;
                }
            }
        }
    }

    // Second pass: close each boundary with a synthetic loop face
    synthesize_boundary_loops(&mut mesh, &mut has_twin);

    // Third pass: one corner per interior half-edge
    for i in 0..mesh.num_halfedges() {
        let he = HalfEdgeId::<I>::new(i);
        if mesh.is_boundary_halfedge(he) {
            continue;
        }
        let corner_id = CornerId::<I>::new(mesh.corners.len());
        mesh.corners.push(Corner::new(he));
        mesh.halfedge_mut(he).corner = corner_id;
    }

    // Final validation
    if let Some(v) = mesh.vertex_ids().find(|&v| !mesh.vertex(v).halfedge.is_valid()) {
        return Err(GeomError::IsolatedVertex { vertex: v.index() });
    }
    // A face all of whose edges are boundary edges shares nothing with the
    // rest of the mesh; a single-polygon mesh is exempt
    if mesh.num_faces() > 1 {
        if let Some(f) = mesh
            .face_ids()
            .find(|&f| mesh.face_halfedges(f).all(|he| mesh.is_boundary_edge(he)))
        {
            return Err(GeomError::IsolatedFace { face: f.index() });
        }
    }

    Ok(mesh)
}

/// Close every open boundary of the mesh with a synthetic boundary-loop face.
///
/// Starting from an unmatched half-edge, the loop is discovered by walking
/// `next` and pivoting across matched twins until the next unmatched half-edge
/// appears. Each step creates the synthetic twin of the current half-edge.
/// The synthetic half-edges run opposite to the interior orientation, so their
/// cycle is linked in reverse.
fn synthesize_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, has_twin: &mut Vec<bool>) {
    let num_interior = mesh.num_halfedges();

    for i in 0..num_interior {
        if has_twin[i] {
            continue;
        }
        let start = HalfEdgeId::<I>::new(i);

        let face_id = FaceId::<I>::new(mesh.faces.len());
        mesh.faces.push(Face {
            halfedge: HalfEdgeId::invalid(),
            boundary_loop: true,
        });
        mesh.boundaries.push(face_id);

        let mut cycle: Vec<HalfEdgeId<I>> = Vec::new();
        let mut he = start;
        loop {
            let boundary_he = HalfEdgeId::<I>::new(mesh.num_halfedges());
            mesh.halfedges.push(HalfEdge::new());
            has_twin.push(false);
            cycle.push(boundary_he);

            // Pivot around dest(he) to the next unmatched half-edge. The walk
            // comes back to `start` when the loop closes; `start` already has
            // its twin assigned but is still unmarked, which stops the pivot.
            let mut nxt = mesh.next(he);
            while has_twin[nxt.index()] {
                nxt = mesh.next(mesh.twin(nxt));
            }

            let origin = mesh.origin(nxt);
            let edge = mesh.edge_of(he);
            {
                let b = mesh.halfedge_mut(boundary_he);
                b.origin = origin;
                b.edge = edge;
                b.face = face_id;
                b.twin = he;
                b.on_boundary = true;
            }
            mesh.halfedge_mut(he).twin = boundary_he;

            he = nxt;
            if he == start {
                break;
            }
        }

        // Link the synthetic cycle in reverse of discovery order
        let n = cycle.len();
        for j in 0..n {
            let next = cycle[(j + n - 1) % n];
            let prev = cycle[(j + 1) % n];
            mesh.halfedge_mut(cycle[j]).next = next;
            mesh.halfedge_mut(cycle[j]).prev = prev;
            has_twin[cycle[j].index()] = true;
            let twin = mesh.twin(cycle[j]);
            has_twin[twin.index()] = true;
        }
        mesh.face_mut(face_id).halfedge = cycle[0];
    }
}

/// Build a half-edge mesh from vertices and triangle faces.
///
/// Convenience wrapper around [`build_from_polygons`] for fixed-size input.
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    let faces: Vec<Vec<usize>> = faces.iter().map(|f| f.to_vec()).collect();
    build_from_polygons(vertices, &faces)
}

/// Build a half-edge mesh from vertices and quad faces.
///
/// Convenience wrapper around [`build_from_polygons`] for fixed-size input.
pub fn build_from_quads<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 4]],
) -> Result<HalfEdgeMesh<I>> {
    let faces: Vec<Vec<usize>> = faces.iter().map(|f| f.to_vec()).collect();
    build_from_polygons(vertices, &faces)
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Boundary-loop faces are not emitted. Returns a (vertices, faces) tuple.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshKind;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2]];
        (vertices, faces)
    }

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
        // Two triangles sharing an edge
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2], vec![1, 0, 3]];
        (vertices, faces)
    }

    fn single_quad() -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.num_corners(), 3);
        // 3 interior half-edges + 3 synthetic boundary half-edges
        assert_eq!(mesh.num_halfedges(), 6);
        assert_eq!(mesh.num_boundary_loops(), 1);
        assert_eq!(mesh.euler_characteristic(), 1);
        assert!(mesh.is_valid());

        // All vertices should be on boundary
        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_boundary_loop_orientation() {
        let (vertices, faces) = single_triangle();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        let loop_face = mesh.boundary_loops()[0];
        assert!(mesh.is_boundary_loop(loop_face));
        assert_eq!(mesh.face_degree(loop_face), 3);

        // Each synthetic half-edge reverses its interior twin
        for he in mesh.face_halfedges(loop_face) {
            assert!(mesh.is_boundary_halfedge(he));
            let twin = mesh.twin(he);
            assert!(!mesh.is_boundary_halfedge(twin));
            assert_eq!(mesh.origin(he), mesh.dest(twin));
            assert_eq!(mesh.dest(he), mesh.origin(twin));
            // Consecutive boundary half-edges chain head to tail
            assert_eq!(mesh.origin(mesh.next(he)), mesh.dest(he));
        }
    }

    #[test]
    fn test_two_triangles() {
        let (vertices, faces) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_edges(), 5);
        // 6 interior half-edges + 4 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 10);
        assert_eq!(mesh.num_boundary_loops(), 1);
        assert_eq!(mesh.euler_characteristic(), 1);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_single_quad() {
        let (vertices, faces) = single_quad();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_edges(), 4);
        // 4 interior half-edges + 4 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 8);
        assert_eq!(mesh.num_boundary_loops(), 1);
        assert_eq!(mesh.euler_characteristic(), 1);
        assert!(mesh.is_valid());

        assert!(mesh.is_quad_mesh());
        assert!(!mesh.is_triangle_mesh());
    }

    #[test]
    fn test_pentagon() {
        let vertices = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.31, 0.95, 0.0),
            Point3::new(-0.81, 0.59, 0.0),
            Point3::new(-0.81, -0.59, 0.0),
            Point3::new(0.31, -0.95, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3, 4]];
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.face_degree(FaceId::new(0)), 5);
        assert_eq!(mesh.kind(), MeshKind::Ngon);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_mixed_mesh_kind() {
        // A quad and a triangle sharing an edge
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 2]];
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        assert_eq!(mesh.kind(), MeshKind::Mixed);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_vertex_corners() {
        let (vertices, faces) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        // Vertices 0 and 1 sit on both triangles, 2 and 3 on one each
        let expected = [2usize, 2, 1, 1];
        for (v, &count) in mesh.vertex_ids().zip(expected.iter()) {
            let corners: Vec<_> = mesh.vertex_corners(v).collect();
            assert_eq!(corners.len(), count, "vertex {:?}", v);
            for c in corners {
                assert_eq!(mesh.corner_vertex(c), v);
            }
        }
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(vertices.len(), out_verts.len());
        assert_eq!(faces.len(), out_faces.len());
        for face in &out_faces {
            assert_eq!(face.len(), 3);
        }

        // Positions should match
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
    }

    #[test]
    fn test_empty_input() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces: Vec<Vec<usize>> = vec![];

        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(result, Err(GeomError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![vec![0, 1, 2]]; // Indices 1 and 2 are invalid

        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(
            result,
            Err(GeomError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 0, 2]]; // Repeated vertex index

        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(result, Err(GeomError::DegenerateFace { face: 0 })));

        let faces = vec![vec![0, 1]]; // Too few vertices
        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(result, Err(GeomError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_non_manifold_edge() {
        // Three triangles sharing the edge (0, 1)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let faces = vec![vec![0, 1, 2], vec![1, 0, 3], vec![0, 1, 4]];

        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(
            result,
            Err(GeomError::NonManifoldEdge { v0: 0, v1: 1 })
        ));
    }

    #[test]
    fn test_isolated_vertex() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(9.0, 9.0, 9.0), // Referenced by no face
        ];
        let faces = vec![vec![0, 1, 2]];

        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(result, Err(GeomError::IsolatedVertex { vertex: 3 })));
    }

    #[test]
    fn test_isolated_face() {
        // Two triangles sharing no edge
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(3.5, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2], vec![3, 4, 5]];

        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(result, Err(GeomError::IsolatedFace { .. })));

        // A single polygon is a complete mesh on its own
        let mesh: HalfEdgeMesh<u32> =
            build_from_polygons(&vertices[..3], &[vec![0, 1, 2]]).unwrap();
        assert!(!mesh.has_isolated_faces());

        // Faces that share an edge are never isolated
        let (vertices, faces) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();
        assert!(!mesh.has_isolated_faces());
    }

    #[test]
    fn test_closed_tetrahedron_has_no_boundary() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![2, 0, 3]];
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_boundary_loops(), 0);
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert!(mesh.is_valid());
        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_two_boundary_loops() {
        // A 3x3 vertex grid of quads with the center face missing:
        // outer boundary plus a hole
        let mut vertices = Vec::new();
        for j in 0..4 {
            for i in 0..4 {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        let mut faces = Vec::new();
        for j in 0..3usize {
            for i in 0..3usize {
                if i == 1 && j == 1 {
                    continue;
                }
                let v00 = j * 4 + i;
                faces.push(vec![v00, v00 + 1, v00 + 5, v00 + 4]);
            }
        }

        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();
        assert_eq!(mesh.num_faces(), 8);
        assert_eq!(mesh.num_boundary_loops(), 2);
        assert_eq!(mesh.euler_characteristic(), 0);
        assert!(mesh.is_valid());
    }
}
