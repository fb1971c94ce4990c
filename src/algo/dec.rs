//! Discrete exterior calculus operator builders.
//!
//! Builds the diagonal Hodge star matrices for 0-, 1-, and 2-forms and the
//! exterior derivative matrices on 0- and 1-forms as sparse matrices over the
//! mesh's vertices, edges, and real faces.
//!
//! Orientation conventions: a 1-form value on an edge is taken along the
//! edge's representative half-edge; a 2-form value on a face follows the
//! face's counter-clockwise winding. With these conventions
//! `exterior_derivative_1 * exterior_derivative_0 = 0`.

use crate::mesh::{geometry, HalfEdgeMesh, MeshIndex};

use super::sparse::CsrMatrix;

/// The Hodge star on 0-forms: a diagonal matrix of barycentric dual areas,
/// one row per vertex.
pub fn hodge_star_0<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> CsrMatrix {
    let diag: Vec<f64> = mesh
        .vertex_ids()
        .map(|v| geometry::barycentric_dual_area(mesh, v))
        .collect();
    CsrMatrix::from_diagonal(&diag)
}

/// The Hodge star on 1-forms: a diagonal matrix of cotan weights
/// `(cot(alpha) + cot(beta)) / 2`, one row per edge.
pub fn hodge_star_1<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> CsrMatrix {
    let diag: Vec<f64> = mesh
        .edge_ids()
        .map(|e| {
            let he = mesh.edge(e).halfedge;
            0.5 * (geometry::cotan(mesh, he) + geometry::cotan(mesh, mesh.twin(he)))
        })
        .collect();
    CsrMatrix::from_diagonal(&diag)
}

/// The Hodge star on 2-forms: a diagonal matrix of inverse face areas, one
/// row per real face.
pub fn hodge_star_2<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> CsrMatrix {
    let diag: Vec<f64> = mesh
        .face_ids()
        .map(|f| 1.0 / geometry::face_area(mesh, f))
        .collect();
    CsrMatrix::from_diagonal(&diag)
}

/// The exterior derivative on 0-forms, an edges-by-vertices incidence matrix:
/// `+1` at the representative half-edge's origin, `-1` at its destination.
pub fn exterior_derivative_0<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> CsrMatrix {
    let mut triplets = Vec::with_capacity(2 * mesh.num_edges());
    for e in mesh.edge_ids() {
        let he = mesh.edge(e).halfedge;
        triplets.push((e.index(), mesh.origin(he).index(), 1.0));
        triplets.push((e.index(), mesh.dest(he).index(), -1.0));
    }
    CsrMatrix::from_triplets(mesh.num_edges(), mesh.num_vertices(), triplets)
}

/// The exterior derivative on 1-forms, a faces-by-edges incidence matrix:
/// `+1` where the face traverses an edge along its representative half-edge,
/// `-1` where it traverses it against.
pub fn exterior_derivative_1<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> CsrMatrix {
    let mut triplets = Vec::new();
    for f in mesh.face_ids() {
        for he in mesh.face_halfedges(f) {
            let e = mesh.edge_of(he);
            let sign = if mesh.edge(e).halfedge == he { 1.0 } else { -1.0 };
            triplets.push((f.index(), e.index(), sign));
        }
    }
    CsrMatrix::from_triplets(mesh.num_faces(), mesh.num_edges(), triplets)
}
