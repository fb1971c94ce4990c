//! Boundary first flattening building blocks.
//!
//! Conformal flattening factors through a split of the cotan Laplacian into
//! interior and boundary blocks. This module computes that split for a
//! triangle mesh with boundary and exposes the operators built from it: the
//! Dirichlet-to-Neumann map, harmonic extension of boundary data, and the
//! rescaled boundary edge lengths for prescribed conformal scale factors.

use nalgebra::DVector;

use crate::error::{GeomError, Result};
use crate::mesh::{geometry, HalfEdgeMesh, MeshIndex, VertexId};

use super::sparse::{conjugate_gradient, CsrMatrix};

const MAX_ITERATIONS: usize = 2000;
const TOLERANCE: f64 = 1e-10;

/// Interior/boundary split of the cotan Laplacian for a triangle mesh with
/// at least one boundary loop.
///
/// Vertices are reindexed interior-first: interior vertices keep their
/// relative order and occupy indices `0..interior_count`, followed by the
/// vertices of the first boundary loop in loop order. All boundary-sized
/// inputs and outputs use that loop order.
pub struct BoundaryFirstFlattening<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    /// Mesh vertex index to permuted index.
    permutation: Vec<usize>,
    /// The first boundary loop's vertices, in loop order.
    boundary: Vec<VertexId<I>>,
    /// Length of the boundary edge leaving each boundary vertex.
    lengths: DVector<f64>,
    interior_count: usize,
    a_ii: CsrMatrix,
    a_ib: CsrMatrix,
    a_bb: CsrMatrix,
}

impl<'a, I: MeshIndex> BoundaryFirstFlattening<'a, I> {
    /// Split the Laplacian of `mesh` into interior and boundary blocks.
    ///
    /// Fails with [`GeomError::InvalidState`] if the mesh is not triangular
    /// or has no boundary.
    pub fn new(mesh: &'a HalfEdgeMesh<I>) -> Result<Self> {
        if !mesh.is_triangle_mesh() {
            return Err(GeomError::InvalidState(
                "boundary first flattening requires a triangle mesh".to_string(),
            ));
        }
        let Some(&first_loop) = mesh.boundary_loops().first() else {
            return Err(GeomError::InvalidState(
                "boundary first flattening requires a mesh with boundary".to_string(),
            ));
        };

        let mut boundary = Vec::new();
        let mut lengths = Vec::new();
        for he in mesh.face_halfedges(first_loop) {
            boundary.push(mesh.origin(he));
            lengths.push(geometry::edge_vector(mesh, he).norm());
        }

        let nv = mesh.num_vertices();
        let nb = boundary.len();
        let ni = nv - nb;

        // Interior-first permutation of vertex indices
        let mut permutation = vec![usize::MAX; nv];
        for (pos, &v) in boundary.iter().enumerate() {
            permutation[v.index()] = ni + pos;
        }
        let mut next_interior = 0;
        for slot in permutation.iter_mut() {
            if *slot == usize::MAX {
                *slot = next_interior;
                next_interior += 1;
            }
        }

        let laplace = geometry::laplace_matrix(mesh);
        let permuted: Vec<(usize, usize, f64)> = laplace
            .to_triplets()
            .into_iter()
            .map(|(i, j, v)| (permutation[i], permutation[j], v))
            .collect();
        let laplace = CsrMatrix::from_triplets(nv, nv, permuted);

        let a_ii = laplace.sub_matrix(0..ni, 0..ni);
        let a_ib = laplace.sub_matrix(0..ni, ni..nv);
        let a_bb = laplace.sub_matrix(ni..nv, ni..nv);

        Ok(Self {
            mesh,
            permutation,
            boundary,
            lengths: DVector::from_vec(lengths),
            interior_count: ni,
            a_ii,
            a_ib,
            a_bb,
        })
    }

    /// Number of interior vertices.
    pub fn interior_count(&self) -> usize {
        self.interior_count
    }

    /// Number of boundary vertices.
    pub fn boundary_count(&self) -> usize {
        self.boundary.len()
    }

    /// The boundary vertices in loop order.
    pub fn boundary_vertices(&self) -> &[VertexId<I>] {
        &self.boundary
    }

    /// The length of each boundary edge, indexed by the boundary vertex the
    /// edge leaves.
    pub fn boundary_lengths(&self) -> &DVector<f64> {
        &self.lengths
    }

    /// Boundary edge lengths rescaled by conformal scale factors `u` at the
    /// boundary vertices: the edge leaving vertex i gets length
    /// `exp((u_i + u_{i+1}) / 2) * l_i`.
    pub fn target_boundary_lengths(&self, u: &DVector<f64>) -> DVector<f64> {
        let nb = self.boundary.len();
        assert_eq!(u.len(), nb, "Scale factor dimension mismatch");

        DVector::from_fn(nb, |i, _| {
            let next = (i + 1) % nb;
            ((u[i] + u[next]) / 2.0).exp() * self.lengths[i]
        })
    }

    /// The Dirichlet-to-Neumann map: given interior values `phi` of the
    /// Poisson right-hand side and Dirichlet boundary data `g`, returns the
    /// outgoing normal derivative at each boundary vertex.
    pub fn dirichlet_to_neumann(&self, phi: &DVector<f64>, g: &DVector<f64>) -> Result<DVector<f64>> {
        assert_eq!(phi.len(), self.interior_count, "Interior dimension mismatch");
        assert_eq!(g.len(), self.boundary.len(), "Boundary dimension mismatch");

        let rhs = phi - self.a_ib.mul_vec(g);
        let a = conjugate_gradient(&self.a_ii, &rhs, None, MAX_ITERATIONS, TOLERANCE)?;
        Ok(-(self.a_ib.transpose().mul_vec(&a) + self.a_bb.mul_vec(g)))
    }

    /// Extend boundary data `g` harmonically into the interior.
    ///
    /// Returns one value per mesh vertex, in mesh vertex order.
    pub fn extend_harmonic(&self, g: &DVector<f64>) -> Result<DVector<f64>> {
        assert_eq!(g.len(), self.boundary.len(), "Boundary dimension mismatch");

        let rhs = -self.a_ib.mul_vec(g);
        let interior = conjugate_gradient(&self.a_ii, &rhs, None, MAX_ITERATIONS, TOLERANCE)?;

        let mut values = DVector::zeros(self.mesh.num_vertices());
        for v in self.mesh.vertex_ids() {
            let p = self.permutation[v.index()];
            values[v.index()] = if p < self.interior_count {
                interior[p]
            } else {
                g[p - self.interior_count]
            };
        }
        Ok(values)
    }
}
