//! Geodesic distance via the heat method.
//!
//! The heat method computes approximate geodesic distances from a set of
//! source vertices in three linear steps: diffuse a unit of heat for a short
//! time, normalize the negated heat gradient into a unit vector field pointing
//! away from the sources, and recover the distance function whose gradient
//! matches that field by solving a Poisson equation.
//!
//! # Example
//!
//! ```
//! use sliver::algo::heat::HeatMethod;
//! use sliver::mesh::{build_from_polygons, HalfEdgeMesh, VertexId};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2], vec![0, 2, 3]];
//! let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
//!
//! let solver = HeatMethod::new(&mesh).unwrap();
//! let distances = solver.distances_from(&[VertexId::new(0)]).unwrap();
//! assert!(distances[0] < distances[2]);
//! ```

use nalgebra::{DVector, Vector3};

use crate::error::{GeomError, Result};
use crate::mesh::{geometry, HalfEdgeMesh, MeshIndex, VertexId};

use super::sparse::{conjugate_gradient, CsrMatrix};

/// Options for the heat method solver.
#[derive(Debug, Clone)]
pub struct HeatMethodOptions {
    /// Diffusion time. Defaults to the squared mean edge length.
    pub time_step: Option<f64>,
    /// Maximum conjugate gradient iterations per solve.
    pub max_iterations: usize,
    /// Conjugate gradient convergence tolerance.
    pub tolerance: f64,
}

impl Default for HeatMethodOptions {
    fn default() -> Self {
        Self {
            time_step: None,
            max_iterations: 2000,
            tolerance: 1e-10,
        }
    }
}

/// Geodesic distance solver over a fixed triangle mesh.
///
/// Construction factors out the mesh-dependent work: the cotan Laplacian `L`
/// and the heat flow matrix `M + t L` are built once and reused for any
/// number of source configurations.
pub struct HeatMethod<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    laplace: CsrMatrix,
    flow: CsrMatrix,
    options: HeatMethodOptions,
}

impl<'a, I: MeshIndex> HeatMethod<'a, I> {
    /// Create a solver with default options.
    ///
    /// Fails with [`GeomError::InvalidState`] if the mesh is not triangular.
    pub fn new(mesh: &'a HalfEdgeMesh<I>) -> Result<Self> {
        Self::with_options(mesh, HeatMethodOptions::default())
    }

    /// Create a solver with explicit options.
    pub fn with_options(mesh: &'a HalfEdgeMesh<I>, options: HeatMethodOptions) -> Result<Self> {
        if !mesh.is_triangle_mesh() {
            return Err(GeomError::InvalidState(
                "the heat method requires a triangle mesh".to_string(),
            ));
        }

        let laplace = geometry::laplace_matrix(mesh);
        let mass = geometry::mass_matrix(mesh);

        let h = geometry::mean_edge_length(mesh);
        let t = options.time_step.unwrap_or(h * h);
        let flow = mass.add(&laplace.scale(t));

        Ok(Self {
            mesh,
            laplace,
            flow,
            options,
        })
    }

    /// The diffusion time in use.
    pub fn time_step(&self) -> f64 {
        let h = geometry::mean_edge_length(self.mesh);
        self.options.time_step.unwrap_or(h * h)
    }

    /// Compute distances for an arbitrary source density `delta` over the
    /// vertices (typically one-hot at the sources).
    ///
    /// Returns the distance per vertex, shifted so the minimum is zero.
    pub fn compute(&self, delta: &DVector<f64>) -> Result<DVector<f64>> {
        assert_eq!(delta.len(), self.mesh.num_vertices(), "Source vector dimension mismatch");

        // Step 1: integrate heat flow, (M + tL) u = delta
        let u = conjugate_gradient(
            &self.flow,
            delta,
            None,
            self.options.max_iterations,
            self.options.tolerance,
        )?;

        // Step 2: unit vector field away from the sources
        let field = self.normalized_gradient(&u);

        // Step 3: solve the Poisson equation L phi = -div(X)
        let divergence = self.divergence(&field);
        let phi = conjugate_gradient(
            &self.laplace,
            &(-divergence),
            None,
            self.options.max_iterations,
            self.options.tolerance,
        )?;

        // The solution is unique up to a constant; pin the sources to zero
        let min = phi.min();
        Ok(phi.map(|d| d - min))
    }

    /// Compute distances from a set of source vertices.
    pub fn distances_from(&self, sources: &[VertexId<I>]) -> Result<DVector<f64>> {
        let mut delta = DVector::zeros(self.mesh.num_vertices());
        for &s in sources {
            delta[s.index()] = 1.0;
        }
        self.compute(&delta)
    }

    /// The negated, normalized heat gradient per real face.
    ///
    /// The gradient of a piecewise-linear function on a triangle is
    /// `(1 / 2A) * sum_i u_i (N x e_i)` with `e_i` the edge opposite vertex i.
    fn normalized_gradient(&self, u: &DVector<f64>) -> Vec<Vector3<f64>> {
        let mesh = self.mesh;
        let mut field = Vec::with_capacity(mesh.num_faces());

        for f in mesh.face_ids() {
            let Some(normal) = geometry::face_normal(mesh, f) else {
                field.push(Vector3::zeros());
                continue;
            };
            let area = geometry::face_area(mesh, f);

            let mut gradient = Vector3::zeros();
            for he in mesh.face_halfedges(f) {
                let apex = mesh.dest(mesh.next(he));
                gradient += normal.cross(&geometry::edge_vector(mesh, he)) * u[apex.index()];
            }
            gradient /= 2.0 * area;

            let norm = gradient.norm();
            if norm > 0.0 {
                field.push(-gradient / norm);
            } else {
                field.push(Vector3::zeros());
            }
        }

        field
    }

    /// The integrated divergence of a per-face vector field at each vertex:
    /// `div(X)_v = 1/2 sum_f (cot(a) e_1 . X + cot(b) e_2 . X)` over the
    /// faces at v, with `e_1`, `e_2` the edges of f leaving v and `a`, `b`
    /// the angles opposite them.
    fn divergence(&self, field: &[Vector3<f64>]) -> DVector<f64> {
        let mesh = self.mesh;
        let mut divergence = DVector::zeros(mesh.num_vertices());

        for f in mesh.face_ids() {
            let x = field[f.index()];
            for he in mesh.face_halfedges(f) {
                let v = mesh.origin(he).index();
                let prev = mesh.prev(he);
                let e1 = geometry::edge_vector(mesh, he);
                let e2 = -geometry::edge_vector(mesh, prev);
                divergence[v] += 0.5
                    * (geometry::cotan(mesh, he) * e1.dot(&x)
                        + geometry::cotan(mesh, prev) * e2.dot(&x));
            }
        }

        divergence
    }
}
