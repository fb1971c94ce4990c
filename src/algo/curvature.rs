//! Batch per-vertex curvature computation.
//!
//! Wraps the per-vertex operators in [`crate::mesh::geometry`] into bulk
//! computations over all vertices of a mesh:
//!
//! - **Gaussian curvature K**: angle defect over circumcentric dual area
//! - **Mean curvature H**: length-weighted dihedral angles over dual area
//! - **Principal curvatures k1, k2**: recovered from K and H
//!
//! # Example
//!
//! ```
//! use sliver::algo::curvature::compute_curvature;
//! use sliver::mesh::{build_from_polygons, HalfEdgeMesh, VertexId};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![2, 0, 3]];
//! let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
//!
//! let result = compute_curvature(&mesh);
//! let (k1, k2) = result.principal(VertexId::new(0));
//! assert!(k1 <= k2);
//! ```

use std::marker::PhantomData;

use rayon::prelude::*;

use crate::mesh::{geometry, HalfEdgeMesh, MeshIndex, VertexId};

/// Result of curvature computation.
///
/// Contains per-vertex curvature values for all vertices in the mesh.
#[derive(Debug, Clone)]
pub struct CurvatureResult<I: MeshIndex = u32> {
    /// Gaussian curvature (K) per vertex.
    gaussian: Vec<f64>,
    /// Mean curvature (H) per vertex (signed).
    mean: Vec<f64>,
    /// Minimum principal curvature (k1) per vertex.
    principal_min: Vec<f64>,
    /// Maximum principal curvature (k2) per vertex.
    principal_max: Vec<f64>,
    /// Phantom data for index type.
    _marker: PhantomData<I>,
}

impl<I: MeshIndex> CurvatureResult<I> {
    /// Get Gaussian curvature at a vertex.
    #[inline]
    pub fn gaussian(&self, v: VertexId<I>) -> f64 {
        self.gaussian[v.index()]
    }

    /// Get mean curvature at a vertex.
    #[inline]
    pub fn mean(&self, v: VertexId<I>) -> f64 {
        self.mean[v.index()]
    }

    /// Get principal curvatures at a vertex.
    ///
    /// Returns (k1, k2) where k1 <= k2.
    #[inline]
    pub fn principal(&self, v: VertexId<I>) -> (f64, f64) {
        (self.principal_min[v.index()], self.principal_max[v.index()])
    }

    /// Get all Gaussian curvatures as a slice.
    #[inline]
    pub fn gaussian_values(&self) -> &[f64] {
        &self.gaussian
    }

    /// Get all mean curvatures as a slice.
    #[inline]
    pub fn mean_values(&self) -> &[f64] {
        &self.mean
    }

    /// Get the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.gaussian.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gaussian.is_empty()
    }
}

/// Compute pointwise Gaussian curvature for all vertices.
///
/// This function uses parallel computation by default. Use
/// [`gaussian_curvature_sequential`] for single-threaded execution.
pub fn gaussian_curvature<I: MeshIndex + Sync>(mesh: &HalfEdgeMesh<I>) -> Vec<f64> {
    gaussian_curvature_impl(mesh, true)
}

/// Compute pointwise Gaussian curvature for all vertices (sequential version).
///
/// Uses single-threaded execution. Useful for benchmarking.
pub fn gaussian_curvature_sequential<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Vec<f64> {
    gaussian_curvature_impl(mesh, false)
}

fn gaussian_curvature_impl<I: MeshIndex + Sync>(mesh: &HalfEdgeMesh<I>, parallel: bool) -> Vec<f64> {
    let n = mesh.num_vertices();
    let compute = |idx: usize| geometry::scalar_gauss_curvature(mesh, VertexId::<I>::new(idx));

    if parallel {
        (0..n).into_par_iter().map(compute).collect()
    } else {
        (0..n).map(compute).collect()
    }
}

/// Compute pointwise mean curvature for all vertices.
///
/// This function uses parallel computation by default. Use
/// [`mean_curvature_sequential`] for single-threaded execution.
pub fn mean_curvature<I: MeshIndex + Sync>(mesh: &HalfEdgeMesh<I>) -> Vec<f64> {
    mean_curvature_impl(mesh, true)
}

/// Compute pointwise mean curvature for all vertices (sequential version).
///
/// Uses single-threaded execution. Useful for benchmarking.
pub fn mean_curvature_sequential<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Vec<f64> {
    mean_curvature_impl(mesh, false)
}

fn mean_curvature_impl<I: MeshIndex + Sync>(mesh: &HalfEdgeMesh<I>, parallel: bool) -> Vec<f64> {
    let n = mesh.num_vertices();
    let compute = |idx: usize| {
        let v = VertexId::<I>::new(idx);
        geometry::scalar_mean_curvature(mesh, v) / geometry::circumcentric_dual_area(mesh, v)
    };

    if parallel {
        (0..n).into_par_iter().map(compute).collect()
    } else {
        (0..n).map(compute).collect()
    }
}

/// Compute all curvatures (Gaussian, mean, and principal) for all vertices.
///
/// This is more efficient than computing each separately when you need all
/// of them, since the dual areas are computed once per vertex.
///
/// This function uses parallel computation by default. Use
/// [`compute_curvature_sequential`] for single-threaded execution.
pub fn compute_curvature<I: MeshIndex + Sync>(mesh: &HalfEdgeMesh<I>) -> CurvatureResult<I> {
    compute_curvature_impl(mesh, true)
}

/// Compute all curvatures (sequential version).
///
/// Uses single-threaded execution. Useful for benchmarking.
pub fn compute_curvature_sequential<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> CurvatureResult<I> {
    compute_curvature_impl(mesh, false)
}

/// Per-vertex curvature data computed in parallel.
#[derive(Debug, Clone)]
struct VertexCurvature {
    gaussian: f64,
    mean: f64,
    principal_min: f64,
    principal_max: f64,
}

fn compute_curvature_impl<I: MeshIndex + Sync>(
    mesh: &HalfEdgeMesh<I>,
    parallel: bool,
) -> CurvatureResult<I> {
    let n = mesh.num_vertices();

    let compute_vertex = |idx: usize| -> VertexCurvature {
        let v = VertexId::<I>::new(idx);

        let area = geometry::circumcentric_dual_area(mesh, v);
        let k = geometry::angle_defect(mesh, v) / area;
        let h = geometry::scalar_mean_curvature(mesh, v) / area;

        let disc = (h * h - k).max(0.0).sqrt();

        VertexCurvature {
            gaussian: k,
            mean: h,
            principal_min: h - disc,
            principal_max: h + disc,
        }
    };

    let results: Vec<VertexCurvature> = if parallel {
        (0..n).into_par_iter().map(compute_vertex).collect()
    } else {
        (0..n).map(compute_vertex).collect()
    };

    // Unpack results into separate vectors
    let mut gaussian = Vec::with_capacity(n);
    let mut mean = Vec::with_capacity(n);
    let mut principal_min = Vec::with_capacity(n);
    let mut principal_max = Vec::with_capacity(n);

    for vc in results {
        gaussian.push(vc.gaussian);
        mean.push(vc.mean);
        principal_min.push(vc.principal_min);
        principal_max.push(vc.principal_max);
    }

    CurvatureResult {
        gaussian,
        mean,
        principal_min,
        principal_max,
        _marker: PhantomData,
    }
}
