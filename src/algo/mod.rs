//! Geometry processing algorithms.
//!
//! This module collects the algorithms built on top of the half-edge mesh:
//!
//! - [`sparse`] - CSR sparse matrix and conjugate gradient solver
//! - [`dec`] - discrete exterior calculus operator builders
//! - [`heat`] - geodesic distance via the heat method
//! - [`flatten`] - boundary first flattening building blocks
//! - [`curvature`] - batch per-vertex curvature computation

pub mod curvature;
pub mod dec;
pub mod flatten;
pub mod heat;
pub mod sparse;

pub use curvature::{compute_curvature, gaussian_curvature, mean_curvature, CurvatureResult};
pub use flatten::BoundaryFirstFlattening;
pub use heat::{HeatMethod, HeatMethodOptions};
pub use sparse::{conjugate_gradient, CsrMatrix};
