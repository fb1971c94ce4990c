//! Kernel configuration.
//!
//! Operations that compare coordinates or sample parameter space take an
//! explicit [`KernelConfig`] instead of consulting ambient globals. The NURBS
//! closest-point and distance queries take one per call.

/// Tunable parameters shared by geometric queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Absolute tolerance for coordinate and parameter comparisons.
    pub tolerance: f64,
    /// Number of parameter-space samples per direction used to seed
    /// closest-point searches.
    pub tessellation_divisions: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            tolerance: 1e-8,
            tessellation_divisions: 64,
        }
    }
}
