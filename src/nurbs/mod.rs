//! NURBS curve and surface evaluation.
//!
//! The algorithms in [`calculator`] follow the standard B-spline recurrences:
//! clamped uniform knot construction, knot span lookup, Cox-de Boor basis
//! functions and their derivatives, and rational point/derivative evaluation
//! in homogeneous coordinates. [`NurbsCurve`] and [`NurbsSurface`] are thin
//! stateful wrappers that derive their knot vectors at construction and
//! delegate every query to the calculator.
//!
//! Control points are stored as `Vector4<f64>` with pre-multiplied weights;
//! evaluation happens in homogeneous space with a final perspective divide.
//!
//! # Example
//!
//! ```
//! use sliver::nurbs::{Curve, NurbsCurve};
//! use nalgebra::Point3;
//!
//! let control = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//! ];
//! let curve = NurbsCurve::new(&control, 2).unwrap();
//!
//! // Clamped curves interpolate their endpoints
//! assert!((curve.point_at(0.0) - control[0]).norm() < 1e-12);
//! assert!((curve.point_at(1.0) - control[2]).norm() < 1e-12);
//! ```

pub mod calculator;

mod curve;
mod surface;

pub use curve::NurbsCurve;
pub use surface::{ControlNet, NurbsSurface};

use nalgebra::{Point3, Vector3};

use crate::config::KernelConfig;

/// A local coordinate frame on a curve or surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The frame's origin on the geometry.
    pub origin: Point3<f64>,
    /// First axis.
    pub x_axis: Vector3<f64>,
    /// Second axis.
    pub y_axis: Vector3<f64>,
    /// Third axis.
    pub z_axis: Vector3<f64>,
}

/// A parametric curve over the unit domain `[0, 1]`.
pub trait Curve {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Point3<f64>;

    /// The unit tangent at parameter `t`.
    fn tangent_at(&self, t: f64) -> Vector3<f64>;

    /// A local frame at parameter `t`.
    fn frame_at(&self, t: f64) -> Frame;

    /// The curve position and its first `count` derivatives at `t`.
    ///
    /// Index 0 holds the position (as a coordinate vector), index k the
    /// k-th derivative.
    fn derivatives_at(&self, t: f64, count: usize) -> Vec<Vector3<f64>>;

    /// The parameter of the closest point on the curve to `point`.
    ///
    /// Samples the curve at the configured tessellation resolution, then
    /// refines the best sample with Newton iteration on the stationarity
    /// condition `(C(t) - P) . C'(t) = 0`.
    fn closest_parameter(&self, point: &Point3<f64>, config: &KernelConfig) -> f64 {
        let divisions = config.tessellation_divisions.max(1);

        let mut best_t = 0.0;
        let mut best_dist = f64::INFINITY;
        for i in 0..=divisions {
            let t = i as f64 / divisions as f64;
            let dist = (self.point_at(t) - point).norm_squared();
            if dist < best_dist {
                best_dist = dist;
                best_t = t;
            }
        }

        let mut t = best_t;
        for _ in 0..MAX_NEWTON_STEPS {
            let ders = self.derivatives_at(t, 2);
            let diff = ders[0] - point.coords;
            let f = diff.dot(&ders[1]);
            let df = ders[1].dot(&ders[1]) + diff.dot(&ders[2]);
            if df.abs() < f64::EPSILON {
                break;
            }
            let next = (t - f / df).clamp(0.0, 1.0);
            let done = (next - t).abs() < config.tolerance;
            t = next;
            if done {
                break;
            }
        }

        // Newton can wander on curves with many near-closest candidates
        if (self.point_at(t) - point).norm_squared() <= best_dist {
            t
        } else {
            best_t
        }
    }

    /// The closest point on the curve to `point`.
    fn closest_point(&self, point: &Point3<f64>, config: &KernelConfig) -> Point3<f64> {
        self.point_at(self.closest_parameter(point, config))
    }

    /// The distance from `point` to the curve.
    fn distance_to(&self, point: &Point3<f64>, config: &KernelConfig) -> f64 {
        (self.closest_point(point, config) - point).norm()
    }
}

/// A parametric surface over the unit domain `[0, 1] x [0, 1]`.
pub trait Surface {
    /// Evaluate the surface at parameters `(u, v)`.
    fn point_at(&self, u: f64, v: f64) -> Point3<f64>;

    /// The unit normal at parameters `(u, v)`.
    fn normal_at(&self, u: f64, v: f64) -> Vector3<f64>;

    /// A local frame at parameters `(u, v)`.
    fn frame_at(&self, u: f64, v: f64) -> Frame;

    /// The parameters of the closest point on the surface to `point`.
    ///
    /// Samples the surface at the configured tessellation resolution, then
    /// refines the best sample by repeatedly halving the search window.
    fn closest_parameters(&self, point: &Point3<f64>, config: &KernelConfig) -> (f64, f64) {
        let divisions = config.tessellation_divisions.max(1);

        let mut best = (0.0, 0.0);
        let mut best_dist = f64::INFINITY;
        for i in 0..=divisions {
            for j in 0..=divisions {
                let u = i as f64 / divisions as f64;
                let v = j as f64 / divisions as f64;
                let dist = (self.point_at(u, v) - point).norm_squared();
                if dist < best_dist {
                    best_dist = dist;
                    best = (u, v);
                }
            }
        }

        let mut step = 1.0 / divisions as f64;
        while step > config.tolerance {
            step /= 2.0;
            let (bu, bv) = best;
            for du in [-1.0, 0.0, 1.0] {
                for dv in [-1.0, 0.0, 1.0] {
                    let u = (bu + du * step).clamp(0.0, 1.0);
                    let v = (bv + dv * step).clamp(0.0, 1.0);
                    let dist = (self.point_at(u, v) - point).norm_squared();
                    if dist < best_dist {
                        best_dist = dist;
                        best = (u, v);
                    }
                }
            }
        }

        best
    }

    /// The closest point on the surface to `point`.
    fn closest_point(&self, point: &Point3<f64>, config: &KernelConfig) -> Point3<f64> {
        let (u, v) = self.closest_parameters(point, config);
        self.point_at(u, v)
    }

    /// The distance from `point` to the surface.
    fn distance_to(&self, point: &Point3<f64>, config: &KernelConfig) -> f64 {
        (self.closest_point(point, config) - point).norm()
    }
}

const MAX_NEWTON_STEPS: usize = 32;
