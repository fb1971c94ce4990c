//! NURBS curve wrapper.

use nalgebra::{Point3, Vector3, Vector4};

use crate::error::{GeomError, Result};

use super::calculator;
use super::{Curve, Frame};

/// A NURBS curve over the unit parameter domain.
///
/// Control points are stored in homogeneous coordinates with pre-multiplied
/// weights; the clamped uniform knot vector is derived at construction from
/// the control point count and degree.
#[derive(Debug, Clone)]
pub struct NurbsCurve {
    control_points: Vec<Vector4<f64>>,
    degree: usize,
    knots: Vec<f64>,
}

impl NurbsCurve {
    /// Create a non-rational curve (all weights 1) from control points and
    /// degree.
    pub fn new(control_points: &[Point3<f64>], degree: usize) -> Result<Self> {
        let weights = vec![1.0; control_points.len()];
        Self::with_weights(control_points, &weights, degree)
    }

    /// Create a rational curve from control points, per-point weights, and
    /// degree.
    pub fn with_weights(
        control_points: &[Point3<f64>],
        weights: &[f64],
        degree: usize,
    ) -> Result<Self> {
        if weights.len() != control_points.len() {
            return Err(GeomError::invalid_param(
                "weights",
                weights.len(),
                "must match the control point count",
            ));
        }

        let knots = calculator::clamped_uniform_knots(control_points.len(), degree)?;
        let control_points = control_points
            .iter()
            .zip(weights)
            .map(|(p, &w)| Vector4::new(p.x * w, p.y * w, p.z * w, w))
            .collect();

        Ok(Self {
            control_points,
            degree,
            knots,
        })
    }

    /// The curve degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The knot vector.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// The homogeneous control points.
    pub fn control_points(&self) -> &[Vector4<f64>] {
        &self.control_points
    }

    /// The start point of the curve.
    pub fn start_point(&self) -> Point3<f64> {
        self.point_at(0.0)
    }

    /// The end point of the curve.
    pub fn end_point(&self) -> Point3<f64> {
        self.point_at(1.0)
    }

    /// The unit tangent at the start of the curve.
    pub fn start_tangent(&self) -> Vector3<f64> {
        self.tangent_at(0.0)
    }

    /// The unit tangent at the end of the curve.
    pub fn end_tangent(&self) -> Vector3<f64> {
        self.tangent_at(1.0)
    }

    /// The unitized second derivative direction at `t`.
    pub fn normal_at(&self, t: f64) -> Vector3<f64> {
        self.derivatives_at(t, 2)[2].normalize()
    }

    /// The unitized third derivative direction at `t`.
    pub fn binormal_at(&self, t: f64) -> Vector3<f64> {
        self.derivatives_at(t, 3)[3].normalize()
    }
}

impl Curve for NurbsCurve {
    fn point_at(&self, t: f64) -> Point3<f64> {
        calculator::curve_point(self.degree, &self.knots, &self.control_points, t)
    }

    fn tangent_at(&self, t: f64) -> Vector3<f64> {
        self.derivatives_at(t, 1)[1].normalize()
    }

    fn frame_at(&self, t: f64) -> Frame {
        let ders = self.derivatives_at(t, 3);
        Frame {
            origin: Point3::from(ders[0]),
            x_axis: ders[1].normalize(),
            y_axis: ders[2].normalize(),
            z_axis: ders[3].normalize(),
        }
    }

    fn derivatives_at(&self, t: f64, count: usize) -> Vec<Vector3<f64>> {
        let cw = calculator::curve_derivatives(
            self.degree,
            &self.knots,
            &self.control_points,
            t,
            count,
        );
        calculator::rational_curve_derivatives(&cw, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KernelConfig;

    fn arc_like() -> NurbsCurve {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        NurbsCurve::new(&points, 2).unwrap()
    }

    #[test]
    fn test_construction_validation() {
        let points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            NurbsCurve::new(&points, 2),
            Err(GeomError::InvalidParameter { .. })
        ));
        assert!(matches!(
            NurbsCurve::with_weights(&points, &[1.0], 1),
            Err(GeomError::InvalidParameter { .. })
        ));
        assert!(NurbsCurve::new(&points, 1).is_ok());
    }

    #[test]
    fn test_endpoints() {
        let curve = arc_like();
        assert!((curve.start_point() - Point3::new(0.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((curve.end_point() - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_straight_line_constant_tangent() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
        ];
        let curve = NurbsCurve::new(&points, 2).unwrap();

        let expected = Vector3::new(1.0, 0.0, 0.0);
        for i in 0..=8 {
            let t = i as f64 / 8.0;
            assert!((curve.tangent_at(t) - expected).norm() < 1e-9);
        }
        assert!((curve.start_tangent() - expected).norm() < 1e-9);
        assert!((curve.end_tangent() - expected).norm() < 1e-9);
    }

    #[test]
    fn test_symmetric_arc_tangents() {
        let curve = arc_like();

        // The apex tangent is horizontal by symmetry
        let mid = curve.tangent_at(0.5);
        assert!(mid.y.abs() < 1e-9);
        assert!(mid.x > 0.0);

        // Start and end tangents point along the control polygon ends
        let start = curve.start_tangent();
        assert!((start - Vector3::new(1.0, 2.0, 0.0).normalize()).norm() < 1e-9);
    }

    #[test]
    fn test_frame_origin_matches_point() {
        let curve = arc_like();
        let frame = curve.frame_at(0.25);
        assert!((frame.origin - curve.point_at(0.25)).norm() < 1e-12);
        assert!((frame.x_axis.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_closest_point_on_line() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
        ];
        let curve = NurbsCurve::new(&points, 2).unwrap();
        let config = KernelConfig::default();

        // The projection of (1, 1, 0) onto the x axis segment
        let query = Point3::new(1.0, 1.0, 0.0);
        let closest = curve.closest_point(&query, &config);
        assert!((closest - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-6);
        assert!((curve.distance_to(&query, &config) - 1.0).abs() < 1e-6);

        // A query beyond the end clamps to the endpoint
        let query = Point3::new(5.0, 0.0, 0.0);
        let closest = curve.closest_point(&query, &config);
        assert!((closest - Point3::new(4.0, 0.0, 0.0)).norm() < 1e-6);
    }
}
