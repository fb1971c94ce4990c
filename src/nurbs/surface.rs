//! NURBS surface wrapper.

use nalgebra::{Point3, Vector3, Vector4};

use crate::error::{GeomError, Result};

use super::calculator;
use super::{Frame, Surface};

/// A rectangular grid of homogeneous control points.
///
/// Rows run along the u direction, columns along the v direction.
#[derive(Debug, Clone)]
pub struct ControlNet {
    rows: Vec<Vec<Vector4<f64>>>,
}

impl ControlNet {
    /// Create a non-rational net (all weights 1) from a grid of points.
    ///
    /// Fails if the grid is empty or ragged.
    pub fn new(points: &[Vec<Point3<f64>>]) -> Result<Self> {
        let weights: Vec<Vec<f64>> = points.iter().map(|row| vec![1.0; row.len()]).collect();
        Self::with_weights(points, &weights)
    }

    /// Create a rational net from a grid of points and matching weights.
    pub fn with_weights(points: &[Vec<Point3<f64>>], weights: &[Vec<f64>]) -> Result<Self> {
        if points.is_empty() || points[0].is_empty() {
            return Err(GeomError::invalid_param(
                "points",
                points.len(),
                "control net must not be empty",
            ));
        }
        let cols = points[0].len();
        if points.iter().any(|row| row.len() != cols) {
            return Err(GeomError::invalid_param(
                "points",
                points.len(),
                "control net rows must have equal length",
            ));
        }
        if weights.len() != points.len()
            || weights.iter().zip(points).any(|(w, p)| w.len() != p.len())
        {
            return Err(GeomError::invalid_param(
                "weights",
                weights.len(),
                "must match the control net dimensions",
            ));
        }

        let rows = points
            .iter()
            .zip(weights)
            .map(|(prow, wrow)| {
                prow.iter()
                    .zip(wrow)
                    .map(|(p, &w)| Vector4::new(p.x * w, p.y * w, p.z * w, w))
                    .collect()
            })
            .collect();
        Ok(Self { rows })
    }

    /// Number of control points in the u direction.
    pub fn count_u(&self) -> usize {
        self.rows.len()
    }

    /// Number of control points in the v direction.
    pub fn count_v(&self) -> usize {
        self.rows[0].len()
    }

    /// The homogeneous control point at `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Vector4<f64> {
        self.rows[i][j]
    }

    fn grid(&self) -> &[Vec<Vector4<f64>>] {
        &self.rows
    }
}

/// A NURBS surface over the unit parameter square.
///
/// Both clamped uniform knot vectors are derived at construction from the
/// control net dimensions and the degree pair.
#[derive(Debug, Clone)]
pub struct NurbsSurface {
    control: ControlNet,
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<f64>,
    knots_v: Vec<f64>,
}

impl NurbsSurface {
    /// Create a surface from a control net and a degree per direction.
    pub fn new(control: ControlNet, degree_u: usize, degree_v: usize) -> Result<Self> {
        let knots_u = calculator::clamped_uniform_knots(control.count_u(), degree_u)?;
        let knots_v = calculator::clamped_uniform_knots(control.count_v(), degree_v)?;
        Ok(Self {
            control,
            degree_u,
            degree_v,
            knots_u,
            knots_v,
        })
    }

    /// The degree in the u direction.
    pub fn degree_u(&self) -> usize {
        self.degree_u
    }

    /// The degree in the v direction.
    pub fn degree_v(&self) -> usize {
        self.degree_v
    }

    /// The knot vector in the u direction.
    pub fn knots_u(&self) -> &[f64] {
        &self.knots_u
    }

    /// The knot vector in the v direction.
    pub fn knots_v(&self) -> &[f64] {
        &self.knots_v
    }

    /// The control net.
    pub fn control_net(&self) -> &ControlNet {
        &self.control
    }

    /// The surface position and partial derivatives up to total order `count`
    /// at `(u, v)`; `result[k][l]` differentiates `k` times in u and `l`
    /// times in v, with `result[0][0]` the position as a coordinate vector.
    pub fn derivatives_at(&self, u: f64, v: f64, count: usize) -> Vec<Vec<Vector3<f64>>> {
        let sw = calculator::surface_derivatives(
            self.degree_u,
            &self.knots_u,
            self.degree_v,
            &self.knots_v,
            self.control.grid(),
            u,
            v,
            count,
        );
        calculator::rational_surface_derivatives(&sw, count)
    }
}

impl Surface for NurbsSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3<f64> {
        calculator::surface_point(
            self.degree_u,
            &self.knots_u,
            self.degree_v,
            &self.knots_v,
            self.control.grid(),
            u,
            v,
        )
    }

    fn normal_at(&self, u: f64, v: f64) -> Vector3<f64> {
        let ders = self.derivatives_at(u, v, 1);
        ders[1][0].cross(&ders[0][1]).normalize()
    }

    fn frame_at(&self, u: f64, v: f64) -> Frame {
        let ders = self.derivatives_at(u, v, 1);
        let su = ders[1][0].normalize();
        let sv = ders[0][1].normalize();
        Frame {
            origin: Point3::from(ders[0][0]),
            x_axis: su,
            y_axis: sv,
            z_axis: ders[1][0].cross(&ders[0][1]).normalize(),
        }
    }
}
