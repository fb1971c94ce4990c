//! B-spline and NURBS evaluation routines.
//!
//! Stateless implementations of the standard recurrences: knot construction,
//! span lookup, Cox-de Boor basis functions and derivatives, and rational
//! curve/surface point and derivative evaluation. Rational evaluation happens
//! in homogeneous coordinates (`Vector4` with pre-multiplied weights) with a
//! perspective divide at the end.
//!
//! Knot vectors and weights are not validated here beyond knot construction;
//! callers must supply consistent degree/knot/control-point triples.

use nalgebra::{Point3, Vector3, Vector4};

use crate::error::{GeomError, Result};

/// Construct a clamped uniform knot vector for the given control point count
/// and degree: the first and last `degree + 1` knots are 0 and 1, interior
/// knots are uniformly spaced.
///
/// Fails if `degree` is zero or larger than `control_count - 1`.
pub fn clamped_uniform_knots(control_count: usize, degree: usize) -> Result<Vec<f64>> {
    if degree == 0 || degree + 1 > control_count {
        return Err(GeomError::invalid_param(
            "degree",
            degree,
            "must be between 1 and control point count - 1",
        ));
    }

    let mut knots = vec![0.0; control_count + degree + 1];
    for i in (degree + 1)..control_count {
        knots[i] = (i - degree) as f64 / (control_count - degree) as f64;
    }
    for knot in knots[control_count..].iter_mut() {
        *knot = 1.0;
    }
    Ok(knots)
}

/// Determine the knot span index containing parameter `t`.
///
/// `n` is the highest control point index. Parameters at or beyond
/// `knots[n + 1]` return `n` so the end of a clamped curve stays in range.
pub fn find_span(n: usize, degree: usize, t: f64, knots: &[f64]) -> usize {
    if t >= knots[n + 1] {
        return n;
    }

    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;
    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Compute the `degree + 1` nonzero basis function values at a span
/// (Cox-de Boor triangular recurrence).
pub fn basis_functions(span: usize, t: f64, degree: usize, knots: &[f64]) -> Vec<f64> {
    let mut values = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];

    values[0] = 1.0;
    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = values[r] / (right[r + 1] + left[j - r]);
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }

    values
}

/// Compute the nonzero basis functions and their derivatives up to order `n`
/// at a span.
///
/// Returns `n + 1` rows of `degree + 1` values; row `k` holds the k-th
/// derivatives. `n` must not exceed `degree` (higher derivatives are
/// identically zero; callers clamp).
pub fn derivative_basis_functions(
    span: usize,
    t: f64,
    degree: usize,
    n: usize,
    knots: &[f64],
) -> Vec<Vec<f64>> {
    debug_assert!(n <= degree);

    let mut ders = vec![vec![0.0; degree + 1]; n + 1];
    let mut ndu = vec![vec![0.0; degree + 1]; degree + 1];
    let mut a = vec![vec![0.0; degree + 1]; 2];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];

    ndu[0][0] = 1.0;
    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            ndu[j][r] = right[r + 1] + left[j - r];
            let temp = ndu[r][j - 1] / ndu[j][r];
            ndu[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[j][j] = saved;
    }

    for j in 0..=degree {
        ders[0][j] = ndu[j][degree];
    }

    for r in 0..=degree {
        let mut s1 = 0;
        let mut s2 = 1;
        a[0][0] = 1.0;

        for k in 1..=n {
            let mut d = 0.0;
            let rk = r as isize - k as isize;
            let pk = degree - k;

            if r >= k {
                a[s2][0] = a[s1][0] / ndu[pk + 1][rk as usize];
                d = a[s2][0] * ndu[rk as usize][pk];
            }

            let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
            let j2 = if r <= pk + 1 { k - 1 } else { degree - r };

            for j in j1..=j2 {
                let col = (rk + j as isize) as usize;
                a[s2][j] = (a[s1][j] - a[s1][j - 1]) / ndu[pk + 1][col];
                d += a[s2][j] * ndu[col][pk];
            }

            if r <= pk {
                a[s2][k] = -a[s1][k - 1] / ndu[pk + 1][r];
                d += a[s2][k] * ndu[r][pk];
            }

            ders[k][r] = d;
            std::mem::swap(&mut s1, &mut s2);
        }
    }

    // Multiply by the falling factorial degree * (degree - 1) * ...
    let mut factor = degree as f64;
    for k in 1..=n {
        for j in 0..=degree {
            ders[k][j] *= factor;
        }
        factor *= (degree - k) as f64;
    }

    ders
}

/// The binomial coefficient `C(n, k)`.
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut b = 1.0;
    for i in 0..k {
        b = b * (n - i) as f64 / (i + 1) as f64;
    }
    b
}

fn dehomogenize(p: Vector4<f64>) -> Point3<f64> {
    Point3::from(p.xyz() / p.w)
}

/// Evaluate a rational curve point at parameter `t` in homogeneous space,
/// then perspective-divide back to 3D.
pub fn curve_point(
    degree: usize,
    knots: &[f64],
    control_points: &[Vector4<f64>],
    t: f64,
) -> Point3<f64> {
    let n = control_points.len() - 1;
    let span = find_span(n, degree, t, knots);
    let basis = basis_functions(span, t, degree, knots);

    let mut cw = Vector4::zeros();
    for j in 0..=degree {
        cw += control_points[span - degree + j] * basis[j];
    }
    dehomogenize(cw)
}

/// The homogeneous curve position and derivatives up to order `d` at `t`.
///
/// Derivatives past the degree are zero.
pub fn curve_derivatives(
    degree: usize,
    knots: &[f64],
    control_points: &[Vector4<f64>],
    t: f64,
    d: usize,
) -> Vec<Vector4<f64>> {
    let n = control_points.len() - 1;
    let du = d.min(degree);
    let mut ck = vec![Vector4::zeros(); d + 1];

    let span = find_span(n, degree, t, knots);
    let ders = derivative_basis_functions(span, t, degree, du, knots);
    for k in 0..=du {
        for j in 0..=degree {
            ck[k] += control_points[span - degree + j] * ders[k][j];
        }
    }
    ck
}

/// Recover derivatives of the weight-normalized curve from homogeneous
/// derivatives by the Leibniz-rule correction.
///
/// Index 0 holds the curve position as a coordinate vector.
pub fn rational_curve_derivatives(cw: &[Vector4<f64>], d: usize) -> Vec<Vector3<f64>> {
    let mut ders = vec![Vector3::zeros(); d + 1];
    for k in 0..=d {
        let mut v = cw[k].xyz();
        for i in 1..=k {
            v -= ders[k - i] * (binomial(k, i) * cw[i].w);
        }
        ders[k] = v / cw[0].w;
    }
    ders
}

/// Evaluate a rational tensor-product surface point at `(u, v)`.
///
/// `grid[i][j]` is the homogeneous control point at row `i` (u direction)
/// and column `j` (v direction).
pub fn surface_point(
    degree_u: usize,
    knots_u: &[f64],
    degree_v: usize,
    knots_v: &[f64],
    grid: &[Vec<Vector4<f64>>],
    u: f64,
    v: f64,
) -> Point3<f64> {
    let n = grid.len() - 1;
    let m = grid[0].len() - 1;

    let uspan = find_span(n, degree_u, u, knots_u);
    let nu = basis_functions(uspan, u, degree_u, knots_u);
    let vspan = find_span(m, degree_v, v, knots_v);
    let nv = basis_functions(vspan, v, degree_v, knots_v);

    let mut temp = vec![Vector4::zeros(); degree_v + 1];
    for (l, t) in temp.iter_mut().enumerate() {
        for k in 0..=degree_u {
            *t += grid[uspan - degree_u + k][vspan - degree_v + l] * nu[k];
        }
    }

    let mut sw = Vector4::zeros();
    for l in 0..=degree_v {
        sw += temp[l] * nv[l];
    }
    dehomogenize(sw)
}

/// The homogeneous surface position and partial derivatives up to total
/// order `d` at `(u, v)`.
///
/// `result[k][l]` is the derivative taken `k` times in u and `l` times in v;
/// entries past the degrees are zero.
pub fn surface_derivatives(
    degree_u: usize,
    knots_u: &[f64],
    degree_v: usize,
    knots_v: &[f64],
    grid: &[Vec<Vector4<f64>>],
    u: f64,
    v: f64,
    d: usize,
) -> Vec<Vec<Vector4<f64>>> {
    let n = grid.len() - 1;
    let m = grid[0].len() - 1;
    let du = d.min(degree_u);
    let dv = d.min(degree_v);

    let mut skl = vec![vec![Vector4::zeros(); d + 1]; d + 1];

    let uspan = find_span(n, degree_u, u, knots_u);
    let nu = derivative_basis_functions(uspan, u, degree_u, du, knots_u);
    let vspan = find_span(m, degree_v, v, knots_v);
    let nv = derivative_basis_functions(vspan, v, degree_v, dv, knots_v);

    for k in 0..=du {
        let mut temp = vec![Vector4::zeros(); degree_v + 1];
        for (s, t) in temp.iter_mut().enumerate() {
            for r in 0..=degree_u {
                *t += grid[uspan - degree_u + r][vspan - degree_v + s] * nu[k][r];
            }
        }

        let dd = (d - k).min(dv);
        for l in 0..=dd {
            for s in 0..=degree_v {
                skl[k][l] += temp[s] * nv[l][s];
            }
        }
    }

    skl
}

/// Recover partial derivatives of the weight-normalized surface from
/// homogeneous derivatives by the two-dimensional Leibniz-rule correction.
///
/// `result[0][0]` holds the surface position as a coordinate vector.
pub fn rational_surface_derivatives(
    sw: &[Vec<Vector4<f64>>],
    d: usize,
) -> Vec<Vec<Vector3<f64>>> {
    let mut skl = vec![vec![Vector3::zeros(); d + 1]; d + 1];
    let w0 = sw[0][0].w;

    for k in 0..=d {
        for l in 0..=(d - k) {
            let mut v = sw[k][l].xyz();
            for j in 1..=l {
                v -= skl[k][l - j] * (binomial(l, j) * sw[0][j].w);
            }
            for i in 1..=k {
                v -= skl[k - i][l] * (binomial(k, i) * sw[i][0].w);
                let mut v2 = Vector3::zeros();
                for j in 1..=l {
                    v2 += skl[k - i][l - j] * (binomial(l, j) * sw[i][j].w);
                }
                v -= v2 * binomial(k, i);
            }
            skl[k][l] = v / w0;
        }
    }

    skl
}
