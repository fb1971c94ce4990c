//! Discrete differential geometry operators.
//!
//! Pure functions over a [`HalfEdgeMesh`]: edge and face measures, corner
//! angles, cotangents, dual areas, vertex normals, curvatures, and the cotan
//! Laplace and mass matrices. Only [`normalize`] mutates the mesh.
//!
//! # Conventions
//!
//! The edge vector of a half-edge points from its origin to its destination:
//! `edge_vector(he) = position(dest(he)) - position(origin(he))`. All angle
//! and curvature formulas below are expressed in this convention. Faces wind
//! counter-clockwise around their normal.
//!
//! Operators that take a face accept boundary loops and return the neutral
//! value for them (zero area, no normal); operators that take a half-edge
//! return zero for synthetic boundary half-edges where the quantity needs an
//! incident face (cotangent, dihedral angle).

use nalgebra::{Point3, Vector3};

use super::halfedge::HalfEdgeMesh;
use super::index::{CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::algo::sparse::CsrMatrix;

// ==================== Edges ====================

/// The vector of a half-edge, from its origin to its destination.
pub fn edge_vector<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, he: HalfEdgeId<I>) -> Vector3<f64> {
    mesh.position(mesh.dest(he)) - mesh.position(mesh.origin(he))
}

/// The length of a full edge.
pub fn edge_length<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, e: EdgeId<I>) -> f64 {
    edge_vector(mesh, mesh.edge(e).halfedge).norm()
}

/// The midpoint of a full edge.
pub fn edge_midpoint<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, e: EdgeId<I>) -> Point3<f64> {
    let he = mesh.edge(e).halfedge;
    let p0 = mesh.position(mesh.origin(he));
    let p1 = mesh.position(mesh.dest(he));
    Point3::from((p0.coords + p1.coords) * 0.5)
}

/// The mean length over all full edges.
pub fn mean_edge_length<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> f64 {
    if mesh.num_edges() == 0 {
        return 0.0;
    }
    let total: f64 = mesh.edge_ids().map(|e| edge_length(mesh, e)).sum();
    total / mesh.num_edges() as f64
}

// ==================== Faces ====================

/// The vector area of a face (Newell's method), `2 * area * normal` for a
/// planar polygon. Zero for boundary loops.
fn vector_area<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, f: FaceId<I>) -> Vector3<f64> {
    if mesh.is_boundary_loop(f) {
        return Vector3::zeros();
    }
    let mut sum = Vector3::zeros();
    for he in mesh.face_halfedges(f) {
        let p0 = mesh.position(mesh.origin(he));
        let p1 = mesh.position(mesh.dest(he));
        sum += p0.coords.cross(&p1.coords);
    }
    sum
}

/// The area of a face. Zero for boundary loops.
pub fn face_area<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, f: FaceId<I>) -> f64 {
    0.5 * vector_area(mesh, f).norm()
}

/// The total surface area of the mesh.
pub fn total_area<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> f64 {
    mesh.face_ids().map(|f| face_area(mesh, f)).sum()
}

/// The unit normal of a face, or `None` for boundary loops and zero-area faces.
pub fn face_normal<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, f: FaceId<I>) -> Option<Vector3<f64>> {
    let sum = vector_area(mesh, f);
    let norm = sum.norm();
    if norm == 0.0 {
        None
    } else {
        Some(sum / norm)
    }
}

/// The centroid of a face. For boundary loops, the midpoint of the
/// representative half-edge.
pub fn centroid<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, f: FaceId<I>) -> Point3<f64> {
    if mesh.is_boundary_loop(f) {
        let he = mesh.face(f).halfedge;
        let p0 = mesh.position(mesh.origin(he));
        let p1 = mesh.position(mesh.dest(he));
        return Point3::from((p0.coords + p1.coords) * 0.5);
    }
    let mut sum = Vector3::zeros();
    let mut count = 0;
    for v in mesh.face_vertices(f) {
        sum += mesh.position(v).coords;
        count += 1;
    }
    Point3::from(sum / count as f64)
}

/// The circumcenter of a triangular face. For boundary loops, the midpoint
/// of the representative half-edge.
pub fn circumcenter<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, f: FaceId<I>) -> Point3<f64> {
    if mesh.is_boundary_loop(f) {
        let he = mesh.face(f).halfedge;
        let p0 = mesh.position(mesh.origin(he));
        let p1 = mesh.position(mesh.dest(he));
        return Point3::from((p0.coords + p1.coords) * 0.5);
    }
    let [a, b, c] = mesh.face_positions(f);
    let ab = b - a;
    let ac = c - a;
    let w = ab.cross(&ac);
    let w2 = w.norm_squared();
    if w2 == 0.0 {
        // Degenerate triangle, fall back to the centroid
        return Point3::from((a.coords + b.coords + c.coords) / 3.0);
    }
    let x = (w.cross(&ab) * ac.norm_squared() + ac.cross(&w) * ab.norm_squared()) / (2.0 * w2);
    a + x
}

/// An orthonormal tangent basis of a face, or `None` for boundary loops and
/// degenerate faces.
pub fn orthonormal_bases<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    f: FaceId<I>,
) -> Option<[Vector3<f64>; 2]> {
    let normal = face_normal(mesh, f)?;
    let e1 = edge_vector(mesh, mesh.face(f).halfedge).normalize();
    let e2 = normal.cross(&e1);
    Some([e1, e2])
}

// ==================== Angles ====================

/// The interior angle of a corner, in radians.
pub fn corner_angle<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, c: CornerId<I>) -> f64 {
    let he = mesh.corner(c).halfedge;
    // Both vectors emanate from dest(he), the corner's vertex
    let u = (-edge_vector(mesh, he)).normalize();
    let v = edge_vector(mesh, mesh.next(he)).normalize();
    u.dot(&v).clamp(-1.0, 1.0).acos()
}

/// The cotangent of the angle opposite a half-edge inside its face.
/// Zero for synthetic boundary half-edges.
pub fn cotan<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, he: HalfEdgeId<I>) -> f64 {
    if mesh.is_boundary_halfedge(he) {
        return 0.0;
    }
    // Vectors from the apex opposite `he` to its endpoints
    let u = edge_vector(mesh, mesh.prev(he));
    let v = -edge_vector(mesh, mesh.next(he));
    u.dot(&v) / u.cross(&v).norm()
}

/// The signed dihedral angle across a half-edge's full edge, positive for
/// convex folds. Zero if either incident face is a boundary loop.
pub fn dihedral_angle<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, he: HalfEdgeId<I>) -> f64 {
    let f1 = mesh.face_of(he);
    let f2 = mesh.face_of(mesh.twin(he));
    if mesh.is_boundary_loop(f1) || mesh.is_boundary_loop(f2) {
        return 0.0;
    }
    let (Some(n1), Some(n2)) = (face_normal(mesh, f1), face_normal(mesh, f2)) else {
        return 0.0;
    };
    let w = edge_vector(mesh, he).normalize();
    n2.cross(&n1).dot(&w).atan2(n1.dot(&n2))
}

// ==================== Dual areas ====================

/// The barycentric dual area of a vertex: one third of the incident face areas.
pub fn barycentric_dual_area<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> f64 {
    mesh.vertex_faces(v).map(|f| face_area(mesh, f)).sum::<f64>() / 3.0
}

/// The circumcentric dual area of a vertex.
pub fn circumcentric_dual_area<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> f64 {
    let mut area = 0.0;
    for he in mesh.vertex_halfedges(v) {
        let prev = mesh.prev(he);
        let u2 = edge_vector(mesh, prev).norm_squared();
        let v2 = edge_vector(mesh, he).norm_squared();
        area += (u2 * cotan(mesh, prev) + v2 * cotan(mesh, he)) / 8.0;
    }
    area
}

// ==================== Vertex normals ====================

/// The vertex normal as the unweighted average of incident face normals.
pub fn vertex_normal_equally_weighted<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    v: VertexId<I>,
) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for f in mesh.vertex_faces(v) {
        if let Some(n) = face_normal(mesh, f) {
            normal += n;
        }
    }
    normal.normalize()
}

/// The vertex normal as the area-weighted average of incident face normals.
pub fn vertex_normal_area_weighted<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    v: VertexId<I>,
) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for f in mesh.vertex_faces(v) {
        if let Some(n) = face_normal(mesh, f) {
            normal += n * face_area(mesh, f);
        }
    }
    normal.normalize()
}

/// The vertex normal as the tip-angle-weighted average of incident face normals.
pub fn vertex_normal_angle_weighted<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    v: VertexId<I>,
) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for c in mesh.vertex_corners(v) {
        if let Some(n) = face_normal(mesh, mesh.corner_face(c)) {
            normal += n * corner_angle(mesh, c);
        }
    }
    normal.normalize()
}

/// The vertex normal from the Gauss curvature normal, a dihedral-angle-weighted
/// sum of the incident edge directions.
pub fn vertex_normal_gauss_curvature<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    v: VertexId<I>,
) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for he in mesh.vertex_halfedges(v) {
        let ev = edge_vector(mesh, he);
        let len = ev.norm();
        if len > 0.0 {
            normal -= ev * (0.5 * dihedral_angle(mesh, he) / len);
        }
    }
    normal.normalize()
}

/// The vertex normal from the mean curvature normal, a cotan-weighted sum of
/// the incident edge vectors.
pub fn vertex_normal_mean_curvature<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    v: VertexId<I>,
) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for he in mesh.vertex_halfedges(v) {
        let weight = 0.5 * (cotan(mesh, he) + cotan(mesh, mesh.twin(he)));
        normal -= edge_vector(mesh, he) * weight;
    }
    normal.normalize()
}

/// The vertex normal of the sphere inscribed in the incident corners.
pub fn vertex_normal_sphere_inscribed<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    v: VertexId<I>,
) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for c in mesh.vertex_corners(v) {
        let he = mesh.corner(c).halfedge;
        // The two edges from the corner's vertex into its face
        let u = edge_vector(mesh, mesh.next(he));
        let w = -edge_vector(mesh, he);
        normal += u.cross(&w) / (u.norm_squared() * w.norm_squared());
    }
    normal.normalize()
}

// ==================== Curvature ====================

/// The angle defect of a vertex: `2 pi` minus the incident corner angles, or
/// `pi` minus them on the boundary.
pub fn angle_defect<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> f64 {
    let flat = if mesh.is_boundary_vertex(v) {
        std::f64::consts::PI
    } else {
        2.0 * std::f64::consts::PI
    };
    let sum: f64 = mesh.vertex_corners(v).map(|c| corner_angle(mesh, c)).sum();
    flat - sum
}

/// The total angle defect of the mesh, `2 pi` times its Euler characteristic
/// by the discrete Gauss-Bonnet theorem.
pub fn total_angle_defect<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> f64 {
    mesh.vertex_ids().map(|v| angle_defect(mesh, v)).sum()
}

/// The pointwise Gauss curvature at a vertex: angle defect over circumcentric
/// dual area.
pub fn scalar_gauss_curvature<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> f64 {
    angle_defect(mesh, v) / circumcentric_dual_area(mesh, v)
}

/// The integrated mean curvature at a vertex: half the dihedral angles of the
/// incident edges, length-weighted.
pub fn scalar_mean_curvature<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> f64 {
    mesh.vertex_halfedges(v)
        .map(|he| 0.5 * edge_vector(mesh, he).norm() * dihedral_angle(mesh, he))
        .sum()
}

/// The principal curvatures `[k1, k2]` at a vertex, `k1 <= k2`.
pub fn principal_curvatures<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> [f64; 2] {
    let area = circumcentric_dual_area(mesh, v);
    let h = scalar_mean_curvature(mesh, v) / area;
    let k = angle_defect(mesh, v) / area;
    let disc = (h * h - k).max(0.0).sqrt();
    [h - disc, h + disc]
}

// ==================== Matrices ====================

/// The cotan Laplace matrix, positive semi-definite: diagonal `+sum(w)`,
/// off-diagonal `-w` with `w = (cot(alpha) + cot(beta)) / 2`. Rows sum to zero.
pub fn laplace_matrix<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> CsrMatrix {
    let n = mesh.num_vertices();
    let mut triplets = Vec::with_capacity(2 * mesh.num_edges() + n);

    for v in mesh.vertex_ids() {
        let i = v.index();
        let mut sum = 0.0;
        for he in mesh.vertex_halfedges(v) {
            let j = mesh.dest(he).index();
            let w = 0.5 * (cotan(mesh, he) + cotan(mesh, mesh.twin(he)));
            triplets.push((i, j, -w));
            sum += w;
        }
        triplets.push((i, i, sum));
    }

    CsrMatrix::from_triplets(n, n, triplets)
}

/// The diagonal mass matrix of barycentric dual areas.
pub fn mass_matrix<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> CsrMatrix {
    let n = mesh.num_vertices();
    let triplets: Vec<(usize, usize, f64)> = mesh
        .vertex_ids()
        .map(|v| (v.index(), v.index(), barycentric_dual_area(mesh, v)))
        .collect();
    CsrMatrix::from_triplets(n, n, triplets)
}

// ==================== Normalization ====================

/// Translate the mesh so its vertex centroid is the origin; if `rescale` is
/// set, also scale it uniformly into the unit ball.
pub fn normalize<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, rescale: bool) {
    let n = mesh.num_vertices();
    if n == 0 {
        return;
    }

    let mut center = Vector3::zeros();
    for v in mesh.vertex_ids() {
        center += mesh.position(v).coords;
    }
    center /= n as f64;

    let ids: Vec<VertexId<I>> = mesh.vertex_ids().collect();
    for &v in &ids {
        let p = *mesh.position(v);
        mesh.set_position(v, Point3::from(p.coords - center));
    }

    if rescale {
        let radius = ids
            .iter()
            .map(|&v| mesh.position(v).coords.norm())
            .fold(0.0, f64::max);
        if radius > 0.0 {
            for &v in &ids {
                let p = *mesh.position(v);
                mesh.set_position(v, Point3::from(p.coords / radius));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_polygons, FaceId, HalfEdgeId};
    use std::f64::consts::PI;

    fn right_triangle() -> HalfEdgeMesh<u32> {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_polygons(&vertices, &[vec![0, 1, 2]]).unwrap()
    }

    fn unit_square_quad() -> HalfEdgeMesh<u32> {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_polygons(&vertices, &[vec![0, 1, 2, 3]]).unwrap()
    }

    fn tetrahedron() -> HalfEdgeMesh<u32> {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![2, 0, 3]];
        build_from_polygons(&vertices, &faces).unwrap()
    }

    fn flat_grid(n: usize) -> HalfEdgeMesh<u32> {
        let mut vertices = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        let mut faces = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push(vec![v00, v10, v11]);
                faces.push(vec![v00, v11, v01]);
            }
        }
        build_from_polygons(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_triangle_area_and_normal() {
        let mesh = right_triangle();
        let f = FaceId::new(0);

        assert!((face_area(&mesh, f) - 0.5).abs() < 1e-12);
        assert!((total_area(&mesh) - 0.5).abs() < 1e-12);

        let n = face_normal(&mesh, f).unwrap();
        assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_quad_area_centroid_normal() {
        let mesh = unit_square_quad();
        let f = FaceId::new(0);

        assert!((face_area(&mesh, f) - 1.0).abs() < 1e-12);
        assert!((total_area(&mesh) - 1.0).abs() < 1e-12);

        let c = centroid(&mesh, f);
        assert!((c - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-12);

        let n = face_normal(&mesh, f).unwrap();
        assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_boundary_loop_measures() {
        let mesh = right_triangle();
        let b = mesh.boundary_loops()[0];

        assert_eq!(face_area(&mesh, b), 0.0);
        assert!(face_normal(&mesh, b).is_none());
    }

    #[test]
    fn test_edge_lengths() {
        let mesh = right_triangle();

        let lengths: Vec<f64> = mesh.edge_ids().map(|e| edge_length(&mesh, e)).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(f64::total_cmp);
        assert!((sorted[0] - 1.0).abs() < 1e-12);
        assert!((sorted[1] - 1.0).abs() < 1e-12);
        assert!((sorted[2] - 2.0f64.sqrt()).abs() < 1e-12);

        let mean = mean_edge_length(&mesh);
        assert!((mean - (2.0 + 2.0f64.sqrt()) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_corner_angles() {
        let mesh = right_triangle();

        let angles: Vec<f64> = mesh
            .corner_ids()
            .map(|c| corner_angle(&mesh, c))
            .collect();
        let sum: f64 = angles.iter().sum();
        assert!((sum - PI).abs() < 1e-12);
        assert!(angles.iter().any(|&a| (a - PI / 2.0).abs() < 1e-12));
        assert_eq!(
            angles.iter().filter(|&&a| (a - PI / 4.0).abs() < 1e-12).count(),
            2
        );
    }

    #[test]
    fn test_cotan() {
        let mesh = right_triangle();

        // The right angle sits at vertex 0. Face [0, 1, 2]: he0 = 0->1 is
        // opposite vertex 2 (45 degrees), he1 = 1->2 opposite vertex 0
        // (90 degrees), he2 = 2->0 opposite vertex 1 (45 degrees).
        assert!((cotan(&mesh, HalfEdgeId::new(0)) - 1.0).abs() < 1e-12);
        assert!(cotan(&mesh, HalfEdgeId::new(1)).abs() < 1e-12);
        assert!((cotan(&mesh, HalfEdgeId::new(2)) - 1.0).abs() < 1e-12);

        // Synthetic boundary half-edges contribute nothing
        for he in mesh.halfedge_ids().filter(|&he| mesh.is_boundary_halfedge(he)) {
            assert_eq!(cotan(&mesh, he), 0.0);
        }
    }

    #[test]
    fn test_dihedral_angle_flat_and_folded() {
        // Two coplanar triangles
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2], vec![1, 0, 3]];
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        for he in mesh.halfedge_ids() {
            assert!(dihedral_angle(&mesh, he).abs() < 1e-12);
        }

        // Fold the second triangle 90 degrees out of plane
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.0, -1.0),
        ];
        let faces = vec![vec![0, 1, 2], vec![1, 0, 3]];
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        // The shared edge is the only one with two real faces
        let shared = mesh
            .halfedge_ids()
            .find(|&he| !mesh.is_boundary_edge(he))
            .unwrap();
        assert!((dihedral_angle(&mesh, shared).abs() - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_circumcenter_right_triangle() {
        let mesh = right_triangle();
        // The circumcenter of a right triangle is the hypotenuse midpoint
        let cc = circumcenter(&mesh, FaceId::new(0));
        assert!((cc - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_circumcenter_boundary_loop() {
        let mesh = unit_square_quad();
        let b = mesh.boundary_loops()[0];

        // Boundary loops have no circumscribed circle; fall back to the
        // representative half-edge midpoint, the same point centroid uses
        let he = mesh.face(b).halfedge;
        let p0 = mesh.position(mesh.origin(he));
        let p1 = mesh.position(mesh.dest(he));
        let mid = Point3::from((p0.coords + p1.coords) * 0.5);

        assert!((circumcenter(&mesh, b) - mid).norm() < 1e-12);
        assert!((circumcenter(&mesh, b) - centroid(&mesh, b)).norm() < 1e-12);
        assert!((circumcenter(&mesh, b) - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_orthonormal_bases() {
        let mesh = right_triangle();
        let [e1, e2] = orthonormal_bases(&mesh, FaceId::new(0)).unwrap();

        assert!((e1.norm() - 1.0).abs() < 1e-12);
        assert!((e2.norm() - 1.0).abs() < 1e-12);
        assert!(e1.dot(&e2).abs() < 1e-12);
    }

    #[test]
    fn test_angle_defect_gauss_bonnet() {
        // Closed mesh: total defect = 2 pi chi = 4 pi
        let mesh = tetrahedron();
        assert!((total_angle_defect(&mesh) - 4.0 * PI).abs() < 1e-10);

        // Disk: total defect = 2 pi chi = 2 pi, interior vertices flat
        let mesh = flat_grid(4);
        assert!((total_angle_defect(&mesh) - 2.0 * PI).abs() < 1e-10);
        let interior = VertexId::new(2 * 5 + 2);
        assert!(!mesh.is_boundary_vertex(interior));
        assert!(angle_defect(&mesh, interior).abs() < 1e-12);
    }

    #[test]
    fn test_dual_areas_flat_grid() {
        let mesh = flat_grid(4);
        let interior = VertexId::new(2 * 5 + 2);

        // Six incident unit right triangles: barycentric = 6 * 0.5 / 3
        assert!((barycentric_dual_area(&mesh, interior) - 1.0).abs() < 1e-12);
        // The circumcentric cell of the symmetric grid is the unit square
        assert!((circumcentric_dual_area(&mesh, interior) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scalar_curvatures_flat() {
        let mesh = flat_grid(4);
        let interior = VertexId::new(2 * 5 + 2);

        assert!(scalar_gauss_curvature(&mesh, interior).abs() < 1e-12);
        assert!(scalar_mean_curvature(&mesh, interior).abs() < 1e-12);

        let [k1, k2] = principal_curvatures(&mesh, interior);
        assert!(k1.abs() < 1e-10);
        assert!(k2.abs() < 1e-10);
    }

    #[test]
    fn test_principal_curvature_ordering() {
        let mesh = tetrahedron();
        for v in mesh.vertex_ids() {
            let [k1, k2] = principal_curvatures(&mesh, v);
            assert!(k1 <= k2);
            assert!(k1.is_finite() && k2.is_finite());
        }
    }

    #[test]
    fn test_vertex_normals_flat_grid() {
        let mesh = flat_grid(4);
        let interior = VertexId::new(2 * 5 + 2);
        let up = Vector3::new(0.0, 0.0, 1.0);

        assert!((vertex_normal_equally_weighted(&mesh, interior) - up).norm() < 1e-12);
        assert!((vertex_normal_area_weighted(&mesh, interior) - up).norm() < 1e-12);
        assert!((vertex_normal_angle_weighted(&mesh, interior) - up).norm() < 1e-12);
        assert!((vertex_normal_sphere_inscribed(&mesh, interior) - up).norm() < 1e-12);
    }

    #[test]
    fn test_vertex_normals_tetrahedron_outward() {
        let mesh = tetrahedron();
        let inside = Point3::new(0.5, 0.5, 0.25);

        for v in mesh.vertex_ids() {
            let outward = (mesh.position(v) - inside).normalize();
            for normal in [
                vertex_normal_equally_weighted(&mesh, v),
                vertex_normal_area_weighted(&mesh, v),
                vertex_normal_angle_weighted(&mesh, v),
                vertex_normal_gauss_curvature(&mesh, v),
                vertex_normal_mean_curvature(&mesh, v),
                vertex_normal_sphere_inscribed(&mesh, v),
            ] {
                assert!((normal.norm() - 1.0).abs() < 1e-10);
                assert!(
                    normal.dot(&outward) > 0.0,
                    "inward normal {:?} at {:?}",
                    normal,
                    v
                );
            }
        }
    }

    #[test]
    fn test_laplace_matrix_rows_sum_to_zero() {
        let mesh = flat_grid(3);
        let laplace = laplace_matrix(&mesh);

        let n = mesh.num_vertices();
        assert_eq!(laplace.nrows(), n);
        assert_eq!(laplace.ncols(), n);

        let ones = nalgebra::DVector::from_element(n, 1.0);
        let result = laplace.mul_vec(&ones);
        for i in 0..n {
            assert!(result[i].abs() < 1e-10, "row {} sums to {}", i, result[i]);
        }

        // Symmetric off-diagonal weights
        for i in 0..n {
            for j in 0..n {
                assert!((laplace.get(i, j) - laplace.get(j, i)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_mass_matrix_totals_surface_area() {
        let mesh = flat_grid(3);
        let mass = mass_matrix(&mesh);

        let trace: f64 = (0..mesh.num_vertices()).map(|i| mass.get(i, i)).sum();
        assert!((trace - total_area(&mesh)).abs() < 1e-10);
    }

    #[test]
    fn test_normalize() {
        let mut mesh = flat_grid(2);
        normalize(&mut mesh, true);

        let mut center = Vector3::zeros();
        let mut radius = 0.0f64;
        for v in mesh.vertex_ids() {
            center += mesh.position(v).coords;
            radius = radius.max(mesh.position(v).coords.norm());
        }
        center /= mesh.num_vertices() as f64;

        assert!(center.norm() < 1e-12);
        assert!((radius - 1.0).abs() < 1e-12);
    }
}
