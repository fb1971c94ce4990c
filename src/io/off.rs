//! OFF (Object File Format) support.
//!
//! ASCII OFF: a literal `OFF` header, a `<vertexCount> <faceCount> 0` counts
//! line, one `x y z` line per vertex, and one `<n> i0 i1 ... i(n-1)` line per
//! face. The pure [`parse`] and [`format`] functions work on strings;
//! [`load`] and [`save`] wrap them for file paths.
//!
//! Malformed input is reported through [`OffError`] so callers can tell a
//! wrong header from a bad vertex or face line without unwinding.

use std::fs;
use std::path::Path;

use nalgebra::Point3;
use thiserror::Error;

use crate::error::{GeomError, Result};
use crate::mesh::{build_from_polygons, HalfEdgeMesh, MeshIndex};

/// Parse failure for OFF content.
///
/// Line numbers are 1-based positions in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OffError {
    /// Missing `OFF` header, malformed counts line, or wrong line count.
    #[error("not a valid OFF file")]
    IncorrectFormat,
    /// A vertex line did not hold exactly three coordinates.
    #[error("malformed vertex on line {line}")]
    IncorrectVertex {
        /// The offending line.
        line: usize,
    },
    /// A face line did not hold a vertex count followed by that many indices.
    #[error("malformed face on line {line}")]
    IncorrectFace {
        /// The offending line.
        line: usize,
    },
}

/// Raw mesh data read from an OFF file.
#[derive(Debug, Clone, PartialEq)]
pub struct OffData {
    /// Vertex positions, in file order.
    pub vertices: Vec<Point3<f64>>,
    /// Faces as vertex index lists, in file order.
    pub faces: Vec<Vec<usize>>,
}

/// Parse OFF content into raw vertex and face lists.
pub fn parse(input: &str) -> std::result::Result<OffData, OffError> {
    let lines: Vec<&str> = input.lines().collect();

    if lines.is_empty() || lines[0].trim() != "OFF" {
        return Err(OffError::IncorrectFormat);
    }

    let counts: Vec<&str> = lines
        .get(1)
        .ok_or(OffError::IncorrectFormat)?
        .split_whitespace()
        .collect();
    if counts.len() < 2 {
        return Err(OffError::IncorrectFormat);
    }
    let num_vertices: usize = counts[0].parse().map_err(|_| OffError::IncorrectFormat)?;
    let num_faces: usize = counts[1].parse().map_err(|_| OffError::IncorrectFormat)?;

    if lines.len() != num_vertices + num_faces + 2 {
        return Err(OffError::IncorrectFormat);
    }

    let mut vertices = Vec::with_capacity(num_vertices);
    for i in 0..num_vertices {
        let line = 2 + i;
        let coords: std::result::Result<Vec<f64>, _> = lines[line]
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect();
        match coords {
            Ok(coords) if coords.len() == 3 => {
                vertices.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            _ => return Err(OffError::IncorrectVertex { line: line + 1 }),
        }
    }

    let mut faces = Vec::with_capacity(num_faces);
    for i in 0..num_faces {
        let line = 2 + num_vertices + i;
        let fields: std::result::Result<Vec<usize>, _> = lines[line]
            .split_whitespace()
            .map(str::parse::<usize>)
            .collect();
        match fields {
            Ok(fields) if !fields.is_empty() && fields.len() == fields[0] + 1 => {
                faces.push(fields[1..].to_vec());
            }
            _ => return Err(OffError::IncorrectFace { line: line + 1 }),
        }
    }

    Ok(OffData { vertices, faces })
}

/// Format a mesh as OFF content.
///
/// Boundary loops are synthetic and are not written.
pub fn format<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> String {
    let mut out = String::new();
    out.push_str("OFF\n");
    out.push_str(&std::format!(
        "{} {} 0\n",
        mesh.num_vertices(),
        mesh.num_faces()
    ));

    for v in mesh.vertex_ids() {
        let p = mesh.position(v);
        out.push_str(&std::format!("{} {} {}\n", p.x, p.y, p.z));
    }

    for f in mesh.face_ids() {
        out.push_str(&mesh.face_degree(f).to_string());
        for v in mesh.face_vertices(f) {
            out.push(' ');
            out.push_str(&v.index().to_string());
        }
        out.push('\n');
    }

    out
}

/// Load a mesh from an OFF file.
///
/// # Example
///
/// ```no_run
/// use sliver::io::off;
/// use sliver::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = off::load("model.off").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let data = parse(&content).map_err(|e| GeomError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    build_from_polygons(&data.vertices, &data.faces)
}

/// Save a mesh to an OFF file.
///
/// # Example
///
/// ```no_run
/// use sliver::io::off;
/// use sliver::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = HalfEdgeMesh::new();
/// off::save(&mesh, "output.off").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format(mesh)).map_err(|e| GeomError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygons;

    const UNIT_SQUARE: &str = "OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n";

    #[test]
    fn test_parse_unit_square() {
        let data = parse(UNIT_SQUARE).unwrap();
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.faces, vec![vec![0, 1, 2, 3]]);
        assert_eq!(data.vertices[2], Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        assert_eq!(parse(""), Err(OffError::IncorrectFormat));
        assert_eq!(
            parse("PLY\n4 1 0\n"),
            Err(OffError::IncorrectFormat)
        );
        // Counts that do not match the number of lines
        assert_eq!(
            parse("OFF\n4 1 0\n0 0 0\n"),
            Err(OffError::IncorrectFormat)
        );
        // Non-numeric counts
        assert_eq!(
            parse("OFF\nfour 1 0\n"),
            Err(OffError::IncorrectFormat)
        );
    }

    #[test]
    fn test_parse_rejects_bad_vertex() {
        let input = "OFF\n3 1 0\n0 0 0\n1 0\n0 1 0\n3 0 1 2\n";
        assert_eq!(parse(input), Err(OffError::IncorrectVertex { line: 4 }));

        let input = "OFF\n3 1 0\n0 0 0\n1 0 zero\n0 1 0\n3 0 1 2\n";
        assert_eq!(parse(input), Err(OffError::IncorrectVertex { line: 4 }));
    }

    #[test]
    fn test_parse_rejects_bad_face() {
        // Count does not match the index list
        let input = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n4 0 1 2\n";
        assert_eq!(parse(input), Err(OffError::IncorrectFace { line: 6 }));

        let input = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 one 2\n";
        assert_eq!(parse(input), Err(OffError::IncorrectFace { line: 6 }));
    }

    #[test]
    fn test_format_skips_boundary_loops() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3]];
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        // One boundary loop exists but only the real face is written
        assert_eq!(mesh.num_boundary_loops(), 1);
        let text = format(&mesh);
        assert_eq!(text, UNIT_SQUARE);
    }

    #[test]
    fn test_round_trip() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![2, 0, 3]];
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        let data = parse(&format(&mesh)).unwrap();
        assert_eq!(data.vertices.len(), mesh.num_vertices());
        assert_eq!(data.faces.len(), mesh.num_faces());
        for (v, p) in mesh.vertex_ids().zip(&data.vertices) {
            assert!((mesh.position(v) - p).norm() < 1e-12);
        }

        let rebuilt: HalfEdgeMesh<u32> =
            build_from_polygons(&data.vertices, &data.faces).unwrap();
        assert_eq!(rebuilt.num_halfedges(), mesh.num_halfedges());
        assert_eq!(rebuilt.euler_characteristic(), mesh.euler_characteristic());
    }
}
