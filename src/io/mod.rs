//! Mesh file I/O.
//!
//! The kernel reads and writes meshes in the ASCII OFF format. The format
//! logic lives in [`off`] as pure string functions, with path-based wrappers
//! on top.
//!
//! # Usage
//!
//! ```no_run
//! use sliver::io::{load, save};
//! use sliver::mesh::HalfEdgeMesh;
//!
//! let mesh: HalfEdgeMesh = load("model.off").unwrap();
//! save(&mesh, "output.off").unwrap();
//! ```

pub mod off;

use std::path::Path;

use crate::error::Result;
use crate::mesh::{HalfEdgeMesh, MeshIndex};

pub use off::{OffData, OffError};

/// Load a mesh from an OFF file.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    off::load(path)
}

/// Save a mesh to an OFF file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    off::save(mesh, path)
}
