//! Hull mesh file loading.
//!
//! - **STL** (Stereolithography), binary and ASCII, read and write
//! - **OBJ** (Wavefront), geometry records only, read
//!
//! # Layer 0 Crate
//!
//! No engine dependencies.
//!
//! # Format Detection
//!
//! [`load_mesh`] picks the format from the file extension:
//!
//! ```no_run
//! use mesh_io::load_mesh;
//!
//! let hull = load_mesh("hull.stl")?;
//! println!("{} faces", hull.faces.len());
//! # Ok::<(), mesh_io::IoError>(())
//! ```
//!
//! Loaded STL meshes are triangle soup; weld them (see `mesh-repair`)
//! before checking they are closed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod obj;
mod stl;

pub use error::{IoError, IoResult};
pub use obj::{load_obj, parse_obj};
pub use stl::{StlEncoding, load_stl, parse_stl, save_stl, write_stl};

use std::path::Path;

use mesh_types::IndexedMesh;
use tracing::debug;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// STL, binary or ASCII.
    Stl,
    /// Wavefront OBJ.
    Obj,
}

impl MeshFormat {
    /// Detect format from file extension (case-insensitive).
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Canonical file extension.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
        }
    }
}

/// Load a mesh, detecting the format from the extension.
///
/// # Errors
///
/// - [`IoError::UnknownFormat`] for an unrecognised extension
/// - [`IoError::FileNotFound`] if the file does not exist
/// - any parse error of the detected format
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path).ok_or_else(|| IoError::UnknownFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    let mesh = match format {
        MeshFormat::Stl => load_stl(path)?,
        MeshFormat::Obj => load_obj(path)?,
    };

    debug!(
        path = %path.display(),
        format = format.extension(),
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "Loaded mesh"
    );
    Ok(mesh)
}
