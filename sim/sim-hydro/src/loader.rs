//! Loading closed solids from mesh files.

use std::path::Path;

use mesh_io::load_mesh;
use mesh_repair::{RepairError, RepairParams, ensure_closed, repair_mesh};
use mesh_types::IndexedMesh;
use sim_types::{Result, SimError};
use tracing::{info, warn};

/// Load a mesh file (STL or OBJ) as a closed solid.
///
/// Coincident vertices are welded first, since STL stores every triangle
/// separately. Degenerate faces are dropped. An inside-out mesh is flipped so
/// face normals point out of the solid.
///
/// # Errors
///
/// - [`SimError::MeshLoad`] if the file cannot be read or parsed, or its
///   faces are empty or broken
/// - [`SimError::NonWatertightMesh`] if the surface has open edges
pub fn load_solid<P: AsRef<Path>>(path: P) -> Result<IndexedMesh> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let mut mesh = load_mesh(path).map_err(|e| SimError::mesh_load(&shown, e))?;
    let summary = repair_mesh(&mut mesh, &RepairParams::default());
    if summary.degenerates_removed > 0 {
        warn!(
            path = %shown,
            removed = summary.degenerates_removed,
            "dropped degenerate faces"
        );
    }

    let report = ensure_closed(&mesh).map_err(|e| match e {
        RepairError::NotWatertight { boundary_edges } => {
            SimError::NonWatertightMesh { boundary_edges }
        }
        other => SimError::mesh_load(&shown, other),
    })?;
    if report.is_inside_out {
        warn!(path = %shown, "mesh is inside out, flipping faces");
        mesh.flip_normals();
    }

    info!(
        path = %shown,
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        welded = summary.vertices_welded,
        volume = mesh.volume(),
        "loaded solid"
    );
    Ok(mesh)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_solid("/definitely/not/here/hull.stl").unwrap_err();
        match err {
            SimError::MeshLoad { path, .. } => assert!(path.ends_with("hull.stl")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
