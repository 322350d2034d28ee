//! Property-based tests for validation and welding.
//!
//! Run with: cargo test -p mesh-repair -- proptest

use mesh_repair::{RepairParams, ensure_closed, repair_mesh, validate_mesh, weld_vertices};
use mesh_types::{IndexedMesh, Point3, Vertex, box_mesh};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_vertex() -> impl Strategy<Value = Vertex> {
    prop::array::uniform3(-100.0..100.0f64).prop_map(Vertex::from)
}

/// Random mesh with in-range face indices.
fn arb_mesh(max_vertices: usize, max_faces: usize) -> impl Strategy<Value = IndexedMesh> {
    prop::collection::vec(arb_vertex(), 3..=max_vertices).prop_flat_map(move |verts| {
        let n = verts.len() as u32;
        prop::collection::vec(prop::array::uniform3(0..n), 1..=max_faces)
            .prop_map(move |faces| IndexedMesh::from_parts(verts.clone(), faces))
    })
}

/// Axis-aligned box with random corner and extents.
fn arb_box() -> impl Strategy<Value = IndexedMesh> {
    (
        prop::array::uniform3(-50.0..50.0f64),
        prop::array::uniform3(0.1..20.0f64),
    )
        .prop_map(|(min, size)| {
            let min = Point3::from(min);
            let max = Point3::new(min.x + size[0], min.y + size[1], min.z + size[2]);
            box_mesh(min, max)
        })
}

/// Explode a mesh into triangle soup: three private vertices per face.
fn to_soup(mesh: &IndexedMesh) -> IndexedMesh {
    let mut soup = IndexedMesh::new();
    for face in &mesh.faces {
        let base = soup.vertices.len() as u32;
        soup.vertices
            .extend(face.iter().map(|&i| mesh.vertices[i as usize]));
        soup.faces.push([base, base + 1, base + 2]);
    }
    soup
}

// =============================================================================
// Validation
// =============================================================================

proptest! {
    #[test]
    fn validation_never_panics(mesh in arb_mesh(40, 80)) {
        let _ = validate_mesh(&mesh);
        let _ = ensure_closed(&mesh);
    }

    #[test]
    fn boxes_are_closed_solids(mesh in arb_box()) {
        let report = ensure_closed(&mesh);
        prop_assert!(report.is_ok());
        prop_assert!(validate_mesh(&mesh).is_closed_solid());
    }
}

// =============================================================================
// Welding
// =============================================================================

proptest! {
    #[test]
    fn weld_produces_valid_indices(mesh in arb_mesh(30, 50)) {
        let mut welded = mesh.clone();
        weld_vertices(&mut welded, 0.5);
        mesh_repair::remove_unreferenced_vertices(&mut welded);

        let vertex_count = welded.vertices.len() as u32;
        for face in &welded.faces {
            prop_assert!(face.iter().all(|&i| i < vertex_count));
        }
    }

    #[test]
    fn soup_repair_recovers_closed_box(mesh in arb_box()) {
        let mut soup = to_soup(&mesh);
        prop_assert!(!validate_mesh(&soup).is_watertight);

        let summary = repair_mesh(&mut soup, &RepairParams::default());
        prop_assert!(summary.had_changes());
        prop_assert_eq!(soup.vertices.len(), 8);
        prop_assert!(ensure_closed(&soup).is_ok());
        prop_assert!((soup.volume() - mesh.volume()).abs() <= 1e-9 * mesh.volume().max(1.0));
    }
}

#[test]
fn closed_mesh_repair_is_noop() {
    let mut cube = mesh_types::unit_cube();
    let summary = repair_mesh(&mut cube, &RepairParams::default());
    assert!(!summary.had_changes());
    assert_eq!(cube.vertices.len(), 8);
    assert_eq!(cube.faces.len(), 12);
}
