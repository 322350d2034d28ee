//! Hull files on disk and scenarios built from them.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use mesh_io::{StlEncoding, save_stl};
use mesh_types::{IndexedMesh, box_mesh};
use nalgebra::{Point3, Vector3};
use sim_core::{ConstantForce, SimpleBodyDrag};
use sim_hydro::{GeneratorConfig, ScenarioConfig, SolidGeometry, load_solid};
use sim_types::{BoatState, BodyKinematics, MassProperties, SimError, SimulationConfig};
use tempfile::TempDir;

fn pontoon() -> IndexedMesh {
    box_mesh(Point3::new(-1.0, -0.5, -0.25), Point3::new(1.0, 0.5, 0.25))
}

fn write_stl(dir: &Path, name: &str, mesh: &IndexedMesh, encoding: StlEncoding) -> PathBuf {
    let path = dir.join(name);
    save_stl(mesh, &path, encoding).unwrap();
    path
}

const CUBE_OBJ: &str = "\
# unit cube
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
f 1 3 2
f 1 4 3
f 5 6 7
f 5 7 8
f 1 2 6
f 1 6 5
f 2 3 7
f 2 7 6
f 3 4 8
f 3 8 7
f 4 1 5
f 4 5 8
";

#[test]
fn binary_and_ascii_stl_load_the_same_solid() {
    let dir = TempDir::new().unwrap();
    let binary = load_solid(write_stl(dir.path(), "b.stl", &pontoon(), StlEncoding::Binary)).unwrap();
    let ascii = load_solid(write_stl(dir.path(), "a.stl", &pontoon(), StlEncoding::Ascii)).unwrap();

    for mesh in [&binary, &ascii] {
        assert!(mesh.is_watertight());
        assert_eq!(mesh.vertices.len(), 8);
        assert_relative_eq!(SolidGeometry::volume(mesh), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn obj_cube_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cube.obj");
    std::fs::write(&path, CUBE_OBJ).unwrap();

    let cube = load_solid(&path).unwrap();
    assert_relative_eq!(SolidGeometry::volume(&cube), 1.0, epsilon = 1e-12);
    assert_relative_eq!(
        cube.centroid().unwrap(),
        Point3::new(0.5, 0.5, 0.5),
        epsilon = 1e-12
    );
}

#[test]
fn inside_out_file_is_flipped() {
    let mut mesh = pontoon();
    mesh.flip_normals();
    assert!(mesh.signed_volume() < 0.0);

    let dir = TempDir::new().unwrap();
    let loaded = load_solid(write_stl(dir.path(), "flipped.stl", &mesh, StlEncoding::Binary)).unwrap();
    assert!(loaded.signed_volume() > 0.0);
}

#[test]
fn open_file_is_rejected() {
    let mut mesh = pontoon();
    mesh.faces.truncate(10);

    let dir = TempDir::new().unwrap();
    let path = write_stl(dir.path(), "open.stl", &mesh, StlEncoding::Binary);
    match load_solid(&path).unwrap_err() {
        SimError::NonWatertightMesh { boundary_edges } => assert!(boundary_edges > 0),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreadable_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.stl");
    std::fs::write(&path, b"not a mesh").unwrap();
    assert!(matches!(load_solid(&path), Err(SimError::MeshLoad { .. })));
}

fn floating_scenario(hull: PathBuf) -> ScenarioConfig {
    let state = BoatState::new(
        BodyKinematics::at_rest(Vector3::new(0.0, 0.0, 0.125)),
        MassProperties::solid_box(250.0, Vector3::new(2.0, 1.0, 0.5)),
    );
    ScenarioConfig::new(state)
        .with_initial("rho__water", 1000.0)
        .with_initial("r_z__water", 0.0)
        .with_initial("v_x__water", 0.0)
        .with_initial("v_y__water", 0.0)
        .with_initial("v_z__water", 0.0)
        .with_generator(GeneratorConfig::MeshGravity {
            name: "gravity".into(),
            path: hull.clone(),
        })
        .with_generator(GeneratorConfig::MeshBuoyancy {
            name: "buoyancy".into(),
            path: hull.clone(),
        })
        .with_generator(GeneratorConfig::MeshBodyDrag {
            name: "hull_drag".into(),
            path: hull,
            drag_coefficient: 1.2,
        })
        .with_generator(GeneratorConfig::SimpleBodyDrag(SimpleBodyDrag::new(
            "skin", 5.0, 1.0,
        )))
        .with_generator(GeneratorConfig::ConstantForce(ConstantForce::force(
            "thrust",
            Vector3::new(100.0, 0.0, 0.0),
        )))
        .with_simulation(SimulationConfig::with_timestep(0.01).duration(2.0))
}

#[test]
fn pushed_pontoon_moves_forward_and_floats() {
    let dir = TempDir::new().unwrap();
    let hull = write_stl(dir.path(), "pontoon.stl", &pontoon(), StlEncoding::Binary);

    let history = floating_scenario(hull).run().unwrap();
    assert_eq!(history.len(), 200);

    let last = history.last().unwrap();
    assert!(last.body.r.x > 0.0);
    assert!(last.body.v.x > 0.0);
    assert!((last.body.r.z - 0.125).abs() < 0.05);

    let hull_drag = last.contributions.get("hull_drag").unwrap();
    assert!(hull_drag.force.x < 0.0);
    assert!(last.labels.get("submerged_volume__buoyancy").unwrap() > 0.2);

    let table = history.to_table();
    assert_eq!(table.columns[0], "t");
    assert!(table.column_index("force_x__thrust").is_some());
}

#[test]
fn missing_hull_file_fails_the_build() {
    let dir = TempDir::new().unwrap();
    let err = floating_scenario(dir.path().join("absent.stl")).build().unwrap_err();
    assert!(matches!(err, SimError::MeshLoad { .. }));
}

#[test]
fn missing_environment_is_listed_in_full() {
    let dir = TempDir::new().unwrap();
    let hull = write_stl(dir.path(), "pontoon.stl", &pontoon(), StlEncoding::Binary);
    let mut scenario = floating_scenario(hull);
    scenario.initial.retain(|(k, _)| !k.ends_with("__water"));

    match scenario.build().unwrap_err() {
        SimError::MissingLabels { labels } => {
            for key in ["rho__water", "r_z__water", "v_x__water", "v_y__water", "v_z__water"] {
                assert!(labels.iter().any(|l| l == key), "{key} not reported");
            }
        }
        other => panic!("unexpected error: {other}"),
    }
}
