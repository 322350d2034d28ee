//! Mesh cleanup operations.
//!
//! Triangle-soup formats (STL in particular) store every face with its own
//! three vertices, so a mesh loaded from them has no shared edges until
//! coincident vertices are welded.

use std::fmt;

use hashbrown::HashMap;
use mesh_types::IndexedMesh;
use nalgebra::Point3;

/// Cleanup thresholds, in mesh units.
#[derive(Debug, Clone)]
pub struct RepairParams {
    /// Vertices closer than this are merged. Default: `1e-9`.
    pub weld_epsilon: f64,
    /// Faces with smaller area are dropped. Default: `1e-12`.
    pub degenerate_area_threshold: f64,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            weld_epsilon: 1e-9,
            degenerate_area_threshold: 1e-12,
        }
    }
}

impl RepairParams {
    /// Set the weld distance.
    #[must_use]
    pub const fn with_weld_epsilon(mut self, epsilon: f64) -> Self {
        self.weld_epsilon = epsilon;
        self
    }
}

/// Counts of what [`repair_mesh`] changed.
#[derive(Debug, Clone, Default)]
pub struct RepairSummary {
    /// Vertices merged into another vertex.
    pub vertices_welded: usize,
    /// Faces dropped as degenerate (including faces collapsed by welding).
    pub degenerates_removed: usize,
    /// Vertices no face referenced.
    pub unreferenced_removed: usize,
}

impl RepairSummary {
    /// True if anything was changed.
    #[must_use]
    pub fn had_changes(&self) -> bool {
        self.vertices_welded > 0 || self.degenerates_removed > 0 || self.unreferenced_removed > 0
    }
}

impl fmt::Display for RepairSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} welded, {} degenerate, {} unreferenced",
            self.vertices_welded, self.degenerates_removed, self.unreferenced_removed
        )
    }
}

/// Weld, drop degenerate faces, then compact vertices.
pub fn repair_mesh(mesh: &mut IndexedMesh, params: &RepairParams) -> RepairSummary {
    let faces_before = mesh.faces.len();
    let vertices_welded = weld_vertices(mesh, params.weld_epsilon);
    remove_degenerate_triangles(mesh, params.degenerate_area_threshold);
    let degenerates_removed = faces_before - mesh.faces.len();
    let unreferenced_removed = remove_unreferenced_vertices(mesh);

    RepairSummary {
        vertices_welded,
        degenerates_removed,
        unreferenced_removed,
    }
}

/// Remove faces with area below `area_threshold`. Returns the count removed.
pub fn remove_degenerate_triangles(mesh: &mut IndexedMesh, area_threshold: f64) -> usize {
    let before = mesh.faces.len();
    let vertices = &mesh.vertices;

    mesh.faces.retain(|&[a, b, c]| {
        let v0 = vertices[a as usize].position;
        let v1 = vertices[b as usize].position;
        let v2 = vertices[c as usize].position;
        (v1 - v0).cross(&(v2 - v0)).norm() * 0.5 >= area_threshold
    });

    before - mesh.faces.len()
}

/// Merge vertices closer than `epsilon`, remapping faces onto the first
/// vertex of each cluster.
///
/// Uses a uniform grid with cell size `2·epsilon` and searches the 27
/// neighbouring cells. Faces collapsed to an edge or point are dropped.
/// Merged vertices stay in the array until
/// [`remove_unreferenced_vertices`] compacts it. Returns the number of
/// vertices merged.
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
/// use mesh_repair::weld_vertices;
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([0, 3, 2]);
///
/// assert_eq!(weld_vertices(&mut mesh, 1e-6), 1);
/// assert_eq!(mesh.faces[1], [0, 1, 2]);
/// ```
#[allow(clippy::cast_possible_truncation)]
// Truncation: mesh indices are u32
pub fn weld_vertices(mesh: &mut IndexedMesh, epsilon: f64) -> usize {
    if mesh.vertices.is_empty() || epsilon <= 0.0 {
        return 0;
    }

    let cell_size = epsilon * 2.0;
    let mut grid: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    let mut canonical: Vec<u32> = Vec::with_capacity(mesh.vertices.len());
    let mut merged = 0;

    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        let p = vertex.position;
        let (cx, cy, cz) = grid_cell(&p, cell_size);

        let mut found = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    if let Some(&rep) = bucket
                        .iter()
                        .find(|&&rep| (mesh.vertices[rep as usize].position - p).norm() < epsilon)
                    {
                        found = Some(rep);
                        break 'search;
                    }
                }
            }
        }

        match found {
            Some(rep) => {
                canonical.push(rep);
                merged += 1;
            }
            None => {
                canonical.push(idx as u32);
                grid.entry((cx, cy, cz)).or_default().push(idx as u32);
            }
        }
    }

    if merged == 0 {
        return 0;
    }

    for face in &mut mesh.faces {
        for i in face.iter_mut() {
            *i = canonical[*i as usize];
        }
    }
    mesh.faces
        .retain(|&[a, b, c]| a != b && b != c && a != c);

    merged
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: coordinates / cell size stay far inside i64 for real meshes
fn grid_cell(pos: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    (
        (pos.x / cell_size).floor() as i64,
        (pos.y / cell_size).floor() as i64,
        (pos.z / cell_size).floor() as i64,
    )
}

/// Drop vertices no face references and compact the array, preserving
/// order. Returns the number removed.
#[allow(clippy::cast_possible_truncation)]
// Truncation: mesh indices are u32
pub fn remove_unreferenced_vertices(mesh: &mut IndexedMesh) -> usize {
    let mut remap: Vec<Option<u32>> = vec![None; mesh.vertices.len()];
    for &i in mesh.faces.iter().flatten() {
        remap[i as usize] = Some(0);
    }

    let mut next = 0u32;
    for slot in &mut remap {
        if slot.is_some() {
            *slot = Some(next);
            next += 1;
        }
    }

    let removed = mesh.vertices.len() - next as usize;
    if removed == 0 {
        return 0;
    }

    let mut idx = 0;
    mesh.vertices.retain(|_| {
        let keep = remap[idx].is_some();
        idx += 1;
        keep
    });

    for face in &mut mesh.faces {
        for i in face.iter_mut() {
            *i = remap[*i as usize].unwrap_or(0);
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{Vertex, unit_cube};

    /// Unit cube with every face carrying its own three vertices.
    fn cube_soup() -> IndexedMesh {
        let cube = unit_cube();
        let mut soup = IndexedMesh::new();
        for tri in cube.faces.iter().map(|f| f.map(|i| cube.vertices[i as usize])) {
            let base = soup.vertices.len() as u32;
            soup.vertices.extend(tri);
            soup.faces.push([base, base + 1, base + 2]);
        }
        soup
    }

    #[test]
    fn weld_restores_shared_vertices() {
        let mut soup = cube_soup();
        assert_eq!(soup.vertices.len(), 36);

        let summary = repair_mesh(&mut soup, &RepairParams::default());
        assert_eq!(summary.vertices_welded, 28);
        assert_eq!(summary.unreferenced_removed, 28);
        assert_eq!(soup.vertices.len(), 8);
        assert_eq!(soup.faces.len(), 12);
        assert_relative_eq!(soup.volume(), 1.0, epsilon = 1e-12);
        assert!(crate::validate_mesh(&soup).is_watertight);
    }

    #[test]
    fn weld_respects_epsilon() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1e-3, 0.0, 0.0));
        mesh.faces.push([0, 1, 1]);
        assert_eq!(weld_vertices(&mut mesh, 1e-6), 0);
        assert_eq!(weld_vertices(&mut mesh, 1e-2), 1);
    }

    #[test]
    fn weld_across_cell_border() {
        let mut mesh = IndexedMesh::new();
        // Straddle a grid cell boundary at x = 0
        mesh.vertices.push(Vertex::from_coords(-1e-10, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1e-10, 0.0, 0.0));
        assert_eq!(weld_vertices(&mut mesh, 1e-9), 1);
    }

    #[test]
    fn weld_drops_collapsed_faces() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        weld_vertices(&mut mesh, 1e-6);
        assert!(mesh.faces.is_empty());
    }

    #[test]
    fn degenerate_faces_removed() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(10.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(5.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([0, 1, 3]);
        assert_eq!(remove_degenerate_triangles(&mut mesh, 1e-9), 1);
        assert_eq!(mesh.faces, vec![[0, 1, 3]]);
    }

    #[test]
    fn unreferenced_compaction_preserves_order() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(9.0, 9.0, 9.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([1, 2, 3]);

        assert_eq!(remove_unreferenced_vertices(&mut mesh), 1);
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
        assert_relative_eq!(mesh.vertices[0].position.x, 0.0);
        assert_eq!(remove_unreferenced_vertices(&mut mesh), 0);
    }
}
