//! Half-space clipping.

// Mesh indices are u32 by convention
#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashMap;
use mesh_transform::Plane;
use mesh_types::{IndexedMesh, Vertex};
use tracing::debug;

use crate::cap::cap_boundary;
use crate::error::{SliceError, SliceResult};
use crate::params::SliceParams;
use crate::result::HalfSpaceSlice;

/// Keep the part of `mesh` on the positive side of `plane` (the side the
/// normal points to), closing the cut with cap faces if `params.cap` is set.
///
/// Vertices within `params.snap_tolerance` of the plane count as on it.
/// Faces lying entirely on the plane are dropped; when capping, the cap
/// replaces them. Vertices that end up unreferenced are not carried over.
///
/// # Errors
///
/// - [`SliceError::InvalidTolerance`] for a negative or non-finite tolerance
/// - [`SliceError::InvalidIndex`] if a face references a missing vertex
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, Point3, Vector3};
/// use mesh_transform::Plane;
/// use mesh_slice::{slice_half_space, SliceParams};
///
/// let plane = Plane::new(Point3::new(0.5, 0.0, 0.0), Vector3::x());
/// let right = plane.map(|p| slice_half_space(&unit_cube(), &p, &SliceParams::default()));
/// let right = right.transpose()?.unwrap_or_default();
/// assert!((right.mesh.volume() - 0.5).abs() < 1e-12);
/// # Ok::<(), mesh_slice::SliceError>(())
/// ```
pub fn slice_half_space(
    mesh: &IndexedMesh,
    plane: &Plane,
    params: &SliceParams,
) -> SliceResult<HalfSpaceSlice> {
    let tol = params.snap_tolerance;
    if !tol.is_finite() || tol < 0.0 {
        return Err(SliceError::InvalidTolerance(tol));
    }

    let vertex_count = mesh.vertices.len();
    for (face, &[a, b, c]) in mesh.faces.iter().enumerate() {
        if let Some(&index) = [a, b, c].iter().find(|&&i| i as usize >= vertex_count) {
            return Err(SliceError::InvalidIndex {
                face,
                index,
                vertex_count,
            });
        }
    }

    let distances: Vec<f64> = mesh
        .vertices
        .iter()
        .map(|v| {
            let d = plane.signed_distance(&v.position);
            if d.abs() < tol { 0.0 } else { d }
        })
        .collect();

    let mut clipper = Clipper::new(mesh, &distances);
    for &face in &mesh.faces {
        clipper.clip_face(face);
    }
    let Clipper {
        mut out, cut_edges, ..
    } = clipper;

    let cap_face_start = out.faces.len();
    let (loop_count, open_chain_count) = if params.cap && !out.faces.is_empty() {
        let caps = cap_boundary(&out.faces);
        out.faces.extend(caps.faces);
        (caps.loops, caps.open_chains)
    } else {
        (0, 0)
    };

    debug!(
        input_faces = mesh.faces.len(),
        kept_faces = cap_face_start,
        cap_faces = out.faces.len() - cap_face_start,
        cut_edges,
        loops = loop_count,
        "Sliced mesh by half-space"
    );

    Ok(HalfSpaceSlice {
        mesh: out,
        cap_face_start,
        loop_count,
        open_chain_count,
    })
}

/// Builds the kept mesh, sharing vertices between faces.
struct Clipper<'a> {
    source: &'a IndexedMesh,
    distances: &'a [f64],
    out: IndexedMesh,
    /// Output index of each kept source vertex.
    kept: Vec<Option<u32>>,
    /// Output index of the cut point on each crossing edge (min, max).
    crossings: HashMap<(u32, u32), u32>,
    cut_edges: usize,
}

impl<'a> Clipper<'a> {
    fn new(source: &'a IndexedMesh, distances: &'a [f64]) -> Self {
        Self {
            source,
            distances,
            out: IndexedMesh::new(),
            kept: vec![None; source.vertices.len()],
            crossings: HashMap::new(),
            cut_edges: 0,
        }
    }

    fn clip_face(&mut self, face: [u32; 3]) {
        let d = face.map(|i| self.distances[i as usize]);

        if d.iter().all(|&x| x == 0.0) || d.iter().all(|&x| x <= 0.0) {
            return;
        }
        if d.iter().all(|&x| x >= 0.0) {
            let tri = face.map(|i| self.keep_vertex(i));
            self.out.faces.push(tri);
            return;
        }

        // Sutherland-Hodgman against one plane: at most four corners
        let mut polygon: Vec<u32> = Vec::with_capacity(4);
        for k in 0..3 {
            let (i, j) = (face[k], face[(k + 1) % 3]);
            let (di, dj) = (d[k], d[(k + 1) % 3]);
            if di >= 0.0 {
                polygon.push(self.keep_vertex(i));
            }
            if (di > 0.0 && dj < 0.0) || (di < 0.0 && dj > 0.0) {
                polygon.push(self.crossing(i, j));
            }
        }

        if polygon.len() < 3 {
            return;
        }
        let anchor = polygon[0];
        self.out
            .faces
            .extend(polygon.windows(2).skip(1).map(|w| [anchor, w[0], w[1]]));
    }

    fn keep_vertex(&mut self, i: u32) -> u32 {
        if let Some(idx) = self.kept[i as usize] {
            return idx;
        }
        let idx = self.out.vertices.len() as u32;
        self.out.vertices.push(self.source.vertices[i as usize]);
        self.kept[i as usize] = Some(idx);
        idx
    }

    fn crossing(&mut self, i: u32, j: u32) -> u32 {
        // Interpolate from the lower index so both faces sharing the edge
        // compute the identical point
        let (a, b) = if i < j { (i, j) } else { (j, i) };
        if let Some(&idx) = self.crossings.get(&(a, b)) {
            return idx;
        }

        let pa = self.source.vertices[a as usize].position;
        let pb = self.source.vertices[b as usize].position;
        let point = Plane::edge_crossing(
            &pa,
            &pb,
            self.distances[a as usize],
            self.distances[b as usize],
        );

        let idx = self.out.vertices.len() as u32;
        self.out.vertices.push(Vertex::new(point));
        self.crossings.insert((a, b), idx);
        self.cut_edges += 1;
        idx
    }
}
