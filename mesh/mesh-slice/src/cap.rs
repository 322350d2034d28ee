//! Planar capping of cut boundaries.
//!
//! After clipping, every edge of the kept surface whose reverse edge is
//! missing lies on the cutting plane (for watertight input). Reversing those
//! edges gives the cap outline with the winding the cap needs; chaining them
//! yields closed loops that are fan-triangulated.
//!
//! A fan over a non-convex or multiply-connected outline produces
//! overlapping triangles of both orientations. Their signed contributions
//! still sum to the exact enclosed volume and volume moment, and every fan
//! edge is matched by its reverse, so the result stays closed.

use hashbrown::{HashMap, HashSet};
use tracing::warn;

/// Cap triangles plus loop diagnostics.
#[derive(Debug, Default)]
pub(crate) struct Caps {
    pub faces: Vec<[u32; 3]>,
    pub loops: usize,
    pub open_chains: usize,
}

/// Close every boundary loop of `faces` with fan triangles.
pub(crate) fn cap_boundary(faces: &[[u32; 3]]) -> Caps {
    let directed: HashSet<(u32, u32)> = faces
        .iter()
        .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
        .collect();

    // Cap edges run opposite to the open surface edges
    let cap_edges: Vec<(u32, u32)> = faces
        .iter()
        .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
        .filter(|&(u, v)| !directed.contains(&(v, u)))
        .map(|(u, v)| (v, u))
        .collect();

    let mut caps = Caps::default();
    if cap_edges.is_empty() {
        return caps;
    }

    let mut outgoing: HashMap<u32, Vec<u32>> = HashMap::with_capacity(cap_edges.len());
    for &(from, to) in &cap_edges {
        outgoing.entry(from).or_default().push(to);
    }

    for &(start, first) in &cap_edges {
        let Some(pending) = outgoing.get_mut(&start) else {
            continue;
        };
        let Some(pos) = pending.iter().position(|&to| to == first) else {
            // Already consumed by an earlier loop
            continue;
        };
        pending.swap_remove(pos);

        let mut outline = vec![start];
        let mut current = first;
        let closed = loop {
            if current == start {
                break true;
            }
            outline.push(current);
            match outgoing.get_mut(&current).and_then(Vec::pop) {
                Some(next) => current = next,
                None => break false,
            }
        };

        if !closed {
            caps.open_chains += 1;
            continue;
        }
        if outline.len() < 3 {
            warn!(vertices = outline.len(), "Dropping degenerate cap loop");
            continue;
        }

        let anchor = outline[0];
        caps.faces
            .extend(outline.windows(2).skip(1).map(|w| [anchor, w[0], w[1]]));
        caps.loops += 1;
    }

    if caps.open_chains > 0 {
        warn!(
            open_chains = caps.open_chains,
            "Cut boundary has open chains; cap is incomplete"
        );
    }

    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_surface_needs_no_cap() {
        let cube = mesh_types::unit_cube();
        let caps = cap_boundary(&cube.faces);
        assert!(caps.faces.is_empty());
        assert_eq!(caps.loops, 0);
        assert_eq!(caps.open_chains, 0);
    }

    #[test]
    fn open_box_gets_lid() {
        let mut cube = mesh_types::unit_cube();
        // Drop the top (+Z) face pair
        cube.faces.drain(2..4);
        let caps = cap_boundary(&cube.faces);
        assert_eq!(caps.loops, 1);
        assert_eq!(caps.faces.len(), 2);

        cube.faces.extend(&caps.faces);
        assert!((cube.signed_volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fan_triangle_count() {
        // A square outline as a strip of side triangles around an open tube
        // has two boundary loops (top and bottom of the tube).
        let mut cube = mesh_types::unit_cube();
        cube.faces.drain(0..4);
        let caps = cap_boundary(&cube.faces);
        assert_eq!(caps.loops, 2);
        assert_eq!(caps.faces.len(), 4);
        cube.faces.extend(&caps.faces);
        assert!((cube.signed_volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unbalanced_edges_leave_open_chains() {
        let caps = cap_boundary(&[[0, 1, 2], [1, 0, 3], [0, 1, 4]]);
        assert_eq!(caps.open_chains, 2);
        assert_eq!(caps.loops, 0);
        assert!(caps.faces.is_empty());
    }
}
