//! Edge adjacency.

use hashbrown::HashMap;

/// How many faces use each undirected edge of a triangle list.
///
/// A closed hull has every edge used exactly twice. Edges used once lie on a
/// hole; edges used three or more times join surfaces that should be apart.
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    uses: HashMap<(u32, u32), u32>,
}

impl MeshAdjacency {
    /// Count edge uses over `faces`.
    ///
    /// ```
    /// use mesh_repair::MeshAdjacency;
    ///
    /// // Two triangles sharing the edge 1-2
    /// let adj = MeshAdjacency::build(&[[0, 1, 2], [1, 3, 2]]);
    /// assert_eq!(adj.boundary_edge_count(), 4);
    /// assert_eq!(adj.edge_count(), 5);
    /// ```
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut uses = HashMap::with_capacity(faces.len() * 3 / 2);
        for &[a, b, c] in faces {
            for edge in [(a, b), (b, c), (c, a)] {
                *uses.entry(undirected(edge)).or_insert(0) += 1;
            }
        }
        Self { uses }
    }

    /// Faces using the edge between `v0` and `v1`, 0 if it is not an edge.
    #[must_use]
    pub fn use_count(&self, v0: u32, v1: u32) -> u32 {
        self.uses.get(&undirected((v0, v1))).copied().unwrap_or(0)
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.uses.len()
    }

    /// Edges on a hole.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.count_where(|n| n == 1)
    }

    /// Edges shared by more than two faces.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.count_where(|n| n > 2)
    }

    /// True if no edge joins more than two faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count() == 0
    }

    /// True if no edge lies on a hole.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.boundary_edge_count() == 0
    }

    fn count_where(&self, pred: impl Fn(u32) -> bool) -> usize {
        self.uses.values().filter(|&&n| pred(n)).count()
    }
}

#[inline]
fn undirected((v0, v1): (u32, u32)) -> (u32, u32) {
    (v0.min(v1), v0.max(v1))
}
