//! Graph nodes and shortest-path discovery.
//!
//! Nodes live in an arena (`&mut [CoordinateSystem]`) owned by the
//! [`CoordinateNetwork`](crate::CoordinateNetwork) and refer to each other by
//! index. Neighbors are kept in attachment order; when two candidate paths have
//! the same hop count, the one found first wins.

use std::collections::HashMap;

use log::trace;

/// Handle to an edge transform in the network's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeTransform {
    index: usize,
    inverse: bool,
}

impl EdgeTransform {
    pub(crate) fn forward(index: usize) -> Self {
        Self {
            index,
            inverse: false,
        }
    }

    pub(crate) fn inverse(index: usize) -> Self {
        Self {
            index,
            inverse: true,
        }
    }

    /// Position of the owning transform in the arena.
    pub fn index(&self) -> usize {
        self.index
    }

    /// `true` when this edge walks its transform backwards.
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Neighbor {
    system: usize,
    edge: EdgeTransform,
}

/// A named coordinate frame: one node of the network graph.
#[derive(Clone, Debug)]
pub struct CoordinateSystem {
    name: String,
    neighbors: Vec<Neighbor>,
    /// Cached hops (excluding this node) to every reachable target.
    downstream: HashMap<usize, Vec<usize>>,
}

impl CoordinateSystem {
    /// A lone node at arena position `id`. It reaches itself in zero hops.
    pub(crate) fn new(name: impl Into<String>, id: usize) -> Self {
        let mut downstream = HashMap::new();
        downstream.insert(id, Vec::new());
        Self {
            name: name.into(),
            neighbors: Vec::new(),
            downstream,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of outgoing edges.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Edge leading directly to the node at `other`, if any.
    pub fn edge_to(&self, other: usize) -> Option<EdgeTransform> {
        self.neighbors
            .iter()
            .find(|n| n.system == other)
            .map(|n| n.edge)
    }

    /// Cached hops to `target`, if discovered.
    pub fn downstream(&self, target: usize) -> Option<&[usize]> {
        self.downstream.get(&target).map(Vec::as_slice)
    }

    /// Attach a direct edge to `other`.
    ///
    /// A direct edge is always the shortest path, so the cache entry is
    /// overwritten unconditionally. Re-attaching replaces the previous edge
    /// but keeps its position in the neighbor order.
    pub(crate) fn attach_neighbor(&mut self, other: usize, edge: EdgeTransform) {
        match self.neighbors.iter_mut().find(|n| n.system == other) {
            Some(existing) => existing.edge = edge,
            None => self.neighbors.push(Neighbor {
                system: other,
                edge,
            }),
        }
        self.downstream.insert(other, vec![other]);
    }

    /// Search for the shortest path from `start` to `target` and cache it on
    /// `start` if it beats the current entry.
    pub(crate) fn discover_downstream_for(
        systems: &mut [CoordinateSystem],
        start: usize,
        target: usize,
    ) {
        let Some(mut stream) = Self::query_neighbors_for(systems, start, target, Vec::new()) else {
            trace!(
                "no path from '{}' to '{}'",
                systems[start].name,
                systems[target].name
            );
            return;
        };
        stream.remove(0);
        let node = &mut systems[start];
        if node
            .downstream
            .get(&target)
            .is_none_or(|current| current.len() > stream.len())
        {
            node.downstream.insert(target, stream);
        }
        trace!(
            "path from '{}' to '{}': {} hops",
            systems[start].name,
            systems[target].name,
            systems[start].downstream.get(&target).map_or(0, Vec::len)
        );
    }

    /// Best path from `at` to `target` that avoids `exclude`, including `at`
    /// itself as the first element.
    ///
    /// Every branch gets its own copy of the exclusion list so both ways
    /// around a loop are explored. Each visited node caches the best answer it
    /// found.
    fn query_neighbors_for(
        systems: &mut [CoordinateSystem],
        at: usize,
        target: usize,
        mut exclude: Vec<usize>,
    ) -> Option<Vec<usize>> {
        if at == target {
            return Some(vec![target]);
        }
        exclude.push(at);

        let mut stream = systems[at].downstream.get(&target).cloned();
        let neighbors: Vec<usize> = systems[at].neighbors.iter().map(|n| n.system).collect();
        for next in neighbors {
            if exclude.contains(&next) {
                continue;
            }
            let Some(candidate) = Self::query_neighbors_for(systems, next, target, exclude.clone())
            else {
                continue;
            };
            if stream
                .as_ref()
                .is_none_or(|best| best.len() > candidate.len())
            {
                stream = Some(candidate);
            }
        }

        let mut stream = stream?;
        systems[at].downstream.insert(target, stream.clone());
        stream.insert(0, at);
        Some(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-way edges between arena nodes named after their index.
    fn arena(n: usize, edges: &[(usize, usize)]) -> Vec<CoordinateSystem> {
        let mut systems: Vec<_> = (0..n)
            .map(|id| CoordinateSystem::new(id.to_string(), id))
            .collect();
        for (k, &(a, b)) in edges.iter().enumerate() {
            systems[a].attach_neighbor(b, EdgeTransform::forward(k));
            systems[b].attach_neighbor(a, EdgeTransform::inverse(k));
        }
        systems
    }

    fn compile(systems: &mut [CoordinateSystem]) {
        for start in 0..systems.len() {
            for target in 0..systems.len() {
                CoordinateSystem::discover_downstream_for(systems, start, target);
            }
        }
    }

    #[test]
    fn new_system_reaches_itself() {
        let s = CoordinateSystem::new("a", 3);
        assert_eq!(s.name(), "a");
        assert_eq!(s.downstream(3), Some(&[][..]));
        assert_eq!(s.downstream(0), None);
        assert_eq!(s.degree(), 0);
    }

    #[test]
    fn attach_overwrites_in_place() {
        let mut s = CoordinateSystem::new("a", 0);
        s.attach_neighbor(1, EdgeTransform::forward(0));
        s.attach_neighbor(2, EdgeTransform::forward(1));
        s.attach_neighbor(1, EdgeTransform::inverse(2));
        assert_eq!(s.degree(), 2);
        assert_eq!(s.edge_to(1), Some(EdgeTransform::inverse(2)));
        assert_eq!(s.downstream(1), Some(&[1][..]));
        assert!(s.edge_to(1).unwrap().is_inverse());
        assert_eq!(s.edge_to(2).unwrap().index(), 1);
    }

    #[test]
    fn loop_prefers_shorter_side() {
        // 0-1-2-3-0 plus a pendant 4 on 3
        let mut systems = arena(5, &[(0, 1), (1, 2), (2, 3), (3, 0), (3, 4)]);
        compile(&mut systems);
        assert_eq!(systems[0].downstream(2).map(<[usize]>::len), Some(2));
        assert_eq!(systems[0].downstream(4), Some(&[3, 4][..]));
        assert_eq!(systems[1].downstream(4).map(<[usize]>::len), Some(3));
        assert_eq!(systems[4].downstream(1).map(<[usize]>::len), Some(3));
    }

    #[test]
    fn ties_keep_first_neighbor() {
        // 0 reaches 3 through 1 or 2 in two hops; 1 was attached first
        let mut systems = arena(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        compile(&mut systems);
        assert_eq!(systems[0].downstream(3), Some(&[1, 3][..]));
    }

    #[test]
    fn disconnected_targets_stay_absent() {
        let mut systems = arena(4, &[(0, 1), (2, 3)]);
        compile(&mut systems);
        assert_eq!(systems[0].downstream(3), None);
        assert_eq!(systems[3].downstream(2), Some(&[2][..]));
    }
}
