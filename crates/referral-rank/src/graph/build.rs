//! Adjacency construction from flat connection records.
//!
//! # Overview
//!
//! Connections arrive as a flat list of `(user1, user2)` records straight
//! from the store. This module turns them into an undirected [`petgraph`]
//! graph plus a dense, sorted neighbor table that the scorer walks.
//!
//! ## Duplicate Edges
//!
//! The store upserts by the *ordered* pair, so `(a, b)` and `(b, a)` can
//! both be present, and older data may hold exact repeats. Every pair is
//! normalized to `(min, max)` and de-duplicated, so each neighbor appears
//! once per node and repeated `connect` commands never inflate scores.
//!
//! ## Ordering
//!
//! Nodes are inserted in ascending identifier order, so a node's dense index
//! is its rank in the sorted identifier list. Neighbor lists are sorted by
//! that index. Anything iterating the adjacency therefore sees the same
//! order for the same edge set, whatever order the records arrived in.
//!
//! ## Malformed Records
//!
//! A record with a blank endpoint is skipped and counted in
//! [`AdjacencyMap::skipped`]. One bad record never aborts a build.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{NodeIndex, UnGraph};
use referral_core::Connection;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// AdjacencyMap
// ---------------------------------------------------------------------------

/// An undirected social graph keyed by user identifier.
///
/// Symmetric by construction: `b` is a neighbor of `a` exactly when `a` is a
/// neighbor of `b`. Built fresh for every query and dropped afterwards.
#[derive(Debug, Clone)]
pub struct AdjacencyMap {
    /// Undirected graph: nodes = identifiers, edges = connections.
    pub graph: UnGraph<String, ()>,
    /// Mapping from identifier to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 content hash of the normalized edge set.
    pub content_hash: String,
    /// Sorted neighbor indices per dense node index.
    neighbors: Vec<Vec<usize>>,
    /// Records dropped for having a blank endpoint.
    skipped: usize,
}

impl AdjacencyMap {
    /// Build the adjacency for every identifier that appears in a connection.
    #[must_use]
    pub fn build<'a, I>(connections: I) -> Self
    where
        I: IntoIterator<Item = &'a Connection>,
    {
        Self::build_with_nodes(std::iter::empty::<&str>(), connections)
    }

    /// Like [`AdjacencyMap::build`], but also adds `nodes` that may have no
    /// connections at all. Such nodes get an empty neighbor set.
    #[must_use]
    #[instrument(skip_all)]
    pub fn build_with_nodes<'a, 'n, N, I>(nodes: N, connections: I) -> Self
    where
        N: IntoIterator<Item = &'n str>,
        I: IntoIterator<Item = &'a Connection>,
    {
        let mut skipped = 0usize;
        let mut edges: BTreeSet<(&str, &str)> = BTreeSet::new();

        for conn in connections {
            let Some((a, b)) = conn.endpoints() else {
                skipped += 1;
                debug!(user1 = %conn.user1, user2 = %conn.user2, "skipping malformed connection");
                continue;
            };
            edges.insert(if a <= b { (a, b) } else { (b, a) });
        }

        let mut ids: BTreeSet<&str> = nodes
            .into_iter()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect();
        for (a, b) in &edges {
            ids.insert(*a);
            ids.insert(*b);
        }

        let mut graph = UnGraph::<String, ()>::with_capacity(ids.len(), edges.len());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(ids.len());
        for id in &ids {
            let idx = graph.add_node((*id).to_string());
            node_map.insert((*id).to_string(), idx);
        }

        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); graph.node_count()];
        for (a, b) in &edges {
            let ia = node_map[*a];
            let ib = node_map[*b];
            graph.add_edge(ia, ib, ());
            neighbors[ia.index()].push(ib.index());
            if ia != ib {
                neighbors[ib.index()].push(ia.index());
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }

        let content_hash = compute_edge_hash(&edges);

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            skipped,
            %content_hash,
            "built adjacency"
        );

        Self {
            graph,
            node_map,
            content_hash,
            neighbors,
            skipped,
        }
    }

    /// Return the number of nodes (users) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return the number of connection records that were skipped.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Identifiers in ascending order (the dense index order).
    pub fn identifiers(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(String::as_str)
    }

    /// Identifier at a dense index.
    #[must_use]
    pub fn identifier(&self, index: usize) -> Option<&str> {
        self.graph
            .node_weight(NodeIndex::new(index))
            .map(String::as_str)
    }

    /// Neighbors of `id` in ascending order. Empty for unknown identifiers.
    #[must_use]
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        self.node_map
            .get(id)
            .map(|idx| {
                self.neighbors[idx.index()]
                    .iter()
                    .filter_map(|&n| self.identifier(n))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sorted dense neighbor indices of the node at `index`.
    #[must_use]
    pub fn neighbor_indices(&self, index: usize) -> &[usize] {
        self.neighbors.get(index).map_or(&[] as &[usize], Vec::as_slice)
    }

    #[must_use]
    pub fn degree(&self, id: &str) -> usize {
        self.node_map
            .get(id)
            .map_or(0, |idx| self.neighbors[idx.index()].len())
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Compute a BLAKE3 hash of the sorted edge list.
fn compute_edge_hash(edges: &BTreeSet<(&str, &str)>) -> String {
    let mut hasher = blake3::Hasher::new();
    for (a, b) in edges {
        hasher.update(a.as_bytes());
        hasher.update(b"\x00");
        hasher.update(b.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn conns(pairs: &[(&str, &str)]) -> Vec<Connection> {
        pairs.iter().map(|(a, b)| Connection::new(*a, *b)).collect()
    }

    #[test]
    fn empty_input_produces_empty_graph() {
        let adj = AdjacencyMap::build(&[] as &[Connection]);
        assert_eq!(adj.node_count(), 0);
        assert_eq!(adj.edge_count(), 0);
        // Hash of empty edge set is stable.
        assert!(adj.content_hash.starts_with("blake3:"));
    }

    #[test]
    fn single_connection_is_symmetric() {
        let adj = AdjacencyMap::build(&conns(&[("alice", "bob")]));
        assert_eq!(adj.node_count(), 2);
        assert_eq!(adj.edge_count(), 1);
        assert_eq!(adj.neighbors("alice"), vec!["bob"]);
        assert_eq!(adj.neighbors("bob"), vec!["alice"]);
    }

    #[test]
    fn duplicates_and_reversed_pairs_collapse() {
        let adj = AdjacencyMap::build(&conns(&[
            ("alice", "bob"),
            ("alice", "bob"),
            ("bob", "alice"),
        ]));
        assert_eq!(adj.edge_count(), 1);
        assert_eq!(adj.degree("alice"), 1);
        assert_eq!(adj.degree("bob"), 1);
    }

    #[test]
    fn self_loop_is_its_own_single_neighbor() {
        let adj = AdjacencyMap::build(&conns(&[("alice", "alice"), ("alice", "alice")]));
        assert_eq!(adj.node_count(), 1);
        assert_eq!(adj.neighbors("alice"), vec!["alice"]);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let adj = AdjacencyMap::build(&conns(&[("alice", ""), ("  ", "bob"), ("carol", "dave")]));
        assert_eq!(adj.skipped(), 2);
        assert_eq!(adj.node_count(), 2);
        assert!(!adj.contains("alice"));
        assert!(!adj.contains("bob"));
    }

    #[test]
    fn identifiers_are_sorted_and_indexed() {
        let adj = AdjacencyMap::build(&conns(&[("zed", "amy"), ("mia", "amy")]));
        let ids: Vec<&str> = adj.identifiers().collect();
        assert_eq!(ids, vec!["amy", "mia", "zed"]);
        assert_eq!(adj.identifier(0), Some("amy"));
        assert_eq!(adj.neighbor_indices(0), &[1, 2]);
        assert!(adj.neighbor_indices(99).is_empty());
    }

    #[test]
    fn extra_nodes_are_isolated() {
        let edges = conns(&[("alice", "bob")]);
        let adj = AdjacencyMap::build_with_nodes(["carol", "alice", ""], &edges);
        assert_eq!(adj.node_count(), 3);
        assert!(adj.neighbors("carol").is_empty());
        assert_eq!(adj.degree("alice"), 1);
    }

    #[test]
    fn hash_ignores_record_order_and_direction() {
        let a = AdjacencyMap::build(&conns(&[("a", "b"), ("b", "c")]));
        let b = AdjacencyMap::build(&conns(&[("c", "b"), ("b", "a"), ("a", "b")]));
        let c = AdjacencyMap::build(&conns(&[("a", "b"), ("a", "c")]));
        assert_eq!(a.content_hash, b.content_hash);
        assert_ne!(a.content_hash, c.content_hash);
    }

    fn arb_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(("[a-f]{0,2}", "[a-f]{0,2}"), 0..40)
    }

    proptest! {
        #[test]
        fn prop_adjacency_is_symmetric(pairs in arb_pairs()) {
            let edges: Vec<Connection> =
                pairs.iter().map(|(a, b)| Connection::new(a.clone(), b.clone())).collect();
            let adj = AdjacencyMap::build(&edges);
            for a in adj.identifiers() {
                for b in adj.neighbors(a) {
                    prop_assert!(
                        adj.neighbors(b).contains(&a),
                        "{} -> {} has no reverse edge", a, b
                    );
                }
            }
        }

        #[test]
        fn prop_neighbors_are_unique_and_sorted(pairs in arb_pairs()) {
            let edges: Vec<Connection> =
                pairs.iter().map(|(a, b)| Connection::new(a.clone(), b.clone())).collect();
            let adj = AdjacencyMap::build(&edges);
            for i in 0..adj.node_count() {
                let list = adj.neighbor_indices(i);
                prop_assert!(list.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
