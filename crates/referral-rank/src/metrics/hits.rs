//! HITS (Hyperlink-Induced Topic Search) over the undirected connection graph.
//!
//! # Overview
//!
//! HITS computes two scores for each user:
//!
//! - **Hub score**: how strongly a user is connected to high-authority users.
//! - **Authority score**: how strongly a user is connected to good hubs.
//!   This is the ranking key for referrers.
//!
//! On an undirected graph every edge counts in both directions, so both
//! updates sum over the same neighbor set.
//!
//! # Algorithm
//!
//! 1. Initialize all hub and authority scores to 1.0.
//! 2. Authority update: `auth(v) = sum of hub(u)` over neighbors `u`.
//! 3. Hub update: `hub(v) = sum of auth(u)` over neighbors `u`, using the
//!    authority values from step 2 of the same round.
//! 4. Replace both vectors and repeat, for exactly `iterations` rounds.
//!
//! There is no normalization and no convergence test. Scores grow
//! geometrically with density and round count, so they are only meaningful
//! relative to each other within one graph. A very dense graph can push
//! scores to infinity; that is logged, not corrected.
//!
//! # Determinism
//!
//! Sums run over neighbor indices in ascending order (see
//! [`AdjacencyMap`]), so the same adjacency always yields bit-identical
//! scores.

use std::collections::HashMap;

use tracing::{instrument, warn};

use crate::graph::build::AdjacencyMap;

/// Rounds used when the caller has no configured value.
pub const DEFAULT_ITERATIONS: usize = 10;

/// Result of the HITS algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct HitsResult {
    /// Hub scores: identifier → hub score.
    pub hubs: HashMap<String, f64>,
    /// Authority scores: identifier → authority score.
    pub authorities: HashMap<String, f64>,
    /// Number of rounds performed.
    pub iterations: usize,
}

impl HitsResult {
    #[must_use]
    pub fn authority(&self, id: &str) -> Option<f64> {
        self.authorities.get(id).copied()
    }

    /// The `n` highest authorities, ties broken by identifier.
    #[must_use]
    pub fn top_authorities(&self, n: usize) -> Vec<(&str, f64)> {
        let mut all: Vec<(&str, f64)> = self
            .authorities
            .iter()
            .map(|(id, &score)| (id.as_str(), score))
            .collect();
        all.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        all.truncate(n);
        all
    }
}

/// Compute hub and authority scores for every node in `adj`.
///
/// # Arguments
///
/// * `adj`: the connection graph.
/// * `iterations`: number of rounds. `0` returns the initial scores.
///
/// Isolated nodes score `0.0` on both axes after the first round.
#[must_use]
#[instrument(skip(adj), fields(nodes = adj.node_count(), edges = adj.edge_count()))]
pub fn hits(adj: &AdjacencyMap, iterations: usize) -> HitsResult {
    let n = adj.node_count();

    let mut hub: Vec<f64> = vec![1.0; n];
    let mut auth: Vec<f64> = vec![1.0; n];

    for _ in 0..iterations {
        let mut new_auth = vec![0.0; n];
        for (v, slot) in new_auth.iter_mut().enumerate() {
            for &u in adj.neighbor_indices(v) {
                *slot += hub[u];
            }
        }

        let mut new_hub = vec![0.0; n];
        for (v, slot) in new_hub.iter_mut().enumerate() {
            for &u in adj.neighbor_indices(v) {
                *slot += new_auth[u];
            }
        }

        auth = new_auth;
        hub = new_hub;
    }

    if auth.iter().chain(hub.iter()).any(|s| !s.is_finite()) {
        warn!(
            iterations,
            "HITS scores overflowed; ranking on this graph is unreliable"
        );
    }

    let mut hubs = HashMap::with_capacity(n);
    let mut authorities = HashMap::with_capacity(n);
    for (i, (h, a)) in hub.into_iter().zip(auth).enumerate() {
        if let Some(id) = adj.identifier(i) {
            hubs.insert(id.to_string(), h);
            authorities.insert(id.to_string(), a);
        }
    }

    HitsResult {
        hubs,
        authorities,
        iterations,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use referral_core::Connection;

    fn make_adj(edges: &[(&str, &str)]) -> AdjacencyMap {
        let conns: Vec<Connection> = edges.iter().map(|(a, b)| Connection::new(*a, *b)).collect();
        AdjacencyMap::build(&conns)
    }

    fn make_adj_nodes(nodes: &[&str], edges: &[(&str, &str)]) -> AdjacencyMap {
        let conns: Vec<Connection> = edges.iter().map(|(a, b)| Connection::new(*a, *b)).collect();
        AdjacencyMap::build_with_nodes(nodes.iter().copied(), &conns)
    }

    #[test]
    fn empty_graph_returns_empty() {
        let result = hits(&make_adj(&[]), DEFAULT_ITERATIONS);
        assert!(result.hubs.is_empty());
        assert!(result.authorities.is_empty());
        assert_eq!(result.iterations, DEFAULT_ITERATIONS);
    }

    #[test]
    fn zero_iterations_keeps_initial_scores() {
        let result = hits(&make_adj(&[("A", "B")]), 0);
        assert_eq!(result.authorities["A"], 1.0);
        assert_eq!(result.hubs["B"], 1.0);
    }

    #[test]
    fn isolated_node_scores_zero() {
        let result = hits(&make_adj_nodes(&["A", "Z"], &[("A", "B")]), DEFAULT_ITERATIONS);
        assert_eq!(result.authorities["Z"], 0.0);
        assert_eq!(result.hubs["Z"], 0.0);
        assert!(result.authorities["A"] > 0.0);
    }

    #[test]
    fn edgeless_graph_is_all_zero_after_one_round() {
        let result = hits(&make_adj_nodes(&["A", "B", "C"], &[]), 1);
        assert!(result.authorities.values().all(|&s| s == 0.0));
    }

    #[test]
    fn path_of_three_exact_values() {
        // Each round maps hub (x, x, x) to auth (x, 2x, x) and hub (2x, 2x, 2x).
        // Round 10 therefore starts from x = 2^9.
        let result = hits(&make_adj(&[("A", "B"), ("B", "C")]), DEFAULT_ITERATIONS);
        assert_eq!(result.authorities["A"], 512.0);
        assert_eq!(result.authorities["B"], 1024.0);
        assert_eq!(result.authorities["C"], 512.0);
        assert_eq!(result.hubs["B"], 1024.0);
    }

    #[test]
    fn single_edge_scores_are_equal() {
        let result = hits(&make_adj(&[("A", "B")]), DEFAULT_ITERATIONS);
        assert_eq!(result.authorities["A"], result.authorities["B"]);
        assert_eq!(result.authorities["A"], 1.0);
    }

    #[test]
    fn star_center_is_top_authority() {
        let result = hits(
            &make_adj(&[("hub", "a"), ("hub", "b"), ("hub", "c"), ("a", "d")]),
            DEFAULT_ITERATIONS,
        );
        let top = result.top_authorities(1);
        assert_eq!(top[0].0, "hub");
    }

    #[test]
    fn iteration_count_changes_scores() {
        let adj = make_adj(&[("A", "B"), ("B", "C"), ("C", "D"), ("B", "D")]);
        let ten = hits(&adj, 10);
        let ten_again = hits(&adj, 10);
        let eleven = hits(&adj, 11);
        assert_eq!(ten, ten_again);
        assert_ne!(ten.authorities, eleven.authorities);
    }

    #[test]
    fn top_authorities_breaks_ties_by_identifier() {
        let result = hits(&make_adj(&[("b", "a"), ("c", "d")]), DEFAULT_ITERATIONS);
        let top: Vec<&str> = result.top_authorities(4).iter().map(|(id, _)| *id).collect();
        assert_eq!(top, vec!["a", "b", "c", "d"]);
    }

    proptest! {
        #[test]
        fn prop_scores_are_deterministic(
            pairs in prop::collection::vec(("[a-e]", "[a-e]"), 0..30)
        ) {
            let conns: Vec<Connection> =
                pairs.iter().map(|(a, b)| Connection::new(a.clone(), b.clone())).collect();
            let mut reversed = conns.clone();
            reversed.reverse();

            let first = hits(&AdjacencyMap::build(&conns), DEFAULT_ITERATIONS);
            let second = hits(&AdjacencyMap::build(&reversed), DEFAULT_ITERATIONS);
            for (id, score) in &first.authorities {
                prop_assert_eq!(score.to_bits(), second.authorities[id].to_bits());
            }
        }

        #[test]
        fn prop_scores_are_non_negative(
            pairs in prop::collection::vec(("[a-e]", "[a-e]"), 0..30)
        ) {
            let conns: Vec<Connection> =
                pairs.iter().map(|(a, b)| Connection::new(a.clone(), b.clone())).collect();
            let result = hits(&AdjacencyMap::build(&conns), DEFAULT_ITERATIONS);
            prop_assert!(result.authorities.values().all(|&s| s >= 0.0));
            prop_assert!(result.hubs.values().all(|&s| s >= 0.0));
        }
    }
}
