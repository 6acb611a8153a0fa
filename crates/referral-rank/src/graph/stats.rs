//! Basic statistics for the connection graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: users and distinct undirected edges.
//! - **density**: `2 * edges / (nodes * (nodes - 1))`; zero for 0 or 1 node.
//! - **component_count**: connected components. More than one means parts
//!   of the network cannot reach each other, and scores in different
//!   components are not comparable in absolute terms.
//! - **isolated_node_count**: users with no connections.
//! - **self_loop_count**: connections from a user to themselves.
//! - **max_degree**: most connections held by one user.

use petgraph::algo::connected_components;
use serde::Serialize;

use crate::graph::build::AdjacencyMap;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a connection graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub component_count: usize,
    pub isolated_node_count: usize,
    pub self_loop_count: usize,
    pub max_degree: usize,
    /// Connection records skipped while building.
    pub skipped_records: usize,
    pub content_hash: String,
}

impl GraphStats {
    /// Compute statistics from an [`AdjacencyMap`].
    #[must_use]
    pub fn from_adjacency(adj: &AdjacencyMap) -> Self {
        let node_count = adj.node_count();
        let edge_count = adj.edge_count();

        let density = if node_count < 2 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let (n, e) = (node_count as f64, edge_count as f64);
            2.0 * e / (n * (n - 1.0))
        };

        let mut isolated_node_count = 0;
        let mut self_loop_count = 0;
        let mut max_degree = 0;
        for i in 0..node_count {
            let list = adj.neighbor_indices(i);
            if list.is_empty() {
                isolated_node_count += 1;
            }
            if list.binary_search(&i).is_ok() {
                self_loop_count += 1;
            }
            max_degree = max_degree.max(list.len());
        }

        Self {
            node_count,
            edge_count,
            density,
            component_count: connected_components(&adj.graph),
            isolated_node_count,
            self_loop_count,
            max_degree,
            skipped_records: adj.skipped(),
            content_hash: adj.content_hash.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
