//! Connection graph module for referrer ranking.
//!
//! # Overview
//!
//! This module builds an undirected petgraph-backed graph from the flat
//! connection records held by the store. The graph feeds the HITS scorer
//! and the graph export.
//!
//! ## Pipeline
//!
//! ```text
//! store connections [(user1, user2), ...]
//!        ↓  build::AdjacencyMap::build()
//! AdjacencyMap (symmetric, de-duplicated, sorted)
//!        ↓  stats::GraphStats::from_adjacency()
//! GraphStats (density, components, isolated users, …)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use referral_core::Connection;
//! use referral_rank::graph::{AdjacencyMap, GraphStats};
//!
//! let edges = vec![Connection::new("alice", "bob"), Connection::new("bob", "carol")];
//! let adj = AdjacencyMap::build(&edges);
//! let stats = GraphStats::from_adjacency(&adj);
//! assert_eq!(stats.node_count, 3);
//! assert_eq!(adj.neighbors("bob"), vec!["alice", "carol"]);
//! ```

pub mod build;
pub mod stats;

pub use build::AdjacencyMap;
pub use stats::GraphStats;
