//! Influence metrics over the connection graph.
//!
//! Only HITS is implemented. Its authority score is the ranking key used by
//! [`crate::select`].
//!
//! ```rust
//! use referral_core::Connection;
//! use referral_rank::graph::AdjacencyMap;
//! use referral_rank::metrics::hits::{hits, DEFAULT_ITERATIONS};
//!
//! let edges = vec![Connection::new("A", "B"), Connection::new("B", "C")];
//! let result = hits(&AdjacencyMap::build(&edges), DEFAULT_ITERATIONS);
//! assert!(result.authorities["B"] > result.authorities["A"]);
//! ```

pub mod hits;
