#![forbid(unsafe_code)]
//! referral-rank library.
//!
//! Ranks users of a social graph by HITS authority and picks the best
//! referrer at a target company.
//!
//! ```text
//! connections ──► graph::AdjacencyMap ──► metrics::hits ──► select ──► Selection
//!                                                             ▲
//!                                            ProfileLookup ───┘
//! ```
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums; "no referrer" is [`Selection::NotFound`], not an error.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod graph;
pub mod metrics;
pub mod referrer;
pub mod select;

pub use graph::{AdjacencyMap, GraphStats};
pub use metrics::hits::{DEFAULT_ITERATIONS, HitsResult, hits};
pub use referrer::{RankError, ReferralQuery, check_limits, find_best_referrer};
pub use select::{Candidate, Selection, select};
