//! End-to-end referrer query: build, score, select.

use referral_core::config::RankConfig;
use referral_core::error::ErrorCode;
use referral_core::{Connection, ProfileLookup};
use tracing::{info, instrument};

use crate::graph::AdjacencyMap;
use crate::metrics::hits::hits;
use crate::select::{Selection, select};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    #[error(
        "connection graph too large: {nodes} nodes / {edges} edges (limits {max_nodes} / {max_edges})"
    )]
    GraphTooLarge {
        nodes: usize,
        edges: usize,
        max_nodes: usize,
        max_edges: usize,
    },
}

impl RankError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::GraphTooLarge { .. } => ErrorCode::GraphTooLarge,
        }
    }
}

/// Reject graphs larger than `config.max_nodes` / `config.max_edges`.
///
/// Every path that scores a graph calls this between build and scoring.
///
/// # Errors
///
/// [`RankError::GraphTooLarge`] when either bound is exceeded.
pub fn check_limits(adj: &AdjacencyMap, config: &RankConfig) -> Result<(), RankError> {
    if adj.node_count() > config.max_nodes || adj.edge_count() > config.max_edges {
        return Err(RankError::GraphTooLarge {
            nodes: adj.node_count(),
            edges: adj.edge_count(),
            max_nodes: config.max_nodes,
            max_edges: config.max_edges,
        });
    }
    Ok(())
}

/// Who is asking, and for which company.
#[derive(Debug, Clone, Copy)]
pub struct ReferralQuery<'a> {
    pub requester: &'a str,
    pub company: &'a str,
}

/// Find the best referrer for `query.company`.
///
/// `connections` is the full connection set and `lookup` resolves profiles;
/// both must be materialized by the caller. Each call owns its adjacency and
/// score buffers, so concurrent calls share nothing mutable.
///
/// # Errors
///
/// [`RankError::GraphTooLarge`] when the graph exceeds `config.max_nodes`
/// or `config.max_edges`. The check runs after the build and before any
/// scoring.
#[instrument(skip_all, fields(requester = query.requester, company = query.company))]
pub fn find_best_referrer<L>(
    connections: &[Connection],
    lookup: &L,
    query: ReferralQuery<'_>,
    config: &RankConfig,
) -> Result<Selection, RankError>
where
    L: ProfileLookup + ?Sized,
{
    let adj = AdjacencyMap::build(connections);
    check_limits(&adj, config)?;

    let scores = hits(&adj, config.iterations);
    let selection = select(&scores.authorities, query.company, lookup);

    info!(
        graph = %adj.content_hash,
        referrer = selection.referrer().unwrap_or("-"),
        "referrer query answered"
    );
    Ok(selection)
}
