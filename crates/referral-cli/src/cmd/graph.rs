//! `refer graph`: dump the connection graph for a visualizer.
//!
//! JSON mode emits `{nodes:[{id,label,title}], edges:[{from,to}]}` plus
//! summary statistics. Text and pretty modes print the statistics and the
//! strongest authorities instead.

use crate::cmd::{open_store, store_failure};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};
use clap::Args;
use referral_core::config::{EffectiveConfig, RankConfig};
use referral_core::store::NetworkSnapshot;
use referral_rank::{AdjacencyMap, GraphStats, RankError, check_limits, hits};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Number of top authorities to list.
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

#[derive(Debug, Serialize)]
struct GraphNode {
    id: String,
    label: String,
    title: String,
}

#[derive(Debug, Serialize)]
struct GraphEdge {
    from: String,
    to: String,
}

#[derive(Debug, Serialize)]
struct TopAuthority {
    id: String,
    authority: f64,
}

#[derive(Debug, Serialize)]
struct GraphOutput {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    stats: GraphStats,
    top_authorities: Vec<TopAuthority>,
}

fn node_title(snapshot: &NetworkSnapshot, id: &str) -> String {
    snapshot.user(id).map_or_else(
        || "Unregistered".to_string(),
        |u| format!("Company: {}\nRole: {}", u.company, u.role),
    )
}

/// Each undirected edge once, lower identifier first.
fn collect_edges(adj: &AdjacencyMap) -> Vec<GraphEdge> {
    let mut edges = Vec::with_capacity(adj.edge_count());
    for i in 0..adj.node_count() {
        let Some(from) = adj.identifier(i) else {
            continue;
        };
        for &j in adj.neighbor_indices(i) {
            if j < i {
                continue;
            }
            if let Some(to) = adj.identifier(j) {
                edges.push(GraphEdge {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }
    }
    edges
}

fn build_output(
    snapshot: &NetworkSnapshot,
    rank: &RankConfig,
    top: usize,
) -> Result<GraphOutput, RankError> {
    let adj = AdjacencyMap::build_with_nodes(
        snapshot.users().iter().map(|u| u.name.as_str()),
        snapshot.connections(),
    );
    check_limits(&adj, rank)?;
    let scores = hits(&adj, rank.iterations);

    Ok(GraphOutput {
        nodes: adj
            .identifiers()
            .map(|id| GraphNode {
                id: id.to_string(),
                label: id.to_string(),
                title: node_title(snapshot, id),
            })
            .collect(),
        edges: collect_edges(&adj),
        stats: GraphStats::from_adjacency(&adj),
        top_authorities: scores
            .top_authorities(top)
            .into_iter()
            .map(|(id, authority)| TopAuthority {
                id: id.to_string(),
                authority,
            })
            .collect(),
    })
}

pub fn run_graph(
    args: &GraphArgs,
    output: OutputMode,
    project_root: &Path,
    config: &EffectiveConfig,
) -> anyhow::Result<()> {
    let store = open_store(project_root, &config.project.store, output)?;
    let snapshot = match store.snapshot() {
        Ok(s) => s,
        Err(e) => return store_failure(output, &e),
    };

    let out = match build_output(&snapshot, &config.project.rank, args.top) {
        Ok(out) => out,
        Err(e) => {
            render_error(output, &CliError::from_code(e.to_string(), e.code()))?;
            anyhow::bail!("{e}");
        }
    };

    render_mode(
        output,
        &out,
        |o, w| {
            writeln!(
                w,
                "nodes={} edges={} components={} hash={}",
                o.stats.node_count, o.stats.edge_count, o.stats.component_count, o.stats.content_hash
            )?;
            for t in &o.top_authorities {
                writeln!(w, "{}\t{}", t.id, t.authority)?;
            }
            Ok(())
        },
        |o, w| {
            pretty_section(w, "Connection graph")?;
            pretty_kv(w, "Users", o.stats.node_count.to_string())?;
            pretty_kv(w, "Links", o.stats.edge_count.to_string())?;
            pretty_kv(w, "Components", o.stats.component_count.to_string())?;
            pretty_kv(w, "Isolated", o.stats.isolated_node_count.to_string())?;
            pretty_kv(w, "Density", format!("{:.3}", o.stats.density))?;
            pretty_kv(w, "Hash", &o.stats.content_hash)?;
            if o.stats.skipped_records > 0 {
                pretty_kv(w, "Skipped", o.stats.skipped_records.to_string())?;
            }
            if !o.top_authorities.is_empty() {
                writeln!(w)?;
                pretty_section(w, "Top authorities")?;
                for t in &o.top_authorities {
                    writeln!(w, "  {:<20} {:.1}", t.id, t.authority)?;
                }
            }
            Ok(())
        },
    )
}
