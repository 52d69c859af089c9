//! Structural checks on a loaded graph
//!
//! Loading tolerates dangling edges and cross-floor edges that break the
//! connector rule; the engine copes with both. This report surfaces them so
//! a map author can fix the document.

use serde::Serialize;
use utoipa::ToSchema;

use crate::graph::Graph;
use crate::node::{link_allowed, Edge};

/// Findings of [`inspect`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub node_count: usize,
    pub edge_count: usize,
    pub floors: Vec<u32>,
    /// Edges with at least one endpoint that is not a node
    pub dangling_edges: Vec<Edge>,
    /// Cross-floor edges that are not stairs-stairs or elevator-elevator
    pub invalid_links: Vec<Edge>,
    /// Nodes with no usable edge
    pub isolated_nodes: Vec<String>,
}

impl Report {
    /// True when nothing needs fixing. Isolated nodes alone do not count;
    /// a freshly added floor starts with one.
    pub fn is_clean(&self) -> bool {
        self.dangling_edges.is_empty() && self.invalid_links.is_empty()
    }
}

pub fn inspect(graph: &Graph) -> Report {
    let mut report = Report {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        floors: graph.floors(),
        ..Report::default()
    };

    for edge in graph.edges() {
        match (graph.node(&edge.source), graph.node(&edge.target)) {
            (Some(a), Some(b)) => {
                if !link_allowed(a, b) {
                    report.invalid_links.push(edge.clone());
                }
            }
            _ => report.dangling_edges.push(edge.clone()),
        }
    }

    report.isolated_nodes = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(ix, _)| graph.neighbor_indices(*ix as u32).is_empty())
        .map(|(_, n)| n.id.clone())
        .collect();

    report
}
