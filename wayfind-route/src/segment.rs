//! Per-floor grouping of a route

use serde::Serialize;
use utoipa::ToSchema;
use wayfind_graph::Graph;

/// A maximal run of consecutive route nodes on one floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FloorSegment {
    pub floor: u32,
    pub node_ids: Vec<String>,
}

impl FloorSegment {
    /// Segments of two or more nodes are drawable on their floor
    pub fn is_drawable(&self) -> bool {
        self.node_ids.len() >= 2
    }
}

/// Split a route into floor segments. Ids that do not resolve are skipped.
pub fn segment_by_floor<S: AsRef<str>>(graph: &Graph, route: &[S]) -> Vec<FloorSegment> {
    let mut segments: Vec<FloorSegment> = Vec::new();
    for id in route {
        let Some(node) = graph.node(id.as_ref()) else {
            continue;
        };
        match segments.last_mut() {
            Some(seg) if seg.floor == node.floor => seg.node_ids.push(node.id.clone()),
            _ => segments.push(FloorSegment {
                floor: node.floor,
                node_ids: vec![node.id.clone()],
            }),
        }
    }
    segments
}
