//! Turn-by-turn steps for a route

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;
use wayfind_graph::{Graph, NodeKind};

/// One step between two consecutive route nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub from_id: String,
    pub to_id: String,
    pub from_name: String,
    pub to_name: String,
}

impl Instruction {
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Go from {} to {}", self.from_name, self.to_name)
    }
}

/// One step per consecutive pair of the full route, except
/// hallway-to-hallway moves. Pairs with an unknown id are skipped.
pub fn build_instructions<S: AsRef<str>>(graph: &Graph, route: &[S]) -> Vec<Instruction> {
    route
        .windows(2)
        .filter_map(|pair| {
            let from = graph.node(pair[0].as_ref())?;
            let to = graph.node(pair[1].as_ref())?;
            if from.kind == NodeKind::Hallway && to.kind == NodeKind::Hallway {
                return None;
            }
            Some(Instruction {
                from_id: from.id.clone(),
                to_id: to.id.clone(),
                from_name: from.display_name().to_string(),
                to_name: to.display_name().to_string(),
            })
        })
        .collect()
}
