//! Editor mutations on [`Graph`]
//!
//! Every successful mutation bumps the revision and rebuilds the adjacency
//! index before returning, so a path query never sees a stale index. Failed
//! mutations leave the graph unchanged.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use wayfind_common::{Error, Result};

use crate::graph::Graph;
use crate::node::{default_node_name, link_allowed, Access, Edge, Node, NodeKind};

/// Partial update for [`Graph::update_node`]; absent fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
}

const CROSS_FLOOR_REASON: &str =
    "cross-floor links must be stairs-to-stairs or elevator-to-elevator";

/// Placement of the hallway seeded on a floor with nothing to copy
const START_HALLWAY_POS: (i32, i32) = (400, 250);

impl Graph {
    /// Insert a node. Duplicate ids and floor 0 are rejected.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        self.check_new_node(&node)?;
        self.nodes.push(node);
        self.touch();
        Ok(())
    }

    /// Insert a node and link it to the nearest existing node on its floor.
    /// Returns the id of the node it was linked to, if any.
    pub fn add_node_connected(&mut self, node: Node) -> Result<Option<String>> {
        self.check_new_node(&node)?;

        let nearest = self
            .nodes
            .iter()
            .filter(|n| n.floor == node.floor)
            .map(|n| (n.plan_distance(&node), n))
            .fold(None::<(f64, &Node)>, |best, (d, n)| match best {
                Some((bd, _)) if bd <= d => best,
                _ => Some((d, n)),
            })
            .map(|(_, n)| n.id.clone());

        if let Some(target) = &nearest {
            self.edges.push(Edge::new(node.id.clone(), target.clone()));
        }
        self.nodes.push(node);
        self.touch();
        Ok(nearest)
    }

    /// An id of the form `{K}-{floor}-{n}` that is not yet taken
    pub fn next_node_id(&self, kind: NodeKind, floor: u32) -> String {
        let prefix = kind.name()[..1].to_ascii_uppercase();
        let mut n = self.nodes.len() + 1;
        loop {
            let id = format!("{prefix}-{floor}-{n}");
            if !self.contains(&id) {
                return id;
            }
            n += 1;
        }
    }

    /// Move, rename or change access of an existing node. Only rooms can be
    /// renamed.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<&Node> {
        let ix = self
            .index_of(id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))? as usize;

        let node = &mut self.nodes[ix];
        if patch.name.is_some() && !node.is_room() {
            return Err(Error::invalid(format!(
                "only rooms can be renamed; '{id}' is a {}",
                node.kind
            )));
        }

        if let Some(name) = patch.name {
            node.name = name.trim().to_string();
        }
        if let Some(x) = patch.x {
            node.x = x;
        }
        if let Some(y) = patch.y {
            node.y = y;
        }
        if let Some(access) = patch.access {
            node.access = access;
        }
        self.touch();
        Ok(&self.nodes[ix])
    }

    /// Remove a node together with every edge that references it
    pub fn remove_node(&mut self, id: &str) -> Result<Node> {
        let ix = self
            .index_of(id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))? as usize;

        let node = self.nodes.remove(ix);
        self.edges.retain(|e| !e.touches(id));
        self.touch();
        Ok(node)
    }

    /// Link two nodes. Self links, unknown ids and cross-floor links between
    /// anything but a matching connector pair are rejected.
    pub fn connect(&mut self, a: &str, b: &str) -> Result<()> {
        if a == b {
            return Err(Error::InvalidLink {
                from: a.to_string(),
                to: b.to_string(),
                reason: "a node cannot be linked to itself",
            });
        }
        let na = self.node(a).ok_or_else(|| Error::UnknownNode(a.to_string()))?;
        let nb = self.node(b).ok_or_else(|| Error::UnknownNode(b.to_string()))?;
        if !link_allowed(na, nb) {
            return Err(Error::InvalidLink {
                from: a.to_string(),
                to: b.to_string(),
                reason: CROSS_FLOOR_REASON,
            });
        }

        self.edges.push(Edge::new(a, b));
        self.touch();
        Ok(())
    }

    /// Remove every edge between `a` and `b`, in either direction
    pub fn disconnect(&mut self, a: &str, b: &str) -> usize {
        let before = self.edges.len();
        self.edges.retain(|e| !e.connects(a, b));
        let removed = before - self.edges.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Append a floor above the current top floor.
    ///
    /// The first stairs, first employee elevator and first public elevator
    /// of the floor below are copied at the same coordinates and linked to
    /// their originals. A floor with nothing to copy gets a single hallway.
    pub fn add_floor(&mut self) -> Result<u32> {
        let below = self.floors().last().copied().unwrap_or(0);
        let floor = below + 1;

        let copies: Vec<(Node, String)> = [
            (
                self.first_on(below, NodeKind::Stairs, None),
                format!("S-{floor}-W2"),
            ),
            (
                self.first_on(below, NodeKind::Elevator, Some(Access::Employee)),
                format!("E-{floor}-C"),
            ),
            (
                self.first_on(below, NodeKind::Elevator, Some(Access::All)),
                format!("E-{floor}-Pub"),
            ),
        ]
        .into_iter()
        .filter_map(|(source, id)| source.map(|s| (s, id)))
        .collect();

        let mut added: Vec<Node> = Vec::new();
        let mut links: Vec<Edge> = Vec::new();
        for (source, id) in &copies {
            // Copied stairs are always public
            let access = match source.kind {
                NodeKind::Stairs => Access::All,
                _ => source.access,
            };
            added.push(
                Node::new(id.clone(), source.kind, floor, source.x, source.y)
                    .with_name(default_node_name(source.kind, access))
                    .with_access(access),
            );
            links.push(Edge::new(source.id.clone(), id.clone()));
        }
        if added.is_empty() {
            let (x, y) = START_HALLWAY_POS;
            added.push(
                Node::new(format!("H-{floor}-START"), NodeKind::Hallway, floor, x, y)
                    .with_name(default_node_name(NodeKind::Hallway, Access::All)),
            );
        }

        if let Some(taken) = added.iter().find(|n| self.contains(&n.id)) {
            return Err(Error::DuplicateNode(taken.id.clone()));
        }

        self.nodes.extend(added);
        self.edges.extend(links);
        self.touch();
        Ok(floor)
    }

    /// Remove a floor's nodes and every edge touching them. The last
    /// remaining floor cannot be removed.
    pub fn remove_floor(&mut self, floor: u32) -> Result<usize> {
        let floors = self.floors();
        if !floors.contains(&floor) {
            return Err(Error::UnknownFloor(floor));
        }
        if floors.len() <= 1 {
            return Err(Error::LastFloor);
        }

        let before = self.nodes.len();
        self.nodes.retain(|n| n.floor != floor);
        let removed = before - self.nodes.len();

        let kept: FxHashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .retain(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()));
        self.floor_labels.remove(&floor);
        self.touch();
        Ok(removed)
    }

    /// Set a custom floor label; a blank label restores the default
    pub fn set_floor_label(&mut self, floor: u32, label: &str) -> Result<()> {
        if floor == 0 {
            return Err(Error::UnknownFloor(floor));
        }
        let label = label.trim();
        if label.is_empty() {
            self.floor_labels.remove(&floor);
        } else {
            self.floor_labels.insert(floor, label.to_string());
        }
        self.touch();
        Ok(())
    }

    fn first_on(&self, floor: u32, kind: NodeKind, access: Option<Access>) -> Option<Node> {
        self.nodes
            .iter()
            .find(|n| n.floor == floor && n.kind == kind && access.map_or(true, |a| n.access == a))
            .cloned()
    }

    fn check_new_node(&self, node: &Node) -> Result<()> {
        if node.id.trim().is_empty() {
            return Err(Error::invalid("node id must not be empty"));
        }
        if node.floor == 0 {
            return Err(Error::invalid(format!(
                "node '{}' has invalid floor 0",
                node.id
            )));
        }
        if self.contains(&node.id) {
            return Err(Error::DuplicateNode(node.id.clone()));
        }
        Ok(())
    }
}
