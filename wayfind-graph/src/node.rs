//! Node and edge types of the building graph

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// What a node represents on the floor plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Room,
    Hallway,
    Stairs,
    Elevator,
}

impl NodeKind {
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::Room,
            NodeKind::Hallway,
            NodeKind::Stairs,
            NodeKind::Elevator,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Room => "room",
            NodeKind::Hallway => "hallway",
            NodeKind::Stairs => "stairs",
            NodeKind::Elevator => "elevator",
        }
    }

    /// Parse the wire name (case-insensitive)
    pub fn from_name(s: &str) -> Option<NodeKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "room" => Some(NodeKind::Room),
            "hallway" => Some(NodeKind::Hallway),
            "stairs" => Some(NodeKind::Stairs),
            "elevator" => Some(NodeKind::Elevator),
            _ => None,
        }
    }

    /// Stairs and elevators are the only nodes allowed to link floors
    pub fn is_connector(&self) -> bool {
        matches!(self, NodeKind::Stairs | NodeKind::Elevator)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who may pass through a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    #[default]
    All,
    Employee,
}

impl Access {
    pub fn name(&self) -> &'static str {
        match self {
            Access::All => "all",
            Access::Employee => "employee",
        }
    }

    /// Parse the wire name; empty means the default
    pub fn from_name(s: &str) -> Option<Access> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Some(Access::All),
            "employee" => Some(Access::Employee),
            _ => None,
        }
    }
}

/// A point in the building graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Node {
    /// Unique across the whole building
    #[schema(example = "R-1-101")]
    pub id: String,
    /// Display name, may be empty
    #[serde(default)]
    #[schema(example = "Room 101")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Floor number, starting at 1
    #[schema(example = 1)]
    pub floor: u32,
    /// Floor-local plan coordinates
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub access: Access,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, floor: u32, x: i32, y: i32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            floor,
            x,
            y,
            access: Access::All,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Name shown to users; falls back to the id for unnamed nodes
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn is_room(&self) -> bool {
        self.kind == NodeKind::Room
    }

    /// Straight-line distance in plan units; only meaningful on the same floor
    pub fn plan_distance(&self, other: &Node) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

/// Whether an edge between `a` and `b` satisfies the building rules:
/// same floor, or a stairs-stairs / elevator-elevator pair across floors.
pub fn link_allowed(a: &Node, b: &Node) -> bool {
    a.floor == b.floor || (a.kind == b.kind && a.kind.is_connector())
}

/// Default name the editor gives a freshly placed node
pub fn default_node_name(kind: NodeKind, access: Access) -> String {
    match (kind, access) {
        (NodeKind::Stairs, _) => "Stairs".to_string(),
        (NodeKind::Hallway, _) => "Hallway".to_string(),
        (NodeKind::Elevator, Access::Employee) => "Elevator (Emp)".to_string(),
        (NodeKind::Elevator, Access::All) => "Elevator".to_string(),
        (NodeKind::Room, _) => "New Room".to_string(),
    }
}

/// Undirected connection between two node ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Edge {
    #[schema(example = "R-1-101")]
    pub source: String,
    #[schema(example = "H-1-1")]
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// True if this edge joins `a` and `b`, in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}
