//! Building graph model for indoor wayfinding
//!
//! Holds the nodes and edges of every floor, the adjacency index derived
//! from them, and the editor operations that change them.

pub mod document;
pub mod editor;
pub mod graph;
pub mod node;
pub mod validate;

pub use document::{MapDocument, NodeRecord};
pub use editor::NodePatch;
pub use graph::{Graph, NodeIx};
pub use node::{default_node_name, link_allowed, Access, Edge, Node, NodeKind};
pub use validate::{inspect, Report};
