//! The building graph: nodes, edges and the derived adjacency index
//!
//! Nodes are stored in load order and addressed internally by a dense
//! [`NodeIx`]. The adjacency index is a CSR layout (offsets + neighbor
//! slots) rebuilt from scratch after every change; it is never edited in
//! place and never persisted.

use rustc_hash::{FxHashMap, FxHashSet};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use wayfind_common::{Error, Result};

use crate::document::{MapDocument, NodeRecord};
use crate::node::{Edge, Node};

/// Dense node index (position in load order)
pub type NodeIx = u32;

/// Neighbor lists in CSR form. Edges whose endpoints do not both resolve
/// are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Adjacency {
    offsets: Vec<u32>, // n_nodes + 1
    targets: Vec<NodeIx>,
}

impl Adjacency {
    fn build(n_nodes: usize, index: &FxHashMap<String, NodeIx>, edges: &[Edge]) -> Self {
        let resolved: Vec<(NodeIx, NodeIx)> = edges
            .iter()
            .filter_map(|e| Some((*index.get(&e.source)?, *index.get(&e.target)?)))
            .collect();

        let mut offsets = vec![0u32; n_nodes + 1];
        for &(a, b) in &resolved {
            offsets[a as usize + 1] += 1;
            offsets[b as usize + 1] += 1;
        }
        for i in 0..n_nodes {
            offsets[i + 1] += offsets[i];
        }

        // Fill in edge order so every neighbor list follows the edge sequence
        let mut cursor: Vec<u32> = offsets[..n_nodes].to_vec();
        let mut targets = vec![0; resolved.len() * 2];
        for &(a, b) in &resolved {
            targets[cursor[a as usize] as usize] = b;
            cursor[a as usize] += 1;
            targets[cursor[b as usize] as usize] = a;
            cursor[b as usize] += 1;
        }

        Self { offsets, targets }
    }

    fn neighbors(&self, ix: NodeIx) -> &[NodeIx] {
        let ix = ix as usize;
        match (self.offsets.get(ix), self.offsets.get(ix + 1)) {
            (Some(&start), Some(&end)) => &self.targets[start as usize..end as usize],
            _ => &[],
        }
    }
}

/// Authoritative node/edge collections for the whole building
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) floor_labels: BTreeMap<u32, String>,
    index: FxHashMap<String, NodeIx>,
    adjacency: Adjacency,
    revision: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from already-validated nodes. Fails on duplicate ids or
    /// floor 0.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        check_nodes(&nodes)?;
        let mut graph = Self {
            nodes,
            edges,
            ..Self::default()
        };
        graph.rebuild_adjacency();
        Ok(graph)
    }

    /// Build a graph from a map document
    pub fn from_document(doc: MapDocument) -> Result<Self> {
        let mut graph = Self::new();
        graph.load_document(doc)?;
        Ok(graph)
    }

    /// Replace nodes and edges wholesale. Every record is validated before
    /// anything is touched, so a failed load leaves the graph as it was.
    /// Floor labels are kept.
    pub fn load(&mut self, nodes: &[NodeRecord], edges: Vec<Edge>) -> Result<()> {
        let parsed = nodes
            .iter()
            .enumerate()
            .map(|(i, record)| record.to_node(i))
            .collect::<Result<Vec<Node>>>()?;
        check_nodes(&parsed)?;

        self.nodes = parsed;
        self.edges = edges;
        self.touch();
        Ok(())
    }

    /// Replace everything, floor labels included
    pub fn load_document(&mut self, doc: MapDocument) -> Result<()> {
        let MapDocument {
            nodes,
            edges,
            floor_labels,
        } = doc;
        self.load(&nodes, edges)?;
        self.floor_labels = floor_labels;
        Ok(())
    }

    /// Export the current contents; loading the result yields an equal graph
    pub fn to_document(&self) -> MapDocument {
        MapDocument {
            nodes: self.nodes.iter().map(NodeRecord::from).collect(),
            edges: self.edges.clone(),
            floor_labels: self.floor_labels.clone(),
        }
    }

    /// Recompute the id index and the neighbor index from the current nodes
    /// and edges, O(V+E).
    pub fn rebuild_adjacency(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i as NodeIx))
            .collect();
        self.adjacency = Adjacency::build(self.nodes.len(), &self.index, &self.edges);
    }

    /// Record a change: bump the revision and rebuild derived state
    pub(crate) fn touch(&mut self) {
        self.revision += 1;
        self.rebuild_adjacency();
    }

    /// Look up a node; `None` for unknown or deleted ids
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|ix| &self.nodes[ix as usize])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Neighbor ids in edge order; empty for unknown or isolated ids.
    /// Parallel edges show up as repeated entries.
    pub fn neighbors_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.index_of(id)
            .into_iter()
            .flat_map(move |ix| self.neighbor_indices(ix).iter())
            .map(move |&n| self.nodes[n as usize].id.as_str())
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIx> {
        self.index.get(id).copied()
    }

    /// Node at a dense index
    pub fn node_at(&self, ix: NodeIx) -> Option<&Node> {
        self.nodes.get(ix as usize)
    }

    pub fn neighbor_indices(&self, ix: NodeIx) -> &[NodeIx] {
        self.adjacency.neighbors(ix)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Incremented by every load and every editor change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Sorted distinct floor numbers
    pub fn floors(&self) -> Vec<u32> {
        self.nodes
            .iter()
            .map(|n| n.floor)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rooms are the only selectable route endpoints; sorted by floor, then name
    pub fn rooms(&self) -> Vec<&Node> {
        let mut rooms: Vec<&Node> = self.nodes.iter().filter(|n| n.is_room()).collect();
        rooms.sort_by(|a, b| {
            a.floor
                .cmp(&b.floor)
                .then_with(|| a.display_name().cmp(b.display_name()))
        });
        rooms
    }

    pub fn floor_labels(&self) -> &BTreeMap<u32, String> {
        &self.floor_labels
    }

    /// Custom label, or "Floor N"
    pub fn floor_label(&self, floor: u32) -> Cow<'_, str> {
        match self.floor_labels.get(&floor) {
            Some(label) => Cow::Borrowed(label.as_str()),
            None => Cow::Owned(format!("Floor {floor}")),
        }
    }
}

fn check_nodes(nodes: &[Node]) -> Result<()> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for node in nodes {
        if node.id.trim().is_empty() {
            return Err(Error::invalid("node id must not be empty"));
        }
        if node.floor == 0 {
            return Err(Error::invalid(format!(
                "node '{}' has invalid floor 0",
                node.id
            )));
        }
        if !seen.insert(node.id.as_str()) {
            return Err(Error::invalid(format!("duplicate node id '{}'", node.id)));
        }
    }
    Ok(())
}
