//! Role-filtered Dijkstra over the building graph
//!
//! The frontier is a [`PriorityQueue`] keyed by `Reverse((distance, ix))`,
//! so among equal distances the node loaded first is settled first. The
//! result is fully deterministic for a given graph and query.

use priority_queue::PriorityQueue;
use serde::Serialize;
use std::cmp::Reverse;
use utoipa::ToSchema;
use wayfind_graph::{Graph, NodeIx};

use crate::cost::{weight, INFINITE_COST};
use crate::role::Role;

/// A found route: node ids from start to end inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Route {
    pub nodes: Vec<String>,
    pub cost: u32,
}

impl Route {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Shortest route from `start` to `end` using only nodes `role` may access.
///
/// Returns `None` for unknown ids and when no route exists. A node that
/// fails the role check is never relaxed into, and if it is settled anyway
/// (only the start can be) its neighbors are not relaxed.
pub fn find_path(graph: &Graph, start: &str, end: &str, role: Role) -> Option<Route> {
    let source = graph.index_of(start)?;
    let target = graph.index_of(end)?;
    let n = graph.node_count();

    let mut dist = vec![INFINITE_COST; n];
    let mut parent: Vec<Option<NodeIx>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut pq: PriorityQueue<NodeIx, Reverse<(u32, NodeIx)>> = PriorityQueue::new();

    dist[source as usize] = 0;
    pq.push(source, Reverse((0, source)));

    let mut settled_count = 0usize;
    while let Some((u, Reverse((d, _)))) = pq.pop() {
        settled[u as usize] = true;
        settled_count += 1;
        if u == target {
            break;
        }

        let Some(node) = graph.node_at(u) else {
            continue;
        };
        if !role.is_accessible(node) {
            continue;
        }

        for &v in graph.neighbor_indices(u) {
            if settled[v as usize] {
                continue;
            }
            let Some(neighbor) = graph.node_at(v) else {
                continue;
            };
            if !role.is_accessible(neighbor) {
                continue;
            }

            let w = weight(node, neighbor);
            if w == INFINITE_COST {
                continue;
            }

            let new_dist = d.saturating_add(w);
            if new_dist < dist[v as usize] {
                dist[v as usize] = new_dist;
                parent[v as usize] = Some(u);
                pq.push(v, Reverse((new_dist, v)));
            }
        }
    }

    tracing::trace!(start, end, %role, settled = settled_count, "dijkstra finished");

    if !settled[target as usize] {
        return None;
    }

    let mut path = vec![target];
    let mut cur = target;
    while let Some(p) = parent[cur as usize] {
        path.push(p);
        cur = p;
    }
    path.reverse();

    if path.first() != Some(&source) {
        return None;
    }

    Some(Route {
        nodes: path
            .into_iter()
            .filter_map(|ix| graph.node_at(ix).map(|n| n.id.clone()))
            .collect(),
        cost: dist[target as usize],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_graph::{Access, Edge, Node, NodeKind};

    fn ids(route: &Route) -> Vec<&str> {
        route.nodes.iter().map(String::as_str).collect()
    }

    /// Two equal-cost corridors between A and B; H-top is loaded first
    fn diamond() -> Graph {
        let nodes = vec![
            Node::new("A", NodeKind::Room, 1, 0, 0),
            Node::new("H-top", NodeKind::Hallway, 1, 50, 50),
            Node::new("H-bottom", NodeKind::Hallway, 1, 50, -50),
            Node::new("B", NodeKind::Room, 1, 100, 0),
        ];
        let edges = vec![
            Edge::new("A", "H-bottom"),
            Edge::new("A", "H-top"),
            Edge::new("H-bottom", "B"),
            Edge::new("H-top", "B"),
        ];
        Graph::from_parts(nodes, edges).unwrap()
    }

    #[test]
    fn test_ties_break_by_load_order() {
        let graph = diamond();
        let route = find_path(&graph, "A", "B", Role::Student).unwrap();
        // H-top is settled first (load order), and B keeps the parent that
        // first reached it
        assert_eq!(ids(&route), vec!["A", "H-top", "B"]);
        assert_eq!(route.cost, 14);
    }

    #[test]
    fn test_repeated_queries_agree() {
        let graph = diamond();
        let first = find_path(&graph, "A", "B", Role::Admin);
        for _ in 0..10 {
            assert_eq!(find_path(&graph, "A", "B", Role::Admin), first);
        }
    }

    #[test]
    fn test_unknown_ids() {
        let graph = diamond();
        assert!(find_path(&graph, "A", "ghost", Role::Admin).is_none());
        assert!(find_path(&graph, "ghost", "B", Role::Admin).is_none());
    }

    #[test]
    fn test_start_equal_to_end_is_trivial() {
        let graph = diamond();
        let route = find_path(&graph, "A", "A", Role::Student).unwrap();
        assert_eq!(ids(&route), vec!["A"]);
        assert_eq!(route.cost, 0);
    }

    #[test]
    fn test_inaccessible_start_does_not_expand() {
        let nodes = vec![
            Node::new("A", NodeKind::Room, 1, 0, 0).with_access(Access::Employee),
            Node::new("B", NodeKind::Room, 1, 100, 0),
        ];
        let graph = Graph::from_parts(nodes, vec![Edge::new("A", "B")]).unwrap();
        assert!(find_path(&graph, "A", "B", Role::Student).is_none());
        assert!(find_path(&graph, "A", "B", Role::Employee).is_some());
    }

    #[test]
    fn test_invalid_cross_floor_edge_is_never_used() {
        let nodes = vec![
            Node::new("R-1", NodeKind::Room, 1, 0, 0),
            Node::new("R-2", NodeKind::Room, 2, 0, 0),
        ];
        let graph = Graph::from_parts(nodes, vec![Edge::new("R-1", "R-2")]).unwrap();
        assert!(find_path(&graph, "R-1", "R-2", Role::Admin).is_none());
    }
}
