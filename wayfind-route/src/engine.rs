//! Caller-facing query wrapper
//!
//! [`find_path`](crate::find_path) treats every bad input as "no route".
//! [`PathEngine`] checks the query first and reports precondition failures
//! as [`QueryError`], keeping "no route" as a plain `None`.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use wayfind_graph::Graph;

use crate::instructions::{build_instructions, Instruction};
use crate::role::Role;
use crate::search::{find_path, Route};
use crate::segment::{segment_by_floor, FloorSegment};

/// Shown to users when the search comes back empty
pub const NO_ROUTE_MESSAGE: &str = "No path found. The route may be restricted.";

/// Rejected query; nothing was searched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Start and end cannot be the same")]
    SameEndpoint,

    #[error("Node '{0}' not found")]
    UnknownNode(String),

    #[error("Node '{0}' is not a room and cannot be a route endpoint")]
    NotSelectable(String),

    #[error("Unknown role '{0}'")]
    UnknownRole(String),
}

/// Route with everything a renderer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RoutePlan {
    pub path: Vec<String>,
    pub cost: u32,
    pub segments: Vec<FloorSegment>,
    pub instructions: Vec<Instruction>,
}

impl RoutePlan {
    fn from_route(graph: &Graph, route: Route) -> Self {
        let segments = segment_by_floor(graph, &route.nodes);
        let instructions = build_instructions(graph, &route.nodes);
        Self {
            path: route.nodes,
            cost: route.cost,
            segments,
            instructions,
        }
    }
}

/// Query handle over a borrowed graph
#[derive(Debug, Clone, Copy)]
pub struct PathEngine<'g> {
    graph: &'g Graph,
}

impl<'g> PathEngine<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn find_path(&self, start: &str, end: &str, role: Role) -> Option<Route> {
        find_path(self.graph, start, end, role)
    }

    /// Like [`PathEngine::find_path`] with a wire role name. An unknown role
    /// never matches anything, so the result is `None`.
    pub fn find_path_by_role_name(&self, start: &str, end: &str, role: &str) -> Option<Route> {
        let role = Role::from_name(role)?;
        self.find_path(start, end, role)
    }

    /// Reject a query that must not reach the search: identical endpoints
    /// or ids that do not resolve.
    pub fn check(&self, start: &str, end: &str) -> Result<(), QueryError> {
        if start == end {
            return Err(QueryError::SameEndpoint);
        }
        for id in [start, end] {
            if !self.graph.contains(id) {
                return Err(QueryError::UnknownNode(id.to_string()));
            }
        }
        Ok(())
    }

    /// Full query as the route screen runs it: both endpoints must be
    /// distinct rooms. `Ok(None)` means no route exists for this role.
    pub fn plan(&self, start: &str, end: &str, role: Role) -> Result<Option<RoutePlan>, QueryError> {
        self.check(start, end)?;
        for id in [start, end] {
            if !self.graph.node(id).is_some_and(|n| n.is_room()) {
                return Err(QueryError::NotSelectable(id.to_string()));
            }
        }

        Ok(self
            .find_path(start, end, role)
            .map(|route| RoutePlan::from_route(self.graph, route)))
    }

    /// [`PathEngine::plan`] with a wire role name
    pub fn plan_by_role_name(
        &self,
        start: &str,
        end: &str,
        role: &str,
    ) -> Result<Option<RoutePlan>, QueryError> {
        let role: Role = role
            .parse()
            .map_err(|_| QueryError::UnknownRole(role.to_string()))?;
        self.plan(start, end, role)
    }
}
