//! Role-aware shortest path engine for indoor wayfinding
//!
//! Computes edge costs from node kinds and plan coordinates, filters nodes
//! by [`Role`], runs Dijkstra over a [`wayfind_graph::Graph`] and turns the
//! result into per-floor segments and instruction steps.

pub mod cost;
pub mod engine;
pub mod instructions;
pub mod role;
pub mod search;
pub mod segment;

pub use cost::{weight, ELEVATOR_COST, INFINITE_COST, STAIR_COST};
pub use engine::{PathEngine, QueryError, RoutePlan, NO_ROUTE_MESSAGE};
pub use instructions::{build_instructions, Instruction};
pub use role::{is_accessible, Role, UnknownRole};
pub use search::{find_path, Route};
pub use segment::{segment_by_floor, FloorSegment};
