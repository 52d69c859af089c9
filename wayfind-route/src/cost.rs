//! Edge cost model
//!
//! Costs are computed on demand from the two endpoint nodes; nothing is
//! stored on edges. Connectors use fixed costs that stand in for travel
//! time, everything else uses plan distance scaled down by ten.

use wayfind_graph::{Node, NodeKind};

/// Cost of any edge touching a stairs node
pub const STAIR_COST: u32 = 15;
/// Cost of any edge touching an elevator node (and no stairs)
pub const ELEVATOR_COST: u32 = 25;
/// Cost of an edge that must never be taken
pub const INFINITE_COST: u32 = u32::MAX;
/// Plan units per cost unit
const DISTANCE_SCALE: f64 = 10.0;

/// Cost of walking from `a` to `b`. Symmetric, always at least 1.
///
/// A cross-floor edge costs [`INFINITE_COST`] unless it joins two stairs or
/// two elevators.
pub fn weight(a: &Node, b: &Node) -> u32 {
    if a.floor != b.floor {
        return match (a.kind, b.kind) {
            (NodeKind::Stairs, NodeKind::Stairs) => STAIR_COST,
            (NodeKind::Elevator, NodeKind::Elevator) => ELEVATOR_COST,
            _ => INFINITE_COST,
        };
    }

    if a.kind == NodeKind::Stairs || b.kind == NodeKind::Stairs {
        STAIR_COST
    } else if a.kind == NodeKind::Elevator || b.kind == NodeKind::Elevator {
        ELEVATOR_COST
    } else {
        let scaled = (a.plan_distance(b) / DISTANCE_SCALE).round();
        // i32 coordinates keep this far below u32::MAX
        (scaled as u32).max(1)
    }
}
