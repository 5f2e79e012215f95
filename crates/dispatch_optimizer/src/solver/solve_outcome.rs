use serde::Serialize;

use crate::{
    problem::{
        node::{DEPOT, NodeIdx},
        vehicle::VehicleIdx,
    },
    solver::solution::working_solution::WorkingSolution,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteStop {
    pub node: NodeIdx,
    /// Seconds from the shift start
    pub arrival: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRoute {
    pub vehicle_id: VehicleIdx,
    pub stops: Vec<RouteStop>,
    /// Latest departure from the depot that keeps the first arrival
    pub start: i64,
    /// Return to the depot
    pub end: i64,
}

/// Trips of every used vehicle, in vehicle order, and the dropped deliveries
/// in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolveOutcome {
    pub routes: Vec<VehicleRoute>,
    pub dropped: Vec<NodeIdx>,
}

impl SolveOutcome {
    pub fn all_dropped(num_nodes: usize) -> Self {
        SolveOutcome {
            routes: vec![],
            dropped: (1..num_nodes).map(NodeIdx::new).collect(),
        }
    }

    pub fn from_solution(solution: &WorkingSolution) -> Self {
        let model = solution.model();

        let routes = solution
            .non_empty_routes_iter()
            .map(|route| {
                let stops: Vec<RouteStop> = route
                    .nodes()
                    .iter()
                    .zip(route.schedule().arrivals())
                    .map(|(&node, &arrival)| RouteStop { node, arrival })
                    .collect();

                let start = stops.first().map_or(0, |first| {
                    (first.arrival - model.transit(DEPOT, first.node)).max(0)
                });

                VehicleRoute {
                    vehicle_id: route.vehicle_id(),
                    stops,
                    start,
                    end: route.schedule().end(),
                }
            })
            .collect();

        SolveOutcome {
            routes,
            dropped: solution.unassigned_iter().collect(),
        }
    }

    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|route| route.stops.len()).sum()
    }
}
