use crate::{
    problem::{node::NodeIdx, vehicle::VehicleIdx},
    solver::solution::{
        route::{RouteSchedule, route_cost},
        working_solution::WorkingSolution,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub node: NodeIdx,
    pub vehicle_id: VehicleIdx,
    /// Index in the trip the node will occupy
    pub position: usize,
    /// Transit added to the trip
    pub delta: i64,
}

/// Calls `f` for every feasible position of `node` in the trip of `vehicle_id`.
pub fn for_each_route_insertion<F>(
    solution: &WorkingSolution,
    vehicle_id: VehicleIdx,
    node: NodeIdx,
    mut f: F,
) where
    F: FnMut(Insertion),
{
    let model = solution.model();
    let route = solution.route(vehicle_id);

    if route.load() + model.demand_transit(node) > model.vehicle(vehicle_id).capacity() {
        return;
    }

    let mut candidate = Vec::with_capacity(route.len() + 1);
    for position in 0..=route.len() {
        candidate.clear();
        candidate.extend_from_slice(&route.nodes()[..position]);
        candidate.push(node);
        candidate.extend_from_slice(&route.nodes()[position..]);

        if RouteSchedule::compute(model, vehicle_id, &candidate).is_some() {
            f(Insertion {
                node,
                vehicle_id,
                position,
                delta: route_cost(model, &candidate) - route.cost(),
            });
        }
    }
}

/// Cheapest feasible insertion of `node` over every vehicle. Ties keep the
/// lowest vehicle and position.
pub fn best_insertion(solution: &WorkingSolution, node: NodeIdx) -> Option<Insertion> {
    let mut best: Option<Insertion> = None;

    for route in solution.routes() {
        for_each_route_insertion(solution, route.vehicle_id(), node, |insertion| {
            if best
                .as_ref()
                .is_none_or(|current| insertion.delta < current.delta)
            {
                best = Some(insertion);
            }
        });
    }

    best
}
