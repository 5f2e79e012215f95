use crate::problem::{
    node::{DEPOT, NodeIdx},
    routing_model::RoutingModel,
    vehicle::VehicleIdx,
};

/// Earliest feasible arrival at every stop of a trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSchedule {
    arrivals: Vec<i64>,
    end: i64,
    load: i64,
}

impl RouteSchedule {
    /// Walks the trip depot -> nodes -> depot, waiting at early windows.
    /// Returns `None` as soon as a window, the shift or the capacity is broken.
    pub fn compute(
        model: &RoutingModel,
        vehicle_id: VehicleIdx,
        nodes: &[NodeIdx],
    ) -> Option<RouteSchedule> {
        if nodes.is_empty() {
            return Some(RouteSchedule::default());
        }

        let capacity = model.vehicle(vehicle_id).capacity();
        let shift_length = model.shift_length();

        let mut arrivals = Vec::with_capacity(nodes.len());
        let mut time = 0;
        let mut load = 0;
        let mut previous = DEPOT;

        for &node in nodes {
            load += model.demand_transit(node);
            if load > capacity {
                return None;
            }

            let time_window = model.node(node).time_window();
            time = time_window.service_start(time + model.transit(previous, node));
            if time > time_window.end() || time > shift_length {
                return None;
            }

            arrivals.push(time);
            previous = node;
        }

        let end = time + model.transit(previous, DEPOT);
        if end > shift_length {
            return None;
        }

        Some(RouteSchedule {
            arrivals,
            end,
            load,
        })
    }

    pub fn arrivals(&self) -> &[i64] {
        &self.arrivals
    }

    /// Time back at the depot
    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn load(&self) -> i64 {
        self.load
    }
}

/// Sum of transits along depot -> nodes -> depot, zero for an unused vehicle.
pub fn route_cost(model: &RoutingModel, nodes: &[NodeIdx]) -> i64 {
    if nodes.is_empty() {
        return 0;
    }

    route_arcs(nodes)
        .map(|(from, to)| model.transit(from, to))
        .sum()
}

/// Arcs of a trip including both depot legs.
pub fn route_arcs(nodes: &[NodeIdx]) -> impl Iterator<Item = (NodeIdx, NodeIdx)> + '_ {
    let has_nodes = !nodes.is_empty();

    std::iter::once(DEPOT)
        .chain(nodes.iter().copied())
        .zip(nodes.iter().copied().chain(std::iter::once(DEPOT)))
        .filter(move |_| has_nodes)
}
