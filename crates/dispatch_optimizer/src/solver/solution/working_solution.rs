use std::sync::Arc;

use crate::{
    problem::{node::NodeIdx, routing_model::RoutingModel, vehicle::VehicleIdx},
    utils::enumerate_idx::EnumerateIdx,
};

use super::route::{RouteSchedule, route_cost};

#[derive(Clone, Debug)]
pub struct WorkingSolutionRoute {
    vehicle_id: VehicleIdx,
    nodes: Vec<NodeIdx>,
    schedule: RouteSchedule,
    cost: i64,
}

impl WorkingSolutionRoute {
    fn empty(vehicle_id: VehicleIdx) -> Self {
        WorkingSolutionRoute {
            vehicle_id,
            nodes: vec![],
            schedule: RouteSchedule::default(),
            cost: 0,
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    pub fn nodes(&self) -> &[NodeIdx] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn schedule(&self) -> &RouteSchedule {
        &self.schedule
    }

    pub fn cost(&self) -> i64 {
        self.cost
    }

    pub fn load(&self) -> i64 {
        self.schedule.load()
    }
}

/// Feasible assignment of deliveries to virtual vehicles. Deliveries on no
/// route are dropped and pay their penalty.
#[derive(Clone, Debug)]
pub struct WorkingSolution {
    model: Arc<RoutingModel>,
    routes: Vec<WorkingSolutionRoute>,
    assignments: Vec<Option<VehicleIdx>>,
}

impl WorkingSolution {
    pub fn new(model: Arc<RoutingModel>) -> Self {
        let routes = (0..model.num_vehicles())
            .map(|index| WorkingSolutionRoute::empty(VehicleIdx::new(index)))
            .collect();
        let assignments = vec![None; model.num_nodes()];

        WorkingSolution {
            model,
            routes,
            assignments,
        }
    }

    pub fn model(&self) -> &RoutingModel {
        &self.model
    }

    pub fn routes(&self) -> &[WorkingSolutionRoute] {
        &self.routes
    }

    pub fn route(&self, vehicle_id: VehicleIdx) -> &WorkingSolutionRoute {
        &self.routes[vehicle_id.get()]
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = &WorkingSolutionRoute> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    pub fn assigned_vehicle(&self, node: NodeIdx) -> Option<VehicleIdx> {
        self.assignments[node.get()]
    }

    /// Dropped deliveries in ascending order.
    pub fn unassigned_iter(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.assignments
            .iter()
            .enumerate_idx()
            .skip(1)
            .filter(|(_, assignment)| assignment.is_none())
            .map(|(node, _): (NodeIdx, _)| node)
    }

    pub fn has_unassigned(&self) -> bool {
        self.unassigned_iter().next().is_some()
    }

    pub fn transport_cost(&self) -> i64 {
        self.routes.iter().map(|route| route.cost).sum()
    }

    pub fn drop_penalties(&self) -> i64 {
        self.unassigned_iter()
            .map(|node| self.model.drop_penalty(node))
            .sum()
    }

    /// Objective: transit of every trip plus the penalty of every dropped delivery.
    pub fn total_cost(&self) -> i64 {
        self.transport_cost() + self.drop_penalties()
    }

    /// Number of arcs traveled, depot legs included.
    pub fn num_arcs(&self) -> usize {
        self.non_empty_routes_iter()
            .map(|route| route.len() + 1)
            .sum()
    }

    /// Installs `nodes` as the trip of `vehicle_id`. The caller guarantees
    /// `schedule` was computed for exactly these nodes on this vehicle.
    pub fn replace_route(
        &mut self,
        vehicle_id: VehicleIdx,
        nodes: Vec<NodeIdx>,
        schedule: RouteSchedule,
    ) {
        debug_assert_eq!(
            RouteSchedule::compute(&self.model, vehicle_id, &nodes).as_ref(),
            Some(&schedule)
        );

        let route = &mut self.routes[vehicle_id.get()];
        // a two-route move may already have given a node to the other route
        for &node in &route.nodes {
            if self.assignments[node.get()] == Some(vehicle_id) {
                self.assignments[node.get()] = None;
            }
        }
        for &node in &nodes {
            self.assignments[node.get()] = Some(vehicle_id);
        }

        route.cost = route_cost(&self.model, &nodes);
        route.nodes = nodes;
        route.schedule = schedule;
    }

    /// Inserts `node` before `position` when the resulting trip is feasible.
    pub fn try_insert(&mut self, node: NodeIdx, vehicle_id: VehicleIdx, position: usize) -> bool {
        let mut nodes = self.route(vehicle_id).nodes.clone();
        nodes.insert(position, node);

        match RouteSchedule::compute(&self.model, vehicle_id, &nodes) {
            Some(schedule) => {
                self.replace_route(vehicle_id, nodes, schedule);
                true
            }
            None => false,
        }
    }
}
