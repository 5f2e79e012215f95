use smallvec::{SmallVec, smallvec};

use crate::{
    problem::{node::NodeIdx, vehicle::VehicleIdx},
    solver::{
        ls::r#move::{LocalSearchOperator, RouteChange, RouteChanges},
        solution::working_solution::WorkingSolution,
    },
};

/// Serves a dropped delivery in place of a served one, which becomes dropped.
/// Lets an urgent delivery take the slot of an ordinary one.
///
/// ```text
/// BEFORE:
///    (A) -> [x] -> (B)         dropped: [u]
///
/// AFTER:
///    (A) -> [u] -> (B)         dropped: [x]
/// ```
#[derive(Debug)]
pub struct ExchangeUnassignedOperator {
    params: ExchangeUnassignedParams,
}

#[derive(Debug)]
pub struct ExchangeUnassignedParams {
    pub node: NodeIdx,
    pub vehicle_id: VehicleIdx,
    pub position: usize,
}

impl ExchangeUnassignedOperator {
    pub fn new(params: ExchangeUnassignedParams) -> Self {
        ExchangeUnassignedOperator { params }
    }
}

impl LocalSearchOperator for ExchangeUnassignedOperator {
    fn generate_moves<F>(solution: &WorkingSolution, mut consumer: F)
    where
        F: FnMut(Self),
    {
        let model = solution.model();

        for node in solution.unassigned_iter() {
            let demand = model.demand_transit(node);

            for route in solution.non_empty_routes_iter() {
                let capacity = model.vehicle(route.vehicle_id()).capacity();

                for (position, &served) in route.nodes().iter().enumerate() {
                    if route.load() - model.demand_transit(served) + demand > capacity {
                        continue;
                    }

                    consumer(ExchangeUnassignedOperator::new(ExchangeUnassignedParams {
                        node,
                        vehicle_id: route.vehicle_id(),
                        position,
                    }));
                }
            }
        }
    }

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let mut nodes = solution.route(self.params.vehicle_id).nodes().to_vec();
        nodes[self.params.position] = self.params.node;

        smallvec![RouteChange {
            vehicle_id: self.params.vehicle_id,
            nodes,
        }]
    }

    fn updated_routes(&self) -> SmallVec<[VehicleIdx; 2]> {
        smallvec![self.params.vehicle_id]
    }

    fn inserted_node(&self) -> Option<NodeIdx> {
        Some(self.params.node)
    }

    fn removed_node(&self, solution: &WorkingSolution) -> Option<NodeIdx> {
        Some(solution.route(self.params.vehicle_id).nodes()[self.params.position])
    }
}
