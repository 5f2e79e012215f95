use smallvec::{SmallVec, smallvec};

use crate::{
    problem::{node::NodeIdx, vehicle::VehicleIdx},
    solver::{
        ls::r#move::{LocalSearchOperator, RouteChange, RouteChanges},
        solution::working_solution::WorkingSolution,
    },
};

/// Puts a dropped delivery back on a trip, saving its drop penalty.
#[derive(Debug)]
pub struct InsertUnassignedOperator {
    params: InsertUnassignedParams,
}

#[derive(Debug)]
pub struct InsertUnassignedParams {
    pub node: NodeIdx,
    pub vehicle_id: VehicleIdx,
    pub position: usize,
}

impl InsertUnassignedOperator {
    pub fn new(params: InsertUnassignedParams) -> Self {
        InsertUnassignedOperator { params }
    }
}

impl LocalSearchOperator for InsertUnassignedOperator {
    fn generate_moves<F>(solution: &WorkingSolution, mut consumer: F)
    where
        F: FnMut(Self),
    {
        let model = solution.model();

        for node in solution.unassigned_iter() {
            let demand = model.demand_transit(node);

            for route in solution.routes() {
                if route.load() + demand > model.vehicle(route.vehicle_id()).capacity() {
                    continue;
                }

                for position in 0..=route.len() {
                    consumer(InsertUnassignedOperator::new(InsertUnassignedParams {
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
        nodes.insert(self.params.position, self.params.node);

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
}
