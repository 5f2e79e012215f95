use smallvec::{SmallVec, smallvec};

use crate::{
    problem::vehicle::VehicleIdx,
    solver::{
        ls::r#move::{LocalSearchOperator, RouteChange, RouteChanges},
        solution::working_solution::WorkingSolution,
    },
};

/// **Swap**
///
/// Exchanges two deliveries, within a trip or between two trips.
///
/// ```text
/// BEFORE:
///    r1: (A) -> [x] -> (B)        r2: (C) -> [y] -> (D)
///
/// AFTER:
///    r1: (A) -> [y] -> (B)        r2: (C) -> [x] -> (D)
/// ```
#[derive(Debug)]
pub struct SwapOperator {
    params: SwapParams,
}

#[derive(Debug)]
pub struct SwapParams {
    pub first_vehicle: VehicleIdx,
    pub first_position: usize,
    pub second_vehicle: VehicleIdx,
    pub second_position: usize,
}

impl SwapOperator {
    pub fn new(params: SwapParams) -> Self {
        if params.first_vehicle == params.second_vehicle
            && params.first_position == params.second_position
        {
            panic!("Swap: cannot swap a delivery with itself")
        }

        SwapOperator { params }
    }
}

impl LocalSearchOperator for SwapOperator {
    fn generate_moves<F>(solution: &WorkingSolution, mut consumer: F)
    where
        F: FnMut(Self),
    {
        let model = solution.model();
        let routes = solution.routes();

        for (r1, first_route) in routes.iter().enumerate() {
            if first_route.is_empty() {
                continue;
            }

            for first_position in 0..first_route.len() {
                for second_position in first_position + 1..first_route.len() {
                    consumer(SwapOperator::new(SwapParams {
                        first_vehicle: first_route.vehicle_id(),
                        first_position,
                        second_vehicle: first_route.vehicle_id(),
                        second_position,
                    }));
                }
            }

            for second_route in routes[r1 + 1..].iter().filter(|route| !route.is_empty()) {
                let first_capacity = model.vehicle(first_route.vehicle_id()).capacity();
                let second_capacity = model.vehicle(second_route.vehicle_id()).capacity();

                for (first_position, &x) in first_route.nodes().iter().enumerate() {
                    for (second_position, &y) in second_route.nodes().iter().enumerate() {
                        let exchanged = model.demand_transit(y) - model.demand_transit(x);
                        if first_route.load() + exchanged > first_capacity
                            || second_route.load() - exchanged > second_capacity
                        {
                            continue;
                        }

                        consumer(SwapOperator::new(SwapParams {
                            first_vehicle: first_route.vehicle_id(),
                            first_position,
                            second_vehicle: second_route.vehicle_id(),
                            second_position,
                        }));
                    }
                }
            }
        }
    }

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let mut first_nodes = solution.route(self.params.first_vehicle).nodes().to_vec();

        if self.params.first_vehicle == self.params.second_vehicle {
            first_nodes.swap(self.params.first_position, self.params.second_position);
            return smallvec![RouteChange {
                vehicle_id: self.params.first_vehicle,
                nodes: first_nodes,
            }];
        }

        let mut second_nodes = solution.route(self.params.second_vehicle).nodes().to_vec();
        std::mem::swap(
            &mut first_nodes[self.params.first_position],
            &mut second_nodes[self.params.second_position],
        );

        smallvec![
            RouteChange {
                vehicle_id: self.params.first_vehicle,
                nodes: first_nodes,
            },
            RouteChange {
                vehicle_id: self.params.second_vehicle,
                nodes: second_nodes,
            }
        ]
    }

    fn updated_routes(&self) -> SmallVec<[VehicleIdx; 2]> {
        if self.params.first_vehicle == self.params.second_vehicle {
            smallvec![self.params.first_vehicle]
        } else {
            smallvec![self.params.first_vehicle, self.params.second_vehicle]
        }
    }
}
