use smallvec::{SmallVec, smallvec};

use crate::{
    problem::vehicle::VehicleIdx,
    solver::{
        ls::r#move::{LocalSearchOperator, RouteChange, RouteChanges},
        solution::working_solution::WorkingSolution,
    },
};

const MIN_SEGMENT_LENGTH: usize = 2;
const MAX_SEGMENT_LENGTH: usize = 3;

/// **Or-Opt**
///
/// Moves a chain of consecutive deliveries, keeping its orientation.
///
/// ```text
/// BEFORE:
///    (A) -> [x1 -> x2] -> (B) -> ... -> (C) -> (D)
///
/// AFTER:
///    (A) -> (B) -> ... -> (C) -> [x1 -> x2] -> (D)
/// ```
#[derive(Debug)]
pub struct OrOptOperator {
    params: OrOptParams,
}

#[derive(Debug)]
pub struct OrOptParams {
    pub from_vehicle: VehicleIdx,
    pub segment_start: usize,
    pub segment_length: usize,
    pub to_vehicle: VehicleIdx,
    /// Position in the destination trip once the segment is taken out
    pub to_position: usize,
}

impl OrOptOperator {
    pub fn new(params: OrOptParams) -> Self {
        OrOptOperator { params }
    }
}

impl LocalSearchOperator for OrOptOperator {
    fn generate_moves<F>(solution: &WorkingSolution, mut consumer: F)
    where
        F: FnMut(Self),
    {
        let model = solution.model();

        for from_route in solution.non_empty_routes_iter() {
            for segment_length in MIN_SEGMENT_LENGTH..=MAX_SEGMENT_LENGTH {
                if segment_length > from_route.len() {
                    break;
                }

                for segment_start in 0..=from_route.len() - segment_length {
                    let segment = &from_route.nodes()[segment_start..segment_start + segment_length];
                    let demand: i64 = segment.iter().map(|&node| model.demand_transit(node)).sum();

                    for to_route in solution.routes() {
                        let same_route = to_route.vehicle_id() == from_route.vehicle_id();
                        if !same_route
                            && to_route.load() + demand
                                > model.vehicle(to_route.vehicle_id()).capacity()
                        {
                            continue;
                        }

                        let max_position = if same_route {
                            from_route.len() - segment_length
                        } else {
                            to_route.len()
                        };

                        for to_position in 0..=max_position {
                            if same_route && to_position == segment_start {
                                continue;
                            }

                            consumer(OrOptOperator::new(OrOptParams {
                                from_vehicle: from_route.vehicle_id(),
                                segment_start,
                                segment_length,
                                to_vehicle: to_route.vehicle_id(),
                                to_position,
                            }));
                        }
                    }
                }
            }
        }
    }

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let mut from_nodes = solution.route(self.params.from_vehicle).nodes().to_vec();
        let segment: Vec<_> = from_nodes
            .drain(self.params.segment_start..self.params.segment_start + self.params.segment_length)
            .collect();

        if self.params.from_vehicle == self.params.to_vehicle {
            from_nodes.splice(self.params.to_position..self.params.to_position, segment);
            return smallvec![RouteChange {
                vehicle_id: self.params.from_vehicle,
                nodes: from_nodes,
            }];
        }

        let mut to_nodes = solution.route(self.params.to_vehicle).nodes().to_vec();
        to_nodes.splice(self.params.to_position..self.params.to_position, segment);

        smallvec![
            RouteChange {
                vehicle_id: self.params.from_vehicle,
                nodes: from_nodes,
            },
            RouteChange {
                vehicle_id: self.params.to_vehicle,
                nodes: to_nodes,
            }
        ]
    }

    fn updated_routes(&self) -> SmallVec<[VehicleIdx; 2]> {
        if self.params.from_vehicle == self.params.to_vehicle {
            smallvec![self.params.from_vehicle]
        } else {
            smallvec![self.params.from_vehicle, self.params.to_vehicle]
        }
    }
}
