use smallvec::{SmallVec, smallvec};

use crate::{
    problem::vehicle::VehicleIdx,
    solver::{
        ls::r#move::{LocalSearchOperator, RouteChange, RouteChanges},
        solution::working_solution::WorkingSolution,
    },
};

/// **Relocate**
///
/// Moves a single delivery to another position of its trip or into another
/// trip.
///
/// ```text
/// BEFORE:
///    r1: (A) -> [x] -> (B)        r2: (C) -> (D)
///
/// AFTER:
///    r1: (A) -> (B)               r2: (C) -> [x] -> (D)
/// ```
///
/// `to_position` indexes the destination trip once `x` has been taken out.
#[derive(Debug)]
pub struct RelocateOperator {
    params: RelocateParams,
}

#[derive(Debug)]
pub struct RelocateParams {
    pub from_vehicle: VehicleIdx,
    pub from_position: usize,
    pub to_vehicle: VehicleIdx,
    pub to_position: usize,
}

impl RelocateOperator {
    pub fn new(params: RelocateParams) -> Self {
        RelocateOperator { params }
    }
}

impl LocalSearchOperator for RelocateOperator {
    fn generate_moves<F>(solution: &WorkingSolution, mut consumer: F)
    where
        F: FnMut(Self),
    {
        let model = solution.model();

        for from_route in solution.non_empty_routes_iter() {
            for from_position in 0..from_route.len() {
                let demand = model.demand_transit(from_route.nodes()[from_position]);

                for to_route in solution.routes() {
                    if to_route.vehicle_id() == from_route.vehicle_id() {
                        for to_position in 0..from_route.len() {
                            if to_position != from_position {
                                consumer(RelocateOperator::new(RelocateParams {
                                    from_vehicle: from_route.vehicle_id(),
                                    from_position,
                                    to_vehicle: to_route.vehicle_id(),
                                    to_position,
                                }));
                            }
                        }
                        continue;
                    }

                    if to_route.load() + demand > model.vehicle(to_route.vehicle_id()).capacity() {
                        continue;
                    }

                    for to_position in 0..=to_route.len() {
                        consumer(RelocateOperator::new(RelocateParams {
                            from_vehicle: from_route.vehicle_id(),
                            from_position,
                            to_vehicle: to_route.vehicle_id(),
                            to_position,
                        }));
                    }
                }
            }
        }
    }

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let mut from_nodes = solution.route(self.params.from_vehicle).nodes().to_vec();
        let node = from_nodes.remove(self.params.from_position);

        if self.params.from_vehicle == self.params.to_vehicle {
            from_nodes.insert(self.params.to_position, node);
            return smallvec![RouteChange {
                vehicle_id: self.params.from_vehicle,
                nodes: from_nodes,
            }];
        }

        let mut to_nodes = solution.route(self.params.to_vehicle).nodes().to_vec();
        to_nodes.insert(self.params.to_position, node);

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

#[cfg(test)]
mod tests {
    use crate::{problem::node::NodeIdx, test_utils};

    use super::*;

    #[test]
    fn test_intra_route_relocate() {
        let solution = test_utils::solution_with_routes(6, 2, 10, vec![vec![1, 2, 3, 4]]);

        let operator = RelocateOperator::new(RelocateParams {
            from_vehicle: VehicleIdx::new(0),
            from_position: 0,
            to_vehicle: VehicleIdx::new(0),
            to_position: 2,
        });
        let changes = operator.route_changes(&solution);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].nodes, test_utils::node_indices(&[2, 3, 1, 4]));
    }

    #[test]
    fn test_inter_route_relocate() {
        let solution = test_utils::solution_with_routes(6, 2, 10, vec![vec![1, 2], vec![3, 4]]);

        let operator = RelocateOperator::new(RelocateParams {
            from_vehicle: VehicleIdx::new(0),
            from_position: 1,
            to_vehicle: VehicleIdx::new(1),
            to_position: 1,
        });
        let changes = operator.route_changes(&solution);

        assert_eq!(changes[0].nodes, vec![NodeIdx::new(1)]);
        assert_eq!(changes[1].nodes, test_utils::node_indices(&[3, 2, 4]));
        assert_eq!(operator.updated_routes().len(), 2);
    }

    #[test]
    fn test_apply_inter_route_relocate() {
        let mut solution =
            test_utils::solution_with_routes(6, 2, 10, vec![vec![1, 2], vec![3, 4]]);

        test_utils::apply_move(
            &mut solution,
            &RelocateOperator::new(RelocateParams {
                from_vehicle: VehicleIdx::new(1),
                from_position: 0,
                to_vehicle: VehicleIdx::new(0),
                to_position: 2,
            }),
        );

        assert_eq!(
            solution.route(VehicleIdx::new(0)).nodes(),
            test_utils::node_indices(&[1, 2, 3])
        );
        assert_eq!(
            solution.assigned_vehicle(NodeIdx::new(3)),
            Some(VehicleIdx::new(0))
        );
        assert_eq!(
            solution.unassigned_iter().collect::<Vec<_>>(),
            vec![NodeIdx::new(5)]
        );
        test_utils::assert_assignments_consistent(&solution);
    }

    #[test]
    fn test_generated_moves_skip_identity() {
        let solution = test_utils::solution_with_routes(4, 1, 10, vec![vec![1, 2, 3]]);

        let mut count = 0;
        RelocateOperator::generate_moves(&solution, |op| {
            assert_ne!(op.params.from_position, op.params.to_position);
            count += 1;
        });

        assert_eq!(count, 3 * 2);
    }
}
