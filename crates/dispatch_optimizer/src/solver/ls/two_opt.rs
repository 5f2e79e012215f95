use smallvec::{SmallVec, smallvec};

use crate::{
    problem::vehicle::VehicleIdx,
    solver::{
        ls::r#move::{LocalSearchOperator, RouteChange, RouteChanges},
        solution::working_solution::WorkingSolution,
    },
};

/// **Intra-Route 2-Opt**
///
/// Reverses the deliveries between `from` and `to` (inclusive), removing a
/// crossing inside a trip.
///
/// ```text
/// BEFORE:
///    ... (prev) --x--> [from] -> ... -> [to] --x--> (next) ...
///
/// AFTER (Sequence Reversed):
///    ... (prev) -----> [to] -> ... -> [from] -----> (next) ...
///
/// Arcs Removed: (prev->from), (to->next)
/// Arcs Added:   (prev->to),   (from->next)
/// ```
///
/// Waiting times change along the reversed segment, so the whole trip is
/// rescheduled before the move is accepted.
#[derive(Debug)]
pub struct TwoOptOperator {
    params: TwoOptParams,
}

#[derive(Debug)]
pub struct TwoOptParams {
    pub vehicle_id: VehicleIdx,
    pub from: usize,
    pub to: usize,
}

impl TwoOptOperator {
    pub fn new(params: TwoOptParams) -> Self {
        if params.from >= params.to {
            panic!("TwoOpt: cannot have from >= to")
        }

        TwoOptOperator { params }
    }
}

impl LocalSearchOperator for TwoOptOperator {
    fn generate_moves<F>(solution: &WorkingSolution, mut consumer: F)
    where
        F: FnMut(Self),
    {
        for route in solution.non_empty_routes_iter() {
            // adjacent pairs are covered by swap
            for from in 0..route.len() {
                for to in from + 2..route.len() {
                    consumer(TwoOptOperator::new(TwoOptParams {
                        vehicle_id: route.vehicle_id(),
                        from,
                        to,
                    }));
                }
            }
        }
    }

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let mut nodes = solution.route(self.params.vehicle_id).nodes().to_vec();
        nodes[self.params.from..=self.params.to].reverse();

        smallvec![RouteChange {
            vehicle_id: self.params.vehicle_id,
            nodes,
        }]
    }

    fn updated_routes(&self) -> SmallVec<[VehicleIdx; 2]> {
        smallvec![self.params.vehicle_id]
    }
}
