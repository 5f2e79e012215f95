use fxhash::FxHashMap;

use crate::{
    problem::{node::NodeIdx, routing_model::RoutingModel},
    solver::solution::{route::route_arcs, working_solution::WorkingSolution},
};

const UTILITY_EPSILON: f64 = 1e-9;

/// Guided local search penalties.
///
/// At every local optimum the arcs with the highest utility
/// `transit / (1 + penalty)` get one more penalty. The local search then
/// descends on the augmented cost `transit + lambda * penalty`, which pushes
/// it away from arcs it keeps coming back to.
#[derive(Debug, Clone)]
pub struct GuidedLocalSearch {
    penalties: FxHashMap<(NodeIdx, NodeIdx), u32>,
    lambda: f64,
    lambda_coefficient: f64,
    calibrated: bool,
}

impl GuidedLocalSearch {
    pub fn new(lambda_coefficient: f64) -> Self {
        GuidedLocalSearch {
            penalties: FxHashMap::default(),
            lambda: 0.0,
            lambda_coefficient,
            calibrated: false,
        }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn arc_penalty(&self, from: NodeIdx, to: NodeIdx) -> u32 {
        self.penalties.get(&(from, to)).copied().unwrap_or(0)
    }

    pub fn augmented_arc_cost(&self, model: &RoutingModel, from: NodeIdx, to: NodeIdx) -> f64 {
        let transit = model.transit(from, to) as f64;

        if self.lambda == 0.0 {
            transit
        } else {
            transit + self.lambda * f64::from(self.arc_penalty(from, to))
        }
    }

    pub fn augmented_route_cost(&self, model: &RoutingModel, nodes: &[NodeIdx]) -> f64 {
        route_arcs(nodes)
            .map(|(from, to)| self.augmented_arc_cost(model, from, to))
            .sum()
    }

    /// Sets lambda from the first local optimum that travels at least one arc.
    pub fn calibrate(&mut self, solution: &WorkingSolution) {
        if self.calibrated {
            return;
        }

        let num_arcs = solution.num_arcs();
        if num_arcs == 0 {
            return;
        }

        self.lambda =
            self.lambda_coefficient * solution.transport_cost() as f64 / num_arcs as f64;
        self.calibrated = true;
    }

    /// Penalizes the max-utility arcs of `solution`. Returns `false` when the
    /// solution travels no arc at all.
    pub fn penalize(&mut self, solution: &WorkingSolution) -> bool {
        let model = solution.model();
        let mut max_utility = f64::NEG_INFINITY;
        let mut selected: Vec<(NodeIdx, NodeIdx)> = vec![];

        for route in solution.non_empty_routes_iter() {
            for arc in route_arcs(route.nodes()) {
                let utility = model.transit(arc.0, arc.1) as f64
                    / (1.0 + f64::from(self.arc_penalty(arc.0, arc.1)));

                if utility > max_utility + UTILITY_EPSILON {
                    max_utility = utility;
                    selected.clear();
                    selected.push(arc);
                } else if utility >= max_utility - UTILITY_EPSILON {
                    selected.push(arc);
                }
            }
        }

        for arc in &selected {
            *self.penalties.entry(*arc).or_insert(0) += 1;
        }

        !selected.is_empty()
    }
}
