use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::{
    problem::{node::NodeIdx, routing_model::RoutingModel},
    solver::solution::working_solution::WorkingSolution,
};

use super::insertion::{Insertion, best_insertion};

/// Greedy construction: repeatedly commits the insertion with the lowest
/// `delta - drop_penalty` over all dropped deliveries, until none is
/// profitable or feasible.
pub struct CheapestInsertion;

impl CheapestInsertion {
    pub fn construct(model: Arc<RoutingModel>, pool: Option<&rayon::ThreadPool>) -> WorkingSolution {
        let mut solution = WorkingSolution::new(model);

        loop {
            let unassigned: Vec<NodeIdx> = solution.unassigned_iter().collect();
            if unassigned.is_empty() {
                break;
            }

            let best = match pool {
                Some(pool) => pool.install(|| Self::best_scored_insertion(&solution, &unassigned)),
                None => Self::best_scored_insertion(&solution, &unassigned),
            };

            match best {
                Some((score, insertion)) if score < 0 => {
                    let inserted =
                        solution.try_insert(insertion.node, insertion.vehicle_id, insertion.position);
                    debug_assert!(inserted);
                }
                _ => break,
            }
        }

        debug!(
            "Construction served {} deliveries, cost {}",
            solution.model().num_nodes() - 1 - solution.unassigned_iter().count(),
            solution.total_cost()
        );

        solution
    }

    fn best_scored_insertion(
        solution: &WorkingSolution,
        unassigned: &[NodeIdx],
    ) -> Option<(i64, Insertion)> {
        let model = solution.model();

        unassigned
            .par_iter()
            .filter_map(|&node| {
                best_insertion(solution, node)
                    .map(|insertion| (insertion.delta - model.drop_penalty(node), insertion))
            })
            .min_by_key(|(score, insertion)| (*score, insertion.node))
    }
}
