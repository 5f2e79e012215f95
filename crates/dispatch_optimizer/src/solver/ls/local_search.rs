use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};
use tracing::{instrument, trace};

use crate::solver::{
    guided_local_search::GuidedLocalSearch,
    ls::{
        exchange_unassigned::ExchangeUnassignedOperator,
        insert_unassigned::InsertUnassignedOperator,
        or_opt::OrOptOperator,
        r#move::{EvaluatedMove, LocalSearchMove, LocalSearchOperator},
        relocate::RelocateOperator,
        swap::SwapOperator,
        two_opt::TwoOptOperator,
    },
    solution::working_solution::WorkingSolution,
};

/// Moves must beat the current augmented cost by more than this.
const IMPROVEMENT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
enum Neighborhood {
    Relocate,
    OrOpt,
    Swap,
    TwoOpt,
    InsertUnassigned,
    ExchangeUnassigned,
}

const NEIGHBORHOODS: [Neighborhood; 6] = [
    Neighborhood::InsertUnassigned,
    Neighborhood::ExchangeUnassigned,
    Neighborhood::Relocate,
    Neighborhood::Swap,
    Neighborhood::OrOpt,
    Neighborhood::TwoOpt,
];

struct BestMove {
    local_search_move: LocalSearchMove,
    evaluated: EvaluatedMove,
}

pub struct LocalSearch {
    neighborhoods: Vec<Neighborhood>,
    rng: SmallRng,
}

impl LocalSearch {
    pub fn new(seed: u64) -> Self {
        LocalSearch {
            neighborhoods: NEIGHBORHOODS.to_vec(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Applies improving moves under the augmented cost until none is left or
    /// `should_stop` fires. Neighborhoods are visited in a shuffled order and
    /// the best move of the first improving one is applied.
    ///
    /// Returns the number of applied moves.
    #[instrument(skip_all, level = "debug")]
    pub fn descend<S>(
        &mut self,
        solution: &mut WorkingSolution,
        gls: &GuidedLocalSearch,
        should_stop: S,
    ) -> usize
    where
        S: Fn() -> bool,
    {
        let mut applied = 0;

        while !should_stop() {
            let Some(best) = self.find_improving_move(solution, gls) else {
                break;
            };

            trace!(
                operator = best.local_search_move.operator_name(),
                routes = ?best.local_search_move.updated_routes(),
                delta = best.evaluated.delta(),
                "Applying move"
            );

            best.evaluated.apply(solution);
            applied += 1;
        }

        applied
    }

    fn find_improving_move(
        &mut self,
        solution: &WorkingSolution,
        gls: &GuidedLocalSearch,
    ) -> Option<BestMove> {
        self.neighborhoods.shuffle(&mut self.rng);

        for &neighborhood in &self.neighborhoods {
            let best = match neighborhood {
                Neighborhood::Relocate => {
                    best_move::<RelocateOperator, _>(solution, gls, LocalSearchMove::Relocate)
                }
                Neighborhood::OrOpt => {
                    best_move::<OrOptOperator, _>(solution, gls, LocalSearchMove::OrOpt)
                }
                Neighborhood::Swap => {
                    best_move::<SwapOperator, _>(solution, gls, LocalSearchMove::Swap)
                }
                Neighborhood::TwoOpt => {
                    best_move::<TwoOptOperator, _>(solution, gls, LocalSearchMove::TwoOpt)
                }
                Neighborhood::InsertUnassigned => best_move::<InsertUnassignedOperator, _>(
                    solution,
                    gls,
                    LocalSearchMove::InsertUnassigned,
                ),
                Neighborhood::ExchangeUnassigned => best_move::<ExchangeUnassignedOperator, _>(
                    solution,
                    gls,
                    LocalSearchMove::ExchangeUnassigned,
                ),
            };

            if best.is_some() {
                return best;
            }
        }

        None
    }
}

fn best_move<O, W>(solution: &WorkingSolution, gls: &GuidedLocalSearch, wrap: W) -> Option<BestMove>
where
    O: LocalSearchOperator,
    W: Fn(O) -> LocalSearchMove,
{
    let mut best: Option<BestMove> = None;

    O::generate_moves(solution, |op| {
        let threshold = best
            .as_ref()
            .map_or(-IMPROVEMENT_EPSILON, |best| best.evaluated.delta());

        if let Some(evaluated) = op.evaluate(solution, gls, threshold) {
            best = Some(BestMove {
                local_search_move: wrap(op),
                evaluated,
            });
        }
    });

    best
}

#[cfg(test)]
mod tests {
    use crate::{problem::node::NodeIdx, test_utils};

    use super::*;

    #[test]
    fn test_descend_reaches_the_line_order() {
        let matrix: Vec<Vec<i64>> = (0..5_i64)
            .map(|i| (0..5_i64).map(|j| (i - j).abs() * 100).collect())
            .collect();
        let mut solution =
            test_utils::solution_from_matrix(matrix, 1, 10, vec![vec![3, 1, 4, 2]]);
        let gls = GuidedLocalSearch::new(0.1);

        let applied = LocalSearch::new(7).descend(&mut solution, &gls, || false);

        assert!(applied > 0);
        // depot -> 1 -> 2 -> 3 -> 4 -> depot, or the same tour reversed
        assert_eq!(solution.transport_cost(), 800 + 4 * 120);
    }

    #[test]
    fn test_descend_inserts_dropped_deliveries() {
        let mut solution = test_utils::solution_with_routes(4, 1, 10, vec![vec![1]]);
        let gls = GuidedLocalSearch::new(0.1);

        LocalSearch::new(0).descend(&mut solution, &gls, || false);

        assert!(!solution.has_unassigned());
        assert_eq!(
            solution.assigned_vehicle(NodeIdx::new(3)),
            Some(crate::problem::vehicle::VehicleIdx::new(0))
        );
    }

    #[test]
    fn test_stop_signal_prevents_any_move() {
        let mut solution = test_utils::solution_with_routes(4, 1, 10, vec![vec![1]]);
        let gls = GuidedLocalSearch::new(0.1);

        assert_eq!(LocalSearch::new(0).descend(&mut solution, &gls, || true), 0);
        assert!(solution.has_unassigned());
    }
}
