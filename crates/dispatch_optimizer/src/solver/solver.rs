use std::sync::Arc;

use jiff::Timestamp;
use tracing::{debug, info, instrument, warn};

use crate::problem::{
    routing_model::{ModelError, RoutingModel, RoutingModelBuilder},
    time_window::TimeWindow,
};

use super::{
    cancel_signal::CancelSignal, construction::cheapest_insertion::CheapestInsertion,
    guided_local_search::GuidedLocalSearch, ls::local_search::LocalSearch,
    solution::working_solution::WorkingSolution, solve_outcome::SolveOutcome,
    solver_params::SolverParams,
};

/// Raw routing problem: node 0 is the depot and every per-node vector is
/// indexed like the duration matrix.
#[derive(Debug, Clone, Default)]
pub struct SolveInput {
    pub duration_matrix: Vec<Vec<i64>>,
    pub demands: Vec<i64>,
    /// `time_windows[0].end()` is the shift length
    pub time_windows: Vec<TimeWindow>,
    pub num_drivers: usize,
    pub vehicle_capacity: i64,
    /// One capacity per driver, overrides `vehicle_capacity`
    pub vehicle_capacities: Option<Vec<i64>>,
    pub priorities: Option<Vec<i64>>,
}

pub struct Solver {
    params: SolverParams,
}

impl Solver {
    pub fn new(params: SolverParams) -> Self {
        Solver { params }
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Serves as many deliveries as possible at minimum total transit.
    ///
    /// Cancellation is checked before the model is built, during the search
    /// and after it; a cancelled solve reports every delivery dropped.
    #[instrument(skip_all, level = "debug")]
    pub fn solve(
        &self,
        input: SolveInput,
        cancel: &dyn CancelSignal,
    ) -> Result<SolveOutcome, ModelError> {
        let num_nodes = input.duration_matrix.len();
        if num_nodes <= 1 {
            return Ok(SolveOutcome::default());
        }

        if cancel.is_cancelled() {
            info!("Solve cancelled before start, dropping {} deliveries", num_nodes - 1);
            return Ok(SolveOutcome::all_dropped(num_nodes));
        }

        let model = Arc::new(self.build_model(input)?);
        let solution = self.search(model, cancel);

        if cancel.is_cancelled() {
            info!("Solve cancelled, discarding solution");
            return Ok(SolveOutcome::all_dropped(num_nodes));
        }

        let outcome = SolveOutcome::from_solution(&solution);
        info!(
            "Served {} of {} deliveries on {} trips, transit {}s",
            outcome.num_served(),
            num_nodes - 1,
            outcome.routes.len(),
            solution.transport_cost()
        );

        Ok(outcome)
    }

    fn build_model(&self, input: SolveInput) -> Result<RoutingModel, ModelError> {
        let mut builder = RoutingModelBuilder::default();
        builder
            .set_duration_matrix(input.duration_matrix)
            .set_demands(input.demands)
            .set_time_windows(input.time_windows)
            .set_num_drivers(input.num_drivers)
            .set_vehicle_capacity(input.vehicle_capacity)
            .set_vehicle_capacities(input.vehicle_capacities)
            .set_priorities(input.priorities)
            .set_max_trips_per_driver(self.params.max_trips_per_driver)
            .set_service_duration(self.params.service_duration);

        builder.build()
    }

    fn create_insertion_thread_pool(&self) -> Option<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.params.insertion_threads.number_of_threads())
            .thread_name(|index| format!("insertion-{index}"))
            .build()
            .inspect_err(|err| warn!("Cannot build insertion thread pool: {err}"))
            .ok()
    }

    /// Cheapest insertion followed by guided local search. The best solution
    /// is tracked on the real objective, not the augmented one.
    fn search(&self, model: Arc<RoutingModel>, cancel: &dyn CancelSignal) -> WorkingSolution {
        let started_at = Timestamp::now();

        let pool = self.create_insertion_thread_pool();
        let mut current = CheapestInsertion::construct(model, pool.as_ref());
        drop(pool);

        let mut best = current.clone();
        let mut best_cost = best.total_cost();

        let mut gls = GuidedLocalSearch::new(self.params.guided_local_search_lambda_coefficient);
        let mut local_search = LocalSearch::new(self.params.seed);

        let mut iterations = 0;
        let mut iterations_without_improvement = 0;

        let should_stop = |iterations: usize, iterations_without_improvement: usize| {
            cancel.is_cancelled()
                || self.params.should_terminate(
                    started_at,
                    iterations,
                    iterations_without_improvement,
                )
        };

        while !should_stop(iterations, iterations_without_improvement) {
            local_search.descend(&mut current, &gls, || {
                should_stop(iterations, iterations_without_improvement)
            });

            let cost = current.total_cost();
            if cost < best_cost {
                debug!(iteration = iterations, "New best cost {cost}");
                best = current.clone();
                best_cost = cost;
                iterations_without_improvement = 0;
            } else {
                iterations_without_improvement += 1;
            }

            gls.calibrate(&current);
            if !gls.penalize(&current) {
                break;
            }

            iterations += 1;
        }

        debug!(
            iterations,
            lambda = gls.lambda(),
            elapsed = ?Timestamp::now().duration_since(started_at),
            "Guided local search finished with cost {best_cost}"
        );

        best
    }
}
