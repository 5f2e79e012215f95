use dispatch_matrix::travel_duration_client::TravelDurationSource;
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    assembler::RouteAssembler,
    json::types::{SolveRequest, SolveResponse},
    problem::{node::DEFAULT_PRIORITY, routing_model::ModelError, time_window::TimeWindow},
    solver::{
        cancel_signal::CancelSignal,
        solver::{SolveInput, Solver},
        solver_params::SolverParams,
    },
    utils::time::{TimeCodecError, to_seconds},
};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid configuration: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Time(#[from] TimeCodecError),

    #[error("request {request_id} has demand {demand}, expected at least 1")]
    InvalidDemand { request_id: i64, demand: i64 },

    #[error("shift ends at {shift_end}, before it starts at {shift_start}")]
    InvalidShift {
        shift_start: String,
        shift_end: String,
    },
}

/// Runs a request end to end: coordinates to travel durations, routing model,
/// solve, then trips in request terms.
pub struct RoutePlanner<S> {
    source: S,
    solver: Solver,
}

impl<S> RoutePlanner<S>
where
    S: TravelDurationSource,
{
    pub fn new(source: S, params: SolverParams) -> Self {
        RoutePlanner {
            source,
            solver: Solver::new(params),
        }
    }

    pub fn params(&self) -> &SolverParams {
        self.solver.params()
    }

    #[instrument(skip_all, level = "debug", fields(job_id = request.job_id.as_deref()))]
    pub fn plan(
        &self,
        request: &SolveRequest,
        cancel: &dyn CancelSignal,
    ) -> Result<SolveResponse, PlanError> {
        if request.requests.is_empty() {
            return Ok(SolveResponse::default());
        }

        let input = self.build_input(request)?;
        info!(
            "Planning {} deliveries for {} drivers",
            request.requests.len(),
            request.drivers.len()
        );

        let outcome = self.solver.solve(input, cancel)?;

        Ok(RouteAssembler::new(request, self.params().max_trips_per_driver).assemble(&outcome)?)
    }

    fn build_input(&self, request: &SolveRequest) -> Result<SolveInput, PlanError> {
        let base = request.shift_start.as_str();
        let shift_length = to_seconds(&request.shift_end, base)?;
        if shift_length < 0 {
            return Err(PlanError::InvalidShift {
                shift_start: request.shift_start.clone(),
                shift_end: request.shift_end.clone(),
            });
        }

        let num_nodes = request.requests.len() + 1;
        let mut points = Vec::with_capacity(num_nodes);
        let mut demands = Vec::with_capacity(num_nodes);
        let mut time_windows = Vec::with_capacity(num_nodes);
        let mut priorities = Vec::with_capacity(num_nodes);

        points.push(request.depot.to_point());
        demands.push(0);
        time_windows.push(TimeWindow::shift(shift_length));
        priorities.push(DEFAULT_PRIORITY);

        for delivery in &request.requests {
            if delivery.demand < 1 {
                return Err(PlanError::InvalidDemand {
                    request_id: delivery.request_id,
                    demand: delivery.demand,
                });
            }

            let time_window = match delivery.hard_window() {
                Some((start, end)) => {
                    TimeWindow::new(to_seconds(start, base)?, to_seconds(end, base)?)
                        .clamp_to_shift(shift_length)
                }
                None => TimeWindow::shift(shift_length),
            };

            points.push(delivery.coordinates().to_point());
            demands.push(delivery.demand);
            time_windows.push(time_window);
            priorities.push(delivery.priority.unwrap_or(DEFAULT_PRIORITY));
        }

        let durations = self.source.travel_durations(&points);

        Ok(SolveInput {
            duration_matrix: durations.to_rows(),
            demands,
            time_windows,
            num_drivers: request.drivers.len(),
            vehicle_capacity: request.vehicle_capacity,
            vehicle_capacities: request.vehicle_capacities.clone(),
            priorities: Some(priorities),
        })
    }
}
