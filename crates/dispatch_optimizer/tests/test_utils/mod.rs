#![allow(dead_code)]

use dispatch_matrix::{
    travel_duration_client::TravelDurationSource, travel_durations::TravelDurations,
};
use dispatch_optimizer::{
    json::types::{Coordinates, DeliveryRequest, SolveRequest, WindowKind},
    problem::{node::NodeIdx, time_window::TimeWindow},
    solver::{
        solve_outcome::SolveOutcome,
        solver::SolveInput,
        solver_params::{SolverParams, Termination, Threads},
    },
};
use jiff::SignedDuration;

pub const SHIFT_LENGTH: i64 = 36_000;
pub const SERVICE_DURATION: i64 = 120;

pub fn fast_params() -> SolverParams {
    SolverParams {
        terminations: vec![
            Termination::Duration(SignedDuration::from_secs(2)),
            Termination::IterationsWithoutImprovement(50),
        ],
        insertion_threads: Threads::Single,
        ..SolverParams::default()
    }
}

/// Depot plus `demands.len()` deliveries, every arc `duration` seconds apart,
/// one vehicle of `capacity` per driver.
pub fn uniform_input(
    duration: i64,
    demands: &[i64],
    num_drivers: usize,
    capacity: i64,
) -> SolveInput {
    let num_nodes = demands.len() + 1;

    SolveInput {
        duration_matrix: uniform_matrix(num_nodes, duration),
        demands: std::iter::once(0).chain(demands.iter().copied()).collect(),
        time_windows: vec![TimeWindow::shift(SHIFT_LENGTH); num_nodes],
        num_drivers,
        vehicle_capacity: capacity,
        vehicle_capacities: None,
        priorities: None,
    }
}

pub fn uniform_matrix(num_nodes: usize, duration: i64) -> Vec<Vec<i64>> {
    (0..num_nodes)
        .map(|i| {
            (0..num_nodes)
                .map(|j| if i == j { 0 } else { duration })
                .collect()
        })
        .collect()
}

fn capacity_of(input: &SolveInput, vehicle: usize, max_trips_per_driver: usize) -> i64 {
    let driver = vehicle / max_trips_per_driver;
    input
        .vehicle_capacities
        .as_ref()
        .map_or(input.vehicle_capacity, |capacities| capacities[driver])
}

/// Checks what every outcome must satisfy whatever the search found: each
/// delivery is either served once or dropped, loads fit, arrivals are inside
/// their windows and the chain of transits is respected.
pub fn assert_outcome_is_feasible(input: &SolveInput, outcome: &SolveOutcome, max_trips: usize) {
    let num_nodes = input.duration_matrix.len();
    let mut seen = vec![0; num_nodes];

    for route in &outcome.routes {
        let mut load = 0;
        let mut time = route.start;
        let mut previous = 0;

        for stop in &route.stops {
            let node = stop.node.get();
            seen[node] += 1;
            load += input.demands[node];

            let window = input.time_windows[node];
            assert!(
                window.start() <= stop.arrival && stop.arrival <= window.end(),
                "node {node} served at {} outside [{}, {}]",
                stop.arrival,
                window.start(),
                window.end()
            );

            let transit = input.duration_matrix[previous][node] + SERVICE_DURATION;
            assert!(time + transit <= stop.arrival);

            time = stop.arrival;
            previous = node;
        }

        assert!(time + input.duration_matrix[previous][0] <= route.end);
        assert!(route.end <= input.time_windows[0].end());
        assert!(load <= capacity_of(input, route.vehicle_id.get(), max_trips));
    }

    for node in &outcome.dropped {
        seen[node.get()] += 1;
    }

    assert_eq!(seen[0], 0, "depot must never be a stop");
    for (node, count) in seen.iter().enumerate().skip(1) {
        assert_eq!(*count, 1, "node {node} must be served or dropped exactly once");
    }
}

pub fn served_nodes(outcome: &SolveOutcome) -> Vec<usize> {
    let mut nodes: Vec<usize> = outcome
        .routes
        .iter()
        .flat_map(|route| route.stops.iter().map(|stop| stop.node.get()))
        .collect();
    nodes.sort_unstable();
    nodes
}

pub fn node_indices(indices: &[usize]) -> Vec<NodeIdx> {
    indices.iter().copied().map(NodeIdx::new).collect()
}

/// Every pair of distinct points is `seconds` apart.
pub struct UniformDurations {
    pub seconds: i64,
}

impl TravelDurationSource for UniformDurations {
    fn travel_durations(&self, points: &[geo_types::Point]) -> TravelDurations {
        TravelDurations::from_rows(uniform_matrix(points.len(), self.seconds))
    }
}

pub fn delivery(request_id: i64, demand: i64) -> DeliveryRequest {
    DeliveryRequest {
        request_id,
        lat: -16.72 - request_id as f64 / 1000.0,
        lon: -43.86,
        demand,
        window_kind: WindowKind::Asap,
        window_start: None,
        window_end: None,
        priority: None,
    }
}

pub fn solve_request(job_id: Option<&str>, requests: Vec<DeliveryRequest>) -> SolveRequest {
    SolveRequest {
        job_id: job_id.map(String::from),
        plan_version: None,
        depot: Coordinates {
            lat: -16.734440968489228,
            lon: -43.877211192130325,
        },
        shift_start: String::from("08:00"),
        shift_end: String::from("18:00"),
        drivers: vec![1, 2],
        vehicle_capacity: 5,
        vehicle_capacities: None,
        requests,
    }
}
