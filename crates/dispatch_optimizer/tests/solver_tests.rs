use dispatch_optimizer::{
    problem::{routing_model::ModelError, time_window::TimeWindow},
    solver::{
        cancel_signal::NeverCancelled,
        solve_outcome::SolveOutcome,
        solver::{SolveInput, Solver},
        solver_params::{SolverParams, Termination},
    },
};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::test_utils::{
    SHIFT_LENGTH, assert_outcome_is_feasible, fast_params, node_indices, served_nodes,
    uniform_input, uniform_matrix,
};

mod test_utils;

fn solve(input: &SolveInput) -> SolveOutcome {
    let outcome = Solver::new(fast_params())
        .solve(input.clone(), &NeverCancelled)
        .unwrap();
    assert_outcome_is_feasible(input, &outcome, 1);
    outcome
}

#[test]
fn test_no_deliveries() {
    let outcome = solve(&uniform_input(600, &[], 1, 5));
    assert_eq!(outcome, SolveOutcome::default());
}

#[test]
fn test_single_delivery() {
    let outcome = solve(&uniform_input(600, &[1], 1, 5));

    assert!(outcome.dropped.is_empty());
    assert_eq!(outcome.routes.len(), 1);
    let route = &outcome.routes[0];
    assert_eq!(route.stops.len(), 1);
    assert_eq!(route.stops[0].arrival, 720);
    assert_eq!(route.start, 0);
    assert_eq!(route.end, 1320);
}

#[test]
fn test_capacity_limits_a_single_trip() {
    let outcome = solve(&uniform_input(600, &[3, 3, 3], 1, 5));

    assert!(outcome.routes.len() <= 1);
    assert_eq!(outcome.num_served(), 1);
    assert_eq!(outcome.dropped.len(), 2);
}

#[test]
fn test_demand_equal_to_capacity_is_served() {
    let outcome = solve(&uniform_input(600, &[5], 1, 5));
    assert_eq!(served_nodes(&outcome), vec![1]);

    let outcome = solve(&uniform_input(600, &[6], 1, 5));
    assert_eq!(outcome.dropped, node_indices(&[1]));
}

#[test]
fn test_urgent_request_wins_the_last_slot() {
    let mut input = uniform_input(600, &[3, 3], 1, 3);
    input.priorities = Some(vec![2, 2, 1]);

    let outcome = solve(&input);

    assert_eq!(served_nodes(&outcome), vec![2]);
    assert_eq!(outcome.dropped, node_indices(&[1]));
}

#[test]
fn test_waiting_for_a_late_window() {
    let mut input = uniform_input(600, &[1, 1], 1, 5);
    input.time_windows[1] = TimeWindow::new(0, 1800);
    input.time_windows[2] = TimeWindow::new(7200, 10_800);

    let outcome = solve(&input);

    assert!(outcome.dropped.is_empty());
    let route = &outcome.routes[0];
    let arrivals: Vec<(usize, i64)> = route
        .stops
        .iter()
        .map(|stop| (stop.node.get(), stop.arrival))
        .collect();
    assert_eq!(arrivals, vec![(1, 720), (2, 7200)]);
}

#[test]
fn test_unreachable_window_is_dropped() {
    let mut input = uniform_input(7200, &[1], 1, 5);
    input.time_windows[1] = TimeWindow::new(0, 1800);

    let outcome = solve(&input);

    assert!(outcome.routes.is_empty());
    assert_eq!(outcome.dropped, node_indices(&[1]));
}

#[test]
fn test_unit_demands_spread_over_drivers() {
    let outcome = solve(&uniform_input(300, &[1, 1, 1, 1, 1], 2, 3));

    assert!(outcome.dropped.is_empty());
    assert_eq!(served_nodes(&outcome), vec![1, 2, 3, 4, 5]);
    assert_eq!(outcome.routes.len(), 2);
}

#[test]
fn test_per_driver_capacities() {
    let mut input = uniform_input(600, &[4], 2, 5);
    input.vehicle_capacities = Some(vec![2, 5]);

    let outcome = solve(&input);

    assert_eq!(outcome.routes.len(), 1);
    assert_eq!(outcome.routes[0].vehicle_id.get(), 1);
}

#[test]
fn test_zero_capacity_serves_nothing() {
    let mut input = uniform_input(600, &[1], 1, 5);
    input.vehicle_capacities = Some(vec![0]);

    let outcome = solve(&input);

    assert!(outcome.routes.is_empty());
    assert_eq!(outcome.dropped, node_indices(&[1]));
}

#[test]
fn test_shift_too_short_for_the_round_trip() {
    let mut input = uniform_input(1000, &[1], 1, 5);
    input.time_windows = vec![TimeWindow::shift(2000); 2];

    let outcome = solve(&input);

    assert_eq!(outcome.dropped, node_indices(&[1]));
}

#[test]
fn test_cancelled_before_start() {
    let input = uniform_input(600, &[1, 1, 1], 2, 5);

    let outcome = Solver::new(fast_params()).solve(input, &|| true).unwrap();

    assert!(outcome.routes.is_empty());
    assert_eq!(outcome.dropped, node_indices(&[1, 2, 3]));
}

#[test]
fn test_configuration_errors() {
    let solver = Solver::new(fast_params());

    let mut input = uniform_input(600, &[1, 1], 2, 5);
    input.vehicle_capacities = Some(vec![5]);
    assert!(matches!(
        solver.solve(input, &NeverCancelled),
        Err(ModelError::CapacitiesLength {
            expected: 2,
            actual: 1
        })
    ));

    let mut input = uniform_input(600, &[1, 1], 1, 5);
    input.demands.pop();
    assert!(matches!(
        solver.solve(input, &NeverCancelled),
        Err(ModelError::DemandsLength { .. })
    ));
}

#[test]
fn test_several_trips_per_driver() {
    let params = SolverParams {
        max_trips_per_driver: 2,
        ..fast_params()
    };
    let input = uniform_input(600, &[3, 3], 1, 3);

    let outcome = Solver::new(params)
        .solve(input.clone(), &NeverCancelled)
        .unwrap();

    assert_outcome_is_feasible(&input, &outcome, 2);
    assert!(outcome.dropped.is_empty());
    assert_eq!(outcome.routes.len(), 2);
}

#[test]
fn test_mixed_instance_is_feasible() {
    let num_nodes = 13;
    let mut duration_matrix = uniform_matrix(num_nodes, 0);
    for (i, row) in duration_matrix.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (i as i64 - j as i64).abs() * 240 + if i == j { 0 } else { 60 };
        }
    }

    let mut demands = vec![1; num_nodes];
    demands[0] = 0;
    demands[4] = 3;
    demands[9] = 2;

    let mut time_windows = vec![TimeWindow::shift(36_000); num_nodes];
    time_windows[3] = TimeWindow::new(3600, 5400);
    time_windows[7] = TimeWindow::new(0, 2400);
    time_windows[11] = TimeWindow::new(14_400, 18_000);

    let input = SolveInput {
        duration_matrix,
        demands,
        time_windows,
        num_drivers: 4,
        vehicle_capacity: 6,
        vehicle_capacities: None,
        priorities: Some(vec![2, 2, 1, 2, 2, 1, 2, 2, 2, 2, 1, 2, 2]),
    };

    let params = SolverParams {
        terminations: vec![Termination::Iterations(200)],
        ..fast_params()
    };
    let outcome = Solver::new(params)
        .solve(input.clone(), &NeverCancelled)
        .unwrap();

    assert_outcome_is_feasible(&input, &outcome, 1);
    // 15 units over 24 of capacity, every window reachable from the depot
    assert!(outcome.dropped.is_empty());
}

fn random_input(rng: &mut SmallRng) -> SolveInput {
    let num_nodes = rng.random_range(2..14);
    let points: Vec<(i64, i64)> = (0..num_nodes)
        .map(|_| (rng.random_range(0..40), rng.random_range(0..40)))
        .collect();
    let duration_matrix = points
        .iter()
        .map(|&(x1, y1)| {
            points
                .iter()
                .map(|&(x2, y2)| ((x1 - x2).abs() + (y1 - y2).abs()) * 60)
                .collect()
        })
        .collect();

    let mut demands: Vec<i64> = (0..num_nodes).map(|_| rng.random_range(1..5)).collect();
    demands[0] = 0;

    let mut time_windows = vec![TimeWindow::shift(SHIFT_LENGTH); num_nodes];
    for window in time_windows.iter_mut().skip(1) {
        if rng.random_bool(0.4) {
            let start = rng.random_range(0..SHIFT_LENGTH / 2);
            *window = TimeWindow::new(start, start + rng.random_range(600..7200));
        }
    }

    let num_drivers = rng.random_range(1..5);
    let vehicle_capacities = rng
        .random_bool(0.5)
        .then(|| (0..num_drivers).map(|_| rng.random_range(0..9)).collect());
    let priorities = rng
        .random_bool(0.5)
        .then(|| (0..num_nodes).map(|_| rng.random_range(1..4)).collect());

    SolveInput {
        duration_matrix,
        demands,
        time_windows,
        num_drivers,
        vehicle_capacity: rng.random_range(1..9),
        vehicle_capacities,
        priorities,
    }
}

#[test]
fn test_random_instances_are_feasible() {
    for seed in 0..40 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let input = random_input(&mut rng);
        let max_trips_per_driver = rng.random_range(1..3);

        let params = SolverParams {
            terminations: vec![Termination::Iterations(100)],
            max_trips_per_driver,
            seed,
            ..fast_params()
        };
        let outcome = Solver::new(params)
            .solve(input.clone(), &NeverCancelled)
            .unwrap();

        assert_outcome_is_feasible(&input, &outcome, max_trips_per_driver);
    }
}
