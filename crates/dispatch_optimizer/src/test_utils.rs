use std::sync::Arc;

use jiff::SignedDuration;

use crate::{
    problem::{
        node::NodeIdx,
        routing_model::{RoutingModel, RoutingModelBuilder},
        time_window::TimeWindow,
        vehicle::VehicleIdx,
    },
    solver::{
        guided_local_search::GuidedLocalSearch,
        ls::r#move::LocalSearchOperator,
        solution::{route::RouteSchedule, working_solution::WorkingSolution},
        solver::SolveInput,
        solver_params::{SolverParams, Termination, Threads},
    },
};

pub const SHIFT_LENGTH: i64 = 36_000;

pub fn node_indices(indices: &[usize]) -> Vec<NodeIdx> {
    indices.iter().copied().map(NodeIdx::new).collect()
}

pub fn open_windows(num_nodes: usize) -> Vec<TimeWindow> {
    vec![TimeWindow::shift(SHIFT_LENGTH); num_nodes]
}

pub fn model(
    duration_matrix: Vec<Vec<i64>>,
    demands: Vec<i64>,
    time_windows: Vec<TimeWindow>,
    vehicle_capacities: Vec<i64>,
) -> RoutingModel {
    let mut builder = RoutingModelBuilder::default();
    builder
        .set_duration_matrix(duration_matrix)
        .set_demands(demands)
        .set_time_windows(time_windows)
        .set_num_drivers(vehicle_capacities.len())
        .set_vehicle_capacities(Some(vehicle_capacities));
    builder.build().unwrap()
}

/// Every arc takes `duration`, every delivery weighs 1. `delivery_windows`
/// covers the first deliveries, the others are open all shift.
pub fn uniform_model(
    num_nodes: usize,
    duration: i64,
    delivery_windows: Vec<TimeWindow>,
    num_drivers: usize,
    capacity: i64,
) -> RoutingModel {
    let mut time_windows = open_windows(num_nodes);
    for (index, window) in delivery_windows.into_iter().enumerate() {
        time_windows[index + 1] = window;
    }

    let mut demands = vec![1; num_nodes];
    demands[0] = 0;

    model(
        vec![vec![duration; num_nodes]; num_nodes],
        demands,
        time_windows,
        vec![capacity; num_drivers],
    )
}

pub fn model_with_demands(demands: Vec<i64>, capacity: i64) -> RoutingModel {
    let num_nodes = demands.len();
    model(
        vec![vec![600; num_nodes]; num_nodes],
        demands,
        open_windows(num_nodes),
        vec![capacity],
    )
}

pub fn model_with_priorities(demands: Vec<i64>, capacity: i64, priorities: Vec<i64>) -> RoutingModel {
    let num_nodes = demands.len();
    let mut builder = RoutingModelBuilder::default();
    builder
        .set_duration_matrix(vec![vec![600; num_nodes]; num_nodes])
        .set_demands(demands)
        .set_time_windows(open_windows(num_nodes))
        .set_vehicle_capacity(capacity)
        .set_priorities(Some(priorities));
    builder.build().unwrap()
}

/// `routes[i]` becomes the trip of vehicle `i`.
pub fn solution_from_model(model: RoutingModel, routes: Vec<Vec<usize>>) -> WorkingSolution {
    let mut solution = WorkingSolution::new(Arc::new(model));

    for (index, route) in routes.into_iter().enumerate() {
        let vehicle_id = VehicleIdx::new(index);
        let nodes = node_indices(&route);
        let schedule = RouteSchedule::compute(solution.model(), vehicle_id, &nodes)
            .expect("test route must be feasible");
        solution.replace_route(vehicle_id, nodes, schedule);
    }

    solution
}

pub fn solution_with_routes(
    num_nodes: usize,
    num_drivers: usize,
    capacity: i64,
    routes: Vec<Vec<usize>>,
) -> WorkingSolution {
    solution_from_model(
        uniform_model(num_nodes, 600, vec![], num_drivers, capacity),
        routes,
    )
}

pub fn solution_from_matrix(
    duration_matrix: Vec<Vec<i64>>,
    num_drivers: usize,
    capacity: i64,
    routes: Vec<Vec<usize>>,
) -> WorkingSolution {
    let num_nodes = duration_matrix.len();
    let mut demands = vec![1; num_nodes];
    demands[0] = 0;

    solution_from_model(
        model(
            duration_matrix,
            demands,
            open_windows(num_nodes),
            vec![capacity; num_drivers],
        ),
        routes,
    )
}

pub fn uniform_input(
    num_nodes: usize,
    duration: i64,
    num_drivers: usize,
    capacity: i64,
) -> SolveInput {
    let mut demands = vec![1; num_nodes];
    demands[0] = 0;

    SolveInput {
        duration_matrix: vec![vec![duration; num_nodes]; num_nodes],
        demands,
        time_windows: open_windows(num_nodes),
        num_drivers,
        vehicle_capacity: capacity,
        vehicle_capacities: None,
        priorities: None,
    }
}

/// Small budgets so solver tests finish quickly.
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

/// Applies `operator` whatever its delta.
pub fn apply_move<O: LocalSearchOperator>(solution: &mut WorkingSolution, operator: &O) {
    operator
        .evaluate(solution, &GuidedLocalSearch::new(0.1), f64::INFINITY)
        .expect("test move must be feasible")
        .apply(solution);
}

/// Every delivery is on exactly one trip, the one its assignment names, or
/// on none and reported dropped.
pub fn assert_assignments_consistent(solution: &WorkingSolution) {
    let num_nodes = solution.model().num_nodes();
    let mut visits = vec![0; num_nodes];

    for route in solution.routes() {
        for &node in route.nodes() {
            visits[node.get()] += 1;
            assert_eq!(solution.assigned_vehicle(node), Some(route.vehicle_id()));
        }
    }

    let unassigned: Vec<NodeIdx> = solution.unassigned_iter().collect();
    for node in (1..num_nodes).map(NodeIdx::new) {
        let served = visits[node.get()];
        assert!(served <= 1, "{node:?} is on {served} trips");
        assert_eq!(served == 0, unassigned.contains(&node), "{node:?}");
    }
}
