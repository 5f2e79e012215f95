pub mod cancel_signal;
pub mod construction;
pub mod guided_local_search;
pub mod ls;
pub mod solution;
pub mod solve_outcome;
pub mod solver;
pub mod solver_params;
