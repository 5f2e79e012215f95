use jiff::{SignedDuration, Timestamp};

use crate::problem::routing_model::{MAX_TRIPS_PER_DRIVER, SERVICE_DURATION_SECS};

#[derive(Clone, Debug)]
pub struct SolverParams {
    pub terminations: Vec<Termination>,

    /// Virtual vehicles created per driver
    pub max_trips_per_driver: usize,
    pub service_duration: i64,

    /// Scales the arc penalties against the cost of the first local optimum
    pub guided_local_search_lambda_coefficient: f64,

    pub insertion_threads: Threads,

    /// Seeds the neighborhood ordering of the local search
    pub seed: u64,
}

#[derive(Clone, Debug)]
pub enum Termination {
    Duration(SignedDuration),
    Iterations(usize),
    IterationsWithoutImprovement(usize),
}

#[derive(Clone, Debug)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => *num,
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            terminations: vec![
                Termination::Duration(SignedDuration::from_secs(5)),
                Termination::IterationsWithoutImprovement(5000),
            ],
            max_trips_per_driver: MAX_TRIPS_PER_DRIVER,
            service_duration: SERVICE_DURATION_SECS,
            guided_local_search_lambda_coefficient: 0.1,
            insertion_threads: Threads::Multi(4),
            seed: 0,
        }
    }
}

impl SolverParams {
    /// Replaces the duration termination, keeping the other criteria.
    pub fn with_time_limit(mut self, time_limit: SignedDuration) -> Self {
        self.terminations
            .retain(|termination| !matches!(termination, Termination::Duration(_)));
        self.terminations.push(Termination::Duration(time_limit));
        self
    }

    pub fn time_limit(&self) -> Option<SignedDuration> {
        self.terminations
            .iter()
            .find_map(|termination| match termination {
                Termination::Duration(duration) => Some(*duration),
                _ => None,
            })
    }

    pub fn should_terminate(
        &self,
        started_at: Timestamp,
        iterations: usize,
        iterations_without_improvement: usize,
    ) -> bool {
        self.terminations
            .iter()
            .any(|termination| match termination {
                Termination::Duration(duration) => {
                    Timestamp::now().duration_since(started_at) >= *duration
                }
                Termination::Iterations(max) => iterations >= *max,
                Termination::IterationsWithoutImprovement(max) => {
                    iterations_without_improvement >= *max
                }
            })
    }
}
