pub mod assembler;
pub mod jobs;
pub mod json;
pub mod planner;
pub mod problem;
pub mod solver;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
