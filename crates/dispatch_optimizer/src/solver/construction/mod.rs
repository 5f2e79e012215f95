pub mod cheapest_insertion;
pub mod insertion;
