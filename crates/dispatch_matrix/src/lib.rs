pub mod as_the_crow_flies;
pub mod osrm;
pub mod travel_duration_client;
pub mod travel_duration_provider;
pub mod travel_durations;
