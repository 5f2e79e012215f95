pub mod node;
pub mod routing_model;
pub mod time_window;
pub mod travel_matrix;
pub mod vehicle;
