pub mod exchange_unassigned;
pub mod insert_unassigned;
pub mod local_search;
pub mod r#move;
pub mod or_opt;
pub mod relocate;
pub mod swap;
pub mod two_opt;
