pub mod season;
pub mod weather;
