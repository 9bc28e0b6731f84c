pub mod client;
pub mod covers;
pub mod database;
pub mod repositories;
