//! gcdlab library: application logic for the concurrency lab CLI.

pub mod app;
pub mod config;
pub mod errors;
