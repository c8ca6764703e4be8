//! Shared infrastructure: structured errors and configuration.

pub mod config;
pub mod errors;
