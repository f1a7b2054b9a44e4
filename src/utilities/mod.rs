//! Utility modules: configuration, errors and console output.

pub mod config;
pub mod errors;
pub mod printer;
