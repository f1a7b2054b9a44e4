//! HTTP server for CloudPoof Omega.
//!
//! Exposes sessions, unique insights, predictions and mode switching as a
//! JSON API. State is injected through [`AppState`]; there is no global
//! instance.

pub mod routes;

pub use routes::{app_router, AppState};
