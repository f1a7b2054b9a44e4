//! # CloudPoof Omega
//!
//! Unique insight generation and emotional mode recommendation, wrapped in
//! a session layer and exposed through an HTTP API and a CLI.
//!
//! The core is two independent, synchronous components:
//!
//! - [`UniquenessGuard`] issues text insights that never repeat within the
//!   guard's lifetime, using a SHA-256 fingerprint set.
//! - [`ModeRecommender`] maps an [`EmotionalState`] onto a
//!   [`ConsciousnessLevel`] through an ordered rule table.
//!
//! [`OmegaSession`] ties them together per user, alongside the
//! [`ForesightEngine`](foresight::ForesightEngine).

pub mod cli;
pub mod consciousness;
pub mod emotional;
pub mod entropy;
pub mod foresight;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod utilities;

pub use consciousness::ConsciousnessLevel;
pub use emotional::{EmotionalState, ModeRecommender};
pub use entropy::UniquenessGuard;
pub use session::OmegaSession;
pub use utilities::config::OmegaConfig;
pub use utilities::errors::{OmegaError, OmegaResult};

/// Library version.
pub const VERSION: &str = "1.0.0";
