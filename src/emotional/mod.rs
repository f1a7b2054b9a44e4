//! Emotional context tracking and consciousness mode recommendation.
//!
//! [`EmotionalState`] is updated once per incoming user message and
//! [`ModeRecommender`] maps it onto a [`ConsciousnessLevel`](crate::ConsciousnessLevel).
//! The two halves do not depend on the uniqueness guard.

pub mod recommender;
pub mod state;

pub use recommender::{ModeRecommender, RecommendationRule};
pub use state::EmotionalState;
