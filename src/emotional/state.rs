//! The 5-dimensional emotional state and its text-driven update rule.

use serde::{Deserialize, Serialize};

use super::recommender::ModeRecommender;
use crate::consciousness::ConsciousnessLevel;

/// Substrings that raise `stress` by [`STRESS_STEP`] each.
pub const STRESS_INDICATORS: [&str; 5] = ["help", "stuck", "error", "broken", "urgent"];

/// Substrings that raise `curiosity` by [`CURIOSITY_STEP`] each.
pub const CURIOSITY_INDICATORS: [&str; 5] = ["how", "why", "what", "wonder", "interesting"];

/// Substrings that raise `frustration` by [`FRUSTRATION_STEP`] each.
pub const FRUSTRATION_INDICATORS: [&str; 4] = ["not working", "failed", "again", "still"];

const STRESS_STEP: f64 = 0.1;
const CURIOSITY_STEP: f64 = 0.1;
const FRUSTRATION_STEP: f64 = 0.15;

const STRESS_DECAY: f64 = 0.95;
const FRUSTRATION_DECAY: f64 = 0.93;
const ENGAGEMENT_DECAY: f64 = 0.98;
const ENGAGEMENT_FLOOR: f64 = 0.3;

/// User emotional state, each field conceptually in `[0.0, 1.0]`.
///
/// Only [`update`](Self::update) clamps. Fields are public and direct
/// assignment is taken as-is, so callers that accept external values
/// (e.g. the HTTP layer) own their validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    pub stress: f64,
    pub frustration: f64,
    pub curiosity: f64,
    pub engagement: f64,
    pub clarity: f64,
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self {
            stress: 0.0,
            frustration: 0.0,
            curiosity: 0.5,
            engagement: 0.5,
            clarity: 0.7,
        }
    }
}

impl EmotionalState {
    /// Create a state with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the state from one incoming user message.
    ///
    /// Every indicator found as a substring of the lowercased text bumps
    /// its field (capped at 1.0, hits compound within the call). After all
    /// increments, a single unconditional decay is applied. `clarity` is
    /// never touched.
    pub fn update(&mut self, text: &str) {
        let text = text.to_lowercase();

        for indicator in STRESS_INDICATORS {
            if text.contains(indicator) {
                self.stress = (self.stress + STRESS_STEP).min(1.0);
            }
        }
        for indicator in CURIOSITY_INDICATORS {
            if text.contains(indicator) {
                self.curiosity = (self.curiosity + CURIOSITY_STEP).min(1.0);
            }
        }
        for indicator in FRUSTRATION_INDICATORS {
            if text.contains(indicator) {
                self.frustration = (self.frustration + FRUSTRATION_STEP).min(1.0);
            }
        }

        self.stress *= STRESS_DECAY;
        self.frustration *= FRUSTRATION_DECAY;
        self.engagement = (self.engagement * ENGAGEMENT_DECAY).max(ENGAGEMENT_FLOOR);
    }

    /// Shorthand for [`ModeRecommender::recommend`].
    pub fn recommended_mode(&self) -> ConsciousnessLevel {
        ModeRecommender::recommend(self)
    }

    /// Field names paired with their values, in display order.
    pub fn dimensions(&self) -> [(&'static str, f64); 5] {
        [
            ("stress", self.stress),
            ("frustration", self.frustration),
            ("curiosity", self.curiosity),
            ("engagement", self.engagement),
            ("clarity", self.clarity),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_defaults() {
        let s = EmotionalState::default();
        assert_eq!(s.stress, 0.0);
        assert_eq!(s.frustration, 0.0);
        assert_eq!(s.curiosity, 0.5);
        assert_eq!(s.engagement, 0.5);
        assert_eq!(s.clarity, 0.7);
    }

    #[test]
    fn test_neutral_text_only_decays() {
        let mut s = EmotionalState {
            stress: 1.0,
            ..EmotionalState::default()
        };
        s.update("neutral text with no keywords");
        assert_eq!(s.stress, 0.95);
        assert_eq!(s.curiosity, 0.5);
        assert!((s.engagement - 0.49).abs() < EPS);
    }

    #[test]
    fn test_stress_increments_are_clamped_before_decay() {
        let mut s = EmotionalState {
            stress: 0.95,
            ..EmotionalState::default()
        };
        s.update("help, this is broken and urgent");
        assert!(s.stress <= 1.0);
        assert_eq!(s.stress, 1.0 * STRESS_DECAY);
    }

    #[test]
    fn test_hits_compound_within_one_call() {
        let mut s = EmotionalState::default();
        // "help" + "stuck" + "error"
        s.update("HELP I'm stuck on an error");
        assert!((s.stress - 0.3 * STRESS_DECAY).abs() < EPS);
    }

    #[test]
    fn test_frustration_and_curiosity() {
        let mut s = EmotionalState::default();
        s.update("why is it still not working");
        assert!((s.frustration - 0.30 * FRUSTRATION_DECAY).abs() < EPS);
        assert!((s.curiosity - 0.6).abs() < EPS);
    }

    #[test]
    fn test_engagement_floor() {
        let mut s = EmotionalState {
            engagement: 0.3,
            ..EmotionalState::default()
        };
        for _ in 0..10 {
            s.update("");
        }
        assert_eq!(s.engagement, 0.3);
    }

    #[test]
    fn test_clarity_never_changes() {
        let mut s = EmotionalState {
            clarity: 0.42,
            ..EmotionalState::default()
        };
        s.update("help why failed again, how interesting");
        assert_eq!(s.clarity, 0.42);
    }

    #[test]
    fn test_updates_apply_in_call_order() {
        let mut a = EmotionalState::default();
        a.update("help");
        a.update("nothing");
        let mut b = EmotionalState::default();
        b.update("nothing");
        b.update("help");
        assert!(a.stress < b.stress);
    }
}
