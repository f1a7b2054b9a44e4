//! Mode recommendation: an ordered rule table over [`EmotionalState`].
//!
//! Rules are evaluated top to bottom and the first matching predicate
//! wins. When nothing matches the default label is returned. Only four
//! of the six [`ConsciousnessLevel`]s are reachable; `Quantum` and
//! `Synthesis` have no rule.

use super::state::EmotionalState;
use crate::consciousness::ConsciousnessLevel;

/// A single (predicate, label) row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationRule {
    /// Short name used in logs and diagnostics.
    pub name: &'static str,
    pub predicate: fn(&EmotionalState) -> bool,
    pub label: ConsciousnessLevel,
}

impl RecommendationRule {
    /// Whether this rule fires for `state`.
    pub fn matches(&self, state: &EmotionalState) -> bool {
        (self.predicate)(state)
    }
}

/// The rule table, in evaluation order.
pub static RULES: [RecommendationRule; 3] = [
    RecommendationRule {
        name: "high-stress",
        predicate: |s| s.stress > 0.7,
        label: ConsciousnessLevel::Precognitive,
    },
    RecommendationRule {
        name: "high-frustration",
        predicate: |s| s.frustration > 0.6,
        label: ConsciousnessLevel::Harmonic,
    },
    RecommendationRule {
        name: "high-curiosity",
        predicate: |s| s.curiosity > 0.7,
        label: ConsciousnessLevel::Transcendent,
    },
];

/// Label returned when no rule matches.
pub const DEFAULT_LABEL: ConsciousnessLevel = ConsciousnessLevel::Omega;

/// Stateless recommender mapping an emotional state to a consciousness level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeRecommender;

impl ModeRecommender {
    /// Recommend a level for `state`. Pure and total; out-of-range values
    /// are compared against the same thresholds without clamping.
    pub fn recommend(state: &EmotionalState) -> ConsciousnessLevel {
        Self::matching_rule(state)
            .map(|rule| rule.label)
            .unwrap_or(DEFAULT_LABEL)
    }

    /// The first rule that fires for `state`, if any.
    pub fn matching_rule(state: &EmotionalState) -> Option<&'static RecommendationRule> {
        RULES.iter().find(|rule| rule.matches(state))
    }
}

// ============================================================================
// Tests
// ============================================================================
