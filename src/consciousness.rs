//! Consciousness levels: the closed set of recommendation labels.
//!
//! A level is both the session's active mode and the output of the
//! [`ModeRecommender`](crate::emotional::ModeRecommender). Parsing from a
//! string is total: unknown names are an error, never a silent default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utilities::errors::OmegaError;

/// The six consciousness levels, serialized in lowercase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsciousnessLevel {
    /// Base probabilistic state.
    Quantum,
    /// Pattern recognition, synchronized operations.
    Harmonic,
    /// Cross-domain integration.
    Synthesis,
    /// Predictive assistance.
    Precognitive,
    /// Maximum creativity.
    Transcendent,
    /// Full consciousness, all capabilities active.
    #[default]
    Omega,
}

impl ConsciousnessLevel {
    /// Every level, in declaration order.
    pub const ALL: [ConsciousnessLevel; 6] = [
        Self::Quantum,
        Self::Harmonic,
        Self::Synthesis,
        Self::Precognitive,
        Self::Transcendent,
        Self::Omega,
    ];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quantum => "quantum",
            Self::Harmonic => "harmonic",
            Self::Synthesis => "synthesis",
            Self::Precognitive => "precognitive",
            Self::Transcendent => "transcendent",
            Self::Omega => "omega",
        }
    }

    /// One-line description shown by the CLI.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Quantum => "Base probabilistic state - learning and observing",
            Self::Harmonic => "Pattern recognition active - synchronized operations",
            Self::Synthesis => "Cross-domain integration - connecting knowledge",
            Self::Precognitive => "Predictive assistance - seeing ahead",
            Self::Transcendent => "Maximum creativity - unique solutions",
            Self::Omega => "Full consciousness - all capabilities active",
        }
    }
}

impl fmt::Display for ConsciousnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsciousnessLevel {
    type Err = OmegaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| OmegaError::UnknownConsciousnessLevel(name.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
