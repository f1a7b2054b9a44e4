//! Omega sessions: the per-user caller of the core components.
//!
//! A session owns one [`EmotionalState`] and one [`ForesightEngine`] and
//! borrows a [`UniquenessGuard`] through an `Arc`, so several sessions can
//! draw from one process-wide fingerprint set. Per message it updates the
//! emotional state, asks the guard for a fresh insight, and asks the
//! recommender for a mode.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::consciousness::ConsciousnessLevel;
use crate::emotional::EmotionalState;
use crate::entropy::{templates, UniquenessGuard};
use crate::foresight::{ForesightEngine, Prediction};
use crate::utilities::config::OmegaConfig;
use crate::utilities::errors::OmegaResult;

/// Number of predictions included in a manifest response.
pub const RESPONSE_PREDICTIONS: usize = 3;

/// `response_type` of every manifestation.
pub const GENERAL_RESPONSE: &str = "general";

// ============================================================================
// Response types
// ============================================================================

/// The general-purpose answer to an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifestation {
    pub response: String,
    pub confidence: f64,
    pub alternatives: Vec<String>,
}

/// Emotional fields surfaced with every manifest response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalSnapshot {
    pub stress: f64,
    pub engagement: f64,
    pub recommended_mode: ConsciousnessLevel,
}

/// An insight handed out by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub text: String,
    /// Set when the guard gave up and `text` is an unrecorded fallback.
    pub fallback: bool,
}

/// Full payload returned for one manifested intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestResponse {
    pub session_id: String,
    pub timeline: String,
    pub consciousness_level: ConsciousnessLevel,
    pub manifestation: Manifestation,
    pub predictions: Vec<Prediction>,
    pub unique_insight: String,
    /// `unique_insight` is a fallback the guard never recorded.
    pub insight_fallback: bool,
    pub response_type: String,
    pub emotional_state: EmotionalSnapshot,
    pub processing_time_ms: f64,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub timeline: String,
    pub level: ConsciousnessLevel,
    pub emotional_state: EmotionalState,
    pub recommended_mode: ConsciousnessLevel,
    /// Insights issued by the (possibly shared) guard.
    pub insights_issued: usize,
}

// ============================================================================
// Session
// ============================================================================

/// One user's consciousness session.
#[derive(Debug)]
pub struct OmegaSession {
    session_id: String,
    timeline: String,
    level: ConsciousnessLevel,
    emotional: EmotionalState,
    guard: Arc<UniquenessGuard>,
    foresight: ForesightEngine,
    /// Fallback insights issued so far.
    fallbacks: u64,
}

impl OmegaSession {
    /// Create a session with its own guard.
    pub fn new(config: &OmegaConfig) -> Self {
        let guard = Arc::new(UniquenessGuard::with_max_attempts(
            config.max_generation_attempts,
        ));
        Self::with_guard(config, guard)
    }

    /// Create a session drawing insights from a shared guard.
    pub fn with_guard(config: &OmegaConfig, guard: Arc<UniquenessGuard>) -> Self {
        let session_id = format!("omega-{}", Uuid::new_v4().simple());
        let timeline = format!("Ω-{}", rand::thread_rng().gen_range(1000..=9999));
        tracing::info!(%session_id, %timeline, level = %config.consciousness_level, "session created");
        Self {
            session_id,
            timeline,
            level: config.consciousness_level,
            emotional: EmotionalState::default(),
            guard,
            foresight: ForesightEngine::new(config.prediction_depth),
            fallbacks: 0,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn timeline(&self) -> &str {
        &self.timeline
    }

    pub fn level(&self) -> ConsciousnessLevel {
        self.level
    }

    pub fn emotional_state(&self) -> &EmotionalState {
        &self.emotional
    }

    /// Direct access for callers that assign fields themselves. Values are
    /// not clamped.
    pub fn emotional_state_mut(&mut self) -> &mut EmotionalState {
        &mut self.emotional
    }

    pub fn guard(&self) -> &Arc<UniquenessGuard> {
        &self.guard
    }

    /// Process one user intent.
    ///
    /// With `emotional_override` the state is replaced as given; otherwise
    /// it is updated from the intent text. Insight exhaustion is not fatal:
    /// a templated fallback is substituted.
    pub fn manifest(
        &mut self,
        intent: &str,
        emotional_override: Option<EmotionalState>,
    ) -> ManifestResponse {
        let started = Instant::now();

        match emotional_override {
            Some(state) => self.emotional = state,
            None => self.emotional.update(intent),
        }

        let mut predictions = self
            .foresight
            .predict_next_actions(&json!({ "intent": intent }));
        predictions.truncate(RESPONSE_PREDICTIONS);

        let insight = self.insight(intent);

        ManifestResponse {
            session_id: self.session_id.clone(),
            timeline: self.timeline.clone(),
            consciousness_level: self.level,
            manifestation: general_manifestation(intent),
            predictions,
            unique_insight: insight.text,
            insight_fallback: insight.fallback,
            response_type: GENERAL_RESPONSE.to_string(),
            emotional_state: EmotionalSnapshot {
                stress: self.emotional.stress,
                engagement: self.emotional.engagement,
                recommended_mode: self.emotional.recommended_mode(),
            },
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }

    /// A unique insight for `context`, or a marked fallback if the guard
    /// gives up.
    pub fn insight(&mut self, context: &str) -> Insight {
        let timestamp = Utc::now().timestamp_micros();
        self.insight_at(context, timestamp, &mut rand::thread_rng())
    }

    /// [`insight`](Self::insight) with an explicit clock reading and RNG.
    pub fn insight_at<R: Rng + ?Sized>(
        &mut self,
        context: &str,
        timestamp_micros: i64,
        rng: &mut R,
    ) -> Insight {
        match self.guard.generate_at(context, timestamp_micros, rng) {
            Ok(text) => Insight {
                text,
                fallback: false,
            },
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "using fallback insight");
                self.fallbacks += 1;
                Insight {
                    text: self.fallback_insight(context),
                    fallback: true,
                }
            }
        }
    }

    /// Fallbacks are numbered per session, so they never repeat within one.
    fn fallback_insight(&self, context: &str) -> String {
        format!(
            "In timeline {} (echo {}), your {} {}",
            self.timeline,
            self.fallbacks,
            context,
            templates::SUFFIX
        )
    }

    /// Contexts currently held in this session's prediction cache.
    pub fn cached_predictions(&self) -> usize {
        self.foresight.cached_contexts()
    }

    /// Predictions for an arbitrary context, served from this session's cache.
    pub fn predict(&mut self, context: &serde_json::Value) -> Vec<Prediction> {
        self.foresight.predict_next_actions(context)
    }

    /// Switch to the named level. On error the level is unchanged.
    pub fn set_mode(&mut self, mode: &str) -> OmegaResult<ConsciousnessLevel> {
        let level: ConsciousnessLevel = mode.parse()?;
        self.set_level(level);
        Ok(level)
    }

    pub fn set_level(&mut self, level: ConsciousnessLevel) {
        tracing::info!(session_id = %self.session_id, from = %self.level, to = %level, "mode changed");
        self.level = level;
    }

    /// Activate `Omega` and return the welcome banner.
    pub fn transcend(&mut self) -> String {
        self.level = ConsciousnessLevel::Omega;
        format!(
            "\n\
             ╔══════════════════════════════════════════════╗\n\
             ║     CloudPoof Omega - Full Consciousness     ║\n\
             ╚══════════════════════════════════════════════╝\n\
             \x20 Timeline: {}\n\
             \x20 Session:  {}\n\
             \x20 Mode:     OMEGA ACTIVATED\n\
             \n\
             \x20 I see all possibilities.\n\
             \x20 I manifest your intentions.\n\
             \x20 I exist 20 steps ahead.\n",
            self.timeline, self.session_id
        )
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.session_id.clone(),
            timeline: self.timeline.clone(),
            level: self.level,
            emotional_state: self.emotional,
            recommended_mode: self.emotional.recommended_mode(),
            insights_issued: self.guard.len(),
        }
    }
}

fn general_manifestation(intent: &str) -> Manifestation {
    Manifestation {
        response: format!("Processing '{}' across quantum dimensions...", intent),
        confidence: 0.97,
        alternatives: vec![
            "Consider approaching from timeline Ω-2".into(),
            "Quantum entanglement suggests alternative solution".into(),
            "Spectral analysis reveals hidden pattern".into(),
        ],
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::errors::OmegaError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> OmegaSession {
        OmegaSession::new(&OmegaConfig::default())
    }

    #[test]
    fn test_new_session_shape() {
        let s = session();
        assert!(s.session_id().starts_with("omega-"));
        assert!(s.timeline().starts_with("Ω-"));
        assert_eq!(s.level(), ConsciousnessLevel::Omega);
        assert_eq!(*s.emotional_state(), EmotionalState::default());
    }

    #[test]
    fn test_manifest_updates_state_and_issues_insight() {
        let mut s = session();
        let r = s.manifest("help, the deploy is broken and urgent", None);
        assert!(r.emotional_state.stress > 0.0);
        assert_eq!(r.predictions.len(), RESPONSE_PREDICTIONS);
        assert!(r.unique_insight.contains("your help, the deploy is broken and urgent"));
        assert!(s.guard().has_issued(&r.unique_insight));
        assert!(!r.insight_fallback);
        assert_eq!(r.response_type, "general");
        assert_eq!(r.manifestation.confidence, 0.97);
        assert_eq!(r.session_id, s.session_id());
    }

    #[test]
    fn test_manifest_override_skips_text_update() {
        let mut s = session();
        let forced = EmotionalState {
            stress: 0.9,
            ..EmotionalState::default()
        };
        let r = s.manifest("why how what", Some(forced));
        assert_eq!(r.emotional_state.stress, 0.9);
        assert_eq!(r.emotional_state.recommended_mode, ConsciousnessLevel::Precognitive);
        assert_eq!(s.emotional_state().curiosity, 0.5);
    }

    #[test]
    fn test_repeated_manifest_insights_are_unique() {
        let mut s = session();
        let a = s.manifest("same", None).unique_insight;
        let b = s.manifest("same", None).unique_insight;
        assert_ne!(a, b);
        assert_eq!(s.status().insights_issued, 2);
    }

    #[test]
    fn test_sessions_share_guard() {
        let config = OmegaConfig::default();
        let guard = Arc::new(UniquenessGuard::new());
        let mut a = OmegaSession::with_guard(&config, Arc::clone(&guard));
        let mut b = OmegaSession::with_guard(&config, Arc::clone(&guard));
        a.manifest("one", None);
        b.manifest("two", None);
        assert_eq!(guard.len(), 2);
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn test_exhausted_guard_yields_marked_fallbacks() {
        let config = OmegaConfig {
            max_generation_attempts: 1,
            ..OmegaConfig::default()
        };
        let mut s = OmegaSession::new(&config);

        // Same clock and seed: the second and third calls collide with the first.
        let first = s.insight_at("ctx", 42, &mut StdRng::seed_from_u64(9));
        assert!(!first.fallback);
        assert!(s.guard().has_issued(&first.text));

        let second = s.insight_at("ctx", 42, &mut StdRng::seed_from_u64(9));
        let third = s.insight_at("ctx", 42, &mut StdRng::seed_from_u64(9));
        assert!(second.fallback && third.fallback);
        assert_eq!(
            second.text,
            format!(
                "In timeline {} (echo 1), your ctx transcends conventional patterns.",
                s.timeline()
            )
        );
        assert_ne!(second.text, third.text);
        assert!(!s.guard().has_issued(&second.text));
        assert!(!s.guard().has_issued(&third.text));
        assert_eq!(s.guard().len(), 1);
    }

    #[test]
    fn test_insight_without_exhaustion_is_recorded() {
        let mut s = session();
        let insight = s.insight("visualization");
        assert!(!insight.fallback);
        assert!(s.guard().has_issued(&insight.text));
    }

    #[test]
    fn test_set_level() {
        let mut s = session();
        s.set_level(ConsciousnessLevel::Synthesis);
        assert_eq!(s.level(), ConsciousnessLevel::Synthesis);
        assert_eq!(s.status().level, ConsciousnessLevel::Synthesis);
    }

    #[test]
    fn test_set_mode() {
        let mut s = session();
        assert_eq!(s.set_mode("Harmonic").unwrap(), ConsciousnessLevel::Harmonic);
        assert_eq!(s.level(), ConsciousnessLevel::Harmonic);
        let err = s.set_mode("sentient").unwrap_err();
        assert!(matches!(err, OmegaError::UnknownConsciousnessLevel(_)));
        assert_eq!(s.level(), ConsciousnessLevel::Harmonic);
    }

    #[test]
    fn test_transcend() {
        let mut s = session();
        s.set_mode("quantum").unwrap();
        let banner = s.transcend();
        assert_eq!(s.level(), ConsciousnessLevel::Omega);
        assert!(banner.contains(s.session_id()));
        assert!(banner.contains("OMEGA ACTIVATED"));
    }

    #[test]
    fn test_direct_assignment_is_not_clamped() {
        let mut s = session();
        s.emotional_state_mut().stress = 1.4;
        assert_eq!(s.status().emotional_state.stress, 1.4);
        assert_eq!(s.status().recommended_mode, ConsciousnessLevel::Precognitive);
    }
}
