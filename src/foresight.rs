//! Foresight engine: templated "next action" predictions.
//!
//! Predictions are a fixed-length list with decaying probability
//! `1 / step`. Results are cached per context, keyed by the MD5 of the
//! context's canonical JSON. The cache holds at most
//! [`MAX_CACHED_CONTEXTS`] entries and evicts the oldest first.

use std::collections::{HashMap, VecDeque};

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum (and default) prediction depth.
pub const MAX_DEPTH: usize = 20;

/// Contexts kept in the prediction cache before the oldest is evicted.
pub const MAX_CACHED_CONTEXTS: usize = 256;

const COMMON_PATTERNS: [&str; 10] = [
    "scale infrastructure",
    "optimize costs",
    "debug error",
    "add feature",
    "improve performance",
    "deploy to production",
    "run tests",
    "check metrics",
    "review logs",
    "update documentation",
];

const PREPARATIONS: [&str; 6] = [
    "Pre-warming containers",
    "Caching dependencies",
    "Optimizing queries",
    "Allocating resources",
    "Loading models",
    "Establishing connections",
];

/// A single predicted user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// 1-based step number.
    pub step: usize,
    pub action: String,
    /// `1 / step`.
    pub probability: f64,
    pub timeline: String,
    pub preparation: String,
}

/// Produces and caches prediction lists.
#[derive(Debug, Clone)]
pub struct ForesightEngine {
    depth: usize,
    cache: HashMap<String, Vec<Prediction>>,
    /// Cache keys in insertion order.
    order: VecDeque<String>,
}

impl Default for ForesightEngine {
    fn default() -> Self {
        Self::new(MAX_DEPTH)
    }
}

impl ForesightEngine {
    /// Create an engine; `depth` is clamped to `1..=MAX_DEPTH`.
    pub fn new(depth: usize) -> Self {
        Self {
            depth: depth.clamp(1, MAX_DEPTH),
            cache: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of distinct contexts with cached predictions.
    pub fn cached_contexts(&self) -> usize {
        self.cache.len()
    }

    /// Predict the next `depth` actions for `context`.
    pub fn predict_next_actions(&mut self, context: &Value) -> Vec<Prediction> {
        let canonical = context.to_string();
        let key = cache_key(&canonical);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        let lowered = canonical.to_lowercase();
        let predictions: Vec<Prediction> = (0..self.depth)
            .map(|step| Prediction {
                step: step + 1,
                action: predict_action(&lowered, step),
                probability: 1.0 / (step + 1) as f64,
                timeline: format!("Ω-{}", step),
                preparation: PREPARATIONS[step % PREPARATIONS.len()].to_string(),
            })
            .collect();

        if self.cache.len() >= MAX_CACHED_CONTEXTS {
            if let Some(oldest) = self.order.pop_front() {
                self.cache.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.cache.insert(key, predictions.clone());
        predictions
    }
}

fn cache_key(canonical: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn predict_action(context: &str, step: usize) -> String {
    if context.contains("error") {
        format!("Debug {} at step {}", COMMON_PATTERNS[2], step + 1)
    } else if context.contains("scale") {
        format!("Auto-scale {} at step {}", COMMON_PATTERNS[0], step + 1)
    } else {
        COMMON_PATTERNS[step % COMMON_PATTERNS.len()].to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_depth_is_clamped() {
        assert_eq!(ForesightEngine::new(50).depth(), MAX_DEPTH);
        assert_eq!(ForesightEngine::new(0).depth(), 1);
        assert_eq!(ForesightEngine::default().depth(), 20);
    }

    #[test]
    fn test_probabilities_decay() {
        let mut engine = ForesightEngine::new(5);
        let preds = engine.predict_next_actions(&json!({"intent": "explore"}));
        assert_eq!(preds.len(), 5);
        assert_eq!(preds[0].probability, 1.0);
        assert_eq!(preds[1].probability, 0.5);
        assert_eq!(preds[4].step, 5);
        assert_eq!(preds[4].timeline, "Ω-4");
        assert!(preds.windows(2).all(|w| w[0].probability > w[1].probability));
    }

    #[test]
    fn test_general_context_cycles_patterns() {
        let mut engine = ForesightEngine::new(12);
        let preds = engine.predict_next_actions(&json!({"intent": "explore"}));
        assert_eq!(preds[0].action, "scale infrastructure");
        assert_eq!(preds[10].action, "scale infrastructure");
        assert_eq!(preds[6].preparation, "Pre-warming containers");
    }

    #[test]
    fn test_error_context_takes_precedence() {
        let mut engine = ForesightEngine::new(3);
        let preds = engine.predict_next_actions(&json!({"intent": "scale after ERROR"}));
        assert_eq!(preds[1].action, "Debug debug error at step 2");
    }

    #[test]
    fn test_scale_context() {
        let mut engine = ForesightEngine::new(3);
        let preds = engine.predict_next_actions(&json!({"intent": "Scale up"}));
        assert_eq!(preds[0].action, "Auto-scale scale infrastructure at step 1");
    }

    #[test]
    fn test_cache_ignores_key_order() {
        let mut engine = ForesightEngine::new(3);
        engine.predict_next_actions(&json!({"a": 1, "b": 2}));
        engine.predict_next_actions(&json!({"b": 2, "a": 1}));
        assert_eq!(engine.cached_contexts(), 1);
        engine.predict_next_actions(&json!({"a": 2}));
        assert_eq!(engine.cached_contexts(), 2);
    }

    #[test]
    fn test_cache_is_bounded() {
        let mut engine = ForesightEngine::new(2);
        for i in 0..MAX_CACHED_CONTEXTS + 50 {
            engine.predict_next_actions(&json!({ "intent": i }));
        }
        assert_eq!(engine.cached_contexts(), MAX_CACHED_CONTEXTS);

        // Oldest entries went first; the newest is still served from cache.
        let newest = json!({ "intent": MAX_CACHED_CONTEXTS + 49 });
        engine.predict_next_actions(&newest);
        assert_eq!(engine.cached_contexts(), MAX_CACHED_CONTEXTS);
        assert!(!engine.cache.contains_key(&cache_key(&json!({ "intent": 0 }).to_string())));
    }
}
