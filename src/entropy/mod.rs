//! Unique insight generation.
//!
//! A [`UniquenessGuard`] remembers the SHA-256 fingerprint of every insight
//! it has handed out and never returns a string whose fingerprint it has
//! already recorded. On collision the candidate is restamped with an
//! advancing timestamp until it is fresh, up to a safety bound.
//!
//! The fingerprint set lives behind a mutex, and the membership check
//! plus insert run under one lock acquisition, so a single guard can be
//! shared across request handlers through an `Arc`.

pub mod templates;

use std::collections::HashSet;

use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::utilities::errors::{OmegaError, OmegaResult};

/// Default bound on candidates tried per [`UniquenessGuard::generate`] call.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// SHA-256 digest of an insight.
pub type Fingerprint = [u8; 32];

/// Compute the fingerprint of `text`.
pub fn fingerprint(text: &str) -> Fingerprint {
    Sha256::digest(text.as_bytes()).into()
}

/// Hex-encoded fingerprint of `text`.
pub fn fingerprint_hex(text: &str) -> String {
    hex::encode(fingerprint(text))
}

/// Issues insights that are unique for the lifetime of the guard.
#[derive(Debug)]
pub struct UniquenessGuard {
    fingerprints: Mutex<HashSet<Fingerprint>>,
    max_attempts: usize,
}

impl Default for UniquenessGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl UniquenessGuard {
    /// Create an empty guard with [`DEFAULT_MAX_ATTEMPTS`].
    pub fn new() -> Self {
        Self::with_max_attempts(DEFAULT_MAX_ATTEMPTS)
    }

    /// Create an empty guard with a custom retry bound (minimum 1).
    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self {
            fingerprints: Mutex::new(HashSet::new()),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Retry bound for a single call.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Generate a never-before-issued insight about `context`.
    ///
    /// Adds exactly one fingerprint on success. Returns
    /// [`OmegaError::GenerationExhausted`] and records nothing if the
    /// retry bound is hit.
    pub fn generate(&self, context: &str) -> OmegaResult<String> {
        let timestamp = Utc::now().timestamp_micros();
        self.generate_at(context, timestamp, &mut rand::thread_rng())
    }

    /// [`generate`](Self::generate) with an explicit clock reading and RNG.
    pub fn generate_at<R: Rng + ?Sized>(
        &self,
        context: &str,
        timestamp_micros: i64,
        rng: &mut R,
    ) -> OmegaResult<String> {
        let mut timestamp = timestamp_micros;
        let mut candidate = templates::compose(rng, timestamp, context);
        let mut digest = fingerprint(&candidate);
        let mut attempts = 1;

        let mut fingerprints = self.fingerprints.lock();
        while fingerprints.contains(&digest) {
            if attempts >= self.max_attempts {
                return Err(OmegaError::GenerationExhausted {
                    context: context.to_string(),
                    attempts,
                });
            }
            timestamp += 1;
            candidate = templates::restamp(&candidate, timestamp);
            digest = fingerprint(&candidate);
            attempts += 1;
            tracing::debug!(attempts, context, "insight fingerprint collision, restamping");
        }
        fingerprints.insert(digest);

        Ok(candidate)
    }

    /// Whether `artifact` has been issued by this guard.
    pub fn has_issued(&self, artifact: &str) -> bool {
        self.fingerprints.lock().contains(&fingerprint(artifact))
    }

    /// Number of insights issued so far.
    pub fn len(&self) -> usize {
        self.fingerprints.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.lock().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_ten_thousand_unique_insights() {
        let guard = UniquenessGuard::new();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            seen.insert(guard.generate("x").unwrap());
        }
        assert_eq!(seen.len(), 10_000);
        assert_eq!(guard.len(), 10_000);
    }

    #[test]
    fn test_empty_context() {
        let guard = UniquenessGuard::new();
        let a = guard.generate("").unwrap();
        let b = guard.generate("").unwrap();
        assert_ne!(a, b);
        assert!(a.contains("your  transcends"));
    }

    #[test]
    fn test_collision_restamps_with_advancing_timestamp() {
        let guard = UniquenessGuard::new();
        let first = guard
            .generate_at("ctx", 100, &mut StdRng::seed_from_u64(9))
            .unwrap();
        let second = guard
            .generate_at("ctx", 100, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(second, format!("At quantum timestamp 101, {}", first));

        let third = guard
            .generate_at("ctx", 100, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(
            third,
            format!("At quantum timestamp 102, At quantum timestamp 101, {}", first)
        );
        assert_eq!(guard.len(), 3);
    }

    #[test]
    fn test_exhaustion_records_nothing() {
        let guard = UniquenessGuard::with_max_attempts(1);
        guard
            .generate_at("ctx", 5, &mut StdRng::seed_from_u64(3))
            .unwrap();
        let err = guard
            .generate_at("ctx", 5, &mut StdRng::seed_from_u64(3))
            .unwrap_err();
        assert!(matches!(
            err,
            OmegaError::GenerationExhausted { ref context, attempts: 1 } if context == "ctx"
        ));
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn test_has_issued() {
        let guard = UniquenessGuard::new();
        let insight = guard.generate("status").unwrap();
        assert!(guard.has_issued(&insight));
        assert!(!guard.has_issued("never issued"));
    }

    #[test]
    fn test_fingerprint_hex_is_sha256() {
        assert_eq!(
            fingerprint_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_shared_guard_across_threads() {
        let guard = Arc::new(UniquenessGuard::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let guard = Arc::clone(&guard);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| guard.generate("shared").unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for insight in handle.join().unwrap() {
                assert!(all.insert(insight));
            }
        }
        assert_eq!(all.len(), 2000);
        assert_eq!(guard.len(), 2000);
    }
}
