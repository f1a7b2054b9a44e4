//! Phrase templates used to compose insight candidates.

use rand::Rng;

/// Fixed suffix that closes every insight.
pub const SUFFIX: &str = "transcends conventional patterns.";

/// Number of prefix templates available to [`prefix`].
pub const PREFIX_COUNT: usize = 5;

/// Render one randomly chosen prefix phrase.
pub fn prefix<R: Rng + ?Sized>(rng: &mut R, timestamp_micros: i64) -> String {
    match rng.gen_range(0..PREFIX_COUNT) {
        0 => format!("At quantum timestamp {}", timestamp_micros),
        1 => format!("In timeline Ω-{}", rng.gen_range(1000..=9999)),
        2 => format!("Resonating at {}Hz", rng.gen_range(400..=450)),
        3 => format!("With entropy coefficient {:.10}", rng.gen::<f64>()),
        _ => format!("Across {}-dimensional manifold", rng.gen_range(3..=11)),
    }
}

/// Compose a full candidate: `"<prefix>, your <context> <suffix>"`.
pub fn compose<R: Rng + ?Sized>(rng: &mut R, timestamp_micros: i64, context: &str) -> String {
    format!("{}, your {} {}", prefix(rng, timestamp_micros), context, SUFFIX)
}

/// Prepend a timestamp marker to an existing candidate after a collision.
pub fn restamp(candidate: &str, timestamp_micros: i64) -> String {
    format!("At quantum timestamp {}, {}", timestamp_micros, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_compose_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let s = compose(&mut rng, 1_700_000_000_000_000, "deployment");
            assert!(s.contains(", your deployment transcends conventional patterns."));
        }
    }

    #[test]
    fn test_empty_context_still_composes() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = compose(&mut rng, 0, "");
        assert!(s.ends_with(", your  transcends conventional patterns."));
    }

    #[test]
    fn test_restamp_prepends() {
        assert_eq!(restamp("X", 42), "At quantum timestamp 42, X");
    }
}
