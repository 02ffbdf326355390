//! Uniform sampling helpers for the loop controller.
//!
//! Pure functions over a caller-supplied [`Rng`] so tests can seed them
//! deterministically. All ranges are inclusive where the behavior demands
//! it (the inter-iteration delay may land exactly on either bound).

use std::time::Duration;

use rand::Rng;

use crate::host::DisplayBounds;

/// Sample an inter-iteration delay uniformly from `[min_ms, max_ms]`.
pub fn sample_delay(rng: &mut impl Rng, min_ms: u64, max_ms: u64) -> Duration {
    Duration::from_millis(rng.gen_range(min_ms..=max_ms))
}

/// Pick a candidate index uniformly from `0..len`.
///
/// # Panics
///
/// Panics if `len` is zero; the session invariant guarantees a non-empty
/// candidate list while the loop is active.
pub fn sample_index(rng: &mut impl Rng, len: usize) -> usize {
    rng.gen_range(0..len)
}

/// Sample a point uniformly inside the display bounds.
pub fn sample_point(rng: &mut impl Rng, bounds: DisplayBounds) -> (u32, u32) {
    (
        rng.gen_range(0..bounds.width.max(1)),
        rng.gen_range(0..bounds.height.max(1)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_delay_stays_inside_inclusive_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let delay = sample_delay(&mut rng, 15_000, 30_000);
            assert!(delay >= Duration::from_millis(15_000));
            assert!(delay <= Duration::from_millis(30_000));
        }
    }

    #[test]
    fn test_delay_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            sample_delay(&mut rng, 20_000, 20_000),
            Duration::from_millis(20_000)
        );
    }

    #[test]
    fn test_index_covers_all_candidates() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[sample_index(&mut rng, 3)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_point_within_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = DisplayBounds::new(1920, 1080);
        for _ in 0..1000 {
            let (x, y) = sample_point(&mut rng, bounds);
            assert!(x < 1920);
            assert!(y < 1080);
        }
    }

    #[test]
    fn test_point_degenerate_display() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_point(&mut rng, DisplayBounds::new(0, 0)), (0, 0));
    }
}
