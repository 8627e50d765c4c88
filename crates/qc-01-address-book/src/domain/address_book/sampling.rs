//! Randomized candidate sampling.

use crate::ports::RandomSource;

/// Number of peers to hand out from a pool of `available`, given the
/// caller's `min`/`max` bounds.
///
/// Draws uniformly between a quarter and a half of the pool (both capped at
/// `max`), then raises the result to `min` where the pool allows it. A `min`
/// above `max` is treated as `max`.
pub(crate) fn sample_size(
    min: usize,
    max: usize,
    available: usize,
    random: &dyn RandomSource,
) -> usize {
    let min = min.min(max);
    let lower = max.min(available.div_ceil(4));
    let upper = max.min(available / 2);

    let drawn = if upper > lower {
        lower + random.random_usize(upper - lower + 1)
    } else {
        lower
    };

    drawn.max(min.min(available)).min(max).min(available)
}

/// Fisher-Yates shuffle driven by `random`.
pub(crate) fn shuffle<T>(items: &mut [T], random: &dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = random.random_usize(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedRandomSource, SeededRandomSource};
    use proptest::prelude::*;

    #[test]
    fn test_empty_pool() {
        let random = FixedRandomSource::new(0);
        assert_eq!(sample_size(5, 10, 0, &random), 0);
    }

    #[test]
    fn test_small_pool_raised_to_min() {
        // 8 peers: draw lies in [2, 4], raised to min 6.
        let random = FixedRandomSource::new(0);
        assert_eq!(sample_size(6, 10, 8, &random), 6);
    }

    #[test]
    fn test_pool_smaller_than_min() {
        let random = FixedRandomSource::new(0);
        assert_eq!(sample_size(10, 20, 3, &random), 3);
    }

    #[test]
    fn test_min_above_max_uses_max() {
        let random = FixedRandomSource::new(0);
        assert_eq!(sample_size(50, 10, 100, &random), 10);
    }

    #[test]
    fn test_draw_upper_end() {
        // 100 peers, max 1000: draw in [25, 50]; the fixed source picks the
        // last offset.
        let random = FixedRandomSource::new(25);
        assert_eq!(sample_size(0, 1000, 100, &random), 50);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let random = SeededRandomSource::new(3);
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, &random);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, sorted);
    }

    proptest! {
        #[test]
        fn prop_size_within_bounds_when_pool_is_large(
            min in 0usize..200,
            max in 0usize..200,
            extra in 0usize..500,
            seed in any::<u64>(),
        ) {
            let random = SeededRandomSource::new(seed);
            let available = max + extra;
            let size = sample_size(min, max, available, &random);
            prop_assert!(size <= max);
            prop_assert!(size >= min.min(max));
        }

        #[test]
        fn prop_size_never_exceeds_pool(
            min in 0usize..200,
            max in 0usize..200,
            available in 0usize..200,
            seed in any::<u64>(),
        ) {
            let random = SeededRandomSource::new(seed);
            prop_assert!(sample_size(min, max, available, &random) <= available);
        }
    }
}
