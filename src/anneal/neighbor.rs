//! Segment-reversal neighborhood.

use rand::Rng;

/// A reversed sub-range `[start, start + len)` of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reversal {
    pub start: usize,
    pub len: usize,
}

/// Reverses a random contiguous segment of `route` in place.
///
/// Draws `start` uniformly from `[0, n)` and `len` uniformly from
/// `[0, n - start)`, then reverses `route[start..start + len]`. Routes with
/// fewer than two entries are left untouched and yield `None`.
pub fn reverse_segment<T, R: Rng>(route: &mut [T], rng: &mut R) -> Option<Reversal> {
    let n = route.len();
    if n <= 1 {
        return None;
    }

    let start = rng.random_range(0..n);
    let len = rng.random_range(0..n - start);
    route[start..start + len].reverse();
    Some(Reversal { start, len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_short_routes_untouched() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut empty: Vec<usize> = vec![];
        let mut single = vec![7usize];
        assert!(reverse_segment(&mut empty, &mut rng).is_none());
        assert!(reverse_segment(&mut single, &mut rng).is_none());
        assert_eq!(single, vec![7]);
    }

    #[test]
    fn test_reversal_matches_reported_segment() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let original: Vec<usize> = (0..9).collect();
            let mut route = original.clone();
            let rev = reverse_segment(&mut route, &mut rng).unwrap();
            assert!(rev.start < original.len());
            assert!(rev.len < original.len() - rev.start);

            let mut expected = original.clone();
            expected[rev.start..rev.start + rev.len].reverse();
            assert_eq!(route, expected);
        }
    }

    #[test]
    fn test_reversal_preserves_membership() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut route: Vec<usize> = (0..25).rev().collect();
        for _ in 0..1000 {
            reverse_segment(&mut route, &mut rng);
        }
        let mut sorted = route.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..25).collect::<Vec<_>>());
    }
}
