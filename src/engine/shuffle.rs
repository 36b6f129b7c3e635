// ==========================================
// Exam Center - Random source and Fisher-Yates shuffle
// ==========================================
// Every permutation must be equally likely
// The random source is injected so tests can pin the outcome
// ==========================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ==========================================
// Trait: RandomSource
// ==========================================
pub trait RandomSource {
    /// Uniform index in [0, upper_inclusive]
    fn pick(&mut self, upper_inclusive: usize) -> usize;
}

/// Adapter over any `rand` generator
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick(&mut self, upper_inclusive: usize) -> usize {
        self.rng.random_range(0..=upper_inclusive)
    }
}

/// Unseeded source, fresh per placement action
pub fn thread_source() -> RngSource<rand::rngs::ThreadRng> {
    RngSource::new(rand::rng())
}

/// Reproducible source
pub fn seeded_source(seed: u64) -> RngSource<StdRng> {
    RngSource::new(StdRng::seed_from_u64(seed))
}

/// In-place Fisher-Yates: i from last down to 1, j uniform in [0, i]
pub fn fisher_yates<T>(items: &mut [T], source: &mut dyn RandomSource) {
    if items.len() < 2 {
        return;
    }
    for i in (1..items.len()).rev() {
        let j = source.pick(i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Replays fixed picks
    struct ScriptedSource {
        picks: Vec<usize>,
        cursor: usize,
    }

    impl RandomSource for ScriptedSource {
        fn pick(&mut self, upper_inclusive: usize) -> usize {
            let v = self.picks[self.cursor];
            self.cursor += 1;
            assert!(v <= upper_inclusive);
            v
        }
    }

    #[test]
    fn test_scripted_swaps() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        // i=3 -> j=0, i=2 -> j=2, i=1 -> j=0
        let mut source = ScriptedSource {
            picks: vec![0, 2, 0],
            cursor: 0,
        };
        fisher_yates(&mut items, &mut source);
        // [a,b,c,d] -> [d,b,c,a] -> [d,b,c,a] -> [b,d,c,a]
        assert_eq!(items, vec!['b', 'd', 'c', 'a']);
    }

    #[test]
    fn test_same_seed_same_permutation() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b: Vec<u32> = (0..20).collect();
        fisher_yates(&mut a, &mut seeded_source(7));
        fisher_yates(&mut b, &mut seeded_source(7));
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<u32>>());
    }

    #[test]
    fn test_all_permutations_reachable() {
        // 4! = 24 permutations, 24_000 trials: expected 1000 each
        let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();
        let mut source = seeded_source(2026);
        for _ in 0..24_000 {
            let mut items = vec![1u8, 2, 3, 4];
            fisher_yates(&mut items, &mut source);
            *counts.entry(items).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 24);
        for (perm, n) in &counts {
            assert!(
                (800..=1200).contains(n),
                "permutation {:?} seen {} times",
                perm,
                n
            );
        }
    }

    #[test]
    fn test_trivial_inputs_untouched() {
        let mut empty: Vec<u8> = vec![];
        let mut single = vec![9u8];
        let mut source = ScriptedSource {
            picks: vec![],
            cursor: 0,
        };
        fisher_yates(&mut empty, &mut source);
        fisher_yates(&mut single, &mut source);
        assert_eq!(single, vec![9]);
    }
}
