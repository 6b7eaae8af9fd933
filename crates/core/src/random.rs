//! Pluggable randomness for fallback draws and widget shuffling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed indices.
pub trait RandomSource {
    /// Return an index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;
}

/// ChaCha8-backed source, reproducible when seeded explicitly.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Deterministic source for the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Use `seed` when present, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed list of indices, wrapping around. Each value is reduced
/// modulo the requested length.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<usize>,
    position: usize,
}

impl SequenceRandom {
    /// Build a source replaying `values`. An empty list always yields `0`.
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_index(&mut self, len: usize) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value % len
    }
}

/// Pick one element uniformly, or `None` for an empty slice.
pub fn choose<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.next_index(items.len()))
}

/// Fisher–Yates shuffle, walking from the last element down.
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_are_reproducible() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        let left: Vec<usize> = (0..16).map(|_| a.next_index(7)).collect();
        let right: Vec<usize> = (0..16).map(|_| b.next_index(7)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|&value| value < 7));
    }

    #[test]
    fn sequence_wraps_and_reduces() {
        let mut rng = SequenceRandom::new(vec![1, 5]);
        assert_eq!(rng.next_index(3), 1);
        assert_eq!(rng.next_index(3), 2);
        assert_eq!(rng.next_index(3), 1);
        assert_eq!(SequenceRandom::new(Vec::new()).next_index(4), 0);
    }

    #[test]
    fn choose_handles_empty_and_populated() {
        let mut rng = SequenceRandom::new(vec![2]);
        let empty: [u8; 0] = [];
        assert_eq!(choose(&mut rng, &empty[..]), None);
        assert_eq!(choose(&mut rng, &["a", "b", "c"][..]), Some(&"c"));
    }

    #[test]
    fn shuffle_keeps_every_element() {
        let mut rng = SeededRandom::new(7);
        let mut items = [1, 2, 3, 4, 5];
        shuffle(&mut rng, &mut items);
        let mut sorted = items;
        sorted.sort_unstable();
        assert_eq!(sorted, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn zero_draws_reverse_rotate() {
        // Always picking index 0 moves each tail element to the front in turn.
        let mut rng = SequenceRandom::new(vec![0]);
        let mut items = [1, 2, 3, 4, 5];
        shuffle(&mut rng, &mut items);
        assert_eq!(items, [2, 3, 4, 5, 1]);
    }
}
