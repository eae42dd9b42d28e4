//! Random draws without repetition.

use super::RandomGenerator;

/// A pool of ids drawn in random order, each at most once until reset.
///
/// Draws are a lazy Fisher-Yates shuffle: each draw swaps a random remaining
/// id to the end of the live range.
///
/// # Examples
///
/// ```
/// use u_tour::random::{RandomGenerator, RandomPool};
///
/// let mut random = RandomGenerator::new(42);
/// let mut pool = RandomPool::new(4);
/// let mut drawn: Vec<usize> = std::iter::from_fn(|| pool.next(&mut random)).collect();
/// drawn.sort();
/// assert_eq!(drawn, vec![0, 1, 2, 3]);
/// assert!(pool.next(&mut random).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RandomPool {
    ids: Vec<usize>,
    remaining: usize,
}

impl RandomPool {
    /// Creates a pool over `0..size`.
    pub fn new(size: usize) -> Self {
        Self::from_ids((0..size).collect())
    }

    /// Creates a pool over the given ids.
    pub fn from_ids(ids: Vec<usize>) -> Self {
        let remaining = ids.len();
        Self { ids, remaining }
    }

    /// Draws the next id, or `None` when the pool is exhausted.
    pub fn next(&mut self, random: &mut RandomGenerator) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let pick = random.generate(self.remaining);
        self.remaining -= 1;
        self.ids.swap(pick, self.remaining);
        Some(self.ids[self.remaining])
    }

    /// Makes every id available again.
    pub fn reset(&mut self) {
        self.remaining = self.ids.len();
    }

    /// Number of ids not drawn since the last reset.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Total number of ids in the pool.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the pool holds no ids at all.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_each_once() {
        let mut random = RandomGenerator::new(9);
        let mut pool = RandomPool::from_ids(vec![10, 20, 30]);
        let mut seen = Vec::new();
        while let Some(id) = pool.next(&mut random) {
            seen.push(id);
        }
        seen.sort();
        assert_eq!(seen, vec![10, 20, 30]);
        assert_eq!(pool.remaining(), 0);
    }

    #[test]
    fn test_reset() {
        let mut random = RandomGenerator::new(9);
        let mut pool = RandomPool::new(3);
        pool.next(&mut random);
        pool.next(&mut random);
        assert_eq!(pool.remaining(), 1);
        pool.reset();
        assert_eq!(pool.remaining(), 3);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_empty_pool() {
        let mut random = RandomGenerator::new(9);
        let mut pool = RandomPool::new(0);
        assert!(pool.is_empty());
        assert!(pool.next(&mut random).is_none());
    }
}
