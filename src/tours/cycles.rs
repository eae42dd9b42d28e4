//! Cycle decomposition of a successor array.

use std::collections::BTreeMap;

use super::NO_VISIT;

/// A successor array whose cycles are computed on demand.
///
/// Every id either points to its successor or to [`NO_VISIT`]. When the
/// array is a permutation of the ids it holds, it decomposes into disjoint
/// cycles. The cycle map (start id → length, start being the smallest id of
/// the cycle) is cached and dropped on every write.
///
/// # Examples
///
/// ```
/// use u_tour::tours::AsymmetricCycles;
///
/// let mut cycles = AsymmetricCycles::new(4);
/// cycles.set_next(0, 1);
/// cycles.set_next(1, 0);
/// cycles.set_next(2, 3);
/// cycles.set_next(3, 2);
/// assert_eq!(cycles.cycles().len(), 2);
/// assert_eq!(cycles.cycles().get(&2), Some(&2));
/// ```
#[derive(Debug, Clone)]
pub struct AsymmetricCycles {
    next: Vec<usize>,
    cache: Option<CycleCache>,
}

#[derive(Debug, Clone)]
struct CycleCache {
    lengths: BTreeMap<usize, usize>,
}

impl AsymmetricCycles {
    /// Creates an array of `len` ids without successors.
    pub fn new(len: usize) -> Self {
        Self {
            next: vec![NO_VISIT; len],
            cache: None,
        }
    }

    /// Wraps an existing successor array.
    pub fn from_next(next: Vec<usize>) -> Self {
        Self { next, cache: None }
    }

    /// Number of ids in the array.
    pub fn len(&self) -> usize {
        self.next.len()
    }

    /// Returns `true` if the array holds no ids.
    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Successor of `id`, or [`NO_VISIT`].
    #[inline]
    pub fn next(&self, id: usize) -> usize {
        self.next[id]
    }

    /// Sets the successor of `id`, invalidating the cycle map.
    pub fn set_next(&mut self, id: usize, next: usize) {
        self.next[id] = next;
        self.cache = None;
    }

    /// Cycle start → cycle length, for every cycle in the array.
    pub fn cycles(&mut self) -> &BTreeMap<usize, usize> {
        &self.cache().lengths
    }

    /// Ids of the cycle starting at `start`, in successor order.
    pub fn members(&self, start: usize) -> Vec<usize> {
        let mut members = vec![start];
        let mut current = self.next[start];
        while current != start && current != NO_VISIT && members.len() <= self.next.len() {
            members.push(current);
            current = self.next[current];
        }
        members
    }

    fn cache(&mut self) -> &CycleCache {
        if self.cache.is_none() {
            self.cache = Some(self.decompose());
        }
        match &self.cache {
            Some(cache) => cache,
            None => unreachable!("cycle cache populated above"),
        }
    }

    fn decompose(&self) -> CycleCache {
        let len = self.next.len();
        let mut lengths = BTreeMap::new();
        // 0 = unvisited, 1 = on the current walk, 2 = settled
        let mut state = vec![0u8; len];
        let mut walk = Vec::new();

        for start in 0..len {
            if state[start] != 0 || self.next[start] == NO_VISIT {
                continue;
            }
            walk.clear();
            let mut current = start;
            while current != NO_VISIT && state[current] == 0 {
                state[current] = 1;
                walk.push(current);
                current = self.next[current];
            }

            // A cycle exists only if the walk ran back into itself.
            if current != NO_VISIT && state[current] == 1 {
                let entry = walk.iter().position(|&v| v == current).unwrap_or(0);
                let cycle = &walk[entry..];
                let cycle_start = cycle.iter().copied().min().unwrap_or(current);
                lengths.insert(cycle_start, cycle.len());
            }
            for &v in &walk {
                state[v] = 2;
            }
        }

        CycleCache { lengths }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cycle() {
        let mut c = AsymmetricCycles::from_next(vec![1, 2, 3, 0]);
        assert_eq!(c.cycles().len(), 1);
        assert_eq!(c.cycles().get(&0), Some(&4));
        assert_eq!(c.members(0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_self_loops_are_cycles() {
        let mut c = AsymmetricCycles::from_next(vec![0, 2, 1]);
        assert_eq!(c.cycles().get(&0), Some(&1));
        assert_eq!(c.cycles().get(&1), Some(&2));
    }

    #[test]
    fn test_start_is_smallest_id() {
        let mut c = AsymmetricCycles::from_next(vec![NO_VISIT, NO_VISIT, 4, 2, 3]);
        // 2 -> 4 -> 3 -> 2
        assert_eq!(c.cycles().len(), 1);
        assert_eq!(c.cycles().get(&2), Some(&3));
        assert_eq!(c.members(2), vec![2, 4, 3]);
    }

    #[test]
    fn test_tail_into_cycle_not_counted() {
        // 0 -> 1 -> 2 -> 1 : 0 hangs off the cycle {1, 2}
        let mut c = AsymmetricCycles::from_next(vec![1, 2, 1]);
        assert_eq!(c.cycles().len(), 1);
        assert_eq!(c.cycles().get(&1), Some(&2));
        assert!(!c.cycles().contains_key(&0));
    }

    #[test]
    fn test_cache_invalidated_on_write() {
        let mut c = AsymmetricCycles::from_next(vec![1, 0, 3, 2]);
        assert_eq!(c.cycles().len(), 2);
        // Merge into 0 -> 3 -> 2 -> 1 -> 0.
        c.set_next(0, 3);
        c.set_next(2, 1);
        assert_eq!(c.cycles().len(), 1);
        assert_eq!(c.cycles().get(&0), Some(&4));
    }

    #[test]
    fn test_empty() {
        let mut c = AsymmetricCycles::new(0);
        assert!(c.is_empty());
        assert!(c.cycles().is_empty());
    }
}
