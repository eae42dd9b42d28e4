//! Successor-array tour.
//!
//! # Representation
//!
//! Visits are dense integer ids in `[0, capacity)`. The tour keeps a
//! successor and a predecessor array indexed by id, so insertion, removal,
//! and shifting a visit are O(1) pointer updates. Positional lookup walks
//! the successor chain and is O(count).
//!
//! A tour always has a `first` visit. Its `last` is one of:
//!
//! - `None` — an open tour, the tail is free to change
//! - `Some(first)` — a closed loop, the tail links back to `first`
//! - `Some(l)` with `l != first` — a fixed endpoint that always ends the tour

use std::fmt;

use crate::error::{RoutingError, RoutingResult};

/// Marks an id that is not part of the tour.
const ABSENT: usize = usize::MAX;
/// Marks the missing successor of an open tail or predecessor of an open head.
const END: usize = usize::MAX - 1;

/// The endpoints touched by [`Tour::shift_after`].
///
/// With these and the shifted visit, the cost change of a shift is a
/// constant number of lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    /// Visit that preceded the shifted visit.
    pub old_before: usize,
    /// Visit that followed the shifted visit, if any.
    pub old_after: Option<usize>,
    /// Visit that now follows the shifted visit, if any.
    pub new_after: Option<usize>,
}

/// An ordered, open or closed sequence of visit ids.
///
/// # Examples
///
/// ```
/// use u_tour::tours::Tour;
///
/// // Closed loop 0 → 1 → 2 → 3 → 0.
/// let mut tour = Tour::new([0, 1, 2, 3], Some(0)).unwrap();
/// assert!(tour.is_closed());
/// assert_eq!(tour.next(3), Some(0));
///
/// tour.shift_after(1, 2).unwrap();
/// assert_eq!(tour.to_vec(), vec![0, 2, 1, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    next: Vec<usize>,
    prev: Vec<usize>,
    first: usize,
    last: Option<usize>,
    tail: usize,
    count: usize,
}

impl Tour {
    /// Builds a tour from an ordered sequence, sized to the largest id.
    pub fn new<I>(visits: I, last: Option<usize>) -> RoutingResult<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let visits: Vec<usize> = visits.into_iter().collect();
        let capacity = visits
            .iter()
            .copied()
            .chain(last)
            .max()
            .map_or(0, |m| m + 1);
        Self::with_capacity(capacity, visits, last)
    }

    /// Builds a tour over the id space `[0, capacity)`.
    ///
    /// The first element of `visits` becomes `first`. A fixed `last`
    /// distinct from `first` must be the final element.
    pub fn with_capacity<I>(capacity: usize, visits: I, last: Option<usize>) -> RoutingResult<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let visits: Vec<usize> = visits.into_iter().collect();
        let first = *visits.first().ok_or(RoutingError::EmptyTour)?;
        let tail = *visits.last().ok_or(RoutingError::EmptyTour)?;

        if let Some(l) = last {
            if l != first && l != tail {
                return Err(RoutingError::InvalidLast(l));
            }
            if l != first && visits.len() < 2 {
                return Err(RoutingError::InvalidLast(l));
            }
        }

        let mut next = vec![ABSENT; capacity];
        let mut prev = vec![ABSENT; capacity];
        for &v in &visits {
            if v >= capacity {
                return Err(RoutingError::VisitOutOfRange { visit: v, capacity });
            }
            if next[v] != ABSENT {
                return Err(RoutingError::DuplicateVisit(v));
            }
            // Provisional mark, overwritten below.
            next[v] = END;
        }

        for pair in visits.windows(2) {
            next[pair[0]] = pair[1];
            prev[pair[1]] = pair[0];
        }
        if last == Some(first) {
            next[tail] = first;
            prev[first] = tail;
        } else {
            next[tail] = END;
            prev[first] = END;
        }

        Ok(Self {
            next,
            prev,
            first,
            last,
            tail,
            count: visits.len(),
        })
    }

    /// A tour holding only its fixed endpoints: `[first]`, or `[first, last]`
    /// when `last` is a distinct fixed visit.
    ///
    /// # Panics
    ///
    /// Panics if `first` or `last` is outside `[0, capacity)`.
    pub fn endpoints(capacity: usize, first: usize, last: Option<usize>) -> Self {
        let mut next = vec![ABSENT; capacity];
        let mut prev = vec![ABSENT; capacity];
        let (tail, count) = match last {
            Some(l) if l != first => {
                next[first] = l;
                prev[l] = first;
                next[l] = END;
                prev[first] = END;
                (l, 2)
            }
            Some(_) => {
                next[first] = first;
                prev[first] = first;
                (first, 1)
            }
            None => {
                next[first] = END;
                prev[first] = END;
                (first, 1)
            }
        };
        Self {
            next,
            prev,
            first,
            last,
            tail,
            count,
        }
    }

    /// Size of the id space this tour was built for.
    pub fn capacity(&self) -> usize {
        self.next.len()
    }

    /// Number of visits in the tour.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The first visit.
    pub fn first(&self) -> usize {
        self.first
    }

    /// The fixed last visit: `None` for open tours, `Some(first)` for closed loops.
    pub fn last(&self) -> Option<usize> {
        self.last
    }

    /// The visit at the end of the sequence.
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Returns `true` if the tail links back to `first`.
    pub fn is_closed(&self) -> bool {
        self.last == Some(self.first)
    }

    /// Returns `true` if `visit` is the fixed last visit of a non-closed tour.
    pub fn is_fixed_last(&self, visit: usize) -> bool {
        self.last == Some(visit) && visit != self.first
    }

    /// Returns `true` if `visit` is in the tour.
    pub fn contains(&self, visit: usize) -> bool {
        visit < self.next.len() && self.next[visit] != ABSENT
    }

    /// The visit after `visit`; wraps to `first` in closed tours.
    pub fn next(&self, visit: usize) -> Option<usize> {
        match self.next.get(visit) {
            Some(&n) if n != ABSENT && n != END => Some(n),
            _ => None,
        }
    }

    /// The visit before `visit`; wraps to the tail in closed tours.
    pub fn prev(&self, visit: usize) -> Option<usize> {
        match self.prev.get(visit) {
            Some(&p) if p != ABSENT && p != END => Some(p),
            _ => None,
        }
    }

    /// Walks the tour from `first`.
    ///
    /// Every call starts a fresh walk; the sequence is finite even for closed tours.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tour: self,
            current: Some(self.first),
            remaining: self.count,
        }
    }

    /// Consecutive visit pairs, including the closing pair of a closed loop.
    pub fn pairs(&self) -> Pairs<'_> {
        let remaining = if self.is_closed() {
            self.count
        } else {
            self.count - 1
        };
        Pairs {
            tour: self,
            current: self.first,
            remaining,
        }
    }

    /// Returns the visit at the given position, O(index).
    pub fn visit_at(&self, index: usize) -> Option<usize> {
        self.iter().nth(index)
    }

    /// Copies the visits into a vector in tour order.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// Sums `cost` over [`Tour::pairs`].
    pub fn weight<F>(&self, cost: F) -> f64
    where
        F: Fn(usize, usize) -> f64,
    {
        self.pairs().map(|(a, b)| cost(a, b)).sum()
    }

    /// Inserts `visit` directly after `after`.
    pub fn insert_after(&mut self, after: usize, visit: usize) -> RoutingResult<()> {
        if visit >= self.capacity() {
            return Err(RoutingError::VisitOutOfRange {
                visit,
                capacity: self.capacity(),
            });
        }
        if self.contains(visit) {
            return Err(RoutingError::DuplicateVisit(visit));
        }
        if !self.contains(after) {
            return Err(RoutingError::MissingVisit(after));
        }
        if self.is_fixed_last(after) {
            return Err(RoutingError::FixedVisit(after));
        }

        let after_next = self.next[after];
        self.next[after] = visit;
        self.prev[visit] = after;
        self.next[visit] = after_next;
        if after_next != END {
            self.prev[after_next] = visit;
        }
        if after == self.tail {
            self.tail = visit;
        }
        self.count += 1;
        Ok(())
    }

    /// Removes `visit`, linking its neighbours.
    pub fn remove(&mut self, visit: usize) -> RoutingResult<()> {
        if !self.contains(visit) {
            return Err(RoutingError::MissingVisit(visit));
        }
        if visit == self.first || self.is_fixed_last(visit) {
            return Err(RoutingError::FixedVisit(visit));
        }

        self.unlink(visit);
        self.next[visit] = ABSENT;
        self.prev[visit] = ABSENT;
        self.count -= 1;
        Ok(())
    }

    /// Moves `visit` to directly after `before`.
    ///
    /// Returns `None` without touching the tour if `before` already precedes
    /// `visit`, if either is missing, or if the move would displace `first`
    /// or a fixed last visit.
    pub fn shift_after(&mut self, visit: usize, before: usize) -> Option<Shift> {
        if visit == before
            || !self.contains(visit)
            || !self.contains(before)
            || visit == self.first
            || self.is_fixed_last(visit)
            || self.is_fixed_last(before)
            || self.prev(visit) == Some(before)
        {
            return None;
        }

        let old_before = self.prev(visit)?;
        let old_after = self.next(visit);
        self.unlink(visit);

        let new_after_raw = self.next[before];
        self.next[before] = visit;
        self.prev[visit] = before;
        self.next[visit] = new_after_raw;
        if new_after_raw != END {
            self.prev[new_after_raw] = visit;
        }
        if before == self.tail {
            self.tail = visit;
        }

        Some(Shift {
            old_before,
            old_after,
            new_after: self.next(visit),
        })
    }

    /// Replaces `old` by `new` at the same position.
    ///
    /// Directed tours use this to change the turn of a visit.
    pub fn replace(&mut self, old: usize, new: usize) -> RoutingResult<()> {
        if !self.contains(old) {
            return Err(RoutingError::MissingVisit(old));
        }
        if new >= self.capacity() {
            return Err(RoutingError::VisitOutOfRange {
                visit: new,
                capacity: self.capacity(),
            });
        }
        if old == new {
            return Ok(());
        }
        if self.contains(new) {
            return Err(RoutingError::DuplicateVisit(new));
        }

        let n = self.next[old];
        let p = self.prev[old];
        if self.count == 1 && n == old {
            self.next[new] = new;
            self.prev[new] = new;
        } else {
            self.next[new] = n;
            self.prev[new] = p;
            if n != END {
                self.prev[n] = new;
            }
            if p != END {
                self.next[p] = new;
            }
        }
        self.next[old] = ABSENT;
        self.prev[old] = ABSENT;

        if self.first == old {
            self.first = new;
        }
        if self.tail == old {
            self.tail = new;
        }
        if self.last == Some(old) {
            self.last = Some(new);
        }
        Ok(())
    }

    /// Reverses the visits strictly after `before` up to and including `end`.
    ///
    /// Returns `false` without touching the tour if `end` cannot be reached
    /// from `before` without passing `first` or a fixed last visit.
    pub fn reverse_after(&mut self, before: usize, end: usize) -> bool {
        if !self.contains(before) || !self.contains(end) || before == end {
            return false;
        }

        let mut segment = Vec::new();
        let mut current = self.next[before];
        loop {
            if current == END || current == self.first || self.is_fixed_last(current) {
                return false;
            }
            segment.push(current);
            if current == end {
                break;
            }
            current = self.next[current];
        }
        if segment.len() < 2 {
            return true;
        }

        let after = self.next[end];
        let start = segment[0];
        let mut link = before;
        for &v in segment.iter().rev() {
            self.next[link] = v;
            self.prev[v] = link;
            link = v;
        }
        self.next[start] = after;
        if after != END {
            self.prev[after] = start;
        }
        if self.tail == end {
            self.tail = start;
        }
        true
    }

    /// Swaps the segment `next(v1)..=v3` with the segment `next(v3)..=v5`.
    ///
    /// The caller guarantees that `v1`, `v3`, `v5` appear in that order, that
    /// `v3 != v1` and `v5 != v3`, and that neither segment holds `first` or a
    /// fixed last visit.
    pub(crate) fn swap_segments(&mut self, v1: usize, v3: usize, v5: usize) {
        let v2 = self.next[v1];
        let v4 = self.next[v3];
        let v6 = self.next[v5];
        debug_assert!(v1 != v3 && v3 != v5);

        self.next[v1] = v4;
        self.prev[v4] = v1;
        self.next[v5] = v2;
        self.prev[v2] = v5;
        self.next[v3] = v6;
        if v6 != END {
            self.prev[v6] = v3;
        }
        if self.tail == v5 {
            self.tail = v3;
        }
    }

    fn unlink(&mut self, visit: usize) {
        let n = self.next[visit];
        let p = self.prev[visit];
        if p != END {
            self.next[p] = n;
        }
        if n != END {
            self.prev[n] = p;
        }
        if self.tail == visit {
            self.tail = p;
        }
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for v in self.iter() {
            write!(f, "{sep}{v}")?;
            sep = " -> ";
        }
        if self.is_closed() {
            write!(f, " -> {}", self.first)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Tour {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the visits of a [`Tour`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    tour: &'a Tour,
    current: Option<usize>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let v = self.current?;
        self.remaining -= 1;
        self.current = self.tour.next(v);
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Iterator over consecutive `(from, to)` pairs of a [`Tour`].
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
    tour: &'a Tour,
    current: usize,
    remaining: usize,
}

impl Iterator for Pairs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.remaining == 0 {
            return None;
        }
        let from = self.current;
        let to = self.tour.next(from)?;
        self.remaining -= 1;
        self.current = to;
        Some((from, to))
    }
}
