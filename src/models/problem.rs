//! Tour problem trait and the TSP problem family.

use std::sync::OnceLock;

use crate::distance::{NearestNeighbourArray, WeightMatrix};
use crate::error::{RoutingError, RoutingResult};
use crate::tours::Tour;

use super::TimeWindow;

/// Default number of neighbours kept per id for pruned local search.
pub const DEFAULT_NEAREST_COUNT: usize = 10;

/// Defines a tour-optimization problem instance.
///
/// Operators and generators only see a problem through this trait: the id
/// space, the fixed endpoints, and the travel cost between two ids. Problems
/// are immutable once built and are shared read-only between searches.
///
/// # Examples
///
/// ```
/// use u_tour::models::TourProblem;
/// use u_tour::distance::NearestNeighbourArray;
/// use std::sync::OnceLock;
///
/// struct Line {
///     nearest: OnceLock<NearestNeighbourArray>,
/// }
///
/// impl TourProblem for Line {
///     fn count(&self) -> usize { 4 }
///     fn first(&self) -> usize { 0 }
///     fn last(&self) -> Option<usize> { Some(0) }
///     fn weight(&self, from: usize, to: usize) -> f64 {
///         (from as f64 - to as f64).abs()
///     }
///     fn nearest(&self) -> &NearestNeighbourArray {
///         self.nearest.get_or_init(|| NearestNeighbourArray::new(4, 2, |a, b| self.weight(a, b)))
///     }
/// }
///
/// let line = Line { nearest: OnceLock::new() };
/// assert_eq!(line.empty_tour().to_vec(), vec![0]);
/// assert!(line.max().is_infinite());
/// ```
pub trait TourProblem: Send + Sync {
    /// Size of the id space; every tour id is below it.
    fn count(&self) -> usize;

    /// Id every tour starts with.
    fn first(&self) -> usize;

    /// Fixed last id: `None` for open tours, `Some(first)` for closed loops.
    fn last(&self) -> Option<usize>;

    /// Travel cost from `from` to `to`.
    fn weight(&self, from: usize, to: usize) -> f64;

    /// Budget on the total tour weight; infinite unless the problem is selective.
    fn max(&self) -> f64 {
        f64::INFINITY
    }

    /// Time windows indexed by visit, if the problem has any.
    fn windows(&self) -> Option<&[TimeWindow]> {
        None
    }

    /// The visit a tour id stands for. Identity unless ids carry extra state.
    fn visit_of(&self, id: usize) -> usize {
        id
    }

    /// One insertable id per visit, in visit order.
    fn candidates(&self) -> Vec<usize> {
        (0..self.count()).collect()
    }

    /// Precomputed nearest neighbours over the id space.
    fn nearest(&self) -> &NearestNeighbourArray;

    /// Candidates other than the fixed endpoints.
    fn free_candidates(&self) -> Vec<usize> {
        let first = self.visit_of(self.first());
        let last = self.last().map(|l| self.visit_of(l));
        self.candidates()
            .into_iter()
            .filter(|&id| {
                let visit = self.visit_of(id);
                visit != first && Some(visit) != last
            })
            .collect()
    }

    /// Returns `true` if the problem limits the tour weight.
    fn is_selective(&self) -> bool {
        self.max().is_finite()
    }

    /// A tour holding only the fixed endpoints.
    fn empty_tour(&self) -> Tour {
        Tour::endpoints(self.count(), self.first(), self.last())
    }
}

/// A travelling salesman problem over a weight matrix.
///
/// Covers the symmetric and asymmetric TSP (closed or open, optionally with
/// a distinct fixed last visit), the TSP with time windows
/// ([`with_windows`](TspProblem::with_windows)) and the selective TSP with a
/// weight budget ([`with_max`](TspProblem::with_max)).
///
/// # Examples
///
/// ```
/// use u_tour::models::{TourProblem, TspProblem};
///
/// let problem = TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).unwrap();
/// assert_eq!(problem.count(), 4);
/// assert_eq!(problem.weight(1, 3), 2.0);
/// assert!(!problem.is_selective());
/// ```
#[derive(Debug, Clone)]
pub struct TspProblem {
    first: usize,
    last: Option<usize>,
    weights: WeightMatrix,
    max: f64,
    windows: Option<Vec<TimeWindow>>,
    nearest_count: usize,
    nearest: OnceLock<NearestNeighbourArray>,
}

impl TspProblem {
    /// Creates a problem with the given endpoints.
    pub fn new(first: usize, last: Option<usize>, weights: WeightMatrix) -> RoutingResult<Self> {
        let size = weights.size();
        for v in std::iter::once(first).chain(last) {
            if v >= size {
                return Err(RoutingError::VisitOutOfRange {
                    visit: v,
                    capacity: size,
                });
            }
        }
        Ok(Self {
            first,
            last,
            weights,
            max: f64::INFINITY,
            windows: None,
            nearest_count: DEFAULT_NEAREST_COUNT,
            nearest: OnceLock::new(),
        })
    }

    /// Creates a closed-loop problem starting and ending at `first`.
    pub fn closed(first: usize, weights: WeightMatrix) -> RoutingResult<Self> {
        Self::new(first, Some(first), weights)
    }

    /// Creates an open problem starting at `first`.
    pub fn open(first: usize, weights: WeightMatrix) -> RoutingResult<Self> {
        Self::new(first, None, weights)
    }

    /// Creates a problem by evaluating a cost function for every pair.
    pub fn from_fn<F>(
        size: usize,
        first: usize,
        last: Option<usize>,
        cost: F,
    ) -> RoutingResult<Self>
    where
        F: Fn(usize, usize) -> f64,
    {
        Self::new(first, last, WeightMatrix::from_fn(size, cost))
    }

    /// Limits the total tour weight, turning the problem selective.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    /// Attaches one time window per visit.
    pub fn with_windows(mut self, windows: Vec<TimeWindow>) -> RoutingResult<Self> {
        if windows.len() != self.weights.size() {
            return Err(RoutingError::DimensionMismatch {
                expected: self.weights.size(),
                actual: windows.len(),
            });
        }
        self.windows = Some(windows);
        Ok(self)
    }

    /// Sets how many neighbours are kept per visit.
    pub fn with_nearest_count(mut self, k: usize) -> Self {
        self.nearest_count = k;
        self.nearest = OnceLock::new();
        self
    }

    /// The underlying weight matrix.
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }
}

impl TourProblem for TspProblem {
    fn count(&self) -> usize {
        self.weights.size()
    }

    fn first(&self) -> usize {
        self.first
    }

    fn last(&self) -> Option<usize> {
        self.last
    }

    #[inline]
    fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights.get(from, to)
    }

    fn max(&self) -> f64 {
        self.max
    }

    fn windows(&self) -> Option<&[TimeWindow]> {
        self.windows.as_deref()
    }

    fn nearest(&self) -> &NearestNeighbourArray {
        self.nearest.get_or_init(|| {
            NearestNeighbourArray::new(self.weights.size(), self.nearest_count, |i, j| {
                self.weights.get(i, j)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(i: usize, j: usize) -> f64 {
        (i as f64 - j as f64).abs()
    }

    #[test]
    fn test_new_validates_endpoints() {
        let wm = WeightMatrix::new(3);
        assert!(TspProblem::new(0, Some(2), wm.clone()).is_ok());
        assert_eq!(
            TspProblem::new(3, None, wm.clone()).err(),
            Some(RoutingError::VisitOutOfRange {
                visit: 3,
                capacity: 3
            })
        );
        assert!(TspProblem::new(0, Some(5), wm).is_err());
    }

    #[test]
    fn test_closed_and_open() {
        let closed = TspProblem::closed(1, WeightMatrix::new(3)).expect("valid");
        assert_eq!(closed.last(), Some(1));
        let open = TspProblem::open(1, WeightMatrix::new(3)).expect("valid");
        assert_eq!(open.last(), None);
    }

    #[test]
    fn test_empty_tour() {
        let p = TspProblem::from_fn(5, 0, Some(4), line).expect("valid");
        assert_eq!(p.empty_tour().to_vec(), vec![0, 4]);
        let c = TspProblem::from_fn(5, 2, Some(2), line).expect("valid");
        let t = c.empty_tour();
        assert_eq!(t.to_vec(), vec![2]);
        assert!(t.is_closed());
        assert_eq!(t.capacity(), 5);
    }

    #[test]
    fn test_selective() {
        let p = TspProblem::from_fn(3, 0, None, line)
            .expect("valid")
            .with_max(10.0);
        assert!(p.is_selective());
        assert_eq!(p.max(), 10.0);
    }

    #[test]
    fn test_windows() {
        let p = TspProblem::from_fn(2, 0, None, line).expect("valid");
        assert!(p.windows().is_none());
        assert!(p.clone().with_windows(vec![TimeWindow::unlimited()]).is_err());
        let p = p
            .with_windows(vec![TimeWindow::unlimited(), TimeWindow::unlimited()])
            .expect("sizes match");
        assert_eq!(p.windows().map(|w| w.len()), Some(2));
    }

    #[test]
    fn test_nearest_cached() {
        let p = TspProblem::from_fn(6, 0, None, line)
            .expect("valid")
            .with_nearest_count(2);
        assert_eq!(p.nearest().forward(0), &[1, 2]);
        assert!(std::ptr::eq(p.nearest(), p.nearest()));
    }

    #[test]
    fn test_default_candidates() {
        let p = TspProblem::from_fn(3, 0, None, line).expect("valid");
        assert_eq!(p.candidates(), vec![0, 1, 2]);
        assert_eq!(p.free_candidates(), vec![1, 2]);
        assert_eq!(p.visit_of(2), 2);
        let fixed = TspProblem::from_fn(4, 1, Some(3), line).expect("valid");
        assert_eq!(fixed.free_candidates(), vec![0, 2]);
    }
}
