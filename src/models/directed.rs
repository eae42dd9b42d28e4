//! Turn-penalised TSP over directed visit ids.
//!
//! Each location can be passed in four turns (see [`crate::tours::directed`]).
//! Travel weights are given between location sides, a `2n × 2n` matrix
//! indexed by `visit * 2 + direction`, and every turn carries a fixed penalty
//! charged when a visit is entered with that turn.

use std::sync::OnceLock;

use crate::distance::{NearestNeighbourArray, WeightMatrix};
use crate::error::{RoutingError, RoutingResult};
use crate::tours::directed::{self, arrival_side, departure_side, turn_of};
use crate::tours::{pack, Turn};

use super::problem::DEFAULT_NEAREST_COUNT;
use super::TourProblem;

/// A TSP in which each visit is entered and left in a chosen direction.
///
/// Tour ids are directed ids (`visit * 4 + turn`). The weight from `a` to `b`
/// is the side weight from the departure side of `a` to the arrival side of
/// `b`, plus the penalty for the turn taken at `b`.
///
/// # Examples
///
/// ```
/// use u_tour::distance::WeightMatrix;
/// use u_tour::models::{DirectedTspProblem, TourProblem};
/// use u_tour::tours::{pack, Turn};
///
/// // Two locations, four sides.
/// let sides = WeightMatrix::from_fn(4, |i, j| if i / 2 == j / 2 { 0.0 } else { 5.0 });
/// let problem = DirectedTspProblem::new(0, Some(0), sides, |t| {
///     if t.is_u_turn() { 100.0 } else { 0.0 }
/// }).unwrap();
///
/// assert_eq!(problem.count(), 8);
/// let a = pack(0, Turn::ForwardForward);
/// let b = pack(1, Turn::ForwardBackward);
/// assert_eq!(problem.weight(a, b), 105.0);
/// ```
#[derive(Debug, Clone)]
pub struct DirectedTspProblem {
    visits: usize,
    first: usize,
    last: Option<usize>,
    weights: WeightMatrix,
    penalties: [f64; 4],
    nearest_count: usize,
    nearest: OnceLock<NearestNeighbourArray>,
}

impl DirectedTspProblem {
    /// Creates a problem from side weights and a penalty per turn.
    ///
    /// `first` and `last` are visits (locations), not directed ids. The tour
    /// starts at `first` entered and left forward.
    pub fn new<F>(
        first: usize,
        last: Option<usize>,
        weights: WeightMatrix,
        penalty: F,
    ) -> RoutingResult<Self>
    where
        F: Fn(Turn) -> f64,
    {
        let sides = weights.size();
        if sides % 2 != 0 {
            return Err(RoutingError::DimensionMismatch {
                expected: sides + 1,
                actual: sides,
            });
        }
        let visits = sides / 2;
        for v in std::iter::once(first).chain(last) {
            if v >= visits {
                return Err(RoutingError::VisitOutOfRange {
                    visit: v,
                    capacity: visits,
                });
            }
        }
        Ok(Self {
            visits,
            first,
            last,
            weights,
            penalties: Turn::ALL.map(penalty),
            nearest_count: DEFAULT_NEAREST_COUNT,
            nearest: OnceLock::new(),
        })
    }

    /// Sets how many neighbours are kept per directed id.
    pub fn with_nearest_count(mut self, k: usize) -> Self {
        self.nearest_count = k;
        self.nearest = OnceLock::new();
        self
    }

    /// Number of locations.
    pub fn visits(&self) -> usize {
        self.visits
    }

    /// Penalty charged for entering a visit with `turn`.
    pub fn penalty(&self, turn: Turn) -> f64 {
        self.penalties[turn as usize]
    }

    /// The side weight matrix.
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    fn directed_weight(&self, from: usize, to: usize) -> f64 {
        self.weights.get(departure_side(from), arrival_side(to)) + self.penalty(turn_of(to))
    }
}

impl TourProblem for DirectedTspProblem {
    fn count(&self) -> usize {
        self.visits * 4
    }

    fn first(&self) -> usize {
        pack(self.first, Turn::ForwardForward)
    }

    fn last(&self) -> Option<usize> {
        self.last.map(|l| pack(l, Turn::ForwardForward))
    }

    #[inline]
    fn weight(&self, from: usize, to: usize) -> f64 {
        self.directed_weight(from, to)
    }

    fn visit_of(&self, id: usize) -> usize {
        directed::visit_of(id)
    }

    fn candidates(&self) -> Vec<usize> {
        (0..self.visits)
            .map(|v| pack(v, Turn::ForwardForward))
            .collect()
    }

    fn nearest(&self) -> &NearestNeighbourArray {
        self.nearest.get_or_init(|| {
            NearestNeighbourArray::with_filter(
                self.count(),
                self.nearest_count,
                |a, b| self.directed_weight(a, b),
                |a, b| directed::visit_of(a) == directed::visit_of(b),
            )
        })
    }
}
