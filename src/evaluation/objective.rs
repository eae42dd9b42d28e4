//! Objective contract.

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::models::TourProblem;
use crate::tours::Tour;

/// Defines a fitness on tours together with its arithmetic and total order.
///
/// Strategies and operators only ever talk to fitness values through this
/// trait, so a scalar weight and a composite (violations, time) fitness are
/// handled by the same search code. Fitness is minimised: `compare(a, b)`
/// returns [`Ordering::Less`] when `a` is the better value.
pub trait Objective: Send + Sync {
    /// The problem type this objective evaluates tours of.
    type Problem: TourProblem;
    /// The fitness value type.
    type Fitness: Clone + Debug + Send + Sync;

    /// Short human-readable name, used in log output.
    fn name(&self) -> &str;

    /// The neutral element of [`add`](Objective::add).
    fn zero(&self) -> Self::Fitness;

    /// A fitness worse than any reachable one.
    fn infinite(&self) -> Self::Fitness;

    /// Evaluates a tour from scratch.
    fn calculate(&self, problem: &Self::Problem, tour: &Tour) -> Self::Fitness;

    /// `a + b`.
    fn add(&self, a: &Self::Fitness, b: &Self::Fitness) -> Self::Fitness;

    /// `a - b`.
    fn subtract(&self, a: &Self::Fitness, b: &Self::Fitness) -> Self::Fitness;

    /// Total order on fitness values; `Less` means `a` is better.
    fn compare(&self, a: &Self::Fitness, b: &Self::Fitness) -> Ordering;

    /// Returns `true` if `fitness` equals [`zero`](Objective::zero).
    fn is_zero(&self, fitness: &Self::Fitness) -> bool;

    /// The fitness after a move that keeps the visit set and changes the
    /// tour weight by `delta`.
    ///
    /// Operators that know their weight delta call this before falling back
    /// to [`calculate`](Objective::calculate). Returns `None` when the fitness
    /// is not a function of the weight alone.
    fn weight_delta(&self, fitness: &Self::Fitness, delta: f64) -> Option<Self::Fitness> {
        let _ = (fitness, delta);
        None
    }

    /// Returns `true` if `after` is strictly better than `before`.
    fn is_improvement(&self, before: &Self::Fitness, after: &Self::Fitness) -> bool {
        self.compare(after, before) == Ordering::Less
    }
}

/// Compares two weights, treating differences below `1e-10` as ties.
pub(crate) fn compare_weights(a: f64, b: f64) -> Ordering {
    if (a - b).abs() < 1e-10 {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}
