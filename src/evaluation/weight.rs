//! Total tour weight objective.

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::models::TourProblem;
use crate::tours::Tour;

use super::objective::compare_weights;
use super::Objective;

/// Minimises the sum of weights along the tour.
///
/// # Examples
///
/// ```
/// use u_tour::evaluation::{Objective, TourWeightObjective};
/// use u_tour::models::TspProblem;
/// use u_tour::tours::Tour;
///
/// let problem = TspProblem::from_fn(3, 0, None, |i, j| (i as f64 - j as f64).abs()).unwrap();
/// let objective = TourWeightObjective::new();
/// let tour = Tour::new([0, 2, 1], None).unwrap();
/// assert_eq!(objective.calculate(&problem, &tour), 3.0);
/// ```
#[derive(Debug)]
pub struct TourWeightObjective<P> {
    _problem: PhantomData<fn() -> P>,
}

impl<P> TourWeightObjective<P> {
    /// Creates the objective.
    pub fn new() -> Self {
        Self {
            _problem: PhantomData,
        }
    }
}

impl<P> Default for TourWeightObjective<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for TourWeightObjective<P> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<P: TourProblem> Objective for TourWeightObjective<P> {
    type Problem = P;
    type Fitness = f64;

    fn name(&self) -> &str {
        "weight"
    }

    fn zero(&self) -> f64 {
        0.0
    }

    fn infinite(&self) -> f64 {
        f64::INFINITY
    }

    fn calculate(&self, problem: &P, tour: &Tour) -> f64 {
        tour.weight(|a, b| problem.weight(a, b))
    }

    fn weight_delta(&self, fitness: &f64, delta: f64) -> Option<f64> {
        Some(fitness + delta)
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    fn subtract(&self, a: &f64, b: &f64) -> f64 {
        a - b
    }

    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        compare_weights(*a, *b)
    }

    fn is_zero(&self, fitness: &f64) -> bool {
        fitness.abs() < 1e-10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TspProblem;

    fn objective() -> TourWeightObjective<TspProblem> {
        TourWeightObjective::new()
    }

    #[test]
    fn test_calculate_closed_and_open() {
        let problem =
            TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).expect("valid");
        let closed = Tour::new([0, 1, 2, 3], Some(0)).expect("valid");
        let open = Tour::new([0, 1, 2, 3], None).expect("valid");
        assert!((objective().calculate(&problem, &closed) - 6.0).abs() < 1e-10);
        assert!((objective().calculate(&problem, &open) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_arithmetic() {
        let o = objective();
        assert_eq!(o.add(&2.0, &3.0), 5.0);
        assert_eq!(o.subtract(&2.0, &3.0), -1.0);
        assert!(o.is_zero(&o.zero()));
        assert!(!o.is_zero(&0.1));
        assert_eq!(o.compare(&o.zero(), &o.infinite()), Ordering::Less);
    }

    #[test]
    fn test_weight_delta_matches_calculate() {
        let problem =
            TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).expect("valid");
        let o = objective();
        let mut tour = Tour::new([0, 1, 2, 3], Some(0)).expect("valid");
        let before = o.calculate(&problem, &tour);
        tour.shift_after(1, 2).expect("shift");
        let after = o.calculate(&problem, &tour);
        assert_eq!(o.weight_delta(&before, after - before), Some(after));
    }

    #[test]
    fn test_is_improvement() {
        let o = objective();
        assert!(o.is_improvement(&10.0, &9.0));
        assert!(!o.is_improvement(&10.0, &10.0));
        assert!(!o.is_improvement(&10.0, &11.0));
    }
}
