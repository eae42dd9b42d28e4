//! Evaluated candidate solutions.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::tours::Tour;

use super::Objective;

/// A tour bound to its problem, its objective, and its current fitness.
///
/// The fitness always equals `objective.calculate(problem, tour)` between
/// operator calls. Operators that mutate the tour through
/// [`parts_mut`](Candidate::parts_mut) are responsible for updating the
/// fitness before returning.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::evaluation::{Candidate, TourWeightObjective};
/// use u_tour::models::TspProblem;
/// use u_tour::tours::Tour;
///
/// let problem = Arc::new(TspProblem::from_fn(3, 0, Some(0), |i, j| (i + j) as f64).unwrap());
/// let objective = Arc::new(TourWeightObjective::<TspProblem>::new());
/// let tour = Tour::new([0, 1, 2], Some(0)).unwrap();
///
/// let candidate = Candidate::new(problem, objective, tour);
/// // (0+1) + (1+2) + (2+0)
/// assert_eq!(*candidate.fitness(), 6.0);
/// ```
pub struct Candidate<O: Objective> {
    problem: Arc<O::Problem>,
    objective: Arc<O>,
    tour: Tour,
    fitness: O::Fitness,
}

impl<O: Objective> Candidate<O> {
    /// Binds a tour to its problem and evaluates it.
    pub fn new(problem: Arc<O::Problem>, objective: Arc<O>, tour: Tour) -> Self {
        let fitness = objective.calculate(&problem, &tour);
        Self {
            problem,
            objective,
            tour,
            fitness,
        }
    }

    /// The problem instance.
    pub fn problem(&self) -> &O::Problem {
        &self.problem
    }

    /// The shared handle to the problem instance.
    pub fn shared_problem(&self) -> &Arc<O::Problem> {
        &self.problem
    }

    /// The objective.
    pub fn objective(&self) -> &O {
        &self.objective
    }

    /// The shared handle to the objective.
    pub fn shared_objective(&self) -> &Arc<O> {
        &self.objective
    }

    /// The tour.
    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    /// The current fitness.
    pub fn fitness(&self) -> &O::Fitness {
        &self.fitness
    }

    /// Splits the candidate for in-place operators.
    ///
    /// The caller must leave `fitness` consistent with `tour`.
    pub fn parts_mut(&mut self) -> (&O::Problem, &O, &mut Tour, &mut O::Fitness) {
        (
            &self.problem,
            &self.objective,
            &mut self.tour,
            &mut self.fitness,
        )
    }

    /// Replaces the tour and re-evaluates it.
    pub fn set_tour(&mut self, tour: Tour) {
        self.fitness = self.objective.calculate(&self.problem, &tour);
        self.tour = tour;
    }

    /// Re-evaluates the fitness from scratch.
    pub fn recalculate(&mut self) {
        self.fitness = self.objective.calculate(&self.problem, &self.tour);
    }

    /// Orders two candidates by fitness; `Less` means `self` is better.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.objective.compare(&self.fitness, &other.fitness)
    }

    /// Returns `true` if `self` is strictly better than `other`.
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }

    /// Consumes the candidate and returns its tour.
    pub fn into_tour(self) -> Tour {
        self.tour
    }
}

impl<O: Objective> Clone for Candidate<O> {
    fn clone(&self) -> Self {
        Self {
            problem: Arc::clone(&self.problem),
            objective: Arc::clone(&self.objective),
            tour: self.tour.clone(),
            fitness: self.fitness.clone(),
        }
    }
}

impl<O: Objective> fmt::Debug for Candidate<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("objective", &self.objective.name())
            .field("tour", &self.tour.to_vec())
            .field("fitness", &self.fitness)
            .finish()
    }
}

impl<O: Objective> fmt::Display for Candidate<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.fitness, self.tour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::TourWeightObjective;
    use crate::models::TspProblem;

    fn candidate(visits: &[usize]) -> Candidate<TourWeightObjective<TspProblem>> {
        let problem = Arc::new(
            TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).expect("valid"),
        );
        let tour = Tour::new(visits.iter().copied(), Some(0)).expect("valid");
        Candidate::new(problem, Arc::new(TourWeightObjective::new()), tour)
    }

    #[test]
    fn test_new_calculates_fitness() {
        let c = candidate(&[0, 1, 2, 3]);
        assert!((c.fitness() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_compare() {
        let good = candidate(&[0, 1, 2, 3]);
        let bad = candidate(&[0, 2, 1, 3]);
        assert!(good.is_better_than(&bad));
        assert!(!bad.is_better_than(&good));
        assert_eq!(good.compare(&good.clone()), Ordering::Equal);
    }

    #[test]
    fn test_set_tour() {
        let mut c = candidate(&[0, 2, 1, 3]);
        c.set_tour(Tour::new([0, 1, 2, 3], Some(0)).expect("valid"));
        assert!((c.fitness() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_parts_mut_and_recalculate() {
        let mut c = candidate(&[0, 1, 2, 3]);
        {
            let (_, _, tour, _) = c.parts_mut();
            tour.shift_after(1, 2).expect("shift");
        }
        c.recalculate();
        // 0 -> 2 -> 1 -> 3 -> 0 = 2 + 1 + 2 + 3
        assert!((c.fitness() - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_clone_shares_problem() {
        let c = candidate(&[0, 1, 2, 3]);
        let d = c.clone();
        assert!(Arc::ptr_eq(c.shared_problem(), d.shared_problem()));
        assert_eq!(d.tour(), c.tour());
    }

    #[test]
    fn test_display() {
        let c = candidate(&[0, 1, 2, 3]);
        assert_eq!(c.to_string(), "[6.0] 0 -> 1 -> 2 -> 3 -> 0");
    }
}
