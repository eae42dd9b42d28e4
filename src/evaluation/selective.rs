//! Selective TSP objective.

use std::cmp::Ordering;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::models::TourProblem;
use crate::tours::Tour;

use super::objective::compare_weights;
use super::Objective;

/// Visit count first (more is better), weight second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectiveFitness {
    /// Number of visits in the tour.
    pub visits: isize,
    /// Total tour weight.
    pub weight: f64,
}

impl SelectiveFitness {
    /// Creates a fitness value.
    pub fn new(visits: isize, weight: f64) -> Self {
        Self { visits, weight }
    }
}

/// Maximises the number of visits placed within the weight budget, then
/// minimises the weight.
///
/// Used with problems that set [`max`](crate::models::TourProblem::max);
/// operators keep tours within the budget.
///
/// # Examples
///
/// ```
/// use u_tour::evaluation::{Objective, SelectiveFitness, SelectiveObjective};
/// use u_tour::models::TspProblem;
///
/// let objective = SelectiveObjective::<TspProblem>::new();
/// let more = SelectiveFitness::new(5, 100.0);
/// let fewer = SelectiveFitness::new(4, 10.0);
/// assert!(objective.is_improvement(&fewer, &more));
/// ```
#[derive(Debug)]
pub struct SelectiveObjective<P> {
    _problem: PhantomData<fn() -> P>,
}

impl<P> SelectiveObjective<P> {
    /// Creates the objective.
    pub fn new() -> Self {
        Self {
            _problem: PhantomData,
        }
    }
}

impl<P> Default for SelectiveObjective<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for SelectiveObjective<P> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<P: TourProblem> Objective for SelectiveObjective<P> {
    type Problem = P;
    type Fitness = SelectiveFitness;

    fn name(&self) -> &str {
        "selective"
    }

    fn zero(&self) -> SelectiveFitness {
        SelectiveFitness::new(0, 0.0)
    }

    fn infinite(&self) -> SelectiveFitness {
        SelectiveFitness::new(0, f64::INFINITY)
    }

    fn calculate(&self, problem: &P, tour: &Tour) -> SelectiveFitness {
        SelectiveFitness::new(
            tour.count() as isize,
            tour.weight(|a, b| problem.weight(a, b)),
        )
    }

    fn weight_delta(&self, fitness: &SelectiveFitness, delta: f64) -> Option<SelectiveFitness> {
        Some(SelectiveFitness::new(fitness.visits, fitness.weight + delta))
    }

    fn add(&self, a: &SelectiveFitness, b: &SelectiveFitness) -> SelectiveFitness {
        SelectiveFitness::new(a.visits + b.visits, a.weight + b.weight)
    }

    fn subtract(&self, a: &SelectiveFitness, b: &SelectiveFitness) -> SelectiveFitness {
        SelectiveFitness::new(a.visits - b.visits, a.weight - b.weight)
    }

    fn compare(&self, a: &SelectiveFitness, b: &SelectiveFitness) -> Ordering {
        b.visits
            .cmp(&a.visits)
            .then_with(|| compare_weights(a.weight, b.weight))
    }

    fn is_zero(&self, fitness: &SelectiveFitness) -> bool {
        fitness.visits == 0 && fitness.weight.abs() < 1e-10
    }
}
