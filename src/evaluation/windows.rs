//! Time-window objective.

use std::cmp::Ordering;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::models::TourProblem;
use crate::tours::Tour;

use super::objective::compare_weights;
use super::{Objective, TourEvaluator};

/// Violated windows first, elapsed time second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowFitness {
    /// Number of visits reached after their last window closed.
    pub violations: isize,
    /// Elapsed time including waits.
    pub time: f64,
}

impl TimeWindowFitness {
    /// Creates a fitness value.
    pub fn new(violations: isize, time: f64) -> Self {
        Self { violations, time }
    }
}

/// Minimises time-window violations, then the time to complete the tour.
///
/// Problems without windows reduce to minimising the tour weight.
///
/// # Examples
///
/// ```
/// use u_tour::evaluation::{Objective, TimeWindowObjective};
/// use u_tour::models::{TimeWindow, TspProblem};
/// use u_tour::tours::Tour;
///
/// let problem = TspProblem::from_fn(3, 0, None, |i, j| (i as f64 - j as f64).abs())
///     .unwrap()
///     .with_windows(vec![
///         TimeWindow::unlimited(),
///         TimeWindow::between(0.0, 1.5).unwrap(),
///         TimeWindow::unlimited(),
///     ])
///     .unwrap();
///
/// let objective = TimeWindowObjective::new();
/// let late = objective.calculate(&problem, &Tour::new([0, 2, 1], None).unwrap());
/// let early = objective.calculate(&problem, &Tour::new([0, 1, 2], None).unwrap());
/// assert_eq!(late.violations, 1);
/// assert!(objective.is_improvement(&late, &early));
/// ```
#[derive(Debug)]
pub struct TimeWindowObjective<P> {
    _problem: PhantomData<fn() -> P>,
}

impl<P> TimeWindowObjective<P> {
    /// Creates the objective.
    pub fn new() -> Self {
        Self {
            _problem: PhantomData,
        }
    }
}

impl<P> Default for TimeWindowObjective<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for TimeWindowObjective<P> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<P: TourProblem> Objective for TimeWindowObjective<P> {
    type Problem = P;
    type Fitness = TimeWindowFitness;

    fn name(&self) -> &str {
        "time-windows"
    }

    fn zero(&self) -> TimeWindowFitness {
        TimeWindowFitness::new(0, 0.0)
    }

    fn infinite(&self) -> TimeWindowFitness {
        TimeWindowFitness::new(isize::MAX, f64::INFINITY)
    }

    fn calculate(&self, problem: &P, tour: &Tour) -> TimeWindowFitness {
        let schedule = TourEvaluator::new(problem).schedule(tour);
        TimeWindowFitness::new(schedule.violations() as isize, schedule.duration())
    }

    fn add(&self, a: &TimeWindowFitness, b: &TimeWindowFitness) -> TimeWindowFitness {
        TimeWindowFitness::new(a.violations.saturating_add(b.violations), a.time + b.time)
    }

    fn subtract(&self, a: &TimeWindowFitness, b: &TimeWindowFitness) -> TimeWindowFitness {
        TimeWindowFitness::new(a.violations.saturating_sub(b.violations), a.time - b.time)
    }

    fn compare(&self, a: &TimeWindowFitness, b: &TimeWindowFitness) -> Ordering {
        a.violations
            .cmp(&b.violations)
            .then_with(|| compare_weights(a.time, b.time))
    }

    fn is_zero(&self, fitness: &TimeWindowFitness) -> bool {
        fitness.violations == 0 && fitness.time.abs() < 1e-10
    }
}
