//! Uniformly random tour construction.

use std::sync::Arc;

use crate::evaluation::{Candidate, Objective};
use crate::local_search::insertion_cost;
use crate::models::TourProblem;
use crate::random::{RandomGenerator, RandomPool};
use crate::strategies::Generator;
use crate::tours::Tour;

/// The visit new visits are appended after: the tail, or the visit before a
/// fixed last.
pub(crate) fn append_point(tour: &Tour) -> usize {
    match tour.last() {
        Some(last) if tour.is_fixed_last(last) => tour.prev(last).unwrap_or(tour.first()),
        _ => tour.tail(),
    }
}

/// Builds a tour by appending the free visits in random order.
///
/// Visits that would push the tour weight over the problem budget are
/// skipped, so selective problems get a random feasible subset.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::constructive::RandomTourGenerator;
/// use u_tour::evaluation::TourWeightObjective;
/// use u_tour::models::TspProblem;
/// use u_tour::random::RandomGenerator;
/// use u_tour::strategies::Generator;
///
/// let problem = Arc::new(TspProblem::from_fn(6, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).unwrap());
/// let objective = Arc::new(TourWeightObjective::<TspProblem>::new());
/// let candidate = RandomTourGenerator::new().generate(&problem, &objective, &mut RandomGenerator::new(7));
/// assert_eq!(candidate.tour().count(), 6);
/// assert_eq!(candidate.tour().first(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTourGenerator;

impl RandomTourGenerator {
    /// Creates the generator.
    pub fn new() -> Self {
        Self
    }

    /// Builds the random tour without evaluating it.
    pub fn build<P>(&self, problem: &P, random: &mut RandomGenerator) -> Tour
    where
        P: TourProblem + ?Sized,
    {
        let mut tour = problem.empty_tour();
        let max = problem.max();
        let mut weight = tour.weight(|a, b| problem.weight(a, b));

        let mut pool = RandomPool::from_ids(problem.free_candidates());
        while let Some(visit) = pool.next(random) {
            let after = append_point(&tour);
            let cost = insertion_cost(problem, after, visit, tour.next(after));
            if weight + cost > max {
                continue;
            }
            if tour.insert_after(after, visit).is_ok() {
                weight += cost;
            }
        }
        tour
    }
}

impl<O: Objective> Generator<O> for RandomTourGenerator {
    fn name(&self) -> &str {
        "random"
    }

    fn generate(
        &self,
        problem: &Arc<O::Problem>,
        objective: &Arc<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O> {
        let tour = self.build(problem.as_ref(), random);
        Candidate::new(Arc::clone(problem), Arc::clone(objective), tour)
    }
}
