//! Nearest-neighbour constructive heuristic.
//!
//! Builds a tour greedily: starting from the first visit, always append the
//! nearest unplaced visit. For selective problems a visit is only appended
//! if the tour can still be finished within the weight budget.
//!
//! # Complexity
//!
//! O(n²) where n = number of visits.
//!
//! # Reference
//!
//! This is the simplest constructive heuristic for the TSP. While tour
//! quality is typically 15-25% above optimal, it provides a fast baseline.

use std::sync::Arc;

use crate::evaluation::{Candidate, Objective};
use crate::models::TourProblem;
use crate::random::RandomGenerator;
use crate::strategies::Generator;
use crate::tours::Tour;

/// Greedy nearest-neighbour tour construction.
///
/// # Examples
///
/// ```
/// use u_tour::constructive::NearestNeighbourGenerator;
/// use u_tour::models::TspProblem;
///
/// let problem = TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).unwrap();
/// let tour = NearestNeighbourGenerator::new().build(&problem);
/// assert_eq!(tour.to_vec(), vec![0, 1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbourGenerator;

impl NearestNeighbourGenerator {
    /// Creates the generator.
    pub fn new() -> Self {
        Self
    }

    /// Builds the greedy tour.
    pub fn build<P>(&self, problem: &P) -> Tour
    where
        P: TourProblem + ?Sized,
    {
        let mut tour = problem.empty_tour();
        let end = tour.last();
        let max = problem.max();

        let mut unplaced = problem.free_candidates();
        let mut current = tour.first();
        let mut weight = 0.0;

        loop {
            // Nearest unplaced visit after which the tour can still be closed
            let mut best: Option<(usize, f64)> = None;
            for (i, &v) in unplaced.iter().enumerate() {
                let d = problem.weight(current, v);
                let finish = end.map_or(0.0, |e| problem.weight(v, e));
                if weight + d + finish > max {
                    continue;
                }
                if best.is_none_or(|(_, bd)| d < bd) {
                    best = Some((i, d));
                }
            }

            match best {
                Some((i, d)) => {
                    let next = unplaced.remove(i);
                    if tour.insert_after(current, next).is_err() {
                        break;
                    }
                    weight += d;
                    current = next;
                }
                None => break,
            }
        }
        tour
    }
}

impl<O: Objective> Generator<O> for NearestNeighbourGenerator {
    fn name(&self) -> &str {
        "nearest-neighbour"
    }

    fn generate(
        &self,
        problem: &Arc<O::Problem>,
        objective: &Arc<O>,
        _random: &mut RandomGenerator,
    ) -> Candidate<O> {
        let tour = self.build(problem.as_ref());
        Candidate::new(Arc::clone(problem), Arc::clone(objective), tour)
    }
}
