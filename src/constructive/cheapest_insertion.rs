//! Cheapest-insertion tour construction.
//!
//! # Algorithm
//!
//! 1. Start from the fixed endpoints; unless the problem is selective, seed
//!    the tour with one visit chosen by the [`SeedRule`] (by default the
//!    visit farthest from the first visit)
//! 2. For every unplaced visit, find its cheapest insertion position
//! 3. Insert the visit with the globally cheapest insertion, as long as the
//!    tour weight stays within the budget
//! 4. Repeat until no visit can be inserted
//!
//! # Complexity
//!
//! O(n³) where n = number of visits.
//!
//! # Reference
//!
//! Rosenkrantz, D.J., Stearns, R.E. & Lewis, P.M. (1977). "An analysis of
//! several heuristics for the traveling salesman problem", *SIAM Journal on
//! Computing* 6(3), 563-581.

use std::sync::Arc;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::evaluation::{Candidate, Objective};
use crate::local_search::{best_insertion, insertion_cost, Insertion};
use crate::models::TourProblem;
use crate::random::seeds::{farthest_from, random_seed, with_close_neighbours};
use crate::random::RandomGenerator;
use crate::strategies::Generator;
use crate::tours::Tour;

use super::random_tour::append_point;

/// Picks the visit placed before cheapest insertion starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeedRule {
    /// The visit with the largest round trip from the first visit.
    #[default]
    Farthest,
    /// A uniformly random visit.
    Random,
    /// The visit whose nearest neighbours are most often still unplaced.
    CloseNeighbours,
}

/// Builds a tour by repeated cheapest insertion.
///
/// # Examples
///
/// ```
/// use u_tour::constructive::CheapestInsertionGenerator;
/// use u_tour::models::TspProblem;
/// use u_tour::random::RandomGenerator;
///
/// let problem = TspProblem::from_fn(5, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).unwrap();
/// let tour = CheapestInsertionGenerator::new().build(&problem, &mut RandomGenerator::new(0));
/// assert_eq!(tour.count(), 5);
/// assert_eq!(tour.weight(|i, j| (i as f64 - j as f64).abs()), 8.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestInsertionGenerator {
    seed: SeedRule,
}

impl CheapestInsertionGenerator {
    /// Creates the generator with the [`SeedRule::Farthest`] seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how the seed visit is chosen.
    pub fn with_seed_rule(mut self, seed: SeedRule) -> Self {
        self.seed = seed;
        self
    }

    /// The seed rule.
    pub fn seed_rule(&self) -> SeedRule {
        self.seed
    }

    /// Builds the tour.
    ///
    /// Only [`SeedRule::Random`] and ties under [`SeedRule::CloseNeighbours`]
    /// draw from `random`.
    pub fn build<P>(&self, problem: &P, random: &mut RandomGenerator) -> Tour
    where
        P: TourProblem + ?Sized,
    {
        let mut tour = problem.empty_tour();
        let max = problem.max();
        let mut weight = tour.weight(|a, b| problem.weight(a, b));
        let mut unplaced = problem.free_candidates();

        if !problem.is_selective() {
            let seed = match self.seed {
                SeedRule::Farthest => {
                    farthest_from(problem.first(), &unplaced, |a, b| problem.weight(a, b))
                }
                SeedRule::Random => random_seed(&unplaced, random),
                SeedRule::CloseNeighbours => {
                    with_close_neighbours(&unplaced, problem.nearest(), random)
                }
            };
            if let Some(seed) = seed {
                trace!("cheapest insertion: seed {seed} ({:?})", self.seed);
                let after = append_point(&tour);
                let cost = insertion_cost(problem, after, seed, tour.next(after));
                if tour.insert_after(after, seed).is_ok() {
                    weight += cost;
                    unplaced.retain(|&v| v != seed);
                }
            }
        }

        loop {
            let mut best: Option<(usize, Insertion)> = None;
            for (i, &v) in unplaced.iter().enumerate() {
                let Some(insertion) = best_insertion(problem, &tour, v) else {
                    continue;
                };
                if weight + insertion.cost > max {
                    continue;
                }
                if best.is_none_or(|(_, b)| insertion.cost < b.cost) {
                    best = Some((i, insertion));
                }
            }

            let Some((i, insertion)) = best else {
                break;
            };
            let visit = unplaced.remove(i);
            if tour.insert_after(insertion.after, visit).is_err() {
                break;
            }
            trace!("cheapest insertion: {visit} after {}", insertion.after);
            weight += insertion.cost;
        }
        tour
    }
}

impl<O: Objective> Generator<O> for CheapestInsertionGenerator {
    fn name(&self) -> &str {
        "cheapest-insertion"
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
