//! Exhaustive enumeration for tiny problems.
//!
//! # Algorithm
//!
//! Heap's algorithm enumerates every order of the free visits, each placed
//! between the fixed endpoints; the best evaluated order wins.
//!
//! # Complexity
//!
//! O(n! · n). Only practical below roughly ten visits.
//!
//! # Reference
//!
//! Heap, B.R. (1963). "Permutations by Interchanges", *The Computer
//! Journal* 6(3), 293-294.

use std::cmp::Ordering;
use std::sync::Arc;

use log::warn;

use crate::evaluation::{Candidate, Objective};
use crate::models::TourProblem;
use crate::random::RandomGenerator;
use crate::strategies::Generator;
use crate::tours::Tour;

/// Visit counts above which enumeration is logged as expensive.
const LARGE_ENUMERATION: usize = 10;

/// Finds the best tour over `visits` by trying every order.
///
/// The tour starts at the problem's first visit and ends at its fixed last
/// visit, if any; `visits` must not contain either. Returns `None` if a tour
/// cannot be built from `visits`.
///
/// # Examples
///
/// ```
/// use u_tour::constructive::brute_force;
/// use u_tour::evaluation::TourWeightObjective;
/// use u_tour::models::TspProblem;
///
/// let ring = |i: usize, j: usize| if j == (i + 1) % 4 { 1.0 } else { 10.0 };
/// let problem = TspProblem::from_fn(4, 0, Some(0), ring).unwrap();
/// let objective = TourWeightObjective::<TspProblem>::new();
///
/// let (tour, fitness) = brute_force(&problem, &objective, &[3, 2, 1]).unwrap();
/// assert_eq!(tour.to_vec(), vec![0, 1, 2, 3]);
/// assert_eq!(fitness, 4.0);
/// ```
pub fn brute_force<O: Objective>(
    problem: &O::Problem,
    objective: &O,
    visits: &[usize],
) -> Option<(Tour, O::Fitness)> {
    if visits.len() > LARGE_ENUMERATION {
        warn!("brute force: enumerating {} visits", visits.len());
    }

    let first = problem.first();
    let last = problem.last();
    let fixed_last = last.filter(|&l| l != first);
    let build = |order: &[usize]| {
        let sequence = std::iter::once(first)
            .chain(order.iter().copied())
            .chain(fixed_last);
        Tour::with_capacity(problem.count(), sequence, last).ok()
    };

    let mut best: Option<(Tour, O::Fitness)> = None;
    let mut consider = |order: &[usize]| -> bool {
        let Some(tour) = build(order) else {
            return false;
        };
        let fitness = objective.calculate(problem, &tour);
        if best
            .as_ref()
            .is_none_or(|(_, f)| objective.compare(&fitness, f) == Ordering::Less)
        {
            best = Some((tour, fitness));
        }
        true
    };

    let mut order = visits.to_vec();
    if !consider(&order) {
        return None;
    }

    // Heap's algorithm, iterative form.
    let n = order.len();
    let mut c = vec![0; n];
    let mut i = 1;
    while i < n {
        if c[i] < i {
            if i % 2 == 0 {
                order.swap(0, i);
            } else {
                order.swap(c[i], i);
            }
            consider(&order);
            c[i] += 1;
            i = 1;
        } else {
            c[i] = 0;
            i += 1;
        }
    }
    best
}

/// Generates the optimal tour by exhaustive enumeration.
///
/// Only suitable for tiny problems; see [`brute_force`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceGenerator;

impl BruteForceGenerator {
    /// Creates the generator.
    pub fn new() -> Self {
        Self
    }
}

impl<O: Objective> Generator<O> for BruteForceGenerator {
    fn name(&self) -> &str {
        "brute-force"
    }

    fn generate(
        &self,
        problem: &Arc<O::Problem>,
        objective: &Arc<O>,
        _random: &mut RandomGenerator,
    ) -> Candidate<O> {
        let tour = brute_force(problem.as_ref(), objective.as_ref(), &problem.free_candidates())
            .map_or_else(|| problem.empty_tour(), |(tour, _)| tour);
        Candidate::new(Arc::clone(problem), Arc::clone(objective), tour)
    }
}
