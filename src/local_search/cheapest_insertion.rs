//! Cheapest-insertion operator.
//!
//! # Algorithm
//!
//! Pull up to `n` visits into a pool, either by removing random movable
//! visits from the tour or by drawing visits the tour does not hold yet.
//! Then place each pooled visit at the position with the smallest
//! insertion delta:
//!
//! ```text
//! delta = d(from, v) + d(v, to) - d(from, to)
//! ```
//!
//! A visit is only placed if the tour weight stays within the problem
//! budget. The result is committed only if the objective improves.
//!
//! # Complexity
//!
//! O(n · m) per call for `m` tour visits.

use log::trace;

use crate::evaluation::{Candidate, Objective};
use crate::models::TourProblem;
use crate::random::{RandomGenerator, RandomPool};
use crate::strategies::Operator;
use crate::tours::Tour;

/// A position to insert a visit at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    /// Visit the new visit follows.
    pub after: usize,
    /// Visit that will follow the new visit; `None` appends to an open tail.
    pub before: Option<usize>,
    /// Weight added by the insertion.
    pub cost: f64,
}

/// Weight added by placing `visit` between `from` and `to`.
#[inline]
pub fn insertion_cost<P>(problem: &P, from: usize, visit: usize, to: Option<usize>) -> f64
where
    P: TourProblem + ?Sized,
{
    match to {
        Some(to) => {
            problem.weight(from, visit) + problem.weight(visit, to) - problem.weight(from, to)
        }
        None => problem.weight(from, visit),
    }
}

/// Finds the cheapest position for `visit` over all consecutive tour pairs.
///
/// Open tours may also be extended after their tail. Ties keep the earliest
/// position in tour order. Returns `None` if `visit` is already in the tour.
///
/// # Examples
///
/// ```
/// use u_tour::local_search::best_insertion;
/// use u_tour::models::TspProblem;
/// use u_tour::tours::Tour;
///
/// let problem = TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).unwrap();
/// let tour = Tour::with_capacity(4, [0, 1, 3], Some(0)).unwrap();
/// let best = best_insertion(&problem, &tour, 2).unwrap();
/// assert_eq!((best.after, best.before), (1, Some(3)));
/// assert_eq!(best.cost, 0.0);
/// ```
pub fn best_insertion<P>(problem: &P, tour: &Tour, visit: usize) -> Option<Insertion>
where
    P: TourProblem + ?Sized,
{
    if tour.contains(visit) {
        return None;
    }

    let mut best: Option<Insertion> = None;
    let mut consider = |after: usize, before: Option<usize>| {
        let cost = insertion_cost(problem, after, visit, before);
        if best.is_none_or(|b| cost < b.cost) {
            best = Some(Insertion {
                after,
                before,
                cost,
            });
        }
    };

    for (from, to) in tour.pairs() {
        consider(from, Some(to));
    }
    if tour.last().is_none() {
        consider(tour.tail(), None);
    }
    best
}

/// Removes and reinserts visits at their cheapest positions.
///
/// With `insert_new` set, draws visits that are not in the tour instead of
/// removing existing ones, which grows tours of selective problems.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::evaluation::{Candidate, TourWeightObjective};
/// use u_tour::local_search::CheapestInsertion;
/// use u_tour::models::TspProblem;
/// use u_tour::random::RandomGenerator;
/// use u_tour::strategies::Operator;
/// use u_tour::tours::Tour;
///
/// let problem = Arc::new(TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).unwrap());
/// let objective = Arc::new(TourWeightObjective::<TspProblem>::new());
/// let mut candidate = Candidate::new(problem, objective, Tour::new([0, 2, 1, 3], Some(0)).unwrap());
///
/// let op = CheapestInsertion::new(3);
/// let mut random = RandomGenerator::new(1);
/// while op.apply(&mut candidate, &mut random) {}
/// assert!(*candidate.fitness() <= 8.0);
/// ```
#[derive(Debug, Clone)]
pub struct CheapestInsertion {
    n: usize,
    insert_new: bool,
}

impl CheapestInsertion {
    /// Removes and reinserts up to `n` visits.
    pub fn new(n: usize) -> Self {
        Self {
            n: n.max(1),
            insert_new: false,
        }
    }

    /// Inserts up to `n` visits that are not yet in the tour.
    pub fn inserting_new(n: usize) -> Self {
        Self {
            n: n.max(1),
            insert_new: true,
        }
    }

    /// Maximum number of visits pooled per call.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns `true` if unvisited visits are pulled in.
    pub fn insert_new(&self) -> bool {
        self.insert_new
    }

    /// Runs one pull-and-insert round.
    ///
    /// Returns the fitness delta `after - before` and whether it is an
    /// improvement. The candidate only changes on improvement.
    pub fn insert<O: Objective>(
        &self,
        candidate: &mut Candidate<O>,
        random: &mut RandomGenerator,
    ) -> (O::Fitness, bool) {
        let problem = candidate.problem();
        let objective = candidate.objective();
        let mut tour = candidate.tour().clone();

        let pool = if self.insert_new {
            self.draw_new(problem, &tour, random)
        } else {
            self.remove_random(&mut tour, random)
        };
        if pool.is_empty() {
            return (objective.zero(), false);
        }

        let max = problem.max();
        let mut weight = tour.weight(|a, b| problem.weight(a, b));
        for &visit in &pool {
            let Some(insertion) = best_insertion(problem, &tour, visit) else {
                continue;
            };
            if weight + insertion.cost > max {
                trace!("cheapest insertion: {visit} exceeds budget");
                continue;
            }
            if tour.insert_after(insertion.after, visit).is_ok() {
                weight += insertion.cost;
            }
        }

        let after = objective.calculate(problem, &tour);
        let delta = objective.subtract(&after, candidate.fitness());
        let improved = objective.is_improvement(candidate.fitness(), &after);
        if improved {
            candidate.set_tour(tour);
        }
        (delta, improved)
    }

    fn remove_random(&self, tour: &mut Tour, random: &mut RandomGenerator) -> Vec<usize> {
        let movable: Vec<usize> = tour
            .iter()
            .filter(|&v| v != tour.first() && !tour.is_fixed_last(v))
            .collect();
        let mut draw = RandomPool::from_ids(movable);
        let mut pool = Vec::with_capacity(self.n);
        while pool.len() < self.n {
            let Some(visit) = draw.next(random) else {
                break;
            };
            if tour.remove(visit).is_ok() {
                pool.push(visit);
            }
        }
        pool
    }

    fn draw_new<P>(&self, problem: &P, tour: &Tour, random: &mut RandomGenerator) -> Vec<usize>
    where
        P: TourProblem + ?Sized,
    {
        let mut placed = vec![false; problem.count()];
        for v in tour.iter() {
            placed[problem.visit_of(v)] = true;
        }
        let unplaced: Vec<usize> = problem
            .free_candidates()
            .into_iter()
            .filter(|&id| !placed[problem.visit_of(id)])
            .collect();
        let mut draw = RandomPool::from_ids(unplaced);
        std::iter::from_fn(|| draw.next(random))
            .take(self.n)
            .collect()
    }
}

impl<O: Objective> Operator<O> for CheapestInsertion {
    fn name(&self) -> &str {
        "cheapest-insertion"
    }

    fn apply(&self, candidate: &mut Candidate<O>, random: &mut RandomGenerator) -> bool {
        self.insert(candidate, random).1
    }
}
