//! 3-opt hill climbing with neighbour lists and don't-look bits.
//!
//! # Algorithm
//!
//! The move is the reversal-free 3-opt exchange (or-3opt): the tour
//!
//! ```text
//! v1 → v2 … v3 → v4 … v5 → v6
//! ```
//!
//! is reconnected as `v1 → v4 … v5 → v2 … v3 → v6`, swapping the two
//! segments without reversing either, so the delta is exact for asymmetric
//! weights:
//!
//! ```text
//! delta = d(v1, v4) + d(v5, v2) + d(v3, v6) - d(v1, v2) - d(v3, v4) - d(v5, v6)
//! ```
//!
//! Instead of all O(n³) triples, `v4` is drawn from the forward neighbours
//! of `v1` and `v5` from the backward neighbours of `v2`, so both new edges
//! are short. Each visit carries a don't-look bit: once a visit yields no
//! improving move it is skipped until one of the visits around an applied
//! move clears it again. The climb ends after a pass in which every visit
//! was skipped or failed.
//!
//! # Complexity
//!
//! O(n · k²) candidate exchanges per pass for `k` neighbours. Objectives
//! with a [`weight_delta`](crate::evaluation::Objective::weight_delta) take
//! each exchange at O(1); others, and problems with time windows, re-evaluate
//! the tour. An applied move renumbers only the two swapped segments.
//!
//! # Reference
//!
//! Lin, S. (1965). "Computer Solutions of the Traveling Salesman Problem",
//! *Bell System Technical Journal* 44(10), 2245-2269.
//!
//! Bentley, J.L. (1992). "Fast algorithms for geometric traveling salesman
//! problems", *ORSA Journal on Computing* 4(4), 387-411.

use log::trace;

use crate::evaluation::{Candidate, Objective, TourEvaluator};
use crate::models::TourProblem;
use crate::random::RandomGenerator;
use crate::strategies::Operator;
use crate::tours::{Tour, NO_VISIT};

/// A segment swap `next(v1)..=v3` with `next(v3)..=v5`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Exchange {
    v1: usize,
    v3: usize,
    v5: usize,
    delta: f64,
}

/// 3-opt hill climber pruned by nearest-neighbour lists.
///
/// Neighbour lists come from [`TourProblem::nearest`]; the problem decides
/// how many are kept per visit.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::evaluation::{Candidate, TourWeightObjective};
/// use u_tour::local_search::ThreeOpt;
/// use u_tour::models::TspProblem;
/// use u_tour::random::RandomGenerator;
/// use u_tour::strategies::Operator;
/// use u_tour::tours::Tour;
///
/// let ring = |i: usize, j: usize| if j == (i + 1) % 5 { 1.0 } else { 10.0 };
/// let problem = Arc::new(TspProblem::from_fn(5, 0, Some(0), ring).unwrap());
/// let objective = Arc::new(TourWeightObjective::<TspProblem>::new());
/// let mut candidate = Candidate::new(problem, objective, Tour::new([0, 2, 1, 3, 4], Some(0)).unwrap());
///
/// assert!(ThreeOpt::new().apply(&mut candidate, &mut RandomGenerator::new(0)));
/// assert_eq!(candidate.tour().to_vec(), vec![0, 1, 2, 3, 4]);
/// assert_eq!(*candidate.fitness(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeOpt;

impl ThreeOpt {
    /// Creates the operator.
    pub fn new() -> Self {
        Self
    }

    /// Climbs until no visit yields an improving exchange.
    ///
    /// Returns `true` if the candidate improved.
    pub fn climb<O: Objective>(&self, candidate: &mut Candidate<O>) -> bool {
        let (problem, objective, tour, fitness) = candidate.parts_mut();
        let evaluator = problem.windows().map(|_| TourEvaluator::new(problem));
        let mut violations = evaluator.as_ref().map_or(0, |e| e.violations(tour));

        let mut dont_look = vec![false; tour.capacity()];
        let mut pos = positions(tour);
        let mut improved = false;

        loop {
            let mut changed = false;
            for v1 in tour.to_vec() {
                if dont_look[v1] {
                    continue;
                }

                let mut applied = None;
                for exchange in exchanges(problem, tour, &pos, v1) {
                    tour.swap_segments(exchange.v1, exchange.v3, exchange.v5);
                    let after_violations = evaluator.as_ref().map_or(0, |e| e.violations(tour));
                    let after = objective
                        .weight_delta(fitness, exchange.delta)
                        .unwrap_or_else(|| objective.calculate(problem, tour));
                    if after_violations <= violations && objective.is_improvement(fitness, &after) {
                        violations = after_violations;
                        *fitness = after;
                        applied = Some(exchange);
                        break;
                    }
                    // Swapping the segments back restores the tour.
                    tour.swap_segments(exchange.v1, exchange.v5, exchange.v3);
                }

                match applied {
                    Some(exchange) => {
                        trace!(
                            "3-opt: swap after {} up to {} and {}, delta {:.3}",
                            exchange.v1,
                            exchange.v3,
                            exchange.v5,
                            exchange.delta
                        );
                        for v in touched(tour, exchange) {
                            dont_look[v] = false;
                        }
                        renumber(tour, &mut pos, exchange);
                        changed = true;
                        improved = true;
                    }
                    None => dont_look[v1] = true,
                }
            }
            if !changed {
                break;
            }
        }
        improved
    }
}

impl<O: Objective> Operator<O> for ThreeOpt {
    fn name(&self) -> &str {
        "3-opt"
    }

    fn apply(&self, candidate: &mut Candidate<O>, _random: &mut RandomGenerator) -> bool {
        self.climb(candidate)
    }
}

/// Position of every tour visit, `NO_VISIT` for ids outside the tour.
fn positions(tour: &Tour) -> Vec<usize> {
    let mut pos = vec![NO_VISIT; tour.capacity()];
    for (i, v) in tour.iter().enumerate() {
        pos[v] = i;
    }
    pos
}

/// Renumbers the two swapped segments, now `v4 … v5 → v2 … v3` after `v1`.
fn renumber(tour: &Tour, pos: &mut [usize], exchange: Exchange) {
    let mut index = pos[exchange.v1];
    let mut current = exchange.v1;
    while current != exchange.v3 {
        let Some(next) = tour.next(current) else {
            break;
        };
        index += 1;
        pos[next] = index;
        current = next;
    }
}

/// The six endpoints of an applied exchange.
fn touched(tour: &Tour, exchange: Exchange) -> impl Iterator<Item = usize> {
    let Exchange { v1, v3, v5, .. } = exchange;
    // After the swap: v1 → v4 … v5 → v2 … v3 → v6.
    [
        Some(v1),
        tour.next(v1),
        Some(v5),
        tour.next(v5),
        Some(v3),
        tour.next(v3),
    ]
    .into_iter()
    .flatten()
}

/// Improving exchanges starting at `v1`, best first.
fn exchanges<P>(problem: &P, tour: &Tour, pos: &[usize], v1: usize) -> Vec<Exchange>
where
    P: TourProblem + ?Sized,
{
    let w = |a: usize, b: usize| problem.weight(a, b);
    let mut found = Vec::new();

    let Some(v2) = tour.next(v1) else {
        return found;
    };
    // The closing edge of a loop and a fixed last cannot start a segment.
    if pos[v2] <= pos[v1] || tour.is_fixed_last(v2) {
        return found;
    }
    let nearest = problem.nearest();
    let removed_first = w(v1, v2);

    for &v4 in nearest.forward(v1) {
        if v4 >= pos.len() || pos[v4] == NO_VISIT || pos[v4] <= pos[v2] {
            continue;
        }
        let Some(v3) = tour.prev(v4) else {
            continue;
        };
        let gain_first = w(v1, v4) - removed_first - w(v3, v4);

        for &v5 in nearest.backward(v2) {
            if v5 >= pos.len() || pos[v5] == NO_VISIT || pos[v5] < pos[v4] {
                continue;
            }
            if tour.is_fixed_last(v5) {
                continue;
            }
            let closing = match tour.next(v5) {
                Some(v6) => w(v3, v6) - w(v5, v6),
                None => 0.0,
            };
            let delta = gain_first + w(v5, v2) + closing;
            if delta < -1e-10 {
                found.push(Exchange { v1, v3, v5, delta });
            }
        }
    }
    found.sort_by(|a, b| a.delta.total_cmp(&b.delta));
    found
}
