//! Turn selection for directed tours.
//!
//! # Algorithm
//!
//! Each directed id in the tour fixes the turn taken at its visit. With the
//! neighbours held fixed, only the two edges around a visit depend on its
//! turn, so the cheapest turn is found by comparing the four alternatives:
//!
//! ```text
//! cost(t) = d(prev, pack(v, t)) + d(pack(v, t), next)
//! ```
//!
//! Visits are swept in tour order until a sweep changes nothing. The first
//! visit and a fixed last visit keep their turn.
//!
//! # Complexity
//!
//! O(n) per sweep.

use log::trace;

use crate::evaluation::{Candidate, Objective};
use crate::models::TourProblem;
use crate::random::RandomGenerator;
use crate::strategies::Operator;
use crate::tours::{pack, unpack, Tour, Turn};

/// Chooses the cheapest turn at every visit of a directed tour.
///
/// Tour ids must be directed ids as produced by [`pack`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::distance::WeightMatrix;
/// use u_tour::evaluation::{Candidate, TourWeightObjective};
/// use u_tour::local_search::TurnOptimizer;
/// use u_tour::models::DirectedTspProblem;
/// use u_tour::random::RandomGenerator;
/// use u_tour::strategies::Operator;
/// use u_tour::tours::{pack, Tour, Turn};
///
/// // Visit 1 is cheap to enter and leave on its backward side.
/// let sides = WeightMatrix::from_fn(6, |i, j| match (i, j) {
///     (0, 3) | (3, 4) | (4, 0) => 1.0,
///     _ => 10.0,
/// });
/// let problem = Arc::new(DirectedTspProblem::new(0, Some(0), sides, |_| 0.0).unwrap());
/// let objective = Arc::new(TourWeightObjective::<DirectedTspProblem>::new());
/// let ff = Turn::ForwardForward;
/// let tour = Tour::with_capacity(12, [pack(0, ff), pack(1, ff), pack(2, ff)], Some(pack(0, ff))).unwrap();
/// let mut candidate = Candidate::new(problem, objective, tour);
///
/// assert!(TurnOptimizer::new().apply(&mut candidate, &mut RandomGenerator::new(0)));
/// assert!(candidate.tour().contains(pack(1, Turn::BackwardBackward)));
/// assert_eq!(*candidate.fitness(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnOptimizer;

impl TurnOptimizer {
    /// Creates the operator.
    pub fn new() -> Self {
        Self
    }

    /// Sweeps `tour` until no turn change lowers its weight.
    ///
    /// Returns `true` if any turn changed.
    pub fn optimize<P>(&self, problem: &P, tour: &mut Tour) -> bool
    where
        P: TourProblem + ?Sized,
    {
        let mut changed = false;
        loop {
            let mut sweep_changed = false;
            for id in tour.to_vec() {
                if id == tour.first() || tour.is_fixed_last(id) {
                    continue;
                }
                let prev = tour.prev(id);
                let next = tour.next(id);
                let cost = |x: usize| {
                    prev.map_or(0.0, |p| problem.weight(p, x))
                        + next.map_or(0.0, |n| problem.weight(x, n))
                };

                let (visit, _) = unpack(id);
                let current = cost(id);
                let best = Turn::ALL
                    .iter()
                    .map(|&t| pack(visit, t))
                    .filter(|&x| x < tour.capacity())
                    .map(|x| (x, cost(x)))
                    .min_by(|a, b| a.1.total_cmp(&b.1));

                if let Some((x, c)) = best {
                    if c < current - 1e-10 && tour.replace(id, x).is_ok() {
                        trace!("turn: {id} -> {x}, delta {:.3}", c - current);
                        sweep_changed = true;
                        changed = true;
                    }
                }
            }
            if !sweep_changed {
                break;
            }
        }
        changed
    }
}

impl<O: Objective> Operator<O> for TurnOptimizer {
    fn name(&self) -> &str {
        "turn"
    }

    fn apply(&self, candidate: &mut Candidate<O>, _random: &mut RandomGenerator) -> bool {
        let mut tour = candidate.tour().clone();
        if !self.optimize(candidate.problem(), &mut tour) {
            return false;
        }
        let after = candidate.objective().calculate(candidate.problem(), &tour);
        if !candidate.objective().is_improvement(candidate.fitness(), &after) {
            return false;
        }
        let (_, _, current, fitness) = candidate.parts_mut();
        *current = tour;
        *fitness = after;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::distance::WeightMatrix;
    use crate::evaluation::TourWeightObjective;
    use crate::models::DirectedTspProblem;
    use crate::tours::directed::side;
    use crate::tours::Direction;

    const FF: Turn = Turn::ForwardForward;
    const F: Direction = Direction::Forward;
    const B: Direction = Direction::Backward;

    /// Side weights of 1 on the `cheap` pairs and 10 elsewhere.
    fn problem(cheap: &[(usize, usize)], u_turn: f64) -> DirectedTspProblem {
        let cheap = cheap.to_vec();
        let sides =
            WeightMatrix::from_fn(6, |i, j| if cheap.contains(&(i, j)) { 1.0 } else { 10.0 });
        let penalty = move |t: Turn| if t.is_u_turn() { u_turn } else { 0.0 };
        DirectedTspProblem::new(0, Some(0), sides, penalty).expect("valid")
    }

    fn backward_pass() -> DirectedTspProblem {
        problem(
            &[(side(0, F), side(1, B)), (side(1, B), side(2, F)), (side(2, F), side(0, F))],
            0.0,
        )
    }

    fn tour() -> Tour {
        Tour::with_capacity(12, [pack(0, FF), pack(1, FF), pack(2, FF)], Some(pack(0, FF)))
            .expect("valid")
    }

    #[test]
    fn test_picks_cheapest_turn() {
        let p = backward_pass();
        let mut t = tour();
        // 10 + 10 + 1
        assert!((t.weight(|a, b| p.weight(a, b)) - 21.0).abs() < 1e-10);
        assert!(TurnOptimizer::new().optimize(&p, &mut t));
        assert_eq!(
            t.to_vec(),
            vec![pack(0, FF), pack(1, Turn::BackwardBackward), pack(2, FF)]
        );
        assert!((t.weight(|a, b| p.weight(a, b)) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_u_turn_penalty() {
        // Entering visit 1 backward and leaving it forward is the only cheap pass.
        let cheap = [(side(0, F), side(1, B)), (side(1, F), side(2, F)), (side(2, F), side(0, F))];

        let mut t = tour();
        assert!(TurnOptimizer::new().optimize(&problem(&cheap, 0.0), &mut t));
        assert!(t.contains(pack(1, Turn::BackwardForward)));

        let mut t = tour();
        assert!(!TurnOptimizer::new().optimize(&problem(&cheap, 20.0), &mut t));
        assert_eq!(t, tour());
    }

    #[test]
    fn test_first_keeps_turn() {
        let p = backward_pass();
        let mut t = tour();
        TurnOptimizer::new().optimize(&p, &mut t);
        assert_eq!(t.first(), pack(0, FF));
        assert_eq!(t.last(), Some(pack(0, FF)));
    }

    #[test]
    fn test_operator_updates_fitness() {
        let p = Arc::new(backward_pass());
        let objective = Arc::new(TourWeightObjective::<DirectedTspProblem>::new());
        let mut c = Candidate::new(p, objective, tour());
        assert!(TurnOptimizer::new().apply(&mut c, &mut RandomGenerator::new(0)));
        assert!((c.fitness() - 3.0).abs() < 1e-10);
        assert!(!TurnOptimizer::new().apply(&mut c, &mut RandomGenerator::new(0)));
    }
}
