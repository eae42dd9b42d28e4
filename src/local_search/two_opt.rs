//! 2-opt segment reversal.
//!
//! # Algorithm
//!
//! For each pair of edges (a, b) and (c, d) in the tour sequence, compute
//! the change in weight from reversing the segment `b..=c`:
//!
//! ```text
//! delta = d(a, c) + rev(b..=c) + d(b, d) - d(a, b) - fwd(b..=c) - d(c, d)
//! ```
//!
//! The inner path sums `fwd` and `rev` are accumulated as `c` advances, so
//! asymmetric weights are handled exactly. The first reversal with
//! `delta < 0` that the objective also accepts is applied (first
//! improvement). If the problem has time windows, a reversal that adds
//! violated windows is skipped.
//!
//! # Complexity
//!
//! O(n²) per call.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use log::trace;

use crate::evaluation::{Candidate, Objective, TourEvaluator};
use crate::models::TourProblem;
use crate::random::RandomGenerator;
use crate::strategies::Operator;
use crate::tours::Tour;

/// First-improvement 2-opt operator.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::evaluation::{Candidate, TourWeightObjective};
/// use u_tour::local_search::TwoOpt;
/// use u_tour::models::TspProblem;
/// use u_tour::random::RandomGenerator;
/// use u_tour::strategies::Operator;
/// use u_tour::tours::Tour;
///
/// let problem = Arc::new(TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).unwrap());
/// let objective = Arc::new(TourWeightObjective::<TspProblem>::new());
/// let mut candidate = Candidate::new(problem, objective, Tour::new([0, 2, 1, 3], Some(0)).unwrap());
///
/// assert!(TwoOpt::new().apply(&mut candidate, &mut RandomGenerator::new(0)));
/// assert_eq!(*candidate.fitness(), 6.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOpt;

impl TwoOpt {
    /// Creates the operator.
    pub fn new() -> Self {
        Self
    }

    /// Finds the first improving reversal and returns the improved tour.
    fn find<O: Objective>(&self, candidate: &Candidate<O>) -> Option<(Tour, O::Fitness)> {
        let problem = candidate.problem();
        let objective = candidate.objective();
        let tour = candidate.tour();
        let w = |a: usize, b: usize| problem.weight(a, b);

        let mut seq = tour.to_vec();
        if tour.is_closed() {
            seq.push(tour.first());
        }
        // The closing copy of first and a fixed last never move.
        let end = if tour.last().is_some() {
            seq.len().saturating_sub(1)
        } else {
            seq.len()
        };

        let evaluator = problem.windows().map(|_| TourEvaluator::new(problem));
        let violations = evaluator.as_ref().map_or(0, |e| e.violations(tour));

        for i in 0..end.saturating_sub(2) {
            let a = seq[i];
            let b = seq[i + 1];
            let mut forward = 0.0;
            let mut reverse = 0.0;

            for j in (i + 2)..end {
                forward += w(seq[j - 1], seq[j]);
                reverse += w(seq[j], seq[j - 1]);
                let c = seq[j];
                let (old_out, new_out) = match seq.get(j + 1) {
                    Some(&d) => (w(c, d), w(b, d)),
                    None => (0.0, 0.0),
                };

                let delta = w(a, c) + reverse + new_out - w(a, b) - forward - old_out;
                if delta >= -1e-10 {
                    continue;
                }

                let mut after = tour.clone();
                if !after.reverse_after(a, c) {
                    continue;
                }
                if let Some(e) = &evaluator {
                    if e.violations(&after) > violations {
                        continue;
                    }
                }
                let fitness = objective.calculate(problem, &after);
                if objective.is_improvement(candidate.fitness(), &fitness) {
                    trace!("2-opt: reverse {b}..={c} after {a}, delta {delta:.3}");
                    return Some((after, fitness));
                }
            }
        }
        None
    }
}

impl<O: Objective> Operator<O> for TwoOpt {
    fn name(&self) -> &str {
        "2-opt"
    }

    fn apply(&self, candidate: &mut Candidate<O>, _random: &mut RandomGenerator) -> bool {
        let Some((tour, fitness)) = self.find(candidate) else {
            return false;
        };
        let (_, _, current, current_fitness) = candidate.parts_mut();
        *current = tour;
        *current_fitness = fitness;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::evaluation::TourWeightObjective;
    use crate::models::{TimeWindow, TspProblem};

    type Weight = TourWeightObjective<TspProblem>;

    fn line(i: usize, j: usize) -> f64 {
        (i as f64 - j as f64).abs()
    }

    fn ring(i: usize, j: usize) -> f64 {
        if j == i + 1 || (i == 4 && j == 0) {
            1.0
        } else {
            10.0
        }
    }

    fn candidate(problem: TspProblem, visits: Vec<usize>) -> Candidate<Weight> {
        let tour = Tour::with_capacity(problem.count(), visits, problem.last()).expect("valid");
        Candidate::new(Arc::new(problem), Arc::new(Weight::new()), tour)
    }

    fn run(c: &mut Candidate<Weight>) -> bool {
        TwoOpt::new().apply(c, &mut RandomGenerator::new(0))
    }

    #[test]
    fn test_already_optimal() {
        let mut c = candidate(
            TspProblem::from_fn(4, 0, Some(0), line).expect("valid"),
            vec![0, 1, 2, 3],
        );
        let before = c.tour().clone();
        assert!(!run(&mut c));
        assert_eq!(c.tour(), &before);
        assert!((c.fitness() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_reverses_crossing() {
        let mut c = candidate(
            TspProblem::from_fn(6, 0, Some(0), line).expect("valid"),
            vec![0, 2, 1, 3, 4, 5],
        );
        assert!(run(&mut c));
        while run(&mut c) {}
        assert_eq!(c.tour().to_vec(), vec![0, 1, 2, 3, 4, 5]);
        assert!((c.fitness() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_open_tail_reversal() {
        let mut c = candidate(
            TspProblem::from_fn(4, 0, None, line).expect("valid"),
            vec![0, 1, 3, 2],
        );
        assert!(run(&mut c));
        assert_eq!(c.tour().to_vec(), vec![0, 1, 2, 3]);
        assert!((c.fitness() - 3.0).abs() < 1e-10);
        assert_eq!(c.tour().tail(), 3);
    }

    #[test]
    fn test_fixed_last_stays() {
        let mut c = candidate(
            TspProblem::from_fn(5, 0, Some(4), line).expect("valid"),
            vec![0, 3, 2, 1, 4],
        );
        while run(&mut c) {}
        assert_eq!(c.tour().to_vec(), vec![0, 1, 2, 3, 4]);
        assert_eq!(c.tour().tail(), 4);
    }

    #[test]
    fn test_asymmetric_optimum_kept() {
        let mut c = candidate(
            TspProblem::from_fn(5, 0, Some(0), ring).expect("valid"),
            vec![0, 1, 2, 3, 4],
        );
        assert!(!run(&mut c));
        assert!((c.fitness() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_asymmetric_delta_matches_fitness() {
        let mut c = candidate(
            TspProblem::from_fn(5, 0, Some(0), ring).expect("valid"),
            vec![0, 3, 2, 1, 4],
        );
        let before = *c.fitness();
        assert!(run(&mut c));
        assert!(*c.fitness() < before);
        let mut visits = c.tour().to_vec();
        visits.sort_unstable();
        assert_eq!(visits, vec![0, 1, 2, 3, 4]);
        let fresh = c.tour().weight(ring);
        assert!((c.fitness() - fresh).abs() < 1e-10);
    }

    #[test]
    fn test_windows_block_reversal() {
        let windows = vec![
            TimeWindow::unlimited(),
            TimeWindow::between(2.5, 3.5).expect("finite"),
            TimeWindow::between(0.0, 2.5).expect("finite"),
            TimeWindow::unlimited(),
        ];
        let problem = TspProblem::from_fn(4, 0, Some(0), line).expect("valid");

        // Both weight-improving reversals arrive outside a window.
        let mut c = candidate(
            problem.clone().with_windows(windows).expect("sizes match"),
            vec![0, 2, 1, 3],
        );
        assert!(!run(&mut c));

        let mut c = candidate(problem, vec![0, 2, 1, 3]);
        assert!(run(&mut c));
    }
}
