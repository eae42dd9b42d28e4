//! Random single-visit relocation.

use log::trace;

use crate::evaluation::{Candidate, Objective};
use crate::models::TourProblem;
use crate::random::RandomGenerator;
use crate::strategies::Perturber;
use crate::tours::Shift;

/// Weight change of moving `visit` to directly after `before`.
///
/// `shift` holds the endpoints reported by [`Tour::shift_after`](crate::tours::Tour::shift_after),
/// so the change is a constant number of weight lookups.
pub fn shift_delta<P>(problem: &P, visit: usize, before: usize, shift: &Shift) -> f64
where
    P: TourProblem + ?Sized,
{
    let w = |a: usize, b: usize| problem.weight(a, b);

    let removed = match shift.old_after {
        Some(after) => w(shift.old_before, visit) + w(visit, after) - w(shift.old_before, after),
        None => w(shift.old_before, visit),
    };
    let added = match shift.new_after {
        Some(after) => w(before, visit) + w(visit, after) - w(before, after),
        None => w(before, visit),
    };
    added - removed
}

/// Moves a random visit to after another random visit, `level` times.
///
/// The first visit and a fixed last visit never move, and nothing is
/// placed after a fixed last visit. Moves may worsen the candidate.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::evaluation::{Candidate, TourWeightObjective};
/// use u_tour::local_search::Random1Shift;
/// use u_tour::models::TspProblem;
/// use u_tour::random::RandomGenerator;
/// use u_tour::strategies::Perturber;
/// use u_tour::tours::Tour;
///
/// let problem = Arc::new(TspProblem::from_fn(5, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).unwrap());
/// let objective = Arc::new(TourWeightObjective::<TspProblem>::new());
/// let mut candidate = Candidate::new(problem, objective, Tour::new([0, 1, 2, 3, 4], Some(0)).unwrap());
///
/// Random1Shift::new().perturb(&mut candidate, 3, &mut RandomGenerator::new(5));
/// assert_eq!(candidate.tour().count(), 5);
/// assert_eq!(candidate.tour().first(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Random1Shift;

impl Random1Shift {
    /// Creates the perturber.
    pub fn new() -> Self {
        Self
    }

    /// Applies one random shift and returns the fitness delta `after - before`.
    ///
    /// The fitness follows from [`shift_delta`] when the objective supports
    /// [`weight_delta`](Objective::weight_delta), and is recalculated otherwise.
    ///
    /// Returns the zero fitness if the drawn move is a no-op.
    pub fn shift<O: Objective>(
        &self,
        candidate: &mut Candidate<O>,
        random: &mut RandomGenerator,
    ) -> O::Fitness {
        let (problem, objective, tour, fitness) = candidate.parts_mut();
        let fixed = usize::from(tour.last().is_some_and(|l| tour.is_fixed_last(l)));
        let slots = tour.count() - fixed;
        if slots < 2 {
            return objective.zero();
        }

        let from = 1 + random.generate(slots - 1);
        let to = random.generate(slots);
        let (Some(visit), Some(before)) = (tour.visit_at(from), tour.visit_at(to)) else {
            return objective.zero();
        };
        let Some(shift) = tour.shift_after(visit, before) else {
            return objective.zero();
        };
        let weight = shift_delta(problem, visit, before, &shift);
        trace!("1-shift: {visit} after {before}, weight delta {weight:.3}");

        let after = objective
            .weight_delta(fitness, weight)
            .unwrap_or_else(|| objective.calculate(problem, tour));
        let delta = objective.subtract(&after, fitness);
        *fitness = after;
        delta
    }
}

impl<O: Objective> Perturber<O> for Random1Shift {
    fn name(&self) -> &str {
        "random-1-shift"
    }

    fn perturb(
        &self,
        candidate: &mut Candidate<O>,
        level: usize,
        random: &mut RandomGenerator,
    ) -> bool {
        let before = candidate.fitness().clone();
        for _ in 0..level.max(1) {
            self.shift(candidate, random);
        }
        candidate.objective().is_improvement(&before, candidate.fitness())
    }
}
