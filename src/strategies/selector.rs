//! Tournament selection.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::evaluation::{Candidate, Objective};
use crate::random::RandomGenerator;

use super::Selector;

/// Probabilistic tournament selection.
///
/// Draws a tournament of `max(1, ceil(population * percent / 100))` distinct
/// members, sorts it best first, and walks it accepting each member with
/// `acceptance_probability`. If nobody is accepted, nothing is selected.
///
/// # Examples
///
/// ```
/// use u_tour::strategies::TournamentSelector;
///
/// let selector = TournamentSelector::new(10.0, 0.9);
/// assert_eq!(selector.tournament_size(50), 5);
/// assert_eq!(selector.tournament_size(3), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSelector {
    /// Tournament size as a percentage of the population.
    pub tournament_size_percent: f64,
    /// Probability of accepting each member in sorted order.
    pub acceptance_probability: f64,
}

impl Default for TournamentSelector {
    fn default() -> Self {
        Self {
            tournament_size_percent: 10.0,
            acceptance_probability: 0.9,
        }
    }
}

impl TournamentSelector {
    /// Creates a selector.
    pub fn new(tournament_size_percent: f64, acceptance_probability: f64) -> Self {
        Self {
            tournament_size_percent,
            acceptance_probability,
        }
    }

    /// Number of members drawn from a population of `population`.
    pub fn tournament_size(&self, population: usize) -> usize {
        let size = (population as f64 * self.tournament_size_percent / 100.0).ceil() as usize;
        size.clamp(1, population.max(1))
    }
}

impl<O: Objective> Selector<O> for TournamentSelector {
    fn name(&self) -> &str {
        "tournament"
    }

    fn select(
        &self,
        population: &[Candidate<O>],
        exclude: Option<usize>,
        random: &mut RandomGenerator,
    ) -> Option<usize> {
        let mut pool: Vec<usize> = (0..population.len())
            .filter(|&i| Some(i) != exclude)
            .collect();
        if pool.is_empty() {
            return None;
        }

        // Partial Fisher-Yates: the first `size` entries become the tournament.
        let size = self.tournament_size(population.len()).min(pool.len());
        for i in 0..size {
            let j = i + random.generate(pool.len() - i);
            pool.swap(i, j);
        }
        let tournament = &mut pool[..size];
        tournament.sort_by(|&a, &b| population[a].compare(&population[b]));

        let selected = tournament
            .iter()
            .copied()
            .find(|_| random.is_hit(self.acceptance_probability));
        trace!("tournament of {size}: selected {selected:?}");
        selected
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::evaluation::TourWeightObjective;
    use crate::models::TspProblem;
    use crate::tours::Tour;

    type Weight = TourWeightObjective<TspProblem>;

    fn population() -> Vec<Candidate<Weight>> {
        let problem = Arc::new(
            TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).expect("valid"),
        );
        let objective = Arc::new(Weight::new());
        // Weights 6, 8, 8: only the first is optimal.
        [[0, 1, 2, 3], [0, 2, 1, 3], [0, 3, 1, 2]]
            .into_iter()
            .map(|v| {
                Candidate::new(
                    Arc::clone(&problem),
                    Arc::clone(&objective),
                    Tour::new(v, Some(0)).expect("valid"),
                )
            })
            .collect()
    }

    #[test]
    fn test_full_tournament_certain_acceptance_picks_best() {
        let selector = TournamentSelector::new(100.0, 1.0);
        let pop = population();
        let mut random = RandomGenerator::new(5);
        for _ in 0..20 {
            assert_eq!(selector.select(&pop, None, &mut random), Some(0));
        }
    }

    #[test]
    fn test_exclude() {
        let selector = TournamentSelector::new(100.0, 1.0);
        let pop = population();
        let mut random = RandomGenerator::new(5);
        let picked = selector.select(&pop, Some(0), &mut random);
        assert!(picked.is_some());
        assert_ne!(picked, Some(0));
    }

    #[test]
    fn test_zero_acceptance_selects_nothing() {
        let selector = TournamentSelector::new(50.0, 0.0);
        let pop = population();
        assert_eq!(selector.select(&pop, None, &mut RandomGenerator::new(1)), None);
    }

    #[test]
    fn test_single_member_excluded() {
        let selector = TournamentSelector::default();
        let pop = population();
        assert_eq!(
            selector.select(&pop[..1], Some(0), &mut RandomGenerator::new(1)),
            None
        );
    }

    #[test]
    fn test_tournament_size() {
        let s = TournamentSelector::new(25.0, 1.0);
        assert_eq!(s.tournament_size(4), 1);
        assert_eq!(s.tournament_size(10), 3);
        assert_eq!(s.tournament_size(0), 1);
    }
}
