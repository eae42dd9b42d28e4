//! Multi-start generation.

use std::sync::Arc;

use log::debug;

use crate::evaluation::{Candidate, Objective};
use crate::random::RandomGenerator;

use super::Generator;

/// Runs a generator `n` times and keeps the best candidate.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::constructive::RandomTourGenerator;
/// use u_tour::evaluation::TourWeightObjective;
/// use u_tour::models::TspProblem;
/// use u_tour::random::RandomGenerator;
/// use u_tour::strategies::{Generator, IterativeStrategy};
///
/// let problem = Arc::new(TspProblem::from_fn(5, 0, Some(0), |i, j| (i * j) as f64).unwrap());
/// let objective = Arc::new(TourWeightObjective::<TspProblem>::new());
/// let multi = IterativeStrategy::new(RandomTourGenerator::new(), 10);
/// let best = multi.generate(&problem, &objective, &mut RandomGenerator::new(1));
/// assert_eq!(best.tour().count(), 5);
/// ```
pub struct IterativeStrategy<O: Objective> {
    generator: Box<dyn Generator<O>>,
    n: usize,
}

impl<O: Objective + 'static> IterativeStrategy<O> {
    /// Wraps a generator to be run `n` times (at least once).
    pub fn new<G>(generator: G, n: usize) -> Self
    where
        G: Generator<O> + 'static,
    {
        Self {
            generator: Box::new(generator),
            n: n.max(1),
        }
    }
}

impl<O: Objective + 'static> Generator<O> for IterativeStrategy<O> {
    fn name(&self) -> &str {
        "iterative"
    }

    fn generate(
        &self,
        problem: &Arc<O::Problem>,
        objective: &Arc<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O> {
        let mut best = self.generator.generate(problem, objective, random);
        for run in 1..self.n {
            let next = self.generator.generate(problem, objective, random);
            if next.is_better_than(&best) {
                debug!("iterative: run {run} improved to {:?}", next.fitness());
                best = next;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::evaluation::TourWeightObjective;
    use crate::models::{TourProblem, TspProblem};
    use crate::tours::Tour;

    type Weight = TourWeightObjective<TspProblem>;

    /// Emits the given tours in turn.
    struct Scripted {
        tours: Vec<Vec<usize>>,
        calls: AtomicUsize,
    }

    impl Generator<Weight> for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn generate(
            &self,
            problem: &Arc<TspProblem>,
            objective: &Arc<Weight>,
            _random: &mut RandomGenerator,
        ) -> Candidate<Weight> {
            let i = self.calls.fetch_add(1, Ordering::Relaxed) % self.tours.len();
            let tour = Tour::with_capacity(problem.count(), self.tours[i].clone(), problem.last())
                .expect("valid");
            Candidate::new(Arc::clone(problem), Arc::clone(objective), tour)
        }
    }

    #[test]
    fn test_keeps_best_of_n() {
        let problem = Arc::new(
            TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).expect("valid"),
        );
        let scripted = Scripted {
            tours: vec![vec![0, 2, 1, 3], vec![0, 1, 2, 3], vec![0, 3, 1, 2]],
            calls: AtomicUsize::new(0),
        };
        let multi = IterativeStrategy::new(scripted, 3);
        let best = multi.generate(&problem, &Arc::new(Weight::new()), &mut RandomGenerator::new(0));
        assert_eq!(best.tour().to_vec(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_zero_runs_means_one() {
        let problem = Arc::new(
            TspProblem::from_fn(4, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).expect("valid"),
        );
        let scripted = Scripted {
            tours: vec![vec![0, 2, 1, 3], vec![0, 1, 2, 3]],
            calls: AtomicUsize::new(0),
        };
        let multi = IterativeStrategy::new(scripted, 0);
        let best = multi.generate(&problem, &Arc::new(Weight::new()), &mut RandomGenerator::new(0));
        assert_eq!(best.tour().to_vec(), vec![0, 2, 1, 3]);
    }
}
