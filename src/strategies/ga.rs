//! Genetic Algorithm driver.
//!
//! # Algorithm (steady state)
//!
//! 1. Fill the population with `population_size` generated candidates
//! 2. Per generation:
//!    a. **Select** two distinct parents; if the selector yields nothing,
//!    skip the generation
//!    b. **Cross over** the parents into one offspring
//!    c. **Mutate** the offspring with `mutation_probability`
//!    d. **Replace** the worst member if the offspring is not worse
//! 3. Stop after `max_generations`, after `max_stagnation` generations
//!    without a new best, or when a stop condition fires
//!
//! # Reference
//!
//! Whitley, D. (1989). "The GENITOR algorithm and selection pressure",
//! *Proceedings of the Third International Conference on Genetic Algorithms*, 116-121.

use std::cmp::Ordering;
use std::sync::Arc;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::evaluation::{Candidate, Objective};
use crate::random::RandomGenerator;

use super::{CrossOverOperator, Generator, Observer, Operator, Selector, StopCondition, StopHandle};

/// Configuration parameters for the Genetic Algorithm.
///
/// # Examples
///
/// ```
/// use u_tour::strategies::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_mutation_probability(0.3);
/// assert_eq!(config.population_size, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of members kept in the population.
    pub population_size: usize,
    /// Maximum number of generations.
    pub max_generations: usize,
    /// Maximum generations without a new best before stopping.
    pub max_stagnation: usize,
    /// Probability of mutating an offspring.
    pub mutation_probability: f64,
    /// Random seed for [`GaStrategy::run`] (None draws one from the OS).
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 1000,
            max_stagnation: 300,
            mutation_probability: 0.1,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n.max(1);
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the maximum generations without improvement.
    pub fn with_max_stagnation(mut self, n: usize) -> Self {
        self.max_stagnation = n;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Steady-state Genetic Algorithm over injected roles.
pub struct GaStrategy<O: Objective> {
    generator: Box<dyn Generator<O>>,
    crossover: Box<dyn CrossOverOperator<O>>,
    selector: Box<dyn Selector<O>>,
    mutation: Option<Box<dyn Operator<O>>>,
    config: GaConfig,
    stop_condition: Option<StopCondition<O>>,
    stop: StopHandle,
    observers: Vec<Observer<O>>,
}

impl<O: Objective + 'static> GaStrategy<O> {
    /// Creates a GA from its population generator, crossover, and parent selector.
    pub fn new<G, C, S>(generator: G, crossover: C, selector: S) -> Self
    where
        G: Generator<O> + 'static,
        C: CrossOverOperator<O> + 'static,
        S: Selector<O> + 'static,
    {
        Self {
            generator: Box::new(generator),
            crossover: Box::new(crossover),
            selector: Box::new(selector),
            mutation: None,
            config: GaConfig::default(),
            stop_condition: None,
            stop: StopHandle::new(),
            observers: Vec::new(),
        }
    }

    /// Sets the operator applied to offspring with the mutation probability.
    pub fn with_mutation<M>(mut self, mutation: M) -> Self
    where
        M: Operator<O> + 'static,
    {
        self.mutation = Some(Box::new(mutation));
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: GaConfig) -> Self {
        self.config = config;
        self
    }

    /// Stops once `condition(generation, stagnation, problem, objective, best)` holds.
    pub fn with_stop_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(usize, usize, &O::Problem, &O, &Candidate<O>) -> bool + Send + Sync + 'static,
    {
        self.stop_condition = Some(Box::new(condition));
        self
    }

    /// Uses an externally owned stop handle.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Registers an observer called with every new best candidate.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Candidate<O>) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// The handle that stops this search.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// The configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the search with a generator seeded from the configuration.
    pub fn run(&self, problem: &Arc<O::Problem>, objective: &Arc<O>) -> Candidate<O> {
        let mut random = match self.config.seed {
            Some(seed) => RandomGenerator::new(seed),
            None => RandomGenerator::from_entropy(),
        };
        self.search(problem, objective, &mut random)
    }

    /// Evolves a population and returns its best member.
    pub fn search(
        &self,
        problem: &Arc<O::Problem>,
        objective: &Arc<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O> {
        let size = self.config.population_size.max(1);
        let mut population: Vec<Candidate<O>> = (0..size)
            .map(|_| self.generator.generate(problem, objective, random))
            .collect();

        let mut best = best_index(&population);
        debug!(
            "ga: population of {size} from {}, best {:?}",
            self.generator.name(),
            population[best].fitness()
        );
        self.notify(&population[best]);

        let mut generation = 0;
        let mut stagnation = 0;
        while !self.should_stop(generation, stagnation, &population[best]) {
            generation += 1;
            stagnation += 1;

            let Some(first) = self.selector.select(&population, None, random) else {
                trace!("ga: generation {generation} skipped, no first parent");
                continue;
            };
            let Some(second) = self.selector.select(&population, Some(first), random) else {
                trace!("ga: generation {generation} skipped, no second parent");
                continue;
            };

            let mut offspring = self
                .crossover
                .apply(&population[first], &population[second], random);
            if let Some(mutation) = &self.mutation {
                if random.is_hit(self.config.mutation_probability) {
                    mutation.apply(&mut offspring, random);
                }
            }

            let worst = worst_index(&population);
            if offspring.compare(&population[worst]) == Ordering::Greater {
                continue;
            }
            let improved = offspring.is_better_than(&population[best]);
            population[worst] = offspring;
            if improved {
                best = worst;
                stagnation = 0;
                debug!(
                    "ga: generation {generation} improved to {:?}",
                    population[best].fitness()
                );
                self.notify(&population[best]);
            } else if worst == best {
                best = best_index(&population);
            }
        }

        info!(
            "ga: {} generations, best {:?} ({})",
            generation,
            population[best].fitness(),
            objective.name()
        );
        population.swap_remove(best)
    }

    fn should_stop(&self, generation: usize, stagnation: usize, best: &Candidate<O>) -> bool {
        if self.stop.is_stopped() {
            debug!("ga: stop requested");
            return true;
        }
        if generation >= self.config.max_generations || stagnation >= self.config.max_stagnation {
            return true;
        }
        match &self.stop_condition {
            Some(condition) => {
                condition(generation, stagnation, best.problem(), best.objective(), best)
            }
            None => false,
        }
    }

    fn notify(&self, best: &Candidate<O>) {
        for observer in &self.observers {
            observer(best);
        }
    }
}

impl<O: Objective + 'static> Generator<O> for GaStrategy<O> {
    fn name(&self) -> &str {
        "ga"
    }

    fn generate(
        &self,
        problem: &Arc<O::Problem>,
        objective: &Arc<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O> {
        self.search(problem, objective, random)
    }
}

fn best_index<O: Objective>(population: &[Candidate<O>]) -> usize {
    (1..population.len()).fold(0, |best, i| {
        if population[i].is_better_than(&population[best]) {
            i
        } else {
            best
        }
    })
}

fn worst_index<O: Objective>(population: &[Candidate<O>]) -> usize {
    (1..population.len()).fold(0, |worst, i| {
        if population[worst].is_better_than(&population[i]) {
            i
        } else {
            worst
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::constructive::RandomTourGenerator;
    use crate::evaluation::TourWeightObjective;
    use crate::ga::Eax;
    use crate::local_search::TwoOpt;
    use crate::models::TspProblem;
    use crate::strategies::{Iterate, TournamentSelector};

    type Weight = TourWeightObjective<TspProblem>;

    fn problem() -> Arc<TspProblem> {
        Arc::new(
            TspProblem::from_fn(10, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).expect("valid"),
        )
    }

    fn ga() -> GaStrategy<Weight> {
        GaStrategy::new(RandomTourGenerator::new(), Eax::default(), TournamentSelector::default())
            .with_mutation(Iterate::new(TwoOpt::new()))
    }

    #[test]
    fn test_config_builder() {
        let c = GaConfig::default()
            .with_population_size(0)
            .with_max_generations(7)
            .with_max_stagnation(3)
            .with_seed(2);
        assert_eq!(c.population_size, 1);
        assert_eq!(c.max_generations, 7);
        assert_eq!(c.max_stagnation, 3);
        assert_eq!(c.seed, Some(2));
    }

    #[test]
    fn test_search_never_worse_than_initial_best() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let strategy = ga()
            .with_config(GaConfig::default().with_population_size(10).with_max_generations(200))
            .with_observer(move |c: &Candidate<Weight>| {
                sink.lock().expect("lock").push(*c.fitness());
            });
        let best = strategy.search(
            &problem(),
            &Arc::new(Weight::new()),
            &mut RandomGenerator::new(8),
        );

        let seen = seen.lock().expect("lock");
        for w in seen.windows(2) {
            assert!(w[1] < w[0]);
        }
        let last = seen.last().copied().expect("initial best reported");
        assert!((best.fitness() - last).abs() < 1e-10);
        assert_eq!(best.tour().count(), 10);
    }

    #[test]
    fn test_search_reaches_line_optimum() {
        let strategy = ga().with_config(
            GaConfig::default()
                .with_population_size(20)
                .with_max_generations(400)
                .with_mutation_probability(1.0),
        );
        let best = strategy.search(
            &problem(),
            &Arc::new(Weight::new()),
            &mut RandomGenerator::new(4),
        );
        assert!((best.fitness() - 18.0).abs() < 1e-10);
    }

    #[test]
    fn test_skipped_generations_tolerated() {
        let strategy = GaStrategy::new(
            RandomTourGenerator::new(),
            Eax::default(),
            TournamentSelector::new(50.0, 0.0),
        )
        .with_config(GaConfig::default().with_population_size(4).with_max_generations(25));
        let generations = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&generations);
        let strategy = strategy.with_stop_condition(move |generation, _, _, _, _| {
            *counter.lock().expect("lock") = generation;
            false
        });
        let best = strategy.search(
            &problem(),
            &Arc::new(Weight::new()),
            &mut RandomGenerator::new(1),
        );
        assert_eq!(best.tour().count(), 10);
        assert_eq!(*generations.lock().expect("lock"), 24);
    }

    #[test]
    fn test_nan_probabilities_never_fire() {
        let strategy = GaStrategy::new(
            RandomTourGenerator::new(),
            Eax::default(),
            TournamentSelector::new(50.0, f64::NAN),
        )
        .with_mutation(Iterate::new(TwoOpt::new()))
        .with_config(
            GaConfig::default()
                .with_population_size(4)
                .with_max_generations(10)
                .with_mutation_probability(f64::NAN),
        );
        let best = strategy.search(
            &problem(),
            &Arc::new(Weight::new()),
            &mut RandomGenerator::new(2),
        );
        assert_eq!(best.tour().count(), 10);
    }
}
