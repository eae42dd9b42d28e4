//! Variable Neighbourhood Search driver.
//!
//! # Algorithm
//!
//! 1. **Construct**: build an initial candidate with the generator and,
//!    optionally, improve it with the local search
//! 2. Set level `k = 1`
//! 3. Until a stop condition fires:
//!    a. **Shake**: perturb a copy of the best candidate with strength `k`
//!    b. **Local search**: improve the copy
//!    c. **Accept**: if the copy is strictly better, keep it, reset `k = 1`
//!    and notify observers; otherwise drop it and set `k = min(k + 1, k_max)`
//!
//! Because shaking always works on a copy, rejected moves never touch the
//! best candidate, and the sequence of candidates reported to observers is
//! non-worsening.
//!
//! # Reference
//!
//! Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//! *Computers & Operations Research* 24(11), 1097-1100.

use std::sync::Arc;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::evaluation::{Candidate, Objective};
use crate::random::RandomGenerator;

use super::{Generator, Observer, Operator, Perturber, StopCondition, StopHandle};

/// Configuration parameters for Variable Neighbourhood Search.
///
/// # Examples
///
/// ```
/// use u_tour::strategies::VnsConfig;
///
/// let config = VnsConfig::default()
///     .with_max_iterations(1000)
///     .with_max_level(5);
/// assert_eq!(config.max_iterations, 1000);
/// assert_eq!(config.max_level, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VnsConfig {
    /// Largest shake strength.
    pub max_level: usize,
    /// Maximum number of shake/search iterations.
    pub max_iterations: usize,
    /// Maximum consecutive iterations without improvement before stopping.
    pub max_no_improve: usize,
    /// Apply the local search to the constructed candidate.
    pub improve_initial: bool,
    /// Random seed for [`VnsStrategy::run`] (None draws one from the OS).
    pub seed: Option<u64>,
}

impl Default for VnsConfig {
    fn default() -> Self {
        Self {
            max_level: 10,
            max_iterations: 1000,
            max_no_improve: 200,
            improve_initial: true,
            seed: None,
        }
    }
}

impl VnsConfig {
    /// Sets the largest shake strength.
    pub fn with_max_level(mut self, level: usize) -> Self {
        self.max_level = level.max(1);
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the maximum iterations without improvement.
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    /// Sets whether the constructed candidate is improved before shaking.
    pub fn with_improve_initial(mut self, improve: bool) -> Self {
        self.improve_initial = improve;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Variable Neighbourhood Search over injected roles.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::constructive::CheapestInsertionGenerator;
/// use u_tour::evaluation::TourWeightObjective;
/// use u_tour::local_search::{Random1Shift, ThreeOpt};
/// use u_tour::models::TspProblem;
/// use u_tour::random::RandomGenerator;
/// use u_tour::strategies::{VnsConfig, VnsStrategy};
///
/// let problem = Arc::new(
///     TspProblem::from_fn(6, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).unwrap(),
/// );
/// let vns = VnsStrategy::new(CheapestInsertionGenerator::new(), Random1Shift::new(), ThreeOpt::new())
///     .with_config(VnsConfig::default().with_max_iterations(50));
///
/// let objective = Arc::new(TourWeightObjective::<TspProblem>::new());
/// let best = vns.search(&problem, &objective, &mut RandomGenerator::new(7));
/// assert_eq!(*best.fitness(), 10.0);
/// ```
pub struct VnsStrategy<O: Objective> {
    generator: Box<dyn Generator<O>>,
    perturber: Box<dyn Perturber<O>>,
    local_search: Box<dyn Operator<O>>,
    config: VnsConfig,
    stop_condition: Option<StopCondition<O>>,
    stop: StopHandle,
    observers: Vec<Observer<O>>,
}

impl<O: Objective + 'static> VnsStrategy<O> {
    /// Creates a VNS from its construction, shake, and local search roles.
    pub fn new<G, P, L>(generator: G, perturber: P, local_search: L) -> Self
    where
        G: Generator<O> + 'static,
        P: Perturber<O> + 'static,
        L: Operator<O> + 'static,
    {
        Self {
            generator: Box::new(generator),
            perturber: Box::new(perturber),
            local_search: Box::new(local_search),
            config: VnsConfig::default(),
            stop_condition: None,
            stop: StopHandle::new(),
            observers: Vec::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: VnsConfig) -> Self {
        self.config = config;
        self
    }

    /// Stops the search once `condition(iteration, level, problem, objective, best)` holds.
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
    pub fn config(&self) -> &VnsConfig {
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

    /// Runs the search and returns the best candidate found.
    pub fn search(
        &self,
        problem: &Arc<O::Problem>,
        objective: &Arc<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O> {
        let mut best = self.generator.generate(problem, objective, random);
        if self.config.improve_initial {
            self.local_search.apply(&mut best, random);
        }
        debug!(
            "vns: constructed with {} -> {:?}",
            self.generator.name(),
            best.fitness()
        );
        self.notify(&best);

        let max_level = self.config.max_level.max(1);
        let mut level = 1;
        let mut iteration = 0;
        let mut no_improve = 0;

        while !self.should_stop(iteration, level, no_improve, &best) {
            let mut working = best.clone();
            self.perturber.perturb(&mut working, level, random);
            self.local_search.apply(&mut working, random);

            if working.is_better_than(&best) {
                debug!(
                    "vns: iteration {iteration} level {level} improved to {:?}",
                    working.fitness()
                );
                best = working;
                level = 1;
                no_improve = 0;
                self.notify(&best);
            } else {
                trace!("vns: iteration {iteration} level {level} rejected");
                level = (level + 1).min(max_level);
                no_improve += 1;
            }
            iteration += 1;
        }

        info!(
            "vns: {} iterations, best {:?} ({})",
            iteration,
            best.fitness(),
            objective.name()
        );
        best
    }

    fn should_stop(
        &self,
        iteration: usize,
        level: usize,
        no_improve: usize,
        best: &Candidate<O>,
    ) -> bool {
        if self.stop.is_stopped() {
            debug!("vns: stop requested");
            return true;
        }
        if iteration >= self.config.max_iterations || no_improve >= self.config.max_no_improve {
            return true;
        }
        match &self.stop_condition {
            Some(condition) => condition(iteration, level, best.problem(), best.objective(), best),
            None => false,
        }
    }

    fn notify(&self, best: &Candidate<O>) {
        for observer in &self.observers {
            observer(best);
        }
    }
}

impl<O: Objective + 'static> Generator<O> for VnsStrategy<O> {
    fn name(&self) -> &str {
        "vns"
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
