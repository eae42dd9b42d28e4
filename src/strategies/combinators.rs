//! Role combinators.
//!
//! Small adapters that build new roles out of existing ones, so drivers can
//! be configured without writing new operator types.

use std::sync::Arc;

use crate::evaluation::{Candidate, Objective};
use crate::random::RandomGenerator;

use super::{Generator, Operator, Perturber};

/// Repeats an operator until it stops improving, or for at most
/// `max_rounds` improving rounds.
pub struct Iterate<O: Objective> {
    operator: Box<dyn Operator<O>>,
    max_rounds: usize,
}

impl<O: Objective + 'static> Iterate<O> {
    /// Repeats `operator` until it returns `false`.
    pub fn new<T>(operator: T) -> Self
    where
        T: Operator<O> + 'static,
    {
        Self::with_max_rounds(operator, usize::MAX)
    }

    /// Repeats `operator` at most `max_rounds` times.
    pub fn with_max_rounds<T>(operator: T, max_rounds: usize) -> Self
    where
        T: Operator<O> + 'static,
    {
        Self {
            operator: Box::new(operator),
            max_rounds,
        }
    }
}

impl<O: Objective + 'static> Operator<O> for Iterate<O> {
    fn name(&self) -> &str {
        self.operator.name()
    }

    fn apply(&self, candidate: &mut Candidate<O>, random: &mut RandomGenerator) -> bool {
        let mut improved = false;
        let mut rounds = 0;
        while rounds < self.max_rounds && self.operator.apply(candidate, random) {
            improved = true;
            rounds += 1;
        }
        improved
    }
}

/// Applies operators in order, each to the result of the previous one.
pub struct OperatorChain<O: Objective> {
    operators: Vec<Box<dyn Operator<O>>>,
}

impl<O: Objective + 'static> OperatorChain<O> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
        }
    }

    /// Appends an operator.
    pub fn then<T>(mut self, operator: T) -> Self
    where
        T: Operator<O> + 'static,
    {
        self.operators.push(Box::new(operator));
        self
    }

    /// Number of operators in the chain.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Returns `true` if the chain has no operators.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl<O: Objective + 'static> Default for OperatorChain<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Objective + 'static> Operator<O> for OperatorChain<O> {
    fn name(&self) -> &str {
        "chain"
    }

    fn apply(&self, candidate: &mut Candidate<O>, random: &mut RandomGenerator) -> bool {
        let mut improved = false;
        for operator in &self.operators {
            improved |= operator.apply(candidate, random);
        }
        improved
    }
}

/// Uses an operator as a perturber by applying it `level` times.
pub struct OperatorPerturber<O: Objective> {
    operator: Box<dyn Operator<O>>,
}

impl<O: Objective + 'static> OperatorPerturber<O> {
    /// Wraps an operator.
    pub fn new<T>(operator: T) -> Self
    where
        T: Operator<O> + 'static,
    {
        Self {
            operator: Box::new(operator),
        }
    }
}

impl<O: Objective + 'static> Perturber<O> for OperatorPerturber<O> {
    fn name(&self) -> &str {
        self.operator.name()
    }

    fn perturb(
        &self,
        candidate: &mut Candidate<O>,
        level: usize,
        random: &mut RandomGenerator,
    ) -> bool {
        let mut improved = false;
        for _ in 0..level.max(1) {
            improved |= self.operator.apply(candidate, random);
        }
        improved
    }
}

/// Runs a generator and improves its result with an operator.
pub struct Improved<O: Objective> {
    generator: Box<dyn Generator<O>>,
    operator: Box<dyn Operator<O>>,
}

impl<O: Objective + 'static> Improved<O> {
    /// Pairs a generator with an improving operator.
    pub fn new<G, T>(generator: G, operator: T) -> Self
    where
        G: Generator<O> + 'static,
        T: Operator<O> + 'static,
    {
        Self {
            generator: Box::new(generator),
            operator: Box::new(operator),
        }
    }
}

impl<O: Objective + 'static> Generator<O> for Improved<O> {
    fn name(&self) -> &str {
        self.generator.name()
    }

    fn generate(
        &self,
        problem: &Arc<O::Problem>,
        objective: &Arc<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O> {
        let mut candidate = self.generator.generate(problem, objective, random);
        self.operator.apply(&mut candidate, random);
        candidate
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::constructive::RandomTourGenerator;
    use crate::evaluation::TourWeightObjective;
    use crate::local_search::TwoOpt;
    use crate::models::TspProblem;
    use crate::tours::Tour;

    type Weight = TourWeightObjective<TspProblem>;

    /// Succeeds a fixed number of times without touching the candidate.
    struct Countdown {
        left: AtomicUsize,
        calls: Arc<AtomicUsize>,
    }

    impl Operator<Weight> for Countdown {
        fn name(&self) -> &str {
            "countdown"
        }

        fn apply(&self, _candidate: &mut Candidate<Weight>, _random: &mut RandomGenerator) -> bool {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.left
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
                .is_ok()
        }
    }

    fn countdown(n: usize) -> (Countdown, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Countdown {
                left: AtomicUsize::new(n),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    fn problem() -> Arc<TspProblem> {
        Arc::new(
            TspProblem::from_fn(8, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).expect("valid"),
        )
    }

    fn candidate(visits: Vec<usize>) -> Candidate<Weight> {
        Candidate::new(
            problem(),
            Arc::new(Weight::new()),
            Tour::new(visits, Some(0)).expect("valid"),
        )
    }

    #[test]
    fn test_iterate_until_failure() {
        let (op, calls) = countdown(3);
        let it = Iterate::new(op);
        let mut c = candidate(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(it.apply(&mut c, &mut RandomGenerator::new(0)));
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_iterate_round_cap() {
        let (op, calls) = countdown(10);
        let it = Iterate::with_max_rounds(op, 2);
        let mut c = candidate(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(it.apply(&mut c, &mut RandomGenerator::new(0)));
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_iterate_two_opt_reaches_local_optimum() {
        let it = Iterate::new(TwoOpt::new());
        let mut c = candidate(vec![0, 5, 2, 7, 1, 6, 3, 4]);
        assert!(it.apply(&mut c, &mut RandomGenerator::new(0)));
        // On a line every 2-opt local optimum is globally optimal.
        assert!((c.fitness() - 14.0).abs() < 1e-10);
        assert!(!TwoOpt::new().apply(&mut c, &mut RandomGenerator::new(0)));
    }

    #[test]
    fn test_chain_runs_all() {
        let (a, calls_a) = countdown(0);
        let (b, calls_b) = countdown(1);
        let chain = OperatorChain::new().then(a).then(b);
        assert_eq!(chain.len(), 2);
        let mut c = candidate(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(chain.apply(&mut c, &mut RandomGenerator::new(0)));
        assert_eq!(calls_a.load(Ordering::Relaxed), 1);
        assert_eq!(calls_b.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_operator_perturber_applies_level_times() {
        let (op, calls) = countdown(0);
        let p = OperatorPerturber::new(op);
        let mut c = candidate(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(!p.perturb(&mut c, 4, &mut RandomGenerator::new(0)));
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_improved_generator() {
        let g = Improved::new(RandomTourGenerator::new(), Iterate::new(TwoOpt::new()));
        let c = g.generate(&problem(), &Arc::new(Weight::new()), &mut RandomGenerator::new(3));
        assert_eq!(c.tour().count(), 8);
        assert!((c.fitness() - 14.0).abs() < 1e-10);
    }
}
