//! Strategy roles.
//!
//! Search drivers are assembled from small role objects injected at
//! construction. Each role is generic over the [`Objective`], which fixes
//! the problem type and the fitness type; all roles are `Send + Sync` so a
//! configured driver can be shared between threads, each run owning its own
//! [`RandomGenerator`].

use std::sync::Arc;

use crate::evaluation::{Candidate, Objective};
use crate::random::RandomGenerator;

/// Builds a candidate from scratch.
pub trait Generator<O: Objective>: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Builds a new evaluated candidate.
    fn generate(
        &self,
        problem: &Arc<O::Problem>,
        objective: &Arc<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O>;
}

/// Improves a candidate in place.
///
/// Returning `true` means the fitness strictly improved; returning `false`
/// means the candidate is unchanged.
pub trait Operator<O: Objective>: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Applies the operator, returning `true` on strict improvement.
    fn apply(&self, candidate: &mut Candidate<O>, random: &mut RandomGenerator) -> bool;
}

/// Randomly disturbs a candidate with a strength given by `level`.
///
/// Perturbers may worsen the candidate; the fitness is kept consistent
/// either way. Returns `true` if the result is strictly better than before.
pub trait Perturber<O: Objective>: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Perturbs the candidate `level` times.
    fn perturb(&self, candidate: &mut Candidate<O>, level: usize, random: &mut RandomGenerator)
        -> bool;
}

/// Combines two parents into one offspring.
pub trait CrossOverOperator<O: Objective>: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Builds an evaluated offspring from two parents.
    fn apply(
        &self,
        parent1: &Candidate<O>,
        parent2: &Candidate<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O>;
}

/// Picks a member of a population.
pub trait Selector<O: Objective>: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Returns the index of the selected member, never `exclude`.
    ///
    /// `None` means no member was selected; drivers skip the step.
    fn select(
        &self,
        population: &[Candidate<O>],
        exclude: Option<usize>,
        random: &mut RandomGenerator,
    ) -> Option<usize>;
}

impl<O: Objective> Generator<O> for Box<dyn Generator<O>> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate(
        &self,
        problem: &Arc<O::Problem>,
        objective: &Arc<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O> {
        (**self).generate(problem, objective, random)
    }
}

impl<O: Objective> Operator<O> for Box<dyn Operator<O>> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply(&self, candidate: &mut Candidate<O>, random: &mut RandomGenerator) -> bool {
        (**self).apply(candidate, random)
    }
}

impl<O: Objective> Perturber<O> for Box<dyn Perturber<O>> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn perturb(
        &self,
        candidate: &mut Candidate<O>,
        level: usize,
        random: &mut RandomGenerator,
    ) -> bool {
        (**self).perturb(candidate, level, random)
    }
}

/// Observer notified with each new best candidate.
pub type Observer<O> = Box<dyn Fn(&Candidate<O>) + Send + Sync>;

/// Stop predicate `(iteration, level, problem, objective, best) -> stop`.
pub type StopCondition<O> = Box<
    dyn Fn(usize, usize, &<O as Objective>::Problem, &O, &Candidate<O>) -> bool + Send + Sync,
>;
