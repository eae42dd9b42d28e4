//! Ready-made solvers wiring the standard roles together.
//!
//! - [`solve_vns`] — cheapest insertion, then VNS with [`Random1Shift`]
//!   shakes and [`ThreeOpt`] descent
//! - [`solve_ga`] — random population, [`Eax`] crossover and [`ThreeOpt`]
//!   mutation
//!
//! Both run with the seed from their configuration, or an OS seed when none
//! is set. Use [`VnsStrategy`] or [`GaStrategy`] directly for observers,
//! stop conditions or other roles.

use std::sync::Arc;

use crate::constructive::{CheapestInsertionGenerator, RandomTourGenerator};
use crate::evaluation::{Candidate, Objective};
use crate::ga::Eax;
use crate::local_search::{Random1Shift, ThreeOpt};
use crate::strategies::{GaConfig, GaStrategy, TournamentSelector, VnsConfig, VnsStrategy};

/// Solves with Variable Neighbourhood Search.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::evaluation::TourWeightObjective;
/// use u_tour::models::TspProblem;
/// use u_tour::solver::solve_vns;
/// use u_tour::strategies::VnsConfig;
///
/// let problem = Arc::new(
///     TspProblem::from_fn(6, 0, Some(0), |i, j| (i as f64 - j as f64).abs()).unwrap(),
/// );
/// let objective = Arc::new(TourWeightObjective::<TspProblem>::new());
/// let config = VnsConfig::default().with_max_iterations(50).with_seed(7);
///
/// let best = solve_vns(&problem, &objective, config);
/// assert_eq!(*best.fitness(), 10.0);
/// ```
pub fn solve_vns<O>(
    problem: &Arc<O::Problem>,
    objective: &Arc<O>,
    config: VnsConfig,
) -> Candidate<O>
where
    O: Objective + 'static,
{
    VnsStrategy::new(
        CheapestInsertionGenerator::new(),
        Random1Shift::new(),
        ThreeOpt::new(),
    )
    .with_config(config)
    .run(problem, objective)
}

/// Solves with the steady-state Genetic Algorithm and EAX crossover.
pub fn solve_ga<O>(problem: &Arc<O::Problem>, objective: &Arc<O>, config: GaConfig) -> Candidate<O>
where
    O: Objective + 'static,
{
    GaStrategy::new(RandomTourGenerator::new(), Eax::default(), TournamentSelector::default())
        .with_mutation(ThreeOpt::new())
        .with_config(config)
        .run(problem, objective)
}
