//! Search strategies and the roles they are built from.
//!
//! - [`Generator`], [`Operator`], [`Perturber`], [`CrossOverOperator`], [`Selector`] — Strategy roles
//! - [`VnsStrategy`] — Variable Neighbourhood Search driver
//! - [`GaStrategy`] — Steady-state Genetic Algorithm driver
//! - [`TournamentSelector`] — Probabilistic tournament parent selection
//! - [`IterativeStrategy`] — Multi-start generation
//! - [`Iterate`], [`OperatorChain`], [`OperatorPerturber`], [`Improved`] — Role combinators
//! - [`StopHandle`] — Cooperative cancellation

mod combinators;
mod ga;
mod iterative;
mod roles;
mod selector;
mod stop;
mod vns;

pub use combinators::{Improved, Iterate, OperatorChain, OperatorPerturber};
pub use ga::{GaConfig, GaStrategy};
pub use iterative::IterativeStrategy;
pub use roles::{
    CrossOverOperator, Generator, Observer, Operator, Perturber, Selector, StopCondition,
};
pub use selector::TournamentSelector;
pub use stop::StopHandle;
pub use vns::{VnsConfig, VnsStrategy};
