//! Objectives and evaluated candidates.
//!
//! - [`Objective`] — Fitness arithmetic and total order over tours
//! - [`Candidate`] — A tour bound to its problem, objective, and fitness
//! - [`TourEvaluator`] — Walks a tour in time against its windows
//! - [`TourWeightObjective`] — Total weight
//! - [`TimeWindowObjective`] — Window violations, then elapsed time
//! - [`SelectiveObjective`] — Visit count, then weight

mod candidate;
mod evaluator;
mod objective;
mod selective;
mod weight;
mod windows;

pub use candidate::Candidate;
pub use evaluator::{Arrival, Schedule, TourEvaluator};
pub use objective::Objective;
pub use selective::{SelectiveFitness, SelectiveObjective};
pub use weight::TourWeightObjective;
pub use windows::{TimeWindowFitness, TimeWindowObjective};
