//! Local search operators and perturbers for tours.
//!
//! - [`CheapestInsertion`] — Pull visits out (or in) and reinsert at the cheapest position
//! - [`TwoOpt`] — First-improvement segment reversal
//! - [`ThreeOpt`] — Or-3opt hill climbing with neighbour lists and don't-look bits
//! - [`Random1Shift`] — Random relocation of single visits
//! - [`TurnOptimizer`] — Cheapest turn per visit for directed tours

mod cheapest_insertion;
mod random_shift;
mod three_opt;
mod turn_opt;
mod two_opt;

pub use cheapest_insertion::{best_insertion, insertion_cost, CheapestInsertion, Insertion};
pub use random_shift::{shift_delta, Random1Shift};
pub use three_opt::ThreeOpt;
pub use turn_opt::TurnOptimizer;
pub use two_opt::TwoOpt;
