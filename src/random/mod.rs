//! Seeded randomness for generators, operators, and perturbers.
//!
//! - [`RandomGenerator`] — Seeded pseudo-random draws, owned by one search
//! - [`RandomPool`] — Draws ids from a fixed set without repetition
//! - [`seeds`] — Seed-selection heuristics for construction

mod generator;
mod pool;
pub mod seeds;

pub use generator::RandomGenerator;
pub use pool::RandomPool;
