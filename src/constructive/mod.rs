//! Constructive heuristics for building initial tours.
//!
//! - [`RandomTourGenerator`] — Free visits appended in random order, O(n)
//! - [`NearestNeighbourGenerator`] — Greedy nearest-neighbour, O(n²)
//! - [`CheapestInsertionGenerator`] — Seeded cheapest insertion (Rosenkrantz et al., 1977), O(n³);
//!   the seed follows a [`SeedRule`]
//! - [`BruteForceGenerator`] — Exhaustive enumeration for tiny problems (Heap, 1963), O(n!)

mod brute_force;
mod cheapest_insertion;
mod nearest_neighbor;
mod random_tour;

pub use brute_force::{brute_force, BruteForceGenerator};
pub use cheapest_insertion::{CheapestInsertionGenerator, SeedRule};
pub use nearest_neighbor::NearestNeighbourGenerator;
pub use random_tour::RandomTourGenerator;
