//! # u-tour
//!
//! Tour optimization engine: metaheuristic drivers, local search and
//! crossover operators over a compact successor-array tour, for TSP, ATSP,
//! TSP with time windows, selective TSP and turn-penalised directed TSP.
//!
//! ## Modules
//!
//! - [`tours`] — Tour representation, directed id packing, cycle decomposition
//! - [`distance`] — Weight matrix and nearest-neighbour lists
//! - [`models`] — Problem trait, TSP and directed TSP problems, time windows
//! - [`evaluation`] — Objectives, candidates, time-window schedules
//! - [`strategies`] — Strategy roles, VNS and GA drivers, combinators
//! - [`constructive`] — Tour generators (random, nearest neighbour, cheapest insertion, brute force)
//! - [`local_search`] — Cheapest insertion, 2-opt, 3-opt, 1-shift, turn optimization
//! - [`ga`] — Edge assembly crossover
//! - [`random`] — Seedable random source, draw pools, seed heuristics
//! - [`solver`] — Ready-made VNS and GA solvers
//! - [`error`] — Error type for tour and problem construction

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod local_search;
pub mod models;
pub mod random;
pub mod solver;
pub mod strategies;
pub mod tours;
