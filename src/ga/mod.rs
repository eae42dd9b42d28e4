//! Genetic algorithm components for tours.
//!
//! - [`Eax`] — Edge assembly crossover over AB-cycles (Nagata & Kobayashi, 1997)
//! - [`EaxConfig`] — Offspring and neighbourhood limits for [`Eax`]

mod eax;

pub use eax::{Eax, EaxConfig};
