//! Tour representations.
//!
//! - [`Tour`] — Successor-array visit sequence with O(1) insert, remove, and shift
//! - [`directed`] — Packing of a visit and its turn into one id
//! - [`AsymmetricCycles`] — Cycle decomposition of a successor array

mod cycles;
pub mod directed;
mod tour;

pub use cycles::AsymmetricCycles;
pub use directed::{pack, pack_code, unpack, Direction, Turn};
pub use tour::{Iter, Pairs, Shift, Tour};

/// Sentinel for "no visit" in raw successor arrays.
pub const NO_VISIT: usize = usize::MAX;
