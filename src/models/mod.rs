//! Problem definitions.
//!
//! - [`TourProblem`] — The read-only view every operator works against
//! - [`TspProblem`] — Symmetric, asymmetric, open, time-windowed, and selective TSP
//! - [`DirectedTspProblem`] — TSP with a direction choice and turn penalty per visit
//! - [`TimeWindow`] — Allowed start times of a visit

mod directed;
mod problem;
mod time_window;

pub use directed::DirectedTspProblem;
pub use problem::{TourProblem, TspProblem, DEFAULT_NEAREST_COUNT};
pub use time_window::TimeWindow;
