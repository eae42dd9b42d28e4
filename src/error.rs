//! Error type shared by tour construction and problem validation.

use std::fmt;

/// Errors raised when building tours and problems from external input.
///
/// Search outcomes (no improving move, infeasible insertion) are not errors;
/// operators signal them through their return values.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// A turn code outside `0..=3`.
    InvalidTurn(u8),
    /// A visit id appears more than once.
    DuplicateVisit(usize),
    /// A visit id does not fit in the tour's id space.
    VisitOutOfRange { visit: usize, capacity: usize },
    /// A fixed last visit that is not the final element of the sequence.
    InvalidLast(usize),
    /// A tour needs at least its first visit.
    EmptyTour,
    /// The visit is not part of the tour.
    MissingVisit(usize),
    /// First or a fixed last visit cannot be moved or removed.
    FixedVisit(usize),
    /// Weight data does not match the problem size.
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result alias for fallible constructors in this crate.
pub type RoutingResult<T> = Result<T, RoutingError>;

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTurn(code) => write!(f, "turn code {code} is outside 0..=3"),
            Self::DuplicateVisit(v) => write!(f, "visit {v} appears more than once"),
            Self::VisitOutOfRange { visit, capacity } => {
                write!(f, "visit {visit} is outside the id space [0, {capacity})")
            }
            Self::InvalidLast(v) => write!(f, "fixed last visit {v} must end the sequence"),
            Self::EmptyTour => write!(f, "a tour needs at least one visit"),
            Self::MissingVisit(v) => write!(f, "visit {v} is not in the tour"),
            Self::FixedVisit(v) => write!(f, "visit {v} is fixed and cannot be moved"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "expected {expected} weights, got {actual}")
            }
        }
    }
}

impl std::error::Error for RoutingError {}
