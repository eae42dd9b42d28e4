//! Directed visit ids.
//!
//! A turn-penalised problem visits each location in one of four turns,
//! combining the direction the vehicle arrives in with the direction it
//! leaves in. The visit and its turn are packed into a single tour id:
//!
//! ```text
//! directed = visit * 4 + turn
//! ```
//!
//! Weights between locations are stored per (visit, direction) side, so a
//! directed id also maps to an arrival side and a departure side:
//!
//! ```text
//! side = visit * 2 + direction
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RoutingError, RoutingResult};

/// Direction a location is entered or left in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward = 0,
    Backward = 1,
}

impl Direction {
    fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

/// Arrival and departure direction at a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    ForwardForward = 0,
    ForwardBackward = 1,
    BackwardForward = 2,
    BackwardBackward = 3,
}

impl Turn {
    /// All turns in code order.
    pub const ALL: [Turn; 4] = [
        Turn::ForwardForward,
        Turn::ForwardBackward,
        Turn::BackwardForward,
        Turn::BackwardBackward,
    ];

    /// Combines an arrival and a departure direction.
    pub fn new(arrival: Direction, departure: Direction) -> Self {
        match (arrival, departure) {
            (Direction::Forward, Direction::Forward) => Self::ForwardForward,
            (Direction::Forward, Direction::Backward) => Self::ForwardBackward,
            (Direction::Backward, Direction::Forward) => Self::BackwardForward,
            (Direction::Backward, Direction::Backward) => Self::BackwardBackward,
        }
    }

    /// The 2-bit code of this turn.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Direction of arrival.
    pub fn arrival(self) -> Direction {
        Direction::from_bit(self.code() >> 1)
    }

    /// Direction of departure.
    pub fn departure(self) -> Direction {
        Direction::from_bit(self.code())
    }

    /// Returns `true` if the vehicle leaves opposite to how it arrived.
    pub fn is_u_turn(self) -> bool {
        self.arrival() != self.departure()
    }
}

impl TryFrom<u8> for Turn {
    type Error = RoutingError;

    fn try_from(code: u8) -> RoutingResult<Self> {
        match code {
            0 => Ok(Self::ForwardForward),
            1 => Ok(Self::ForwardBackward),
            2 => Ok(Self::BackwardForward),
            3 => Ok(Self::BackwardBackward),
            _ => Err(RoutingError::InvalidTurn(code)),
        }
    }
}

/// Packs a visit and a turn into a directed id.
///
/// # Examples
///
/// ```
/// use u_tour::tours::{pack, unpack, Turn};
///
/// let id = pack(7, Turn::BackwardForward);
/// assert_eq!(id, 30);
/// assert_eq!(unpack(id), (7, Turn::BackwardForward));
/// ```
#[inline]
pub fn pack(visit: usize, turn: Turn) -> usize {
    visit * 4 + turn as usize
}

/// Packs a visit and a raw turn code, rejecting codes outside `0..=3`.
pub fn pack_code(visit: usize, code: u8) -> RoutingResult<usize> {
    Ok(pack(visit, Turn::try_from(code)?))
}

/// Splits a directed id into its visit and turn.
#[inline]
pub fn unpack(directed: usize) -> (usize, Turn) {
    (visit_of(directed), turn_of(directed))
}

/// The visit of a directed id.
#[inline]
pub fn visit_of(directed: usize) -> usize {
    directed / 4
}

/// The turn of a directed id.
#[inline]
pub fn turn_of(directed: usize) -> Turn {
    match directed % 4 {
        0 => Turn::ForwardForward,
        1 => Turn::ForwardBackward,
        2 => Turn::BackwardForward,
        _ => Turn::BackwardBackward,
    }
}

/// Weight-matrix side of a visit entered or left in `direction`.
#[inline]
pub fn side(visit: usize, direction: Direction) -> usize {
    visit * 2 + direction as usize
}

/// The side a directed id is arrived at.
#[inline]
pub fn arrival_side(directed: usize) -> usize {
    let (visit, turn) = unpack(directed);
    side(visit, turn.arrival())
}

/// The side a directed id is left from.
#[inline]
pub fn departure_side(directed: usize) -> usize {
    let (visit, turn) = unpack(directed);
    side(visit, turn.departure())
}
