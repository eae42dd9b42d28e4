//! Travel-cost storage and neighbourhood lookups.

mod matrix;
mod nearest;

pub use matrix::WeightMatrix;
pub use nearest::NearestNeighbourArray;
