//! Dense weight matrix.

use crate::error::{RoutingError, RoutingResult};

/// A dense n×n travel-cost matrix stored in row-major order.
///
/// Costs may be asymmetric. The matrix is the usual way to hand the output
/// of an external routing layer to a problem; a cost closure can be
/// materialised with [`WeightMatrix::from_fn`].
///
/// # Examples
///
/// ```
/// use u_tour::distance::WeightMatrix;
///
/// let wm = WeightMatrix::from_fn(3, |i, j| if i == j { 0.0 } else { (i + j) as f64 });
/// assert_eq!(wm.get(1, 2), 3.0);
/// assert_eq!(wm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    data: Vec<f64>,
    size: usize,
}

impl WeightMatrix {
    /// Creates a weight matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Evaluates a cost function for every ordered pair.
    pub fn from_fn<F>(size: usize, cost: F) -> Self
    where
        F: Fn(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(size * size);
        for from in 0..size {
            for to in 0..size {
                data.push(cost(from, to));
            }
        }
        Self { data, size }
    }

    /// Creates a weight matrix from an explicit n×n grid.
    pub fn from_data(size: usize, data: Vec<f64>) -> RoutingResult<Self> {
        if data.len() != size * size {
            return Err(RoutingError::DimensionMismatch {
                expected: size * size,
                actual: data.len(),
            });
        }
        Ok(Self { data, size })
    }

    /// Creates a weight matrix from nested rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> RoutingResult<Self> {
        let size = rows.len();
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        if rows.iter().any(|r| r.len() != size) {
            return Err(RoutingError::DimensionMismatch {
                expected: size * size,
                actual: data.len(),
            });
        }
        Ok(Self { data, size })
    }

    /// Returns the cost of travelling from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the cost of travelling from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, weight: f64) {
        self.data[from * self.size + to] = weight;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the candidate closest to `from`.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn nearest_neighbour(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by(|&a, &b| self.get(from, a).total_cmp(&self.get(from, b)))
    }
}
