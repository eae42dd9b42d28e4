//! Precomputed k-nearest neighbour lists.

/// Top-k nearest ids per id, in both travel directions.
///
/// `forward(v)` lists the ids `x` with the smallest `cost(v, x)`,
/// `backward(v)` the ids with the smallest `cost(x, v)`, both ascending.
/// Built once per problem instance and read-only afterwards, so it can be
/// shared between concurrent searches.
///
/// # Examples
///
/// ```
/// use u_tour::distance::NearestNeighbourArray;
///
/// let cost = |i: usize, j: usize| (i as f64 - j as f64).abs();
/// let nn = NearestNeighbourArray::new(5, 2, cost);
/// assert_eq!(nn.forward(0), &[1, 2]);
/// assert_eq!(nn.k(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NearestNeighbourArray {
    k: usize,
    forward: Vec<usize>,
    forward_offsets: Vec<usize>,
    backward: Vec<usize>,
    backward_offsets: Vec<usize>,
}

impl NearestNeighbourArray {
    /// Builds the lists for ids `0..count`, never listing an id as its own neighbour.
    pub fn new<F>(count: usize, k: usize, cost: F) -> Self
    where
        F: Fn(usize, usize) -> f64,
    {
        Self::with_filter(count, k, cost, |a, b| a == b)
    }

    /// Builds the lists, skipping every pair for which `related(v, x)` holds.
    ///
    /// Directed problems use this to keep the other turns of the same visit
    /// out of a visit's neighbourhood.
    pub fn with_filter<F, R>(count: usize, k: usize, cost: F, related: R) -> Self
    where
        F: Fn(usize, usize) -> f64,
        R: Fn(usize, usize) -> bool,
    {
        let (forward, forward_offsets) = build_lists(count, k, |v, x| cost(v, x), &related);
        let (backward, backward_offsets) = build_lists(count, k, |v, x| cost(x, v), &related);
        Self {
            k,
            forward,
            forward_offsets,
            backward,
            backward_offsets,
        }
    }

    /// Maximum number of neighbours per id.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of ids covered.
    pub fn len(&self) -> usize {
        self.forward_offsets.len().saturating_sub(1)
    }

    /// Returns `true` if no ids are covered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids closest to reach from `v`, nearest first.
    pub fn forward(&self, v: usize) -> &[usize] {
        &self.forward[self.forward_offsets[v]..self.forward_offsets[v + 1]]
    }

    /// Ids from which `v` is closest to reach, nearest first.
    pub fn backward(&self, v: usize) -> &[usize] {
        &self.backward[self.backward_offsets[v]..self.backward_offsets[v + 1]]
    }
}

fn build_lists<F, R>(count: usize, k: usize, cost: F, related: &R) -> (Vec<usize>, Vec<usize>)
where
    F: Fn(usize, usize) -> f64,
    R: Fn(usize, usize) -> bool,
{
    let mut lists = Vec::with_capacity(count * k.min(count));
    let mut offsets = Vec::with_capacity(count + 1);
    offsets.push(0);
    let mut row: Vec<(f64, usize)> = Vec::with_capacity(count);

    for v in 0..count {
        row.clear();
        row.extend(
            (0..count)
                .filter(|&x| !related(v, x))
                .map(|x| (cost(v, x), x)),
        );
        let take = k.min(row.len());
        if take > 0 && take < row.len() {
            row.select_nth_unstable_by(take - 1, |a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        }
        row[..take].sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        lists.extend(row[..take].iter().map(|&(_, x)| x));
        offsets.push(lists.len());
    }

    (lists, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(i: usize, j: usize) -> f64 {
        (i as f64 - j as f64).abs()
    }

    #[test]
    fn test_forward_sorted() {
        let nn = NearestNeighbourArray::new(6, 3, line);
        assert_eq!(nn.forward(3), &[2, 4, 1]);
        assert_eq!(nn.len(), 6);
    }

    #[test]
    fn test_excludes_self() {
        let nn = NearestNeighbourArray::new(4, 10, line);
        for v in 0..4 {
            assert!(!nn.forward(v).contains(&v));
            assert_eq!(nn.forward(v).len(), 3);
        }
    }

    #[test]
    fn test_backward_asymmetric() {
        // Reaching 0 is cheap only from 2.
        let cost = |i: usize, j: usize| if j == 0 && i == 2 { 1.0 } else { 10.0 + i as f64 };
        let nn = NearestNeighbourArray::new(3, 1, cost);
        assert_eq!(nn.backward(0), &[2]);
        assert_eq!(nn.forward(0), &[1]);
    }

    #[test]
    fn test_filter() {
        // Pairs (0,1) and (2,3) are related.
        let nn = NearestNeighbourArray::with_filter(4, 3, line, |a, b| a / 2 == b / 2);
        assert_eq!(nn.forward(1), &[2, 3]);
        assert_eq!(nn.forward(2), &[1, 0]);
    }

    #[test]
    fn test_empty() {
        let nn = NearestNeighbourArray::new(0, 3, line);
        assert!(nn.is_empty());
    }
}
