//! Seed-selection heuristics for construction.
//!
//! A seed is the first visit placed into a tour that otherwise only holds
//! its fixed endpoints. Picking a good one matters most for insertion
//! heuristics, which tend to stay close to whatever they start from.

use super::RandomGenerator;
use crate::distance::NearestNeighbourArray;

/// Picks a uniformly random visit from the pool.
pub fn random_seed(pool: &[usize], random: &mut RandomGenerator) -> Option<usize> {
    if pool.is_empty() {
        return None;
    }
    Some(pool[random.generate(pool.len())])
}

/// Picks the visit with the largest round-trip cost from `from`.
///
/// # Examples
///
/// ```
/// use u_tour::random::seeds::farthest_from;
///
/// let cost = |i: usize, j: usize| (i as f64 - j as f64).abs();
/// assert_eq!(farthest_from(0, &[1, 3, 2], cost), Some(3));
/// ```
pub fn farthest_from<F>(from: usize, pool: &[usize], cost: F) -> Option<usize>
where
    F: Fn(usize, usize) -> f64,
{
    pool.iter()
        .copied()
        .filter(|&v| v != from)
        .max_by(|&a, &b| {
            let da = cost(from, a) + cost(a, from);
            let db = cost(from, b) + cost(b, from);
            da.total_cmp(&db).then(b.cmp(&a))
        })
}

/// Picks the visit whose nearest neighbours overlap the pool the most.
///
/// Ties are broken uniformly at random. A seed inside a dense cluster of
/// unplaced visits gives insertion a cheap neighbourhood to grow from.
pub fn with_close_neighbours(
    pool: &[usize],
    nearest: &NearestNeighbourArray,
    random: &mut RandomGenerator,
) -> Option<usize> {
    let mut in_pool = vec![false; nearest.len()];
    for &v in pool {
        if v < in_pool.len() {
            in_pool[v] = true;
        }
    }

    let mut best: Option<usize> = None;
    let mut best_score = 0;
    let mut ties = 0;
    for &v in pool {
        if v >= nearest.len() {
            continue;
        }
        let score = nearest.forward(v).iter().filter(|&&x| in_pool[x]).count();
        if best.is_none() || score > best_score {
            best = Some(v);
            best_score = score;
            ties = 1;
        } else if score == best_score {
            ties += 1;
            if random.generate(ties) == 0 {
                best = Some(v);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(i: usize, j: usize) -> f64 {
        (i as f64 - j as f64).abs()
    }

    #[test]
    fn test_random_seed_in_pool() {
        let mut random = RandomGenerator::new(1);
        for _ in 0..50 {
            let s = random_seed(&[4, 5, 6], &mut random).expect("non-empty");
            assert!((4..=6).contains(&s));
        }
        assert!(random_seed(&[], &mut random).is_none());
    }

    #[test]
    fn test_farthest_ignores_origin() {
        assert_eq!(farthest_from(5, &[5], line), None);
        assert_eq!(farthest_from(5, &[5, 4, 9], line), Some(9));
    }

    #[test]
    fn test_close_neighbours_prefers_cluster() {
        // 0,1,2 are clustered; 9 only has unpooled ids nearby.
        let cost = |i: usize, j: usize| {
            if i == j {
                0.0
            } else if i < 3 && j < 3 {
                1.0
            } else if i == 9 && (3..9).contains(&j) {
                5.0
            } else {
                100.0
            }
        };
        let nn = NearestNeighbourArray::new(10, 2, cost);
        let mut random = RandomGenerator::new(3);
        let seed = with_close_neighbours(&[0, 1, 2, 9], &nn, &mut random).expect("non-empty");
        assert!(seed < 3);
    }
}
