//! Edge assembly crossover (EAX).
//!
//! # Algorithm
//!
//! 1. Write both parents as successor arrays `next_a` and `next_b`; open
//!    tours and tours with a fixed last visit are closed by an edge back to
//!    the first visit that costs nothing
//! 2. Decompose the edges the parents do not share into AB-cycles: the
//!    permutation `u → prev_b(next_a(u))` alternates an A-edge forward with
//!    a B-edge backward, and its non-trivial cycles are the AB-cycles
//! 3. For each trial, apply one AB-cycle (the E-set) to parent A: every
//!    A-edge `u → next_a(u)` on the cycle is replaced by the B-edge ending
//!    in `next_a(u)`, which leaves a set of subtours
//! 4. Merge the subtours, smallest first, by the cheapest 2-exchange with a
//!    neighbouring subtour
//! 5. Keep the best offspring over all trials
//!
//! Neither step reverses a path, so the crossover is exact for asymmetric
//! weights.
//!
//! # Complexity
//!
//! O(t · (n + s · n · k)) for `t` trials, `s` subtours and `k` neighbours.
//!
//! # Reference
//!
//! Nagata, Y. & Kobayashi, S. (1997). "Edge Assembly Crossover: A
//! High-power Genetic Algorithm for the Traveling Salesman Problem",
//! *Proceedings of the 7th ICGA*, 450-457.
//!
//! Nagata, Y. & Soler, D. (2012). "A new genetic algorithm for the
//! asymmetric traveling salesman problem", *Expert Systems with
//! Applications* 39(10), 8947-8953.

use std::cmp::Ordering;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::constructive::brute_force;
use crate::evaluation::{Candidate, Objective};
use crate::models::TourProblem;
use crate::random::RandomGenerator;
use crate::strategies::CrossOverOperator;
use crate::tours::{AsymmetricCycles, Tour, NO_VISIT};

/// Tours with fewer visits are solved by enumeration instead.
const MIN_VISITS: usize = 5;

/// Configuration for [`Eax`].
///
/// # Examples
///
/// ```
/// use u_tour::ga::EaxConfig;
///
/// let config = EaxConfig::default().with_max_offspring(10);
/// assert_eq!(config.max_offspring, 10);
/// assert_eq!(config.nearest_count, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EaxConfig {
    /// Maximum number of offspring built per crossover, one per AB-cycle.
    pub max_offspring: usize,
    /// Neighbours consulted per visit when merging subtours.
    pub nearest_count: usize,
}

impl Default for EaxConfig {
    fn default() -> Self {
        Self {
            max_offspring: 30,
            nearest_count: 10,
        }
    }
}

impl EaxConfig {
    /// Sets the number of offspring per crossover (at least 1).
    pub fn with_max_offspring(mut self, n: usize) -> Self {
        self.max_offspring = n.max(1);
        self
    }

    /// Sets the neighbours consulted when merging subtours.
    pub fn with_nearest_count(mut self, k: usize) -> Self {
        self.nearest_count = k;
        self
    }
}

/// Edge assembly crossover over successor arrays.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::evaluation::{Candidate, TourWeightObjective};
/// use u_tour::ga::Eax;
/// use u_tour::models::TspProblem;
/// use u_tour::random::RandomGenerator;
/// use u_tour::strategies::CrossOverOperator;
/// use u_tour::tours::Tour;
///
/// let ring = |i: usize, j: usize| if j == (i + 1) % 5 { 1.0 } else { 10.0 };
/// let problem = Arc::new(TspProblem::from_fn(5, 0, Some(0), ring).unwrap());
/// let objective = Arc::new(TourWeightObjective::<TspProblem>::new());
/// let a = Candidate::new(Arc::clone(&problem), Arc::clone(&objective), Tour::new([0, 1, 2, 4, 3], Some(0)).unwrap());
/// let b = Candidate::new(problem, objective, Tour::new([0, 3, 4, 1, 2], Some(0)).unwrap());
///
/// let child = Eax::default().apply(&a, &b, &mut RandomGenerator::new(0));
/// assert_eq!(child.tour().to_vec(), vec![0, 1, 2, 3, 4]);
/// assert_eq!(*child.fitness(), 5.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Eax {
    config: EaxConfig,
}

impl Eax {
    /// Creates the crossover with the given configuration.
    pub fn new(config: EaxConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &EaxConfig {
        &self.config
    }

    /// Crosses two parents into the best offspring found.
    pub fn cross<O: Objective>(
        &self,
        parent1: &Candidate<O>,
        parent2: &Candidate<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O> {
        let a = parent1.tour();
        let b = parent2.tour();

        if a.count() != b.count() || a.iter().any(|v| !b.contains(v)) {
            warn!("eax: parents visit different sets, returning the better parent");
            return better(parent1, parent2).clone();
        }

        let problem = parent1.problem();
        let objective = parent1.objective();

        if a.count() < MIN_VISITS {
            warn!("eax: {} visits, falling back to brute force", a.count());
            let free: Vec<usize> = a
                .iter()
                .filter(|&v| v != a.first() && !a.is_fixed_last(v))
                .collect();
            return match brute_force(problem, objective, &free) {
                Some((tour, _)) => Candidate::new(
                    parent1.shared_problem().clone(),
                    parent1.shared_objective().clone(),
                    tour,
                ),
                None => better(parent1, parent2).clone(),
            };
        }

        match a.last() {
            None => warn!("eax: closing open tours with a free return edge"),
            Some(last) if last != a.first() => {
                warn!("eax: closing tours with fixed last {last} by a forced return edge")
            }
            _ => {}
        }

        let closed = Closed::new(problem, a);
        let capacity = a.capacity().max(b.capacity());
        let next_a = successors(a, capacity);
        let next_b = successors(b, capacity);
        let mut prev_b = vec![NO_VISIT; next_b.len()];
        for (u, &v) in next_b.iter().enumerate() {
            if v != NO_VISIT {
                prev_b[v] = u;
            }
        }

        let mut ab = AsymmetricCycles::new(next_a.len());
        for (u, &v) in next_a.iter().enumerate() {
            if v != NO_VISIT {
                ab.set_next(u, prev_b[v]);
            }
        }
        let mut starts: Vec<usize> = ab
            .cycles()
            .iter()
            .filter(|&(_, &len)| len > 1)
            .map(|(&start, _)| start)
            .collect();
        if starts.is_empty() {
            trace!("eax: parents share every edge");
            return parent1.clone();
        }
        random.shuffle(&mut starts);
        starts.truncate(self.config.max_offspring);
        debug!("eax: {} AB-cycles tried", starts.len());

        let mut best: Option<(Tour, O::Fitness)> = None;
        for start in starts {
            let mut child = AsymmetricCycles::from_next(next_a.clone());
            for u in ab.members(start) {
                child.set_next(ab.next(u), next_a[u]);
            }
            if !closed.merge(&mut child, self.config.nearest_count) {
                continue;
            }
            let Some(tour) = closed.open(&child) else {
                continue;
            };
            let fitness = objective.calculate(problem, &tour);
            if best
                .as_ref()
                .is_none_or(|(_, f)| objective.compare(&fitness, f) == Ordering::Less)
            {
                best = Some((tour, fitness));
            }
        }

        match best {
            Some((tour, _)) => Candidate::new(
                parent1.shared_problem().clone(),
                parent1.shared_objective().clone(),
                tour,
            ),
            None => better(parent1, parent2).clone(),
        }
    }
}

impl<O: Objective> CrossOverOperator<O> for Eax {
    fn name(&self) -> &str {
        "eax"
    }

    fn apply(
        &self,
        parent1: &Candidate<O>,
        parent2: &Candidate<O>,
        random: &mut RandomGenerator,
    ) -> Candidate<O> {
        self.cross(parent1, parent2, random)
    }
}

fn better<'a, O: Objective>(a: &'a Candidate<O>, b: &'a Candidate<O>) -> &'a Candidate<O> {
    if b.is_better_than(a) {
        b
    } else {
        a
    }
}

/// Successor array of a tour, closed by linking its tail back to `first`.
fn successors(tour: &Tour, capacity: usize) -> Vec<usize> {
    let mut next = vec![NO_VISIT; capacity];
    for (u, v) in tour.pairs() {
        next[u] = v;
    }
    if !tour.is_closed() {
        next[tour.tail()] = tour.first();
    }
    next
}

/// The closed-loop view of a problem used while assembling offspring.
struct Closed<'a, P: TourProblem + ?Sized> {
    problem: &'a P,
    first: usize,
    last: Option<usize>,
    /// The visit whose edge back to `first` must survive.
    forced: Option<usize>,
}

impl<'a, P: TourProblem + ?Sized> Closed<'a, P> {
    fn new(problem: &'a P, tour: &Tour) -> Self {
        let first = tour.first();
        let last = tour.last();
        Self {
            problem,
            first,
            last,
            forced: last.filter(|&l| l != first),
        }
    }

    /// Weight in the closed view: returning to `first` is free unless the
    /// tour really is a loop.
    fn weight(&self, from: usize, to: usize) -> f64 {
        if to == self.first && self.last != Some(self.first) {
            0.0
        } else {
            self.problem.weight(from, to)
        }
    }

    /// Joins all subtours into one by repeated cheapest 2-exchange.
    ///
    /// Returns `false` if a subtour cannot be joined.
    fn merge(&self, child: &mut AsymmetricCycles, k: usize) -> bool {
        loop {
            let cycles = child.cycles();
            if cycles.len() <= 1 {
                return true;
            }
            let Some(start) = cycles
                .iter()
                .min_by_key(|&(_, &len)| len)
                .map(|(&start, _)| start)
            else {
                return true;
            };

            let members = child.members(start);
            let mut inside = vec![false; child.len()];
            for &u in &members {
                inside[u] = true;
            }

            let view: &AsymmetricCycles = child;
            let exchange = self
                .best_exchange(view, &members, &inside, |v| {
                    self.problem.nearest().backward(v).iter().copied().take(k).collect()
                })
                .or_else(|| {
                    self.best_exchange(view, &members, &inside, |_| (0..view.len()).collect())
                });
            let Some((u, x)) = exchange else {
                return false;
            };

            let v = child.next(u);
            let y = child.next(x);
            child.set_next(u, y);
            child.set_next(x, v);
        }
    }

    /// Cheapest exchange of an edge `u → v` inside the subtour with an edge
    /// `x → y` outside it, reconnected as `u → y` and `x → v`.
    fn best_exchange<F>(
        &self,
        child: &AsymmetricCycles,
        members: &[usize],
        inside: &[bool],
        candidates: F,
    ) -> Option<(usize, usize)>
    where
        F: Fn(usize) -> Vec<usize>,
    {
        let mut best: Option<(usize, usize, f64)> = None;
        for &u in members {
            if Some(u) == self.forced {
                continue;
            }
            let v = child.next(u);
            for x in candidates(v) {
                if x >= child.len() || inside[x] || Some(x) == self.forced {
                    continue;
                }
                let y = child.next(x);
                if y == NO_VISIT {
                    continue;
                }
                let delta = self.weight(u, y) + self.weight(x, v)
                    - self.weight(u, v)
                    - self.weight(x, y);
                if best.is_none_or(|(_, _, d)| delta < d) {
                    best = Some((u, x, delta));
                }
            }
        }
        best.map(|(u, x, _)| (u, x))
    }

    /// Cuts the single remaining cycle back into a tour starting at `first`.
    fn open(&self, child: &AsymmetricCycles) -> Option<Tour> {
        let mut sequence = vec![self.first];
        let mut current = child.next(self.first);
        while current != self.first {
            if current == NO_VISIT || sequence.len() > child.len() {
                return None;
            }
            sequence.push(current);
            current = child.next(current);
        }
        Tour::with_capacity(child.len(), sequence, self.last).ok()
    }
}
