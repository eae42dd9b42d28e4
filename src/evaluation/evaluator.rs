//! Tour schedule evaluator that computes timing and time-window feasibility.

use crate::models::TourProblem;
use crate::tours::Tour;

/// Timing of one visit in a [`Schedule`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    /// Tour id of the visit.
    pub id: usize,
    /// Time the visit is reached.
    pub arrival: f64,
    /// Time service starts, after any wait for the window to open.
    pub start: f64,
    /// Whether the visit was reached after its last window closed.
    pub violated: bool,
}

/// Timing and feasibility of a whole tour.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    arrivals: Vec<Arrival>,
    violations: usize,
    weight: f64,
    duration: f64,
}

impl Schedule {
    /// Per-visit timing, in tour order. A closed tour ends with its return to `first`.
    pub fn arrivals(&self) -> &[Arrival] {
        &self.arrivals
    }

    /// Number of visits reached after their windows closed.
    pub fn violations(&self) -> usize {
        self.violations
    }

    /// Total travel weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Elapsed time from leaving `first` to the last arrival, waits included.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns `true` if no window is violated.
    pub fn is_feasible(&self) -> bool {
        self.violations == 0
    }
}

/// Evaluates tours by walking them in time, treating weights as travel times.
///
/// The tour leaves `first` at time 0. At each visit the traveller waits for
/// the next window to open, or records a violation and carries on if every
/// window has closed.
///
/// # Examples
///
/// ```
/// use u_tour::evaluation::TourEvaluator;
/// use u_tour::models::{TimeWindow, TspProblem};
/// use u_tour::tours::Tour;
///
/// let problem = TspProblem::from_fn(3, 0, None, |i, j| (i as f64 - j as f64).abs() * 5.0)
///     .unwrap()
///     .with_windows(vec![
///         TimeWindow::unlimited(),
///         TimeWindow::between(20.0, 100.0).unwrap(),
///         TimeWindow::between(0.0, 10.0).unwrap(),
///     ])
///     .unwrap();
///
/// let tour = Tour::new([0, 1, 2], None).unwrap();
/// let schedule = TourEvaluator::new(&problem).schedule(&tour);
/// // Arrive at 1 at t=5, wait until 20, reach 2 at 25 > 10.
/// assert_eq!(schedule.violations(), 1);
/// assert_eq!(schedule.duration(), 25.0);
/// ```
pub struct TourEvaluator<'a, P: TourProblem + ?Sized> {
    problem: &'a P,
}

impl<'a, P: TourProblem + ?Sized> TourEvaluator<'a, P> {
    /// Creates a new evaluator for the given problem.
    pub fn new(problem: &'a P) -> Self {
        Self { problem }
    }

    /// Walks `tour` and records the timing of every visit.
    pub fn schedule(&self, tour: &Tour) -> Schedule {
        self.walk(tour.iter(), tour.is_closed())
    }

    /// Counts violated windows only.
    pub fn violations(&self, tour: &Tour) -> usize {
        self.schedule(tour).violations
    }

    fn walk<I>(&self, visits: I, closed: bool) -> Schedule
    where
        I: Iterator<Item = usize>,
    {
        let windows = self.problem.windows();
        let mut arrivals: Vec<Arrival> = Vec::new();
        let mut violations = 0;
        let mut weight = 0.0;
        let mut time = 0.0;
        let mut prev: Option<usize> = None;
        let mut head: Option<usize> = None;

        let mut reach = |id: usize, from: usize, time: &mut f64, arrivals: &mut Vec<Arrival>| {
            let travel = self.problem.weight(from, id);
            weight += travel;
            let arrival = *time + travel;

            let wait = match windows {
                Some(w) => w[self.problem.visit_of(id)].wait(arrival),
                None => Some(0.0),
            };
            let violated = wait.is_none();
            if violated {
                violations += 1;
            }
            let start = arrival + wait.unwrap_or(0.0);
            arrivals.push(Arrival {
                id,
                arrival,
                start,
                violated,
            });
            *time = start;
        };

        for id in visits {
            match prev {
                None => {
                    head = Some(id);
                    arrivals.push(Arrival {
                        id,
                        arrival: 0.0,
                        start: 0.0,
                        violated: false,
                    });
                }
                Some(from) => reach(id, from, &mut time, &mut arrivals),
            }
            prev = Some(id);
        }

        // Return to the start of a closed tour.
        if let (true, Some(from), Some(first)) = (closed, prev, head) {
            reach(first, from, &mut time, &mut arrivals);
        }

        Schedule {
            arrivals,
            violations,
            weight,
            duration: time,
        }
    }
}
