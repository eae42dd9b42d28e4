//! Time windows.

use serde::{Deserialize, Serialize};

/// The times at which a visit may start, as a list of `[start, end)` windows.
///
/// Times are stored flat: `[s0, e0, s1, e1, ...]`. An empty list means the
/// visit is unconstrained. An odd trailing value opens a final window that
/// never closes. Arriving before a window means waiting for it to open;
/// arriving after the last window closes is a violation.
///
/// # Examples
///
/// ```
/// use u_tour::models::TimeWindow;
///
/// let tw = TimeWindow::new(vec![100.0, 200.0, 300.0]).unwrap();
/// assert!(tw.contains(150.0));
/// assert_eq!(tw.wait(250.0), Some(50.0));
/// assert_eq!(tw.wait(1e9), Some(0.0)); // last window is unbounded
///
/// let closed = TimeWindow::between(0.0, 10.0).unwrap();
/// assert!(closed.is_violated(10.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    times: Vec<f64>,
}

impl TimeWindow {
    /// A window that accepts any time.
    pub fn unlimited() -> Self {
        Self { times: Vec::new() }
    }

    /// Creates windows from flat `[start, end, start, end, ...]` times.
    ///
    /// Returns `None` if a time is non-finite or the times decrease.
    pub fn new(times: Vec<f64>) -> Option<Self> {
        if times.iter().any(|t| !t.is_finite()) {
            return None;
        }
        if times.windows(2).any(|w| w[0] > w[1]) {
            return None;
        }
        Some(Self { times })
    }

    /// A single window `[start, end)`.
    pub fn between(start: f64, end: f64) -> Option<Self> {
        Self::new(vec![start, end])
    }

    /// A single window opening at `start` that never closes.
    pub fn from_time(start: f64) -> Option<Self> {
        Self::new(vec![start])
    }

    /// Returns `true` if no time is excluded.
    pub fn is_unlimited(&self) -> bool {
        self.times.is_empty()
    }

    /// The flat window times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The windows as `(start, end)` pairs; an unbounded end is infinite.
    pub fn windows(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times
            .chunks(2)
            .map(|c| (c[0], c.get(1).copied().unwrap_or(f64::INFINITY)))
    }

    /// Returns `true` if `time` falls inside a window.
    pub fn contains(&self, time: f64) -> bool {
        self.is_unlimited() || self.windows().any(|(s, e)| time >= s && time < e)
    }

    /// Waiting time until a window is open at or after `arrival`.
    ///
    /// Zero if already inside a window, `None` if every window has closed.
    pub fn wait(&self, arrival: f64) -> Option<f64> {
        if self.is_unlimited() {
            return Some(0.0);
        }
        self.windows()
            .find(|&(_, e)| arrival < e)
            .map(|(s, _)| (s - arrival).max(0.0))
    }

    /// Returns `true` if arriving at `arrival` misses every window.
    pub fn is_violated(&self, arrival: f64) -> bool {
        self.wait(arrival).is_none()
    }

    /// Distance from `time` to the closest window, zero when inside one.
    pub fn min_diff(&self, time: f64) -> f64 {
        if self.contains(time) {
            return 0.0;
        }
        self.windows()
            .map(|(s, e)| if time < s { s - time } else { time - e })
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited() {
        let tw = TimeWindow::unlimited();
        assert!(tw.is_unlimited());
        assert!(tw.contains(-5.0));
        assert_eq!(tw.wait(1e12), Some(0.0));
        assert_eq!(tw.min_diff(3.0), 0.0);
    }

    #[test]
    fn test_invalid() {
        assert!(TimeWindow::new(vec![5.0, 1.0]).is_none());
        assert!(TimeWindow::new(vec![0.0, f64::NAN]).is_none());
        assert!(TimeWindow::between(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_single_window() {
        let tw = TimeWindow::between(10.0, 20.0).expect("valid");
        assert_eq!(tw.wait(5.0), Some(5.0));
        assert_eq!(tw.wait(15.0), Some(0.0));
        assert_eq!(tw.wait(20.0), None);
        assert!(tw.is_violated(25.0));
        assert_eq!(tw.min_diff(25.0), 5.0);
        assert_eq!(tw.min_diff(7.0), 3.0);
    }

    #[test]
    fn test_multiple_windows() {
        let tw = TimeWindow::new(vec![0.0, 10.0, 20.0, 30.0]).expect("valid");
        assert_eq!(tw.wait(15.0), Some(5.0));
        assert!(!tw.contains(15.0));
        assert_eq!(tw.min_diff(12.0), 2.0);
        assert!(tw.is_violated(31.0));
    }

    #[test]
    fn test_unbounded_trailing() {
        let tw = TimeWindow::new(vec![0.0, 10.0, 50.0]).expect("valid");
        assert_eq!(tw.windows().collect::<Vec<_>>(), vec![(0.0, 10.0), (50.0, f64::INFINITY)]);
        assert_eq!(tw.wait(20.0), Some(30.0));
        assert!(tw.contains(1e9));
        let open = TimeWindow::from_time(5.0).expect("valid");
        assert_eq!(open.wait(0.0), Some(5.0));
    }
}
