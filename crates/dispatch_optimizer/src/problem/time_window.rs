use std::cmp;

use serde::{Deserialize, Serialize};

/// Inclusive arrival window in seconds from the shift start.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    pub const fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    /// Window covering the whole shift.
    pub const fn shift(shift_length: i64) -> Self {
        TimeWindow {
            start: 0,
            end: shift_length,
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Clips the window to `[0, shift_length]`. The result can be empty
    /// (`start > end`) when the window lies outside the shift.
    pub fn clamp_to_shift(&self, shift_length: i64) -> Self {
        TimeWindow {
            start: cmp::max(self.start, 0),
            end: cmp::min(self.end, shift_length),
        }
    }

    pub fn is_satisfied(&self, arrival: i64) -> bool {
        self.start <= arrival && arrival <= self.end
    }

    pub fn overtime(&self, arrival: i64) -> i64 {
        cmp::max(arrival - self.end, 0)
    }

    /// Service starts at the later of arrival and window opening.
    pub fn service_start(&self, arrival: i64) -> i64 {
        cmp::max(arrival, self.start)
    }
}

impl From<(i64, i64)> for TimeWindow {
    fn from((start, end): (i64, i64)) -> Self {
        TimeWindow::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_satisfied_is_inclusive() {
        let window = TimeWindow::new(3600, 7200);

        assert!(!window.is_satisfied(3599));
        assert!(window.is_satisfied(3600));
        assert!(window.is_satisfied(7200));
        assert!(!window.is_satisfied(7201));
    }

    #[test]
    fn test_overtime() {
        let window = TimeWindow::new(0, 1800);

        assert_eq!(window.overtime(1000), 0);
        assert_eq!(window.overtime(1900), 100);
    }

    #[test]
    fn test_service_start_waits_for_opening() {
        let window = TimeWindow::new(7200, 10800);

        assert_eq!(window.service_start(600), 7200);
        assert_eq!(window.service_start(8000), 8000);
    }

    #[test]
    fn test_clamp_to_shift() {
        assert_eq!(
            TimeWindow::new(-600, 40_000).clamp_to_shift(36_000),
            TimeWindow::new(0, 36_000)
        );

        let outside = TimeWindow::new(40_000, 50_000).clamp_to_shift(36_000);
        assert!(outside.start() > outside.end());
    }
}
