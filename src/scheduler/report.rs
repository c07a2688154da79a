//! Search run summary.
//!
//! # Fields
//!
//! | Field | Meaning |
//! |-------|---------|
//! | schedules | Accepted combinations, largest first |
//! | best_size | Largest schedule size found (the exact maximum in max-size mode) |
//! | nodes_visited | Recursion steps taken, over all passes |
//! | truncated | The result cap stopped the search early |
//! | cancelled | A [`CancelFlag`](super::CancelFlag) stopped the search early |

use crate::models::Schedule;

/// Result of one [`ScheduleSearch`](super::ScheduleSearch) run.
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    /// Accepted schedules.
    pub schedules: Vec<Schedule>,
    /// Size of the largest schedule.
    pub best_size: usize,
    /// Recursion steps taken.
    pub nodes_visited: u64,
    /// Whether the result cap was reached.
    pub truncated: bool,
    /// Whether the search was cancelled.
    pub cancelled: bool,
}

impl SearchReport {
    /// Number of schedules.
    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    /// Whether nothing qualified.
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Whether every branch was explored.
    pub fn is_exhaustive(&self) -> bool {
        !self.truncated && !self.cancelled
    }
}
