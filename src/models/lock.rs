//! User-locked time slots.
//!
//! A lock forbids a (day, period) pair in every week. Locks gate future
//! searches and additions only; sections already placed in a schedule
//! are never removed when a slot is locked afterwards.

use serde::{Deserialize, Serialize};

use super::grid::{DAYS, PERIODS, WEEKS};
use super::TimeGrid;

/// Set of forbidden slots, stored as a full-cube grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockSet {
    grid: TimeGrid,
}

impl LockSet {
    /// Creates an empty lock set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks (day, period) across all weeks.
    pub fn lock(&mut self, day: usize, period: usize) {
        for week in 1..=WEEKS {
            self.grid.set(week, day, period);
        }
    }

    /// Unlocks (day, period) across all weeks.
    pub fn unlock(&mut self, day: usize, period: usize) {
        for week in 1..=WEEKS {
            self.grid.clear(week, day, period);
        }
    }

    /// Flips the lock state of (day, period). Returns the new state.
    pub fn toggle(&mut self, day: usize, period: usize) -> bool {
        if self.is_locked(day, period) {
            self.unlock(day, period);
            false
        } else {
            self.lock(day, period);
            self.is_locked(day, period)
        }
    }

    /// Whether (day, period) is locked.
    pub fn is_locked(&self, day: usize, period: usize) -> bool {
        self.grid.is_set(1, day, period)
    }

    /// Locked (day, period) pairs in day-major order.
    pub fn locked_slots(&self) -> Vec<(usize, usize)> {
        (1..=DAYS)
            .flat_map(|d| (1..=PERIODS).map(move |p| (d, p)))
            .filter(|&(d, p)| self.is_locked(d, p))
            .collect()
    }

    /// Removes every lock.
    pub fn clear(&mut self) {
        self.grid = TimeGrid::new();
    }

    /// Whether `occupancy` touches a locked slot.
    #[inline]
    pub fn blocks(&self, occupancy: &TimeGrid) -> bool {
        self.grid.overlaps(occupancy)
    }

    /// The underlying grid (snapshot for searches).
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Whether nothing is locked.
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_applies_to_all_weeks() {
        let mut locks = LockSet::new();
        locks.lock(1, 1);
        assert!(locks.is_locked(1, 1));
        assert_eq!(locks.grid().count(), WEEKS);
        assert!(locks.blocks(&TimeGrid::new().with(13, 1, 1)));
        assert!(!locks.blocks(&TimeGrid::new().with(13, 1, 2)));
    }

    #[test]
    fn test_toggle_roundtrip() {
        let mut locks = LockSet::new();
        assert!(locks.toggle(3, 5));
        assert_eq!(locks.locked_slots(), vec![(3, 5)]);
        assert!(!locks.toggle(3, 5));
        assert!(locks.is_empty());
    }

    #[test]
    fn test_invalid_lock_is_ignored() {
        let mut locks = LockSet::new();
        assert!(!locks.toggle(8, 1));
        locks.lock(1, 12);
        assert!(locks.is_empty());
    }
}
