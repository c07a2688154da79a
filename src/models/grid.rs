//! Week × day × period occupancy grid.
//!
//! A semester is modelled as a fixed cube of 16 teaching weeks, 7 days
//! and 11 daily periods. Each cell is a boolean "occupied" flag.
//!
//! # Indexing
//! All public coordinates are 1-based (`week` 1..=16, `day` 1..=7 with
//! Monday = 1, `period` 1..=11), matching how timetables are written.
//! Coordinates outside these ranges are ignored, never stored.
//!
//! # Representation
//! One `u128` per week; bit `(day - 1) * PERIODS + (period - 1)` marks a
//! cell. 77 bits are used per week, so union and overlap are 16 word ops.

use serde::{Deserialize, Serialize};

/// Number of teaching weeks in the cube.
pub const WEEKS: usize = 16;
/// Number of days per week.
pub const DAYS: usize = 7;
/// Number of periods per day.
pub const PERIODS: usize = 11;

/// A single occupied cell, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Week (1..=16).
    pub week: u8,
    /// Day (1..=7, Monday = 1).
    pub day: u8,
    /// Period (1..=11).
    pub period: u8,
}

impl Slot {
    /// Creates a slot without range checks.
    pub fn new(week: u8, day: u8, period: u8) -> Self {
        Self { week, day, period }
    }
}

/// Boolean occupancy cube over (week, day, period).
///
/// Values are small and `Copy`; combining operations return new grids
/// and never mutate their inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimeGrid {
    weeks: [u128; WEEKS],
}

#[inline]
fn bit(day: usize, period: usize) -> u128 {
    1u128 << ((day - 1) * PERIODS + (period - 1))
}

#[inline]
fn in_range(week: usize, day: usize, period: usize) -> bool {
    (1..=WEEKS).contains(&week) && (1..=DAYS).contains(&day) && (1..=PERIODS).contains(&period)
}

impl TimeGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grid with (day, period) occupied in every week.
    pub fn every_week(day: usize, period: usize) -> Self {
        let mut grid = Self::new();
        for week in 1..=WEEKS {
            grid.set(week, day, period);
        }
        grid
    }

    /// Marks a cell occupied. Out-of-range coordinates are a no-op.
    pub fn set(&mut self, week: usize, day: usize, period: usize) {
        if in_range(week, day, period) {
            self.weeks[week - 1] |= bit(day, period);
        }
    }

    /// Clears a cell. Out-of-range coordinates are a no-op.
    pub fn clear(&mut self, week: usize, day: usize, period: usize) {
        if in_range(week, day, period) {
            self.weeks[week - 1] &= !bit(day, period);
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, week: usize, day: usize, period: usize) -> Self {
        self.set(week, day, period);
        self
    }

    /// Whether a cell is occupied. Out-of-range coordinates read as free.
    pub fn is_set(&self, week: usize, day: usize, period: usize) -> bool {
        in_range(week, day, period) && self.weeks[week - 1] & bit(day, period) != 0
    }

    /// Whether (day, period) is occupied in any week.
    pub fn is_set_any_week(&self, day: usize, period: usize) -> bool {
        (1..=WEEKS).any(|week| self.is_set(week, day, period))
    }

    /// Cell-wise OR.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut weeks = self.weeks;
        for (w, o) in weeks.iter_mut().zip(other.weeks.iter()) {
            *w |= *o;
        }
        Self { weeks }
    }

    /// Cell-wise AND.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut weeks = self.weeks;
        for (w, o) in weeks.iter_mut().zip(other.weeks.iter()) {
            *w &= *o;
        }
        Self { weeks }
    }

    /// Whether any cell is occupied in both grids, across all weeks.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.weeks
            .iter()
            .zip(other.weeks.iter())
            .any(|(a, b)| a & b != 0)
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.weeks.iter().all(|w| *w == 0)
    }

    /// Number of occupied cells.
    pub fn count(&self) -> usize {
        self.weeks.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Occupied cells in (week, day, period) order.
    pub fn occupied_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.weeks.iter().enumerate().flat_map(|(w, mask)| {
            (0..DAYS * PERIODS)
                .filter(move |i| mask & (1u128 << i) != 0)
                .map(move |i| {
                    Slot::new(
                        (w + 1) as u8,
                        (i / PERIODS + 1) as u8,
                        (i % PERIODS + 1) as u8,
                    )
                })
        })
    }
}

impl FromIterator<Slot> for TimeGrid {
    fn from_iter<I: IntoIterator<Item = Slot>>(iter: I) -> Self {
        let mut grid = Self::new();
        for slot in iter {
            grid.set(slot.week as usize, slot.day as usize, slot.period as usize);
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read() {
        let mut g = TimeGrid::new();
        assert!(g.is_empty());
        g.set(1, 1, 1);
        g.set(16, 7, 11);
        assert!(g.is_set(1, 1, 1));
        assert!(g.is_set(16, 7, 11));
        assert!(!g.is_set(1, 1, 2));
        assert_eq!(g.count(), 2);
    }

    #[test]
    fn test_out_of_range_is_dropped() {
        let mut g = TimeGrid::new();
        g.set(0, 1, 1);
        g.set(17, 1, 1);
        g.set(1, 8, 1);
        g.set(1, 1, 12);
        g.set(1, 0, 1);
        assert!(g.is_empty());
        assert!(!g.is_set(0, 1, 1));
    }

    #[test]
    fn test_union_does_not_mutate_inputs() {
        let a = TimeGrid::new().with(1, 1, 1);
        let b = TimeGrid::new().with(2, 3, 4);
        let u = a.union(&b);
        assert_eq!(u.count(), 2);
        assert_eq!(a.count(), 1);
        assert_eq!(b.count(), 1);
    }

    #[test]
    fn test_overlap_is_week_sensitive() {
        let a = TimeGrid::new().with(1, 1, 1);
        let b = TimeGrid::new().with(2, 1, 1);
        assert!(!a.overlaps(&b));

        // Conflict only in week 9 is still a conflict.
        let c = TimeGrid::new().with(1, 2, 2).with(9, 5, 5);
        let d = TimeGrid::new().with(9, 5, 5);
        assert!(c.overlaps(&d));
        assert_eq!(c.intersection(&d).count(), 1);
    }

    #[test]
    fn test_every_week_and_clear() {
        let mut g = TimeGrid::every_week(3, 4);
        assert_eq!(g.count(), WEEKS);
        assert!(g.is_set_any_week(3, 4));
        for week in 1..=WEEKS {
            g.clear(week, 3, 4);
        }
        assert!(g.is_empty());
    }

    #[test]
    fn test_occupied_slots_order_and_roundtrip() {
        let g = TimeGrid::new().with(2, 1, 1).with(1, 7, 11).with(1, 1, 3);
        let slots: Vec<Slot> = g.occupied_slots().collect();
        assert_eq!(
            slots,
            vec![Slot::new(1, 1, 3), Slot::new(1, 7, 11), Slot::new(2, 1, 1)]
        );
        let rebuilt: TimeGrid = slots.into_iter().collect();
        assert_eq!(rebuilt, g);
    }

    #[test]
    fn test_serde_roundtrip() {
        let g = TimeGrid::new().with(4, 2, 6);
        let json = serde_json::to_string(&g).unwrap();
        let back: TimeGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
