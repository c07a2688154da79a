//! Browsable list of generated schedules.
//!
//! Holds the schedules of the latest search plus a cursor to the one
//! currently shown. The current schedule can be extended by hand with
//! sections that still fit.

use std::sync::Arc;

use crate::error::SessionError;
use crate::models::{LockSet, Schedule, Section, TimeGrid};

/// Ordered schedules with a cursor.
///
/// The cursor is `None` exactly when the collection is empty.
#[derive(Debug, Clone, Default)]
pub struct ScheduleCollection {
    schedules: Vec<Schedule>,
    cursor: Option<usize>,
}

impl ScheduleCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection positioned on the first schedule.
    pub fn from_schedules(schedules: Vec<Schedule>) -> Self {
        let mut collection = Self::new();
        collection.replace(schedules);
        collection
    }

    /// Replaces all schedules and resets the cursor to the first one.
    pub fn replace(&mut self, schedules: Vec<Schedule>) {
        self.cursor = if schedules.is_empty() { None } else { Some(0) };
        self.schedules = schedules;
    }

    /// Removes every schedule.
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Number of schedules.
    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    /// Whether there are no schedules.
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Cursor position.
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    /// Schedule at `index`.
    pub fn get(&self, index: usize) -> Option<&Schedule> {
        self.schedules.get(index)
    }

    /// All schedules in order.
    pub fn iter(&self) -> impl Iterator<Item = &Schedule> {
        self.schedules.iter()
    }

    /// The schedule under the cursor.
    pub fn current(&self) -> Option<&Schedule> {
        self.cursor.and_then(|i| self.schedules.get(i))
    }

    /// Moves the cursor by `step`. Out-of-range targets leave it in
    /// place. Returns whether the cursor moved.
    pub fn advance(&mut self, step: isize) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        match cursor.checked_add_signed(step) {
            Some(target) if target < self.schedules.len() && target != cursor => {
                self.cursor = Some(target);
                true
            }
            _ => false,
        }
    }

    /// Whether a previous schedule exists.
    pub fn has_prev(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether a next schedule exists.
    pub fn has_next(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.schedules.len())
    }

    /// Occupancy of the current schedule (empty if none).
    pub fn current_occupancy(&self) -> TimeGrid {
        self.current().map(Schedule::occupancy).unwrap_or_default()
    }

    /// Catalog sections that could still join the current schedule.
    ///
    /// A section qualifies when its name, label or time description
    /// contains `query` (case-insensitive, surrounding whitespace
    /// ignored), its course is not yet scheduled, and it overlaps
    /// neither the schedule nor `locks`. Empty without a current
    /// schedule.
    pub fn find_compatible(
        &self,
        catalog: &[Arc<Section>],
        query: &str,
        locks: &LockSet,
    ) -> Vec<Arc<Section>> {
        let Some(current) = self.current() else {
            return Vec::new();
        };
        let query = query.trim();
        let booked = current.occupancy();

        catalog
            .iter()
            .filter(|s| !current.contains_course(&s.course_name))
            .filter(|s| s.matches_query(query))
            .filter(|s| !s.occupancy.overlaps(&booked) && !locks.blocks(&s.occupancy))
            .cloned()
            .collect()
    }

    /// Appends `section` to the current schedule after re-checking
    /// course uniqueness, overlap and locks.
    pub fn append_to_current(
        &mut self,
        section: Arc<Section>,
        locks: &LockSet,
    ) -> Result<(), SessionError> {
        let index = self.cursor.ok_or(SessionError::NoCurrentSchedule)?;
        self.schedules[index].try_add(section, locks)?;
        Ok(())
    }
}
