//! Schedule (search result) model.
//!
//! A schedule is a conflict-free combination of sections with at most
//! one section per course. Sections are shared with the catalog, not
//! copied.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{LockSet, Section, Slot, TimeGrid};
use crate::error::ConflictError;

/// Deduplication fingerprint of a schedule.
///
/// Sorted `(course, label, occupied slots)` tuples, so two schedules
/// reached through different search paths compare equal when they hold
/// the same sections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuralKey(Vec<(String, String, Vec<Slot>)>);

/// An ordered combination of sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    sections: Vec<Arc<Section>>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule from sections without validating them.
    pub(crate) fn from_sections(sections: Vec<Arc<Section>>) -> Self {
        Self { sections }
    }

    /// Sections in insertion order.
    pub fn sections(&self) -> &[Arc<Section>] {
        &self.sections
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the schedule holds no section.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Union of all section occupancies.
    pub fn occupancy(&self) -> TimeGrid {
        self.sections
            .iter()
            .fold(TimeGrid::new(), |acc, s| acc.union(&s.occupancy))
    }

    /// Whether a section of `course_name` is present.
    pub fn contains_course(&self, course_name: &str) -> bool {
        self.sections.iter().any(|s| s.course_name == course_name)
    }

    /// Sections meeting at (week, day, period).
    pub fn sections_at(&self, week: usize, day: usize, period: usize) -> Vec<&Section> {
        self.sections
            .iter()
            .filter(|s| s.occupancy.is_set(week, day, period))
            .map(|s| s.as_ref())
            .collect()
    }

    /// Computes the deduplication key.
    pub fn structural_key(&self) -> StructuralKey {
        let mut entries: Vec<_> = self
            .sections
            .iter()
            .map(|s| {
                (
                    s.course_name.clone(),
                    s.section_label.clone(),
                    s.occupancy.occupied_slots().collect::<Vec<_>>(),
                )
            })
            .collect();
        entries.sort();
        StructuralKey(entries)
    }

    /// Checks that `section` could join this schedule.
    ///
    /// Fails on a duplicate course, an occupancy overlap with any member,
    /// or a locked slot, in that order.
    pub fn check_addition(&self, section: &Section, locks: &LockSet) -> Result<(), ConflictError> {
        if self.contains_course(&section.course_name) {
            return Err(ConflictError::DuplicateCourse(section.course_name.clone()));
        }
        if let Some(other) = self.sections.iter().find(|s| s.conflicts_with(section)) {
            return Err(ConflictError::Overlap {
                with: other.to_string(),
            });
        }
        if locks.blocks(&section.occupancy) {
            return Err(ConflictError::Locked);
        }
        Ok(())
    }

    /// Appends `section` after [`check_addition`](Self::check_addition).
    /// The schedule is untouched on error.
    pub fn try_add(&mut self, section: Arc<Section>, locks: &LockSet) -> Result<(), ConflictError> {
        self.check_addition(&section, locks)?;
        self.sections.push(section);
        Ok(())
    }

    /// Whether the schedule satisfies all invariants against `locks`.
    pub fn is_consistent(&self, locks: &TimeGrid) -> bool {
        for (i, a) in self.sections.iter().enumerate() {
            if a.occupancy.overlaps(locks) {
                return false;
            }
            for b in &self.sections[i + 1..] {
                if a.course_name == b.course_name || a.conflicts_with(b) {
                    return false;
                }
            }
        }
        true
    }
}
