//! Course-groups: alternative sections of one course.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Section, TimeGrid};

/// All candidate sections sharing one course name.
///
/// At most one member of a group may appear in a schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseGroup {
    /// Shared course name.
    pub course_name: String,
    /// Alternatives, in catalog order.
    pub sections: Vec<Arc<Section>>,
}

impl CourseGroup {
    /// Creates an empty group.
    pub fn new(course_name: impl Into<String>) -> Self {
        Self {
            course_name: course_name.into(),
            sections: Vec::new(),
        }
    }

    /// Adds an alternative section.
    pub fn with_section(mut self, section: Arc<Section>) -> Self {
        self.sections.push(section);
        self
    }

    /// Partitions sections by course name.
    ///
    /// Groups appear in order of each course's first section; members
    /// keep their relative order.
    pub fn group(sections: &[Arc<Section>]) -> Vec<CourseGroup> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<CourseGroup> = Vec::new();

        for section in sections {
            let slot = *index
                .entry(section.course_name.as_str())
                .or_insert_with(|| {
                    groups.push(CourseGroup::new(section.course_name.clone()));
                    groups.len() - 1
                });
            groups[slot].sections.push(Arc::clone(section));
        }

        groups
    }

    /// Number of alternatives.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the group has no alternatives.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether some alternative avoids both `occupied` and `locks`.
    pub fn has_compatible(&self, occupied: &TimeGrid, locks: &TimeGrid) -> bool {
        self.sections
            .iter()
            .any(|s| !s.occupancy.overlaps(occupied) && !s.occupancy.overlaps(locks))
    }
}
