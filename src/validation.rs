//! Input validation for candidate sections.
//!
//! Checks a candidate set before searching. Detects:
//! - Sections without a course name
//! - Sections that never meet (empty occupancy, usually unparsable times)
//! - Identical offerings listed twice
//! - Courses whose every section touches a locked slot
//!
//! None of these stop a search; they explain surprising results.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::{LockSet, Section};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A section has a blank course name.
    EmptyCourseName,
    /// A section occupies no slot.
    EmptyOccupancy,
    /// The same offering appears more than once.
    DuplicateSection,
    /// Every section of a course is blocked by locks.
    CourseFullyLocked,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a candidate set against the current locks.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_candidates(sections: &[Arc<Section>], locks: &LockSet) -> ValidationResult {
    let mut errors = Vec::new();

    let mut seen: HashSet<(&str, &str, _)> = HashSet::new();
    for s in sections {
        if s.course_name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCourseName,
                format!("Section '{}' has no course name", s.section_label),
            ));
        }

        if s.occupancy.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyOccupancy,
                format!("Section {s} never meets (time: '{}')", s.time_description),
            ));
        }

        if !seen.insert((s.course_name.as_str(), s.section_label.as_str(), s.occupancy)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateSection,
                format!("Duplicate section: {s}"),
            ));
        }
    }

    // Course → any section left usable under the locks
    let mut usable: HashMap<&str, bool> = HashMap::new();
    for s in sections {
        let free = !locks.blocks(&s.occupancy);
        *usable.entry(s.course_name.as_str()).or_insert(false) |= free;
    }
    let mut blocked: Vec<&str> = usable
        .into_iter()
        .filter(|(_, free)| !free)
        .map(|(name, _)| name)
        .collect();
    blocked.sort_unstable();
    for name in blocked {
        errors.push(ValidationError::new(
            ValidationErrorKind::CourseFullyLocked,
            format!("Every section of '{name}' meets in a locked slot"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeGrid;

    fn sec(course: &str, label: &str, day: usize, period: usize) -> Arc<Section> {
        Arc::new(Section::new(course, label, TimeGrid::every_week(day, period)))
    }

    #[test]
    fn test_valid_input() {
        let sections = vec![sec("Math", "1", 1, 1), sec("Math", "2", 1, 2), sec("Art", "1", 2, 1)];
        assert!(validate_candidates(&sections, &LockSet::new()).is_ok());
    }

    #[test]
    fn test_empty_course_name() {
        let sections = vec![sec(" ", "1", 1, 1)];
        let errors = validate_candidates(&sections, &LockSet::new()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptyCourseName));
    }

    #[test]
    fn test_empty_occupancy() {
        let sections = vec![Arc::new(
            Section::new("Math", "TBA", TimeGrid::new()).with_description("待定"),
        )];
        let errors = validate_candidates(&sections, &LockSet::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyOccupancy);
        assert!(errors[0].message.contains("待定"));
    }

    #[test]
    fn test_duplicate_section() {
        let sections = vec![sec("Math", "1", 1, 1), sec("Math", "1", 1, 1)];
        let errors = validate_candidates(&sections, &LockSet::new()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateSection));
    }

    #[test]
    fn test_course_fully_locked() {
        let sections = vec![sec("Math", "1", 1, 1), sec("Math", "2", 1, 2), sec("Art", "1", 1, 1)];
        let mut locks = LockSet::new();
        locks.lock(1, 1);

        // Math still has section 2; Art has nothing left.
        let errors = validate_candidates(&sections, &locks).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::CourseFullyLocked);
        assert!(errors[0].message.contains("Art"));
    }

    #[test]
    fn test_multiple_errors() {
        let sections = vec![
            Arc::new(Section::new("", "x", TimeGrid::new())),
            sec("Art", "1", 2, 2),
            sec("Art", "1", 2, 2),
        ];
        let errors = validate_candidates(&sections, &LockSet::new()).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
