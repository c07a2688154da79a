//! Course section model.
//!
//! A section is one concrete offering of a course (a teacher/class
//! label) pinned to specific weeks, days and periods. Sections are
//! built once from the catalog and shared by reference afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimeGrid;

/// Enrollment category a section was listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// General required courses (`bxxk`).
    #[default]
    CoreRequired,
    /// General electives (`xxxk`).
    GeneralElective,
    /// Electives inside the study plan (`kzyxk`).
    PlanElective,
    /// Electives outside the study plan (`zynknjxk`).
    NonPlanElective,
    /// Retaken courses (`jhnxk`).
    Retake,
}

impl Category {
    /// All categories in catalog fetch order.
    pub const ALL: [Category; 5] = [
        Category::CoreRequired,
        Category::GeneralElective,
        Category::PlanElective,
        Category::NonPlanElective,
        Category::Retake,
    ];

    /// Short catalog code.
    pub fn code(&self) -> &'static str {
        match self {
            Category::CoreRequired => "bxxk",
            Category::GeneralElective => "xxxk",
            Category::PlanElective => "kzyxk",
            Category::NonPlanElective => "zynknjxk",
            Category::Retake => "jhnxk",
        }
    }

    /// Parses a catalog code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Display label as used by the enrollment system.
    pub fn label(&self) -> &'static str {
        match self {
            Category::CoreRequired => "通识必修选课",
            Category::GeneralElective => "通识选修选课",
            Category::PlanElective => "培养方案内选课",
            Category::NonPlanElective => "非培养方案内选课",
            Category::Retake => "重修选课",
        }
    }
}

/// One section of a course.
///
/// Two sections are considered the same offering when course name,
/// section label and occupancy all match (see [`Section::same_offering`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Section {
    /// Course name; sections sharing it form one course-group.
    pub course_name: String,
    /// Section label (teacher / class identifier).
    pub section_label: String,
    /// When the section meets.
    pub occupancy: TimeGrid,
    /// Human-readable meeting times.
    pub time_description: String,
    /// Enrollment category.
    pub category: Category,
}

impl Section {
    /// Creates a section with an empty description and default category.
    pub fn new(
        course_name: impl Into<String>,
        section_label: impl Into<String>,
        occupancy: TimeGrid,
    ) -> Self {
        Self {
            course_name: course_name.into(),
            section_label: section_label.into(),
            occupancy,
            time_description: String::new(),
            category: Category::default(),
        }
    }

    /// Sets the time description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.time_description = description.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Same course, label and occupancy. The description is not compared.
    pub fn same_offering(&self, other: &Self) -> bool {
        self.course_name == other.course_name
            && self.section_label == other.section_label
            && self.occupancy == other.occupancy
    }

    /// Whether the two sections meet at the same time in any week.
    #[inline]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.occupancy.overlaps(&other.occupancy)
    }

    /// Case-insensitive substring match on name, label or description.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.course_name.to_lowercase().contains(&query)
            || self.section_label.to_lowercase().contains(&query)
            || self.time_description.to_lowercase().contains(&query)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.course_name, self.section_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_builder() {
        let s = Section::new("Linear Algebra", "Zhang-01", TimeGrid::every_week(1, 1))
            .with_description("1-16周,星期一第1节")
            .with_category(Category::PlanElective);

        assert_eq!(s.course_name, "Linear Algebra");
        assert_eq!(s.section_label, "Zhang-01");
        assert_eq!(s.category, Category::PlanElective);
        assert_eq!(s.to_string(), "Linear Algebra(Zhang-01)");
    }

    #[test]
    fn test_same_offering_ignores_description() {
        let a = Section::new("Art", "A", TimeGrid::every_week(2, 1)).with_description("x");
        let b = Section::new("Art", "A", TimeGrid::every_week(2, 1)).with_description("y");
        let c = Section::new("Art", "A", TimeGrid::every_week(2, 2));
        assert!(a.same_offering(&b));
        assert!(!a.same_offering(&c));
    }

    #[test]
    fn test_matches_query_case_insensitive() {
        let s = Section::new("Data Structures", "Li", TimeGrid::new()).with_description("星期三");
        assert!(s.matches_query("data"));
        assert!(s.matches_query("LI"));
        assert!(s.matches_query("星期三"));
        assert!(!s.matches_query("physics"));
    }

    #[test]
    fn test_category_codes() {
        for c in Category::ALL {
            assert_eq!(Category::from_code(c.code()), Some(c));
        }
        assert_eq!(Category::from_code("nope"), None);
        assert_eq!(Category::Retake.label(), "重修选课");
    }
}
