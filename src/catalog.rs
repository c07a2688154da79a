//! Course catalog and the candidate pool.
//!
//! The catalog holds every section offered this semester, parsed from a
//! [`CatalogSource`]. The candidate pool is the student's working set:
//! the sections they want the search to consider.
//!
//! # Flow
//! `CatalogSource::fetch` → [`parse_schedule`] per entry → `Catalog`
//! → user picks → `CandidatePool` → `CourseGroup`s → search.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{CatalogError, SessionError};
use crate::models::{Category, Section};
use crate::parser::parse_schedule;
use crate::scheduler::CourseGroup;

/// Soft limit on distinct courses in the candidate pool.
pub const DEFAULT_COURSE_SOFT_LIMIT: usize = 12;

/// One catalog entry before time parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSection {
    /// Course name.
    pub course_name: String,
    /// Section label.
    pub section_label: String,
    /// Meeting-time markup (`<p>1-16周,星期一第1-2节</p>…`).
    pub raw_time: String,
    /// Category the entry was listed under.
    pub category: Category,
}

impl RawSection {
    /// Creates a raw entry.
    pub fn new(
        course_name: impl Into<String>,
        section_label: impl Into<String>,
        raw_time: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            course_name: course_name.into(),
            section_label: section_label.into(),
            raw_time: raw_time.into(),
            category,
        }
    }

    /// Parses the time markup into a section.
    pub fn parse(&self) -> Section {
        let parsed = parse_schedule(&self.raw_time);
        Section::new(&self.course_name, &self.section_label, parsed.grid)
            .with_description(parsed.description)
            .with_category(self.category)
    }
}

/// Supplier of raw catalog entries (scraper, file, fixture).
pub trait CatalogSource {
    /// Fetches all entries.
    fn fetch(&self) -> Result<Vec<RawSection>, CatalogError>;
}

/// In-memory source.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: Vec<RawSection>,
}

impl StaticSource {
    /// Creates a source serving `entries`.
    pub fn new(entries: Vec<RawSection>) -> Self {
        Self { entries }
    }
}

impl CatalogSource for StaticSource {
    fn fetch(&self) -> Result<Vec<RawSection>, CatalogError> {
        Ok(self.entries.clone())
    }
}

/// All sections on offer.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sections: Vec<Arc<Section>>,
}

impl Catalog {
    /// Creates a catalog from parsed sections.
    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        Self {
            sections: sections.into_iter().map(Arc::new).collect(),
        }
    }

    /// Fetches and parses every entry of `source`.
    pub fn load<S: CatalogSource + ?Sized>(source: &S) -> Result<Self, CatalogError> {
        let entries = source.fetch()?;
        let catalog = Self::from_sections(entries.iter().map(RawSection::parse));
        tracing::info!(sections = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// All sections in source order.
    pub fn sections(&self) -> &[Arc<Section>] {
        &self.sections
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Distinct course names containing `keyword` (case-insensitive), sorted.
    /// A blank keyword matches nothing.
    pub fn matching_course_names(&self, keyword: &str) -> Vec<String> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Vec::new();
        }
        self.sections
            .iter()
            .filter(|s| s.course_name.to_lowercase().contains(&keyword))
            .map(|s| s.course_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every section of `course_name`, in source order.
    pub fn sections_of(&self, course_name: &str) -> Vec<Arc<Section>> {
        self.sections
            .iter()
            .filter(|s| s.course_name == course_name)
            .cloned()
            .collect()
    }
}

/// The sections a student wants the search to consider.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    sections: Vec<Arc<Section>>,
    soft_limit: usize,
}

impl Default for CandidatePool {
    fn default() -> Self {
        Self::new(DEFAULT_COURSE_SOFT_LIMIT)
    }
}

impl CandidatePool {
    /// Creates an empty pool that warns at `soft_limit` distinct courses.
    pub fn new(soft_limit: usize) -> Self {
        Self {
            sections: Vec::new(),
            soft_limit,
        }
    }

    /// Adds a section. An identical offering is rejected.
    pub fn add(&mut self, section: Arc<Section>) -> Result<(), SessionError> {
        if self.sections.iter().any(|s| s.same_offering(&section)) {
            return Err(SessionError::DuplicateSection(section.to_string()));
        }
        self.sections.push(section);

        if self.at_course_limit() {
            tracing::warn!(
                courses = self.distinct_courses(),
                limit = self.soft_limit,
                "candidate pool reached the course limit; search may be slow"
            );
        }
        Ok(())
    }

    /// Removes the first identical offering.
    pub fn remove(&mut self, section: &Section) -> Result<Arc<Section>, SessionError> {
        let index = self
            .sections
            .iter()
            .position(|s| s.same_offering(section))
            .ok_or_else(|| SessionError::UnknownSection(section.to_string()))?;
        Ok(self.sections.remove(index))
    }

    /// Empties the pool.
    pub fn clear(&mut self) {
        self.sections.clear();
    }

    /// Candidate sections in insertion order.
    pub fn sections(&self) -> &[Arc<Section>] {
        &self.sections
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of distinct course names.
    pub fn distinct_courses(&self) -> usize {
        self.sections
            .iter()
            .map(|s| s.course_name.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Whether the distinct course count reached the soft limit.
    pub fn at_course_limit(&self) -> bool {
        self.distinct_courses() >= self.soft_limit
    }

    /// Candidates grouped by course, in first-appearance order.
    pub fn groups(&self) -> Vec<CourseGroup> {
        CourseGroup::group(&self.sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeGrid;

    struct FailingSource;

    impl CatalogSource for FailingSource {
        fn fetch(&self) -> Result<Vec<RawSection>, CatalogError> {
            Err(CatalogError::Unavailable("login failed".into()))
        }
    }

    fn source() -> StaticSource {
        StaticSource::new(vec![
            RawSection::new("高等数学", "张三", "<p>1-16周,星期一第1-2节</p>", Category::CoreRequired),
            RawSection::new("高等数学", "李四", "<p>1-16周,星期二第1-2节</p>", Category::CoreRequired),
            RawSection::new("Data Science", "Wang", "<p>1-8周,星期三第5节</p>", Category::PlanElective),
        ])
    }

    #[test]
    fn test_load_parses_entries() {
        let catalog = Catalog::load(&source()).unwrap();
        assert_eq!(catalog.len(), 3);
        let first = &catalog.sections()[0];
        assert_eq!(first.occupancy.count(), 32);
        assert_eq!(first.time_description, "1-16周,星期一第1-2节");
        assert_eq!(catalog.sections()[2].category, Category::PlanElective);
    }

    #[test]
    fn test_load_failure() {
        let err = Catalog::load(&FailingSource).unwrap_err();
        assert_eq!(err, CatalogError::Unavailable("login failed".into()));
    }

    #[test]
    fn test_matching_course_names() {
        let catalog = Catalog::load(&source()).unwrap();
        assert_eq!(catalog.matching_course_names("数学"), vec!["高等数学"]);
        assert_eq!(catalog.matching_course_names("data"), vec!["Data Science"]);
        assert!(catalog.matching_course_names("  ").is_empty());
        assert_eq!(catalog.sections_of("高等数学").len(), 2);
    }

    #[test]
    fn test_pool_rejects_duplicates() {
        let mut pool = CandidatePool::default();
        let s = Arc::new(Section::new("Math", "A", TimeGrid::every_week(1, 1)));
        pool.add(Arc::clone(&s)).unwrap();
        let err = pool.add(Arc::new(Section::new("Math", "A", TimeGrid::every_week(1, 1))));
        assert_eq!(err, Err(SessionError::DuplicateSection("Math(A)".into())));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_pool_remove() {
        let mut pool = CandidatePool::default();
        let s = Section::new("Math", "A", TimeGrid::every_week(1, 1));
        pool.add(Arc::new(s.clone())).unwrap();
        assert!(pool.remove(&s).is_ok());
        assert!(pool.is_empty());
        assert_eq!(
            pool.remove(&s).unwrap_err(),
            SessionError::UnknownSection("Math(A)".into())
        );
    }

    #[test]
    fn test_pool_course_limit_and_groups() {
        let mut pool = CandidatePool::new(2);
        pool.add(Arc::new(Section::new("A", "1", TimeGrid::every_week(1, 1)))).unwrap();
        pool.add(Arc::new(Section::new("A", "2", TimeGrid::every_week(1, 2)))).unwrap();
        assert!(!pool.at_course_limit());
        pool.add(Arc::new(Section::new("B", "1", TimeGrid::every_week(2, 1)))).unwrap();
        assert!(pool.at_course_limit());
        assert_eq!(pool.distinct_courses(), 2);

        let groups = pool.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        pool.clear();
        assert!(pool.groups().is_empty());
    }
}
