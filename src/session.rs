//! Interactive session state.
//!
//! A [`Session`] is what a front end drives: it owns the catalog, the
//! candidate pool, the user's locks and the generated schedules, and
//! exposes the commands a user can issue. All operations are
//! synchronous and in-memory.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{CandidatePool, Catalog, CatalogSource, DEFAULT_COURSE_SOFT_LIMIT};
use crate::collection::ScheduleCollection;
use crate::error::SessionError;
use crate::models::{LockSet, Schedule, Section};
use crate::scheduler::{CancelFlag, ScheduleSearch, SearchConfig, SearchReport};
use crate::timetable::{Timetable, WeekView};
use crate::validation::validate_candidates;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Search policy.
    pub search: SearchConfig,
    /// Distinct-course count at which the pool warns.
    pub course_soft_limit: usize,
    /// Weeks shown by [`Session::timetable`].
    pub view: WeekView,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            course_soft_limit: DEFAULT_COURSE_SOFT_LIMIT,
            view: WeekView::AllWeeks,
        }
    }
}

impl SessionConfig {
    /// Sets the search policy.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Sets the course soft limit.
    pub fn with_course_soft_limit(mut self, limit: usize) -> Self {
        self.course_soft_limit = limit;
        self
    }

    /// Sets the timetable view.
    pub fn with_view(mut self, view: WeekView) -> Self {
        self.view = view;
        self
    }
}

/// One user's scheduling session.
///
/// # Example
///
/// ```
/// use u_timetable::catalog::{Catalog, RawSection, StaticSource};
/// use u_timetable::models::Category;
/// use u_timetable::session::{Session, SessionConfig};
///
/// let source = StaticSource::new(vec![
///     RawSection::new("Math", "A", "<p>1-16周,星期一第1-2节</p>", Category::CoreRequired),
///     RawSection::new("Art", "B", "<p>1-16周,星期二第1节</p>", Category::GeneralElective),
/// ]);
/// let mut session = Session::load(&source, SessionConfig::default()).unwrap();
/// session.add_course("Math").unwrap();
/// session.add_course("Art").unwrap();
///
/// let report = session.generate().unwrap();
/// assert_eq!(report.len(), 1);
/// assert_eq!(session.current().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    catalog: Catalog,
    pool: CandidatePool,
    locks: LockSet,
    schedules: ScheduleCollection,
    cancel: CancelFlag,
}

impl Session {
    /// Creates a session over an already loaded catalog.
    pub fn new(catalog: Catalog, config: SessionConfig) -> Self {
        Self {
            pool: CandidatePool::new(config.course_soft_limit),
            config,
            catalog,
            locks: LockSet::new(),
            schedules: ScheduleCollection::new(),
            cancel: CancelFlag::new(),
        }
    }

    /// Loads the catalog from `source` and creates a session.
    pub fn load<S: CatalogSource + ?Sized>(
        source: &S,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        Ok(Self::new(Catalog::load(source)?, config))
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The candidate pool.
    pub fn candidates(&self) -> &CandidatePool {
        &self.pool
    }

    /// Current locks.
    pub fn locks(&self) -> &LockSet {
        &self.locks
    }

    /// Generated schedules.
    pub fn schedules(&self) -> &ScheduleCollection {
        &self.schedules
    }

    /// A handle that cancels the running [`generate`](Self::generate).
    pub fn cancel_handle(&self) -> CancelFlag {
        self.cancel.clone()
    }

    // ---- candidate pool ----

    /// Adds one section to the candidate pool.
    pub fn add_candidate(&mut self, section: Arc<Section>) -> Result<(), SessionError> {
        self.pool.add(section)
    }

    /// Adds every catalog section of `course_name` not already in the
    /// pool. Returns how many were added.
    pub fn add_course(&mut self, course_name: &str) -> Result<usize, SessionError> {
        let sections = self.catalog.sections_of(course_name);
        if sections.is_empty() {
            return Err(SessionError::UnknownCourse(course_name.to_string()));
        }
        let mut added = 0;
        for section in sections {
            match self.pool.add(section) {
                Ok(()) => added += 1,
                Err(SessionError::DuplicateSection(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(added)
    }

    /// Removes a section from the candidate pool.
    pub fn remove_candidate(&mut self, section: &Section) -> Result<(), SessionError> {
        self.pool.remove(section).map(|_| ())
    }

    /// Empties the candidate pool.
    pub fn clear_candidates(&mut self) {
        self.pool.clear();
    }

    // ---- search ----

    /// Runs the configured search over the candidate pool and replaces
    /// the schedule list with the result.
    ///
    /// Locks are snapshotted when the search starts.
    pub fn generate(&mut self) -> Result<SearchReport, SessionError> {
        if self.pool.is_empty() {
            return Err(SessionError::NoCandidates);
        }

        if let Err(issues) = validate_candidates(self.pool.sections(), &self.locks) {
            for issue in &issues {
                tracing::warn!(kind = ?issue.kind, "{}", issue.message);
            }
        }

        self.cancel.reset();
        let locks = *self.locks.grid();
        let report = ScheduleSearch::from_config(&self.config.search)
            .with_cancel_flag(self.cancel.clone())
            .run(&self.pool.groups(), &locks);

        self.schedules.replace(report.schedules.clone());
        tracing::info!(
            schedules = report.len(),
            best_size = report.best_size,
            "schedules generated"
        );
        Ok(report)
    }

    // ---- browsing ----

    /// The schedule under the cursor.
    pub fn current(&self) -> Option<&Schedule> {
        self.schedules.current()
    }

    /// Moves to the next (`+1`) or previous (`-1`) schedule.
    pub fn advance(&mut self, step: isize) -> bool {
        self.schedules.advance(step)
    }

    /// Timetable of the current schedule under the configured view.
    pub fn timetable(&self) -> Option<Timetable> {
        self.current()
            .map(|s| Timetable::from_schedule(s, self.config.view))
    }

    // ---- manual edits ----

    /// Catalog sections matching `query` that still fit the current schedule.
    pub fn find_compatible(&self, query: &str) -> Result<Vec<Arc<Section>>, SessionError> {
        if self.schedules.current().is_none() {
            return Err(SessionError::NoCurrentSchedule);
        }
        Ok(self
            .schedules
            .find_compatible(self.catalog.sections(), query, &self.locks))
    }

    /// Appends a section to the current schedule.
    pub fn append(&mut self, section: Arc<Section>) -> Result<(), SessionError> {
        let label = section.to_string();
        self.schedules.append_to_current(section, &self.locks)?;
        tracing::info!(section = %label, "section appended to current schedule");
        Ok(())
    }

    // ---- locks ----

    /// Flips the lock on (day, period). Returns the new state.
    pub fn toggle_lock(&mut self, day: usize, period: usize) -> bool {
        let locked = self.locks.toggle(day, period);
        tracing::info!(day, period, locked, "lock toggled");
        locked
    }

    /// Locks (day, period).
    pub fn lock(&mut self, day: usize, period: usize) {
        self.locks.lock(day, period);
        tracing::info!(day, period, locked = true, "lock set");
    }

    /// Unlocks (day, period).
    pub fn unlock(&mut self, day: usize, period: usize) {
        self.locks.unlock(day, period);
        tracing::info!(day, period, locked = false, "lock cleared");
    }

    /// Whether (day, period) is locked.
    pub fn is_locked(&self, day: usize, period: usize) -> bool {
        self.locks.is_locked(day, period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RawSection, StaticSource};
    use crate::error::ConflictError;
    use crate::models::Category;
    use crate::scheduler::SearchMode;

    fn raw(course: &str, label: &str, time: &str) -> RawSection {
        RawSection::new(course, label, time, Category::CoreRequired)
    }

    fn session(config: SessionConfig) -> Session {
        let source = StaticSource::new(vec![
            raw("Math", "p1", "<p>1-16周,星期一第1节</p>"),
            raw("Math", "p2", "<p>1-16周,星期一第2节</p>"),
            raw("Art", "mon", "<p>1-16周,星期一第1节</p>"),
            raw("Art", "tue", "<p>1-16周,星期二第1节</p>"),
            raw("PE", "fri", "<p>1-16周,星期五第3节</p>"),
            raw("Music", "mon", "<p>1-16周,星期一第2节</p>"),
        ]);
        Session::load(&source, config).unwrap()
    }

    #[test]
    fn test_generate_requires_candidates() {
        let mut s = session(SessionConfig::default());
        assert_eq!(s.generate().unwrap_err(), SessionError::NoCandidates);
    }

    #[test]
    fn test_add_course_and_generate() {
        let mut s = session(SessionConfig::default());
        assert_eq!(s.add_course("Math").unwrap(), 2);
        assert_eq!(s.add_course("Math").unwrap(), 0);
        assert_eq!(s.add_course("Art").unwrap(), 2);
        assert_eq!(
            s.add_course("Chemistry").unwrap_err(),
            SessionError::UnknownCourse("Chemistry".into())
        );

        let report = s.generate().unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(s.schedules().position(), Some(0));
        assert!(s.advance(1));
        assert!(s.advance(1));
        assert!(!s.advance(1));
    }

    #[test]
    fn test_lock_applies_to_next_generate_only() {
        let mut s = session(SessionConfig::default());
        s.add_course("Math").unwrap();
        s.add_course("Art").unwrap();
        s.generate().unwrap();
        let before = s.current().unwrap().clone();

        assert!(s.toggle_lock(1, 1));
        // Existing schedules are not touched by a new lock.
        assert_eq!(s.current().unwrap(), &before);

        let report = s.generate().unwrap();
        assert_eq!(report.len(), 1);
        for schedule in s.schedules().iter() {
            assert!(!schedule.occupancy().overlaps(s.locks().grid()));
        }
    }

    #[test]
    fn test_find_compatible_and_append() {
        let mut s = session(SessionConfig::default());
        s.add_course("Math").unwrap();
        assert_eq!(
            s.find_compatible("").unwrap_err(),
            SessionError::NoCurrentSchedule
        );

        s.generate().unwrap();
        // Single course: first maximal is Math p1 (Mon-1).
        assert_eq!(s.current().unwrap().sections()[0].section_label, "p1");

        let found = s.find_compatible("").unwrap();
        let names: Vec<String> = found.iter().map(|x| x.to_string()).collect();
        assert_eq!(names, vec!["Art(tue)", "PE(fri)", "Music(mon)"]);

        let music = Arc::clone(&found[2]);
        s.append(music).unwrap();
        assert_eq!(s.current().unwrap().len(), 2);

        let again = s.append(Arc::clone(&found[2])).unwrap_err();
        assert_eq!(
            again,
            SessionError::Conflict(ConflictError::DuplicateCourse("Music".into()))
        );

        s.lock(5, 3);
        let pe = Arc::clone(&found[1]);
        assert_eq!(
            s.append(pe).unwrap_err(),
            SessionError::Conflict(ConflictError::Locked)
        );
        s.unlock(5, 3);
        assert!(!s.is_locked(5, 3));
    }

    #[test]
    fn test_lock_commands_agree() {
        let mut s = session(SessionConfig::default());
        s.lock(2, 4);
        assert!(s.is_locked(2, 4));
        assert!(!s.toggle_lock(2, 4));
        assert!(s.toggle_lock(2, 4));
        s.unlock(2, 4);
        assert!(!s.is_locked(2, 4));
        s.unlock(2, 4);
        assert!(s.locks().is_empty());
    }

    #[test]
    fn test_max_size_mode_and_timetable() {
        let config = SessionConfig::default()
            .with_search(SearchConfig::max_size_only())
            .with_view(WeekView::Week(1));
        let mut s = session(config);
        for course in ["Math", "Art", "PE"] {
            s.add_course(course).unwrap();
        }
        let report = s.generate().unwrap();
        assert_eq!(report.best_size, 3);
        assert!(report.schedules.iter().all(|x| x.len() == 3));

        let table = s.timetable().unwrap();
        assert_eq!(table.cell(5, 3), "PE(fri)");
    }

    #[test]
    fn test_remove_candidate() {
        let mut s = session(SessionConfig::default());
        s.add_course("PE").unwrap();
        let pe = Arc::clone(&s.catalog().sections()[4]);
        s.remove_candidate(&pe).unwrap();
        assert!(s.candidates().is_empty());
        assert!(s.remove_candidate(&pe).is_err());
        s.add_candidate(pe).unwrap();
        s.clear_candidates();
        assert!(s.candidates().is_empty());
    }

    #[test]
    fn test_cancelled_before_start_is_reset() {
        let mut s = session(SessionConfig::default());
        s.add_course("Math").unwrap();
        s.cancel_handle().cancel();
        // generate clears a stale cancellation request.
        let report = s.generate().unwrap();
        assert!(!report.cancelled);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: SessionConfig = serde_json::from_str(
            r#"{"search":{"mode":{"policy":"all_maximal","cap":5}},"view":{"week":2}}"#,
        )
        .unwrap();
        assert_eq!(config.search.mode, SearchMode::AllMaximal { cap: 5 });
        assert_eq!(config.view, WeekView::Week(2));
        assert_eq!(config.course_soft_limit, DEFAULT_COURSE_SOFT_LIMIT);
    }
}
