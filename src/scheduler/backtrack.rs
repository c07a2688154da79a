//! Backtracking schedule search.
//!
//! # Algorithm
//!
//! Depth-first over course-groups in a fixed order. At each group the
//! search first skips the group, then tries each of its sections (in
//! catalog order) that does not overlap the running occupancy. Sections
//! touching a locked slot are removed up front.
//!
//! Two acceptance policies:
//!
//! - **All maximal** (single pass): every non-empty partial combination
//!   is tested for maximality, i.e. every absent group has no section
//!   left that fits. Maximal combinations are deduplicated by
//!   [`StructuralKey`] and the search stops as soon as `cap` results
//!   exist.
//! - **Max size only** (two passes): pass 1 finds the largest number of
//!   groups `K` that can be selected together; pass 2 keeps exactly the
//!   distinct combinations of size `K`.
//!
//! The running occupancy is passed down by value, so backtracking needs
//! no restore step. Only the chosen-section stack and the result list
//! live in an accumulator threaded through the calls.
//!
//! # Complexity
//! Worst case O(Π (s_i + 1)) nodes for groups with s_i sections each.
//! The cap bounds output in all-maximal mode; max-size mode is
//! exhaustive (with branch-and-bound on the group count). Depth equals
//! the number of groups.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::ControlFlow;
use std::sync::Arc;

use super::{CancelFlag, CourseGroup, SearchReport};
use crate::models::{Schedule, Section, StructuralKey, TimeGrid};

/// Result cap used when none is configured.
pub const DEFAULT_RESULT_CAP: usize = 100;

/// Acceptance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SearchMode {
    /// Every maximal combination, stopping after `cap` results.
    AllMaximal {
        /// Maximum number of schedules returned.
        cap: usize,
    },
    /// Only combinations of the globally largest size.
    MaxSizeOnly,
}

impl Default for SearchMode {
    fn default() -> Self {
        SearchMode::AllMaximal {
            cap: DEFAULT_RESULT_CAP,
        }
    }
}

/// Search configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Acceptance policy.
    pub mode: SearchMode,
}

impl SearchConfig {
    /// All-maximal search with the given cap.
    pub fn all_maximal(cap: usize) -> Self {
        Self {
            mode: SearchMode::AllMaximal { cap },
        }
    }

    /// Maximum-size-only search.
    pub fn max_size_only() -> Self {
        Self {
            mode: SearchMode::MaxSizeOnly,
        }
    }

    /// Sets the mode.
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Backtracking engine over course-groups.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use u_timetable::models::{Section, TimeGrid};
/// use u_timetable::scheduler::{CourseGroup, ScheduleSearch, SearchMode};
///
/// let sections = vec![
///     Arc::new(Section::new("Math", "A", TimeGrid::every_week(1, 1))),
///     Arc::new(Section::new("Math", "B", TimeGrid::every_week(1, 2))),
///     Arc::new(Section::new("Art", "A", TimeGrid::every_week(1, 1))),
/// ];
/// let groups = CourseGroup::group(&sections);
///
/// let search = ScheduleSearch::new(SearchMode::MaxSizeOnly);
/// let schedules = search.search(&groups, &TimeGrid::new());
/// assert_eq!(schedules.len(), 1);
/// assert_eq!(schedules[0].len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleSearch {
    mode: SearchMode,
    cancel: CancelFlag,
}

/// Read-only view of the problem shared by every recursion step.
struct Problem<'a> {
    /// Per group, the sections that avoid the locks.
    groups: Vec<Vec<&'a Arc<Section>>>,
    cancel: &'a CancelFlag,
}

impl Problem<'_> {
    /// Every absent group has no section left that fits `occupied`.
    fn is_maximal(&self, taken: &[bool], occupied: &TimeGrid) -> bool {
        self.groups
            .iter()
            .zip(taken)
            .all(|(sections, &t)| t || sections.iter().all(|s| s.occupancy.overlaps(occupied)))
    }
}

/// Mutable search state threaded through the recursion.
#[derive(Default)]
struct Accumulator {
    chosen: Vec<Arc<Section>>,
    taken: Vec<bool>,
    seen: HashSet<StructuralKey>,
    found: Vec<Schedule>,
    best: usize,
    nodes: u64,
    cancelled: bool,
    truncated: bool,
}

impl Accumulator {
    fn new(group_count: usize) -> Self {
        Self {
            taken: vec![false; group_count],
            ..Default::default()
        }
    }

    fn push(&mut self, group: usize, section: &Arc<Section>) {
        self.chosen.push(Arc::clone(section));
        self.taken[group] = true;
    }

    fn pop(&mut self, group: usize) {
        self.chosen.pop();
        self.taken[group] = false;
    }

    /// Counts a node; breaks if cancellation was requested.
    fn step(&mut self, cancel: &CancelFlag) -> ControlFlow<()> {
        self.nodes += 1;
        if cancel.is_cancelled() {
            self.cancelled = true;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    /// Stores the current combination unless an equal one exists.
    fn record(&mut self) -> bool {
        let schedule = Schedule::from_sections(self.chosen.clone());
        if self.seen.insert(schedule.structural_key()) {
            self.found.push(schedule);
            true
        } else {
            false
        }
    }
}

impl ScheduleSearch {
    /// Creates a search with the given policy.
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            cancel: CancelFlag::new(),
        }
    }

    /// Creates a search from configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.mode)
    }

    /// Uses `flag` for cooperative cancellation.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = flag;
        self
    }

    /// The configured policy.
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Enumerates schedules. Never fails; no qualifying combination
    /// yields an empty vector.
    pub fn search(&self, groups: &[CourseGroup], locks: &TimeGrid) -> Vec<Schedule> {
        self.run(groups, locks).schedules
    }

    /// Enumerates schedules and reports search statistics.
    pub fn run(&self, groups: &[CourseGroup], locks: &TimeGrid) -> SearchReport {
        tracing::debug!(
            groups = groups.len(),
            sections = groups.iter().map(CourseGroup::len).sum::<usize>(),
            mode = ?self.mode,
            "schedule search started"
        );

        let problem = Problem {
            groups: groups
                .iter()
                .map(|g| {
                    g.sections
                        .iter()
                        .filter(|s| !s.occupancy.overlaps(locks))
                        .collect()
                })
                .collect(),
            cancel: &self.cancel,
        };
        let mut acc = Accumulator::new(groups.len());

        match self.mode {
            SearchMode::AllMaximal { cap } => {
                // A break is recorded in `acc.truncated` or `acc.cancelled`.
                if cap > 0 {
                    let _ = collect_maximal(&problem, &mut acc, 0, TimeGrid::new(), cap);
                }
                // Stable: equal sizes keep discovery order.
                acc.found.sort_by(|a, b| b.len().cmp(&a.len()));
                acc.best = acc.found.first().map_or(0, Schedule::len);
            }
            SearchMode::MaxSizeOnly => {
                // Both passes break only on cancellation, recorded in
                // `acc.cancelled`; pass 2 keeps what it found so far.
                let pass1 = find_best_size(&problem, &mut acc, 0, TimeGrid::new());
                if pass1.is_continue() && acc.best > 0 {
                    let target = acc.best;
                    let _ = collect_sized(&problem, &mut acc, 0, TimeGrid::new(), target);
                }
            }
        }

        let report = SearchReport {
            schedules: acc.found,
            best_size: acc.best,
            nodes_visited: acc.nodes,
            truncated: acc.truncated,
            cancelled: acc.cancelled,
        };

        if report.cancelled {
            tracing::warn!(found = report.len(), "schedule search cancelled");
        } else if report.truncated {
            tracing::warn!(found = report.len(), "schedule search stopped at result cap");
        }
        tracing::debug!(
            found = report.len(),
            best_size = report.best_size,
            nodes = report.nodes_visited,
            "schedule search finished"
        );

        report
    }
}

fn collect_maximal(
    problem: &Problem<'_>,
    acc: &mut Accumulator,
    index: usize,
    occupied: TimeGrid,
    cap: usize,
) -> ControlFlow<()> {
    acc.step(problem.cancel)?;

    if !acc.chosen.is_empty()
        && problem.is_maximal(&acc.taken, &occupied)
        && acc.record()
        && acc.found.len() >= cap
    {
        acc.truncated = true;
        return ControlFlow::Break(());
    }

    let Some(sections) = problem.groups.get(index) else {
        return ControlFlow::Continue(());
    };

    collect_maximal(problem, acc, index + 1, occupied, cap)?;

    for section in sections {
        if section.occupancy.overlaps(&occupied) {
            continue;
        }
        acc.push(index, section);
        let flow = collect_maximal(
            problem,
            acc,
            index + 1,
            occupied.union(&section.occupancy),
            cap,
        );
        acc.pop(index);
        flow?;
    }

    ControlFlow::Continue(())
}

/// Pass 1: largest number of groups selectable together.
fn find_best_size(
    problem: &Problem<'_>,
    acc: &mut Accumulator,
    index: usize,
    occupied: TimeGrid,
) -> ControlFlow<()> {
    acc.step(problem.cancel)?;

    let count = acc.chosen.len();
    acc.best = acc.best.max(count);

    // Even taking every remaining group cannot beat the best.
    if count + (problem.groups.len() - index) <= acc.best {
        return ControlFlow::Continue(());
    }

    let sections = &problem.groups[index];
    find_best_size(problem, acc, index + 1, occupied)?;

    for section in sections {
        if section.occupancy.overlaps(&occupied) {
            continue;
        }
        acc.push(index, section);
        let flow = find_best_size(problem, acc, index + 1, occupied.union(&section.occupancy));
        acc.pop(index);
        flow?;
    }

    ControlFlow::Continue(())
}

/// Pass 2: every distinct combination of exactly `target` sections.
fn collect_sized(
    problem: &Problem<'_>,
    acc: &mut Accumulator,
    index: usize,
    occupied: TimeGrid,
    target: usize,
) -> ControlFlow<()> {
    acc.step(problem.cancel)?;

    let count = acc.chosen.len();
    if count == target {
        acc.record();
        return ControlFlow::Continue(());
    }
    if count + (problem.groups.len() - index) < target {
        return ControlFlow::Continue(());
    }

    let sections = &problem.groups[index];
    collect_sized(problem, acc, index + 1, occupied, target)?;

    for section in sections {
        if section.occupancy.overlaps(&occupied) {
            continue;
        }
        acc.push(index, section);
        let flow = collect_sized(
            problem,
            acc,
            index + 1,
            occupied.union(&section.occupancy),
            target,
        );
        acc.pop(index);
        flow?;
    }

    ControlFlow::Continue(())
}
