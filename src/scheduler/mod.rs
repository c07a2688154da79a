//! Schedule search over course-groups.
//!
//! Candidate sections are grouped by course; the backtracking engine
//! picks at most one section per group so that no two picks share a
//! time slot and none touches a locked slot.
//!
//! # Policies
//!
//! - `SearchMode::AllMaximal { cap }`: every maximal combination, in
//!   descending size, stopping after `cap` results.
//! - `SearchMode::MaxSizeOnly`: only combinations of the largest size.
//!
//! # Scalability
//!
//! There is no time limit. Inputs with many mutually compatible
//! sections explode combinatorially; the cap bounds all-maximal mode,
//! max-size mode is exhaustive. Long runs can be stopped with a
//! [`CancelFlag`].

mod backtrack;
mod cancel;
mod groups;
mod report;

pub use backtrack::{ScheduleSearch, SearchConfig, SearchMode, DEFAULT_RESULT_CAP};
pub use cancel::CancelFlag;
pub use groups::CourseGroup;
pub use report::SearchReport;
