//! Error types.

use thiserror::Error;

/// Why a section cannot join a schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    /// The schedule already holds a section of this course.
    #[error("course '{0}' is already in the schedule")]
    DuplicateCourse(String),

    /// The section meets at the same time as a scheduled section.
    #[error("time conflict with {with}")]
    Overlap {
        /// Display form of the conflicting section, `course(label)`.
        with: String,
    },

    /// The section meets in a locked slot.
    #[error("section meets in a locked time slot")]
    Locked,
}

/// Failure fetching the raw catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The source could not deliver any data.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by [`Session`](crate::session::Session) commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No schedule is selected (none generated yet, or the last search was empty).
    #[error("no current schedule")]
    NoCurrentSchedule,

    /// Schedule generation was requested with an empty candidate pool.
    #[error("no candidate sections selected")]
    NoCandidates,

    /// The identical section is already in the candidate pool.
    #[error("section {0} is already a candidate")]
    DuplicateSection(String),

    /// The section is not in the candidate pool.
    #[error("section {0} is not a candidate")]
    UnknownSection(String),

    /// The catalog has no course with this name.
    #[error("no course named '{0}' in the catalog")]
    UnknownCourse(String),

    /// Appending to the current schedule failed.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Loading the catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
