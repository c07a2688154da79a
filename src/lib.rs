//! Course timetable search.
//!
//! Helps a student pick a conflict-free set of course sections out of
//! many candidates. Each section is pinned to specific weeks, days and
//! periods; the search enumerates every maximal non-conflicting
//! combination (or only the largest ones), honouring user-locked slots.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `TimeGrid`, `Section`, `LockSet`, `Schedule`
//! - **`scheduler`**: Backtracking search — `CourseGroup`, `ScheduleSearch`,
//!   `SearchMode`, `SearchReport`, `CancelFlag`
//! - **`collection`**: Browsing and hand-editing generated schedules
//! - **`timetable`**: Periods × weekdays view for display and export
//! - **`parser`**: Meeting-time markup → occupancy grid
//! - **`catalog`**: Catalog sources, the parsed catalog, the candidate pool
//! - **`session`**: The command surface a front end drives
//! - **`validation`**: Candidate set sanity checks
//!
//! # Architecture
//!
//! Everything is synchronous and in-memory. Fetching the raw catalog,
//! rendering and file export live outside this crate; they talk to it
//! through [`catalog::CatalogSource`] and [`timetable::Timetable`].
//!
//! # Logging
//!
//! Emits `tracing` events (search start/finish, truncation, session
//! actions). Install a subscriber in the host application to see them.

pub mod catalog;
pub mod collection;
pub mod error;
pub mod models;
pub mod parser;
pub mod scheduler;
pub mod session;
pub mod timetable;
pub mod validation;

pub use error::{CatalogError, ConflictError, SessionError};
