//! Timetable domain models.
//!
//! Provides the occupancy cube, course sections, user locks and the
//! schedule (result) type.
//!
//! # Domain Mappings
//!
//! | u-timetable | Enrollment system | Meaning |
//! |-------------|-------------------|---------|
//! | TimeGrid | 周/星期/节 | When something meets |
//! | Section | 教学班 | One offering of a course |
//! | LockSet | 锁定时段 | Slots the student keeps free |
//! | Schedule | 课表 | A conflict-free combination |

pub(crate) mod grid;
mod lock;
mod schedule;
mod section;

pub use grid::{Slot, TimeGrid, DAYS, PERIODS, WEEKS};
pub use lock::LockSet;
pub use schedule::{Schedule, StructuralKey};
pub use section::{Category, Section};
