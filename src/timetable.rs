//! Weekly timetable view of a schedule.
//!
//! Collapses a schedule's occupancy cube into the familiar 11 × 7
//! table (periods × weekdays). Each cell lists the sections meeting in
//! that slot, one `course(label)` per line. This is the grid handed to
//! display code and spreadsheet exporters.

use serde::{Deserialize, Serialize};

use crate::models::{Schedule, TimeGrid, DAYS, PERIODS};

/// Weekday column headers, Monday first.
pub const WEEKDAY_LABELS: [&str; DAYS] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

/// Which weeks a timetable cell reflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekView {
    /// A single week (1-based).
    Week(usize),
    /// A slot counts if it is occupied in any week.
    #[default]
    AllWeeks,
}

impl WeekView {
    /// Whether `grid` occupies (day, period) in the viewed weeks.
    pub fn covers(&self, grid: &TimeGrid, day: usize, period: usize) -> bool {
        match *self {
            WeekView::Week(week) => grid.is_set(week, day, period),
            WeekView::AllWeeks => grid.is_set_any_week(day, period),
        }
    }
}

/// Periods × weekdays table of cell texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    /// `cells[period - 1][day - 1]`.
    cells: Vec<Vec<String>>,
}

impl Timetable {
    /// Builds the table for `schedule` under `view`.
    pub fn from_schedule(schedule: &Schedule, view: WeekView) -> Self {
        let mut cells = vec![vec![String::new(); DAYS]; PERIODS];

        for (p, row) in cells.iter_mut().enumerate() {
            for (d, cell) in row.iter_mut().enumerate() {
                let (day, period) = (d + 1, p + 1);
                let lines: Vec<String> = schedule
                    .sections()
                    .iter()
                    .filter(|s| view.covers(&s.occupancy, day, period))
                    .map(|s| s.to_string())
                    .collect();
                *cell = lines.join("\n");
            }
        }

        Self { cells }
    }

    /// Cell text at (day, period), 1-based. Empty when free or out of range.
    pub fn cell(&self, day: usize, period: usize) -> &str {
        period
            .checked_sub(1)
            .zip(day.checked_sub(1))
            .and_then(|(p, d)| self.cells.get(p)?.get(d))
            .map_or("", String::as_str)
    }

    /// Rows in period order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.cells
    }

    /// Row header for a 1-based period.
    pub fn period_label(period: usize) -> String {
        format!("第{period}节")
    }

    /// Whether every cell is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(String::is_empty)
    }
}
