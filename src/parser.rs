//! Meeting-time text parser.
//!
//! Turns the enrollment system's time markup into an occupancy grid and
//! a display string. The markup is a sequence of `<p>…</p>` fragments,
//! each shaped like `1-8周,星期一第1-2节`:
//!
//! - **Weeks** (before the first `周,`): comma-separated items, each a
//!   single week `5`, a range `1-8`, or either form with a parity
//!   filter, `单` (odd) or `双` (even): `1-15单`, `4双`.
//! - **Day** : one of `星期一`..`星期日` (`星期天` also means Sunday).
//! - **Periods** (after the last `第`): `1-2` inclusive range or a
//!   single number `3`.
//!
//! Fragments without `周,` or without any digit 1-9 are discarded.
//! Unparsable week items are skipped. Ranges are clipped to the grid
//! before expansion, so coordinates outside it are never produced.

use std::collections::BTreeSet;

use crate::models::{TimeGrid, PERIODS, WEEKS};

/// Separator between retained fragments in the display string.
pub const FRAGMENT_SEPARATOR: &str = "；";

const WEEK_DAY_SEPARATOR: &str = "周,";

const DAY_NAMES: [(&str, usize); 8] = [
    ("星期一", 1),
    ("星期二", 2),
    ("星期三", 3),
    ("星期四", 4),
    ("星期五", 5),
    ("星期六", 6),
    ("星期日", 7),
    ("星期天", 7),
];

/// Parsed meeting times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTime {
    /// Occupied cells.
    pub grid: TimeGrid,
    /// Retained fragments joined by [`FRAGMENT_SEPARATOR`].
    pub description: String,
}

/// Parses time markup into a grid and description.
///
/// ```
/// use u_timetable::parser::parse_schedule;
///
/// let parsed = parse_schedule("<p>1-2周,星期一第3-4节</p><p>备注</p>");
/// assert_eq!(parsed.grid.count(), 4);
/// assert!(parsed.grid.is_set(2, 1, 4));
/// assert_eq!(parsed.description, "1-2周,星期一第3-4节");
/// ```
pub fn parse_schedule(markup: &str) -> ParsedTime {
    let mut grid = TimeGrid::new();
    let mut retained = Vec::new();

    for fragment in paragraphs(markup) {
        let has_digit = fragment.contains(|c: char| ('1'..='9').contains(&c));
        if !fragment.contains(WEEK_DAY_SEPARATOR) || !has_digit {
            continue;
        }
        retained.push(fragment);

        let mut parts = fragment.split(WEEK_DAY_SEPARATOR);
        let weeks = parse_weeks(parts.next().unwrap_or_default());
        let Some((day, periods)) = parse_day_periods(parts.next().unwrap_or_default().trim())
        else {
            continue;
        };

        for &week in &weeks {
            for &period in &periods {
                grid.set(week, day, period);
            }
        }
    }

    ParsedTime {
        grid,
        description: retained.join(FRAGMENT_SEPARATOR),
    }
}

/// Non-empty `<p>text</p>` bodies that contain no nested tag.
fn paragraphs(markup: &str) -> impl Iterator<Item = &str> {
    markup.split("<p>").skip(1).filter_map(|rest| {
        let end = rest.find('<')?;
        (end > 0 && rest[end..].starts_with("</p>")).then(|| &rest[..end])
    })
}

/// Expands a week expression into sorted, distinct week numbers.
pub fn parse_weeks(text: &str) -> Vec<usize> {
    let cleaned: String = text.chars().filter(|&c| c != '周' && c != ' ').collect();
    let mut weeks = BTreeSet::new();

    for item in cleaned.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (numbers, parity) = if item.contains('单') {
            (item.replace('单', ""), Some(1))
        } else if item.contains('双') {
            (item.replace('双', ""), Some(0))
        } else {
            (item.to_string(), None)
        };

        let Some((start, end)) = parse_range(&numbers) else {
            continue;
        };
        weeks.extend(
            (start.max(1)..=end.min(WEEKS)).filter(|w| parity.map_or(true, |p| w % 2 == p)),
        );
    }

    weeks.into_iter().collect()
}

/// `a-b` or a single number `a` (as `a-a`).
fn parse_range(text: &str) -> Option<(usize, usize)> {
    match text.split_once('-') {
        Some((start, end)) => Some((start.trim().parse().ok()?, end.trim().parse().ok()?)),
        None => {
            let n = text.trim().parse().ok()?;
            Some((n, n))
        }
    }
}

/// Extracts the day and period list, e.g. `星期三第5-6节` → (3, [5, 6]).
///
/// Returns `None` when no day name is present.
pub fn parse_day_periods(text: &str) -> Option<(usize, Vec<usize>)> {
    let day = DAY_NAMES
        .iter()
        .find(|(name, _)| text.contains(name))
        .map(|&(_, day)| day)?;

    let period_text = text.rsplit('第').next().unwrap_or_default();
    let numbers: Vec<usize> = period_text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    let periods = match numbers.as_slice() {
        [] => Vec::new(),
        [start, end, ..] if period_text.contains('-') => {
            ((*start).max(1)..=(*end).min(PERIODS)).collect()
        }
        [_] if period_text.contains('-') => Vec::new(),
        [first, ..] => vec![*first],
    };

    Some((day, periods))
}
