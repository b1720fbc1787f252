//! Due-date timeline derivation.
//!
//! Projects the task list onto a windowed, ordered set of date ranges for
//! the timeline chart. An upcoming task spans from today to its due date;
//! a past-due task spans from its due date back to today. Tasks without a
//! due date, or with a due date outside the window, are dropped silently.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Status, Task};

/// Days of history included on the timeline.
pub const LOOKBACK_DAYS: i64 = 30;

/// Days ahead used to pick the horizon month.
pub const HORIZON_DAYS: i64 = 60;

/// A task projected onto the timeline as a date range.
///
/// Derived fresh from `(today, tasks)` on every recomputation and never
/// stored; the range always touches today on one end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRange {
    /// Task ID.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Range start (the earlier of due date and today).
    pub start: NaiveDate,
    /// Range end (the later of due date and today).
    pub end: NaiveDate,
    /// The task's due date.
    pub due: NaiveDate,
    /// Whether the due date is strictly before today.
    pub is_past_due: bool,
    /// Whether the task is done, independent of `is_past_due`.
    pub is_completed: bool,
    /// Task status.
    pub status: Status,
    /// Chart lane, equal to the position after sorting by due date.
    pub row: usize,
}

/// Last day of the month containing `date`.
fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    // The first of the following month always exists.
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first - Duration::days(1))
        .unwrap_or(date)
}

/// The due-date window shown on the timeline.
///
/// Returns `(cutoff, horizon)`: due dates must fall strictly after the
/// lookback cutoff and at or before the horizon, which is the end of the
/// month `HORIZON_DAYS` ahead of today.
pub fn due_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let cutoff = today - Duration::days(LOOKBACK_DAYS);
    let horizon = end_of_month(today + Duration::days(HORIZON_DAYS));
    (cutoff, horizon)
}

/// Project tasks onto the timeline as ordered date ranges.
///
/// Pure function of `(today, tasks)`: given the same inputs the output is
/// identical. Output is sorted by due date, soonest first; `row` is the
/// resulting index and pins each range to one chart lane. An empty result
/// means the caller renders no chart.
pub fn task_ranges(today: NaiveDate, tasks: &[Task]) -> Vec<TaskRange> {
    let (cutoff, horizon) = due_window(today);

    let mut ranges: Vec<TaskRange> = tasks
        .iter()
        .filter_map(|task| {
            let due = task.due_date?;
            if due <= cutoff || due > horizon {
                return None;
            }

            let is_past_due = due < today;
            let (start, end) = if is_past_due { (due, today) } else { (today, due) };

            Some(TaskRange {
                id: task.id.clone(),
                title: task.title.clone(),
                start,
                end,
                due,
                is_past_due,
                is_completed: task.status == Status::Done,
                status: task.status.clone(),
                row: 0,
            })
        })
        .collect();

    ranges.sort_by_key(|range| range.due);
    for (row, range) in ranges.iter_mut().enumerate() {
        range.row = row;
    }

    tracing::debug!(total = tasks.len(), shown = ranges.len(), "derived timeline ranges");

    ranges
}
