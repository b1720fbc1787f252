//! Overview panel derivations.
//!
//! Small selection and classification helpers feeding the dashboard's
//! upcoming-tasks and recent-bugs panels.

use chrono::NaiveDate;

use crate::models::{Bug, Status, Task};

/// How close a due date is, used to color the due column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueUrgency {
    /// No due date set.
    Unscheduled,
    /// Overdue, or due within two days.
    Critical,
    /// Due within a week.
    Soon,
    /// More than a week away.
    Normal,
}

impl DueUrgency {
    /// Classify a due date relative to `today`.
    pub fn classify(today: NaiveDate, due: Option<NaiveDate>) -> Self {
        let Some(due) = due else {
            return DueUrgency::Unscheduled;
        };

        let days = (due - today).num_days();
        if days <= 2 {
            DueUrgency::Critical
        } else if days <= 7 {
            DueUrgency::Soon
        } else {
            DueUrgency::Normal
        }
    }
}

/// Open tasks with the nearest due dates first.
///
/// Done tasks are excluded; undated tasks sort after dated ones. At most
/// `limit` entries are returned.
pub fn upcoming_tasks(tasks: &[Task], limit: usize) -> Vec<Task> {
    let mut open: Vec<Task> = tasks
        .iter()
        .filter(|task| task.status != Status::Done)
        .cloned()
        .collect();

    open.sort_by_key(|task| match task.due_date {
        Some(due) => (0, due),
        None => (1, NaiveDate::MAX),
    });
    open.truncate(limit);
    open
}

/// Most recently reported bugs first, at most `limit` entries.
pub fn recent_bugs(bugs: &[Bug], limit: usize) -> Vec<Bug> {
    let mut sorted = bugs.to_vec();
    sorted.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
    sorted.truncate(limit);
    sorted
}
