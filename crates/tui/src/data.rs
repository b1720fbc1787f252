//! Dashboard data assembly.
//!
//! Fetches the service snapshot and derives the panel and timeline views
//! the UI renders from it.

use chrono::NaiveDate;

use taskdeck_client::{ApiClient, DashboardData};
use taskdeck_core::{Bug, Status, Task, TaskRange, recent_bugs, task_ranges, upcoming_tasks};

use crate::error::TuiResult;

/// Number of entries shown in the upcoming-tasks and recent-bugs panels.
pub const PANEL_LIMIT: usize = 4;

/// Everything the dashboard renders, derived from one service snapshot.
///
/// The derived lists are rebuilt whenever the underlying task collection
/// changes; nothing is cached across snapshots.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// The raw service snapshot.
    pub data: DashboardData,
    /// Open tasks with the nearest due dates, capped at `PANEL_LIMIT`.
    pub upcoming: Vec<Task>,
    /// Most recently reported bugs, capped at `PANEL_LIMIT`.
    pub recent: Vec<Bug>,
    /// Timeline ranges, ordered by due date.
    pub ranges: Vec<TaskRange>,
}

impl Dashboard {
    /// Derive the panel and timeline views from a service snapshot.
    pub fn from_data(today: NaiveDate, data: DashboardData) -> Self {
        let upcoming = upcoming_tasks(&data.tasks, PANEL_LIMIT);
        let recent = recent_bugs(&data.bugs, PANEL_LIMIT);
        let ranges = task_ranges(today, &data.tasks);

        Self {
            data,
            upcoming,
            recent,
            ranges,
        }
    }

    /// Apply a task the user just created without refetching.
    ///
    /// Mirrors the service-side effect locally: the task joins the front of
    /// the list, the counters grow, and the derived views are rebuilt.
    pub fn apply_created_task(&mut self, today: NaiveDate, task: Task) {
        self.data.task_stats.total += 1;
        match task.status {
            Status::Todo => self.data.task_stats.todo += 1,
            Status::InProgress => self.data.task_stats.in_progress += 1,
            Status::Done => self.data.task_stats.done += 1,
        }

        self.data.tasks.insert(0, task);
        self.upcoming = upcoming_tasks(&self.data.tasks, PANEL_LIMIT);
        self.ranges = task_ranges(today, &self.data.tasks);
    }
}

/// Fetch a fresh dashboard snapshot from the data service.
///
/// The underlying batch is all-or-nothing: any failed request fails the
/// whole load and no partial dashboard is produced.
pub async fn load_dashboard(client: &ApiClient, today: NaiveDate) -> TuiResult<Dashboard> {
    let data = client.fetch_dashboard().await?;
    Ok(Dashboard::from_data(today, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use taskdeck_core::{BugStats, ProjectProgress, Severity, TaskStats};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, due: Option<NaiveDate>, status: Status) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            due_date: due,
            status,
            assigned_to: None,
        }
    }

    fn bug(id: &str, days_ago: i64) -> Bug {
        Bug {
            id: id.to_string(),
            title: format!("Bug {id}"),
            severity: Severity::Low,
            reported_at: Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
                - Duration::days(days_ago),
        }
    }

    fn snapshot(tasks: Vec<Task>, bugs: Vec<Bug>) -> DashboardData {
        let task_stats = TaskStats {
            total: tasks.len() as u32,
            todo: tasks.iter().filter(|t| t.status == Status::Todo).count() as u32,
            in_progress: tasks
                .iter()
                .filter(|t| t.status == Status::InProgress)
                .count() as u32,
            done: tasks.iter().filter(|t| t.status == Status::Done).count() as u32,
        };
        let bug_stats = BugStats {
            total: bugs.len() as u32,
            critical: 0,
            medium: 0,
            low: bugs.len() as u32,
        };

        DashboardData {
            task_stats,
            bug_stats,
            progress: ProjectProgress {
                percent: 50,
                planned_end_date: Some(date(2025, 6, 30)),
            },
            tasks,
            bugs,
        }
    }

    #[test]
    fn test_from_data_derives_all_views() {
        let today = date(2025, 3, 10);
        let data = snapshot(
            vec![
                task("a", Some(date(2025, 3, 12)), Status::Todo),
                task("b", Some(date(2025, 3, 5)), Status::Done),
                task("c", None, Status::InProgress),
            ],
            vec![bug("x", 1), bug("y", 0)],
        );

        let dashboard = Dashboard::from_data(today, data);

        // "b" is done, so only two upcoming tasks remain.
        assert_eq!(dashboard.upcoming.len(), 2);
        assert_eq!(dashboard.upcoming[0].id, "a");

        assert_eq!(dashboard.recent[0].id, "y");

        // "c" has no due date; the other two land on the timeline.
        assert_eq!(dashboard.ranges.len(), 2);
        assert_eq!(dashboard.ranges[0].id, "b");
    }

    #[test]
    fn test_from_data_with_empty_snapshot() {
        let dashboard = Dashboard::from_data(date(2025, 3, 10), snapshot(vec![], vec![]));

        assert!(dashboard.upcoming.is_empty());
        assert!(dashboard.recent.is_empty());
        assert!(dashboard.ranges.is_empty());
    }

    #[test]
    fn test_apply_created_task_bumps_counters_and_prepends() {
        let today = date(2025, 3, 10);
        let mut dashboard = Dashboard::from_data(
            today,
            snapshot(vec![task("a", Some(date(2025, 3, 20)), Status::Todo)], vec![]),
        );

        dashboard.apply_created_task(today, task("new", Some(date(2025, 3, 11)), Status::Todo));

        assert_eq!(dashboard.data.task_stats.total, 2);
        assert_eq!(dashboard.data.task_stats.todo, 2);
        assert_eq!(dashboard.data.tasks[0].id, "new");

        // Derived views are rebuilt: the new task has the nearest due date.
        assert_eq!(dashboard.upcoming[0].id, "new");
        assert_eq!(dashboard.ranges[0].id, "new");
        assert_eq!(dashboard.ranges[0].row, 0);
        assert_eq!(dashboard.ranges[1].row, 1);
    }

    #[test]
    fn test_apply_created_task_counts_in_progress() {
        let today = date(2025, 3, 10);
        let mut dashboard = Dashboard::from_data(today, snapshot(vec![], vec![]));

        dashboard.apply_created_task(today, task("w", None, Status::InProgress));

        assert_eq!(dashboard.data.task_stats.in_progress, 1);
        assert_eq!(dashboard.data.task_stats.todo, 0);
        // No due date: the timeline stays empty.
        assert!(dashboard.ranges.is_empty());
    }
}
