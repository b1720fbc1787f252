//! Data models for the taskdeck dashboard
//!
//! Defines Rust types that mirror the JSON payloads of the external
//! task/bug/project data service. The dashboard only ever holds read-only
//! snapshots of these records; the service owns the data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Task status
///
/// Represents the current state of a task in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    /// Returns the string representation used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Done => "done",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bug severity
///
/// Severity reported with a bug, from critical to low.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Medium,
    Low,
}

impl Severity {
    /// Returns the string representation used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A task as reported by the data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Service-assigned identifier
    pub id: String,

    /// Task title
    pub title: String,

    /// Optional due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Current status
    pub status: Status,

    /// Optional assignee name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// Payload for creating a task on the data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title
    pub title: String,

    /// Optional due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Initial status
    pub status: Status,

    /// Optional assignee name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl NewTask {
    /// Create a payload for a new to-do task with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_date: None,
            status: Status::Todo,
            assigned_to: None,
        }
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the assignee
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = Some(assignee.into());
        self
    }
}

/// A bug report as held by the data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bug {
    /// Service-assigned identifier
    pub id: String,

    /// Bug title
    pub title: String,

    /// Reported severity
    pub severity: Severity,

    /// When the bug was reported
    pub reported_at: DateTime<Utc>,
}

/// Task counters aggregated by the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TaskStats {
    pub total: u32,
    pub todo: u32,
    pub in_progress: u32,
    pub done: u32,
}

/// Bug counters aggregated by the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BugStats {
    pub total: u32,
    pub critical: u32,
    pub medium: u32,
    pub low: u32,
}

/// Overall project progress reported by the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectProgress {
    /// Completion percentage (0-100)
    pub percent: u8,

    /// Planned project end date, if one is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(Status::Todo.as_str(), "todo");
        assert_eq!(Status::InProgress.as_str(), "in_progress");
        assert_eq!(Status::Done.as_str(), "done");
    }

    #[test]
    fn test_status_display_matches_as_str() {
        assert_eq!(Status::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_severity_as_str() {
        assert_eq!(Severity::Critical.as_str(), "critical");
        assert_eq!(Severity::Medium.as_str(), "medium");
        assert_eq!(Severity::Low.as_str(), "low");
    }

    #[test]
    fn test_status_deserializes_from_wire_strings() {
        let status: Status = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, Status::InProgress);
    }

    #[test]
    fn test_task_deserializes_with_due_date() {
        let json = r#"{
            "id": "t-42",
            "title": "Ship reports module",
            "due_date": "2025-03-14",
            "status": "todo",
            "assigned_to": "mira"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "t-42");
        assert_eq!(
            task.due_date,
            Some(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
        );
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.assigned_to.as_deref(), Some("mira"));
    }

    #[test]
    fn test_task_deserializes_without_optional_fields() {
        let json = r#"{"id": "t-1", "title": "Untitled work", "status": "done"}"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.due_date.is_none());
        assert!(task.assigned_to.is_none());
    }

    #[test]
    fn test_new_task_builder() {
        let due = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let task = NewTask::new("Review designs")
            .with_due_date(due)
            .with_assignee("ola");

        assert_eq!(task.title, "Review designs");
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.assigned_to.as_deref(), Some("ola"));
    }

    #[test]
    fn test_new_task_serializes_without_empty_optionals() {
        let json = serde_json::to_string(&NewTask::new("Minimal")).unwrap();
        assert!(!json.contains("due_date"));
        assert!(!json.contains("assigned_to"));
    }

    #[test]
    fn test_bug_deserializes() {
        let json = r#"{
            "id": "b-7",
            "title": "Export crashes on empty filter",
            "severity": "critical",
            "reported_at": "2025-03-10T08:30:00Z"
        }"#;

        let bug: Bug = serde_json::from_str(json).unwrap();
        assert_eq!(bug.severity, Severity::Critical);
        assert_eq!(bug.reported_at.to_rfc3339(), "2025-03-10T08:30:00+00:00");
    }

    #[test]
    fn test_stats_deserialize() {
        let task_stats: TaskStats =
            serde_json::from_str(r#"{"total": 12, "todo": 5, "in_progress": 4, "done": 3}"#)
                .unwrap();
        assert_eq!(task_stats.total, 12);
        assert_eq!(task_stats.done, 3);

        let bug_stats: BugStats =
            serde_json::from_str(r#"{"total": 6, "critical": 1, "medium": 2, "low": 3}"#).unwrap();
        assert_eq!(bug_stats.critical, 1);
    }

    #[test]
    fn test_project_progress_without_end_date() {
        let progress: ProjectProgress = serde_json::from_str(r#"{"percent": 40}"#).unwrap();
        assert_eq!(progress.percent, 40);
        assert!(progress.planned_end_date.is_none());
    }
}
