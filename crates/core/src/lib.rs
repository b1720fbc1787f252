//! Core domain types and derivations for the taskdeck dashboard.
//!
//! Everything in this crate is pure: the models mirror the external data
//! service's JSON payloads and the derivation functions are deterministic
//! transforms over them. All time-dependent logic takes "today" as an
//! explicit parameter so callers (and tests) can pin arbitrary dates.

pub mod models;
pub mod overview;
pub mod timeline;

pub use models::{Bug, BugStats, NewTask, ProjectProgress, Severity, Status, Task, TaskStats};
pub use overview::{DueUrgency, recent_bugs, upcoming_tasks};
pub use timeline::{TaskRange, due_window, task_ranges};
