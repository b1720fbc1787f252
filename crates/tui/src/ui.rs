//! Dashboard rendering.
//!
//! Lays out the header, tab bar, stat cards, overview panels and legend,
//! and delegates the timeline tab to the chart widget.

use chrono::{DateTime, NaiveDate, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs},
};

use taskdeck_core::{Bug, BugStats, DueUrgency, ProjectProgress, Severity, Task, TaskStats};

use crate::app::{ActiveTab, App, InputMode, Notice};
use crate::data::Dashboard;
use crate::form::render_form;
use crate::timeline::render_timeline;

/// Tab titles for the dashboard views.
const TAB_TITLES: [&str; 2] = ["Overview", "Timeline"];

/// Legend text for keyboard shortcuts.
const LEGEND: &str =
    " [Tab] Switch view  [j/k] Select  [h/l] Scroll  [n] New task  [r] Refresh  [q] Quit ";

/// Width of the title column in the overview panels.
const PANEL_TITLE_WIDTH: usize = 26;

/// Draw the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = create_main_layout(frame.area());

    draw_header(frame, chunks[0], app);
    draw_tabs(frame, chunks[1], app.active_tab());
    draw_content(frame, chunks[2], app);
    draw_legend(frame, chunks[3]);

    if app.input_mode() == InputMode::Form {
        render_form(frame, frame.area(), app.form());
    }
}

/// Create the main four-part layout: header, tabs, content, legend.
fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Legend bar
        ])
        .split(area)
        .to_vec()
}

/// Draw the header bar with the app title and the transient notice.
fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " taskdeck ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("project dashboard", Style::default().fg(Color::DarkGray)),
    ];

    if app.is_loading() {
        spans.push(Span::styled(
            "  loading...",
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(notice) = app.notice() {
        let (message, color) = match notice {
            Notice::Info(message) => (message, Color::Green),
            Notice::Error(message) => (message, Color::Red),
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the tab bar.
fn draw_tabs(frame: &mut Frame, area: Rect, active: ActiveTab) {
    let titles: Vec<Line> = TAB_TITLES.iter().map(|t| Line::from(*t)).collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(active.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Draw the content for the active tab.
fn draw_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.active_tab() {
        ActiveTab::Overview => draw_overview(frame, area, app),
        ActiveTab::Timeline => {
            let ranges = app.dashboard().map(|d| d.ranges.as_slice()).unwrap_or(&[]);
            render_timeline(frame, area, ranges, app.today(), app.timeline());
        }
    }
}

/// Draw the overview tab: stat cards on top, task/bug panels below.
fn draw_overview(frame: &mut Frame, area: Rect, app: &App) {
    let Some(dashboard) = app.dashboard() else {
        let message = if app.is_loading() {
            "Loading dashboard data..."
        } else {
            "Dashboard data unavailable. Press r to retry."
        };
        let paragraph = Paragraph::new(message).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Stat cards
            Constraint::Min(0),    // Panels
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[0]);

    draw_task_card(frame, cards[0], &dashboard.data.task_stats);
    draw_bug_card(frame, cards[1], &dashboard.data.bug_stats);
    draw_progress_card(frame, cards[2], &dashboard.data.progress);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    draw_upcoming_panel(frame, panels[0], dashboard, app.today());
    draw_recent_bugs_panel(frame, panels[1], dashboard, Utc::now());
}

/// Draw the task counters card.
fn draw_task_card(frame: &mut Frame, area: Rect, stats: &TaskStats) {
    let lines = vec![
        Line::from(Span::styled(
            stats.total.to_string(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("To do ", Style::default().fg(Color::Gray)),
            Span::raw(stats.todo.to_string()),
            Span::styled("  In progress ", Style::default().fg(Color::Gray)),
            Span::raw(stats.in_progress.to_string()),
            Span::styled("  Done ", Style::default().fg(Color::Gray)),
            Span::raw(stats.done.to_string()),
        ]),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().title(" Tasks ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Draw the bug counters card.
fn draw_bug_card(frame: &mut Frame, area: Rect, stats: &BugStats) {
    let lines = vec![
        Line::from(Span::styled(
            stats.total.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Critical ", Style::default().fg(Color::Gray)),
            Span::raw(stats.critical.to_string()),
            Span::styled("  Medium ", Style::default().fg(Color::Gray)),
            Span::raw(stats.medium.to_string()),
            Span::styled("  Low ", Style::default().fg(Color::Gray)),
            Span::raw(stats.low.to_string()),
        ]),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().title(" Bugs ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Draw the project progress card with a gauge and the planned end date.
fn draw_progress_card(frame: &mut Frame, area: Rect, progress: &ProjectProgress) {
    let block = Block::default()
        .title(" Project progress ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let percent = progress.percent.min(100);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(f64::from(percent) / 100.0)
        .label(format!("{percent}%"));
    frame.render_widget(gauge, rows[0]);

    if rows.len() > 1 && rows[1].height > 0 {
        let end_label = planned_end_label(progress.planned_end_date);
        frame.render_widget(
            Paragraph::new(end_label).style(Style::default().fg(Color::Gray)),
            rows[1],
        );
    }
}

/// Draw the upcoming-tasks panel.
fn draw_upcoming_panel(frame: &mut Frame, area: Rect, dashboard: &Dashboard, today: NaiveDate) {
    let block = Block::default()
        .title(" Upcoming tasks ")
        .borders(Borders::ALL);

    if dashboard.upcoming.is_empty() {
        let paragraph = Paragraph::new("No upcoming tasks")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let lines: Vec<Line> = dashboard
        .upcoming
        .iter()
        .map(|task| upcoming_task_line(task, today))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One row of the upcoming-tasks panel.
fn upcoming_task_line(task: &Task, today: NaiveDate) -> Line<'static> {
    let assignee = task.assigned_to.as_deref().unwrap_or("unassigned");
    let urgency = DueUrgency::classify(today, task.due_date);

    Line::from(vec![
        Span::styled(
            format!(
                "{:<width$} ",
                truncate(&task.title, PANEL_TITLE_WIDTH),
                width = PANEL_TITLE_WIDTH
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:<12} ", truncate(assignee, 12)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            due_label(today, task.due_date),
            Style::default().fg(urgency_color(urgency)),
        ),
    ])
}

/// Draw the recent-bugs panel.
fn draw_recent_bugs_panel(
    frame: &mut Frame,
    area: Rect,
    dashboard: &Dashboard,
    now: DateTime<Utc>,
) {
    let block = Block::default()
        .title(" Recent bugs ")
        .borders(Borders::ALL);

    if dashboard.recent.is_empty() {
        let paragraph = Paragraph::new("No reported bugs")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let lines: Vec<Line> = dashboard
        .recent
        .iter()
        .map(|bug| recent_bug_line(bug, now))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One row of the recent-bugs panel.
fn recent_bug_line(bug: &Bug, now: DateTime<Utc>) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<10} ", format!("[{}]", bug.severity)),
            Style::default()
                .fg(severity_color(&bug.severity))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "{:<width$} ",
                truncate(&bug.title, PANEL_TITLE_WIDTH),
                width = PANEL_TITLE_WIDTH
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            age_label(now, bug.reported_at),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Draw the legend bar at the bottom.
fn draw_legend(frame: &mut Frame, area: Rect) {
    let legend = Paragraph::new(LEGEND).style(Style::default().fg(Color::Black).bg(Color::Cyan));
    frame.render_widget(legend, area);
}

/// Truncate a string to the given width, adding an ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    }
}

/// Human-readable due date distance ("in 3d", "2d overdue").
fn due_label(today: NaiveDate, due: Option<NaiveDate>) -> String {
    match due {
        None => "no due date".to_string(),
        Some(due) => {
            let days = (due - today).num_days();
            if days == 0 {
                "due today".to_string()
            } else if days > 0 {
                format!("in {days}d")
            } else {
                format!("{}d overdue", -days)
            }
        }
    }
}

/// Label for the planned project end date.
fn planned_end_label(planned_end_date: Option<NaiveDate>) -> String {
    match planned_end_date {
        Some(date) => format!("Planned end: {}", date.format("%Y-%m-%d")),
        None => "Planned end: not set".to_string(),
    }
}

/// Human-readable age of a bug report ("3h ago").
fn age_label(now: DateTime<Utc>, at: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

/// Color for a due-date urgency class.
fn urgency_color(urgency: DueUrgency) -> Color {
    match urgency {
        DueUrgency::Critical => Color::Red,
        DueUrgency::Soon => Color::Yellow,
        DueUrgency::Normal => Color::Gray,
        DueUrgency::Unscheduled => Color::DarkGray,
    }
}

/// Color for a bug severity.
fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
    }
}
