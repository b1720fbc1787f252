//! Due-date timeline chart.
//!
//! Renders the ranges derived by `taskdeck_core::timeline` as a horizontal
//! bar chart: a date scale on top, one lane per task, and a vertical
//! marker on today's column. Upcoming bars run from today towards the due
//! date; past-due bars run from the due date back to today.
//!
//! Bars are color-coded by state: completed tasks are green, past-due open
//! tasks red, upcoming open tasks cyan.

use chrono::{Datelike, Duration, NaiveDate};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use taskdeck_core::{Status, TaskRange};

/// Marker drawn on today's column.
const TODAY_MARKER: char = '│';

/// Zoom level for the timeline date scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomLevel {
    /// Show individual days (for spans < 14 days).
    Days,
    /// Show ISO weeks (for spans 14-89 days).
    Weeks,
    /// Show months (for spans >= 90 days).
    Months,
}

impl ZoomLevel {
    /// Determine the appropriate zoom level for a span of `days`.
    fn from_days(days: i64) -> Self {
        if days < 14 {
            ZoomLevel::Days
        } else if days < 90 {
            ZoomLevel::Weeks
        } else {
            ZoomLevel::Months
        }
    }
}

/// State for the timeline view: scroll and selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineState {
    /// Vertical scroll offset for the lanes.
    pub scroll_offset: usize,
    /// Horizontal scroll offset (0-100 percentage).
    pub horizontal_offset: u16,
    /// Row of the selected range.
    pub selected: usize,
}

/// Layout of the visible timeline.
struct TimelineConfig {
    /// First date on the scale.
    start_date: NaiveDate,
    /// Number of days on the scale.
    days: i64,
    /// Width available for the bars (excluding the label area).
    bar_width: u16,
    /// Width of the label area on the left.
    label_width: u16,
    /// Zoom level chosen for the date span.
    #[cfg_attr(not(test), allow(dead_code))]
    zoom_level: ZoomLevel,
    /// Labeled columns of the date scale.
    columns: Vec<ColumnInfo>,
}

/// One labeled column of the date scale.
#[derive(Debug, Clone)]
struct ColumnInfo {
    label: String,
    /// Start position (0-based, relative to the bar area).
    start_col: u16,
    /// End position (exclusive).
    end_col: u16,
}

impl TimelineConfig {
    /// Build the layout from the ranges and the available width.
    fn from_ranges(ranges: &[TaskRange], today: NaiveDate, area_width: u16) -> Self {
        let label_width = 30u16.min(area_width / 3);
        let bar_width = area_width.saturating_sub(label_width).saturating_sub(1);

        let (start_date, end_date) = if ranges.is_empty() {
            (today - Duration::days(7), today)
        } else {
            let start = ranges.iter().map(|r| r.start).min().unwrap_or(today);
            let end = ranges.iter().map(|r| r.end).max().unwrap_or(today);
            (start, end)
        };

        let days = (end_date - start_date).num_days().max(1);
        let zoom_level = ZoomLevel::from_days(days);
        let columns = Self::calculate_columns(start_date, end_date, bar_width, zoom_level);

        Self {
            start_date,
            days,
            bar_width,
            label_width,
            zoom_level,
            columns,
        }
    }

    /// Lay out the date-scale columns for the chosen zoom level.
    fn calculate_columns(
        start: NaiveDate,
        end: NaiveDate,
        bar_width: u16,
        zoom_level: ZoomLevel,
    ) -> Vec<ColumnInfo> {
        if bar_width == 0 {
            return Vec::new();
        }

        let total = (end - start).num_days().max(1);
        let mut columns: Vec<ColumnInfo> = Vec::new();

        // Convert a date span into a column, clamped to the visible scale.
        let mut push = |label: String, from: NaiveDate, to: NaiveDate| {
            let lo = (from - start).num_days().clamp(0, total);
            let hi = (to - start).num_days().clamp(0, total);
            let start_col = ((lo as f64 / total as f64) * bar_width as f64).round() as u16;
            let end_col = ((hi as f64 / total as f64) * bar_width as f64).round() as u16;
            if end_col > start_col && start_col < bar_width {
                columns.push(ColumnInfo {
                    label,
                    start_col,
                    end_col: end_col.min(bar_width),
                });
            }
        };

        match zoom_level {
            ZoomLevel::Days => {
                for offset in 0..=total {
                    let day = start + Duration::days(offset);
                    push(day.format("%m/%d").to_string(), day, day + Duration::days(1));
                }
            }
            ZoomLevel::Weeks => {
                let to_monday = (7 - start.weekday().num_days_from_monday()) % 7;
                let mut week_start = start + Duration::days(to_monday as i64);

                if week_start > start {
                    push(start.format("%m/%d").to_string(), start, week_start);
                }
                while week_start <= end {
                    push(
                        format!("W{}", week_start.iso_week().week()),
                        week_start,
                        week_start + Duration::days(7),
                    );
                    week_start = week_start + Duration::days(7);
                }
            }
            ZoomLevel::Months => {
                let mut month_start =
                    NaiveDate::from_ymd_opt(start.year(), start.month(), 1).unwrap_or(start);

                while month_start <= end {
                    let next = if month_start.month() == 12 {
                        NaiveDate::from_ymd_opt(month_start.year() + 1, 1, 1)
                    } else {
                        NaiveDate::from_ymd_opt(month_start.year(), month_start.month() + 1, 1)
                    }
                    .unwrap_or(end + Duration::days(1));

                    push(month_start.format("%b").to_string(), month_start, next);
                    month_start = next;
                }
            }
        }

        columns
    }

    /// Column position of a date on the scale.
    fn date_to_column(&self, date: NaiveDate) -> u16 {
        if self.days == 0 || self.bar_width == 0 {
            return 0;
        }

        let offset = (date - self.start_date).num_days();
        let ratio = offset as f64 / self.days as f64;
        (ratio * self.bar_width as f64).clamp(0.0, self.bar_width as f64 - 1.0) as u16
    }
}

/// Bar color for a range.
///
/// Completed tasks are green regardless of lateness; past-due open tasks
/// are red; upcoming open tasks are cyan, so an on-schedule task never
/// looks like a finished one.
fn range_color(range: &TaskRange) -> Color {
    if range.is_completed {
        Color::Green
    } else if range.is_past_due {
        Color::Red
    } else {
        Color::Cyan
    }
}

/// Status indicator shown in the lane label.
fn status_indicator(status: &Status) -> &'static str {
    match status {
        Status::Done => "[x]",
        Status::InProgress => "[>]",
        Status::Todo => "[ ]",
    }
}

/// Horizontal scroll offset in characters.
fn scroll_chars(horizontal_offset: u16, bar_width: usize) -> usize {
    (horizontal_offset as usize) * bar_width / 100
}

/// Collapse per-cell styling into runs of identically styled spans.
fn spans_from_cells(cells: Vec<(char, Style)>) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();

    for (ch, style) in cells {
        if !run.is_empty() && style != run_style {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    spans
}

/// Render the due-date timeline.
///
/// With no ranges the chart is not drawn at all; a placeholder message
/// takes its place.
pub fn render_timeline(
    frame: &mut Frame,
    area: Rect,
    ranges: &[TaskRange],
    today: NaiveDate,
    state: TimelineState,
) {
    let block = Block::default()
        .title(" Due-date timeline ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if ranges.is_empty() {
        let paragraph = Paragraph::new("No tasks with due dates on the timeline")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let config = TimelineConfig::from_ranges(ranges, today, inner_width);

    let mut lines = Vec::with_capacity(ranges.len() + 2);
    lines.push(build_date_header(&config, state.horizontal_offset));
    lines.push(build_separator(&config, today, state.horizontal_offset));
    for range in ranges {
        let is_selected = range.row == state.selected;
        lines.push(build_range_line(
            range,
            &config,
            today,
            is_selected,
            state.horizontal_offset,
        ));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((state.scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}

/// Build the date-scale header with labels centered in their columns.
fn build_date_header(config: &TimelineConfig, horizontal_offset: u16) -> Line<'static> {
    let bar_width = config.bar_width as usize;
    let scroll = scroll_chars(horizontal_offset, bar_width);
    let mut header = vec![' '; bar_width];

    for col in &config.columns {
        let col_width = (col.end_col - col.start_col) as usize;
        let label: String = if col.label.len() <= col_width {
            col.label.clone()
        } else {
            col.label.chars().take(col_width).collect()
        };

        let padding = col_width.saturating_sub(label.len()) / 2;
        let origin = col.start_col as usize + padding;
        for (i, c) in label.chars().enumerate() {
            let orig = origin + i;
            if orig >= scroll {
                let pos = orig - scroll;
                if pos < bar_width {
                    header[pos] = c;
                }
            }
        }
    }

    Line::from(vec![
        Span::styled(" ".repeat(config.label_width as usize), Style::default()),
        Span::styled(
            header.into_iter().collect::<String>(),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Build the separator with grid markers and the today marker.
fn build_separator(
    config: &TimelineConfig,
    today: NaiveDate,
    horizontal_offset: u16,
) -> Line<'static> {
    let bar_width = config.bar_width as usize;
    let scroll = scroll_chars(horizontal_offset, bar_width);
    let grid = Style::default().fg(Color::DarkGray);

    let mut cells: Vec<(char, Style)> = vec![('\u{2500}', grid); bar_width];

    for col in &config.columns {
        let orig = col.start_col as usize;
        if orig > 0 && orig >= scroll {
            let pos = orig - scroll;
            if pos < bar_width {
                cells[pos] = ('\u{253C}', grid);
            }
        }
    }

    let today_col = config.date_to_column(today) as usize;
    if today_col >= scroll {
        let pos = today_col - scroll;
        if pos < bar_width {
            cells[pos] = ('\u{252C}', Style::default().fg(Color::Magenta));
        }
    }

    if !cells.is_empty() {
        cells[0] = ('\u{251C}', grid);
    }
    if bar_width > 1 {
        cells[bar_width - 1] = ('\u{2524}', grid);
    }

    let mut spans = vec![Span::styled(
        " ".repeat(config.label_width as usize),
        Style::default(),
    )];
    spans.extend(spans_from_cells(cells));
    Line::from(spans)
}

/// Build one lane: label on the left, bar and today marker on the right.
fn build_range_line(
    range: &TaskRange,
    config: &TimelineConfig,
    today: NaiveDate,
    is_selected: bool,
    horizontal_offset: u16,
) -> Line<'static> {
    let indicator = status_indicator(&range.status);
    let short_id: String = range.id.chars().take(6).collect();
    let selection_prefix = if is_selected { "> " } else { "  " };

    // Space left for the title after prefix, ID and indicator.
    let available = (config.label_width as usize)
        .saturating_sub(selection_prefix.len())
        .saturating_sub(7)
        .saturating_sub(indicator.len() + 1);

    let title = if range.title.chars().count() > available {
        let kept: String = range.title.chars().take(available.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        range.title.clone()
    };

    let label = format!("{selection_prefix}{short_id:<6} {indicator} {title}");
    let padded = format!("{:<width$}", label, width = config.label_width as usize);

    let label_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let bar_width = config.bar_width as usize;
    let scroll = scroll_chars(horizontal_offset, bar_width);
    let start_col = config.date_to_column(range.start) as usize;
    let end_col = (config.date_to_column(range.end) as usize).max(start_col + 1);
    let today_col = config.date_to_column(today) as usize;

    let bar_char = if range.is_completed { '\u{2588}' } else { '\u{2592}' };
    let color = range_color(range);
    let bar_style = if is_selected {
        Style::default()
            .fg(color)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if range.is_completed {
        Style::default().fg(color)
    } else {
        // Open work is emphasized.
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    };

    let mut cells: Vec<(char, Style)> = Vec::with_capacity(bar_width);
    for visible in 0..bar_width {
        let orig = visible + scroll;
        let cell = if orig >= start_col && orig < end_col {
            (bar_char, bar_style)
        } else if orig == today_col {
            (TODAY_MARKER, Style::default().fg(Color::Magenta))
        } else {
            (' ', Style::default())
        };
        cells.push(cell);
    }

    let mut spans = vec![Span::styled(padded, label_style)];
    spans.extend(spans_from_cells(cells));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(id: &str, today: NaiveDate, due: NaiveDate, status: Status) -> TaskRange {
        let is_past_due = due < today;
        let (start, end) = if is_past_due { (due, today) } else { (today, due) };
        TaskRange {
            id: id.to_string(),
            title: format!("Task {id}"),
            start,
            end,
            due,
            is_past_due,
            is_completed: status == Status::Done,
            status,
            row: 0,
        }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_zoom_level_thresholds() {
        assert_eq!(ZoomLevel::from_days(1), ZoomLevel::Days);
        assert_eq!(ZoomLevel::from_days(13), ZoomLevel::Days);
        assert_eq!(ZoomLevel::from_days(14), ZoomLevel::Weeks);
        assert_eq!(ZoomLevel::from_days(89), ZoomLevel::Weeks);
        assert_eq!(ZoomLevel::from_days(90), ZoomLevel::Months);
        assert_eq!(ZoomLevel::from_days(365), ZoomLevel::Months);
    }

    #[test]
    fn test_config_spans_min_start_to_max_end() {
        let today = date(2025, 3, 10);
        let ranges = vec![
            range("past", today, date(2025, 3, 1), Status::Done),
            range("future", today, date(2025, 3, 20), Status::Todo),
        ];

        let config = TimelineConfig::from_ranges(&ranges, today, 100);
        assert_eq!(config.start_date, date(2025, 3, 1));
        assert_eq!(config.days, 19);
        assert_eq!(config.zoom_level, ZoomLevel::Weeks);
    }

    #[test]
    fn test_config_without_ranges_defaults_to_one_week() {
        let today = date(2025, 3, 10);
        let config = TimelineConfig::from_ranges(&[], today, 100);

        assert_eq!(config.days, 7);
        assert_eq!(config.zoom_level, ZoomLevel::Days);
        assert!(!config.columns.is_empty());
    }

    #[test]
    fn test_date_to_column_boundaries() {
        let today = date(2025, 3, 10);
        let ranges = vec![range("a", today, date(2025, 3, 20), Status::Todo)];
        let config = TimelineConfig::from_ranges(&ranges, today, 100);

        assert_eq!(config.date_to_column(config.start_date), 0);
        let last = config.date_to_column(date(2025, 3, 20));
        assert_eq!(last, config.bar_width - 1);
    }

    #[test]
    fn test_columns_do_not_overlap() {
        let today = date(2025, 3, 10);
        let ranges = vec![
            range("past", today, date(2025, 2, 20), Status::Done),
            range("future", today, date(2025, 4, 25), Status::Todo),
        ];
        let config = TimelineConfig::from_ranges(&ranges, today, 120);

        for pair in config.columns.windows(2) {
            assert!(pair[1].start_col >= pair[0].end_col);
        }
    }

    #[test]
    fn test_day_columns_cover_short_spans() {
        let today = date(2025, 3, 10);
        let ranges = vec![range("a", today, date(2025, 3, 16), Status::Todo)];
        let config = TimelineConfig::from_ranges(&ranges, today, 100);

        assert_eq!(config.zoom_level, ZoomLevel::Days);
        assert!(config.columns.len() >= 6 && config.columns.len() <= 8);
    }

    #[test]
    fn test_month_columns_for_long_spans() {
        let today = date(2025, 3, 10);
        let ranges = vec![
            range("past", today, date(2025, 2, 10), Status::Done),
            range("future", today, date(2025, 5, 31), Status::Todo),
        ];
        let config = TimelineConfig::from_ranges(&ranges, today, 120);

        assert_eq!(config.zoom_level, ZoomLevel::Months);
        // Feb through May.
        assert!(config.columns.len() >= 3 && config.columns.len() <= 4);
    }

    #[test]
    fn test_lane_contains_short_id_and_indicator() {
        let today = date(2025, 3, 10);
        let r = range("abc123def", today, date(2025, 3, 15), Status::InProgress);
        let config = TimelineConfig::from_ranges(&[r.clone()], today, 100);

        let text = line_text(&build_range_line(&r, &config, today, false, 0));
        assert!(text.contains("abc123"));
        assert!(text.contains("[>]"));
    }

    #[test]
    fn test_completed_lane_uses_solid_green_bar() {
        let today = date(2025, 3, 10);
        let r = range("done1", today, date(2025, 3, 15), Status::Done);
        let config = TimelineConfig::from_ranges(&[r.clone()], today, 100);

        let line = build_range_line(&r, &config, today, false, 0);
        let bar_span = line
            .spans
            .iter()
            .find(|s| s.content.contains('\u{2588}'))
            .expect("completed lane should have a solid bar");
        assert_eq!(bar_span.style.fg, Some(Color::Green));

        let text = line_text(&line);
        assert!(!text.contains('\u{2592}'));
    }

    #[test]
    fn test_past_due_open_lane_uses_red_shade_bar() {
        let today = date(2025, 3, 10);
        let r = range("late1", today, date(2025, 3, 4), Status::InProgress);
        let config = TimelineConfig::from_ranges(&[r.clone()], today, 100);

        let line = build_range_line(&r, &config, today, false, 0);
        let bar_span = line
            .spans
            .iter()
            .find(|s| s.content.contains('\u{2592}'))
            .expect("open lane should have a shaded bar");
        assert_eq!(bar_span.style.fg, Some(Color::Red));
        assert!(bar_span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_upcoming_open_lane_is_cyan_not_green() {
        let today = date(2025, 3, 10);
        let r = range("soon1", today, date(2025, 3, 18), Status::Todo);
        let config = TimelineConfig::from_ranges(&[r.clone()], today, 100);

        let line = build_range_line(&r, &config, today, false, 0);
        let bar_span = line
            .spans
            .iter()
            .find(|s| s.content.contains('\u{2592}'))
            .expect("open lane should have a shaded bar");
        assert_eq!(bar_span.style.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_past_due_lane_shows_today_marker_after_bar() {
        let today = date(2025, 3, 10);
        // The bar stops at today, so today's column holds the marker.
        let r = range("late1", today, date(2025, 3, 2), Status::InProgress);
        let other = range("ctx", today, date(2025, 3, 20), Status::Todo);
        let config = TimelineConfig::from_ranges(&[r.clone(), other], today, 100);

        let line = build_range_line(&r, &config, today, false, 0);
        let text = line_text(&line);
        assert!(text.contains(TODAY_MARKER));

        let marker_span = line
            .spans
            .iter()
            .find(|s| s.content.contains(TODAY_MARKER))
            .expect("today marker span");
        assert_eq!(marker_span.style.fg, Some(Color::Magenta));
    }

    #[test]
    fn test_separator_marks_today_in_magenta() {
        let today = date(2025, 3, 10);
        let ranges = vec![
            range("past", today, date(2025, 3, 1), Status::Done),
            range("future", today, date(2025, 3, 20), Status::Todo),
        ];
        let config = TimelineConfig::from_ranges(&ranges, today, 100);

        let sep = build_separator(&config, today, 0);
        let marker_span = sep
            .spans
            .iter()
            .find(|s| s.content.contains('\u{252C}'))
            .expect("separator should mark today");
        assert_eq!(marker_span.style.fg, Some(Color::Magenta));
    }

    #[test]
    fn test_selected_lane_is_highlighted() {
        let today = date(2025, 3, 10);
        let r = range("sel1", today, date(2025, 3, 15), Status::Todo);
        let config = TimelineConfig::from_ranges(&[r.clone()], today, 100);

        let line = build_range_line(&r, &config, today, true, 0);
        assert_eq!(line.spans[0].style.fg, Some(Color::Yellow));
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));

        let bar_span = line
            .spans
            .iter()
            .find(|s| s.content.contains('\u{2592}'))
            .expect("bar span");
        assert!(bar_span.style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_long_titles_are_truncated() {
        let today = date(2025, 3, 10);
        let mut r = range("t1", today, date(2025, 3, 15), Status::Todo);
        r.title = "A very long task title that cannot possibly fit in the label area".to_string();
        let config = TimelineConfig::from_ranges(&[r.clone()], today, 60);

        let text = line_text(&build_range_line(&r, &config, today, false, 0));
        assert!(text.contains("..."));
    }

    #[test]
    fn test_zero_length_range_still_draws_one_cell() {
        let today = date(2025, 3, 10);
        let r = range("now", today, today, Status::Todo);
        let other = range("ctx", today, date(2025, 3, 20), Status::Todo);
        let config = TimelineConfig::from_ranges(&[r.clone(), other], today, 100);

        let text = line_text(&build_range_line(&r, &config, today, false, 0));
        assert!(text.contains('\u{2592}'));
    }

    #[test]
    fn test_header_shows_scale_labels() {
        let today = date(2025, 3, 10);
        let ranges = vec![range("a", today, date(2025, 3, 16), Status::Todo)];
        let config = TimelineConfig::from_ranges(&ranges, today, 100);

        let header = line_text(&build_date_header(&config, 0));
        assert!(!header.trim().is_empty());
    }

    #[test]
    fn test_horizontal_scroll_shifts_bars() {
        let today = date(2025, 3, 10);
        let r = range("a", today, date(2025, 3, 20), Status::Todo);
        let config = TimelineConfig::from_ranges(&[r.clone()], today, 100);

        let unscrolled = line_text(&build_range_line(&r, &config, today, false, 0));
        let scrolled = line_text(&build_range_line(&r, &config, today, false, 50));
        assert_ne!(unscrolled, scrolled);
    }

    #[test]
    fn test_spans_from_cells_groups_runs() {
        let a = Style::default().fg(Color::Red);
        let b = Style::default().fg(Color::Blue);
        let spans = spans_from_cells(vec![('x', a), ('y', a), ('z', b)]);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "xy");
        assert_eq!(spans[1].content, "z");
    }
}
