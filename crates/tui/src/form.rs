//! New-task form state and input handling.
//!
//! A minimal three-field form opened with `n`: title, optional due date,
//! optional assignee. Validation happens on submit; the service assigns
//! the ID.

use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use taskdeck_core::{NewTask, Status};

/// Fields of the new-task form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    DueDate,
    Assignee,
}

impl FormField {
    /// Cycle to the next field.
    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::DueDate,
            Self::DueDate => Self::Assignee,
            Self::Assignee => Self::Title,
        }
    }

    /// Cycle to the previous field.
    pub fn previous(self) -> Self {
        match self {
            Self::Title => Self::Assignee,
            Self::DueDate => Self::Title,
            Self::Assignee => Self::DueDate,
        }
    }

    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::DueDate => "Due date (YYYY-MM-DD)",
            Self::Assignee => "Assignee",
        }
    }
}

/// State of the new-task form.
#[derive(Debug, Clone, Default)]
pub struct NewTaskForm {
    pub title: String,
    pub due_date: String,
    pub assignee: String,
    pub focused: FormField,
}

impl NewTaskForm {
    /// Create an empty form focused on the title field.
    pub fn new() -> Self {
        Self::default()
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focused {
            FormField::Title => &mut self.title,
            FormField::DueDate => &mut self.due_date,
            FormField::Assignee => &mut self.assignee,
        }
    }

    fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::DueDate => &self.due_date,
            FormField::Assignee => &self.assignee,
        }
    }

    /// Append a character to the focused field.
    pub fn insert_char(&mut self, c: char) {
        self.focused_value_mut().push(c);
    }

    /// Delete the last character of the focused field.
    pub fn delete_char(&mut self) {
        self.focused_value_mut().pop();
    }

    /// Move focus to the next field.
    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    /// Move focus to the previous field.
    pub fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
    }

    /// Validate the form and build the creation payload.
    ///
    /// The title is required; the due date, when present, must parse as
    /// `YYYY-MM-DD`.
    pub fn build(&self) -> Result<NewTask, &'static str> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required");
        }

        let due_date = match self.due_date.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| "Due date must be YYYY-MM-DD")?,
            ),
        };

        let assigned_to = match self.assignee.trim() {
            "" => None,
            name => Some(name.to_string()),
        };

        Ok(NewTask {
            title: title.to_string(),
            due_date,
            status: Status::Todo,
            assigned_to,
        })
    }
}

/// Fields in display order.
const FORM_FIELDS: [FormField; 3] = [FormField::Title, FormField::DueDate, FormField::Assignee];

/// Render the new-task form as a centered popup over the dashboard.
pub fn render_form(frame: &mut Frame, area: Rect, form: &NewTaskForm) {
    let popup = centered_rect(area, 52, 9);

    let mut lines = Vec::with_capacity(FORM_FIELDS.len() * 2 + 1);
    for field in FORM_FIELDS {
        let focused = field == form.focused;
        let marker = if focused { "> " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        lines.push(Line::from(Span::styled(
            format!("{}{}", marker, field.label()),
            label_style,
        )));

        let value = form.field_value(field);
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(Span::styled(
            format!("    {}{}", value, cursor),
            Style::default().fg(Color::White),
        )));
    }
    lines.push(Line::from(Span::styled(
        " [Tab] Next field  [Enter] Create  [Esc] Cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" New task ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// A fixed-size rectangle centered inside `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
