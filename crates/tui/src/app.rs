//! Main application state and event loop.

use std::io::{self, Stdout};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::prelude::*;

use taskdeck_client::ApiClient;

use crate::data::{Dashboard, load_dashboard};
use crate::error::TuiResult;
use crate::event::{
    is_back_tab, is_down, is_enter, is_escape, is_interrupt, is_left, is_new_task, is_quit,
    is_refresh, is_right, is_tab, is_up, poll_key,
};
use crate::form::NewTaskForm;
use crate::timeline::TimelineState;
use crate::ui;

/// The active dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Overview,
    Timeline,
}

impl ActiveTab {
    /// Cycle to the next tab.
    pub fn next(self) -> Self {
        match self {
            Self::Overview => Self::Timeline,
            Self::Timeline => Self::Overview,
        }
    }

    /// Get the index of the current tab.
    pub fn index(self) -> usize {
        match self {
            Self::Overview => 0,
            Self::Timeline => 1,
        }
    }
}

/// Input mode: normal navigation or the new-task form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Form,
}

/// Transient status line content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Async work requested by a key press, run by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingOp {
    Refresh,
    SubmitForm,
}

/// Main application state.
pub struct App {
    /// Client for the data service.
    client: ApiClient,
    /// Date the current snapshot was derived against.
    today: NaiveDate,
    /// Latest successfully loaded snapshot, if any.
    dashboard: Option<Dashboard>,
    /// The active tab.
    active_tab: ActiveTab,
    /// Whether key presses edit the new-task form.
    input_mode: InputMode,
    /// New-task form state.
    form: NewTaskForm,
    /// Timeline scroll and selection.
    timeline: TimelineState,
    /// Transient status line.
    notice: Option<Notice>,
    /// Whether a load is in flight.
    loading: bool,
    /// Whether the application is still running.
    running: bool,
}

impl App {
    /// Create the app and load the initial snapshot.
    ///
    /// A failed initial load does not abort: the dashboard starts empty
    /// with an error notice, and `r` retries.
    pub async fn new(client: ApiClient) -> Self {
        let mut app = Self {
            client,
            today: Local::now().date_naive(),
            dashboard: None,
            active_tab: ActiveTab::default(),
            input_mode: InputMode::default(),
            form: NewTaskForm::new(),
            timeline: TimelineState::default(),
            notice: None,
            loading: true,
            running: true,
        };
        app.refresh().await;
        app
    }

    /// Get the current snapshot, if one has loaded.
    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// Get the date the current snapshot was derived against.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Get the active tab.
    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    /// Get the current input mode.
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Get the new-task form state.
    pub fn form(&self) -> &NewTaskForm {
        &self.form
    }

    /// Get the timeline view state.
    pub fn timeline(&self) -> TimelineState {
        self.timeline
    }

    /// Get the transient notice, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Check whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Check if the application is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Request the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Cycle to the next tab and reset the timeline view.
    pub fn next_tab(&mut self) {
        self.active_tab = self.active_tab.next();
        self.timeline = TimelineState::default();
    }

    /// Open the new-task form.
    pub fn open_form(&mut self) {
        self.form = NewTaskForm::new();
        self.input_mode = InputMode::Form;
    }

    /// Close the new-task form without submitting.
    pub fn cancel_form(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Number of lanes on the timeline.
    fn timeline_len(&self) -> usize {
        self.dashboard.as_ref().map_or(0, |d| d.ranges.len())
    }

    /// Select the next timeline lane (clamps at the end).
    pub fn select_next_range(&mut self) {
        let lanes = self.timeline_len();
        if lanes > 0 && self.timeline.selected < lanes - 1 {
            self.timeline.selected += 1;
        }
    }

    /// Select the previous timeline lane (clamps at zero).
    pub fn select_previous_range(&mut self) {
        if self.timeline.selected > 0 {
            self.timeline.selected -= 1;
        }
    }

    /// Scroll the timeline left by 10% of its width.
    pub fn scroll_timeline_left(&mut self) {
        self.timeline.horizontal_offset = self.timeline.horizontal_offset.saturating_sub(10);
    }

    /// Scroll the timeline right by 10% of its width, up to 100%.
    pub fn scroll_timeline_right(&mut self) {
        self.timeline.horizontal_offset = (self.timeline.horizontal_offset + 10).min(100);
    }

    /// Keep the timeline selection inside the current lane count.
    fn clamp_timeline_selection(&mut self) {
        let lanes = self.timeline_len();
        if lanes == 0 {
            self.timeline.selected = 0;
        } else if self.timeline.selected >= lanes {
            self.timeline.selected = lanes - 1;
        }
    }

    /// Reload the dashboard snapshot from the data service.
    ///
    /// Any failure in the batch leaves the previous snapshot untouched,
    /// logs the cause, and surfaces one generic notice.
    pub async fn refresh(&mut self) {
        self.loading = true;
        self.today = Local::now().date_naive();

        match load_dashboard(&self.client, self.today).await {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.notice = None;
                self.clamp_timeline_selection();
            }
            Err(err) => {
                tracing::error!(error = %err, "dashboard load failed");
                self.notice = Some(Notice::Error("Could not load dashboard data".to_string()));
            }
        }

        self.loading = false;
    }

    /// Submit the new-task form to the data service.
    async fn submit_form(&mut self) {
        let payload = match self.form.build() {
            Ok(payload) => payload,
            Err(message) => {
                self.notice = Some(Notice::Error(message.to_string()));
                return;
            }
        };

        match self.client.create_task(&payload).await {
            Ok(task) => {
                if let Some(dashboard) = self.dashboard.as_mut() {
                    dashboard.apply_created_task(self.today, task);
                }
                self.input_mode = InputMode::Normal;
                self.notice = Some(Notice::Info("Task created".to_string()));
            }
            Err(err) => {
                tracing::error!(error = %err, "task creation failed");
                self.notice = Some(Notice::Error("Could not create task".to_string()));
            }
        }
    }

    /// Handle a keyboard event.
    ///
    /// Returns the async operation the event loop should run, if any.
    pub(crate) fn handle_key(&mut self, key: &crossterm::event::KeyEvent) -> Option<PendingOp> {
        match self.input_mode {
            InputMode::Form => self.handle_form_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_form_key(&mut self, key: &crossterm::event::KeyEvent) -> Option<PendingOp> {
        use crossterm::event::{KeyCode, KeyModifiers};

        if is_interrupt(key) {
            self.quit();
            return None;
        }

        if is_escape(key) {
            self.cancel_form();
        } else if is_enter(key) {
            return Some(PendingOp::SubmitForm);
        } else if is_tab(key) {
            self.form.focus_next();
        } else if is_back_tab(key) {
            self.form.focus_previous();
        } else if key.code == KeyCode::Backspace {
            self.form.delete_char();
        } else if let KeyCode::Char(c) = key.code
            && !key.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.form.insert_char(c);
        }

        None
    }

    fn handle_normal_key(&mut self, key: &crossterm::event::KeyEvent) -> Option<PendingOp> {
        if is_quit(key) {
            self.quit();
            return None;
        }

        if is_tab(key) {
            self.next_tab();
            return None;
        }

        if is_refresh(key) {
            return Some(PendingOp::Refresh);
        }

        if is_new_task(key) {
            self.open_form();
            return None;
        }

        if self.active_tab == ActiveTab::Timeline {
            if is_down(key) {
                self.select_next_range();
            } else if is_up(key) {
                self.select_previous_range();
            } else if is_left(key) {
                self.scroll_timeline_left();
            } else if is_right(key) {
                self.scroll_timeline_right();
            }
        }

        None
    }

    /// Run the main application loop.
    ///
    /// This initializes the terminal, runs the event loop, and ensures
    /// the terminal is restored on exit (even on panic).
    pub async fn run(&mut self) -> TuiResult<()> {
        let mut terminal = init_terminal()?;

        // The guard restores the terminal even if the loop panics.
        let _guard = scopeguard::guard((), |()| {
            let _ = restore_terminal();
        });

        let result = self.event_loop(&mut terminal).await;

        drop(_guard);

        result
    }

    /// The main event loop.
    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> TuiResult<()> {
        while self.running {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if let Some(key) = poll_key(Duration::from_millis(100))? {
                match self.handle_key(&key) {
                    Some(PendingOp::Refresh) => {
                        // Show the loading state while the batch is in flight.
                        self.loading = true;
                        terminal.draw(|frame| ui::draw(frame, self))?;
                        self.refresh().await;
                    }
                    Some(PendingOp::SubmitForm) => self.submit_form().await,
                    None => {}
                }
            }
        }
        Ok(())
    }
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> TuiResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> TuiResult<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
