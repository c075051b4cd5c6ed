//! Application state and event loop

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::Widget,
    DefaultTerminal, Frame,
};
use tracing::{debug, info, warn};

use crate::services::client::{submit_appointment, submit_goal};
use crate::services::config::Config;
use crate::services::loader::{LoadTracker, MonthLoad};
use crate::services::{
    build_month_grid, load_month, CalendarClient, CalendarState, DetailPanel, ItemIndex,
    NavEvent, RetryPolicy,
};
use crate::types::{
    iso_date, CalendarItem, ItemField, ItemKind, Month, NewAppointment, NewGoal, Result,
};

use super::theme::Theme;
use super::widgets::{
    appointment_form::{AppointmentFormPopup, AppointmentFormState},
    banner::{Banner, BannerView},
    calendar::CalendarView,
    day_detail::{visible_fields, DayDetailView},
    form_field::{render_hint, FormAction},
    goal_form::{GoalFormPopup, GoalFormState},
    help::HelpPopup,
    quit_confirm::{QuitChoice, QuitConfirmPopup, QuitConfirmState},
    spinner::Spinner,
};

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Grid,
    Detail,
}

/// Overlay that captures input
#[derive(Debug, Clone)]
pub enum Modal {
    Help,
    Appointment,
    Goal,
    QuitConfirm(QuitConfirmState),
}

/// Results reported by background workers
#[derive(Debug)]
pub enum WorkerMessage {
    Month(MonthLoad),
    Appointment(Result<NewAppointment>),
    Goal(Result<NewGoal>),
}

/// Main application
pub struct App {
    calendar: CalendarState,
    /// Keyboard cursor on the grid
    cursor: NaiveDate,
    today: NaiveDate,
    focus: Focus,
    index: ItemIndex,
    panel: DetailPanel,
    item_cursor: usize,
    field_cursor: usize,
    appointment_form: AppointmentFormState,
    goal_form: GoalFormState,
    modal: Option<Modal>,
    banner: Option<Banner>,
    loads: LoadTracker,
    pending_posts: usize,
    spinner_frame: usize,
    theme: Theme,
    client: Arc<dyn CalendarClient>,
    retry: RetryPolicy,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
    should_quit: bool,
}

impl App {
    /// Create the app and start loading today's month
    pub fn new(
        client: Arc<dyn CalendarClient>,
        retry: RetryPolicy,
        today: NaiveDate,
        theme: Theme,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut app = Self {
            calendar: CalendarState::new(today),
            cursor: today,
            today,
            focus: Focus::default(),
            index: ItemIndex::new(),
            panel: DetailPanel::new(),
            item_cursor: 0,
            field_cursor: 0,
            appointment_form: AppointmentFormState::new(),
            goal_form: GoalFormState::new(),
            modal: None,
            banner: None,
            loads: LoadTracker::new(),
            pending_posts: 0,
            spinner_frame: 0,
            theme,
            client,
            retry,
            tx,
            rx,
            should_quit: false,
        };
        app.request_month(app.calendar.current_month);
        app
    }

    /// Fetch a month on a worker thread
    fn request_month(&mut self, month: Month) {
        let generation = self.loads.start();
        let client = Arc::clone(&self.client);
        let retry = self.retry;
        let tx = self.tx.clone();
        debug!(%month, generation, "requesting month");
        thread::spawn(move || {
            let result = load_month(client.as_ref(), month, retry);
            let _ = tx.send(WorkerMessage::Month(MonthLoad {
                generation,
                month,
                result,
            }));
        });
    }

    /// Apply every finished worker result (non-blocking)
    pub fn poll_workers(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.apply_worker_message(message);
        }
    }

    fn apply_worker_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::Month(load) => {
                if !self.loads.finish(load.generation) {
                    debug!(month = %load.month, generation = load.generation, "stale month response ignored");
                    return;
                }
                match load.result {
                    Ok(items) => {
                        let added = self.index.merge(items);
                        debug!(month = %load.month, added, "merged month items");
                    }
                    Err(e) => {
                        warn!(month = %load.month, error = %e, "month load failed");
                        self.banner = Some(Banner::error(format!(
                            "Failed to load {}: {}",
                            load.month.title(),
                            e
                        )));
                    }
                }
            }
            WorkerMessage::Appointment(result) => {
                self.pending_posts = self.pending_posts.saturating_sub(1);
                match result {
                    Ok(created) => {
                        let title = created.title.clone();
                        let item = created.into_item(self.index.next_id(ItemKind::Appointment));
                        match self.index.insert(item) {
                            Ok(()) => {
                                self.appointment_form.reset();
                                self.banner =
                                    Some(Banner::info(format!("Appointment \"{}\" created", title)));
                            }
                            Err(e) => self.banner = Some(Banner::error(e.to_string())),
                        }
                    }
                    Err(e) => {
                        self.banner = Some(Banner::error(format!(
                            "Could not create appointment: {} (draft kept)",
                            e
                        )))
                    }
                }
            }
            WorkerMessage::Goal(result) => {
                self.pending_posts = self.pending_posts.saturating_sub(1);
                match result {
                    Ok(created) => {
                        self.goal_form.reset();
                        self.banner = Some(Banner::info(format!(
                            "Goal \"{}\" created with {} task(s)",
                            created.title,
                            created.tasks.len()
                        )));
                    }
                    Err(e) => {
                        self.banner = Some(Banner::error(format!(
                            "Could not create goal: {} (draft kept)",
                            e
                        )))
                    }
                }
            }
        }
    }

    /// Run a navigation transition and its side effects
    fn navigate(&mut self, event: NavEvent) {
        let next = self.calendar.apply(event);
        if next.selected_day != self.calendar.selected_day {
            self.panel.reset();
            self.item_cursor = 0;
            self.field_cursor = 0;
        }
        if next.selected_day.is_none() {
            self.focus = Focus::Grid;
        }
        let month_changed = next.month_changed(&self.calendar);
        self.calendar = next;
        if month_changed {
            self.request_month(next.current_month);
        }
    }

    /// Move the grid cursor; leaving the visible grid switches month
    fn move_cursor(&mut self, days: i64) {
        let Some(target) = self
            .cursor
            .checked_add_signed(chrono::Duration::days(days))
        else {
            return;
        };
        let month = self.calendar.current_month;
        if target < month.grid_start() || target > month.grid_end() {
            let Some(next) = Month::new(target.year(), target.month()) else {
                return;
            };
            self.navigate(NavEvent::ChangeMonth {
                month: next,
                select: None,
            });
        }
        self.cursor = target;
    }

    /// Step the displayed month, carrying the cursor's day of month along
    fn step_month(&mut self, event: NavEvent) {
        self.navigate(event);
        self.cursor = self.calendar.current_month.day_clamped(self.cursor.day());
    }

    /// Items of the selected day in panel order
    fn day_items(&self) -> Vec<&CalendarItem> {
        match self.calendar.selected_day {
            Some(day) => self.index.listed_for_day(&iso_date(day)),
            None => Vec::new(),
        }
    }

    fn has_unsaved_drafts(&self) -> bool {
        !self.appointment_form.draft.is_blank() || !self.goal_form.draft.is_blank()
    }

    fn request_quit(&mut self) {
        if self.has_unsaved_drafts() {
            self.modal = Some(Modal::QuitConfirm(QuitConfirmState::new()));
        } else {
            self.should_quit = true;
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let Some(modal) = self.modal.take() {
            self.modal = self.handle_modal_key(modal, key);
            return;
        }

        if self.focus == Focus::Detail && self.handle_detail_key(key) {
            return;
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-7),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(7),
            KeyCode::Char('[') | KeyCode::PageUp => self.step_month(NavEvent::PrevMonth),
            KeyCode::Char(']') | KeyCode::PageDown => self.step_month(NavEvent::NextMonth),
            KeyCode::Enter | KeyCode::Char(' ') => self.navigate(NavEvent::SelectDay(self.cursor)),
            KeyCode::Esc => self.navigate(NavEvent::Deselect),
            KeyCode::Char('t') => {
                self.navigate(NavEvent::Today(self.today));
                self.cursor = self.today;
            }
            KeyCode::Tab if self.calendar.selected_day.is_some() => self.focus = Focus::Detail,
            _ => self.handle_global_key(key),
        }
    }

    /// Keys that work in both panes
    fn handle_global_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.modal = Some(Modal::Appointment),
            KeyCode::Char('g') => self.modal = Some(Modal::Goal),
            KeyCode::Char('x') => self.banner = None,
            KeyCode::Char('?') => self.modal = Some(Modal::Help),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.request_quit(),
            _ => {}
        }
    }

    /// Detail pane keys. Returns false when the key should fall through to the grid.
    fn handle_detail_key(&mut self, key: KeyEvent) -> bool {
        if self.panel.is_editing() {
            match key.code {
                KeyCode::Enter => self.commit_edit(),
                KeyCode::Esc => self.panel.cancel(),
                KeyCode::Backspace => self.panel.pop_char(),
                KeyCode::Char(c) => self.panel.push_char(c),
                _ => {}
            }
            return true;
        }

        let count = self.day_items().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.item_cursor > 0 {
                    self.item_cursor -= 1;
                    self.field_cursor = 0;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.item_cursor + 1 < count {
                    self.item_cursor += 1;
                    self.field_cursor = 0;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let key = self.day_items().get(self.item_cursor).map(|item| item.key());
                if let Some(key) = key {
                    self.panel.toggle(key);
                    self.field_cursor = 0;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.field_cursor = self.field_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let fields = self.cursor_fields().len();
                if self.field_cursor + 1 < fields {
                    self.field_cursor += 1;
                }
            }
            KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Tab | KeyCode::Esc => self.focus = Focus::Grid,
            _ => return false,
        }
        true
    }

    /// Editable fields of the item under the cursor, when it is expanded
    fn cursor_fields(&self) -> Vec<ItemField> {
        self.day_items()
            .get(self.item_cursor)
            .filter(|item| self.panel.is_expanded(item.key()))
            .map(|item| visible_fields(item, true))
            .unwrap_or_default()
    }

    fn begin_edit(&mut self) {
        let Some(field) = self.cursor_fields().get(self.field_cursor).copied() else {
            return;
        };
        let Some(item) = self.day_items().get(self.item_cursor).map(|item| (*item).clone()) else {
            return;
        };
        if let Err(e) = self.panel.begin_edit(&item, field) {
            self.banner = Some(Banner::error(e.to_string()));
        }
    }

    fn commit_edit(&mut self) {
        let Some(key) = self.panel.edit().map(|edit| edit.key) else {
            return;
        };
        let Some(item) = self.index.get(key) else {
            self.panel.cancel();
            return;
        };
        let result = self
            .panel
            .commit(item)
            .and_then(|updated| self.index.update(updated));
        match result {
            Ok(()) => {
                info!(%key, "item updated");
                self.banner = None;
            }
            Err(e) => self.banner = Some(Banner::error(e.to_string())),
        }
    }

    /// Handle a key for the open modal; returns the modal to keep open, if any
    fn handle_modal_key(&mut self, modal: Modal, key: KeyEvent) -> Option<Modal> {
        match modal {
            Modal::Help => match key.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => None,
                _ => Some(Modal::Help),
            },
            Modal::QuitConfirm(mut state) => match state.handle_key(key) {
                Some(QuitChoice::Quit) => {
                    self.should_quit = true;
                    None
                }
                Some(QuitChoice::Stay) => None,
                None => Some(Modal::QuitConfirm(state)),
            },
            Modal::Appointment => match self.appointment_form.handle_key(key) {
                FormAction::None => Some(Modal::Appointment),
                FormAction::Cancel => None,
                FormAction::Submit => self.submit_appointment_form(),
            },
            Modal::Goal => match self.goal_form.handle_key(key) {
                FormAction::None => Some(Modal::Goal),
                FormAction::Cancel => None,
                FormAction::Submit => self.submit_goal_form(),
            },
        }
    }

    /// Day new appointments are created on
    fn appointment_date(&self) -> NaiveDate {
        self.calendar.selected_day.unwrap_or(self.today)
    }

    fn submit_appointment_form(&mut self) -> Option<Modal> {
        let payload = match self.appointment_form.draft.validate(self.appointment_date()) {
            Ok(payload) => payload,
            Err(e) => {
                self.appointment_form.error = Some(e.to_string());
                return Some(Modal::Appointment);
            }
        };
        info!(title = %payload.title, date = %payload.date, "submitting appointment");
        self.pending_posts += 1;
        self.banner = Some(Banner::info("Saving appointment..."));
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = submit_appointment(client.as_ref(), payload);
            let _ = tx.send(WorkerMessage::Appointment(result));
        });
        None
    }

    fn submit_goal_form(&mut self) -> Option<Modal> {
        let payload = match self.goal_form.draft.validate() {
            Ok(payload) => payload,
            Err(e) => {
                self.goal_form.error = Some(e.to_string());
                return Some(Modal::Goal);
            }
        };
        info!(title = %payload.title, tasks = payload.tasks.len(), "submitting goal");
        self.pending_posts += 1;
        self.banner = Some(Banner::info("Saving goal..."));
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = submit_goal(client.as_ref(), payload);
            let _ = tx.send(WorkerMessage::Goal(result));
        });
        None
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if self.loads.is_loading() || self.pending_posts > 0 {
            self.spinner_frame = Spinner::next_frame(self.spinner_frame);
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let hints: &[(&str, &str)] = match (self.focus, self.panel.is_editing()) {
            (Focus::Detail, true) => &[("Enter", "Save"), ("Esc", "Cancel")],
            (Focus::Detail, false) => &[
                ("↑↓", "Item"),
                ("Space", "Expand"),
                ("←→", "Field"),
                ("e", "Edit"),
                ("Tab", "Calendar"),
            ],
            (Focus::Grid, _) => &[
                ("←↓↑→", "Move"),
                ("[ ]", "Month"),
                ("Enter", "Select"),
                ("a", "Appointment"),
                ("g", "Goal"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
        };
        render_hint(area, buf, hints, self.theme);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [main, banner_area, footer] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let grid = build_month_grid(self.calendar.current_month, self.today, self.index.items());
        let loading = self.loads.is_loading().then_some(self.spinner_frame);
        let calendar = CalendarView::new(&grid, self.cursor, self.theme)
            .selected(self.calendar.selected_day)
            .focused(self.focus == Focus::Grid)
            .loading(loading);

        match self.calendar.selected_day {
            Some(day) => {
                let [grid_area, detail_area] =
                    Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                        .areas(main);
                calendar.render(grid_area, buf);

                let items = self.day_items();
                DayDetailView::new(Some(day), &items, &self.panel, self.theme)
                    .cursor(self.item_cursor, self.field_cursor)
                    .focused(self.focus == Focus::Detail)
                    .render(detail_area, buf);
            }
            None => calendar.render(main, buf),
        }

        if let Some(banner) = &self.banner {
            BannerView::new(banner, self.theme).render(banner_area, buf);
        }
        self.render_footer(footer, buf);

        match &self.modal {
            Some(Modal::Help) => {
                HelpPopup::new(self.theme).render(HelpPopup::centered_area(area), buf);
            }
            Some(Modal::Appointment) => {
                AppointmentFormPopup::new(&self.appointment_form, self.appointment_date(), self.theme)
                    .render(AppointmentFormPopup::centered_area(area), buf);
            }
            Some(Modal::Goal) => {
                GoalFormPopup::new(&self.goal_form, self.theme)
                    .render(GoalFormPopup::centered_area(area), buf);
            }
            Some(Modal::QuitConfirm(state)) => {
                QuitConfirmPopup::new(state.selection, self.theme)
                    .render(QuitConfirmPopup::centered_area(area), buf);
            }
            None => {}
        }
    }
}

/// Run the TUI application
pub fn run(config: &Config, client: Arc<dyn CalendarClient>) -> anyhow::Result<()> {
    // Theme detection queries the terminal, so it must happen before raw mode
    let theme = Theme::resolve(config.ui.theme);
    let today = Local::now().date_naive();
    let app = App::new(client, RetryPolicy::from_config(&config.retry), today, theme);

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, app);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        app.poll_workers();

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}
