//! Board view - three status columns and the gestures that move tasks

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::path::PathBuf;
use tracing::{error, warn};

use super::app::Action;
use super::components::HelpOverlay;
use super::dialogs::{ConfirmAction, ConfirmDialog, DialogResult, NewTaskDialog};
use super::styles::Theme;
use crate::board::{payload, FilteredView, Task, TaskStatus, TaskStore};
use crate::identity::adopt_identity;
use crate::storage::KeyValueStore;

pub struct BoardView<S: KeyValueStore> {
    store: TaskStore<S>,
    export_dir: PathBuf,

    // UI state
    focus: TaskStatus,
    cursors: [usize; 3],
    grabbed: Option<String>,
    status_message: Option<String>,

    // Dialogs
    show_help: bool,
    new_dialog: Option<NewTaskDialog>,
    confirm_dialog: Option<ConfirmDialog>,

    // Search
    search_active: bool,
    search_query: String,
}

impl<S: KeyValueStore> BoardView<S> {
    pub fn new(store: TaskStore<S>, export_dir: PathBuf) -> Self {
        Self {
            store,
            export_dir,
            focus: TaskStatus::Todo,
            cursors: [0; 3],
            grabbed: None,
            status_message: None,
            show_help: false,
            new_dialog: None,
            confirm_dialog: None,
            search_active: false,
            search_query: String::new(),
        }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn has_dialog(&self) -> bool {
        self.show_help || self.new_dialog.is_some() || self.confirm_dialog.is_some()
    }

    /// Whether keys are going to a dialog or the search field rather than the board.
    pub fn captures_input(&self) -> bool {
        self.has_dialog() || self.search_active
    }

    pub fn focus(&self) -> TaskStatus {
        self.focus
    }

    pub fn is_grabbing(&self) -> bool {
        self.grabbed.is_some()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn view(&self) -> FilteredView {
        self.store.filtered_view(&self.search_query)
    }

    pub fn selected_task(&self) -> Option<Task> {
        let cursor = self.cursors[self.focus.index()];
        self.view().column(self.focus).get(cursor).cloned()
    }

    /// Asks before looking up and caching this client's identity.
    pub fn ask_consent(&mut self) {
        self.confirm_dialog = Some(ConfirmDialog::new(
            "Identify This Client",
            "Look up this machine's public IP to keep a separate board per client? \
             Without it tasks stay on the shared anonymous board.",
            ConfirmAction::Consent,
        ));
    }

    /// Adopts a freshly resolved identity, carrying anonymous tasks along.
    pub fn identity_resolved(&mut self, identity: &str) {
        match adopt_identity(&mut self.store, identity) {
            Ok(0) => self.set_status(format!("Board key: {}", self.store.key())),
            Ok(carried) => self.set_status(format!(
                "Board key: {} ({} tasks carried over)",
                self.store.key(),
                carried
            )),
            Err(e) => {
                error!("Failed to record identity: {}", e);
                self.set_status(format!("Could not save identity: {}", e));
            }
        }
        self.clamp_cursors();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return None;
        }

        if let Some(dialog) = &mut self.new_dialog {
            match dialog.handle_key(key) {
                DialogResult::Continue => {}
                DialogResult::Cancel => {
                    self.new_dialog = None;
                }
                DialogResult::Submit(text) => {
                    self.new_dialog = None;
                    if let Some(task) = self.store.add(&text) {
                        self.set_status(format!("Added: {}", task.text));
                    }
                    self.clamp_cursors();
                }
            }
            return None;
        }

        if let Some(dialog) = &mut self.confirm_dialog {
            match dialog.handle_key(key) {
                DialogResult::Continue => {}
                DialogResult::Cancel => {
                    let declined_consent = dialog.action() == &ConfirmAction::Consent;
                    self.confirm_dialog = None;
                    if declined_consent {
                        self.set_status("Staying anonymous for this session");
                    }
                }
                DialogResult::Submit(()) => {
                    let action = dialog.action().clone();
                    self.confirm_dialog = None;
                    return self.confirmed(action);
                }
            }
            return None;
        }

        if self.search_active {
            match key.code {
                KeyCode::Esc => {
                    self.search_active = false;
                    self.search_query.clear();
                    self.cursors = [0; 3];
                }
                KeyCode::Enter => {
                    self.search_active = false;
                }
                KeyCode::Backspace => {
                    self.search_query.pop();
                    self.cursors = [0; 3];
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    self.cursors = [0; 3];
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('/') => {
                self.search_active = true;
            }
            KeyCode::Char('n') => {
                self.new_dialog = Some(NewTaskDialog::new());
            }
            KeyCode::Char('i') => {
                self.ask_consent();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.focus = TaskStatus::from_index(self.focus.index().saturating_sub(1))
                    .unwrap_or(self.focus);
                self.clamp_cursors();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.focus = TaskStatus::from_index(self.focus.index() + 1).unwrap_or(self.focus);
                self.clamp_cursors();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(-1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(1);
            }
            KeyCode::Char(' ') | KeyCode::Char('m') => {
                if let Some(task) = self.selected_task() {
                    if let Some(status) = self.store.advance(&task.id) {
                        self.set_status(format!("{} → {}", task.text, status.title()));
                    }
                    self.clamp_cursors();
                }
            }
            KeyCode::Char(c @ '1'..='3') => {
                let target = TaskStatus::from_index(c as usize - '1' as usize);
                if let (Some(task), Some(status)) = (self.selected_task(), target) {
                    self.store.move_to(&task.id, status);
                    self.set_status(format!("{} → {}", task.text, status.title()));
                    self.clamp_cursors();
                }
            }
            KeyCode::Char('g') | KeyCode::Enter if self.grabbed.is_some() => {
                self.drop_grabbed();
            }
            KeyCode::Char('g') => {
                self.grab_selected();
            }
            KeyCode::Esc => {
                if self.grabbed.take().is_some() {
                    self.set_status("Grab cancelled");
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    self.confirm_dialog = Some(ConfirmDialog::new(
                        "Delete Task",
                        &format!("Delete '{}'?", task.text),
                        ConfirmAction::Delete(task.id),
                    ));
                }
            }
            KeyCode::Char('C') => {
                if !self.store.tasks().is_empty() {
                    self.confirm_dialog = Some(ConfirmDialog::new(
                        "Clear Board",
                        crate::board::CLEAR_PROMPT,
                        ConfirmAction::Clear,
                    ));
                }
            }
            KeyCode::Char('e') => {
                self.export();
            }
            _ => {}
        }

        None
    }

    fn confirmed(&mut self, action: ConfirmAction) -> Option<Action> {
        match action {
            ConfirmAction::Delete(id) => {
                if let Some(task) = self.store.get(&id).cloned() {
                    self.store.remove(&id);
                    self.set_status(format!("Deleted: {}", task.text));
                }
            }
            ConfirmAction::Clear => {
                // The dialog already asked
                if self.store.clear(&mut true) {
                    self.grabbed = None;
                    self.set_status("Board cleared");
                }
            }
            ConfirmAction::Consent => {
                self.set_status("Looking up client identity...");
                return Some(Action::FetchIdentity);
            }
        }
        self.clamp_cursors();
        None
    }

    fn grab_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        match payload::encode(&task) {
            Ok(data) => {
                self.grabbed = Some(data);
                self.set_status(format!(
                    "Grabbed '{}': pick a column, g/Enter to drop, Esc to cancel",
                    task.text
                ));
            }
            Err(e) => warn!("Failed to encode drag payload: {}", e),
        }
    }

    fn drop_grabbed(&mut self) {
        let Some(data) = self.grabbed.take() else {
            return;
        };
        let task = match payload::decode(&data) {
            Ok(task) => task,
            Err(e) => {
                warn!("Ignoring drop with unreadable payload: {}", e);
                return;
            }
        };

        if self.store.move_to(&task.id, self.focus) {
            self.set_status(format!("{} → {}", task.text, self.focus.title()));
        }
        self.clamp_cursors();
    }

    fn export(&mut self) {
        let today = Local::now().date_naive();
        match self.store.export(&self.export_dir, today) {
            Ok(path) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => {
                error!("Export failed: {}", e);
                self.set_status(format!("Export failed: {}", e));
            }
        }
    }

    fn move_cursor(&mut self, delta: i32) {
        let len = self.view().column(self.focus).len();
        if len == 0 {
            return;
        }

        let cursor = &mut self.cursors[self.focus.index()];
        *cursor = if delta < 0 {
            cursor.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (*cursor + delta as usize).min(len - 1)
        };
    }

    fn clamp_cursors(&mut self) {
        let view = self.view();
        for status in TaskStatus::ALL {
            let len = view.column(status).len();
            let cursor = &mut self.cursors[status.index()];
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let view = self.view();
        self.render_header(frame, chunks[0], theme);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(chunks[1]);
        for status in TaskStatus::ALL {
            self.render_column(frame, columns[status.index()], status, view.column(status), theme);
        }

        self.render_status_bar(frame, chunks[2], theme);

        if self.show_help {
            HelpOverlay::render(frame, area, theme);
        }

        if let Some(dialog) = &self.new_dialog {
            dialog.render(frame, area, theme);
        }

        if let Some(dialog) = &self.confirm_dialog {
            dialog.render(frame, area, theme);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(format!(" TaskFlow [{}] ", self.store.key()))
            .title_style(Style::default().fg(theme.title).bold());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = if self.search_active || !self.search_query.is_empty() {
            let mut spans = vec![
                Span::styled("Search: ", Style::default().fg(theme.dimmed)),
                Span::styled(&self.search_query, Style::default().fg(theme.search)),
            ];
            if self.search_active {
                spans.push(Span::styled("█", Style::default().fg(theme.search)));
            }
            Line::from(spans)
        } else {
            let stats = self.store.stats();
            Line::from(vec![
                Span::styled(format!("{} tasks", stats.total), Style::default().fg(theme.text)),
                Span::styled("  │  ", Style::default().fg(theme.border)),
                Span::styled(
                    format!("{} pending", stats.pending),
                    Style::default().fg(theme.todo),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{} in progress", stats.in_progress),
                    Style::default().fg(theme.in_progress),
                ),
                Span::raw("  "),
                Span::styled(format!("{} done", stats.done), Style::default().fg(theme.done)),
                Span::styled("  │  ", Style::default().fg(theme.border)),
                Span::styled(
                    format!("{}% complete", stats.completion_rate),
                    Style::default().fg(theme.accent).bold(),
                ),
            ])
        };
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn render_column(
        &self,
        frame: &mut Frame,
        area: Rect,
        status: TaskStatus,
        tasks: &[Task],
        theme: &Theme,
    ) {
        let focused = status == self.focus;
        let color = theme.status_color(status);
        let border = if focused { theme.focused_border } else { theme.border };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ({}) ", status.title(), tasks.len()))
            .title_style(Style::default().fg(color).bold());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if tasks.is_empty() {
            let mut lines = vec![
                Line::from(""),
                Line::from("No tasks").style(Style::default().fg(theme.dimmed)),
            ];
            if focused && self.grabbed.is_some() {
                lines.push(Line::from("g to drop here").style(Style::default().fg(theme.grabbed)));
            }
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
            return;
        }

        let grabbed_id = self
            .grabbed
            .as_deref()
            .and_then(|data| payload::decode(data).ok())
            .map(|task| task.id);

        let items: Vec<ListItem> = tasks
            .iter()
            .map(|task| {
                let (icon, style) = if grabbed_id.as_ref() == Some(&task.id) {
                    ("⇅", Style::default().fg(theme.grabbed).bold())
                } else if task.is_done() {
                    ("✓", Style::default().fg(theme.dimmed).crossed_out())
                } else {
                    ("•", Style::default().fg(theme.text))
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", icon), Style::default().fg(color)),
                    Span::styled(task.text.as_str(), style),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(Style::default().bg(theme.selection).bold());
        let mut state = ListState::default();
        if focused {
            state.select(Some(self.cursors[status.index()]));
        }
        frame.render_stateful_widget(list, inner, &mut state);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if let Some(message) = &self.status_message {
            let status = Paragraph::new(format!(" {}", message))
                .style(Style::default().fg(theme.hint).bg(theme.selection));
            frame.render_widget(status, area);
            return;
        }

        let key_style = Style::default().fg(theme.accent).bold();
        let desc_style = Style::default().fg(theme.dimmed);
        let sep_style = Style::default().fg(theme.border);

        let mut spans = Vec::new();
        for (idx, (key, desc)) in [
            ("h/l", "Column"),
            ("j/k", "Task"),
            ("n", "New"),
            ("Space", "Advance"),
            ("g", "Grab"),
            ("d", "Delete"),
            ("/", "Search"),
            ("?", "Help"),
            ("q", "Quit"),
        ]
        .into_iter()
        .enumerate()
        {
            if idx > 0 {
                spans.push(Span::styled("│", sep_style));
            }
            spans.push(Span::styled(format!(" {}", key), key_style));
            spans.push(Span::styled(format!(" {} ", desc), desc_style));
        }

        let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.selection));
        frame.render_widget(status, area);
    }
}
