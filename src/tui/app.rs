//! Main application logic for the terminal user interface.
//!
//! This module contains the `BoardApp` struct which manages the TUI state:
//! a project panel on the left, the three-column board on the right, an
//! add-task modal, and confirm popups for deletions. Every mutation is
//! committed to the store first, then the in-memory lists are rebuilt from
//! the store, so the screen never shows state that failed to persist.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::board::{self, Columns, COLUMN_TITLES};
use crate::fields::Status;
use crate::project::Project;
use crate::session::Session;
use crate::store::{format_age, truncate, validate_title, Store, StoreError};
use crate::task::Task;
use crate::tui::colors::{DARK_GREEN, DARK_PURPLE, GOLD, SLATE};
use crate::tui::enums::{AppState, Focus};
use crate::tui::input::InputField;
use crate::tui::task_form::TaskForm;
use crate::tui::utils::centered_rect;

/// Main application state for the terminal user interface.
///
/// `projects` and `tasks` are the in-memory copies of the persisted
/// records: the full project list plus the task list of the current
/// project. `columns` is derived from `tasks` for rendering. All three
/// are rebuilt from the store after every committed mutation.
pub struct BoardApp {
    store: Store,
    store_path: PathBuf,
    session: Session,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    columns: Columns,
    state: AppState,
    focus: Focus,
    project_list_state: ListState,
    selected_column: usize,
    selected_card: usize,
    column_scroll_offsets: [usize; 3],
    task_form: TaskForm,
    project_input: InputField,
    status_message: String,
}

impl BoardApp {
    /// Create a new BoardApp, loading the store from the specified path.
    /// The first project in creation order becomes current, if any exists.
    pub fn new(store_path: &Path) -> Result<Self, StoreError> {
        let store = Store::load(store_path)?;

        let mut app = BoardApp {
            store,
            store_path: store_path.to_path_buf(),
            session: Session::new(),
            projects: Vec::new(),
            tasks: Vec::new(),
            columns: Columns::default(),
            state: AppState::Board,
            focus: Focus::Board,
            project_list_state: ListState::default(),
            selected_column: 0,
            selected_card: 0,
            column_scroll_offsets: [0; 3],
            task_form: TaskForm::new(),
            project_input: InputField::with_max_len(crate::store::MAX_TITLE_LEN),
            status_message: String::new(),
        };

        app.refresh();
        Ok(app)
    }

    /// Save the store to disk, reload it, and rebuild the in-memory lists.
    /// On failure the lists are left untouched and the error bubbles up to
    /// the caller, which surfaces it in the status bar.
    fn persist(&mut self) -> Result<(), StoreError> {
        self.store.save(&self.store_path)?;
        self.store = Store::load(&self.store_path)?;
        self.refresh();
        Ok(())
    }

    /// Rebuild projects, the current-project task list, and the columns
    /// from the store, reconciling the session selection along the way.
    fn refresh(&mut self) {
        self.projects = self.store.projects();

        // A deleted or never-set current project falls back to the first.
        let current_is_valid = self
            .session
            .current()
            .map(|id| self.projects.iter().any(|p| p.project_id == id))
            .unwrap_or(false);
        if !current_is_valid {
            self.session.select_first(&self.projects);
        }

        self.load_tasks();
        self.update_columns();
        self.sync_project_cursor();
    }

    /// Replace the in-memory task list with the current project's tasks.
    fn load_tasks(&mut self) {
        self.tasks = match self.session.current() {
            Some(id) => self.store.tasks_for_project(id),
            None => Vec::new(),
        };
    }

    /// Re-derive the board columns from the in-memory task list.
    fn update_columns(&mut self) {
        self.columns = board::partition(&self.tasks);
        self.clamp_selection();
    }

    /// Keep the project panel cursor on a valid row.
    fn sync_project_cursor(&mut self) {
        if self.projects.is_empty() {
            self.project_list_state.select(None);
            return;
        }
        let idx = match self.project_list_state.selected() {
            Some(i) if i < self.projects.len() => i,
            _ => self
                .current_project_index()
                .unwrap_or(0),
        };
        self.project_list_state.select(Some(idx));
    }

    /// Index of the current project in the panel list.
    fn current_project_index(&self) -> Option<usize> {
        let current = self.session.current()?;
        self.projects.iter().position(|p| p.project_id == current)
    }

    /// Ensure selected column, card, and scroll offsets are valid.
    fn clamp_selection(&mut self) {
        if self.selected_column >= Status::ALL.len() {
            self.selected_column = 0;
        }
        // Offsets go stale whenever a column shrinks under them, not
        // just the selected one (project switch, cascade delete).
        for (i, status) in Status::ALL.iter().enumerate() {
            let max_offset = self.columns.get(*status).len().saturating_sub(1);
            if self.column_scroll_offsets[i] > max_offset {
                self.column_scroll_offsets[i] = max_offset;
            }
        }
        let column_len = self.columns.get(Status::ALL[self.selected_column]).len();
        if column_len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= column_len {
            self.selected_card = column_len - 1;
        }
    }

    /// The task under the board cursor, if any.
    fn selected_task(&self) -> Option<&Task> {
        self.columns
            .get(Status::ALL[self.selected_column])
            .get(self.selected_card)
    }

    /// The project under the panel cursor, if any.
    fn project_under_cursor(&self) -> Option<&Project> {
        self.project_list_state
            .selected()
            .and_then(|i| self.projects.get(i))
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Make the project under the panel cursor current and reload the board.
    fn select_project_under_cursor(&mut self) {
        if let Some(project) = self.project_under_cursor() {
            let id = project.project_id.clone();
            let title = project.title.clone();
            self.session.set_current(Some(id));
            self.load_tasks();
            self.update_columns();
            self.selected_column = 0;
            self.selected_card = 0;
            self.set_status_message(format!("Project: {}", title));
        }
    }

    /// Create a project from the inline input. Invalid titles keep the
    /// input open with a message; nothing is persisted.
    fn add_project_from_input(&mut self) {
        let title = match validate_title(&self.project_input.value) {
            Ok(t) => t,
            Err(e) => {
                self.set_status_message(format!("Invalid title: {e}"));
                return;
            }
        };

        let project = Project::new(&title);
        let id = project.project_id.clone();
        if let Err(e) = self.store.add_project(project) {
            self.set_status_message(format!("Error adding project: {e}"));
            return;
        }
        match self.persist() {
            Ok(()) => {
                // Jump the panel cursor to the new project and select it.
                if let Some(idx) = self.projects.iter().position(|p| p.project_id == id) {
                    self.project_list_state.select(Some(idx));
                    self.select_project_under_cursor();
                }
                self.set_status_message(format!("Added project '{}'", title));
                self.project_input.clear();
                self.state = AppState::Board;
            }
            Err(e) => self.set_status_message(format!("Error saving: {e}")),
        }
    }

    /// Create a task from the modal form under the current project.
    /// An invalid title or missing current project aborts: the form is
    /// cleared and closed and nothing is persisted.
    fn add_task_from_form(&mut self) {
        let Some(current) = self.session.current().map(str::to_string) else {
            self.task_form.clear();
            self.state = AppState::Board;
            self.set_status_message("No project selected");
            return;
        };
        let (title, description) = match self.task_form.submit() {
            Ok(fields) => fields,
            Err(e) => {
                self.task_form.clear();
                self.state = AppState::Board;
                self.set_status_message(format!("Invalid title: {e}"));
                return;
            }
        };

        let task = Task::new(&current, &title, description);
        if let Err(e) = self.store.add_task(task) {
            self.set_status_message(format!("Error adding task: {e}"));
            return;
        }
        match self.persist() {
            Ok(()) => {
                self.set_status_message(format!("Added '{}'", title));
                self.task_form.clear();
                self.state = AppState::Board;
            }
            Err(e) => self.set_status_message(format!("Error saving: {e}")),
        }
    }

    /// Delete the task under the board cursor.
    fn delete_selected_task(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.task_id.clone()) else {
            return;
        };
        self.store.delete_task(&id);
        match self.persist() {
            Ok(()) => self.set_status_message("Task deleted"),
            Err(e) => self.set_status_message(format!("Error saving: {e}")),
        }
    }

    /// Delete the project under the panel cursor together with its tasks.
    /// Both removals land in the same save, so no orphan tasks survive a
    /// crash between them.
    fn delete_project_under_cursor(&mut self) {
        let Some(project) = self.project_under_cursor().cloned() else {
            return;
        };
        self.store.delete_project(&project.project_id);
        let removed = self.store.delete_tasks_for_project(&project.project_id);
        match self.persist() {
            Ok(()) => self.set_status_message(format!(
                "Deleted '{}' and {} task(s)",
                project.title, removed
            )),
            Err(e) => self.set_status_message(format!("Error saving: {e}")),
        }
    }

    /// Move the selected card one column left or right, then follow it.
    fn move_card(&mut self, to_the_right: bool) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        let target = if to_the_right {
            task.status.right()
        } else {
            task.status.left()
        };
        let Some(target) = target else {
            return;
        };

        let mut moved = task.clone();
        moved.status = target;
        if let Err(e) = self.store.update_task(moved) {
            self.set_status_message(format!("Error moving task: {e}"));
            return;
        }
        match self.persist() {
            Ok(()) => {
                self.selected_column = target.column_index();
                let column = self.columns.get(target);
                self.selected_card = column
                    .iter()
                    .position(|t| t.task_id == task.task_id)
                    .unwrap_or(0);
                self.set_status_message(format!(
                    "Moved to {}",
                    COLUMN_TITLES[target.column_index()]
                ));
            }
            Err(e) => self.set_status_message(format!("Error saving: {e}")),
        }
    }

    /// Handle keyboard input based on current state.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                match self.state {
                    AppState::Board => return Ok(self.handle_board_input(key.code, key.modifiers)),
                    AppState::AddTask => self.handle_add_task_input(key.code),
                    AppState::NewProject => self.handle_new_project_input(key.code),
                    AppState::ConfirmDeleteTask => self.handle_confirm_input(key.code, true),
                    AppState::ConfirmDeleteProject => self.handle_confirm_input(key.code, false),
                    AppState::Help => {
                        self.state = AppState::Board;
                    }
                }
            }
        }
        Ok(false)
    }

    /// Handle input for the main board state. Returns true to exit.
    fn handle_board_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,

            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Projects => Focus::Board,
                    Focus::Board => Focus::Projects,
                };
            }

            KeyCode::Char('?') | KeyCode::Char('h') => {
                self.state = AppState::Help;
            }

            KeyCode::Char('n') => {
                self.project_input.clear();
                self.project_input.active = true;
                self.state = AppState::NewProject;
            }

            KeyCode::Char('a') => {
                if self.session.current().is_some() {
                    self.task_form = TaskForm::new();
                    self.state = AppState::AddTask;
                } else {
                    self.set_status_message("Create a project first ('n')");
                }
            }

            KeyCode::Char('x') if self.focus == Focus::Projects => {
                if self.project_under_cursor().is_some() {
                    self.state = AppState::ConfirmDeleteProject;
                }
            }

            KeyCode::Char('d') if self.focus == Focus::Board => {
                if self.selected_task().is_some() {
                    self.state = AppState::ConfirmDeleteTask;
                }
            }

            KeyCode::Enter if self.focus == Focus::Projects => {
                self.select_project_under_cursor();
            }

            // Card movement between columns (check before plain arrows)
            KeyCode::Left
                if self.focus == Focus::Board && modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.move_card(false);
            }
            KeyCode::Right
                if self.focus == Focus::Board && modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.move_card(true);
            }

            KeyCode::Left if self.focus == Focus::Board => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Right if self.focus == Focus::Board => {
                if self.selected_column < Status::ALL.len() - 1 {
                    self.selected_column += 1;
                    self.clamp_selection();
                }
            }

            KeyCode::Up => match self.focus {
                Focus::Projects => {
                    if let Some(i) = self.project_list_state.selected() {
                        if i > 0 {
                            self.project_list_state.select(Some(i - 1));
                        }
                    }
                }
                Focus::Board => {
                    if self.selected_card > 0 {
                        self.selected_card -= 1;
                    }
                }
            },
            KeyCode::Down => match self.focus {
                Focus::Projects => {
                    if let Some(i) = self.project_list_state.selected() {
                        if i + 1 < self.projects.len() {
                            self.project_list_state.select(Some(i + 1));
                        }
                    }
                }
                Focus::Board => {
                    let column_len = self.columns.get(Status::ALL[self.selected_column]).len();
                    if column_len > 0 && self.selected_card < column_len - 1 {
                        self.selected_card += 1;
                    }
                }
            },

            _ => {}
        }
        false
    }

    /// Handle input while the add-task modal is open.
    fn handle_add_task_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.task_form.clear();
                self.state = AppState::Board;
            }
            KeyCode::Enter => self.add_task_from_form(),
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Char(c) => self.task_form.active_field_mut().handle_char(c),
            KeyCode::Backspace => self.task_form.active_field_mut().handle_backspace(),
            KeyCode::Delete => self.task_form.active_field_mut().handle_delete(),
            KeyCode::Left => self.task_form.active_field_mut().move_cursor_left(),
            KeyCode::Right => self.task_form.active_field_mut().move_cursor_right(),
            _ => {}
        }
    }

    /// Handle input while the new-project input is open.
    fn handle_new_project_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.project_input.clear();
                self.state = AppState::Board;
            }
            KeyCode::Enter => self.add_project_from_input(),
            KeyCode::Char(c) => self.project_input.handle_char(c),
            KeyCode::Backspace => self.project_input.handle_backspace(),
            KeyCode::Delete => self.project_input.handle_delete(),
            KeyCode::Left => self.project_input.move_cursor_left(),
            KeyCode::Right => self.project_input.move_cursor_right(),
            _ => {}
        }
    }

    /// Handle input for the delete confirmation popups.
    fn handle_confirm_input(&mut self, key: KeyCode, for_task: bool) {
        match key {
            KeyCode::Char('y') | KeyCode::Enter => {
                if for_task {
                    self.delete_selected_task();
                } else {
                    self.delete_project_under_cursor();
                }
                self.state = AppState::Board;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.state = AppState::Board;
            }
            _ => {}
        }
    }

    /// Render the header bar.
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let project_name = self
            .session
            .current()
            .and_then(|id| self.projects.iter().find(|p| p.project_id == id))
            .map(|p| p.title.clone())
            .unwrap_or_else(|| "-".to_string());

        let header_text = vec![Line::from(vec![
            Span::styled("PERSONAL KANBAN", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("Current Project: {}", project_name),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    /// Render the project panel on the left.
    fn render_projects(&mut self, f: &mut Frame, area: Rect) {
        let current = self.session.current().map(str::to_string);

        let items: Vec<ListItem> = self
            .projects
            .iter()
            .map(|p| {
                let is_current = current.as_deref() == Some(p.project_id.as_str());
                let style = if is_current {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let marker = if is_current { "● " } else { "  " };
                ListItem::new(format!("{}{}", marker, truncate(&p.title, 20))).style(style)
            })
            .collect();

        let border_style = if self.focus == Focus::Projects {
            Style::default().fg(DARK_PURPLE).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Projects")
                    .border_style(border_style),
            )
            .highlight_style(Style::default().bg(DARK_PURPLE).fg(Color::White));

        f.render_stateful_widget(list, area, &mut self.project_list_state);
    }

    /// Render the kanban board with its three columns.
    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        if self.session.current().is_none() {
            let hint = Paragraph::new("No projects yet.\n\nPress 'n' to create one.")
                .block(Block::default().borders(Borders::ALL).title("Board"))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(hint, area);
            return;
        }

        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(area);

        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, i);
        }
    }

    /// Accent color for a column.
    fn column_color(column_index: usize) -> Color {
        match column_index {
            0 => SLATE,
            1 => GOLD,
            _ => DARK_GREEN,
        }
    }

    /// Render a single column with scrolling.
    fn render_column(&mut self, f: &mut Frame, area: Rect, column_index: usize) {
        let status = Status::ALL[column_index];
        let is_selected = self.focus == Focus::Board && column_index == self.selected_column;

        let border_style = if is_selected {
            Style::default()
                .fg(Self::column_color(column_index))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let title = format!(
            "{} ({})",
            COLUMN_TITLES[column_index],
            self.columns.get(status).len()
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style);

        let inner = block.inner(area);
        f.render_widget(block, area);

        let cards: Vec<Task> = self.columns.get(status).to_vec();
        if cards.is_empty() {
            return;
        }

        let card_height = 5;
        let available_height = inner.height as usize;
        let visible_cards = available_height / card_height;

        let scroll_offset = if is_selected {
            let start_visible = self.column_scroll_offsets[column_index];
            let end_visible = start_visible + visible_cards;

            if self.selected_card < start_visible {
                self.column_scroll_offsets[column_index] = self.selected_card;
                self.selected_card
            } else if self.selected_card >= end_visible && end_visible > 0 {
                let new_offset = self.selected_card - visible_cards + 1;
                self.column_scroll_offsets[column_index] = new_offset;
                new_offset
            } else {
                start_visible
            }
        } else {
            self.column_scroll_offsets[column_index]
        };

        let now_ms = Utc::now().timestamp_millis();
        let mut current_y = 0;
        let mut rendered_cards = 0;

        for (card_index, task) in cards.iter().enumerate().skip(scroll_offset) {
            if current_y + card_height > available_height {
                break;
            }

            let is_this_card_selected = is_selected && card_index == self.selected_card;
            let card_area = Rect {
                x: inner.x,
                y: inner.y + current_y as u16,
                width: inner.width,
                height: card_height as u16,
            };

            self.render_card(f, card_area, task, is_this_card_selected, now_ms);

            current_y += card_height;
            rendered_cards += 1;
        }

        // Scroll indicators
        if scroll_offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{} above", scroll_offset))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y,
                    width: inner.width,
                    height: 1,
                },
            );
        }
        let remaining = cards.len().saturating_sub(scroll_offset + rendered_cards);
        if remaining > 0 {
            let indicator = Paragraph::new(format!("▼ +{} below", remaining))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y + inner.height - 1,
                    width: inner.width,
                    height: 1,
                },
            );
        }
    }

    /// Render a single task card: title, description, and age.
    fn render_card(&self, f: &mut Frame, area: Rect, task: &Task, is_selected: bool, now_ms: i64) {
        let style = if is_selected {
            Style::default()
                .bg(DARK_PURPLE)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };

        let width = area.width.saturating_sub(2) as usize;
        let mut title_style = Style::default().add_modifier(Modifier::BOLD);
        if task.status == Status::Done {
            title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
        }

        let card_text = vec![
            Line::from(Span::styled(truncate(&task.title, width), title_style)),
            Line::from(truncate(task.description.as_deref().unwrap_or(""), width)),
            Line::from(Span::styled(
                format_age(task, now_ms),
                Style::default().fg(Color::Gray),
            )),
        ];

        let card_block = Paragraph::new(card_text)
            .block(Block::default().borders(Borders::ALL))
            .style(style)
            .wrap(Wrap { trim: true });

        f.render_widget(card_block, area);
    }

    /// Render an input field with a cursor marker when active.
    fn render_input(&self, f: &mut Frame, area: Rect, field: &InputField, label: &str) {
        let border_style = if field.active {
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut shown = field.value.clone();
        if field.active {
            let byte_idx = shown
                .char_indices()
                .nth(field.cursor)
                .map(|(i, _)| i)
                .unwrap_or(shown.len());
            shown.insert(byte_idx, '▏');
        }

        let widget = Paragraph::new(shown).block(
            Block::default()
                .borders(Borders::ALL)
                .title(label)
                .border_style(border_style),
        );
        f.render_widget(widget, area);
    }

    /// Render the add-task modal form.
    fn render_task_form(&self, f: &mut Frame) {
        let popup_area = centered_rect(50, 40, f.area());
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Add Task (Enter: save, Tab: next field, Esc: cancel)")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(GOLD));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        self.render_input(f, chunks[0], &self.task_form.title, "Title (required)");
        self.render_input(f, chunks[1], &self.task_form.description, "Description");
    }

    /// Render the new-project input popup.
    fn render_new_project(&self, f: &mut Frame) {
        let popup_area = centered_rect(40, 20, f.area());
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("New Project (Enter: create, Esc: cancel)")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(DARK_PURPLE));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(inner);

        self.render_input(f, chunks[0], &self.project_input, "Title");
    }

    /// Render a yes/no confirmation popup.
    fn render_confirm(&self, f: &mut Frame, for_task: bool) {
        let message = if for_task {
            self.selected_task()
                .map(|t| format!("Delete task '{}'?", truncate(&t.title, 32)))
                .unwrap_or_default()
        } else {
            self.project_under_cursor()
                .map(|p| {
                    let count = self.store.tasks_for_project(&p.project_id).len();
                    format!(
                        "Delete project '{}' and its {} task(s)?",
                        truncate(&p.title, 24),
                        count
                    )
                })
                .unwrap_or_default()
        };

        let popup_area = centered_rect(40, 20, f.area());
        f.render_widget(Clear, popup_area);

        let text = vec![
            Line::from(message),
            Line::from(""),
            Line::from("y: confirm   n: cancel"),
        ];
        let popup = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Confirm")
                    .border_style(Style::default().fg(Color::Red)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(popup, popup_area);
    }

    /// Render the help popup.
    fn render_help(&self, f: &mut Frame) {
        let popup_area = centered_rect(50, 60, f.area());
        f.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("Tab          switch focus: projects / board"),
            Line::from("Arrows       navigate projects, columns, cards"),
            Line::from("Enter        select the highlighted project"),
            Line::from("Ctrl+←/→     move the selected card between columns"),
            Line::from("a            add a task to the current project"),
            Line::from("d            delete the selected task"),
            Line::from("n            new project"),
            Line::from("x            delete the highlighted project"),
            Line::from("h / ?        this help"),
            Line::from("q / Esc      quit"),
            Line::from(""),
            Line::from("Press any key to close."),
        ];

        let popup = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_alignment(Alignment::Center),
        );
        f.render_widget(popup, popup_area);
    }

    /// Render the status bar.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            format!(
                "Tasks: {} | a: Add | d: Delete | Ctrl+←/→: Move | n: New project | h: Help | q: Quit",
                self.columns.total()
            )
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(DARK_PURPLE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
            .split(chunks[1]);

        self.render_projects(f, panels[0]);
        self.render_board(f, panels[1]);
        self.render_status_bar(f, chunks[2]);

        match self.state {
            AppState::AddTask => self.render_task_form(f),
            AppState::NewProject => self.render_new_project(f),
            AppState::ConfirmDeleteTask => self.render_confirm(f, true),
            AppState::ConfirmDeleteProject => self.render_confirm(f, false),
            AppState::Help => self.render_help(f),
            AppState::Board => {}
        }
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn app_with_board() -> (TempDir, BoardApp) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");

        let mut store = Store::default();
        // Hand-built ids so creation order is deterministic in tests.
        let home = Project {
            project_id: "01ARZ3NDEKTSV4RRFFQ69G5FAA".into(),
            title: "Home".into(),
        };
        let work = Project {
            project_id: "01BRZ3NDEKTSV4RRFFQ69G5FAA".into(),
            title: "Work".into(),
        };
        store.add_project(home.clone()).unwrap();
        store.add_project(work).unwrap();
        store
            .add_task(Task::new(&home.project_id, "Buy milk", None))
            .unwrap();
        store.save(&path).unwrap();

        let app = BoardApp::new(&path).unwrap();
        (dir, app)
    }

    #[test]
    fn test_new_app_selects_first_project_and_loads_its_tasks() {
        let (_dir, app) = app_with_board();
        let first = app.projects[0].project_id.clone();
        assert_eq!(app.session.current(), Some(first.as_str()));
        assert_eq!(app.columns.total(), app.tasks.len());
    }

    #[test]
    fn test_new_app_with_no_projects_has_no_selection() {
        let dir = TempDir::new().unwrap();
        let app = BoardApp::new(&dir.path().join("board.json")).unwrap();
        assert_eq!(app.session.current(), None);
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn test_add_task_with_empty_title_persists_nothing() {
        let (_dir, mut app) = app_with_board();
        let before = app.store.tasks.len();

        app.state = AppState::AddTask;
        app.add_task_from_form();

        assert_eq!(app.store.tasks.len(), before);
        assert_eq!(app.state, AppState::Board);
        assert!(app.task_form.title.value.is_empty());
        let reloaded = Store::load(&app.store_path).unwrap();
        assert_eq!(reloaded.tasks.len(), before);
    }

    #[test]
    fn test_add_task_from_form_commits_to_disk() {
        let (_dir, mut app) = app_with_board();
        for c in "Mow lawn".chars() {
            app.task_form.title.handle_char(c);
        }
        app.add_task_from_form();

        let reloaded = Store::load(&app.store_path).unwrap();
        assert!(reloaded.tasks.iter().any(|t| t.title == "Mow lawn"));
        assert_eq!(app.tasks.len(), 2);
    }

    #[test]
    fn test_move_card_commits_and_follows_selection() {
        let (_dir, mut app) = app_with_board();
        app.selected_column = 0;
        app.selected_card = 0;
        app.move_card(true);

        assert_eq!(app.selected_column, 1);
        let reloaded = Store::load(&app.store_path).unwrap();
        assert_eq!(reloaded.tasks[0].status, Status::Doing);
        assert_eq!(app.columns.doing.len(), 1);
        assert!(app.columns.todo.is_empty());
    }

    #[test]
    fn test_move_card_off_the_edge_is_a_no_op() {
        let (_dir, mut app) = app_with_board();
        app.move_card(false); // already leftmost
        let reloaded = Store::load(&app.store_path).unwrap();
        assert_eq!(reloaded.tasks[0].status, Status::Todo);
    }

    #[test]
    fn test_delete_project_cascade_reselects_first_remaining() {
        let (_dir, mut app) = app_with_board();
        // Cursor on the current (first) project, which owns the task.
        app.project_list_state.select(Some(0));
        let deleted = app.projects[0].project_id.clone();
        let survivor = app.projects[1].project_id.clone();

        app.delete_project_under_cursor();

        assert_eq!(app.session.current(), Some(survivor.as_str()));
        let reloaded = Store::load(&app.store_path).unwrap();
        assert!(reloaded.get_project(&deleted).is_none());
        assert!(reloaded.tasks.is_empty());
    }

    #[test]
    fn test_render_survives_scroll_offset_past_column_end() {
        let (_dir, mut app) = app_with_board();
        let home = app.projects[0].project_id.clone();
        for title in ["Paint fence", "Fix tap"] {
            let mut task = Task::new(&home, title, None);
            task.status = Status::Doing;
            app.store.add_task(task).unwrap();
        }
        app.persist().unwrap();
        // A scroll offset deeper than the column, as left behind by a
        // longer task list, must not break the next draw.
        app.column_scroll_offsets[1] = 5;

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
    }

    #[test]
    fn test_switching_projects_clamps_all_scroll_offsets() {
        let (_dir, mut app) = app_with_board();
        app.column_scroll_offsets = [3, 5, 7];

        // The second project has no tasks at all.
        app.project_list_state.select(Some(1));
        app.select_project_under_cursor();

        assert_eq!(app.column_scroll_offsets, [0, 0, 0]);
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
    }

    #[test]
    fn test_selecting_other_project_swaps_task_list() {
        let (_dir, mut app) = app_with_board();
        app.project_list_state.select(Some(1));
        app.select_project_under_cursor();
        assert!(app.tasks.is_empty());

        app.project_list_state.select(Some(0));
        app.select_project_under_cursor();
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].title, "Buy milk");
    }
}
