//! Main application logic for the terminal user interface.
//!
//! `App` owns the navigation state: which route is showing, the dashboard
//! board, the list tables for employees, projects and tasks, and the popup
//! form or confirmation dialog on top of them. All changes go through the
//! workspace stores, so they are persisted as they happen.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};
use tracing::{debug, info};

use crate::forms::{submit_employee, submit_project, submit_task, FormMode};
use crate::routes::Route;
use crate::tui::{
    colors::{status_color, text_on, DARK_RED, ERROR_RED, GOLD, NAVY},
    dashboard::DashboardScreen,
    enums::{AppState, EntityKind},
    form::{EntityForm, FieldEditor},
    utils::centered_rect,
};
use crate::validation::DATE_FORMAT;
use crate::workspace::Workspace;

/// Pending delete awaiting confirmation.
struct PendingDelete {
    kind: EntityKind,
    id: String,
    label: String,
}

/// Main application state for the terminal user interface.
pub struct App<'a> {
    ws: &'a mut Workspace,
    route: Route,
    state: AppState,
    dashboard: DashboardScreen,
    table_state: TableState,
    form: Option<EntityForm>,
    confirm: Option<PendingDelete>,
    status_message: String,
}

impl<'a> App<'a> {
    pub fn new(ws: &'a mut Workspace, route: Route) -> Self {
        let dashboard = DashboardScreen::new(ws);
        let mut app = App {
            ws,
            route,
            state: AppState::Browse,
            dashboard,
            table_state: TableState::default(),
            form: None,
            confirm: None,
            status_message: String::new(),
        };
        app.navigate(route);
        app
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Switch screens. The board is rebuilt since tasks may have changed.
    fn navigate(&mut self, route: Route) {
        debug!(route = route.path(), "navigate");
        self.route = route;
        self.state = AppState::Browse;
        self.form = None;
        self.confirm = None;
        self.table_state.select(if self.row_count() > 0 { Some(0) } else { None });
        if route == Route::Dashboard {
            self.dashboard.refresh(self.ws);
        }
    }

    fn list_kind(&self) -> Option<EntityKind> {
        match self.route {
            Route::Dashboard => None,
            Route::Employees => Some(EntityKind::Employee),
            Route::Projects => Some(EntityKind::Project),
            Route::Tasks => Some(EntityKind::Task),
        }
    }

    fn row_count(&self) -> usize {
        match self.list_kind() {
            Some(EntityKind::Employee) => self.ws.employees.len(),
            Some(EntityKind::Project) => self.ws.projects.len(),
            Some(EntityKind::Task) => self.ws.tasks.len(),
            None => 0,
        }
    }

    /// Identifier and display label of the highlighted row.
    fn selected_row(&self) -> Option<(String, String)> {
        let i = self.table_state.selected()?;
        match self.list_kind()? {
            EntityKind::Employee => self.ws.employees.list().get(i).map(|e| (e.id.clone(), e.name.clone())),
            EntityKind::Project => self.ws.projects.list().get(i).map(|p| (p.id.clone(), p.title.clone())),
            EntityKind::Task => self.ws.tasks.list().get(i).map(|t| (t.id.clone(), t.title.clone())),
        }
    }

    fn clamp_table(&mut self) {
        let len = self.row_count();
        let selected = match self.table_state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    fn open_form(&mut self, edit: bool) {
        let Some(kind) = self.list_kind() else { return };
        let id = if edit {
            match self.selected_row() {
                Some((id, _)) => Some(id),
                None => return,
            }
        } else {
            None
        };
        let id = id.as_deref();
        let form = match kind {
            EntityKind::Employee => EntityForm::employee(id.and_then(|id| self.ws.employees.get(id))),
            EntityKind::Project => {
                EntityForm::project(self.ws.employees.list(), id.and_then(|id| self.ws.projects.get(id)))
            }
            EntityKind::Task => EntityForm::task(self.ws.projects.list(), id.and_then(|id| self.ws.tasks.get(id))),
        };
        self.form = Some(form);
        self.state = AppState::Form;
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else { return };
        let values = form.values();
        let result = match form.kind {
            EntityKind::Employee => submit_employee(self.ws, &form.mode, &values),
            EntityKind::Project => submit_project(self.ws, &form.mode, &values),
            EntityKind::Task => submit_task(self.ws, &form.mode, &values),
        };
        match result {
            Ok(id) => {
                let verb = if form.mode == FormMode::Create { "added" } else { "updated" };
                let msg = format!("{} {id} {verb}", form.kind.label());
                self.form = None;
                self.state = AppState::Browse;
                self.clamp_table();
                self.set_status_message(msg);
            }
            Err(e) => {
                debug!(error = %e, "form rejected");
                form.set_error(&e);
                self.set_status_message(format!("Error: {e}"));
            }
        }
    }

    fn delete_confirmed(&mut self) {
        let Some(pending) = self.confirm.take() else { return };
        let removed = match pending.kind {
            EntityKind::Employee => self.ws.employees.delete(&pending.id),
            EntityKind::Project => self.ws.delete_project(&pending.id),
            EntityKind::Task => self.ws.tasks.delete(&pending.id),
        };
        if removed {
            info!(kind = pending.kind.label(), id = %pending.id, "deleted from ui");
            self.set_status_message(format!("Deleted {} '{}'", pending.kind.label().to_lowercase(), pending.label));
        }
        self.state = AppState::Browse;
        self.clamp_table();
    }

    /// Handle one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.status_message.clear();
        match self.state {
            AppState::Form => self.handle_form_key(key),
            AppState::Confirm => self.handle_confirm_key(key),
            AppState::Help => {
                self.state = AppState::Browse;
                false
            }
            AppState::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
        let captured = self.route == Route::Dashboard && (self.dashboard.is_dragging() || self.dashboard.has_popup());
        if !captured {
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
                KeyCode::Char('q') | KeyCode::Esc => return true,
                KeyCode::Char('h') | KeyCode::Char('?') => {
                    self.state = AppState::Help;
                    return false;
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    if let Some(route) = Route::from_digit(c) {
                        self.navigate(route);
                    }
                    return false;
                }
                _ => {}
            }
        }

        if self.route == Route::Dashboard {
            if let Some(msg) = self.dashboard.handle_key(key, self.ws) {
                self.set_status_message(msg);
            }
            return false;
        }

        match key.code {
            KeyCode::Up => {
                let i = self.table_state.selected().unwrap_or(0);
                self.table_state.select(Some(i.saturating_sub(1)));
                self.clamp_table();
            }
            KeyCode::Down => {
                let i = self.table_state.selected().map_or(0, |i| i + 1);
                self.table_state.select(Some(i));
                self.clamp_table();
            }
            KeyCode::Char('a') => self.open_form(false),
            KeyCode::Char('e') | KeyCode::Enter => self.open_form(true),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let (Some(kind), Some((id, label))) = (self.list_kind(), self.selected_row()) {
                    self.confirm = Some(PendingDelete { kind, id, label });
                    self.state = AppState::Confirm;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> bool {
        let Some(form) = self.form.as_mut() else {
            self.state = AppState::Browse;
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                self.state = AppState::Browse;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => form.handle_char(c),
            _ => {}
        }
        false
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.delete_confirmed(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm = None;
                self.state = AppState::Browse;
            }
            _ => {}
        }
        false
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(false)
    }

    fn render_nav(&self, f: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Route::ALL
            .iter()
            .enumerate()
            .map(|(i, r)| Line::from(format!("{} {}", i + 1, r.title())))
            .collect();
        let selected = Route::ALL.iter().position(|r| *r == self.route).unwrap_or(0);
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(Span::styled(
                " TEAM BOARD ",
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .select(selected)
            .style(Style::default().fg(Color::White))
            .highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, area);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let Some(kind) = self.list_kind() else { return };
        let (headers, widths, rows): (Vec<&str>, Vec<Constraint>, Vec<Row>) = match kind {
            EntityKind::Employee => (
                vec!["ID", "Name", "Position", "Email", "Image"],
                vec![
                    Constraint::Length(14),
                    Constraint::Length(22),
                    Constraint::Length(18),
                    Constraint::Min(24),
                    Constraint::Length(6),
                ],
                self.ws
                    .employees
                    .list()
                    .iter()
                    .map(|e| {
                        Row::new(vec![
                            Cell::from(e.id.clone()),
                            Cell::from(e.name.clone()),
                            Cell::from(e.position.clone()),
                            Cell::from(e.email.clone()),
                            Cell::from(if e.image_url.is_empty() { "-" } else { "yes" }),
                        ])
                    })
                    .collect(),
            ),
            EntityKind::Project => (
                vec!["ID", "Title", "Start", "End", "Logo", "Team"],
                vec![
                    Constraint::Length(14),
                    Constraint::Length(24),
                    Constraint::Length(11),
                    Constraint::Length(11),
                    Constraint::Length(12),
                    Constraint::Min(20),
                ],
                self.ws
                    .projects
                    .list()
                    .iter()
                    .map(|p| {
                        let logo = match &p.logo_url {
                            None => "-",
                            Some(url) if self.ws.object_urls.resolve(url).is_some() => "yes",
                            Some(_) => "unavailable",
                        };
                        let team: Vec<&str> = p.assigned_employees.iter().map(|e| e.name.as_str()).collect();
                        Row::new(vec![
                            Cell::from(p.id.clone()),
                            Cell::from(p.title.clone()),
                            Cell::from(p.start_date.format(DATE_FORMAT).to_string()),
                            Cell::from(p.end_date.format(DATE_FORMAT).to_string()),
                            Cell::from(logo),
                            Cell::from(team.join(", ")),
                        ])
                    })
                    .collect(),
            ),
            EntityKind::Task => (
                vec!["ID", "Title", "Project", "Status", "ETA", "Assigned"],
                vec![
                    Constraint::Length(14),
                    Constraint::Length(26),
                    Constraint::Length(18),
                    Constraint::Length(14),
                    Constraint::Length(11),
                    Constraint::Min(20),
                ],
                self.ws
                    .tasks
                    .list()
                    .iter()
                    .map(|t| {
                        Row::new(vec![
                            Cell::from(t.id.clone()),
                            Cell::from(t.title.clone()),
                            Cell::from(t.project.title.clone()),
                            Cell::from(t.status.label()).style(Style::default().fg(status_color(t.status))),
                            Cell::from(t.eta.format(DATE_FORMAT).to_string()),
                            Cell::from(t.assignee_names()),
                        ])
                    })
                    .collect(),
            ),
        };

        let header = Row::new(
            headers
                .into_iter()
                .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(NAVY).fg(text_on(NAVY)))
        .height(1);
        let count = rows.len();
        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{}s ({count}) - a: add  e: edit  d: delete", kind.label())),
            )
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_form(&self, f: &mut Frame, area: Rect) {
        let Some(form) = &self.form else { return };
        let popup = centered_rect(70, 90, area);
        f.render_widget(Clear, popup);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} (Tab: next field  Enter: save  Esc: cancel)", form.title()))
            .border_style(Style::default().fg(GOLD));
        let inner = outer.inner(popup);
        f.render_widget(outer, popup);

        let mut constraints: Vec<Constraint> = form
            .fields
            .iter()
            .flat_map(|_| [Constraint::Length(3), Constraint::Length(1)])
            .collect();
        constraints.push(Constraint::Min(0));
        let chunks = Layout::default().direction(Direction::Vertical).constraints(constraints).split(inner);

        for (i, field) in form.fields.iter().enumerate() {
            let focused = i == form.current_field;
            let hint = match field.editor {
                FieldEditor::Choice { .. } => " (Left/Right)",
                FieldEditor::Multi { .. } => " (Left/Right, Space toggles)",
                _ => "",
            };
            let style = if focused { Style::default().fg(GOLD) } else { Style::default() };
            let input = Paragraph::new(field.display())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("{}{}", field.label, if focused { hint } else { "" }))
                        .border_style(style),
                )
                .wrap(Wrap { trim: false });
            f.render_widget(input, chunks[i * 2]);

            if let Some(err) = form.error_for(field.name) {
                f.render_widget(
                    Paragraph::new(err.to_string()).style(Style::default().fg(ERROR_RED)),
                    chunks[i * 2 + 1],
                );
            }

            if focused {
                if let FieldEditor::Text(input) | FieldEditor::File(input) = &field.editor {
                    let area = chunks[i * 2];
                    let x = area.x + 1 + input.cursor.min(area.width.saturating_sub(3) as usize) as u16;
                    f.set_cursor_position((x, area.y + 1));
                }
            }
        }

        if let Some(err) = form.error_for("") {
            let last = chunks[chunks.len() - 1];
            f.render_widget(Paragraph::new(err.to_string()).style(Style::default().fg(ERROR_RED)), last);
        }
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let Some(pending) = &self.confirm else { return };
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));
        let area = centered_rect(50, 25, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Are you sure you want to:", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(format!("Delete {} '{}'", pending.kind.label().to_lowercase(), pending.label)),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        f.render_widget(
            Paragraph::new(text).block(block).alignment(Alignment::Center).wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 60, area);
        f.render_widget(Clear, area);
        let lines = vec![
            Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("1-4        switch screen"),
            Line::from("q / Esc    quit"),
            Line::from(""),
            Line::from("Dashboard"),
            Line::from("  arrows   select card"),
            Line::from("  Space    pick up card, arrows choose slot"),
            Line::from("  Enter    drop card / show details"),
            Line::from("  Esc      cancel move"),
            Line::from("  p        cycle project filter"),
            Line::from(""),
            Line::from("Lists"),
            Line::from("  a / e / d  add, edit, delete"),
            Line::from(""),
            Line::from("Press any key to close"),
        ];
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help")),
            area,
        );
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match (self.state, self.route) {
                (AppState::Form, _) => "Tab/Shift-Tab: field | Enter: save | Esc: cancel".to_string(),
                (AppState::Confirm, _) => "y: confirm | n: cancel".to_string(),
                (AppState::Help, _) => "Help".to_string(),
                (AppState::Browse, Route::Dashboard) => self.dashboard.help().to_string(),
                (AppState::Browse, _) => {
                    format!("{} | Up/Down: select | a: add | e: edit | d: delete | h: help | q: quit", self.route.path())
                }
            }
        };
        let bg = if self.status_message.starts_with("Error") { DARK_RED } else { NAVY };
        f.render_widget(
            Paragraph::new(text).style(Style::default().bg(bg).fg(text_on(bg))).alignment(Alignment::Left),
            area,
        );
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_nav(f, chunks[0]);
        match self.route {
            Route::Dashboard => self.dashboard.render(f, chunks[1], self.ws),
            _ => self.render_table(f, chunks[1]),
        }
        match self.state {
            AppState::Form => self.render_form(f, chunks[1]),
            AppState::Confirm => self.render_confirm(f, chunks[1]),
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::Browse => {}
        }
        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
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
    use crate::fields::Status;
    use crate::forms::tests::image;
    use crate::storage::MemoryStorage;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_digit_keys_switch_routes() {
        let mut ws = Workspace::load(MemoryStorage::new());
        let mut app = App::new(&mut ws, Route::Dashboard);
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.route, Route::Projects);
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(app.route, Route::Projects);
        assert!(app.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn test_add_employee_through_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = image(dir.path(), "face.png");
        let mut ws = Workspace::load(MemoryStorage::new());
        {
            let mut app = App::new(&mut ws, Route::Employees);
            app.handle_key(key(KeyCode::Char('a')));
            assert_eq!(app.state, AppState::Form);

            // Submitting empty shows field errors and keeps the form open.
            app.handle_key(key(KeyCode::Enter));
            assert_eq!(app.state, AppState::Form);
            assert_eq!(app.form.as_ref().unwrap().error_for("name"), Some("Name is required"));

            type_text(&mut app, "Asha");
            app.handle_key(key(KeyCode::Tab));
            type_text(&mut app, "Engineer");
            app.handle_key(key(KeyCode::Tab));
            type_text(&mut app, "asha@x.io");
            app.handle_key(key(KeyCode::Tab));
            type_text(&mut app, &path.display().to_string());
            app.handle_key(key(KeyCode::Enter));
            assert_eq!(app.state, AppState::Browse);
            assert!(app.status_message.starts_with("Employee"));
        }
        assert_eq!(ws.employees.len(), 1);
        assert!(ws.employees.list()[0].image_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        use crate::store::Record;
        use crate::task::{tests::sample_task, Task};

        let storage = MemoryStorage::new();
        let tasks = vec![sample_task("1", "p1", Status::Todo)];
        storage.insert_raw(Task::STORAGE_KEY, &serde_json::to_string(&tasks).unwrap());
        let mut ws = Workspace::load(storage);
        {
            let mut app = App::new(&mut ws, Route::Tasks);
            app.handle_key(key(KeyCode::Char('d')));
            assert_eq!(app.state, AppState::Confirm);
            app.handle_key(key(KeyCode::Char('n')));
            assert_eq!(app.state, AppState::Browse);
            app.handle_key(key(KeyCode::Char('d')));
            app.handle_key(key(KeyCode::Char('y')));
        }
        assert!(ws.tasks.is_empty());
    }

    #[test]
    fn test_digits_are_typed_into_forms() {
        let mut ws = Workspace::load(MemoryStorage::new());
        let mut app = App::new(&mut ws, Route::Employees);
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "R2");
        assert_eq!(app.route, Route::Employees);
        assert_eq!(app.form.as_ref().unwrap().values().text_of("name"), "R2");
    }

    #[test]
    fn test_esc_closes_task_detail_without_quitting() {
        use crate::store::Record;
        use crate::task::{tests::sample_task, Task};

        let storage = MemoryStorage::new();
        let tasks = vec![sample_task("1", "p1", Status::Todo)];
        storage.insert_raw(Task::STORAGE_KEY, &serde_json::to_string(&tasks).unwrap());
        let mut ws = Workspace::load(storage);
        let mut app = App::new(&mut ws, Route::Dashboard);

        app.handle_key(key(KeyCode::Enter));
        assert!(app.dashboard.has_popup());
        assert!(!app.handle_key(key(KeyCode::Char('2'))));
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        assert_eq!(app.route, Route::Dashboard);

        assert!(!app.handle_key(key(KeyCode::Esc)));
        assert!(!app.dashboard.has_popup());
        assert!(app.handle_key(key(KeyCode::Esc)));
    }

    #[test]
    fn test_render_every_route() {
        let mut ws = Workspace::load(MemoryStorage::new());
        let mut app = App::new(&mut ws, Route::Dashboard);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        for route in Route::ALL {
            app.navigate(route);
            terminal.draw(|f| app.render(f)).unwrap();
        }
        app.handle_key(key(KeyCode::Char('a')));
        terminal.draw(|f| app.render(f)).unwrap();
    }
}
