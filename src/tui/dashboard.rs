//! Dashboard kanban board.
//!
//! Five status columns projected from the task store. A card is moved with a
//! keyboard drag: Space picks it up, arrows choose the destination column and
//! slot, Enter drops it and Esc cancels. Dropping in another column changes
//! the task's status; dropping within the same column only reorders the view.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::board::{BoardView, DragEnd, Location};
use crate::fields::Status;
use crate::task::Task;
use crate::tui::colors::{status_color, text_on, GOLD};
use crate::tui::utils::{centered_rect, wrap_words};
use crate::validation::DATE_FORMAT;
use crate::workspace::Workspace;

const CARD_HEIGHT: usize = 5;

/// A card in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    source: Location,
    target: Location,
}

pub struct DashboardScreen {
    view: BoardView,
    selected_column: usize,
    selected_card: usize,
    column_scroll_offsets: [usize; 5],
    drag: Option<Drag>,
    show_detail: bool,
}

impl DashboardScreen {
    pub fn new(ws: &Workspace) -> Self {
        DashboardScreen {
            view: BoardView::new(&ws.tasks, None),
            selected_column: 0,
            selected_card: 0,
            column_scroll_offsets: [0; 5],
            drag: None,
            show_detail: false,
        }
    }

    /// Re-project after the task collection changed elsewhere.
    pub fn refresh(&mut self, ws: &Workspace) {
        self.view.refresh(&ws.tasks);
        self.drag = None;
        self.clamp_selection();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The task detail popup is open and takes every key until closed.
    pub fn has_popup(&self) -> bool {
        self.show_detail
    }

    fn selected_status(&self) -> Status {
        Status::ALL[self.selected_column]
    }

    fn column_len(&self, status: Status) -> usize {
        self.view.board().column(status).items.len()
    }

    fn selected_task(&self) -> Option<&Task> {
        self.view.board().column(self.selected_status()).items.get(self.selected_card)
    }

    fn clamp_selection(&mut self) {
        let len = self.column_len(self.selected_status());
        if len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= len {
            self.selected_card = len - 1;
        }
    }

    fn select(&mut self, location: Location) {
        self.selected_column = location.column.column_index();
        self.selected_card = location.index;
    }

    /// Largest destination slot in `status` for the card being dragged.
    fn max_target_index(&self, drag: &Drag, status: Status) -> usize {
        let len = self.column_len(status);
        if status == drag.source.column {
            len.saturating_sub(1)
        } else {
            len
        }
    }

    /// Handle a key. Returns a message for the status bar.
    pub fn handle_key(&mut self, key: KeyEvent, ws: &mut Workspace) -> Option<String> {
        if let Some(drag) = self.drag {
            return self.handle_drag_key(key, drag, ws);
        }
        if self.show_detail {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.show_detail = false;
            }
            return None;
        }

        match key.code {
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
                self.clamp_selection();
            }
            KeyCode::Right => {
                if self.selected_column + 1 < Status::ALL.len() {
                    self.selected_column += 1;
                }
                self.clamp_selection();
            }
            KeyCode::Up => {
                self.selected_card = self.selected_card.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_card + 1 < self.column_len(self.selected_status()) {
                    self.selected_card += 1;
                }
            }
            KeyCode::Char(' ') => {
                let title = self.selected_task()?.title.clone();
                let source = Location::new(self.selected_status(), self.selected_card);
                self.drag = Some(Drag { source, target: source });
                return Some(format!("Moving '{title}': arrows choose a slot, Enter drops, Esc cancels"));
            }
            KeyCode::Enter => {
                self.show_detail = self.selected_task().is_some();
            }
            KeyCode::Char('p') => {
                self.view.cycle_filter(ws.projects.list(), &ws.tasks);
                self.selected_card = 0;
                self.clamp_selection();
                return Some(format!("Showing {}", self.filter_label(ws)));
            }
            _ => {}
        }
        None
    }

    fn handle_drag_key(&mut self, key: KeyEvent, mut drag: Drag, ws: &mut Workspace) -> Option<String> {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                let col = drag.target.column.column_index();
                let next = match key.code {
                    KeyCode::Left => col.checked_sub(1),
                    _ => Some(col + 1).filter(|c| *c < Status::ALL.len()),
                };
                if let Some(next) = next {
                    let status = Status::ALL[next];
                    let index = drag.target.index.min(self.max_target_index(&drag, status));
                    drag.target = Location::new(status, index);
                }
            }
            KeyCode::Up => drag.target.index = drag.target.index.saturating_sub(1),
            KeyCode::Down => {
                if drag.target.index < self.max_target_index(&drag, drag.target.column) {
                    drag.target.index += 1;
                }
            }
            KeyCode::Enter => {
                self.drag = None;
                let task_id = self.view.board().column(drag.source.column).items.get(drag.source.index)?.id.clone();
                let end = DragEnd { source: drag.source, destination: Some(drag.target) };
                if !self.view.drag_end(&end, &mut ws.tasks) {
                    return None;
                }
                if let Some(location) = self.view.board().locate(&task_id) {
                    self.select(location);
                }
                return Some(format!("Moved to {}", drag.target.column.label()));
            }
            KeyCode::Esc => {
                self.drag = None;
                let end = DragEnd { source: drag.source, destination: None };
                self.view.drag_end(&end, &mut ws.tasks);
                return Some("Move cancelled".to_string());
            }
            _ => {}
        }
        self.drag = Some(drag);
        None
    }

    fn filter_label(&self, ws: &Workspace) -> String {
        match self.view.filter() {
            None => "All Projects".to_string(),
            Some(id) => ws.projects.get(id).map_or_else(|| format!("project {id}"), |p| p.title.clone()),
        }
    }

    pub fn help(&self) -> &'static str {
        if self.drag.is_some() {
            "Arrows: choose slot | Enter: drop | Esc: cancel"
        } else {
            "Arrows: select | Space: move card | Enter: details | p: project filter | 1-4: screens | q: quit"
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, ws: &Workspace) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("TASK BOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("Project: {}  Tasks: {}", self.filter_label(ws), self.view.board().len()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 5); 5])
            .split(chunks[1]);
        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, i);
        }

        if self.show_detail {
            self.render_detail(f, area);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, column_index: usize) {
        let status = Status::ALL[column_index];
        let is_selected = column_index == self.selected_column;
        let is_target = self.drag.is_some_and(|d| d.target.column == status);
        let accent = status_color(status);

        let border_style = if is_target {
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
        } else if is_selected && self.drag.is_none() {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let count = self.column_len(status);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({count})", status.label()))
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let items = &self.view.board().column(status).items;
        let mut slots: Vec<Option<(usize, &Task)>> = items.iter().enumerate().map(Some).collect();
        let mut marker_at = None;
        if let Some(d) = self.drag.filter(|d| d.target.column == status) {
            // Same-column indices count from the list without the lifted card.
            let at = if d.source.column == status && d.target.index >= d.source.index {
                d.target.index + 1
            } else {
                d.target.index
            };
            let at = at.min(slots.len());
            slots.insert(at, None);
            marker_at = Some(at);
        }

        let visible_cards = (inner.height as usize / CARD_HEIGHT).max(1);
        let focus = match self.drag {
            Some(_) => marker_at,
            None if is_selected => Some(self.selected_card),
            None => None,
        };
        // Keep the focused slot in view.
        let offset = &mut self.column_scroll_offsets[column_index];
        if let Some(focus) = focus {
            if focus < *offset {
                *offset = focus;
            } else if focus >= *offset + visible_cards {
                *offset = focus + 1 - visible_cards;
            }
        }
        let offset = (*offset).min(slots.len());

        let mut rendered = 0;
        for (row, slot) in slots.iter().skip(offset).take(visible_cards).enumerate() {
            if (row + 1) * CARD_HEIGHT > inner.height as usize {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + (row * CARD_HEIGHT) as u16,
                width: inner.width,
                height: CARD_HEIGHT as u16,
            };
            match slot {
                None => {
                    let marker = Paragraph::new("drop here")
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(GOLD)));
                    f.render_widget(marker, card_area);
                }
                Some((index, task)) => {
                    let lifted = self.drag.is_some_and(|d| d.source == Location::new(status, *index));
                    let selected = self.drag.is_none() && is_selected && *index == self.selected_card;
                    render_card(f, card_area, task, accent, selected, lifted);
                }
            }
            rendered += 1;
        }
        let remaining = slots.len() - offset - rendered;

        if offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{offset} above")).style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { x: inner.x, y: inner.y, width: inner.width, height: 1 });
        }
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{remaining} below")).style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { x: inner.x, y: inner.y + inner.height - 1, width: inner.width, height: 1 });
        }
    }

    fn render_detail(&self, f: &mut Frame, area: Rect) {
        let Some(task) = self.selected_task() else { return };
        let popup = centered_rect(70, 60, area);
        f.render_widget(Clear, popup);

        let assignees = task.assignee_names();
        let lines = vec![
            Line::from(Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(format!("Status:    {}", task.status.label())),
            Line::from(format!("Project:   {}", task.project.title)),
            Line::from(format!("ETA:       {}", task.eta.format(DATE_FORMAT))),
            Line::from(format!("Assigned:  {}", if assignees.is_empty() { "-" } else { &assignees })),
            Line::from(format!("Image:     {}", if task.image_url.is_empty() { "-" } else { "attached" })),
            Line::from(""),
            Line::from("Description:"),
            Line::from(task.description.clone()),
        ];
        let accent = status_color(task.status);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Task #{} (Enter to close)", task.id))
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
        f.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }).style(Style::default().bg(Color::Black)),
            popup,
        );
    }
}

fn render_card(f: &mut Frame, area: Rect, task: &Task, accent: Color, selected: bool, lifted: bool) {
    let style = if lifted {
        Style::default().fg(Color::DarkGray)
    } else if selected {
        Style::default().bg(accent).fg(text_on(accent)).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    };

    let width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = wrap_words(&task.title, width, 1).into_iter().map(Line::from).collect();
    let assignees = task.assignee_names();
    lines.push(Line::from(if assignees.is_empty() { "-".to_string() } else { assignees }));
    lines.push(Line::from(format!("ETA {}", task.eta.format(DATE_FORMAT))));

    let card = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .style(style)
        .wrap(Wrap { trim: true });
    f.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::Record;
    use crate::task::tests::{sample_project, sample_task};
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn workspace(tasks: &[Task]) -> Workspace {
        let storage = MemoryStorage::new();
        storage.insert_raw(Task::STORAGE_KEY, &serde_json::to_string(tasks).unwrap());
        let projects = vec![sample_project("p1"), sample_project("p2")];
        storage.insert_raw("projects", &serde_json::to_string(&projects).unwrap());
        Workspace::load(storage)
    }

    #[test]
    fn test_keyboard_drag_changes_status() {
        let mut ws = workspace(&[sample_task("1", "p1", Status::Todo), sample_task("2", "p1", Status::Todo)]);
        let mut screen = DashboardScreen::new(&ws);

        assert!(screen.handle_key(key(KeyCode::Char(' ')), &mut ws).is_some());
        assert!(screen.is_dragging());
        screen.handle_key(key(KeyCode::Right), &mut ws);
        let msg = screen.handle_key(key(KeyCode::Enter), &mut ws);

        assert_eq!(msg.as_deref(), Some("Moved to In Progress"));
        assert_eq!(ws.tasks.get("1").unwrap().status, Status::InProgress);
        assert_eq!(screen.selected_status(), Status::InProgress);
        assert_eq!(screen.selected_task().unwrap().id, "1");
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut ws = workspace(&[sample_task("1", "p1", Status::Todo)]);
        let mut screen = DashboardScreen::new(&ws);
        screen.handle_key(key(KeyCode::Char(' ')), &mut ws);
        screen.handle_key(key(KeyCode::Right), &mut ws);
        screen.handle_key(key(KeyCode::Right), &mut ws);
        assert_eq!(screen.handle_key(key(KeyCode::Esc), &mut ws).as_deref(), Some("Move cancelled"));
        assert!(!screen.is_dragging());
        assert_eq!(ws.tasks.get("1").unwrap().status, Status::Todo);
    }

    #[test]
    fn test_pick_up_on_empty_column_does_nothing() {
        let mut ws = workspace(&[sample_task("1", "p1", Status::Todo)]);
        let mut screen = DashboardScreen::new(&ws);
        screen.handle_key(key(KeyCode::Right), &mut ws);
        assert!(screen.handle_key(key(KeyCode::Char(' ')), &mut ws).is_none());
        assert!(!screen.is_dragging());
    }

    #[test]
    fn test_drag_target_index_is_clamped() {
        let mut ws = workspace(&[
            sample_task("1", "p1", Status::Todo),
            sample_task("2", "p1", Status::Todo),
            sample_task("3", "p1", Status::InProgress),
        ]);
        let mut screen = DashboardScreen::new(&ws);
        screen.handle_key(key(KeyCode::Char(' ')), &mut ws);
        for _ in 0..5 {
            screen.handle_key(key(KeyCode::Down), &mut ws);
        }
        // Same column: last slot is len - 1.
        assert_eq!(screen.drag.unwrap().target.index, 1);
        screen.handle_key(key(KeyCode::Right), &mut ws);
        assert_eq!(screen.drag.unwrap().target, Location::new(Status::InProgress, 1));
        screen.handle_key(key(KeyCode::Down), &mut ws);
        assert_eq!(screen.drag.unwrap().target.index, 1);
    }

    #[test]
    fn test_project_filter_cycles() {
        let mut ws = workspace(&[sample_task("1", "p1", Status::Todo), sample_task("2", "p2", Status::Todo)]);
        let mut screen = DashboardScreen::new(&ws);
        let msg = screen.handle_key(key(KeyCode::Char('p')), &mut ws);
        assert_eq!(msg.as_deref(), Some("Showing Project p1"));
        assert_eq!(screen.view.board().len(), 1);
        screen.handle_key(key(KeyCode::Char('p')), &mut ws);
        screen.handle_key(key(KeyCode::Char('p')), &mut ws);
        assert_eq!(screen.view.filter(), None);
    }

    #[test]
    fn test_render_shows_column_labels() {
        let ws = workspace(&[sample_task("1", "p1", Status::NeedTest)]);
        let mut screen = DashboardScreen::new(&ws);
        let mut terminal = Terminal::new(TestBackend::new(150, 30)).unwrap();
        terminal.draw(|f| screen.render(f, f.area(), &ws)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        for status in Status::ALL {
            assert!(text.contains(status.label()), "missing {}", status.label());
        }
        assert!(text.contains("Task 1"));
    }
}
