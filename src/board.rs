//! Kanban board: tasks grouped into one column per status.
//!
//! A `Board` is derived from the task store and an optional project filter.
//! Moving a card is computed on copies of the affected columns; when the card
//! lands in a different column its new status is written back to the store.
//! Order inside a column is not stored anywhere, so the next projection
//! restores store order.

use tracing::{debug, info};

use crate::fields::Status;
use crate::project::Project;
use crate::store::Store;
use crate::task::{Task, TaskPatch};

/// One status column, cards in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub status: Status,
    pub items: Vec<Task>,
}

/// A position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub column: Status,
    pub index: usize,
}

impl Location {
    pub fn new(column: Status, index: usize) -> Self {
        Location { column, index }
    }
}

/// End of a drag: where the card came from and where it was dropped, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    pub source: Location,
    pub destination: Option<Location>,
}

/// Result of applying a drag to a board.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Nothing to do: no destination, same slot, or nothing at the source.
    Unchanged,
    /// Card moved within its column. Status untouched.
    Reordered(Board),
    /// Card moved to another column and now carries that column's status.
    Moved { board: Board, task_id: String, status: Status },
}

/// Tasks grouped by status, columns in [`Status::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    columns: Vec<Column>,
}

impl Board {
    /// Group `tasks` by status, keeping store order, optionally restricted to one project.
    pub fn project(tasks: &[Task], project_filter: Option<&str>) -> Board {
        let columns = Status::ALL
            .into_iter()
            .map(|status| Column {
                status,
                items: tasks
                    .iter()
                    .filter(|t| project_filter.map_or(true, |pid| t.project.id == pid))
                    .filter(|t| t.status == status)
                    .cloned()
                    .collect(),
            })
            .collect();
        Board { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, status: Status) -> &Column {
        &self.columns[status.column_index()]
    }

    /// Identifiers of the cards in a column, in order.
    pub fn ids(&self, status: Status) -> Vec<&str> {
        self.column(status).items.iter().map(|t| t.id.as_str()).collect()
    }

    /// Total number of cards.
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current position of a task.
    pub fn locate(&self, task_id: &str) -> Option<Location> {
        self.columns.iter().find_map(|c| {
            c.items
                .iter()
                .position(|t| t.id == task_id)
                .map(|index| Location::new(c.status, index))
        })
    }

    /// Apply a drag without touching any store.
    pub fn apply_drag(&self, drag: &DragEnd) -> DragOutcome {
        let Some(dest) = drag.destination else {
            return DragOutcome::Unchanged;
        };
        let source = drag.source;
        if source == dest {
            return DragOutcome::Unchanged;
        }

        let mut source_items = self.column(source.column).items.clone();
        if source.index >= source_items.len() {
            debug!(column = source.column.key(), index = source.index, "drag source out of range");
            return DragOutcome::Unchanged;
        }
        let mut moved = source_items.remove(source.index);

        let mut board = self.clone();
        if source.column == dest.column {
            let at = dest.index.min(source_items.len());
            source_items.insert(at, moved);
            board.columns[source.column.column_index()].items = source_items;
            return DragOutcome::Reordered(board);
        }

        moved.status = dest.column;
        let task_id = moved.id.clone();
        let mut dest_items = self.column(dest.column).items.clone();
        let at = dest.index.min(dest_items.len());
        dest_items.insert(at, moved);
        board.columns[source.column.column_index()].items = source_items;
        board.columns[dest.column.column_index()].items = dest_items;
        DragOutcome::Moved { board, task_id, status: dest.column }
    }
}

/// Apply a drag and write a status change back to the task store.
/// Returns the board to display until the next projection.
pub fn on_drag_end(board: &Board, drag: &DragEnd, tasks: &mut Store<Task>) -> Board {
    match board.apply_drag(drag) {
        DragOutcome::Unchanged => board.clone(),
        DragOutcome::Reordered(next) => next,
        DragOutcome::Moved { board: next, task_id, status } => {
            info!(%task_id, status = status.key(), "task moved");
            tasks.merge(&task_id, TaskPatch::status(status));
            next
        }
    }
}

/// Board plus the project filter it was projected with.
#[derive(Debug, Clone)]
pub struct BoardView {
    filter: Option<String>,
    board: Board,
}

impl BoardView {
    pub fn new(tasks: &Store<Task>, filter: Option<String>) -> Self {
        let board = Board::project(tasks.list(), filter.as_deref());
        BoardView { filter, board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Re-project from the store.
    pub fn refresh(&mut self, tasks: &Store<Task>) {
        self.board = Board::project(tasks.list(), self.filter.as_deref());
    }

    pub fn set_filter(&mut self, filter: Option<String>, tasks: &Store<Task>) {
        self.filter = filter;
        self.refresh(tasks);
    }

    /// Step the filter through "all projects" then each project in store order.
    pub fn cycle_filter(&mut self, projects: &[Project], tasks: &Store<Task>) {
        let next = match &self.filter {
            None => projects.first().map(|p| p.id.clone()),
            Some(current) => {
                let pos = projects.iter().position(|p| &p.id == current);
                pos.and_then(|i| projects.get(i + 1)).map(|p| p.id.clone())
            }
        };
        self.set_filter(next, tasks);
    }

    /// Apply a drag. A status change counts as a change to the task collection,
    /// so the board is projected again and any in-column ordering is dropped.
    pub fn drag_end(&mut self, drag: &DragEnd, tasks: &mut Store<Task>) -> bool {
        match self.board.apply_drag(drag) {
            DragOutcome::Unchanged => false,
            DragOutcome::Reordered(next) => {
                self.board = next;
                true
            }
            DragOutcome::Moved { .. } => {
                self.board = on_drag_end(&self.board, drag, tasks);
                self.refresh(tasks);
                true
            }
        }
    }
}
