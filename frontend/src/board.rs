//! Column derivation and the drag lifecycle.
//!
//! Columns are recomputed from the flat task list on every render; nothing
//! here is stored. A [`DragSession`] turns pointer (or keyboard) gestures into
//! the two store operations the board needs: a same-column reorder while
//! hovering, and a cross-column move on drop.

use crate::models::{DragEndData, Task, TaskStatus};

/// Pointer travel needed before a press becomes a drag.
pub const ACTIVATION_DISTANCE: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn title(&self) -> &'static str {
        self.status.label()
    }

    pub fn position(&self, task: &Task) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task.id)
    }
}

/// Split the list into To Do / In Progress / Done, keeping list order.
pub fn columns(tasks: &[Task]) -> [Column; 3] {
    TaskStatus::ALL.map(|status| Column {
        status,
        tasks: tasks.iter().filter(|t| t.status == status).cloned().collect(),
    })
}

/// Copy of `items` with the element at `from` moved to `to`. Out-of-range
/// indices leave the order unchanged.
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    if from >= moved.len() || to >= moved.len() {
        return moved;
    }
    let item = moved.remove(from);
    moved.insert(to, item);
    moved
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// What the dragged card is currently over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Card(Task),
    Column(TaskStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    Reorder { status: TaskStatus, new_order: Vec<Task> },
    Move(DragEndData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    task: Task,
    origin: Point,
    active: bool,
}

impl DragSession {
    /// Pointer pressed on a card. Not a drag until it travels far enough.
    pub fn press(task: Task, origin: Point) -> Self {
        DragSession {
            task,
            origin,
            active: false,
        }
    }

    /// Keyboard pick-up: active immediately.
    pub fn pick_up(task: Task) -> Self {
        DragSession {
            task,
            origin: Point::default(),
            active: true,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feed a pointer position. Returns whether the drag is active.
    pub fn pointer_moved(&mut self, to: Point) -> bool {
        if !self.active && self.origin.distance_to(to) >= ACTIVATION_DISTANCE {
            self.active = true;
        }
        self.active
    }

    /// Hovering another card of the same column reorders that column.
    pub fn drag_over(&self, target: &DropTarget, columns: &[Column; 3]) -> Option<DragEffect> {
        if !self.active {
            return None;
        }
        let DropTarget::Card(over) = target else {
            return None;
        };
        if over.id == self.task.id || over.status != self.task.status {
            return None;
        }

        let column = columns.iter().find(|c| c.status == self.task.status)?;
        let from = column.position(&self.task)?;
        let to = column.position(over)?;
        Some(DragEffect::Reorder {
            status: self.task.status,
            new_order: array_move(&column.tasks, from, to),
        })
    }

    /// Release. Dropping on a card or empty area of another column moves the
    /// task there; anything else (itself, its own column, nowhere, or a press
    /// that never activated) does nothing.
    pub fn drop_on(self, target: Option<&DropTarget>) -> Option<DragEffect> {
        if !self.active {
            return None;
        }
        let destination = match target? {
            DropTarget::Card(over) if over.id == self.task.id => return None,
            DropTarget::Card(over) => over.status,
            DropTarget::Column(status) => *status,
        };
        if destination == self.task.status {
            return None;
        }
        Some(DragEffect::Move(DragEndData {
            task: self.task,
            destination,
        }))
    }
}
