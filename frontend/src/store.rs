//! Client-side task state.
//!
//! [`TaskStore`] mirrors the server's task list and reconciles it after each
//! call: pessimistically (apply after the server accepts) for add, update and
//! delete; optimistically for moves, which are rolled back on failure;
//! locally only for reorders.
//!
//! The container is explicit: build one with [`TaskStore::new`], load it with
//! [`TaskStore::init`], and tear it down with [`TaskStore::dispose`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::{ApiError, TaskApi};
use crate::models::{CreateTaskPayload, DragEndData, Task, TaskId, TaskStatus, UpdateTaskPayload};

pub const FETCH_FAILED: &str = "Failed to fetch tasks. Please try again later.";
pub const ADD_FAILED: &str = "Failed to add task. Please try again later.";
pub const UPDATE_FAILED: &str = "Failed to update task. Please try again later.";
pub const DELETE_FAILED: &str = "Failed to delete task. Please try again later.";
pub const MOVE_FAILED: &str = "Failed to move task. Please try again later.";

/// Point-in-time copy of the store's state, for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub tasks: Vec<Task>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl BoardSnapshot {
    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.status == status).cloned().collect()
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Ready,
    Disposed,
}

struct Inner {
    board: BoardSnapshot,
    lifecycle: Lifecycle,
}

pub struct TaskStore<A> {
    api: A,
    inner: Mutex<Inner>,
}

impl<A: TaskApi> TaskStore<A> {
    pub fn new(api: A) -> Self {
        TaskStore {
            api,
            inner: Mutex::new(Inner {
                board: BoardSnapshot::default(),
                lifecycle: Lifecycle::Created,
            }),
        }
    }

    // The lock is only ever taken for synchronous sections, never across an
    // await, so a poisoned guard still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock().lifecycle
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.lock().board.clone()
    }

    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.lock().board.tasks_by_status(status)
    }

    pub fn clear_error(&self) {
        self.lock().board.error = None;
    }

    /// Load the task list. Only the first call does anything.
    pub async fn init(&self) {
        {
            let mut inner = self.lock();
            if inner.lifecycle != Lifecycle::Created {
                return;
            }
            inner.lifecycle = Lifecycle::Ready;
        }
        tracing::debug!("task store initialised");
        self.fetch_tasks().await;
    }

    /// Drop all state. Later calls are ignored, and responses still in flight
    /// are discarded.
    pub fn dispose(&self) {
        let mut inner = self.lock();
        inner.lifecycle = Lifecycle::Disposed;
        inner.board = BoardSnapshot::default();
        tracing::debug!("task store disposed");
    }

    /// Flag the start of a network call. Returns false once disposed.
    fn begin(&self, op: &'static str) -> bool {
        let mut inner = self.lock();
        if inner.lifecycle == Lifecycle::Disposed {
            tracing::debug!(op, "ignoring call on disposed task store");
            return false;
        }
        inner.board.is_loading = true;
        inner.board.error = None;
        true
    }

    fn settle<T>(
        &self,
        op: &'static str,
        result: Result<T, ApiError>,
        message: &'static str,
        reconcile: impl FnOnce(&mut Vec<Task>, T),
    ) {
        let mut inner = self.lock();
        if inner.lifecycle == Lifecycle::Disposed {
            return;
        }
        inner.board.is_loading = false;
        match result {
            Ok(value) => reconcile(&mut inner.board.tasks, value),
            Err(e) => {
                tracing::warn!(op, error = %e, "task operation failed");
                inner.board.error = Some(message.to_string());
            }
        }
    }

    pub async fn fetch_tasks(&self) {
        if !self.begin("fetch_tasks") {
            return;
        }
        let result = self.api.fetch_tasks().await;
        self.settle("fetch_tasks", result, FETCH_FAILED, |tasks, fetched| {
            tracing::debug!(count = fetched.len(), "tasks fetched");
            *tasks = fetched;
        });
    }

    pub async fn add_task(&self, payload: CreateTaskPayload) {
        if !self.begin("add_task") {
            return;
        }
        let result = self.api.create_task(&payload).await;
        self.settle("add_task", result, ADD_FAILED, |tasks, created| tasks.push(created));
    }

    /// Merges the request payload (not the server's echo) into local state.
    pub async fn update_task(&self, payload: UpdateTaskPayload) {
        if !self.begin("update_task") {
            return;
        }
        let result = self.api.update_task(&payload).await;
        self.settle("update_task", result, UPDATE_FAILED, |tasks, _| {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == payload.id) {
                payload.merge_into(task);
            }
        });
    }

    pub async fn delete_task(&self, id: &TaskId) {
        if !self.begin("delete_task") {
            return;
        }
        let result = self.api.delete_task(id).await;
        self.settle("delete_task", result, DELETE_FAILED, |tasks, ()| {
            tasks.retain(|t| &t.id != id);
        });
    }

    /// Change a task's status ahead of the server.
    ///
    /// Snapshot the local record, apply the new status, then confirm. On
    /// failure the snapshot is put back and the error recorded; on success
    /// nothing else happens.
    pub async fn move_task(&self, drag: DragEndData) {
        let DragEndData { task, destination } = drag;

        let prior = {
            let mut inner = self.lock();
            if inner.lifecycle == Lifecycle::Disposed {
                return;
            }
            inner.board.is_loading = true;
            inner.board.error = None;
            inner
                .board
                .tasks
                .iter_mut()
                .find(|t| t.id == task.id)
                .map(|local| {
                    let prior = local.clone();
                    local.status = destination;
                    prior
                })
        };

        let result = self
            .api
            .update_task(&UpdateTaskPayload::status_only(task.id.clone(), destination))
            .await;

        let mut inner = self.lock();
        if inner.lifecycle == Lifecycle::Disposed {
            return;
        }
        inner.board.is_loading = false;
        if let Err(e) = result {
            tracing::warn!(task_id = %task.id, to = ?destination, error = %e, "move failed; rolling back");
            if let Some(prior) = prior {
                if let Some(local) = inner.board.tasks.iter_mut().find(|t| t.id == prior.id) {
                    *local = prior;
                }
            }
            inner.board.error = Some(MOVE_FAILED.to_string());
        }
    }

    /// Replace the order of one column. Local only; the server never hears
    /// about it, so a reload restores server order.
    pub fn reorder_tasks(&self, status: TaskStatus, new_order: Vec<Task>) {
        let mut inner = self.lock();
        if inner.lifecycle == Lifecycle::Disposed {
            return;
        }
        let tasks = std::mem::take(&mut inner.board.tasks);
        inner.board.tasks = reorder_column(tasks, status, new_order);
    }
}

/// Fill the slots held by `status` tasks with `new_order`, in sequence. Other
/// tasks keep their slots. Surplus entries go to the end; unused slots are
/// dropped.
fn reorder_column(tasks: Vec<Task>, status: TaskStatus, new_order: Vec<Task>) -> Vec<Task> {
    let mut incoming = new_order.into_iter();
    let mut reordered = Vec::with_capacity(tasks.len());
    for task in tasks {
        if task.status != status {
            reordered.push(task);
        } else if let Some(next) = incoming.next() {
            reordered.push(next);
        }
    }
    reordered.extend(incoming);
    reordered
}
