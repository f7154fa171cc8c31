use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque task identifier. The server hands out UUID strings, but nothing on
/// this side depends on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        TaskId(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        TaskId(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Column order on the board.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    pub fn index(self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Done => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<TaskStatus> {
        TaskStatus::ALL.get(index).copied()
    }

    /// Next status in column order, wrapping around.
    pub fn cycle_forward(self) -> TaskStatus {
        TaskStatus::ALL[(self.index() + 1) % TaskStatus::ALL.len()]
    }

    pub fn cycle_backward(self) -> TaskStatus {
        TaskStatus::ALL[(self.index() + TaskStatus::ALL.len() - 1) % TaskStatus::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTaskPayload {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

/// Partial update. Only `Some` fields are sent, and only those are merged
/// into local state once the server accepts the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateTaskPayload {
    #[serde(skip)]
    pub id: TaskId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl UpdateTaskPayload {
    pub fn status_only(id: TaskId, status: TaskStatus) -> Self {
        UpdateTaskPayload {
            id,
            title: None,
            description: None,
            status: Some(status),
        }
    }

    /// Copy the supplied fields onto `task`.
    pub fn merge_into(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

/// Result of a cross-column drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEndData {
    pub task: Task,
    pub destination: TaskStatus,
}
