use serde::Deserialize;

use crate::task_status::TaskStatus;

/// Partial body for `PATCH /api/tasks/:id`. Unknown fields (including an
/// echoed `id`) are ignored; the identifier always comes from the path.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}
