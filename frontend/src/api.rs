//! HTTP access to the task API.
//!
//! Every call returns the server's failure unchanged (status and body, or the
//! transport error). Turning that into something a person should read is the
//! store's job.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{CreateTaskPayload, Task, TaskId, TaskStatus, UpdateTaskPayload};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError>;
    async fn create_task(&self, payload: &CreateTaskPayload) -> Result<Task, ApiError>;
    async fn update_task(&self, payload: &UpdateTaskPayload) -> Result<Task, ApiError>;
    async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError>;
}

/// Task as the server sends it. The store's `_id` becomes the client's `id`.
#[derive(Debug, Deserialize)]
struct WireTask {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    status: TaskStatus,
}

impl From<WireTask> for Task {
    fn from(wire: WireTask) -> Self {
        Task {
            id: TaskId::from(wire.id),
            title: wire.title,
            description: wire.description.unwrap_or_default(),
            status: wire.status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpTaskApi {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: &TaskId) -> String {
        format!("{}/tasks/{}", self.base_url, id)
    }
}

impl Default for HttpTaskApi {
    fn default() -> Self {
        HttpTaskApi::new(DEFAULT_API_URL)
    }
}

async fn ensure_success(res: Response) -> Result<Response, ApiError> {
    if res.status().is_success() {
        Ok(res)
    } else {
        let status = res.status();
        let body = res.text().await?;
        Err(ApiError::Status { status, body })
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let res = self.client.get(self.tasks_url()).send().await?;
        let tasks = ensure_success(res).await?.json::<Vec<WireTask>>().await?;
        Ok(tasks.into_iter().map(Task::from).collect())
    }

    async fn create_task(&self, payload: &CreateTaskPayload) -> Result<Task, ApiError> {
        let res = self.client.post(self.tasks_url()).json(payload).send().await?;
        let task = ensure_success(res).await?.json::<WireTask>().await?;
        Ok(task.into())
    }

    async fn update_task(&self, payload: &UpdateTaskPayload) -> Result<Task, ApiError> {
        let res = self
            .client
            .patch(self.task_url(&payload.id))
            .json(payload)
            .send()
            .await?;
        let task = ensure_success(res).await?.json::<WireTask>().await?;
        Ok(task.into())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let res = self.client.delete(self.task_url(id)).send().await?;
        ensure_success(res).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_task_maps_store_id_to_id() {
        let wire: WireTask = serde_json::from_value(serde_json::json!({
            "_id": "0192f0c4-5d1a-7c3e-9b2a-1f4e5d6c7b8a",
            "title": "Normalize",
            "description": null,
            "status": "inProgress",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        let task = Task::from(wire);
        assert_eq!(task.id.as_str(), "0192f0c4-5d1a-7c3e-9b2a-1f4e5d6c7b8a");
        assert_eq!(task.title, "Normalize");
        assert_eq!(task.description, "");
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let api = HttpTaskApi::new("http://localhost:5000/api/");
        assert_eq!(api.tasks_url(), "http://localhost:5000/api/tasks");
        assert_eq!(api.task_url(&"42".into()), "http://localhost:5000/api/tasks/42");
    }
}
