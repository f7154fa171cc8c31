use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{create_task_request::CreateTaskRequest, task_status::TaskStatus, update_task_request::UpdateTaskRequest};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("title must not be empty")]
    EmptyTitle,
}

/// A task document, as persisted and as returned over the wire.
///
/// The identifier is serialized as `_id`, the document-store convention the
/// client normalizes away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    pub fn new(request: CreateTaskRequest) -> Result<Self, ValidationError> {
        let title = validate_title(request.title.ok_or(ValidationError::MissingTitle)?)?;
        let now = Utc::now();
        Ok(Self {
            // v7 ids sort by creation time, which keeps list ordering stable
            // when two tasks share a timestamp.
            id: Uuid::now_v7(),
            title,
            description: request.description,
            status: request.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply the supplied fields only; the rest of the record is untouched.
    pub fn edit(self, request: UpdateTaskRequest) -> Result<Self, ValidationError> {
        let title = match request.title {
            Some(title) => validate_title(title)?,
            None => self.title,
        };
        Ok(Self {
            id: self.id,
            title,
            description: request.description.or(self.description),
            status: request.status.unwrap_or(self.status),
            created_at: self.created_at,
            updated_at: Utc::now(),
        })
    }
}

fn validate_title(title: String) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: Option<&str>, status: Option<TaskStatus>) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.map(str::to_string),
            description: None,
            status,
        }
    }

    #[test]
    fn status_defaults_to_todo() {
        let task = TaskRecord::new(create(Some("Write docs"), None)).unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn title_is_required_and_non_blank() {
        assert_eq!(TaskRecord::new(create(None, None)).unwrap_err(), ValidationError::MissingTitle);
        assert_eq!(TaskRecord::new(create(Some("   "), None)).unwrap_err(), ValidationError::EmptyTitle);
    }

    #[test]
    fn edit_changes_only_supplied_fields() {
        let task = TaskRecord::new(CreateTaskRequest {
            title: Some("Ship it".into()),
            description: Some("before friday".into()),
            status: Some(TaskStatus::InProgress),
        })
        .unwrap();

        let edited = task
            .clone()
            .edit(UpdateTaskRequest {
                status: Some(TaskStatus::Done),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(edited.id, task.id);
        assert_eq!(edited.title, "Ship it");
        assert_eq!(edited.description.as_deref(), Some("before friday"));
        assert_eq!(edited.status, TaskStatus::Done);
        assert_eq!(edited.created_at, task.created_at);
        assert!(edited.updated_at >= task.updated_at);
    }

    #[test]
    fn edit_revalidates_title() {
        let task = TaskRecord::new(create(Some("Keep"), None)).unwrap();
        let err = task
            .edit(UpdateTaskRequest {
                title: Some(String::new()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn serializes_with_document_store_field_names() {
        let task = TaskRecord::new(create(Some("Wire"), Some(TaskStatus::InProgress))).unwrap();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["_id"], task.id.to_string());
        assert_eq!(json["status"], "inProgress");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("id").is_none());
    }
}
