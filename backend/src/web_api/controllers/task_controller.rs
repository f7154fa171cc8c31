use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    app_state::SharedState, create_task_request::CreateTaskRequest, message_response::MessageResponse,
    task_record::TaskRecord, update_task_request::UpdateTaskRequest, ApiError,
};

const FETCH_FAILED: &str = "Error fetching tasks";
const CREATE_FAILED: &str = "Error creating task";
const UPDATE_FAILED: &str = "Error updating task";
const DELETE_FAILED: &str = "Error deleting task";

pub struct TaskController {}

impl TaskController {
    pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<TaskRecord>>, ApiError> {
        state
            .task_db
            .list_tasks()
            .map(Json)
            .map_err(|e| ApiError::internal(FETCH_FAILED, e))
    }

    pub async fn create(
        State(state): State<SharedState>,
        payload: Result<Json<CreateTaskRequest>, JsonRejection>,
    ) -> Result<(StatusCode, Json<TaskRecord>), ApiError> {
        let Json(body) = payload.map_err(|e| ApiError::bad_request(CREATE_FAILED, e.body_text()))?;
        let task = TaskRecord::new(body).map_err(|e| ApiError::bad_request(CREATE_FAILED, e))?;

        state
            .task_db
            .insert_task(&task)
            .map_err(|e| ApiError::bad_request(CREATE_FAILED, e))?;

        tracing::info!(task_id = %task.id, status = ?task.status, "task created");
        Ok((StatusCode::CREATED, Json(task)))
    }

    pub async fn update(
        State(state): State<SharedState>,
        Path(id): Path<String>,
        payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
    ) -> Result<Json<TaskRecord>, ApiError> {
        let id = parse_task_id(&id).map_err(|e| ApiError::bad_request(UPDATE_FAILED, e))?;
        let Json(body) = payload.map_err(|e| ApiError::bad_request(UPDATE_FAILED, e.body_text()))?;

        match state.task_db.find_and_update(id, |task| task.edit(body)) {
            Ok(Some(task)) => {
                tracing::info!(task_id = %task.id, status = ?task.status, "task updated");
                Ok(Json(task))
            }
            Ok(None) => Err(ApiError::NotFound),
            Err(e) => Err(ApiError::bad_request(UPDATE_FAILED, e)),
        }
    }

    pub async fn delete(
        State(state): State<SharedState>,
        Path(id): Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let id = parse_task_id(&id).map_err(|e| ApiError::bad_request(DELETE_FAILED, e))?;

        match state.task_db.find_and_delete(id) {
            Ok(Some(task)) => {
                tracing::info!(task_id = %task.id, "task deleted");
                Ok(Json(MessageResponse::new("Task deleted successfully")))
            }
            Ok(None) => Err(ApiError::NotFound),
            Err(e) => Err(ApiError::bad_request(DELETE_FAILED, e)),
        }
    }
}

fn parse_task_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw).map_err(|e| format!("invalid task id {raw:?}: {e}"))
}
