use axum::{Router, routing::{get, patch}};
use crate::{app_state::SharedState, task_controller::TaskController};

pub const ROUTER_PATH: &str = "/api/tasks";

pub fn get_router(app_state: SharedState) -> Router {
    Router::new()
        .route(ROUTER_PATH, get(TaskController::list).post(TaskController::create))
        .route(format!("{}/:id", ROUTER_PATH).as_str(), patch(TaskController::update).delete(TaskController::delete))
        .with_state(app_state)
}
