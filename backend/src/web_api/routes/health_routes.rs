use axum::{Router, routing::get};
use super::super::controllers::health_controller::HealthController;

pub const ROUTER_PATH: &str = "/";

pub fn get_router() -> Router {
    Router::new()
        .route(ROUTER_PATH, get(HealthController::get))
}
