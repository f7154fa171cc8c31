use std::sync::Arc;
use crate::data_access::task_db::TaskDb;

pub struct AppState {
    pub task_db: TaskDb,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn shared(task_db: TaskDb) -> SharedState {
        Arc::new(AppState { task_db })
    }
}
