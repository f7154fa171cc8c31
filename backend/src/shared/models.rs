pub mod app_state;
pub mod settings;
pub mod task_record;
pub mod task_status;
