// Requests
pub mod create_task_request;
pub mod update_task_request;


// Responses
pub mod message_response;
