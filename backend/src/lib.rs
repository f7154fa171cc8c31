//---------------------------------------
pub mod web_api {
    pub mod api_error;
    pub mod routes;
    pub mod controllers;
}

pub use web_api::api_error::ApiError;
pub use web_api::routes::map_routes;
pub use web_api::controllers::*;
//---------------------------------------

//---------------------------------------
pub mod shared {
    pub mod models;
    pub mod dto;
}

pub use shared::models::*;
pub use shared::dto::*;
//---------------------------------------

//---------------------------------------
pub mod data_access {
    pub mod task_db;
}
//---------------------------------------
