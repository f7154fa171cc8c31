pub mod api;
pub mod app;
pub mod board;
pub mod config;
pub mod models;
pub mod store;
pub mod ui;
