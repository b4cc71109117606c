pub mod api_error;
pub mod config;
pub mod draft;
pub mod models;
pub mod perspective;
pub mod service;
pub mod telemetry;
