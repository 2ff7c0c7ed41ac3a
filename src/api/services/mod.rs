pub mod auth;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod routes;
pub mod swipe;
pub mod types;
pub mod uploads;
pub mod users;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::{api_result, error_from_app, error_response, payload_error_handler};
pub use routes::{auth_routes, swipe_routes, users_routes};
pub use types::ApiResponse;
