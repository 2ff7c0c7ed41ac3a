//! Service layer for business logic
//!
//! This module provides the business rules shared between the HTTP API,
//! the WebSocket gateway and the CLI.

mod auth_service;
pub mod file_store;
mod swipe_service;
mod user_service;

pub use auth_service::*;
pub use file_store::{FileStore, UploadedFile};
pub use swipe_service::*;
pub use user_service::*;
