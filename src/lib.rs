//! Rendezvous - backend of a swipe-based matching app
//!
//! Accounts with JWT authentication, like/dislike swipes with mutual-match
//! detection, a WebSocket gateway relaying messages between connected users,
//! and the picture / verification-document upload workflows.
//!
//! # Architecture
//! - `storage`: SeaORM entities access (users, swipes)
//! - `services`: business logic (accounts, auth, swipes, files)
//! - `api`: HTTP handlers, JWT and middleware
//! - `gateway`: WebSocket connection registry and sessions
//! - `interfaces`: CLI management commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
