//! System-level modules
//!
//! Currently only logging initialization lives here.

pub mod logging;
