//! CLI mode
//!
//! Delegates to the CLI implementation and reports failures.

use colored::Colorize;

use crate::cli::Commands;

/// Run CLI mode, returns the process exit code
pub async fn run_cli(command: Commands) -> i32 {
    match crate::interfaces::cli::run_cli(command).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            1
        }
    }
}
