//! CLI interface module
//!
//! 管理命令直接连数据库，不经过 HTTP。

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::errors::AppError;
use commands::{config_generate, create_admin};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<AppError> for CliError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::DatabaseConfig(_)
            | AppError::DatabaseConnection(_)
            | AppError::DatabaseOperation(_) => CliError::StorageError(err.format_simple()),
            AppError::Validation(_) => CliError::ParseError(err.format_simple()),
            _ => CliError::CommandError(err.format_simple()),
        }
    }
}

/// 执行一个管理命令
pub async fn run_cli(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server mode".to_string(),
        )),
        Commands::CreateAdmin {
            email,
            name,
            surname,
            password,
            stdin,
        } => create_admin(email, name, surname, password, stdin).await,
        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => {
                config_generate(output_path, force).await
            }
        },
    }
}
