//! 创建管理员账号

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use colored::Colorize;

use crate::config::get_config;
use crate::interfaces::cli::CliError;
use crate::services::{CreateUserRequest, FileStore, UserService};
use crate::storage::{Role, StorageFactory};

/// 从不同来源获取密码
fn get_password(password: Option<String>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CliError::CommandError(format!("Failed to read from stdin: {}", e)))?;
        Ok(line.trim().to_string())
    } else if let Some(pwd) = password {
        Ok(pwd)
    } else {
        prompt_password_with_confirm()
    }
}

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::ParseError(
            "No password provided. Use --password or --stdin flag, or run interactively."
                .to_string(),
        ));
    }

    let read = |prompt: &str| -> Result<String, CliError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        rpassword::read_password()
            .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))
    };

    let password = read("Enter password: ")?;
    let confirm = read("Confirm password: ")?;

    if password != confirm {
        return Err(CliError::ParseError("Passwords do not match".to_string()));
    }

    Ok(password)
}

pub async fn create_admin(
    email: String,
    name: String,
    surname: String,
    password: Option<String>,
    stdin: bool,
) -> Result<(), CliError> {
    let password = get_password(password, stdin)?;
    if password.is_empty() {
        return Err(CliError::ParseError("Password cannot be empty".to_string()));
    }

    let config = get_config();
    let storage = StorageFactory::create(&config.database)
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;
    let files = Arc::new(FileStore::new(&config.uploads));
    let users = UserService::new(storage.clone(), files);

    let user = users
        .create_user(CreateUserRequest {
            name,
            surname,
            email,
            password,
            description: None,
            needs: None,
            role: Role::Admin,
        })
        .await?;

    println!(
        "{} {} (id {})",
        "Administrator created:".green().bold(),
        user.email.blue(),
        user.id
    );

    if let Err(e) = storage.close().await {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }
    Ok(())
}
