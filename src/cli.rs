//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Rendezvous - matching, messaging and verification backend
#[derive(Parser)]
#[command(name = "rendezvous")]
#[command(version)]
#[command(about = "Backend for a swipe-based matching app", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP / WebSocket server (default)
    Serve,

    /// Create an administrator account
    CreateAdmin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        surname: String,

        /// Password (if not provided, will prompt interactively)
        #[arg(long)]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite without asking
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_admin() {
        let cli = Cli::try_parse_from([
            "rendezvous",
            "create-admin",
            "--email",
            "root@example.com",
            "--name",
            "Root",
            "--surname",
            "Admin",
            "--password",
            "secret",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::CreateAdmin {
                email,
                password,
                stdin,
                ..
            }) => {
                assert_eq!(email, "root@example.com");
                assert_eq!(password.as_deref(), Some("secret"));
                assert!(!stdin);
            }
            _ => panic!("expected create-admin"),
        }
    }

    #[test]
    fn test_no_command_means_serve() {
        let cli = Cli::try_parse_from(["rendezvous", "-c", "custom.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }
}
