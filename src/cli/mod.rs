//! CLI module - command-line interface for Academia
//!
//! This module provides a structured CLI using clap for argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Academia - academic administration backend
#[derive(Parser)]
#[command(name = "academia")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to load instead of the default search paths
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "web")]
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Print an Argon2id hash for manual seeding
    HashPassword {
        /// Password to hash
        password: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["academia"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["academia", "migrate", "--config", "/etc/academia.toml"])
            .unwrap();
        assert_eq!(cli.command, Some(Commands::Migrate));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/academia.toml")));
    }

    #[test]
    fn test_hash_password_requires_argument() {
        assert!(Cli::try_parse_from(["academia", "hash-password"]).is_err());
        let cli = Cli::try_parse_from(["academia", "hash-password", "s3cret"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::HashPassword {
                password: "s3cret".to_string()
            })
        );
    }
}
