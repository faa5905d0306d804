//! CLI module for Homeshelf
//!
//! # Commands
//!
//! - `serve` - Start the dashboard server
//! - `services` - Manage the services on the shelf (list, add, remove)
//! - `ping` - Check whether a service host is reachable
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! homeshelf serve
//!
//! # Put qBittorrent on the shelf
//! homeshelf services add qBittorrent http://192.168.1.20:8080 --type qbittorrent
//!
//! # Generate shell completions
//! homeshelf completions bash > ~/.bash_completion.d/homeshelf
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod ping;
pub mod serve;
pub mod services;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::shelf::ServiceType;

/// Homeshelf - self-hosted personal dashboard
#[derive(Parser, Debug)]
#[command(
    name = "homeshelf",
    version,
    about = "Self-hosted dashboard for your home services"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the dashboard server
    Serve(ServeArgs),
    /// Manage services on the shelf
    #[command(subcommand)]
    Services(ServicesCommands),
    /// Check whether a service host answers a ping
    Ping(PingArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "homeshelf.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "HOMESHELF_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "HOMESHELF_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HOMESHELF_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ServicesCommands {
    /// List services on the shelf
    List(ServicesListArgs),
    /// Add a service
    Add(ServicesAddArgs),
    /// Remove a service
    Remove(ServicesRemoveArgs),
}

#[derive(Args, Debug)]
pub struct ServicesListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "homeshelf.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct ServicesAddArgs {
    /// Display name, unique on the shelf
    pub name: String,

    /// Service URL (e.g., http://192.168.1.20:8080)
    pub url: String,

    /// Icon URL shown on the tile
    #[arg(short, long, default_value = "")]
    pub icon: String,

    /// Service type (qbittorrent, transmission, deluge, sonarr, radarr, plex, other)
    #[arg(short = 't', long = "type", default_value = "other")]
    pub service_type: ServiceType,

    /// Login for torrent clients
    #[arg(short, long, requires = "password")]
    pub username: Option<String>,

    #[arg(long, requires = "username")]
    pub password: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "homeshelf.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct ServicesRemoveArgs {
    /// Name of the service to remove
    pub name: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "homeshelf.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Service URL whose host is probed
    pub url: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "homeshelf.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "homeshelf.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["homeshelf", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config, PathBuf::from("homeshelf.toml"));
                assert!(args.port.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["homeshelf", "serve", "-p", "9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(9000)),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_services_list_json() {
        let cli = Cli::try_parse_from(["homeshelf", "services", "list", "--json"]).unwrap();
        match cli.command {
            Commands::Services(ServicesCommands::List(args)) => assert!(args.json),
            _ => panic!("Expected Services List command"),
        }
    }

    #[test]
    fn test_cli_parse_services_add() {
        let cli = Cli::try_parse_from([
            "homeshelf",
            "services",
            "add",
            "qB",
            "http://10.0.0.3:8080",
            "--type",
            "qBittorrent",
            "-u",
            "admin",
            "--password",
            "secret",
        ])
        .unwrap();
        match cli.command {
            Commands::Services(ServicesCommands::Add(args)) => {
                assert_eq!(args.name, "qB");
                assert_eq!(args.service_type, ServiceType::QBittorrent);
                assert_eq!(args.username.as_deref(), Some("admin"));
            }
            _ => panic!("Expected Services Add command"),
        }
    }

    #[test]
    fn test_cli_parse_services_add_rejects_lone_username() {
        let result = Cli::try_parse_from([
            "homeshelf",
            "services",
            "add",
            "qB",
            "http://qb",
            "-u",
            "admin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_services_add_rejects_lone_password() {
        let err = Cli::try_parse_from([
            "homeshelf",
            "services",
            "add",
            "qB",
            "http://qb",
            "--password",
            "secret",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_parse_ping() {
        let cli = Cli::try_parse_from(["homeshelf", "ping", "http://nas.lan"]).unwrap();
        match cli.command {
            Commands::Ping(args) => assert_eq!(args.url, "http://nas.lan"),
            _ => panic!("Expected Ping command"),
        }
    }
}
