//! CLI argument definitions for the bonechat binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default API server port when nothing else sets one.
pub const DEFAULT_PORT: u16 = 3040;

/// bonechat - a chat assistant that classifies radiographs and answers
/// follow-up questions about the finding.
#[derive(Parser, Debug)]
#[command(name = "bonechat", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the REST API server (default).
    Serve {
        /// API server port.
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,
    },
    /// Chat in the terminal against the configured services.
    Chat,
}

impl CliArgs {
    /// The subcommand to run; `serve` when none is given.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Serve { port: None })
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > BONECHAT_CONFIG env var > ~/.bonechat/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        config_path_from(
            self.config.as_ref(),
            std::env::var("BONECHAT_CONFIG").ok(),
            default_config_path(),
        )
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > BONECHAT_PORT env var > config file value > 3040.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        let flag = match self.command {
            Some(Command::Serve { port }) => port,
            _ => None,
        };
        port_from(flag, std::env::var("BONECHAT_PORT").ok(), config_port)
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

fn config_path_from(flag: Option<&PathBuf>, env: Option<String>, default: PathBuf) -> PathBuf {
    if let Some(p) = flag {
        return p.clone();
    }
    if let Some(p) = env {
        return PathBuf::from(p);
    }
    default
}

fn port_from(flag: Option<u16>, env: Option<String>, config_port: u16) -> u16 {
    if let Some(p) = flag {
        return p;
    }
    if let Some(p) = env.and_then(|v| v.parse::<u16>().ok()) {
        return p;
    }
    if config_port != 0 {
        return config_port;
    }
    DEFAULT_PORT
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".bonechat").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".bonechat").join("config.toml");
    }
    PathBuf::from("config.toml")
}
