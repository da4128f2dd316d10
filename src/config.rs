//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "timer-keeper")]
#[command(about = "Category-grouped activity timers with persisted history")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding the persisted timer collection
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Persist the collection on every tick, not only on commands
    #[arg(long)]
    pub persist_on_tick: bool,

    /// Keep timers in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_locally_and_persist_on_commands() {
        let config = Config::try_parse_from(["timer-keeper"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(!config.persist_on_tick);
        assert!(!config.ephemeral);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "timer-keeper",
            "--port",
            "8080",
            "--data-dir",
            "/tmp/timers",
            "--persist-on-tick",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/timers"));
        assert!(config.persist_on_tick);
        assert_eq!(config.log_level(), "debug");
    }
}
