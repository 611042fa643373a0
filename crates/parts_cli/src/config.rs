//! Command-line and environment configuration.

use clap::{Parser, Subcommand};
use parts_core::LogConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "parts", version, about = "Part catalogue RPC service")]
pub struct Cli {
    /// SQLite database file backing the part store.
    #[arg(long, env = "PARTS_DB_PATH", default_value = "parts.sqlite3")]
    pub db_path: PathBuf,

    /// Log level: trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "PARTS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[arg(long, env = "PARTS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Per-call deadline in milliseconds. No deadline when unset.
    #[arg(long, env = "PARTS_CALL_TIMEOUT_MS")]
    pub call_timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve line-delimited JSON calls from stdin to stdout (default).
    Serve,
    /// Apply pending schema migrations and exit.
    Migrate,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    pub fn log_config(&self) -> LogConfig {
        let defaults = LogConfig::default();
        LogConfig {
            level: self.log_level.clone().unwrap_or(defaults.level),
            log_dir: self.log_dir.clone(),
        }
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["parts", "--db-path", "/tmp/p.sqlite3"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
        assert_eq!(cli.db_path, PathBuf::from("/tmp/p.sqlite3"));
        assert_eq!(cli.call_timeout(), None);
    }

    #[test]
    fn parses_migrate_and_timeout() {
        let cli = Cli::try_parse_from([
            "parts",
            "--call-timeout-ms",
            "250",
            "--log-level",
            "warn",
            "migrate",
        ])
        .unwrap();
        assert_eq!(cli.command(), Command::Migrate);
        assert_eq!(cli.call_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(cli.log_config().level, "warn");
        assert_eq!(cli.log_config().log_dir, None);
    }
}
