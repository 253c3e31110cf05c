//! Config for the arbiter behaviors
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`]. Round count and player logs come
//! from the command line and are set with the `with_*` methods.
//!
//! # Environment Variables
//!
//! All values are optional and case-insensitive. Unrecognized values fall back to the default.
//!
//! - `ARBITER_LOG`: where the arbiter's own diagnostics go: `off`, `stderr` or `file`
//!   (default: `stderr`)
//! - `ARBITER_LOG_LEVEL`: maximum level recorded: `error`, `warn`, `info`, `debug` or `trace`
//!   (default: `info`)

use std::str::FromStr;

use tracing::Level;

/// How player programs' standard error is handled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerLogs {
    /// Thrown away.
    #[default]
    Discard,
    /// Shared with the arbiter's standard error.
    Inherit,
    /// One file per player and game, named `<prefix><game:04>_<p1|p2>_<white|black>`.
    Prefix(String),
}

impl PlayerLogs {
    /// Interpret the value of the `--logs` option: absent discards, `-` inherits,
    /// anything else is a file name prefix.
    pub fn from_arg(arg: Option<&str>) -> PlayerLogs {
        match arg {
            None => PlayerLogs::Discard,
            Some("-") => PlayerLogs::Inherit,
            Some(prefix) => PlayerLogs::Prefix(prefix.to_owned()),
        }
    }
}

/// Where the arbiter writes its own log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogTarget {
    /// No subscriber is installed.
    Off,
    #[default]
    Stderr,
    /// A file named after the current local time, in the working directory.
    File,
}

impl FromStr for LogTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(LogTarget::Off),
            "stderr" => Ok(LogTarget::Stderr),
            "file" => Ok(LogTarget::File),
            other => Err(format!("unknown log target '{other}'")),
        }
    }
}

/// Configuration for arbiter behaviors.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) rounds: i32,
    pub(crate) player_logs: PlayerLogs,
    pub(crate) log: LogTarget,
    pub(crate) log_level: Level,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - A single game is played.
    /// - Player diagnostics are discarded.
    /// - No log subscriber is installed, so embedding code keeps control of `tracing`.
    pub fn new() -> Self {
        Self {
            rounds: 0,
            player_logs: PlayerLogs::Discard,
            log: LogTarget::Off,
            log_level: Level::INFO,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// The following environment variables are recognized:
    /// - `ARBITER_LOG`: `off`, `stderr` or `file` (default: `stderr`)
    /// - `ARBITER_LOG_LEVEL`: a `tracing` level name (default: `info`)
    ///
    /// Any other value (including unset) will result in using the default value for each field.
    pub fn from_env() -> Self {
        fn get_env<T: FromStr>(var: &str, default: T) -> T {
            std::env::var(var)
                .ok()
                .and_then(|val| val.parse().ok())
                .unwrap_or(default)
        }

        Self {
            log: get_env("ARBITER_LOG", LogTarget::Stderr),
            log_level: get_env("ARBITER_LOG_LEVEL", Level::INFO),
            ..Self::new()
        }
    }

    /// Number of rounds. Each round is two games with colors swapped; zero or
    /// less plays a single game.
    pub fn with_rounds(mut self, rounds: i32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set how player stderr is handled.
    pub fn with_player_logs(mut self, player_logs: PlayerLogs) -> Self {
        self.player_logs = player_logs;
        self
    }

    /// Set where the arbiter's own log goes.
    pub fn with_log(mut self, log: LogTarget) -> Self {
        self.log = log;
        self
    }

    /// Set the most verbose level that is logged.
    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    /// Number of games the tournament consists of.
    pub fn games(&self) -> usize {
        if self.rounds <= 0 {
            1
        } else {
            2 * self.rounds as usize
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
