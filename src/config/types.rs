//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{DEFAULT_GIT_BINARY, DEFAULT_GIT_TIMEOUT};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default)
    #[default]
    Normal,
    /// Informational events (one line per group)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Warn (and ask) when more sources than this are moved; None disables
    pub warn_threshold: Option<usize>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Program used for version-controlled moves
    pub git_binary: PathBuf,
    /// Upper bound for a single git invocation
    pub git_timeout: Duration,
    /// Demote sources git does not track to plain moves
    pub require_tracked: bool,
    /// Keep timestamps/permissions when a plain move has to copy across filesystems
    pub preserve_metadata: bool,
    /// Report each group before it runs
    pub verbose: bool,
    /// Allow overwriting existing destinations
    pub force: bool,
    /// Always confirm the plan
    pub interactive: bool,
    /// Never prompt
    pub assume_yes: bool,
    /// Print the plan but do not move anything
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warn_threshold: None,
            log_level: LogLevel::Normal,
            log_file: None,
            git_binary: PathBuf::from(DEFAULT_GIT_BINARY),
            git_timeout: DEFAULT_GIT_TIMEOUT,
            require_tracked: false,
            preserve_metadata: true,
            verbose: false,
            force: false,
            interactive: false,
            assume_yes: false,
            dry_run: false,
        }
    }
}

impl Config {
    /// Normalize a raw threshold: zero or negative disables the warning.
    pub fn threshold_from(raw: i64) -> Option<usize> {
        if raw <= 0 {
            None
        } else {
            usize::try_from(raw).ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_threshold_disables_warning() {
        assert_eq!(Config::threshold_from(-1), None);
        assert_eq!(Config::threshold_from(0), None);
        assert_eq!(Config::threshold_from(10), Some(10));
    }

    #[test]
    fn log_level_parses_aliases() {
        assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("warn"), Some(LogLevel::Normal));
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
