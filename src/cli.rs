//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - The last positional path is the destination, every other one a source.
//! - --debug is a shorthand for --log-level debug.
//! - CLI flags override config values.

use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::{Config, LogLevel};
use crate::errors::SmartmvError;

/// Move files, using `git mv` whenever source and destination share a repository.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move files and directories, choosing `git mv` or a plain move automatically"
)]
pub struct Args {
    /// SOURCE... DEST
    #[arg(
        value_name = "PATH",
        value_hint = ValueHint::AnyPath,
        required_unless_present = "print_config"
    )]
    pub paths: Vec<PathBuf>,

    /// Warn (and ask) when moving more than N items; 0 or negative disables.
    #[arg(
        short = 'w',
        long = "warn-amount-files",
        value_name = "N",
        allow_negative_numbers = true
    )]
    pub warn_amount_files: Option<i64>,

    /// Print each command before it runs.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Overwrite existing destinations.
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Always confirm the plan before moving anything.
    #[arg(short = 'i', long, conflicts_with = "yes")]
    pub interactive: bool,

    /// Never prompt, even past the warning threshold.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Show the commands that would run, but do not move anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Use `git mv` only for sources git already tracks.
    #[arg(long)]
    pub tracked_only: bool,

    /// Enable debug logging (shorthand for --log-level debug).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Set log level: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the config file location used by smartmv and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Split the positional paths into sources and destination.
    pub fn split_sources(&self) -> Result<(&[PathBuf], &Path), SmartmvError> {
        match self.paths.as_slice() {
            [] => Err(SmartmvError::InvalidArguments("missing file operand".into())),
            [only] => Err(SmartmvError::InvalidArguments(format!(
                "missing destination file operand after '{}'",
                only.display()
            ))),
            [sources @ .., dest] => Ok((sources, dest.as_path())),
        }
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(raw) = self.warn_amount_files {
            cfg.warn_threshold = Config::threshold_from(raw);
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if self.tracked_only {
            cfg.require_tracked = true;
        }
        cfg.verbose |= self.verbose;
        cfg.force |= self.force;
        cfg.interactive |= self.interactive;
        cfg.assume_yes |= self.yes;
        cfg.dry_run |= self.dry_run;
    }
}

pub fn parse() -> Args {
    Args::parse()
}
