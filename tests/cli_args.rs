use clap::Parser;
use std::path::{Path, PathBuf};

use smartmv::cli::Args;
use smartmv::{Config, LogLevel, SmartmvError};

#[test]
fn last_path_is_the_destination() {
    let args = Args::parse_from(["smartmv", "a.txt", "b.txt", "dir/"]);
    let (sources, dest) = args.split_sources().unwrap();
    assert_eq!(sources, [PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    assert_eq!(dest, Path::new("dir/"));
}

#[test]
fn single_path_reports_missing_destination() {
    let args = Args::parse_from(["smartmv", "lonely.txt"]);
    let err = args.split_sources().unwrap_err();
    assert!(matches!(err, SmartmvError::InvalidArguments(_)));
    assert_eq!(
        err.to_string(),
        "missing destination file operand after 'lonely.txt'"
    );
}

#[test]
fn no_paths_is_a_usage_error_unless_printing_config() {
    assert!(Args::try_parse_from(["smartmv"]).is_err());
    let args = Args::try_parse_from(["smartmv", "--print-config"]).unwrap();
    assert!(args.print_config);
}

#[test]
fn interactive_and_yes_conflict() {
    assert!(Args::try_parse_from(["smartmv", "-i", "-y", "a", "b"]).is_err());
}

#[test]
fn effective_log_level_precedence() {
    let args = Args::parse_from(["smartmv", "--debug", "--log-level", "quiet", "a", "b"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));

    let args = Args::parse_from(["smartmv", "--log-level", "info", "a", "b"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Info));

    assert!(Args::try_parse_from(["smartmv", "--log-level", "shouty", "a", "b"]).is_err());
}

#[test]
fn apply_overrides_sets_flags() {
    let args = Args::parse_from([
        "smartmv",
        "-w",
        "25",
        "-v",
        "-f",
        "-y",
        "--dry-run",
        "--tracked-only",
        "a",
        "b",
    ]);
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.warn_threshold, Some(25));
    assert!(cfg.verbose && cfg.force && cfg.assume_yes && cfg.dry_run);
    assert!(cfg.require_tracked);
    assert!(!cfg.interactive);
}

#[test]
fn negative_threshold_disables_the_warning() {
    let args = Args::parse_from(["smartmv", "--warn-amount-files", "-1", "a", "b"]);
    let mut cfg = Config {
        warn_threshold: Some(100),
        ..Config::default()
    };
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.warn_threshold, None);
}

#[test]
fn unset_flags_leave_config_alone() {
    let args = Args::parse_from(["smartmv", "a", "b"]);
    let mut cfg = Config {
        warn_threshold: Some(7),
        log_level: LogLevel::Info,
        require_tracked: true,
        ..Config::default()
    };
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.warn_threshold, Some(7));
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert!(cfg.require_tracked);
}
