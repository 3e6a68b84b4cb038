//! Core library for `smartmv`.
//!
//! Moves files and directories with `git mv` when source and destination live in the
//! same repository, and with a plain move otherwise. The pipeline is:
//! paths → [`BatchPlanner`] → [`Plan`] → [`SafetyGate`] → [`Executor`].

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs_ops;
pub mod output;
pub mod plan;
pub mod platform;
pub mod repo;
pub mod safety;
pub mod shutdown;
pub mod vcs;

pub use config::{
    config_path, default_config_path, load_config, load_config_from_xml_path,
    path_has_symlink_ancestor, Config, LogLevel,
};
pub use errors::{exit_code, SmartmvError};
pub use exec::{
    aggregate, ExecutionResult, Executor, GitMover, Invocation, MoveFailure, Mover, PlainMover,
};
pub use plan::{fs_planner, BatchPlanner, Decision, Group, MoveClassifier, MoveRequest, Plan};
pub use repo::{FsProbe, RepoProbe, RepoResolver, RepoRoot};
pub use safety::{Authorization, Confirm, GateOptions, Outcome, SafetyGate, TerminalConfirm};
pub use vcs::{GitCli, TrackingOracle};
