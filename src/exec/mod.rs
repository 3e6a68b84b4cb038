//! Execution of an approved plan, one primitive invocation per group.
//!
//! Behavior:
//! - Groups run strictly in plan order; later groups may rely on earlier ones.
//! - A failing group is recorded and the next group still runs.
//! - A requested shutdown stops before the next group; nothing is rolled back.

mod git_mv;
mod plain;

pub use git_mv::GitMover;
pub use plain::PlainMover;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::errors::SmartmvError;
use crate::output;
use crate::plan::{Decision, Group, Plan};
use crate::shutdown;

/// Failure of one `move_all` call; `moved` lists sources that did move before or despite it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct MoveFailure {
    pub moved: Vec<PathBuf>,
    pub message: String,
}

impl MoveFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            moved: Vec::new(),
            message: message.into(),
        }
    }
}

/// One primitive call: a group's sources and where they go.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub sources: &'a [PathBuf],
    pub destination: &'a Path,
    /// Planned mode: move into `destination` rather than onto it.
    pub into_directory: bool,
    pub overwrite: bool,
}

impl Invocation<'_> {
    /// Fails when `destination` (as resolved by the mover) no longer matches the planned mode.
    pub fn check_mode(&self, resolved: &Path) -> Result<(), MoveFailure> {
        match (self.into_directory, resolved.is_dir()) {
            (true, false) => Err(MoveFailure::new(format!(
                "target '{}' is no longer a directory",
                self.destination.display()
            ))),
            (false, true) => Err(MoveFailure::new(format!(
                "target '{}' became a directory after planning",
                self.destination.display()
            ))),
            _ => Ok(()),
        }
    }
}

/// One relocation primitive: `N sources + 1 destination` per call.
pub trait Mover {
    /// Short user-facing name, e.g. `git mv`.
    fn primitive(&self) -> &'static str;

    /// Equivalent command line, for dry runs and verbose output.
    fn describe(&self, call: &Invocation<'_>) -> String;

    /// Move every source of `call`; returns the sources that moved.
    fn move_all(&self, call: &Invocation<'_>) -> Result<Vec<PathBuf>, MoveFailure>;
}

/// Outcome of one group.
#[derive(Debug)]
pub struct ExecutionResult {
    /// 1-based position in the plan.
    pub index: usize,
    pub decision: Decision,
    pub destination: PathBuf,
    pub sources: Vec<PathBuf>,
    pub moved: Vec<PathBuf>,
    pub error: Option<SmartmvError>,
}

impl ExecutionResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs plans through the mover matching each group's decision.
pub struct Executor<'a> {
    vcs: &'a dyn Mover,
    plain: &'a dyn Mover,
    overwrite: bool,
    verbose: bool,
}

impl<'a> Executor<'a> {
    pub fn new(vcs: &'a dyn Mover, plain: &'a dyn Mover) -> Self {
        Self {
            vcs,
            plain,
            overwrite: false,
            verbose: false,
        }
    }

    /// Use the overwrite-permitting form of both primitives.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Print each group's command line before running it.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn mover(&self, decision: Decision) -> &'a dyn Mover {
        match decision {
            Decision::VersionControlled => self.vcs,
            Decision::Plain => self.plain,
        }
    }

    fn invocation<'g>(&self, group: &'g Group, sources: &'g [PathBuf]) -> Invocation<'g> {
        Invocation {
            sources,
            destination: &group.destination,
            into_directory: group.into_directory,
            overwrite: self.overwrite,
        }
    }

    /// Command lines the plan would run, in order.
    pub fn describe(&self, plan: &Plan) -> Vec<String> {
        plan.groups()
            .iter()
            .map(|g| {
                let sources = g.sources();
                self.mover(g.decision).describe(&self.invocation(g, &sources))
            })
            .collect()
    }

    pub fn execute(&self, plan: &Plan) -> Vec<ExecutionResult> {
        let mut results = Vec::with_capacity(plan.len());
        for (i, group) in plan.groups().iter().enumerate() {
            let index = i + 1;
            let sources = group.sources();
            let mut result = ExecutionResult {
                index,
                decision: group.decision,
                destination: group.destination.clone(),
                sources,
                moved: Vec::new(),
                error: None,
            };

            if shutdown::is_requested() {
                warn!(group = index, "shutdown requested; group not run");
                result.error = Some(SmartmvError::Interrupted);
                results.push(result);
                continue;
            }

            let mover = self.mover(group.decision);
            info!(
                group = index,
                decision = %group.decision,
                dest = %group.destination.display(),
                items = result.sources.len(),
                "running group"
            );
            let call = self.invocation(group, &result.sources);
            if self.verbose {
                output::print_run(&mover.describe(&call));
            }

            match mover.move_all(&call) {
                Ok(moved) => result.moved = moved,
                Err(failure) => {
                    error!(group = index, primitive = mover.primitive(), error = %failure.message, "group failed");
                    result.moved = failure.moved;
                    result.error = Some(SmartmvError::ExternalCommandFailure {
                        group: index,
                        primitive: mover.primitive(),
                        destination: group.destination.clone(),
                        message: failure.message,
                    });
                }
            }
            results.push(result);
        }
        results
    }
}

/// Overall verdict: an interruption wins, otherwise the first failing group.
pub fn aggregate(results: Vec<ExecutionResult>) -> Result<(), SmartmvError> {
    let mut first: Option<SmartmvError> = None;
    for err in results.into_iter().filter_map(|r| r.error) {
        if matches!(err, SmartmvError::Interrupted) {
            return Err(err);
        }
        first.get_or_insert(err);
    }
    first.map_or(Ok(()), Err)
}

/// Shell-style rendering of a command line, quoting arguments that need it.
pub(crate) fn render_command<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .map(|p| {
            let p = p.as_ref();
            let plain = !p.is_empty()
                && p.chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@%".contains(c));
            if plain {
                p.to_string()
            } else {
                format!("'{}'", p.replace('\'', r"'\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
