//! Pre-flight checks run once per invocation, before any move happens.
//!
//! Order of rules:
//! 1. missing sources abort;
//! 2. two sources landing on one target abort, forced or not;
//! 3. existing destinations abort unless forced (no prompt is offered for these);
//! 4. more sources than the warning threshold produce a warning;
//! 5. unless non-interactive, the whole plan is confirmed once.

mod confirm;

pub use confirm::{Confirm, TerminalConfirm};

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::SmartmvError;
use crate::fs_ops::same_entry;
use crate::plan::{MoveRequest, Plan};

/// Items listed per group in the confirmation summary.
const SUMMARY_ITEMS_PER_GROUP: usize = 10;

/// Policy inputs for the gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateOptions {
    /// Warn above this many sources; None (or zero) disables the warning.
    pub warn_threshold: Option<usize>,
    pub force: bool,
    pub non_interactive: bool,
}

/// Whether `total` sources exceed `threshold`.
pub fn exceeds_threshold(total: usize, threshold: Option<usize>) -> bool {
    matches!(threshold, Some(t) if t > 0 && total > t)
}

#[derive(Debug)]
pub enum Outcome {
    Proceed,
    Abort(SmartmvError),
}

impl Outcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Outcome::Proceed)
    }
}

/// Gate verdict plus the warnings surfaced on the way.
#[derive(Debug)]
pub struct Authorization {
    pub outcome: Outcome,
    pub warnings: Vec<String>,
}

pub struct SafetyGate<'a> {
    confirm: &'a mut dyn Confirm,
}

impl<'a> SafetyGate<'a> {
    pub fn new(confirm: &'a mut dyn Confirm) -> Self {
        Self { confirm }
    }

    pub fn authorize(
        &mut self,
        plan: &Plan,
        total_source_count: usize,
        options: &GateOptions,
    ) -> Authorization {
        let mut warnings = Vec::new();

        let missing = plan.missing_sources();
        if !missing.is_empty() {
            return abort(SmartmvError::SourceNotFound(missing), warnings);
        }

        // force only permits replacing what is already there
        if let Some(err) = find_duplicate_targets(plan) {
            return abort(err, warnings);
        }

        if !options.force
            && let Some(err) = find_conflict(plan)
        {
            return abort(err, warnings);
        }

        if exceeds_threshold(total_source_count, options.warn_threshold) {
            let files = count_files(plan);
            let msg = format!(
                "about to move {} items ({} files) which exceeds the warning threshold of {}",
                total_source_count,
                files,
                options.warn_threshold.unwrap_or_default()
            );
            info!(items = total_source_count, files, "{msg}");
            warnings.push(msg);
        }

        if options.non_interactive {
            return Authorization {
                outcome: Outcome::Proceed,
                warnings,
            };
        }

        let summary = render_summary(plan, &warnings);
        let outcome = match self.confirm.confirm(&summary) {
            Ok(true) => {
                info!("plan confirmed");
                Outcome::Proceed
            }
            Ok(false) => Outcome::Abort(SmartmvError::UserAborted),
            Err(e) => Outcome::Abort(e),
        };
        Authorization { outcome, warnings }
    }
}

fn abort(err: SmartmvError, warnings: Vec<String>) -> Authorization {
    debug!(kind = err.kind(), "gate refused the plan");
    Authorization {
        outcome: Outcome::Abort(err),
        warnings,
    }
}

/// Targets that more than one request would land on, each reported once.
fn find_duplicate_targets(plan: &Plan) -> Option<SmartmvError> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut repeated: HashSet<PathBuf> = HashSet::new();
    let mut dupes: Vec<PathBuf> = Vec::new();
    for req in plan.requests() {
        let target = req.target();
        let key = plan.absolute(&target);
        if !seen.insert(key.clone()) && repeated.insert(key) {
            dupes.push(target);
        }
    }
    (!dupes.is_empty()).then(|| SmartmvError::DuplicateTarget(dupes))
}

/// First single-file clash, else every directory-mode clash at once.
fn find_conflict(plan: &Plan) -> Option<SmartmvError> {
    let mut clashes: Vec<PathBuf> = Vec::new();
    for req in plan.requests() {
        let target = req.target();
        if !occupied_by_other(plan, req, &target) {
            continue;
        }
        if req.into_directory {
            clashes.push(target);
        } else {
            return Some(SmartmvError::DestinationExists(target));
        }
    }
    (!clashes.is_empty()).then(|| SmartmvError::DestinationConflict(clashes))
}

/// Something exists at `target` and it is not the source itself (e.g. a case-only rename).
fn occupied_by_other(plan: &Plan, req: &MoveRequest, target: &Path) -> bool {
    let target = plan.absolute(target);
    fs::symlink_metadata(&target).is_ok() && !same_entry(&plan.absolute(&req.source), &target)
}

/// Regular files covered by the plan, counting directory contents recursively.
fn count_files(plan: &Plan) -> usize {
    plan.requests()
        .map(|r| {
            let source = plan.absolute(&r.source);
            if source.is_dir() {
                WalkDir::new(&source)
                    .min_depth(1)
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| !e.file_type().is_dir())
                    .count()
            } else {
                1
            }
        })
        .sum()
}

/// Human-readable description of the plan shown before confirmation.
pub fn render_summary(plan: &Plan, warnings: &[String]) -> String {
    let mut s = String::new();
    for w in warnings {
        let _ = writeln!(s, "warning: {w}");
    }
    let _ = writeln!(
        s,
        "Plan: {} item(s) in {} group(s)",
        plan.total_sources(),
        plan.len()
    );
    for (i, group) in plan.groups().iter().enumerate() {
        let _ = writeln!(
            s,
            "  [{}] {} ({}) {} item(s) -> '{}'",
            i + 1,
            group.decision.primitive(),
            group.decision,
            group.len(),
            group.destination.display()
        );
        for req in group.requests.iter().take(SUMMARY_ITEMS_PER_GROUP) {
            let _ = writeln!(s, "        {}", req.source.display());
        }
        if group.len() > SUMMARY_ITEMS_PER_GROUP {
            let _ = writeln!(
                s,
                "        ... and {} more",
                group.len() - SUMMARY_ITEMS_PER_GROUP
            );
        }
    }
    s.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strictly_greater_and_optional() {
        assert!(exceeds_threshold(11, Some(10)));
        assert!(!exceeds_threshold(10, Some(10)));
        assert!(!exceeds_threshold(1_000, None));
        assert!(!exceeds_threshold(5, Some(0)));
    }
}
