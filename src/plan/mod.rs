//! Classification and batching of move requests.

mod batch;
mod classify;

pub use batch::{BatchPlanner, Group, MoveRequest, Plan};
pub use classify::{Classification, Decision, MoveClassifier};

use crate::repo::{FsProbe, RepoResolver};
use crate::vcs::TrackingOracle;

/// Planner over the real filesystem, optionally demoting untracked sources.
pub fn fs_planner(
    resolver: RepoResolver<FsProbe>,
    tracking: Option<Box<dyn TrackingOracle>>,
) -> BatchPlanner<FsProbe> {
    let classifier = MoveClassifier::new(resolver);
    let classifier = match tracking {
        Some(oracle) => classifier.with_tracking(oracle),
        None => classifier,
    };
    BatchPlanner::new(classifier)
}
