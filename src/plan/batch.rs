//! Batching of classified move requests into the fewest primitive invocations.
//!
//! Both primitives accept `N sources + 1 destination directory`, so requests that share
//! a decision and a destination token collapse into one group. Group order follows the
//! first appearance of each (decision, destination) key; requests keep input order.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::classify::{Decision, MoveClassifier};
use crate::errors::{not_a_directory, SmartmvError};
use crate::repo::{absolutize, FsProbe, RepoProbe, RepoRoot};

/// One source bound for one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub source: PathBuf,
    /// Destination token as given: a directory when `into_directory`, else the new path.
    pub destination: PathBuf,
    pub into_directory: bool,
    /// False when nothing exists at `source` at planning time.
    pub source_exists: bool,
}

impl MoveRequest {
    /// Path the source will occupy after the move.
    pub fn target(&self) -> PathBuf {
        if self.into_directory {
            match self.source.file_name() {
                Some(name) => self.destination.join(name),
                None => self.destination.clone(),
            }
        } else {
            self.destination.clone()
        }
    }
}

/// Requests sharing a decision and a destination token: one primitive invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub decision: Decision,
    pub destination: PathBuf,
    pub into_directory: bool,
    /// Repository both ends live in, for version-controlled groups.
    pub repo: Option<RepoRoot>,
    pub requests: Vec<MoveRequest>,
}

impl Group {
    pub fn sources(&self) -> Vec<PathBuf> {
        self.requests.iter().map(|r| r.source.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Ordered groups covering every request exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    groups: Vec<Group>,
    /// Directory the relative paths in the plan are relative to; empty means the process cwd.
    base: PathBuf,
}

impl Plan {
    /// Assemble a plan from prebuilt groups (callers are responsible for the grouping invariants).
    pub fn from_groups(groups: Vec<Group>) -> Self {
        Self {
            groups,
            base: PathBuf::new(),
        }
    }

    /// Resolve relative paths against `base` instead of the process working directory.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `path` as the planner saw it: joined onto the base and normalized.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if self.base.as_os_str().is_empty() {
            path.to_path_buf()
        } else {
            absolutize(&self.base, path)
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn requests(&self) -> impl Iterator<Item = &MoveRequest> {
        self.groups.iter().flat_map(|g| g.requests.iter())
    }

    pub fn total_sources(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Sources that did not exist when the plan was built, in plan order.
    pub fn missing_sources(&self) -> Vec<PathBuf> {
        self.requests()
            .filter(|r| !r.source_exists)
            .map(|r| r.source.clone())
            .collect()
    }

    pub fn has_version_controlled(&self) -> bool {
        self.groups
            .iter()
            .any(|g| g.decision == Decision::VersionControlled)
    }
}

/// Builds plans from raw paths.
pub struct BatchPlanner<P: RepoProbe = FsProbe> {
    classifier: MoveClassifier<P>,
}

impl<P: RepoProbe> BatchPlanner<P> {
    pub fn new(classifier: MoveClassifier<P>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &MoveClassifier<P> {
        &self.classifier
    }

    /// Plan moving `sources` to one `destination`, `mv`-style: several sources
    /// require an existing directory; a single source may name a new path.
    pub fn plan(&mut self, sources: &[PathBuf], destination: &Path) -> Result<Plan, SmartmvError> {
        if sources.is_empty() {
            return Err(SmartmvError::InvalidArguments("missing file operand".into()));
        }
        if sources.len() > 1 && !self.classifier.resolver().is_dir(destination) {
            return Err(not_a_directory(destination));
        }
        self.plan_pairs(
            sources
                .iter()
                .map(|s| (s.clone(), destination.to_path_buf())),
        )
    }

    /// Plan an arbitrary list of (source, destination) pairs. Each destination is
    /// directory-mode when it is an existing directory; two pairs may not name the
    /// same non-directory destination.
    pub fn plan_pairs<I>(&mut self, pairs: I) -> Result<Plan, SmartmvError>
    where
        I: IntoIterator<Item = (PathBuf, PathBuf)>,
    {
        let mut groups: Vec<Group> = Vec::new();
        let mut index: HashMap<(Decision, PathBuf), usize> = HashMap::new();
        let mut file_targets: HashSet<PathBuf> = HashSet::new();

        for (source, destination) in pairs {
            let resolver = self.classifier.resolver();
            let into_directory = resolver.is_dir(&destination);
            if !into_directory && !file_targets.insert(resolver.absolute(&destination)) {
                return Err(not_a_directory(&destination));
            }
            let source_exists = resolver.exists(&source);
            if !source_exists {
                debug!(src = %source.display(), "source does not exist; flagged");
            }

            let class = self.classifier.classify(&source, &destination, into_directory);
            let request = MoveRequest {
                source,
                destination: destination.clone(),
                into_directory,
                source_exists,
            };

            let key = (class.decision, destination);
            match index.get(&key) {
                Some(&i) => groups[i].requests.push(request),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(Group {
                        decision: key.0,
                        destination: key.1,
                        into_directory,
                        repo: match key.0 {
                            Decision::VersionControlled => class.destination_root,
                            Decision::Plain => None,
                        },
                        requests: vec![request],
                    });
                }
            }
        }

        let plan = Plan::from_groups(groups).with_base(self.classifier.resolver().cwd());
        info!(
            groups = plan.len(),
            sources = plan.total_sources(),
            "planned moves"
        );
        Ok(plan)
    }
}
