//! Per-source decision between a version-controlled move and a plain move.

use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::repo::{FsProbe, RepoProbe, RepoResolver, RepoRoot};
use crate::vcs::TrackingOracle;

/// Which relocation primitive a source needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    VersionControlled,
    Plain,
}

impl Decision {
    /// Short name of the primitive, as shown to users.
    pub fn primitive(self) -> &'static str {
        match self {
            Decision::VersionControlled => "git mv",
            Decision::Plain => "mv",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::VersionControlled => "version-controlled",
            Decision::Plain => "plain",
        })
    }
}

/// Decision plus the roots it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub decision: Decision,
    pub source_root: Option<RepoRoot>,
    pub destination_root: Option<RepoRoot>,
}

/// Classifies (source, destination) pairs through a shared resolver.
pub struct MoveClassifier<P: RepoProbe = FsProbe> {
    resolver: RepoResolver<P>,
    tracking: Option<Box<dyn TrackingOracle>>,
}

impl<P: RepoProbe> MoveClassifier<P> {
    pub fn new(resolver: RepoResolver<P>) -> Self {
        Self {
            resolver,
            tracking: None,
        }
    }

    /// Demote sources the oracle reports as untracked to plain moves.
    pub fn with_tracking(mut self, oracle: Box<dyn TrackingOracle>) -> Self {
        self.tracking = Some(oracle);
        self
    }

    pub fn resolver(&self) -> &RepoResolver<P> {
        &self.resolver
    }

    /// Classify one source. A source that does not exist has no repository.
    ///
    /// `destination` is the directory receiving the source when `into_directory`,
    /// otherwise the exact new path (whose parent is then the target directory).
    pub fn classify(
        &mut self,
        source: &Path,
        destination: &Path,
        into_directory: bool,
    ) -> Classification {
        // a missing source has no repository, whatever its parent is
        let source_root = if self.resolver.exists(source) {
            self.resolver.resolve(source)
        } else {
            None
        };
        let destination_root = if into_directory {
            self.resolver.resolve_dir(destination)
        } else {
            let abs = self.resolver.absolute(destination);
            match abs.parent() {
                Some(parent) => self.resolver.resolve_dir(parent),
                None => self.resolver.resolve_dir(&abs),
            }
        };

        let mut decision = match (&source_root, &destination_root) {
            (Some(s), Some(d)) if s == d => Decision::VersionControlled,
            _ => Decision::Plain,
        };

        if decision == Decision::VersionControlled
            && let (Some(oracle), Some(root)) = (&self.tracking, &source_root)
        {
            let abs = self.resolver.absolute(source);
            if !oracle.is_tracked(root, &abs) {
                debug!(src = %source.display(), root = %root, "source is not tracked; using a plain move");
                decision = Decision::Plain;
            }
        }

        debug!(
            src = %source.display(),
            dest = %destination.display(),
            %decision,
            "classified"
        );
        Classification {
            decision,
            source_root,
            destination_root,
        }
    }
}
