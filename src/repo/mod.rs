//! Repository discovery.
//! Finds the working tree (if any) that contains a path, by walking up to the
//! nearest directory carrying repository metadata.

mod probe;
mod resolver;

pub use probe::{FsProbe, RepoProbe, REPO_METADATA};
pub use resolver::{absolutize, RepoResolver};

use std::fmt;
use std::path::{Path, PathBuf};

/// Canonical absolute path of a repository's top-level directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRoot(PathBuf);

impl RepoRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RepoRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for RepoRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
