//! Repository root resolution with a per-invocation cache.
//!
//! Behavior:
//! - Paths are made absolute against the resolver's working directory, then the
//!   longest existing prefix is canonicalized (so `/tmp` vs `/private/tmp` style
//!   aliases compare equal even for destinations that do not exist yet).
//! - A path that is not an existing directory resolves through its parent.
//! - The walk visits the start directory and every ancestor up to the root.
//! - Probe errors (e.g. EACCES on an ancestor) count as "no metadata here".

use std::collections::HashMap;
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

use super::probe::{FsProbe, RepoProbe};
use super::RepoRoot;

/// Resolves the enclosing repository of paths, caching one answer per start directory.
#[derive(Debug)]
pub struct RepoResolver<P: RepoProbe = FsProbe> {
    probe: P,
    cwd: PathBuf,
    cache: HashMap<PathBuf, Option<RepoRoot>>,
}

impl RepoResolver<FsProbe> {
    /// Resolver over the real filesystem, relative to the process working directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self::with_probe(FsProbe, std::env::current_dir()?))
    }
}

impl<P: RepoProbe> RepoResolver<P> {
    pub fn with_probe(probe: P, cwd: impl Into<PathBuf>) -> Self {
        Self {
            probe,
            cwd: cwd.into(),
            cache: HashMap::new(),
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Directory relative paths are resolved against.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Absolute, lexically normalized form of `path`.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        absolutize(&self.cwd, path)
    }

    /// Whether `path` is an existing directory.
    pub fn is_dir(&self, path: &Path) -> bool {
        self.probe.is_dir(&self.absolute(path))
    }

    /// Whether anything exists at `path`.
    pub fn exists(&self, path: &Path) -> bool {
        self.probe.exists(&self.absolute(path))
    }

    /// Repository containing `path`. Directories resolve from themselves, anything
    /// else (files, symlinks, paths that do not exist yet) from their parent.
    pub fn resolve(&mut self, path: &Path) -> Option<RepoRoot> {
        let abs = self.absolute(path);
        let start = if self.probe.is_dir(&abs) && !self.probe.is_symlink(&abs) {
            abs
        } else {
            match abs.parent() {
                Some(parent) => parent.to_path_buf(),
                None => abs,
            }
        };
        self.resolve_dir(&start)
    }

    /// Repository containing the directory `dir` (which may not exist yet).
    pub fn resolve_dir(&mut self, dir: &Path) -> Option<RepoRoot> {
        let start = self.canonical(&self.absolute(dir));
        if let Some(hit) = self.cache.get(&start) {
            trace!(dir = %start.display(), "repo cache hit");
            return hit.clone();
        }
        let found = self.walk(&start);
        debug!(
            dir = %start.display(),
            root = %found.as_ref().map(|r| r.to_string()).unwrap_or_else(|| "<none>".into()),
            "resolved repository"
        );
        self.cache.insert(start, found.clone());
        found
    }

    /// Number of distinct start directories resolved so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn walk(&self, start: &Path) -> Option<RepoRoot> {
        for dir in start.ancestors() {
            match self.probe.is_repo_root(dir) {
                Ok(true) => return Some(RepoRoot::new(dir)),
                Ok(false) => {}
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "cannot probe for repository metadata; skipping");
                }
            }
        }
        None
    }

    /// Canonicalize the longest existing prefix and re-append the rest.
    fn canonical(&self, path: &Path) -> PathBuf {
        let mut tail: Vec<OsString> = Vec::new();
        let mut cur = path;
        loop {
            if let Some(mut out) = self.probe.canonicalize(cur) {
                out.extend(tail.iter().rev());
                return out;
            }
            match (cur.parent(), cur.file_name()) {
                (Some(parent), Some(name)) => {
                    tail.push(name.to_os_string());
                    cur = parent;
                }
                _ => return path.to_path_buf(),
            }
        }
    }
}

/// Join `path` onto `cwd` when relative and fold `.`/`..` components.
pub fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let mut out = PathBuf::new();
    for comp in joined.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                // never pops past the root
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
