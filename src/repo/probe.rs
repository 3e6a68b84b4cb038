//! Filesystem probing used by the resolver.
//! The trait lets tests describe a synthetic tree without touching the disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the metadata entry marking a working tree root.
/// A directory in a normal clone; a gitfile in worktrees and submodules.
pub const REPO_METADATA: &str = ".git";

/// Read-only view of the filesystem needed to locate repositories.
pub trait RepoProbe {
    /// Whether `dir` carries repository metadata.
    fn is_repo_root(&self, dir: &Path) -> io::Result<bool>;

    /// Whether `path` exists and is a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether anything (including a dangling symlink) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` itself is a symlink.
    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    /// Canonical form of an existing path; None when it cannot be resolved.
    fn canonicalize(&self, path: &Path) -> Option<PathBuf>;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl RepoProbe for FsProbe {
    fn is_repo_root(&self, dir: &Path) -> io::Result<bool> {
        match fs::symlink_metadata(dir.join(REPO_METADATA)) {
            Ok(_) => Ok(true),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        dunce::canonicalize(path).ok()
    }
}
