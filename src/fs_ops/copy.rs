//! Copy side of a cross-device move.
//! - Files go to a hidden temp sibling first, then are renamed into place.
//! - Trees are recreated directory-first; files are copied in parallel.
//! - Symlinks are recreated, not followed.

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::atomic::rename_replacing;
use super::helpers::{io_error_with_help, io_error_with_help_io};
use super::metadata::preserve_metadata;
use super::util::unique_temp_path;

/// Copy one regular file to `dest` through a temp sibling.
pub(super) fn copy_file(src: &Path, dest: &Path, src_meta: &fs::Metadata, preserve: bool) -> Result<()> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;
    let tmp = unique_temp_path(dest_dir);

    fs::copy(src, &tmp).map_err(io_error_with_help("copy to temporary file", &tmp))?;
    if preserve {
        preserve_metadata(&tmp, src_meta);
    }
    if let Err(e) = rename_replacing(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help("rename temporary file into", dest)(e));
    }
    Ok(())
}

/// Recreate the symlink `src` at `dest`, pointing at the same target.
pub(super) fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(src).map_err(io_error_with_help_io("read link", src))?;
    make_symlink(src, &target, dest).map_err(io_error_with_help_io("create symlink", dest))
}

#[cfg(unix)]
fn make_symlink(_src: &Path, target: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(windows)]
fn make_symlink(src: &Path, target: &Path, dest: &Path) -> io::Result<()> {
    if fs::metadata(src).map(|m| m.is_dir()).unwrap_or(false) {
        std::os::windows::fs::symlink_dir(target, dest)
    } else {
        std::os::windows::fs::symlink_file(target, dest)
    }
}

#[cfg(not(any(unix, windows)))]
fn make_symlink(_src: &Path, _target: &Path, _dest: &Path) -> io::Result<()> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "symlinks are not supported"))
}

/// Copy the directory tree `src` to `dest` (which may already exist, empty).
pub(super) fn copy_tree(src: &Path, dest: &Path, preserve: bool) -> Result<()> {
    let mut dirs: Vec<(PathBuf, fs::Metadata)> = Vec::new();
    let mut files: Vec<(PathBuf, PathBuf, fs::Metadata)> = Vec::new();
    let mut links: Vec<(PathBuf, PathBuf)> = Vec::new();

    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dest.join(rel);
        let ft = entry.file_type();
        if ft.is_dir() {
            fs::create_dir_all(&target).map_err(io_error_with_help("create directory", &target))?;
            if preserve {
                let meta = entry.metadata().with_context(|| format!("stat {}", entry.path().display()))?;
                dirs.push((target, meta));
            }
        } else if ft.is_symlink() {
            links.push((entry.into_path(), target));
        } else {
            let meta = entry.metadata().with_context(|| format!("stat {}", entry.path().display()))?;
            files.push((entry.into_path(), target, meta));
        }
    }
    debug!(src = %src.display(), files = files.len(), dirs = dirs.len(), "copying tree");

    files
        .par_iter()
        .try_for_each(|(from, to, meta)| -> Result<()> {
            fs::copy(from, to).map_err(io_error_with_help("copy file to", to))?;
            if preserve {
                preserve_metadata(to, meta);
            }
            Ok(())
        })?;

    for (from, to) in &links {
        copy_symlink(from, to)?;
    }

    // Deepest first, so setting a directory's mtime is not undone by writes into it.
    for (dir, meta) in dirs.iter().rev() {
        preserve_metadata(dir, meta);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_copy_leaves_no_temp_behind() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(&src, b"hello").unwrap();

        let meta = fs::metadata(&src).unwrap();
        copy_file(&src, &out.join("a.txt"), &meta, true).unwrap();

        assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"hello");
        let names: Vec<_> = fs::read_dir(&out).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names.len(), 1, "{names:?}");
    }

    #[test]
    fn tree_copy_recreates_nested_layout() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("tree");
        fs::create_dir_all(src.join("a/b")).unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();
        fs::write(src.join("top.txt"), b"1").unwrap();
        fs::write(src.join("a/b/deep.txt"), b"2").unwrap();

        let dest = dir.path().join("copy");
        copy_tree(&src, &dest, true).unwrap();

        assert_eq!(fs::read(dest.join("top.txt")).unwrap(), b"1");
        assert_eq!(fs::read(dest.join("a/b/deep.txt")).unwrap(), b"2");
        assert!(dest.join("empty").is_dir());
        assert!(src.join("a/b/deep.txt").exists(), "copy must not touch the source");
    }

    #[cfg(unix)]
    #[test]
    fn tree_copy_keeps_symlinks_as_links() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("tree");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("real"), b"x").unwrap();
        std::os::unix::fs::symlink("real", src.join("link")).unwrap();

        let dest = dir.path().join("copy");
        copy_tree(&src, &dest, false).unwrap();

        let link = dest.join("link");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("real"));
    }
}
