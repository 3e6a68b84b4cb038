//! Filesystem primitives behind the plain move.

mod atomic;
mod copy;
mod helpers;
mod metadata;
mod util;

pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use metadata::preserve_metadata;
pub use util::same_entry;

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Knobs for [`relocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    /// Replace an existing target (files, or empty directories for directories).
    pub overwrite: bool,
    /// Keep timestamps and permissions when a copy is needed.
    pub preserve_metadata: bool,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            preserve_metadata: true,
        }
    }
}

/// Move `src` to exactly `dst`: rename when possible, copy and remove across devices.
pub fn relocate(src: &Path, dst: &Path, opts: MoveOptions) -> Result<()> {
    let meta = fs::symlink_metadata(src).map_err(io_error_with_help("stat source", src))?;
    let is_dir = meta.is_dir();

    // moving an entry onto itself; only a case-only spelling change needs a rename
    if util::same_entry(src, dst) {
        if src.file_name() != dst.file_name() {
            fs::rename(src, dst).map_err(io_error_with_help("rename", src))?;
        }
        debug!(src = %src.display(), dest = %dst.display(), "source and destination are the same entry");
        return Ok(());
    }

    if let Ok(existing) = fs::symlink_metadata(dst) {
        if !opts.overwrite {
            bail!("destination '{}' already exists (use --force to overwrite)", dst.display());
        }
        match (is_dir, existing.is_dir()) {
            (true, false) => bail!(
                "cannot overwrite non-directory '{}' with directory '{}'",
                dst.display(),
                src.display()
            ),
            (false, true) => bail!(
                "cannot overwrite directory '{}' with non-directory '{}'",
                dst.display(),
                src.display()
            ),
            _ => {}
        }
    }

    match atomic::rename_replacing(src, dst) {
        Ok(()) => {
            info!(src = %src.display(), dest = %dst.display(), "renamed");
            return Ok(());
        }
        Err(e) if util::is_cross_device(&e) => {
            debug!(src = %src.display(), dest = %dst.display(), "cross-device; falling back to copy");
        }
        Err(e) => return Err(io_error_with_help("rename", src)(e)),
    }

    if is_dir {
        copy::copy_tree(src, dst, opts.preserve_metadata)?;
        fs::remove_dir_all(src).map_err(io_error_with_help("remove source directory", src))?;
    } else if meta.file_type().is_symlink() {
        if opts.overwrite {
            remove_if_present(dst)?;
        }
        copy::copy_symlink(src, dst)?;
        fs::remove_file(src).map_err(io_error_with_help("remove source link", src))?;
    } else {
        copy::copy_file(src, dst, &meta, opts.preserve_metadata)?;
        fs::remove_file(src).map_err(io_error_with_help("remove source file", src))?;
    }
    info!(src = %src.display(), dest = %dst.display(), "copied across devices and removed source");
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error_with_help("remove existing destination", path)(e)),
    }
}
