//! Rename with overwrite semantics that match across platforms.
//! On Windows an existing destination file is removed first (MoveFile does not replace).
//! On Unix the destination directory is fsynced afterwards, best-effort.

use std::fs;
use std::io;
use std::path::Path;

/// Returns the raw `io::Error` so callers can recognise cross-device failures.
pub(super) fn rename_replacing(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        if let Ok(meta) = fs::symlink_metadata(dst)
            && !meta.is_dir()
        {
            match fs::remove_file(dst) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
    }

    fs::rename(src, dst)?;

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        let _ = super::util::fsync_dir(parent);
    }
    Ok(())
}
