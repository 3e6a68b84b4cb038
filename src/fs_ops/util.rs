use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Hidden sibling path used while a cross-device copy is in flight.
pub(super) fn unique_temp_path(dst_dir: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    dst_dir.join(format!(".smartmv.{pid}.{nanos}.tmp"))
}

/// EXDEV on Unix, ERROR_NOT_SAME_DEVICE on Windows.
pub(super) fn is_cross_device(e: &io::Error) -> bool {
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        #[cfg(windows)]
        Some(code) => code == 17,
        #[cfg(not(any(unix, windows)))]
        Some(_) => false,
        None => false,
    }
}

/// Whether `a` and `b` name one directory entry: the same path, or a spelling of it
/// that differs only in case on a case-insensitive filesystem. Symlinks are not followed.
pub fn same_entry(a: &Path, b: &Path) -> bool {
    let (Ok(ma), Ok(mb)) = (fs::symlink_metadata(a), fs::symlink_metadata(b)) else {
        return false;
    };
    let (Some(na), Some(nb)) = (a.file_name(), b.file_name()) else {
        return false;
    };
    match (canonical_parent(a), canonical_parent(b)) {
        (Ok(pa), Ok(pb)) if pa == pb => {}
        _ => return false,
    }
    if na == nb {
        return true;
    }
    na.to_string_lossy().to_lowercase() == nb.to_string_lossy().to_lowercase()
        && same_identity(&ma, &mb)
}

fn canonical_parent(p: &Path) -> io::Result<PathBuf> {
    let dir = p
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    dunce::canonicalize(dir)
}

// hard links share an inode but are distinct entries
#[cfg(unix)]
fn same_identity(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino() && (a.is_dir() || a.nlink() == 1)
}

#[cfg(not(unix))]
fn same_identity(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    a.file_type() == b.file_type()
        && a.len() == b.len()
        && a.modified().ok() == b.modified().ok()
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_is_hidden_sibling() {
        let p = unique_temp_path(Path::new("/dest"));
        assert_eq!(p.parent(), Some(Path::new("/dest")));
        let name = p.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with(".smartmv.") && name.ends_with(".tmp"), "{name}");
    }

    #[test]
    fn same_entry_matches_the_path_itself_only() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        assert!(same_entry(&a, &a));
        assert!(same_entry(&a, &dir.path().join(".").join("a.txt")));
        assert!(!same_entry(&a, &b));
        assert!(!same_entry(&a, &dir.path().join("missing.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn hard_links_are_distinct_entries() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let upper = dir.path().join("A.txt");
        fs::write(&a, b"a").unwrap();
        if fs::hard_link(&a, &upper).is_err() {
            // case-insensitive filesystem: A.txt already names a.txt
            return;
        }
        assert!(!same_entry(&a, &upper));
    }

    #[test]
    fn only_exdev_counts_as_cross_device() {
        assert!(!is_cross_device(&io::Error::from(io::ErrorKind::PermissionDenied)));
        #[cfg(unix)]
        assert!(is_cross_device(&io::Error::from_raw_os_error(libc::EXDEV)));
    }
}
