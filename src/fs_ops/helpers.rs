//! I/O error enrichment.
//!
//! Adapters that add the operation, the path and a platform-aware hint to an
//! `io::Error`, for use with `map_err` in both `anyhow` and `io::Result` code:
//!
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Hint for a raw OS error code, if one is known.
fn os_hint(code: i32) -> Option<&'static str> {
    #[cfg(unix)]
    {
        let hint = match code {
            libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
            libc::EXDEV => "source and destination are on different filesystems",
            libc::EBUSY => "resource busy; another process is using it",
            libc::ENOENT => "path not found; verify it exists",
            libc::EEXIST => "already exists; use --force to overwrite",
            libc::ENOTEMPTY => "destination directory is not empty",
            libc::EISDIR => "destination is a directory",
            libc::ENOTDIR => "a path component is not a directory",
            libc::ENOSPC => "no space left on device",
            libc::EROFS => "read-only filesystem",
            libc::ELOOP => "too many levels of symbolic links",
            libc::ENAMETOOLONG => "file name too long",
            libc::EMFILE | libc::ENFILE => "too many open files",
            _ => return None,
        };
        Some(hint)
    }
    #[cfg(windows)]
    {
        let hint = match code {
            5 => "access denied; check permissions",
            17 => "source and destination are on different drives",
            32 => "sharing violation; the file is in use",
            2 | 3 => "path not found; verify it exists",
            80 | 183 => "already exists; use --force to overwrite",
            112 => "not enough space on the disk",
            19 => "media is write protected",
            206 => "file name or path too long",
            _ => return None,
        };
        Some(hint)
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = code;
        None
    }
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists; use --force to overwrite"),
        io::ErrorKind::TimedOut => Some("timed out"),
        _ => None,
    }
}

/// `<op> '<path>': <error> (<hint>) [os error N]`
pub(crate) fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    let hint = match e.raw_os_error() {
        Some(code) => os_hint(code),
        None => kind_hint(e.kind()),
    };
    if let Some(hint) = hint {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    msg
}

/// `map_err` adapter producing an `anyhow::Error`.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// `map_err` adapter keeping the `io::Error` (and its kind) with an enriched message.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}
