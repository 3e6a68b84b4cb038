use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Open a log file for appending (no POSIX modes on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}
