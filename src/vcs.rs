//! Git command-line wrapper.
//! Runs `git` with a timeout and exposes the few queries smartmv needs.
//!
//! Notes:
//! - stdout/stderr are drained on helper threads so a chatty `git mv -v` over many
//!   files cannot fill the pipe and stall the child until the timeout.
//! - A timed-out child is killed and reported as `io::ErrorKind::TimedOut`.

use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::Config;
use crate::repo::RepoRoot;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Answers whether git tracks a path; used by the tracked-only policy.
pub trait TrackingOracle {
    fn is_tracked(&self, root: &RepoRoot, path: &Path) -> bool;
}

/// Invokes the configured git binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.git_binary.clone(), cfg.git_timeout)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// True when `git --version` runs successfully.
    pub fn is_available(&self) -> bool {
        let cwd = std::env::temp_dir();
        matches!(self.run(&cwd, ["--version"]), Ok(out) if out.status.success())
    }

    /// Run git in `cwd` with `args`, capturing output, bounded by the configured timeout.
    pub fn run<I, S>(&self, cwd: &Path, args: I) -> io::Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        trace!(cmd = ?cmd, "spawning git");
        let child = cmd.spawn()?;
        wait_with_timeout(child, self.timeout)
    }
}

impl TrackingOracle for GitCli {
    fn is_tracked(&self, root: &RepoRoot, path: &Path) -> bool {
        let args: [&OsStr; 4] = [
            OsStr::new("ls-files"),
            OsStr::new("--error-unmatch"),
            OsStr::new("--"),
            path.as_os_str(),
        ];
        let tracked = matches!(self.run(root.path(), args), Ok(out) if out.status.success());
        debug!(root = %root, path = %path.display(), tracked, "git ls-files");
        tracked
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut p) = pipe {
            let _ = p.read_to_end(&mut buf);
        }
        buf
    })
}

fn wait_with_timeout(mut child: Child, timeout: Duration) -> io::Result<Output> {
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let start = Instant::now();

    let status: ExitStatus = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("git did not finish within {}s", timeout.as_secs()),
            ));
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(Output {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_unavailable() {
        let git = GitCli::new("/nonexistent/bin/git-smartmv-test", Duration::from_secs(1));
        assert!(!git.is_available());
        let err = git.run(Path::new("."), ["status"]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn slow_command_times_out() {
        let sleeper = GitCli::new("sleep", Duration::from_millis(100));
        let err = sleeper.run(Path::new("."), ["5"]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }
}
