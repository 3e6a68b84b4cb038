//! Version-controlled move through `git mv`.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{render_command, Invocation, MoveFailure, Mover};
use crate::output;
use crate::repo::absolutize;
use crate::vcs::GitCli;

/// Runs `git mv` from the destination's directory with absolute paths.
pub struct GitMover {
    git: GitCli,
    cwd: PathBuf,
    verbose: bool,
}

impl GitMover {
    pub fn new(git: GitCli, cwd: impl Into<PathBuf>) -> Self {
        Self {
            git,
            cwd: cwd.into(),
            verbose: false,
        }
    }

    /// Pass `-v` to git and echo what it reports.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Directory git runs in, plus its arguments.
    fn invocation(&self, call: &Invocation<'_>) -> (PathBuf, Vec<OsString>) {
        let dest = absolutize(&self.cwd, call.destination);
        let run_dir = if call.into_directory {
            dest.clone()
        } else {
            dest.parent().map(Path::to_path_buf).unwrap_or_else(|| dest.clone())
        };

        let mut args: Vec<OsString> = vec!["mv".into()];
        if call.overwrite {
            args.push("-f".into());
        }
        if self.verbose {
            args.push("-v".into());
        }
        args.push("--".into());
        args.extend(call.sources.iter().map(|s| absolutize(&self.cwd, s).into_os_string()));
        args.push(dest.into_os_string());
        (run_dir, args)
    }
}

impl Mover for GitMover {
    fn primitive(&self) -> &'static str {
        "git mv"
    }

    fn describe(&self, call: &Invocation<'_>) -> String {
        let (run_dir, args) = self.invocation(call);
        let mut parts = vec![
            self.git.binary().to_string_lossy().into_owned(),
            "-C".to_string(),
            run_dir.to_string_lossy().into_owned(),
        ];
        parts.extend(args.iter().map(|a| a.to_string_lossy().into_owned()));
        render_command(parts)
    }

    /// git picks its own mode from the destination, so a drifted destination fails the group.
    fn move_all(&self, call: &Invocation<'_>) -> Result<Vec<PathBuf>, MoveFailure> {
        call.check_mode(&absolutize(&self.cwd, call.destination))?;
        let (run_dir, args) = self.invocation(call);
        debug!(dir = %run_dir.display(), items = call.sources.len(), "git mv");

        let out = self.git.run(&run_dir, &args).map_err(|e| {
            let binary = self.git.binary().display();
            MoveFailure::new(match e.kind() {
                io::ErrorKind::NotFound => format!("'{binary}': command not found"),
                _ => format!("'{binary}': {e}"),
            })
        })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("git mv exited with {}", out.status)
            } else {
                stderr
            };
            return Err(MoveFailure::new(message));
        }

        if self.verbose {
            for line in String::from_utf8_lossy(&out.stdout).lines() {
                output::print_user(line);
            }
        }
        Ok(call.sources.to_vec())
    }
}
