//! Plain move, performed in-process with `mv` semantics.

use std::path::{Path, PathBuf};
use tracing::warn;

use super::{render_command, Invocation, MoveFailure, Mover};
use crate::fs_ops::{relocate, MoveOptions};
use crate::output;

#[derive(Debug, Clone, Copy)]
pub struct PlainMover {
    preserve_metadata: bool,
    verbose: bool,
}

impl Default for PlainMover {
    fn default() -> Self {
        Self {
            preserve_metadata: true,
            verbose: false,
        }
    }
}

impl PlainMover {
    pub fn new(preserve_metadata: bool) -> Self {
        Self {
            preserve_metadata,
            ..Self::default()
        }
    }

    /// Print one `renamed 'a' -> 'b'` line per moved source.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Mover for PlainMover {
    fn primitive(&self) -> &'static str {
        "mv"
    }

    fn describe(&self, call: &Invocation<'_>) -> String {
        let mut parts = vec!["mv".to_string()];
        if call.overwrite {
            parts.push("-f".into());
        }
        if self.verbose {
            parts.push("-v".into());
        }
        parts.push("--".into());
        parts.extend(call.sources.iter().map(|s| s.to_string_lossy().into_owned()));
        parts.push(call.destination.to_string_lossy().into_owned());
        render_command(parts)
    }

    /// Sources are moved one by one in the planned mode; a failing source does not stop the rest.
    fn move_all(&self, call: &Invocation<'_>) -> Result<Vec<PathBuf>, MoveFailure> {
        call.check_mode(call.destination)?;
        let destination = call.destination;
        let opts = MoveOptions {
            overwrite: call.overwrite,
            preserve_metadata: self.preserve_metadata,
        };
        let sources = call.sources;
        let mut moved = Vec::with_capacity(sources.len());
        let mut errors: Vec<String> = Vec::new();

        for src in sources {
            let target = if call.into_directory {
                match src.file_name() {
                    Some(name) => destination.join(name),
                    None => {
                        errors.push(format!("cannot move '{}': invalid source name", src.display()));
                        continue;
                    }
                }
            } else {
                destination.to_path_buf()
            };

            match relocate(src, &target, opts) {
                Ok(()) => {
                    if self.verbose {
                        output::print_user(&format!("renamed '{}' -> '{}'", src.display(), target.display()));
                    }
                    moved.push(src.clone());
                }
                Err(e) => {
                    warn!(src = %src.display(), dest = %target.display(), error = %e, "plain move failed");
                    errors.push(format!("{e:#}"));
                }
            }
        }

        if errors.is_empty() {
            Ok(moved)
        } else {
            Err(MoveFailure {
                moved,
                message: errors.join("; "),
            })
        }
    }
}
