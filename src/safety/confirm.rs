//! Confirmation capability.
//! The gate only sees the trait, so tests can answer deterministically.

use std::io::{self, BufRead, Write};

use crate::errors::SmartmvError;
use crate::shutdown::{self, PromptGuard};

/// Asks the user to approve a whole plan.
pub trait Confirm {
    /// Show `summary` and return whether the user agreed.
    fn confirm(&mut self, summary: &str) -> Result<bool, SmartmvError>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, summary: &str) -> Result<bool, SmartmvError> {
        Ok(self(summary))
    }
}

/// Prompts on stdout and reads `y`/`n` answers from stdin until one is given.
/// End of input counts as "no".
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, summary: &str) -> Result<bool, SmartmvError> {
        let _prompt = PromptGuard::enter();
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout();

        let _ = writeln!(out, "{summary}");
        loop {
            let _ = write!(out, "Execute? [y,n] ");
            let _ = out.flush();

            let mut line = String::new();
            let read = input
                .read_line(&mut line)
                .map_err(|_| SmartmvError::UserAborted)?;
            if shutdown::is_requested() {
                return Err(SmartmvError::UserAborted);
            }
            if read == 0 {
                let _ = writeln!(out);
                return Ok(false);
            }
            match parse_answer(&line) {
                Some(answer) => return Ok(answer),
                None => continue,
            }
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
