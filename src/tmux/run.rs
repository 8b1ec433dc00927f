//! tmux subprocess execution and `-F` format-line parsing.

use std::collections::HashMap;
use std::process::Command;

use crate::error::TmuxError;

/// Private separator joining format fields.
///
/// If an entity's own data contains this token the fixed-arity split
/// misaligns. Accepted limitation; no escaping.
pub(crate) const FORMAT_SEPARATOR: &str = "__SEPARATOR__";

// Exact stderr fragments tmux prints for conditions callers must tolerate.
// This wording is a compatibility contract with tmux; do not relax it.
const NO_SERVER_FRAGMENT: &str = "no server running";
const BAD_WINDOW_NAME_FRAGMENT: &str = "bad window name";

/// Captured stdout of a successful tmux invocation.
#[derive(Debug)]
pub(crate) struct TmuxOutput {
    stdout: String,
}

impl TmuxOutput {
    pub(crate) fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines()
    }
}

/// Run tmux with the given arguments, capturing stdout and stderr.
///
/// Blocks until the child exits. Nonzero exits are classified into
/// [`TmuxError`] variants at this boundary.
pub(crate) fn run_tmux(binary: &str, args: &[&str]) -> Result<TmuxOutput, TmuxError> {
    tracing::debug!(?args, "running tmux");
    let output = Command::new(binary).args(args).output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::debug!(code = ?output.status.code(), %stderr, "tmux failed");
        return Err(classify_failure(output.status.code(), stderr));
    }
    Ok(TmuxOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

/// Run tmux with inherited stdio, handing the terminal over to it.
///
/// Used for `attach-session`; blocks until the user detaches.
pub(crate) fn run_tmux_interactive(binary: &str, args: &[&str]) -> Result<(), TmuxError> {
    tracing::debug!(?args, "attaching tmux");
    let status = Command::new(binary).args(args).status()?;
    if !status.success() {
        return Err(classify_failure(status.code(), String::new()));
    }
    Ok(())
}

/// Classify a nonzero tmux exit into a structured error.
pub(crate) fn classify_failure(code: Option<i32>, stderr: String) -> TmuxError {
    if stderr.contains(NO_SERVER_FRAGMENT) {
        return TmuxError::NoServer;
    }
    if stderr.contains(BAD_WINDOW_NAME_FRAGMENT) {
        return TmuxError::BadWindowName;
    }
    TmuxError::Failed { code, stderr }
}

/// A requested set of `-F` format fields for a tmux list command.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TmuxFormat {
    fields: &'static [&'static str],
}

impl TmuxFormat {
    pub(crate) fn new(fields: &'static [&'static str]) -> Self {
        Self { fields }
    }

    /// Build the `-F` argument: each field as `#{field}`, joined by the
    /// private separator.
    pub(crate) fn format_arg(&self) -> String {
        self.fields
            .iter()
            .map(|field| format!("#{{{field}}}"))
            .collect::<Vec<_>>()
            .join(FORMAT_SEPARATOR)
    }

    /// Split one output line on the separator and zip against field names.
    ///
    /// Missing trailing values are simply absent from the map.
    pub(crate) fn parse_line(&self, line: &str) -> HashMap<&'static str, String> {
        self.fields
            .iter()
            .copied()
            .zip(line.split(FORMAT_SEPARATOR).map(str::to_string))
            .collect()
    }
}
