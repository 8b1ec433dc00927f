//! Saving and restoring the set of window names as a YAML file.
//!
//! The dump records names only; contents of windows are not captured. Loading
//! is additive: names already present in the group are left alone.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScryError;
use crate::tmux::{Entity, Tmux};

/// On-disk dump document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpFile {
    pub active_windows: Vec<String>,
}

/// Write the names of `windows` to `path` as YAML, creating parent
/// directories as needed. Returns the number of names written.
pub fn dump_windows(path: &Path, windows: &[Entity]) -> Result<usize, ScryError> {
    let dump = DumpFile {
        active_windows: windows.iter().map(|w| w.name.clone()).collect(),
    };
    let text = serde_yaml_ng::to_string(&dump)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    tracing::debug!(?path, count = dump.active_windows.len(), "dumped window names");
    Ok(dump.active_windows.len())
}

/// Parse a dump file from `path`.
pub fn read_dump(path: &Path) -> Result<DumpFile, ScryError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_yaml_ng::from_str(&text)?)
}

/// Dumped names that do not exist among the current windows, in dump order.
pub fn names_to_create(dump: &DumpFile, current: &[Entity]) -> Vec<String> {
    let existing: HashSet<&str> = current.iter().map(|w| w.name.as_str()).collect();
    dump.active_windows
        .iter()
        .filter(|name| !existing.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Load a dump and create every missing window in `group`.
///
/// Individual creation failures are logged and skipped so one bad name does
/// not abort the rest of the restore. Returns the number of windows created.
pub fn load_windows(
    path: &Path,
    tmux: &Tmux,
    group: &str,
    current: &[Entity],
) -> Result<usize, ScryError> {
    let dump = read_dump(path)?;
    let mut created = 0;
    for name in names_to_create(&dump, current) {
        match tmux.create_detached_window(&name, group) {
            Ok(()) => created += 1,
            Err(e) => tracing::warn!(%name, error = %e, "could not restore window"),
        }
    }
    tracing::debug!(?path, created, "loaded window dump");
    Ok(created)
}
