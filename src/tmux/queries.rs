//! Entity queries built on the tmux runner and format parser.

use std::collections::HashMap;

use rand::Rng;

use crate::error::{ScryError, TmuxError};

use super::run::{run_tmux, run_tmux_interactive, TmuxFormat};

const SESSION_FIELDS: &[&str] = &[
    "session_id",
    "session_name",
    "session_attached",
    "session_group",
];
const WINDOW_FIELDS: &[&str] = &["window_id", "window_name", "window_active_clients"];

/// A session or window record returned by a listing query.
///
/// Entities are ephemeral views onto tmux-owned state; they are re-fetched on
/// every loop iteration and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Opaque tmux identifier (`$n` for sessions, `@n` for windows).
    pub id: String,
    pub name: String,
    /// Attachment indicator: client count for windows, 0/1 for sessions.
    pub activity: String,
    /// Owning session group; present for session records only.
    pub group: Option<String>,
}

impl Entity {
    /// True when the entity currently has attached clients.
    pub fn is_active(&self) -> bool {
        !self.activity.is_empty() && self.activity != "0"
    }
}

/// Handle for issuing commands against one tmux binary.
#[derive(Debug, Clone)]
pub struct Tmux {
    binary: String,
}

impl Tmux {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// List all sessions, sorted by name. Empty when no server is running.
    pub fn list_sessions(&self) -> Result<Vec<Entity>, ScryError> {
        let fmt = TmuxFormat::new(SESSION_FIELDS);
        let output = match run_tmux(&self.binary, &["list-sessions", "-F", &fmt.format_arg()]) {
            Ok(output) => output,
            Err(TmuxError::NoServer) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut sessions: Vec<Entity> = output
            .lines()
            .map(|line| session_from_fields(fmt.parse_line(line)))
            .collect();
        sessions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sessions)
    }

    /// List the windows of a session group, sorted by name. Empty when no
    /// server is running.
    pub fn list_windows(&self, group: &str) -> Result<Vec<Entity>, ScryError> {
        let fmt = TmuxFormat::new(WINDOW_FIELDS);
        let args = ["list-windows", "-t", group, "-F", &fmt.format_arg()];
        let output = match run_tmux(&self.binary, &args) {
            Ok(output) => output,
            Err(TmuxError::NoServer) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut windows: Vec<Entity> = output
            .lines()
            .map(|line| window_from_fields(fmt.parse_line(line)))
            .collect();
        windows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(windows)
    }

    pub fn session_exists(&self, name: &str) -> Result<bool, ScryError> {
        Ok(self.list_sessions()?.iter().any(|s| s.name == name))
    }

    pub fn window_exists(&self, name: &str, group: &str) -> Result<bool, ScryError> {
        Ok(self.list_windows(group)?.iter().any(|w| w.name == name))
    }

    /// Create a detached session bound to `group` and return its name.
    ///
    /// Without an explicit name, generates an 8-digit random numeric name,
    /// regenerating until it does not collide with an existing session.
    pub fn create_detached_session(
        &self,
        group: &str,
        name: Option<&str>,
    ) -> Result<String, ScryError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => {
                let mut candidate = random_scratch_name();
                while self.session_exists(&candidate)? {
                    candidate = random_scratch_name();
                }
                candidate
            }
        };
        run_tmux(
            &self.binary,
            &["new-session", "-s", &name, "-d", "-t", group],
        )?;
        Ok(name)
    }

    /// Create the group's root session. Used to bootstrap an empty group.
    pub fn create_group_session(&self, group: &str) -> Result<(), ScryError> {
        run_tmux(&self.binary, &["new-session", "-d", "-s", group])?;
        Ok(())
    }

    /// Create a new detached window in `group`.
    ///
    /// Fails if the group does not exist or the window name is taken.
    pub fn create_detached_window(&self, name: &str, group: &str) -> Result<(), ScryError> {
        if !self.session_exists(group)? {
            return Err(ScryError::NotFound(format!(
                "session group {group} does not exist"
            )));
        }
        if self.window_exists(name, group)? {
            return Err(ScryError::Validation(format!(
                "window {name} already exists in session group {group}"
            )));
        }
        run_tmux(&self.binary, &["new-window", "-t", group, "-n", name, "-d"])?;
        Ok(())
    }

    /// Attach to a window through an unattached scratch session of the group.
    ///
    /// Scratch sessions are distinguished solely by their 8-digit numeric
    /// names; that convention must be preserved for compatibility. When no
    /// unattached scratch session exists, one is created. Blocks until the
    /// user detaches.
    pub fn attach_window(&self, window_id: &str, group: &str) -> Result<(), ScryError> {
        let sessions = self.list_sessions()?;
        let session = sessions
            .iter()
            .find(|s| {
                s.group.as_deref() == Some(group) && is_scratch_name(&s.name) && !s.is_active()
            })
            .map(|s| s.id.clone());

        let session = match session {
            Some(id) => id,
            None => self.create_detached_session(group, None)?,
        };

        let target = format!("{session}:{window_id}");
        run_tmux_interactive(&self.binary, &["attach-session", "-t", &target])?;
        Ok(())
    }
}

/// True for names following the scratch-session convention: exactly 8
/// ASCII digits.
pub(crate) fn is_scratch_name(name: &str) -> bool {
    name.len() == 8 && name.chars().all(|c| c.is_ascii_digit())
}

fn random_scratch_name() -> String {
    rand::thread_rng().gen_range(10_000_000u32..=99_999_999).to_string()
}

fn session_from_fields(mut fields: HashMap<&'static str, String>) -> Entity {
    Entity {
        id: fields.remove("session_id").unwrap_or_default(),
        name: fields.remove("session_name").unwrap_or_default(),
        activity: fields.remove("session_attached").unwrap_or_default(),
        group: fields.remove("session_group"),
    }
}

fn window_from_fields(mut fields: HashMap<&'static str, String>) -> Entity {
    Entity {
        id: fields.remove("window_id").unwrap_or_default(),
        name: fields.remove("window_name").unwrap_or_default(),
        activity: fields.remove("window_active_clients").unwrap_or_default(),
        group: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmux::run::TmuxFormat;

    #[test]
    fn scratch_names_are_exactly_eight_digits() {
        assert!(is_scratch_name("12345678"));
        assert!(!is_scratch_name("1234567"));
        assert!(!is_scratch_name("123456789"));
        assert!(!is_scratch_name("1234567a"));
        assert!(!is_scratch_name("main"));
    }

    #[test]
    fn random_scratch_name_is_valid() {
        for _ in 0..32 {
            assert!(is_scratch_name(&random_scratch_name()));
        }
    }

    #[test]
    fn session_entity_from_parsed_line() {
        let fmt = TmuxFormat::new(SESSION_FIELDS);
        let line = "$2__SEPARATOR__main__SEPARATOR__1__SEPARATOR__main";
        let entity = session_from_fields(fmt.parse_line(line));
        assert_eq!(entity.id, "$2");
        assert_eq!(entity.name, "main");
        assert_eq!(entity.group.as_deref(), Some("main"));
        assert!(entity.is_active());
    }

    #[test]
    fn window_entity_from_parsed_line() {
        let fmt = TmuxFormat::new(WINDOW_FIELDS);
        let line = "@7__SEPARATOR__editor__SEPARATOR__0";
        let entity = window_from_fields(fmt.parse_line(line));
        assert_eq!(entity.id, "@7");
        assert_eq!(entity.name, "editor");
        assert!(entity.group.is_none());
        assert!(!entity.is_active());
    }

    #[test]
    fn missing_activity_field_counts_as_inactive() {
        let entity = window_from_fields(HashMap::new());
        assert!(!entity.is_active());
    }
}
