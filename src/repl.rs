//! The interactive loop: list, render, prompt, dispatch, attach.

use std::collections::HashSet;
use std::io::Write;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::Config;
use crate::dump;
use crate::error::{ScryError, TmuxError};
use crate::history::History;
use crate::table;
use crate::term;
use crate::tmux::{Entity, Tmux};

const PROMPT: &str = "Attach [##/n/q/s/u/?/d/l]:";

const HELP: &[(&str, &str)] = &[
    ("<Enter>", "attach the most recently attached window"),
    ("##", "attach the window at that index"),
    ("n <name>", "create a new window and attach it"),
    ("s", "swap to the previously attached window"),
    ("u", "redraw the table"),
    ("d", "dump window names to the YAML dump file"),
    ("l", "load window names from the YAML dump file"),
    ("?", "show this help"),
    ("q", "quit"),
];

/// A parsed prompt input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Empty input: attach the most recent window again.
    Reattach,
    /// `s`: attach the second most recent window.
    Swap,
    /// `n <name>`: create a window. `None` when the name was omitted.
    New(Option<String>),
    /// A bare number: attach by table index.
    Index(usize),
    Quit,
    Help,
    Redraw,
    Dump,
    Load,
    Unknown(String),
}

/// Parse one line of prompt input into a command.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::Reattach;
    }
    if input.chars().all(|c| c.is_ascii_digit()) {
        // Digits past usize still mean "index"; saturate so the dispatch
        // range check reports it as invalid rather than unrecognized.
        return Command::Index(input.parse().unwrap_or(usize::MAX));
    }
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, Some(rest.trim())),
        None => (input, None),
    };
    match (head, rest) {
        ("q", None) => Command::Quit,
        ("s", None) => Command::Swap,
        ("u", None) => Command::Redraw,
        ("?", None) => Command::Help,
        ("d", None) => Command::Dump,
        ("l", None) => Command::Load,
        ("n", rest) => Command::New(rest.map(str::to_string)),
        _ => Command::Unknown(input.to_string()),
    }
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w+\-.]+$").unwrap())
}

/// Client-side window-name check, stricter than what tmux itself accepts.
pub fn is_valid_window_name(name: &str) -> bool {
    name_regex().is_match(name)
}

/// All mutable state of one interactive session.
///
/// tmux owns the windows; the repl only tracks recency history and the
/// one-shot status message shown under the table.
pub struct Repl {
    config: Config,
    tmux: Tmux,
    history: History,
    message: Option<String>,
}

impl Repl {
    pub fn new(config: Config) -> Self {
        let tmux = Tmux::new(config.tmux.binary.clone());
        Self {
            config,
            tmux,
            history: History::new(),
            message: None,
        }
    }

    /// Run until the user quits or stdin reaches EOF.
    pub fn run(&mut self) -> Result<(), ScryError> {
        loop {
            let windows = match self.tmux.list_windows(&self.config.tmux.group) {
                Ok(windows) => windows,
                Err(e) => {
                    tracing::warn!(error = %e, "window listing failed");
                    self.message = Some(e.to_string());
                    Vec::new()
                }
            };

            // A group always has at least one window, so an empty listing
            // means the group session itself is missing.
            if windows.is_empty() {
                match self.bootstrap_group() {
                    Ok(true) => continue,
                    Ok(false) => {}
                    Err(e) => {
                        self.message = Some(format!("cannot create session group: {e}"));
                    }
                }
            }

            let ids: HashSet<&str> = windows.iter().map(|w| w.id.as_str()).collect();
            self.history.prune_if_stale(&ids);

            self.draw(&windows)?;

            let Some(input) = term::read_prompt(PROMPT, self.config.ui.color)? else {
                return Ok(());
            };
            self.dispatch(parse_command(&input), &windows)?;
        }
    }

    /// Create the group session if it does not exist yet. Returns whether a
    /// session was created.
    fn bootstrap_group(&self) -> Result<bool, ScryError> {
        let group = &self.config.tmux.group;
        if self.tmux.session_exists(group)? {
            return Ok(false);
        }
        tracing::debug!(%group, "creating session group");
        self.tmux.create_group_session(group)?;
        Ok(true)
    }

    fn draw(&mut self, windows: &[Entity]) -> Result<(), ScryError> {
        let (width, height) = term::terminal_size();
        term::clear_screen()?;
        let mut out = std::io::stdout();
        let mut lines =
            table::render_table(&mut out, windows, &self.history, width, &self.config.ui)?;
        if let Some(message) = self.message.take() {
            writeln!(out, "{message}")?;
            lines += 1;
        }
        term::pad_to_bottom(&mut out, lines, height)?;
        out.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, command: Command, windows: &[Entity]) -> Result<(), ScryError> {
        match command {
            Command::Quit => std::process::exit(0),
            Command::Redraw => {}
            Command::Help => self.show_help()?,
            // With no history to go back to, both are silent no-ops and the
            // table is simply drawn again.
            Command::Reattach => {
                if let Some(id) = self.history.most_recent().map(str::to_string) {
                    self.attach(&id)?;
                }
            }
            Command::Swap => {
                if let Some(id) = self.history.second_most_recent().map(str::to_string) {
                    self.attach(&id)?;
                }
            }
            Command::Index(index) => match windows.get(index) {
                Some(window) => {
                    let id = window.id.clone();
                    self.attach(&id)?;
                }
                None => self.message = Some("Invalid index".to_string()),
            },
            Command::New(None) => self.message = Some("usage: n <name>".to_string()),
            Command::New(Some(name)) => self.create_and_attach(&name)?,
            Command::Dump => self.dump_windows(windows),
            Command::Load => self.load_windows(windows),
            Command::Unknown(input) => {
                self.message = Some(format!("command \"{input}\" not recognized"));
            }
        }
        Ok(())
    }

    /// Promote `window_id` in history and hand the terminal to tmux until
    /// the user detaches.
    fn attach(&mut self, window_id: &str) -> Result<(), ScryError> {
        self.history.promote(window_id);
        if let Err(e) = self.tmux.attach_window(window_id, &self.config.tmux.group) {
            tracing::warn!(%window_id, error = %e, "attach failed");
            self.message = Some(e.to_string());
        }
        Ok(())
    }

    fn create_and_attach(&mut self, name: &str) -> Result<(), ScryError> {
        if !is_valid_window_name(name) {
            self.message = Some("Invalid window name!".to_string());
            return Ok(());
        }
        match self.tmux.create_detached_window(name, &self.config.tmux.group) {
            Ok(()) => {}
            Err(ScryError::Tmux(TmuxError::BadWindowName)) => {
                self.message = Some("Invalid tmux window name".to_string());
                return Ok(());
            }
            Err(e) => {
                self.message = Some(e.to_string());
                return Ok(());
            }
        }
        // Re-list to learn the new window's id. A concurrent rename or kill
        // can make it vanish before we see it; just fall back to the table.
        // Like attach, a tmux failure here only cancels this action.
        let windows = match self.tmux.list_windows(&self.config.tmux.group) {
            Ok(windows) => windows,
            Err(e) => {
                tracing::warn!(%name, error = %e, "re-listing after window creation failed");
                self.message = Some(e.to_string());
                return Ok(());
            }
        };
        if let Some(window) = windows.iter().find(|w| w.name == name) {
            let id = window.id.clone();
            self.attach(&id)?;
        } else {
            tracing::debug!(%name, "window disappeared before attach");
        }
        Ok(())
    }

    fn dump_windows(&mut self, windows: &[Entity]) {
        let path = self.config.dump.file.clone();
        self.message = Some(match dump::dump_windows(&path, windows) {
            Ok(count) => format!("dumped {count} window names to {}", path.display()),
            Err(e) => format!("dump failed: {e}"),
        });
    }

    fn load_windows(&mut self, windows: &[Entity]) {
        let path = self.config.dump.file.clone();
        let group = self.config.tmux.group.clone();
        self.message = Some(
            match dump::load_windows(&path, &self.tmux, &group, windows) {
                Ok(count) => format!("created {count} windows from {}", path.display()),
                Err(e) => format!("load failed: {e}"),
            },
        );
    }

    fn show_help(&self) -> Result<(), ScryError> {
        term::clear_screen()?;
        let mut out = std::io::stdout();
        for (key, description) in HELP {
            writeln!(out, "  {key:<10} {description}")?;
        }
        writeln!(out)?;
        write!(out, "[Enter to continue]")?;
        out.flush()?;
        term::read_line()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_means_reattach() {
        assert_eq!(parse_command(""), Command::Reattach);
        assert_eq!(parse_command("   "), Command::Reattach);
    }

    #[test]
    fn bare_numbers_are_indices() {
        assert_eq!(parse_command("0"), Command::Index(0));
        assert_eq!(parse_command("12"), Command::Index(12));
        assert_eq!(parse_command("007"), Command::Index(7));
    }

    #[test]
    fn single_letter_commands() {
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command("s"), Command::Swap);
        assert_eq!(parse_command("u"), Command::Redraw);
        assert_eq!(parse_command("?"), Command::Help);
        assert_eq!(parse_command("d"), Command::Dump);
        assert_eq!(parse_command("l"), Command::Load);
    }

    #[test]
    fn new_window_takes_a_name() {
        assert_eq!(
            parse_command("n editor"),
            Command::New(Some("editor".to_string()))
        );
        assert_eq!(parse_command("n  editor "), Command::New(Some("editor".to_string())));
        assert_eq!(parse_command("n"), Command::New(None));
    }

    #[test]
    fn digits_past_usize_are_still_an_index() {
        // 25 digits cannot parse into usize; the dispatch range check turns
        // the saturated index into "Invalid index".
        assert_eq!(
            parse_command("1111111111111111111111111"),
            Command::Index(usize::MAX)
        );
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(parse_command("x"), Command::Unknown("x".to_string()));
        assert_eq!(parse_command("q now"), Command::Unknown("q now".to_string()));
        assert_eq!(parse_command("-1"), Command::Unknown("-1".to_string()));
        assert_eq!(parse_command("5x"), Command::Unknown("5x".to_string()));
    }

    #[test]
    fn window_names_allow_word_chars_and_punctuation() {
        assert!(is_valid_window_name("editor"));
        assert!(is_valid_window_name("dev-1.2_x+"));
        assert!(is_valid_window_name("a"));
    }

    #[test]
    fn window_names_reject_spaces_and_shell_metacharacters() {
        assert!(!is_valid_window_name(""));
        assert!(!is_valid_window_name("two words"));
        assert!(!is_valid_window_name("semi;colon"));
        assert!(!is_valid_window_name("dollar$"));
        assert!(!is_valid_window_name("path/like"));
    }

    #[test]
    fn reattach_and_swap_with_shallow_history_are_silent_noops() {
        let mut repl = Repl::new(Config::default());
        repl.dispatch(Command::Reattach, &[]).unwrap();
        assert!(repl.message.is_none());
        repl.history.promote("@1");
        repl.dispatch(Command::Swap, &[]).unwrap();
        assert!(repl.message.is_none());
    }

    #[test]
    fn new_window_name_rejection_sets_a_message() {
        let mut repl = Repl::new(Config::default());
        repl.dispatch(Command::New(Some("two words".to_string())), &[])
            .unwrap();
        assert_eq!(repl.message.as_deref(), Some("Invalid window name!"));
    }

    /// A tmux stand-in that accepts window creation but loses the server on
    /// the very next listing.
    #[cfg(unix)]
    fn flaky_tmux(dir: &std::path::Path) -> String {
        use std::os::unix::fs::PermissionsExt;

        let marker = dir.join("created");
        let script = dir.join("tmux-flaky");
        let body = format!(
            "#!/bin/sh\n\
             case \"$1\" in\n\
               list-sessions) printf '%s\\n' '$1__SEPARATOR__main__SEPARATOR__0__SEPARATOR__main' ;;\n\
               list-windows) if [ -f {marker} ]; then echo 'lost server' >&2; exit 1; fi ;;\n\
               new-window) : > {marker} ;;\n\
             esac\n\
             exit 0\n",
            marker = marker.display()
        );
        std::fs::write(&script, body).unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();
        script.to_string_lossy().into_owned()
    }

    #[test]
    #[cfg(unix)]
    fn relist_failure_after_window_creation_only_cancels_the_action() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.tmux.binary = flaky_tmux(dir.path());

        let mut repl = Repl::new(config);
        // Must not propagate an error out of the dispatch path.
        repl.dispatch(Command::New(Some("foo".to_string())), &[])
            .unwrap();
        let message = repl.message.expect("a transient message");
        assert!(message.contains("lost server"), "got: {message}");
    }
}
