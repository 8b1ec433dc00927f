//! scry: an interactive window switcher for a tmux session group.
//!
//! The binary wraps the external `tmux` binary in a simple synchronous loop:
//! list the group's windows, render them as a column table, prompt for a
//! command, and hand the terminal over to `tmux attach-session` until the
//! user detaches.

pub mod config;
pub mod dump;
pub mod error;
pub mod history;
pub mod logging;
pub mod repl;
pub mod table;
pub mod term;
pub mod tmux;
