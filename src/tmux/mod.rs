//! Subprocess plumbing for the external tmux binary.

pub mod queries;
pub mod run;

pub use queries::{Entity, Tmux};
