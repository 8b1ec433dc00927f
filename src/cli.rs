//! CLI argument parsing via clap.

use clap::Parser;
use scry::config::Config;
use std::path::PathBuf;

/// Interactive window switcher for a tmux session group.
#[derive(Debug, Parser)]
#[command(name = "scry", version)]
pub struct Args {
    /// Path to config file (default: ./scry.toml or ~/.config/scry/scry.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Session group whose windows to navigate.
    #[arg(short = 'g', long = "group")]
    pub group: Option<String>,

    /// Preferred number of table columns.
    #[arg(long = "columns")]
    pub columns: Option<usize>,

    /// Minimum window-name characters each column must show.
    #[arg(long = "min-name-len")]
    pub min_name_len: Option<usize>,

    /// tmux binary name or path.
    #[arg(long = "tmux")]
    pub tmux: Option<String>,

    /// Log at debug level.
    #[arg(long = "debug")]
    pub debug: bool,

    /// Log file path.
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Dump file path for the `d` and `l` commands.
    #[arg(long = "dump-file")]
    pub dump_file: Option<PathBuf>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Args {
    /// Apply the flags onto a loaded config. Flags always win over file
    /// values; absent flags leave the config untouched.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(group) = &self.group {
            config.tmux.group = group.clone();
        }
        if let Some(binary) = &self.tmux {
            config.tmux.binary = binary.clone();
        }
        if let Some(columns) = self.columns {
            config.ui.columns = columns;
        }
        if let Some(min_name_len) = self.min_name_len {
            config.ui.min_name_len = min_name_len;
        }
        if self.debug {
            config.log.debug = true;
        }
        if let Some(log_file) = &self.log_file {
            config.log.file = log_file.clone();
        }
        if let Some(dump_file) = &self.dump_file {
            config.dump.file = dump_file.clone();
        }
        if self.no_color {
            config.ui.color = false;
        }
    }
}
