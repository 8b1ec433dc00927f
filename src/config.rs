//! Configuration loading from TOML files.
//!
//! Config is layered in this order of precedence (highest wins):
//! 1. Command-line flags (applied in `main.rs`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./scry.toml in the current directory
//! 4. $XDG_CONFIG_HOME/scry/scry.toml (or ~/.config/scry/scry.toml)
//! 5. Built-in defaults
//!
//! The loaded config is immutable once the interactive loop starts.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_MIN_NAME_LEN: usize = 15;
const DEFAULT_COLUMNS: usize = 4;
const DEFAULT_FMT_OVERHEAD: usize = 6;
const DEFAULT_GROUP: &str = "main";
const DEFAULT_TMUX_BINARY: &str = "tmux";
const DEFAULT_LOG_FILE: &str = "/tmp/scry.log";

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub ui: UiConfig,
    pub tmux: TmuxConfig,
    pub log: LogConfig,
    pub dump: DumpConfig,
}

/// Table layout and styling preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Minimum characters of a window name each column must be able to show.
    pub min_name_len: usize,
    /// Preferred column count; narrow terminals get fewer.
    pub columns: usize,
    /// Fixed per-cell formatting overhead in characters.
    pub fmt_overhead: usize,
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            min_name_len: DEFAULT_MIN_NAME_LEN,
            columns: DEFAULT_COLUMNS,
            fmt_overhead: DEFAULT_FMT_OVERHEAD,
            color: true,
        }
    }
}

/// External tmux settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TmuxConfig {
    /// Session group whose windows the table navigates.
    pub group: String,
    /// Binary name or path to invoke.
    pub binary: String,
}

impl Default for TmuxConfig {
    fn default() -> Self {
        Self {
            group: DEFAULT_GROUP.into(),
            binary: DEFAULT_TMUX_BINARY.into(),
        }
    }
}

/// File logging settings. The interactive screen is never a log target.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log at DEBUG level instead of WARN.
    pub debug: bool,
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// Window-name dump settings (the `d`/`l` commands).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    pub file: PathBuf,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            file: default_dump_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    ui: UiConfig,
    tmux: TmuxConfig,
    log: LogConfig,
    dump: DumpConfig,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from disk.
///
/// `path_override` is an explicit config file path (from --config flag) and
/// fails loudly when the file is missing; the default locations fall back to
/// built-in defaults.
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    let config_text = if let Some(p) = path_override {
        std::fs::read_to_string(p)?
    } else if let Ok(text) = std::fs::read_to_string("scry.toml") {
        text
    } else if let Some(dir) = config_root_dir() {
        std::fs::read_to_string(dir.join("scry").join("scry.toml")).unwrap_or_default()
    } else {
        String::new()
    };

    let parsed: FileConfig = toml::from_str(&config_text)?;
    let config = Config {
        ui: parsed.ui,
        tmux: parsed.tmux,
        log: parsed.log,
        dump: parsed.dump,
    };
    validate(&config)?;
    Ok(config)
}

/// Reject option values the table layout cannot work with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.ui.columns == 0 {
        return Err(ConfigError::Invalid(
            "ui.columns must be at least 1".to_string(),
        ));
    }
    if config.ui.min_name_len == 0 {
        return Err(ConfigError::Invalid(
            "ui.min_name_len must be at least 1".to_string(),
        ));
    }
    if config.tmux.group.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "tmux.group must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn default_dump_path() -> PathBuf {
    config_root_dir()
        .map(|dir| dir.join("scry").join("windows.yaml"))
        .unwrap_or_else(|| PathBuf::from("scry-windows.yaml"))
}

pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
