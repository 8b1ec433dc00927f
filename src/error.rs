//! Unified error types for scry.

use std::fmt;

// ---------------------------------------------------------------------------
// TmuxError
// ---------------------------------------------------------------------------

/// Errors from invoking the external tmux binary.
///
/// The runner classifies known failure modes at the subprocess boundary so
/// callers can match on variants instead of re-parsing stderr text.
#[derive(Debug)]
pub enum TmuxError {
    /// The configured binary could not be spawned.
    Spawn(std::io::Error),
    /// tmux reported that no server is running. Benign for list commands.
    NoServer,
    /// tmux rejected a window name.
    BadWindowName,
    /// Any other nonzero exit, with the captured stderr text.
    Failed { code: Option<i32>, stderr: String },
}

impl fmt::Display for TmuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to run tmux: {e}"),
            Self::NoServer => write!(f, "no tmux server running"),
            Self::BadWindowName => write!(f, "bad window name"),
            Self::Failed { code, stderr } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                write!(f, "tmux exited with {code}: {}", stderr.trim_end())
            }
        }
    }
}

impl std::error::Error for TmuxError {}

impl From<std::io::Error> for TmuxError {
    fn from(e: std::io::Error) -> Self {
        Self::Spawn(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// ScryError (top level)
// ---------------------------------------------------------------------------

/// Top-level error type for the interactive loop.
#[derive(Debug)]
pub enum ScryError {
    Tmux(TmuxError),
    Config(ConfigError),
    /// A user-supplied name failed validation.
    Validation(String),
    /// A requested entity does not exist.
    NotFound(String),
    /// Entity count exceeded the display sanity ceiling.
    TooManyEntities(usize),
    /// A window dump could not be serialized or parsed.
    Yaml(serde_yaml_ng::Error),
    Io(std::io::Error),
}

impl fmt::Display for ScryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tmux(e) => write!(f, "tmux: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::NotFound(msg) => write!(f, "{msg}"),
            Self::TooManyEntities(n) => {
                write!(f, "you have {n} windows, which is too many")
            }
            Self::Yaml(e) => write!(f, "yaml: {e}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for ScryError {}

impl From<serde_yaml_ng::Error> for ScryError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        Self::Yaml(e)
    }
}

impl From<TmuxError> for ScryError {
    fn from(e: TmuxError) -> Self {
        Self::Tmux(e)
    }
}

impl From<ConfigError> for ScryError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<std::io::Error> for ScryError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
