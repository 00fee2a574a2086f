//! Crate error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by stdl helpers.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot import module '{module}': {reason}")]
    Import { module: String, reason: String },

    #[error("cannot import '{attr}' from '{module}': {reason}")]
    ImportFrom {
        module: String,
        attr: String,
        reason: String,
    },

    #[error("module '{module}' has no attribute '{attr}'")]
    MissingAttribute { module: String, attr: String },

    #[error("'{name}' is not a {expected}")]
    AttributeType { name: String, expected: &'static str },

    #[error("name '{0}' is not bound")]
    NameNotBound(String),

    #[error("process-wide namespace is already in use on this thread")]
    NamespaceBusy,

    #[error("cannot use alias with named imports")]
    AliasWithNames,

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("path does not exist: '{}'", .0.display())]
    PathNotFound(PathBuf),

    #[error("path already exists: '{}'", .0.display())]
    PathExists(PathBuf),

    #[error("command failed: {cmd} (exit code: {code:?})")]
    CommandFailed { cmd: String, code: Option<i32> },

    #[error(
        "file size {size} ({}) exceeds maximum size limit of {max} bytes ({})",
        readable(.size),
        readable(.max)
    )]
    DownloadSizeExceeded { size: u64, max: u64 },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

fn readable(n: &u64) -> String {
    crate::fs::bytes_readable(*n)
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Shorthand for an input validation failure.
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// True for the error kinds an eager import would also have produced.
    pub fn is_import_error(&self) -> bool {
        matches!(
            self,
            Self::Import { .. } | Self::ImportFrom { .. } | Self::MissingAttribute { .. }
        )
    }
}
