//! Error types for the `metadux` binary.
//!
//! [`CliError`] wraps every failure a command can hit, so `main` can
//! propagate a single type with `?`.

use std::path::PathBuf;

use metadux_core::ConfigError;

/// Top-level error for the `metadux` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An input file is not valid JSON, or not the expected JSON shape.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// The file that was being parsed.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// A state or tree file holds JSON that is not an object.
    #[error("{} must contain a JSON object", path.display())]
    NotAnObject {
        /// The offending file.
        path: PathBuf,
    },

    /// A `PATH=VALUE` assignment is malformed.
    #[error("assignment `{0}` must look like PATH=VALUE")]
    Assignment(String),

    /// The requested path has no value and no default was given.
    #[error("no value at `{0}`")]
    NotFound(String),

    /// Output could not be encoded.
    #[error("failed to encode output: {source}")]
    Encode {
        /// The underlying encode error.
        #[from]
        source: serde_json::Error,
    },
}
