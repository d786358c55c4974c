//! Command-line arguments.

use std::convert::Infallible;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use metadux_core::path::MetaPath;

use crate::error::CliError;

/// Replay and inspect metadux metadata state.
#[derive(Debug, Parser)]
#[command(name = "metadux", version)]
pub struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, env = "METADUX_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dispatch a JSON array of actions and print the final metadata.
    Replay {
        /// File holding a JSON array of `{type, payload}` actions.
        #[arg(long)]
        actions: PathBuf,
        /// Starting metadata (JSON object). Defaults to the configured
        /// initial metadata.
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Print the value at a path.
    Get {
        /// Metadata file (JSON object).
        #[arg(long)]
        state: PathBuf,
        /// Dot-separated path, e.g. `other.2.key`.
        path: String,
        /// JSON value printed when the path is missing.
        #[arg(long, value_parser = parse_value)]
        default: Option<Value>,
    },

    /// Merge `PATH=VALUE` assignments into the metadata and print it.
    Set {
        /// Starting metadata (JSON object). Defaults to the configured
        /// initial metadata.
        #[arg(long)]
        state: Option<PathBuf>,
        /// Assignments such as `user.name="ada"` or `layout.columns=[1,2]`.
        #[arg(required = true, value_parser = assignment_arg)]
        assignments: Vec<Assignment>,
    },

    /// List the leaf paths of a JSON object.
    Keys {
        /// File holding a JSON object.
        file: PathBuf,
    },
}

/// One `PATH=VALUE` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Where to write.
    pub path: MetaPath,
    /// What to write.
    pub value: Value,
}

/// Read a JSON literal, falling back to a plain string so `dark` works
/// as well as `"dark"`.
fn json_or_string(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn parse_value(raw: &str) -> Result<Value, Infallible> {
    Ok(json_or_string(raw))
}

fn assignment_arg(raw: &str) -> Result<Assignment, String> {
    parse_assignment(raw).map_err(|err| err.to_string())
}

fn parse_assignment(raw: &str) -> Result<Assignment, CliError> {
    let (path, value) = raw
        .split_once('=')
        .filter(|(path, _)| !path.is_empty())
        .ok_or_else(|| CliError::Assignment(raw.to_owned()))?;
    Ok(Assignment {
        path: MetaPath::parse(path),
        value: json_or_string(value),
    })
}
