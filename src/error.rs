//! Error types.
//!
//! Every fatal condition in the pipeline maps to one variant of [`Error`].
//! A cancelled selection is not an error; see [`crate::core::pipeline::Outcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("cannot decrypt '{id}': {source}")]
    Resolve {
        id: String,
        #[source]
        source: ToolError,
    },

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Problems found while building the run configuration.
///
/// All of these are raised before any external tool is started.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("password store '{}' does not exist or is not a directory", .0.display())]
    StoreMissing(PathBuf),

    #[error("cannot determine home directory for the default password store")]
    NoHome,

    #[error("{tool} binary '{path}' does not exist or is not executable")]
    MissingBinary { tool: &'static str, path: String },

    #[error("invalid {what} pattern '{pattern}': {source}")]
    InvalidPattern {
        what: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("username pattern '{pattern}' must contain exactly one capture group, found {groups}")]
    CaptureGroups { pattern: String, groups: usize },

    #[error("config file '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{}': {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read password store: {0}")]
    Walk(#[source] std::io::Error),
}

/// Failure of one external tool invocation.
///
/// `args` is the rendered argument list with secret arguments masked.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to start {}: {source}", command_line(.tool, .args))]
    Spawn {
        tool: String,
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exited with {code}{}", command_line(.tool, .args), stderr_suffix(.stderr))]
    Failed {
        tool: String,
        args: String,
        code: String,
        stderr: String,
    },

    #[error("i/o with {tool} failed: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} produced output that is not valid UTF-8")]
    Utf8 { tool: String },
}

impl ToolError {
    /// Name of the tool that failed.
    pub fn tool(&self) -> &str {
        match self {
            Self::Spawn { tool, .. }
            | Self::Failed { tool, .. }
            | Self::Io { tool, .. }
            | Self::Utf8 { tool } => tool,
        }
    }
}

fn command_line(tool: &str, args: &str) -> String {
    if args.is_empty() {
        tool.to_string()
    } else {
        format!("{} {}", tool, args)
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// One or more delivery steps failed. The individual failures are in the
/// delivery report; this only decides the exit status.
#[derive(Error, Debug)]
#[error("{failed} of {attempted} delivery steps failed")]
pub struct DeliveryError {
    pub failed: usize,
    pub attempted: usize,
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
