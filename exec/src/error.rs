//! Error types for command execution.

use thiserror::Error;

/// Errors raised while preparing or running a git subprocess.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The configured binary does not exist on `PATH`.
    #[error("executable not found: `{0}`")]
    NotFound(String),

    /// The process could not be started.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process exited with a non-zero status.
    #[error("`{command}` exited with status {code}: {}", .stderr.trim())]
    Failed {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// The process was terminated by a signal.
    #[error("`{command}` terminated by signal {signal}")]
    Signaled { command: String, signal: i32 },

    /// The process outlived its timeout and was killed.
    #[error("`{command}` timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },

    /// File or pipe I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Runner configuration could not be parsed or written.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An execution option this runner does not understand.
    #[error("unsupported execution option: `{0}`")]
    UnsupportedOption(String),

    /// A known execution option with a value of the wrong shape.
    #[error("invalid execution option `{name}`: {reason}")]
    InvalidOption { name: String, reason: String },

    /// `--version` output did not contain a version number.
    #[error("could not parse git version from {0:?}")]
    UnparseableVersion(String),
}

/// Convenience alias for results with [`ExecError`].
pub type Result<T> = std::result::Result<T, ExecError>;
