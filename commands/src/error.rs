//! Error type for building and running commands.

use gitargs_core::BindError;
use gitargs_exec::ExecError;
use thiserror::Error;

/// Errors from binding a command's arguments or executing it.
#[derive(Debug, Error)]
pub enum Error {
    /// No registered command has this name.
    #[error("unknown command: `{0}`")]
    UnknownCommand(String),

    /// The call's arguments do not match the command's schema.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Execution options could not be decoded, or git failed.
    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
