//! Git commands defined as argument schemas.
//!
//! Each command is a `static` [`GitCommand`] whose schema is built on first
//! use. [`GitCommand::build`] turns a call into an argv (subcommand name plus
//! rendered tokens) and [`GitCommand::run`] hands it to any
//! [`Execute`](gitargs_exec::Execute) implementation.
//!
//! Every command accepts the `timeout`, `chdir` and `env` execution options;
//! `commit` also accepts `input` for use with `--file -`.
//!
//! # Example
//!
//! ```
//! use gitargs_commands::COMMIT;
//! use gitargs_core::{Options, Value};
//!
//! let invocation = COMMIT
//!     .build(
//!         &[Value::from("src/lib.rs")],
//!         &Options::new().with("message", "Fix parser").with("timeout", 30),
//!     )
//!     .unwrap();
//! assert_eq!(
//!     invocation.argv,
//!     ["commit", "-m", "Fix parser", "--", "src/lib.rs"]
//! );
//! assert_eq!(invocation.options.timeout.map(|t| t.as_secs()), Some(30));
//! ```

mod add;
mod checkout;
mod command;
mod commit;
mod diff;
mod error;
mod log;
mod mv;
mod rm;

pub use add::ADD;
pub use checkout::CHECKOUT;
pub use command::{GitCommand, Invocation};
pub use commit::COMMIT;
pub use diff::DIFF;
pub use error::{Error, Result};
pub use log::LOG;
pub use mv::MV;
pub use rm::RM;

static ALL: [&GitCommand; 7] = [&ADD, &CHECKOUT, &COMMIT, &DIFF, &LOG, &MV, &RM];

/// Every registered command, sorted by name.
pub fn all() -> &'static [&'static GitCommand] {
    &ALL
}

/// Finds a registered command by name.
pub fn lookup(name: &str) -> Option<&'static GitCommand> {
    ALL.iter().copied().find(|cmd| cmd.name() == name)
}

/// Like [`lookup`], but reports unknown names as [`Error::UnknownCommand`].
///
/// # Errors
///
/// Returns [`Error::UnknownCommand`] when no command has this name.
pub fn require(name: &str) -> Result<&'static GitCommand> {
    lookup(name).ok_or_else(|| Error::UnknownCommand(name.to_string()))
}
