//! Execution of rendered git argument vectors.
//!
//! - [`Execute`] — the seam between commands and the process that runs them.
//! - [`GitRunner`] — spawns git with a timeout, configured by
//!   [`RunnerConfig`] (loadable from YAML).
//! - [`ExecOptions`] — per-call options decoded from a bind's execution
//!   options (`timeout`, `chdir`, `env`, `input`).
//! - [`GitVersion`] — parsed `git --version` output.
//!
//! # Example
//!
//! ```no_run
//! use gitargs_exec::{ExecOptions, Execute, GitRunner, RunnerConfig};
//!
//! let runner = GitRunner::new(RunnerConfig::default().with_work_dir("/srv/repo"));
//! let output = runner
//!     .execute(&["status".into(), "--short".into()], &ExecOptions::new())
//!     .unwrap();
//! print!("{}", output.stdout);
//! ```

mod config;
mod error;
mod options;
mod runner;
mod version;

pub use config::RunnerConfig;
pub use error::{ExecError, Result};
pub use options::ExecOptions;
pub use runner::{CommandOutput, Execute, GitRunner};
pub use version::GitVersion;
