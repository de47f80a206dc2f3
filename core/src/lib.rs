//! Declarative argument schemas for git commands.
//!
//! A command declares, in order, the options and operands it accepts:
//!
//! - [`FlagSpec`] — a boolean switch (`--all`, `--no-verify`).
//! - [`ValueSpec`] — an option with a value (`--message msg`, `--depth=1`),
//!   optionally repeatable or rendered as bare operands.
//! - [`FlagOrValueSpec`] — a flag when `true`, a value when a string.
//! - [`KeyValueSpec`] — a map rendered as repeated `--flag key=value`.
//! - [`OperandSpec`] — a positional slot; at most one may be repeatable.
//! - [`CustomSpec`] — an option rendered by a caller-supplied encoder.
//! - literals, execution options and conflict groups on [`SchemaBuilder`].
//!
//! [`Schema::bind`] validates a call's positional values and named
//! [`Options`] against the schema and produces [`BoundArgs`]: the rendered
//! command-line tokens plus every resolved value.
//!
//! Schemas are immutable once built and can be shared across threads.
//!
//! # Example
//!
//! ```
//! use gitargs_core::*;
//!
//! let commit = Schema::define(|s| {
//!     s.flag(["all", "a"])
//!         .value(ValueSpec::new(["message", "m"]).args("-m"))
//!         .flag(FlagSpec::new("verify").negatable())
//!         .operand(OperandSpec::new("paths").repeatable().separator("--"))
//! })
//! .unwrap();
//!
//! let bound = commit
//!     .bind(
//!         &[Value::from("src/lib.rs")],
//!         &Options::new().with("a", true).with("message", "fix").with("verify", false),
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     bound.tokens(),
//!     ["--all", "-m", "fix", "--no-verify", "--", "src/lib.rs"]
//! );
//! assert!(bound.flag("all"));
//! ```

mod binder;
mod bound;
mod error;
mod operands;
mod render;
mod schema;
mod spec;
mod validate;
mod value;

pub use bound::BoundArgs;
pub use error::{BindError, DefinitionError};
pub use schema::{Schema, SchemaBuilder};
pub use spec::{
    ArgsOverride, Constraints, CustomSpec, Encoder, FlagOrValueSpec, FlagSpec, KeyValueSpec, Names,
    OperandSpec, Validator, ValueSpec,
};
pub use validate::looks_like_option;
pub use value::{Options, Value, ValueKind};
