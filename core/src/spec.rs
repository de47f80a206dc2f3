//! Declaration specs accepted by [`SchemaBuilder`](crate::SchemaBuilder).
//!
//! Each option-shaped declaration has its own spec type built with chained
//! setters, in the same style as the rest of the crate's builders:
//!
//! ```
//! use gitargs_core::{FlagSpec, OperandSpec, ValueKind, ValueSpec};
//!
//! let force = FlagSpec::new(["force", "f"]).negatable();
//! let message = ValueSpec::new(["message", "m"]).required().allow_nil(false);
//! let depth = ValueSpec::new("depth").types([ValueKind::Integer]).inline();
//! let paths = OperandSpec::new("paths").repeatable().separator("--");
//! # let _ = (force, message, depth, paths);
//! ```
//!
//! A plain `&str` converts into flag, value, flag-or-value and operand
//! specs, so `builder.flag("all")` is the shortest form of a declaration.

use std::fmt;
use std::sync::Arc;

use crate::{Value, ValueKind};

/// Predicate run against a non-nil option value at bind time.
pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Turns a resolved value into the tokens spliced at the declaration's
/// position. An empty vector renders nothing.
pub type Encoder = Arc<dyn Fn(&Value) -> Vec<String> + Send + Sync>;

/// Canonical name plus aliases.
///
/// The first name is canonical and is used for rendering and for
/// [`BoundArgs`](crate::BoundArgs) lookups; aliases are accepted on input
/// only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names(Vec<String>);

impl Names {
    pub fn canonical(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    pub fn aliases(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    pub fn all(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Names {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for Names {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl<const N: usize> From<[&str; N]> for Names {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<&str>> for Names {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for Names {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

/// Replacement for the token(s) derived from an option's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsOverride {
    /// A single token, e.g. `-m` in place of `--message`.
    Token(String),
    /// Several tokens emitted together; only valid on non-negatable flags.
    Tokens(Vec<String>),
}

impl From<&str> for ArgsOverride {
    fn from(token: &str) -> Self {
        Self::Token(token.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for ArgsOverride {
    fn from(tokens: [&str; N]) -> Self {
        Self::Tokens(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl From<Vec<&str>> for ArgsOverride {
    fn from(tokens: Vec<&str>) -> Self {
        Self::Tokens(tokens.into_iter().map(String::from).collect())
    }
}

/// Bind-time checks shared by every option-shaped declaration.
#[derive(Clone, Default)]
pub struct Constraints {
    pub required: bool,
    pub allow_nil: bool,
    pub types: Option<Vec<ValueKind>>,
    pub validator: Option<Validator>,
}

impl Constraints {
    fn option_defaults() -> Self {
        Self {
            allow_nil: true,
            ..Self::default()
        }
    }
}

impl fmt::Debug for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraints")
            .field("required", &self.required)
            .field("allow_nil", &self.allow_nil)
            .field("types", &self.types)
            .field("validator", &self.validator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

macro_rules! constraint_setters {
    () => {
        /// Fails the bind when the option is absent.
        pub fn required(mut self) -> Self {
            self.constraints.required = true;
            self
        }

        /// Whether a required option may be supplied as nil.
        pub fn allow_nil(mut self, allow: bool) -> Self {
            self.constraints.allow_nil = allow;
            self
        }

        /// Restricts non-nil values to the given kinds.
        pub fn types(mut self, kinds: impl IntoIterator<Item = ValueKind>) -> Self {
            self.constraints.types = Some(kinds.into_iter().collect());
            self
        }

        /// Rejects non-nil values for which `f` returns `false`.
        pub fn validator(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
            self.constraints.validator = Some(Arc::new(f));
            self
        }
    };
}

/// A boolean switch: `--name`, optionally `--no-name`.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    pub names: Names,
    pub negatable: bool,
    pub inline: bool,
    pub as_operand: bool,
    pub args: Option<ArgsOverride>,
    pub constraints: Constraints,
}

impl FlagSpec {
    pub fn new(names: impl Into<Names>) -> Self {
        Self {
            names: names.into(),
            negatable: false,
            inline: false,
            as_operand: false,
            args: None,
            constraints: Constraints::option_defaults(),
        }
    }

    /// Renders `false` as `--no-name`.
    pub fn negatable(mut self) -> Self {
        self.negatable = true;
        self
    }

    /// Marks the flag as attached-form. A flag carries no value, so its
    /// tokens are unchanged; only the `as_operand` combination is rejected.
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Renders `true` as a bare word (`stash list`) instead of an option.
    /// Such flags may be declared after a `--` boundary.
    pub fn as_operand(mut self) -> Self {
        self.as_operand = true;
        self
    }

    /// Replaces the derived token(s).
    pub fn args(mut self, args: impl Into<ArgsOverride>) -> Self {
        self.args = Some(args.into());
        self
    }

    constraint_setters!();
}

/// An option carrying a value: `--name value` or `--name=value`.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub names: Names,
    pub inline: bool,
    pub repeatable: bool,
    pub allow_empty: bool,
    pub as_operand: bool,
    pub separator: Option<String>,
    pub args: Option<ArgsOverride>,
    pub constraints: Constraints,
}

impl ValueSpec {
    pub fn new(names: impl Into<Names>) -> Self {
        Self {
            names: names.into(),
            inline: false,
            repeatable: false,
            allow_empty: false,
            as_operand: false,
            separator: None,
            args: None,
            constraints: Constraints::option_defaults(),
        }
    }

    /// Renders `--name=value` instead of two tokens.
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Accepts a list and repeats the option once per element.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Renders empty strings instead of dropping them.
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Renders the value(s) as bare positional tokens.
    pub fn as_operand(mut self) -> Self {
        self.as_operand = true;
        self
    }

    /// Token emitted before the operand values when there are any.
    pub fn separator(mut self, token: impl Into<String>) -> Self {
        self.separator = Some(token.into());
        self
    }

    pub fn args(mut self, args: impl Into<ArgsOverride>) -> Self {
        self.args = Some(args.into());
        self
    }

    constraint_setters!();
}

/// `true` renders as a flag, a string renders as a value.
#[derive(Debug, Clone)]
pub struct FlagOrValueSpec {
    pub names: Names,
    pub negatable: bool,
    pub inline: bool,
    pub constraints: Constraints,
}

impl FlagOrValueSpec {
    pub fn new(names: impl Into<Names>) -> Self {
        Self {
            names: names.into(),
            negatable: false,
            inline: false,
            constraints: Constraints::option_defaults(),
        }
    }

    pub fn negatable(mut self) -> Self {
        self.negatable = true;
        self
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    constraint_setters!();
}

/// A map rendered as repeated `flag key=value` tokens.
#[derive(Debug, Clone)]
pub struct KeyValueSpec {
    pub names: Names,
    pub flag_token: String,
    pub key_separator: String,
    pub inline: bool,
    pub as_operand: bool,
    pub constraints: Constraints,
}

impl KeyValueSpec {
    pub fn new(names: impl Into<Names>, flag_token: impl Into<String>) -> Self {
        Self {
            names: names.into(),
            flag_token: flag_token.into(),
            key_separator: String::from("="),
            inline: false,
            as_operand: false,
            constraints: Constraints::option_defaults(),
        }
    }

    /// Separator placed between key and value (default `=`).
    pub fn key_separator(mut self, separator: impl Into<String>) -> Self {
        self.key_separator = separator.into();
        self
    }

    /// Renders `flag=key=value` as one token.
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Renders bare `key=value` tokens without the flag.
    pub fn as_operand(mut self) -> Self {
        self.as_operand = true;
        self
    }

    constraint_setters!();
}

/// A positional slot filled from the call's positional values.
#[derive(Debug, Clone)]
pub struct OperandSpec {
    pub name: String,
    pub required: bool,
    pub repeatable: bool,
    pub allow_nil: bool,
    pub allow_option_like: bool,
    pub default: Option<Value>,
    pub separator: Option<String>,
}

impl OperandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            repeatable: false,
            allow_nil: false,
            allow_option_like: false,
            default: None,
            separator: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Collects every remaining positional value as a list.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Lets a required operand be satisfied by an explicit nil.
    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    /// Skips the check that rejects values starting with `-`.
    pub fn allow_option_like(mut self) -> Self {
        self.allow_option_like = true;
        self
    }

    /// Value used when the slot receives nothing (or nil).
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Token emitted before the operand's values when there are any.
    pub fn separator(mut self, token: impl Into<String>) -> Self {
        self.separator = Some(token.into());
        self
    }
}

/// An option rendered by a caller-supplied encoder.
#[derive(Clone)]
pub struct CustomSpec {
    pub names: Names,
    pub encoder: Encoder,
    pub constraints: Constraints,
}

impl CustomSpec {
    pub fn new(
        names: impl Into<Names>,
        encoder: impl Fn(&Value) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            names: names.into(),
            encoder: Arc::new(encoder),
            constraints: Constraints::option_defaults(),
        }
    }

    constraint_setters!();
}

impl fmt::Debug for CustomSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSpec")
            .field("names", &self.names)
            .field("constraints", &self.constraints)
            .finish_non_exhaustive()
    }
}

impl<const N: usize> From<[&str; N]> for FlagSpec {
    fn from(names: [&str; N]) -> Self {
        Self::new(names)
    }
}

impl<const N: usize> From<[&str; N]> for ValueSpec {
    fn from(names: [&str; N]) -> Self {
        Self::new(names)
    }
}

impl<const N: usize> From<[&str; N]> for FlagOrValueSpec {
    fn from(names: [&str; N]) -> Self {
        Self::new(names)
    }
}

impl From<&str> for FlagSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&str> for ValueSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&str> for FlagOrValueSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&str> for OperandSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
