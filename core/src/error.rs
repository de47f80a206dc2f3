//! Error types for schema definition and argument binding.
//!
//! Two categories exist and never mix: [`DefinitionError`] is returned while
//! building a [`Schema`](crate::Schema) and always indicates a programming
//! mistake in a declaration; [`BindError`] is returned by
//! [`Schema::bind`](crate::Schema::bind) and describes a malformed
//! invocation. Failures of the external git process belong to the execution
//! layer, not to this crate.

use thiserror::Error;

use crate::ValueKind;

/// Malformed schema declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// A declaration was given an empty list of names.
    #[error("a declaration must have at least one name")]
    EmptyNames,
    /// A name or alias is already used by another declaration.
    #[error("duplicate option or operand name: `{0}`")]
    DuplicateName(String),
    /// Only one operand may collect a variable number of values.
    #[error("only one repeatable operand is allowed; `{second}` follows `{first}`")]
    MultipleRepeatableOperands { first: String, second: String },
    /// `type` and `validator` were both supplied.
    #[error("`{0}` cannot declare both a type constraint and a validator")]
    TypeAndValidator(String),
    /// A list of override tokens was given to a value-shaped declaration.
    #[error("`{0}` takes a value; an argument override list is only valid on flags")]
    ArgsListOnValue(String),
    /// A list of override tokens was combined with `negatable`.
    #[error("`{0}` is negatable; an argument override list cannot be negated")]
    ArgsListWithNegatable(String),
    /// An option was declared after a `--` separator had been declared.
    #[error("option `{0}` is declared after the `--` separator and could never be rendered as an option")]
    OptionAfterSeparator(String),
    /// `inline` and `as_operand` are mutually exclusive.
    #[error("`{0}` cannot be both inline and rendered as an operand")]
    InlineOperand(String),
    /// `separator` requires `as_operand` on values.
    #[error("`{0}` declares a separator but is not rendered as an operand")]
    SeparatorWithoutOperand(String),
    /// A conflict group references an undeclared name.
    #[error("conflict group references unknown name `{0}`")]
    UnknownConflictName(String),
    /// A conflict group needs at least two members.
    #[error("a conflict group needs at least two names")]
    ConflictGroupTooSmall,
}

/// Malformed invocation detected while binding actual arguments.
///
/// Every variant names the offending option(s), operand or value so callers
/// can surface the message as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// Option names that the schema does not declare.
    #[error("Unsupported options: {}", quoted(.0))]
    UnsupportedOptions(Vec<String>),
    /// An entry's canonical name and one of its aliases were both given.
    #[error("Conflicting options: `{first}` and `{second}`")]
    ConflictingAliases { first: String, second: String },
    /// Positional values left over after every operand was filled.
    #[error("Unexpected positional arguments: {}", .0.join(", "))]
    UnexpectedPositionals(Vec<String>),
    /// A required operand received no value.
    #[error("Required positional argument not provided: `{0}`")]
    MissingOperand(String),
    /// A required repeatable operand received no values.
    #[error("at least one value is required for `{0}`")]
    EmptyRepeatableOperand(String),
    /// `nil` appeared among the values of a repeatable operand.
    #[error("nil values are not allowed in repeatable positional argument: `{0}`")]
    NilInRepeatableOperand(String),
    /// A positional value would be parsed as an option by git.
    #[error("Invalid value for positional argument `{name}`: `{value}` looks like a command-line option")]
    OptionLikeValue { name: String, value: String },
    /// Required options that were not supplied at all.
    #[error("Required options not provided: {}", quoted(.0))]
    MissingRequired(Vec<String>),
    /// Required options that were supplied as nil without `allow_nil`.
    #[error("Required options cannot be nil: {}", quoted(.0))]
    NilRequired(Vec<String>),
    /// A value's kind is not among the accepted kinds.
    #[error("Invalid type for `{name}`: expected {expected}, got {actual}")]
    InvalidType {
        name: String,
        expected: String,
        actual: ValueKind,
    },
    /// A validator rejected the value.
    #[error("Invalid value for option: `{0}`")]
    InvalidValue(String),
    /// Two members of a conflict group were both given.
    #[error("cannot specify :{first} and :{second}")]
    ConflictingOptions { first: String, second: String },
    /// A key-value option received a pair it cannot render.
    #[error("Invalid key-value pair for `{name}`: {reason}")]
    InvalidKeyValue { name: String, reason: String },
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("`{n}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats a list of accepted kinds as `A`, `A or B`, `A, B or C`.
pub(crate) fn describe_kinds(kinds: &[ValueKind]) -> String {
    match kinds {
        [] => String::from("nothing"),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{head} or {last}")
        }
    }
}
