//! Schema definition: the ordered, immutable list of declared entries.
//!
//! A [`Schema`] is built once (usually into a `static`) with a
//! [`SchemaBuilder`] and then reused for every
//! [`bind`](Schema::bind) call. Declaration order is significant: it is the
//! order in which tokens are rendered.
//!
//! Definition errors are detected at the offending declaration. The builder
//! remembers the first one, ignores any later declarations, and reports it
//! from [`SchemaBuilder::build`].
//!
//! # Examples
//!
//! ```
//! use gitargs_core::{OperandSpec, Options, Schema, Value};
//!
//! let schema = Schema::define(|s| {
//!     s.flag("force")
//!         .operand(OperandSpec::new("paths").repeatable().separator("--"))
//! })
//! .unwrap();
//!
//! let bound = schema
//!     .bind(&[Value::from("file.rb")], &Options::new().with("force", true))
//!     .unwrap();
//! assert_eq!(bound.tokens(), ["--force", "--", "file.rb"]);
//! ```

use std::collections::HashMap;

use crate::binder;
use crate::error::{BindError, DefinitionError};
use crate::spec::{
    ArgsOverride, Constraints, CustomSpec, FlagOrValueSpec, FlagSpec, KeyValueSpec, OperandSpec,
    ValueSpec,
};
use crate::{BoundArgs, Options, Value};

/// Token that ends option parsing in git.
pub(crate) const SEPARATOR: &str = "--";

/// One declared schema item.
#[derive(Debug, Clone)]
pub(crate) enum Entry {
    Flag(FlagSpec),
    Value(ValueSpec),
    FlagOrValue(FlagOrValueSpec),
    KeyValue(KeyValueSpec),
    Operand(OperandSpec),
    Literal(String),
    Custom(CustomSpec),
    ExecutionOption(String),
}

impl Entry {
    /// Canonical name; literals have none.
    pub(crate) fn name(&self) -> Option<&str> {
        match self {
            Self::Flag(spec) => Some(spec.names.canonical()),
            Self::Value(spec) => Some(spec.names.canonical()),
            Self::FlagOrValue(spec) => Some(spec.names.canonical()),
            Self::KeyValue(spec) => Some(spec.names.canonical()),
            Self::Custom(spec) => Some(spec.names.canonical()),
            Self::Operand(spec) => Some(spec.name.as_str()),
            Self::ExecutionOption(name) => Some(name.as_str()),
            Self::Literal(_) => None,
        }
    }

    /// Every name (canonical first) accepted for this entry.
    fn all_names(&self) -> Vec<&str> {
        let names = match self {
            Self::Flag(spec) => spec.names.all(),
            Self::Value(spec) => spec.names.all(),
            Self::FlagOrValue(spec) => spec.names.all(),
            Self::KeyValue(spec) => spec.names.all(),
            Self::Custom(spec) => spec.names.all(),
            Self::Operand(spec) => return vec![spec.name.as_str()],
            Self::ExecutionOption(name) => return vec![name.as_str()],
            Self::Literal(_) => return Vec::new(),
        };
        names.iter().map(String::as_str).collect()
    }

    pub(crate) fn constraints(&self) -> Option<&Constraints> {
        match self {
            Self::Flag(spec) => Some(&spec.constraints),
            Self::Value(spec) => Some(&spec.constraints),
            Self::FlagOrValue(spec) => Some(&spec.constraints),
            Self::KeyValue(spec) => Some(&spec.constraints),
            Self::Custom(spec) => Some(&spec.constraints),
            Self::Operand(_) | Self::Literal(_) | Self::ExecutionOption(_) => None,
        }
    }

    /// Whether the entry is supplied by name rather than by position.
    pub(crate) fn is_keyword(&self) -> bool {
        !matches!(self, Self::Operand(_) | Self::Literal(_))
    }

    /// Whether the entry renders an option token that git would stop
    /// recognizing after `--`.
    fn renders_option(&self) -> bool {
        match self {
            Self::FlagOrValue(_) | Self::Custom(_) => true,
            Self::Flag(spec) => !spec.as_operand,
            Self::Value(spec) => !spec.as_operand,
            Self::KeyValue(spec) => !spec.as_operand,
            Self::Operand(_) | Self::Literal(_) | Self::ExecutionOption(_) => false,
        }
    }

    /// Whether declaring this entry establishes a `--` boundary.
    fn opens_separator(&self) -> bool {
        match self {
            Self::Literal(token) => token == SEPARATOR,
            Self::Operand(spec) => spec.separator.as_deref() == Some(SEPARATOR),
            Self::Value(spec) => spec.as_operand && spec.separator.as_deref() == Some(SEPARATOR),
            _ => false,
        }
    }
}

/// Immutable, ordered set of declarations for one git command.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) entries: Vec<Entry>,
    /// Keyword name or alias to entry index.
    pub(crate) keywords: HashMap<String, usize>,
    /// Conflict groups as entry indexes, in declaration order.
    pub(crate) conflicts: Vec<Vec<usize>>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Builds a schema from a declaration closure.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] raised by a declaration.
    pub fn define(
        declare: impl FnOnce(SchemaBuilder) -> SchemaBuilder,
    ) -> Result<Self, DefinitionError> {
        declare(Self::builder()).build()
    }

    /// Validates actual arguments and renders them into command-line tokens.
    ///
    /// The schema is not modified; every call produces an independent
    /// [`BoundArgs`].
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] describing the first invalid aspect of the
    /// call. No tokens are produced when an error is returned.
    pub fn bind(&self, positionals: &[Value], options: &Options) -> Result<BoundArgs, BindError> {
        binder::bind(self, positionals, options)
    }

    /// Canonical names of the entries supplied by name, in declaration order.
    pub fn option_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.is_keyword())
            .filter_map(Entry::name)
            .collect()
    }

    /// Names of the positional operands, in declaration order.
    pub fn operand_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Operand(spec) => Some(spec.name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Resolves a keyword name or alias to its canonical name.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.keywords
            .get(name)
            .and_then(|&idx| self.entries[idx].name())
    }
}

/// Accumulates declarations for a [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entries: Vec<Entry>,
    names: HashMap<String, usize>,
    conflict_groups: Vec<Vec<String>>,
    repeatable_operand: Option<String>,
    separator_declared: bool,
    error: Option<DefinitionError>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(self, spec: impl Into<FlagSpec>) -> Self {
        self.declare(Entry::Flag(spec.into()))
    }

    pub fn value(self, spec: impl Into<ValueSpec>) -> Self {
        self.declare(Entry::Value(spec.into()))
    }

    pub fn flag_or_value(self, spec: impl Into<FlagOrValueSpec>) -> Self {
        self.declare(Entry::FlagOrValue(spec.into()))
    }

    pub fn key_value(self, spec: KeyValueSpec) -> Self {
        self.declare(Entry::KeyValue(spec))
    }

    pub fn operand(self, spec: impl Into<OperandSpec>) -> Self {
        self.declare(Entry::Operand(spec.into()))
    }

    /// Always-emitted token such as a fixed flag or `--`.
    pub fn literal(self, token: impl Into<String>) -> Self {
        self.declare(Entry::Literal(token.into()))
    }

    pub fn custom(self, spec: CustomSpec) -> Self {
        self.declare(Entry::Custom(spec))
    }

    /// Option carried to the executor and never rendered.
    pub fn execution_option(self, name: impl Into<String>) -> Self {
        self.declare(Entry::ExecutionOption(name.into()))
    }

    /// Registers a mutual-exclusion group, checked at bind time.
    ///
    /// Names may be canonical names or aliases and may refer to entries
    /// declared later; they are resolved by [`build`](Self::build).
    pub fn conflicts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.error.is_none() {
            self.conflict_groups
                .push(names.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded by a declaration, or an error for a
    /// conflict group that names an unknown entry.
    pub fn build(self) -> Result<Schema, DefinitionError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut conflicts = Vec::with_capacity(self.conflict_groups.len());
        for group in &self.conflict_groups {
            if group.len() < 2 {
                return Err(DefinitionError::ConflictGroupTooSmall);
            }
            let mut members = Vec::with_capacity(group.len());
            for name in group {
                let idx = self
                    .names
                    .get(name)
                    .copied()
                    .ok_or_else(|| DefinitionError::UnknownConflictName(name.clone()))?;
                if !members.contains(&idx) {
                    members.push(idx);
                }
            }
            conflicts.push(members);
        }

        let keywords = self
            .names
            .iter()
            .filter(|&(_, &idx)| self.entries[idx].is_keyword())
            .map(|(name, &idx)| (name.clone(), idx))
            .collect();

        Ok(Schema {
            entries: self.entries,
            keywords,
            conflicts,
        })
    }

    fn declare(mut self, entry: Entry) -> Self {
        if self.error.is_some() {
            return self;
        }
        if let Err(err) = self.check(&entry) {
            self.error = Some(err);
            return self;
        }

        let idx = self.entries.len();
        for name in entry.all_names() {
            self.names.insert(name.to_string(), idx);
        }
        if let Entry::Operand(spec) = &entry {
            if spec.repeatable {
                self.repeatable_operand = Some(spec.name.clone());
            }
        }
        if entry.opens_separator() {
            self.separator_declared = true;
        }
        self.entries.push(entry);
        self
    }

    fn check(&self, entry: &Entry) -> Result<(), DefinitionError> {
        let names = entry.all_names();
        if !matches!(entry, Entry::Literal(_)) && names.first().is_none_or(|n| n.is_empty()) {
            return Err(DefinitionError::EmptyNames);
        }
        for (i, name) in names.iter().enumerate() {
            if self.names.contains_key(*name) || names[..i].contains(name) {
                return Err(DefinitionError::DuplicateName(name.to_string()));
            }
        }
        let canonical = entry.name().unwrap_or_default().to_string();

        if self.separator_declared && entry.renders_option() {
            return Err(DefinitionError::OptionAfterSeparator(canonical));
        }

        if let Some(constraints) = entry.constraints() {
            if constraints.types.is_some() && constraints.validator.is_some() {
                return Err(DefinitionError::TypeAndValidator(canonical));
            }
        }

        match entry {
            Entry::Flag(spec) => {
                if spec.negatable && matches!(spec.args, Some(ArgsOverride::Tokens(_))) {
                    return Err(DefinitionError::ArgsListWithNegatable(canonical));
                }
                if spec.inline && spec.as_operand {
                    return Err(DefinitionError::InlineOperand(canonical));
                }
            }
            Entry::Value(spec) => {
                if matches!(spec.args, Some(ArgsOverride::Tokens(_))) {
                    return Err(DefinitionError::ArgsListOnValue(canonical));
                }
                if spec.inline && spec.as_operand {
                    return Err(DefinitionError::InlineOperand(canonical));
                }
                if spec.separator.is_some() && !spec.as_operand {
                    return Err(DefinitionError::SeparatorWithoutOperand(canonical));
                }
            }
            Entry::Operand(spec) if spec.repeatable => {
                if let Some(first) = &self.repeatable_operand {
                    return Err(DefinitionError::MultipleRepeatableOperands {
                        first: first.clone(),
                        second: canonical,
                    });
                }
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueKind;

    #[test]
    fn test_entries_keep_declaration_order() {
        let schema = Schema::define(|s| {
            s.flag("all")
                .value(ValueSpec::new(["message", "m"]))
                .operand("paths")
                .execution_option("timeout")
        })
        .unwrap();

        assert_eq!(schema.option_names(), vec!["all", "message", "timeout"]);
        assert_eq!(schema.operand_names(), vec!["paths"]);
        assert_eq!(schema.canonical_name("m"), Some("message"));
        assert_eq!(schema.canonical_name("paths"), None);
    }

    #[test]
    fn test_rejects_second_repeatable_operand() {
        let err = Schema::define(|s| {
            s.operand(OperandSpec::new("a").repeatable())
                .operand(OperandSpec::new("b").repeatable())
        })
        .unwrap_err();

        assert_eq!(
            err,
            DefinitionError::MultipleRepeatableOperands {
                first: "a".into(),
                second: "b".into()
            }
        );
    }

    #[test]
    fn test_rejects_type_with_validator() {
        let err = Schema::define(|s| {
            s.value(
                ValueSpec::new("depth")
                    .types([ValueKind::Integer])
                    .validator(|_| true),
            )
        })
        .unwrap_err();

        assert_eq!(err, DefinitionError::TypeAndValidator("depth".into()));
    }

    #[test]
    fn test_rejects_args_list_on_value() {
        let err = Schema::define(|s| s.value(ValueSpec::new("message").args(["-m", "-F"])))
            .unwrap_err();
        assert_eq!(err, DefinitionError::ArgsListOnValue("message".into()));
    }

    #[test]
    fn test_rejects_args_list_with_negatable() {
        let err = Schema::define(|s| s.flag(FlagSpec::new("verify").negatable().args(["-n", "-v"])))
            .unwrap_err();
        assert_eq!(err, DefinitionError::ArgsListWithNegatable("verify".into()));

        assert!(Schema::define(|s| s.flag(FlagSpec::new("quiet").args(["-q", "-q"]))).is_ok());
    }

    #[test]
    fn test_rejects_option_after_literal_separator() {
        let err = Schema::define(|s| s.operand("commit").literal("--").flag("force")).unwrap_err();
        assert_eq!(err, DefinitionError::OptionAfterSeparator("force".into()));
    }

    #[test]
    fn test_rejects_option_after_operand_separator() {
        let err = Schema::define(|s| {
            s.operand(OperandSpec::new("paths").repeatable().separator("--"))
                .value("message")
        })
        .unwrap_err();
        assert_eq!(err, DefinitionError::OptionAfterSeparator("message".into()));
    }

    #[test]
    fn test_allows_operands_and_execution_options_after_separator() {
        let schema = Schema::define(|s| {
            s.literal("--")
                .operand("path")
                .value(ValueSpec::new("pathspec").as_operand())
                .execution_option("timeout")
        });
        assert!(schema.is_ok());
    }

    #[test]
    fn test_rejects_option_after_value_operand_separator() {
        let err = Schema::define(|s| {
            s.value(ValueSpec::new("pathspec").repeatable().as_operand().separator("--"))
                .flag("force")
        })
        .unwrap_err();
        assert_eq!(err, DefinitionError::OptionAfterSeparator("force".into()));

        let err = Schema::define(|s| {
            s.value(ValueSpec::new("pathspec").as_operand().separator("--"))
                .key_value(KeyValueSpec::new("trailers", "--trailer"))
        })
        .unwrap_err();
        assert_eq!(err, DefinitionError::OptionAfterSeparator("trailers".into()));
    }

    #[test]
    fn test_operand_flags_allowed_after_separator() {
        let schema = Schema::define(|s| {
            s.literal("--")
                .flag(FlagSpec::new("list").as_operand())
        });
        assert!(schema.is_ok());

        let err = Schema::define(|s| s.literal("--").flag(FlagSpec::new("list")))
            .unwrap_err();
        assert_eq!(err, DefinitionError::OptionAfterSeparator("list".into()));
    }

    #[test]
    fn test_rejects_inline_operand_flag() {
        let err = Schema::define(|s| s.flag(FlagSpec::new("list").inline().as_operand()))
            .unwrap_err();
        assert_eq!(err, DefinitionError::InlineOperand("list".into()));
    }

    #[test]
    fn test_rejects_inline_operand_value() {
        let err = Schema::define(|s| s.value(ValueSpec::new("path").inline().as_operand()))
            .unwrap_err();
        assert_eq!(err, DefinitionError::InlineOperand("path".into()));
    }

    #[test]
    fn test_rejects_separator_without_operand() {
        let err = Schema::define(|s| s.value(ValueSpec::new("path").separator("--")))
            .unwrap_err();
        assert_eq!(err, DefinitionError::SeparatorWithoutOperand("path".into()));
    }

    #[test]
    fn test_rejects_duplicate_alias() {
        let err = Schema::define(|s| s.flag(["force", "f"]).flag(["follow", "f"])).unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateName("f".into()));
    }

    #[test]
    fn test_rejects_empty_names() {
        let err = Schema::define(|s| s.flag(FlagSpec::new(Vec::<String>::new()))).unwrap_err();
        assert_eq!(err, DefinitionError::EmptyNames);
    }

    #[test]
    fn test_conflicts_resolve_aliases_and_later_entries() {
        let schema = Schema::define(|s| {
            s.conflicts(["p", "stat"])
                .flag(["patch", "p"])
                .flag("stat")
        })
        .unwrap();
        assert_eq!(schema.conflicts, vec![vec![0, 1]]);
    }

    #[test]
    fn test_conflicts_reject_unknown_names() {
        let err = Schema::define(|s| s.flag("patch").conflicts(["patch", "stat"])).unwrap_err();
        assert_eq!(err, DefinitionError::UnknownConflictName("stat".into()));

        let err = Schema::define(|s| s.flag("patch").conflicts(["patch"])).unwrap_err();
        assert_eq!(err, DefinitionError::ConflictGroupTooSmall);
    }

    #[test]
    fn test_first_error_wins() {
        let err = Schema::define(|s| {
            s.value(ValueSpec::new("a").separator("--"))
                .flag(["b", "b"])
        })
        .unwrap_err();
        assert_eq!(err, DefinitionError::SeparatorWithoutOperand("a".into()));
    }
}
