//! Binding: validate a call's arguments against a schema and render them.
//!
//! Checks run in a fixed order and the first failing one is reported:
//! unknown names, alias conflicts, positional allocation together with the
//! option-like check on positional values, required options, types,
//! validators, conflict groups. Rendering
//! follows and can still fail on value shapes (a list for a single-value
//! option, a malformed key/value argument), so tokens are only returned once
//! the whole call is known to be valid.

use tracing::{debug, trace};

use crate::schema::{Entry, Schema};
use crate::spec::OperandSpec;
use crate::{BindError, BoundArgs, Options, Value, operands, render, validate};

pub(crate) fn bind(
    schema: &Schema,
    positionals: &[Value],
    options: &Options,
) -> Result<BoundArgs, BindError> {
    let result = bind_checked(schema, positionals, options);
    if let Err(err) = &result {
        debug!(error = %err, positionals = positionals.len(), "bind rejected");
    }
    result
}

fn bind_checked(
    schema: &Schema,
    positionals: &[Value],
    options: &Options,
) -> Result<BoundArgs, BindError> {
    validate::reject_unsupported(schema, options)?;

    let mut values: Vec<Option<Value>> = vec![None; schema.entries.len()];
    validate::resolve_aliases(schema, options, &mut values)?;

    let (operand_slots, operand_specs): (Vec<usize>, Vec<&OperandSpec>) = schema
        .entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| match entry {
            Entry::Operand(spec) => Some((idx, spec)),
            _ => None,
        })
        .unzip();
    let resolved = operands::allocate(&operand_specs, positionals)?;
    for (idx, value) in operand_slots.into_iter().zip(resolved) {
        values[idx] = Some(value);
    }
    validate::check_option_like(&schema.entries, &values)?;

    validate::check_required(&schema.entries, &values)?;
    validate::check_types(&schema.entries, &values)?;
    validate::check_validators(&schema.entries, &values)?;
    validate::check_conflicts(schema, &values)?;

    let tokens = render::render(&schema.entries, &values)?;
    trace!(?tokens, "bound arguments");

    let mut named = Vec::with_capacity(values.len());
    let mut execution_options = Vec::new();
    for (entry, value) in schema.entries.iter().zip(values) {
        let Some(name) = entry.name() else {
            continue;
        };
        let value = value.unwrap_or_default();
        if matches!(entry, Entry::ExecutionOption(_)) && !value.is_nil() {
            execution_options.push((name.to_string(), value.clone()));
        }
        named.push((name.to_string(), value));
    }

    Ok(BoundArgs::new(tokens, named, execution_options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{FlagSpec, ValueSpec};
    use crate::ValueKind;

    fn schema() -> Schema {
        Schema::define(|s| {
            s.flag(["force", "f"])
                .value(ValueSpec::new("depth").types([ValueKind::Integer]))
                .operand("commit")
                .execution_option("timeout")
        })
        .unwrap()
    }

    #[test]
    fn test_unknown_options_reported_together() {
        let err = schema()
            .bind(&[], &Options::new().with("bogus", true).with("other", 1))
            .unwrap_err();
        assert_eq!(
            err,
            BindError::UnsupportedOptions(vec!["bogus".into(), "other".into()])
        );
    }

    #[test]
    fn test_operand_names_are_not_keywords() {
        let err = schema()
            .bind(&[], &Options::new().with("commit", "HEAD"))
            .unwrap_err();
        assert_eq!(err, BindError::UnsupportedOptions(vec!["commit".into()]));
    }

    #[test]
    fn test_alias_and_canonical_together() {
        let err = schema()
            .bind(&[], &Options::new().with("force", true).with("f", true))
            .unwrap_err();
        assert_eq!(
            err,
            BindError::ConflictingAliases {
                first: "force".into(),
                second: "f".into()
            }
        );
    }

    #[test]
    fn test_alias_resolves_to_canonical_value() {
        let bound = schema()
            .bind(&[Value::from("HEAD")], &Options::new().with("f", true))
            .unwrap();
        assert_eq!(bound.tokens(), ["--force", "HEAD"]);
        assert_eq!(bound["force"], Value::Bool(true));
        assert!(bound.get("f").is_none());
    }

    #[test]
    fn test_values_cover_every_name() {
        let bound = schema().bind(&[], &Options::new()).unwrap();
        let names: Vec<&str> = bound.values().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["force", "depth", "commit", "timeout"]);
        assert!(bound.values().all(|(_, v)| v.is_nil()));
        assert_eq!(bound.execution_options().count(), 0);
    }

    #[test]
    fn test_execution_options_are_not_rendered() {
        let bound = schema()
            .bind(&[], &Options::new().with("timeout", 30))
            .unwrap();
        assert!(bound.tokens().is_empty());
        let exec: Vec<_> = bound.execution_options().collect();
        assert_eq!(exec, vec![("timeout", &Value::Int(30))]);
    }

    #[test]
    fn test_type_check_precedes_render() {
        let err = schema()
            .bind(&[], &Options::new().with("depth", "deep"))
            .unwrap_err();
        assert_eq!(
            err,
            BindError::InvalidType {
                name: "depth".into(),
                expected: "Integer".into(),
                actual: ValueKind::String
            }
        );
    }

    #[test]
    fn test_required_checked_before_types() {
        let schema = Schema::define(|s| {
            s.flag(FlagSpec::new("all").required())
                .value(ValueSpec::new("depth").types([ValueKind::Integer]))
        })
        .unwrap();
        let err = schema
            .bind(&[], &Options::new().with("depth", "x"))
            .unwrap_err();
        assert_eq!(err, BindError::MissingRequired(vec!["all".into()]));
    }

    #[test]
    fn test_option_like_operand_checked_before_required() {
        let schema = Schema::define(|s| s.flag(FlagSpec::new("all").required()).operand("commit"))
            .unwrap();
        let err = schema.bind(&[Value::from("-s")], &Options::new()).unwrap_err();
        assert_eq!(
            err,
            BindError::OptionLikeValue {
                name: "commit".into(),
                value: "-s".into()
            }
        );
    }

    #[test]
    fn test_option_like_operand_checked_before_conflicts() {
        let schema = Schema::define(|s| {
            s.flag("patch")
                .flag("stat")
                .conflicts(["patch", "stat"])
                .operand("commit")
        })
        .unwrap();
        let options = Options::new().with("patch", true).with("stat", true);
        let err = schema.bind(&[Value::from("--cached")], &options).unwrap_err();
        assert!(matches!(err, BindError::OptionLikeValue { .. }));
    }

    #[test]
    fn test_binding_does_not_mutate_schema() {
        let schema = schema();
        let first = schema
            .bind(&[Value::from("a")], &Options::new().with("force", true))
            .unwrap();
        let second = schema.bind(&[], &Options::new()).unwrap();
        assert_eq!(first.tokens(), ["--force", "a"]);
        assert!(second.tokens().is_empty());
    }
}
