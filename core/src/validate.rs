//! Bind-time validation.
//!
//! Each check reports every offender it can in one error (unknown names,
//! missing required options) or the first offender in declaration order
//! (types, validators, conflicts, option-like operands). The binder runs
//! them in a fixed order so a given invalid call always produces the same
//! error.

use std::collections::HashMap;

use crate::error::{BindError, describe_kinds};
use crate::render::value_items;
use crate::schema::{Entry, SEPARATOR, Schema};
use crate::{Options, Value};

static NIL: Value = Value::Nil;

/// Rejects option names the schema does not declare, listing all of them.
pub(crate) fn reject_unsupported(schema: &Schema, options: &Options) -> Result<(), BindError> {
    let unknown: Vec<String> = options
        .iter()
        .filter(|(name, _)| !schema.keywords.contains_key(*name))
        .map(|(name, _)| name.to_string())
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(BindError::UnsupportedOptions(unknown))
    }
}

/// Maps supplied option values onto entry indexes, rejecting calls that
/// supply an entry under two of its names.
pub(crate) fn resolve_aliases(
    schema: &Schema,
    options: &Options,
    values: &mut [Option<Value>],
) -> Result<(), BindError> {
    let mut supplied_as: HashMap<usize, &str> = HashMap::new();
    for (name, value) in options.iter() {
        let Some(&idx) = schema.keywords.get(name) else {
            continue;
        };
        if let Some(first) = supplied_as.insert(idx, name) {
            return Err(BindError::ConflictingAliases {
                first: first.to_string(),
                second: name.to_string(),
            });
        }
        values[idx] = Some(value.clone());
    }
    Ok(())
}

/// Reports required options that are absent, then those that are nil
/// without `allow_nil`.
pub(crate) fn check_required(entries: &[Entry], values: &[Option<Value>]) -> Result<(), BindError> {
    let mut missing = Vec::new();
    let mut nil = Vec::new();
    for (entry, value) in entries.iter().zip(values) {
        let Some(constraints) = entry.constraints() else {
            continue;
        };
        if !constraints.required {
            continue;
        }
        let name = entry.name().unwrap_or_default().to_string();
        match value {
            None => missing.push(name),
            Some(Value::Nil) if !constraints.allow_nil => nil.push(name),
            Some(_) => {}
        }
    }

    if !missing.is_empty() {
        return Err(BindError::MissingRequired(missing));
    }
    if !nil.is_empty() {
        return Err(BindError::NilRequired(nil));
    }
    Ok(())
}

/// Checks declared type constraints. Nil always passes; each element of a
/// repeatable value's list is checked on its own.
pub(crate) fn check_types(entries: &[Entry], values: &[Option<Value>]) -> Result<(), BindError> {
    for (entry, value) in entries.iter().zip(values) {
        let (Some(constraints), Some(value)) = (entry.constraints(), value) else {
            continue;
        };
        let Some(kinds) = &constraints.types else {
            continue;
        };

        let repeatable = matches!(entry, Entry::Value(spec) if spec.repeatable);
        let candidates: &[Value] = match value {
            Value::List(items) if repeatable => items,
            other => std::slice::from_ref(other),
        };
        for candidate in candidates {
            if candidate.is_nil() || kinds.contains(&candidate.kind()) {
                continue;
            }
            return Err(BindError::InvalidType {
                name: entry.name().unwrap_or_default().to_string(),
                expected: describe_kinds(kinds),
                actual: candidate.kind(),
            });
        }
    }
    Ok(())
}

/// Runs validators against non-nil values.
pub(crate) fn check_validators(
    entries: &[Entry],
    values: &[Option<Value>],
) -> Result<(), BindError> {
    for (entry, value) in entries.iter().zip(values) {
        let (Some(constraints), Some(value)) = (entry.constraints(), value) else {
            continue;
        };
        let Some(validator) = &constraints.validator else {
            continue;
        };
        if !value.is_nil() && !validator(value) {
            return Err(BindError::InvalidValue(
                entry.name().unwrap_or_default().to_string(),
            ));
        }
    }
    Ok(())
}

/// Rejects the first pair of provided members in each conflict group.
///
/// Groups are checked independently, in declaration order.
pub(crate) fn check_conflicts(schema: &Schema, values: &[Option<Value>]) -> Result<(), BindError> {
    for group in &schema.conflicts {
        let mut provided = group
            .iter()
            .filter(|&&idx| values[idx].as_ref().is_some_and(is_provided))
            .filter_map(|&idx| schema.entries[idx].name());
        if let (Some(first), Some(second)) = (provided.next(), provided.next()) {
            return Err(BindError::ConflictingOptions {
                first: first.to_string(),
                second: second.to_string(),
            });
        }
    }
    Ok(())
}

/// Truthy, and not the empty list an absent repeatable operand resolves to.
fn is_provided(value: &Value) -> bool {
    match value {
        Value::List(items) => !items.is_empty(),
        other => other.is_truthy(),
    }
}

/// Rejects positional string values starting with `-` that git would parse
/// as options, unless a `--` has already been rendered before them.
pub(crate) fn check_option_like(entries: &[Entry], values: &[Option<Value>]) -> Result<(), BindError> {
    let mut past_separator = false;
    for (entry, value) in entries.iter().zip(values) {
        let value = value.as_ref().unwrap_or(&NIL);
        let (name, separator, checked) = match entry {
            Entry::Literal(token) => {
                past_separator |= token == SEPARATOR;
                continue;
            }
            Entry::Operand(spec) => (
                spec.name.as_str(),
                spec.separator.as_deref(),
                !spec.allow_option_like,
            ),
            Entry::Value(spec) if spec.as_operand => {
                // Value shape errors surface during rendering.
                let name = spec.names.canonical();
                let renders = value_items(name, spec.repeatable, spec.allow_empty, value)
                    .is_ok_and(|items| !items.is_empty());
                if renders && spec.separator.as_deref() == Some(SEPARATOR) {
                    past_separator = true;
                }
                if !past_separator {
                    reject_option_like(name, value)?;
                }
                continue;
            }
            _ => continue,
        };

        let renders = match value {
            Value::List(items) => !items.is_empty(),
            other => !other.is_nil(),
        };
        if renders && separator == Some(SEPARATOR) {
            past_separator = true;
        }
        if checked && !past_separator {
            reject_option_like(name, value)?;
        }
    }
    Ok(())
}

fn reject_option_like(name: &str, value: &Value) -> Result<(), BindError> {
    let strings: &[Value] = match value {
        Value::List(items) => items,
        other => std::slice::from_ref(other),
    };
    for s in strings.iter().filter_map(Value::as_str) {
        if looks_like_option(s) {
            return Err(BindError::OptionLikeValue {
                name: name.to_string(),
                value: s.to_string(),
            });
        }
    }
    Ok(())
}

/// Returns `true` when git would treat `s` as an option rather than an operand.
pub fn looks_like_option(s: &str) -> bool {
    s.starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{FlagSpec, OperandSpec};

    #[test]
    fn test_looks_like_option() {
        assert!(looks_like_option("-s"));
        assert!(looks_like_option("--stat"));
        assert!(looks_like_option("-"));
        assert!(!looks_like_option("HEAD~1"));
        assert!(!looks_like_option("a-b"));
    }

    #[test]
    fn test_is_provided() {
        assert!(!is_provided(&Value::Nil));
        assert!(!is_provided(&Value::Bool(false)));
        assert!(!is_provided(&Value::List(Vec::new())));
        assert!(is_provided(&Value::from("")));
        assert!(is_provided(&Value::list(["a"])));
    }

    #[test]
    fn test_check_required_collects_all() {
        let entries = vec![
            Entry::Flag(FlagSpec::new("a").required()),
            Entry::Flag(FlagSpec::new("b").required()),
            Entry::Flag(FlagSpec::new("c").required().allow_nil(false)),
        ];
        let err = check_required(&entries, &[None, None, Some(Value::Nil)]).unwrap_err();
        assert_eq!(err, BindError::MissingRequired(vec!["a".into(), "b".into()]));

        let err = check_required(&entries, &[Some(true.into()), Some(true.into()), Some(Value::Nil)])
            .unwrap_err();
        assert_eq!(err, BindError::NilRequired(vec!["c".into()]));
    }

    #[test]
    fn test_option_like_stops_at_operand_separator() {
        let entries = vec![Entry::Operand(OperandSpec::new("paths").repeatable().separator("--"))];
        let values = vec![Some(Value::list(["-weird"]))];
        assert!(check_option_like(&entries, &values).is_ok());
    }

    #[test]
    fn test_option_like_checked_when_separator_not_rendered() {
        let entries = vec![
            Entry::Operand(OperandSpec::new("commit")),
            Entry::Operand(OperandSpec::new("paths").repeatable()),
        ];
        let values = vec![Some(Value::from("-p")), Some(Value::List(vec![]))];
        let err = check_option_like(&entries, &values).unwrap_err();
        assert_eq!(
            err,
            BindError::OptionLikeValue {
                name: "commit".into(),
                value: "-p".into()
            }
        );
    }

    #[test]
    fn test_option_like_opt_out() {
        let entries = vec![Entry::Operand(OperandSpec::new("range").allow_option_like())];
        let values = vec![Some(Value::from("-3"))];
        assert!(check_option_like(&entries, &values).is_ok());
    }
}
