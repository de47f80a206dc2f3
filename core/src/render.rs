//! Token rendering for each kind of declaration.
//!
//! Rendering walks the entries in declaration order and concatenates each
//! entry's tokens. Omitted values (absent, nil, `false` on a plain flag, an
//! empty string without `allow_empty`) contribute nothing.

use crate::error::{BindError, describe_kinds};
use crate::schema::Entry;
use crate::spec::{ArgsOverride, FlagOrValueSpec, FlagSpec, KeyValueSpec, OperandSpec, ValueSpec};
use crate::{Value, ValueKind};

const SCALAR_KINDS: [ValueKind; 2] = [ValueKind::String, ValueKind::Integer];

static NIL: Value = Value::Nil;

/// Renders every entry against its resolved value. `values` is parallel to
/// `entries`; `None` marks an option that was not supplied.
pub(crate) fn render(entries: &[Entry], values: &[Option<Value>]) -> Result<Vec<String>, BindError> {
    let mut tokens = Vec::new();
    for (entry, value) in entries.iter().zip(values) {
        let value = value.as_ref().unwrap_or(&NIL);
        match entry {
            Entry::Flag(spec) => tokens.extend(flag(spec, value)),
            Entry::Value(spec) => tokens.extend(value_option(spec, value)?),
            Entry::FlagOrValue(spec) => tokens.extend(flag_or_value(spec, value)?),
            Entry::KeyValue(spec) => tokens.extend(key_value(spec, value)?),
            Entry::Operand(spec) => tokens.extend(operand(spec, value)),
            Entry::Literal(token) => tokens.push(token.clone()),
            Entry::Custom(spec) => {
                if !value.is_nil() {
                    tokens.extend((spec.encoder)(value));
                }
            }
            Entry::ExecutionOption(_) => {}
        }
    }
    Ok(tokens)
}

/// Derives an option token from a name: one character renders as `-x`,
/// longer names as `--long-name` with underscores mapped to dashes.
pub(crate) fn option_token(name: &str) -> String {
    let dashed = name.replace('_', "-");
    if name.chars().count() == 1 {
        format!("-{dashed}")
    } else {
        format!("--{dashed}")
    }
}

fn negated_token(name: &str, args: Option<&ArgsOverride>) -> String {
    match args {
        Some(ArgsOverride::Token(token)) => format!("--no-{}", token.trim_start_matches('-')),
        _ => format!("--no-{}", name.replace('_', "-")),
    }
}

fn flag_tokens(name: &str, args: Option<&ArgsOverride>) -> Vec<String> {
    match args {
        Some(ArgsOverride::Token(token)) => vec![token.clone()],
        Some(ArgsOverride::Tokens(tokens)) => tokens.clone(),
        None => vec![option_token(name)],
    }
}

fn flag(spec: &FlagSpec, value: &Value) -> Vec<String> {
    let name = spec.names.canonical();
    match value {
        Value::Bool(false) if spec.negatable => vec![negated_token(name, spec.args.as_ref())],
        v if v.is_truthy() && spec.as_operand => operand_word(name, spec.args.as_ref()),
        v if v.is_truthy() => flag_tokens(name, spec.args.as_ref()),
        _ => Vec::new(),
    }
}

/// A flag rendered positionally: the override verbatim, or the dashed name
/// without a leading `-`.
fn operand_word(name: &str, args: Option<&ArgsOverride>) -> Vec<String> {
    match args {
        Some(ArgsOverride::Token(token)) => vec![token.clone()],
        Some(ArgsOverride::Tokens(tokens)) => tokens.clone(),
        None => vec![name.replace('_', "-")],
    }
}

/// `--name value`, `--name=value` or `-xvalue`.
fn valued(option: &str, value: String, inline: bool) -> Vec<String> {
    if !inline {
        return vec![option.to_string(), value];
    }
    if option.starts_with("--") {
        vec![format!("{option}={value}")]
    } else {
        vec![format!("{option}{value}")]
    }
}

fn value_option(spec: &ValueSpec, value: &Value) -> Result<Vec<String>, BindError> {
    let name = spec.names.canonical();
    let items = value_items(name, spec.repeatable, spec.allow_empty, value)?;

    if spec.as_operand {
        return Ok(with_separator(spec.separator.as_deref(), items));
    }

    let option = match &spec.args {
        Some(ArgsOverride::Token(token)) => token.clone(),
        _ => option_token(name),
    };
    Ok(items
        .into_iter()
        .flat_map(|item| valued(&option, item, spec.inline))
        .collect())
}

/// Token text of each value to render, with omitted values dropped.
pub(crate) fn value_items(
    name: &str,
    repeatable: bool,
    allow_empty: bool,
    value: &Value,
) -> Result<Vec<String>, BindError> {
    let scalars: &[Value] = match value {
        Value::Nil => return Ok(Vec::new()),
        Value::List(items) if repeatable => items,
        other => std::slice::from_ref(other),
    };

    let mut items = Vec::with_capacity(scalars.len());
    for scalar in scalars {
        if scalar.is_nil() {
            continue;
        }
        let text = scalar.to_token().ok_or_else(|| BindError::InvalidType {
            name: name.to_string(),
            expected: describe_kinds(&SCALAR_KINDS),
            actual: scalar.kind(),
        })?;
        if text.is_empty() && !allow_empty {
            continue;
        }
        items.push(text);
    }
    Ok(items)
}

fn with_separator(separator: Option<&str>, items: Vec<String>) -> Vec<String> {
    match separator {
        Some(sep) if !items.is_empty() => std::iter::once(sep.to_string()).chain(items).collect(),
        _ => items,
    }
}

fn flag_or_value(spec: &FlagOrValueSpec, value: &Value) -> Result<Vec<String>, BindError> {
    let name = spec.names.canonical();
    match value {
        Value::Nil => Ok(Vec::new()),
        Value::Bool(true) => Ok(vec![option_token(name)]),
        Value::Bool(false) if spec.negatable => Ok(vec![negated_token(name, None)]),
        Value::Bool(false) => Ok(Vec::new()),
        Value::Str(s) if s.is_empty() => Ok(Vec::new()),
        Value::Str(s) => Ok(valued(&option_token(name), s.clone(), spec.inline)),
        other => Err(BindError::InvalidType {
            name: name.to_string(),
            expected: describe_kinds(&[ValueKind::Bool, ValueKind::String]),
            actual: other.kind(),
        }),
    }
}

fn key_value(spec: &KeyValueSpec, value: &Value) -> Result<Vec<String>, BindError> {
    let name = spec.names.canonical();
    let invalid = |reason: String| BindError::InvalidKeyValue {
        name: name.to_string(),
        reason,
    };

    let mut pairs: Vec<(&str, &Value)> = Vec::new();
    match value {
        Value::Nil => {}
        Value::Map(entries) => pairs.extend(entries.iter().map(|(k, v)| (k.as_str(), v))),
        Value::List(items) => {
            for item in items {
                match item.as_list() {
                    Some([Value::Str(key), v]) => pairs.push((key, v)),
                    Some([Value::Str(key)]) => pairs.push((key, &NIL)),
                    _ => return Err(invalid(format!("expected a [key, value] pair, got {item}"))),
                }
            }
        }
        other => {
            return Err(BindError::InvalidType {
                name: name.to_string(),
                expected: describe_kinds(&[ValueKind::Map, ValueKind::List]),
                actual: other.kind(),
            });
        }
    }

    let mut rendered = Vec::new();
    for (key, value) in pairs {
        if key.is_empty() {
            return Err(invalid(String::from("key cannot be empty")));
        }
        // A list value repeats the key once per element.
        let values = match value {
            Value::List(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };
        for v in values {
            if v.is_nil() {
                rendered.push(key.to_string());
                continue;
            }
            let text = v.to_token().ok_or_else(|| {
                invalid(format!(
                    "value for `{key}` must be a String or Integer, got {}",
                    v.kind()
                ))
            })?;
            rendered.push(format!("{key}{}{text}", spec.key_separator));
        }
    }

    let tokens = rendered.into_iter().flat_map(|pair| {
        if spec.as_operand {
            vec![pair]
        } else if spec.inline {
            vec![format!("{}={pair}", spec.flag_token)]
        } else {
            vec![spec.flag_token.clone(), pair]
        }
    });
    Ok(tokens.collect())
}

fn operand(spec: &OperandSpec, value: &Value) -> Vec<String> {
    let items = match value {
        Value::List(items) => items.iter().filter_map(Value::to_token).collect(),
        other => other.to_token().into_iter().collect(),
    };
    with_separator(spec.separator.as_deref(), items)
}
