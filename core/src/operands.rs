//! Positional value allocation.
//!
//! Operands bind like the parameters of a function signature that mixes
//! required parameters, defaulted parameters and at most one variadic
//! parameter, in any order:
//!
//! 1. Leading required operands and trailing required operands are
//!    identified; everything between them is the flexible middle.
//! 2. Trailing values are reserved for the trailing required operands
//!    (right to left), then leading values for the leading required
//!    operands (left to right).
//! 3. The middle values fill required middle operands first, then optional
//!    operands left to right, and whatever remains goes to the variadic
//!    operand.
//!
//! Nil in a single-value slot means "not provided", so defaults apply. Nil
//! among the values of the variadic operand is an error.

use crate::error::{BindError, describe_kinds};
use crate::spec::OperandSpec;
use crate::{Value, ValueKind};

const SCALAR_KINDS: [ValueKind; 2] = [ValueKind::String, ValueKind::Integer];

/// Assigns `positionals` to `operands` and resolves each operand's value.
///
/// Returns one value per operand, in declaration order: a scalar or
/// [`Value::Nil`] for single-value operands, a [`Value::List`] for the
/// repeatable operand.
pub(crate) fn allocate(
    operands: &[&OperandSpec],
    positionals: &[Value],
) -> Result<Vec<Value>, BindError> {
    let has_variadic = operands.iter().any(|op| op.repeatable);
    let positionals = trim_unexpected(operands.len(), has_variadic, positionals)?;
    let slots = assign(operands, positionals);

    operands
        .iter()
        .zip(slots)
        .map(|(op, slot)| resolve(op, slot))
        .collect()
}

/// Drops trailing nils past the last operand and rejects any other overflow.
fn trim_unexpected(
    capacity: usize,
    has_variadic: bool,
    positionals: &[Value],
) -> Result<&[Value], BindError> {
    if has_variadic {
        return Ok(positionals);
    }
    let mut end = positionals.len();
    while end > capacity && positionals[end - 1].is_nil() {
        end -= 1;
    }
    if end > capacity {
        let extra = positionals[capacity..end]
            .iter()
            .map(ToString::to_string)
            .collect();
        return Err(BindError::UnexpectedPositionals(extra));
    }
    Ok(&positionals[..end])
}

/// Splits `positionals` into one slice per operand. `None` marks an operand
/// that received no slot at all.
fn assign<'a>(operands: &[&OperandSpec], positionals: &'a [Value]) -> Vec<Option<&'a [Value]>> {
    let pre_len = operands.iter().take_while(|op| is_fixed(op)).count();
    let post_len = operands[pre_len..]
        .iter()
        .rev()
        .take_while(|op| is_fixed(op))
        .count();
    let post_start = operands.len() - post_len;

    let total = positionals.len();
    let post_take = post_len.min(total);
    let pre_take = pre_len.min(total - post_take);
    let middle = &positionals[pre_take..total - post_take];

    let mut slots: Vec<Option<&[Value]>> = vec![None; operands.len()];

    // Leading required operands, left to right.
    for (i, slot) in slots.iter_mut().take(pre_take).enumerate() {
        *slot = Some(&positionals[i..=i]);
    }

    // Trailing required operands, right to left.
    for k in 0..post_take {
        let op_idx = operands.len() - 1 - k;
        let val_idx = total - 1 - k;
        slots[op_idx] = Some(&positionals[val_idx..=val_idx]);
    }

    let middle_ops = &operands[pre_len..post_start];
    let required_count = middle_ops.iter().filter(|op| is_fixed(op)).count();
    let optional_count = middle_ops
        .iter()
        .filter(|op| !op.required && !op.repeatable)
        .count();
    let extra = middle.len().saturating_sub(required_count);
    let mut optional_budget = extra.min(optional_count);
    let variadic_take = extra - optional_budget;

    let mut cursor = 0;
    for (offset, op) in middle_ops.iter().enumerate() {
        let take = if op.repeatable {
            variadic_take
        } else if op.required {
            usize::from(cursor < middle.len())
        } else if optional_budget > 0 {
            optional_budget -= 1;
            1
        } else {
            0
        };
        if op.repeatable || take > 0 {
            slots[pre_len + offset] = Some(&middle[cursor..cursor + take]);
        }
        cursor += take;
    }

    slots
}

/// Required, single-value operands have a fixed position at either end.
fn is_fixed(op: &OperandSpec) -> bool {
    op.required && !op.repeatable
}

fn resolve(op: &OperandSpec, slot: Option<&[Value]>) -> Result<Value, BindError> {
    if op.repeatable {
        return resolve_repeatable(op, slot.unwrap_or_default());
    }

    match slot.and_then(<[Value]>::first) {
        Some(Value::Nil) | None => {
            let explicit_nil = slot.is_some();
            if op.required && !(explicit_nil && op.allow_nil) {
                return Err(BindError::MissingOperand(op.name.clone()));
            }
            Ok(op.default.clone().unwrap_or_default())
        }
        Some(value) => {
            check_scalar(&op.name, value)?;
            Ok(value.clone())
        }
    }
}

fn resolve_repeatable(op: &OperandSpec, values: &[Value]) -> Result<Value, BindError> {
    // A single list argument supplies the whole repeated run.
    let values = match values {
        [Value::List(items)] => items.as_slice(),
        _ => values,
    };

    if let [Value::Nil] = values {
        if op.allow_nil {
            return Ok(Value::List(Vec::new()));
        }
        if op.required {
            return Err(BindError::EmptyRepeatableOperand(op.name.clone()));
        }
        return Err(BindError::NilInRepeatableOperand(op.name.clone()));
    }
    if values.iter().any(Value::is_nil) {
        return Err(BindError::NilInRepeatableOperand(op.name.clone()));
    }

    if values.is_empty() {
        if op.required {
            return Err(BindError::EmptyRepeatableOperand(op.name.clone()));
        }
        return Ok(match &op.default {
            Some(Value::List(items)) => Value::List(items.clone()),
            Some(Value::Nil) | None => Value::List(Vec::new()),
            Some(scalar) => Value::List(vec![scalar.clone()]),
        });
    }

    for value in values {
        check_scalar(&op.name, value)?;
    }
    Ok(Value::List(values.to_vec()))
}

fn check_scalar(name: &str, value: &Value) -> Result<(), BindError> {
    if SCALAR_KINDS.contains(&value.kind()) {
        return Ok(());
    }
    Err(BindError::InvalidType {
        name: name.to_string(),
        expected: describe_kinds(&SCALAR_KINDS),
        actual: value.kind(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    fn run(operands: &[OperandSpec], positionals: &[Value]) -> Result<Vec<Value>, BindError> {
        let refs: Vec<&OperandSpec> = operands.iter().collect();
        allocate(&refs, positionals)
    }

    #[test]
    fn test_required_around_variadic() {
        let ops = [
            OperandSpec::new("first").required(),
            OperandSpec::new("middle").repeatable(),
            OperandSpec::new("last").required(),
        ];

        let exact = run(&ops, &strs(&["a", "z"])).unwrap();
        assert_eq!(exact, vec!["a".into(), Value::List(vec![]), "z".into()]);

        let extra = run(&ops, &strs(&["a", "m", "z"])).unwrap();
        assert_eq!(extra, vec!["a".into(), Value::list(["m"]), "z".into()]);
    }

    #[test]
    fn test_trailing_required_reserved_first() {
        let ops = [
            OperandSpec::new("sources").repeatable().required(),
            OperandSpec::new("destination").required(),
        ];

        let bound = run(&ops, &strs(&["s1", "s2", "dest"])).unwrap();
        assert_eq!(bound, vec![Value::list(["s1", "s2"]), "dest".into()]);

        let err = run(&ops, &strs(&["dest"])).unwrap_err();
        assert_eq!(err, BindError::EmptyRepeatableOperand("sources".into()));
    }

    #[test]
    fn test_optionals_fill_left_to_right_before_variadic() {
        let ops = [
            OperandSpec::new("commit1"),
            OperandSpec::new("commit2"),
            OperandSpec::new("paths").repeatable(),
        ];

        let one = run(&ops, &strs(&["HEAD"])).unwrap();
        assert_eq!(one, vec!["HEAD".into(), Value::Nil, Value::List(vec![])]);

        let three = run(&ops, &strs(&["a", "b", "c"])).unwrap();
        assert_eq!(three, vec!["a".into(), "b".into(), Value::list(["c"])]);
    }

    #[test]
    fn test_required_after_optional() {
        let ops = [
            OperandSpec::new("a").required(),
            OperandSpec::new("b").default("B"),
            OperandSpec::new("c").required(),
        ];

        let two = run(&ops, &strs(&["x", "y"])).unwrap();
        assert_eq!(two, vec!["x".into(), "B".into(), "y".into()]);

        let three = run(&ops, &strs(&["x", "y", "z"])).unwrap();
        assert_eq!(three, vec!["x".into(), "y".into(), "z".into()]);
    }

    #[test]
    fn test_missing_required_names_operand() {
        let ops = [OperandSpec::new("repository").required()];
        let err = run(&ops, &[]).unwrap_err();
        assert_eq!(err, BindError::MissingOperand("repository".into()));

        let err = run(&ops, &[Value::Nil]).unwrap_err();
        assert_eq!(err, BindError::MissingOperand("repository".into()));
    }

    #[test]
    fn test_required_allow_nil_accepts_explicit_nil() {
        let ops = [OperandSpec::new("tree").required().allow_nil()];
        assert_eq!(run(&ops, &[Value::Nil]).unwrap(), vec![Value::Nil]);
        assert!(run(&ops, &[]).is_err());
    }

    #[test]
    fn test_nil_applies_default() {
        let ops = [OperandSpec::new("commit").default("HEAD")];
        assert_eq!(run(&ops, &[Value::Nil]).unwrap(), vec!["HEAD".into()]);
        assert_eq!(run(&ops, &[]).unwrap(), vec!["HEAD".into()]);
    }

    #[test]
    fn test_unexpected_positionals() {
        let ops = [OperandSpec::new("commit")];
        let err = run(&ops, &strs(&["a", "b", "c"])).unwrap_err();
        assert_eq!(
            err,
            BindError::UnexpectedPositionals(vec![r#""b""#.into(), r#""c""#.into()])
        );
    }

    #[test]
    fn test_trailing_nils_ignored() {
        let ops = [OperandSpec::new("commit")];
        let bound = run(&ops, &[Value::from("a"), Value::Nil, Value::Nil]).unwrap();
        assert_eq!(bound, vec!["a".into()]);
    }

    #[test]
    fn test_nil_inside_repeatable_is_rejected() {
        let ops = [OperandSpec::new("paths").repeatable()];
        let err = run(&ops, &[Value::from("a"), Value::Nil]).unwrap_err();
        assert_eq!(err, BindError::NilInRepeatableOperand("paths".into()));

        let err = run(&ops, &[Value::list([Value::from("a"), Value::Nil])]).unwrap_err();
        assert_eq!(err, BindError::NilInRepeatableOperand("paths".into()));
    }

    #[test]
    fn test_single_nil_in_repeatable() {
        let allow = [OperandSpec::new("paths").repeatable().allow_nil()];
        assert_eq!(run(&allow, &[Value::Nil]).unwrap(), vec![Value::List(vec![])]);

        let required = [OperandSpec::new("paths").repeatable().required()];
        let err = run(&required, &[Value::Nil]).unwrap_err();
        assert_eq!(err, BindError::EmptyRepeatableOperand("paths".into()));

        let plain = [OperandSpec::new("paths").repeatable()];
        let err = run(&plain, &[Value::Nil]).unwrap_err();
        assert_eq!(err, BindError::NilInRepeatableOperand("paths".into()));
    }

    #[test]
    fn test_list_argument_fills_repeatable() {
        let ops = [OperandSpec::new("paths").repeatable().required()];
        let bound = run(&ops, &[Value::list(["a", "b"])]).unwrap();
        assert_eq!(bound, vec![Value::list(["a", "b"])]);

        let err = run(&ops, &[Value::List(vec![])]).unwrap_err();
        assert_eq!(err, BindError::EmptyRepeatableOperand("paths".into()));
    }

    #[test]
    fn test_list_in_single_slot_is_rejected() {
        let ops = [OperandSpec::new("commit")];
        let err = run(&ops, &[Value::list(["a"])]).unwrap_err();
        assert!(matches!(err, BindError::InvalidType { actual: ValueKind::List, .. }));
    }
}
