//! The result of a successful bind.

use std::ops::Index;

use serde::Serialize;

use crate::Value;

static NIL: Value = Value::Nil;

/// Rendered tokens plus the resolved value of every declared name.
///
/// Values are keyed by canonical name. Options that were not supplied read
/// as [`Value::Nil`]; operands hold their resolved value (a list for the
/// repeatable operand). Execution options are kept apart so callers can hand
/// them to an executor without rendering them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundArgs {
    tokens: Vec<String>,
    #[serde(serialize_with = "serialize_pairs")]
    values: Vec<(String, Value)>,
    #[serde(serialize_with = "serialize_pairs")]
    execution_options: Vec<(String, Value)>,
}

impl BoundArgs {
    pub(crate) fn new(
        tokens: Vec<String>,
        values: Vec<(String, Value)>,
        execution_options: Vec<(String, Value)>,
    ) -> Self {
        Self {
            tokens,
            values,
            execution_options,
        }
    }

    /// Command-line tokens in declaration order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    /// Resolved value for a canonical name, or `None` for undeclared names.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Whether the named value is truthy.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_truthy)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The named value as a list; scalars read as a one-element slice and
    /// nil as an empty one.
    pub fn list(&self, name: &str) -> &[Value] {
        match self.get(name) {
            Some(Value::List(items)) => items,
            Some(Value::Nil) | None => &[],
            Some(other) => std::slice::from_ref(other),
        }
    }

    /// Whether the named value is non-nil.
    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_nil())
    }

    /// Every declared name with its resolved value, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Non-nil execution options, in declaration order.
    pub fn execution_options(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.execution_options.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl Index<&str> for BoundArgs {
    type Output = Value;

    /// Undeclared names index as nil.
    fn index(&self, name: &str) -> &Value {
        self.get(name).unwrap_or(&NIL)
    }
}

fn serialize_pairs<S: serde::Serializer>(
    pairs: &[(String, Value)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}
