//! Per-call execution options.
//!
//! Commands declare execution options in their schema; binding collects the
//! non-nil ones and [`ExecOptions::from_bound`] decodes them:
//!
//! | Name | Value | Effect |
//! |---|---|---|
//! | `timeout` | positive integer | seconds before the process is killed |
//! | `chdir` | string | working directory (relative to the runner's) |
//! | `env` | map of strings/integers | extra environment variables |
//! | `input` | string | written to the process's stdin |

use std::path::PathBuf;
use std::time::Duration;

use gitargs_core::{BoundArgs, Value};

use crate::error::{ExecError, Result};

/// Decoded execution options for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub timeout: Option<Duration>,
    pub chdir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub input: Option<String>,
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the execution options collected by a bind call.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::UnsupportedOption`] for an unknown name and
    /// [`ExecError::InvalidOption`] for a value of the wrong shape.
    pub fn from_bound(bound: &BoundArgs) -> Result<Self> {
        Self::from_pairs(bound.execution_options())
    }

    /// Decodes `(name, value)` pairs; nil values are skipped.
    ///
    /// # Errors
    ///
    /// See [`from_bound`](Self::from_bound).
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a Value)>) -> Result<Self> {
        let mut options = Self::default();
        for (name, value) in pairs {
            if value.is_nil() {
                continue;
            }
            match name {
                "timeout" => options.timeout = Some(decode_timeout(value)?),
                "chdir" => {
                    let dir = value
                        .as_str()
                        .ok_or_else(|| invalid(name, "expected a path string", value))?;
                    options.chdir = Some(PathBuf::from(dir));
                }
                "env" => options.env = decode_env(value)?,
                "input" => {
                    let input = value
                        .as_str()
                        .ok_or_else(|| invalid(name, "expected a string", value))?;
                    options.input = Some(input.to_string());
                }
                other => return Err(ExecError::UnsupportedOption(other.to_string())),
            }
        }
        Ok(options)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_chdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chdir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

fn invalid(name: &str, expected: &str, value: &Value) -> ExecError {
    ExecError::InvalidOption {
        name: name.to_string(),
        reason: format!("{expected}, got {value}"),
    }
}

fn decode_timeout(value: &Value) -> Result<Duration> {
    match value.as_int() {
        Some(secs) if secs > 0 => Ok(Duration::from_secs(secs.unsigned_abs())),
        _ => Err(invalid("timeout", "expected a positive number of seconds", value)),
    }
}

fn decode_env(value: &Value) -> Result<Vec<(String, String)>> {
    let entries = value
        .as_map()
        .ok_or_else(|| invalid("env", "expected a map", value))?;
    entries
        .iter()
        .map(|(key, v)| {
            v.to_token()
                .map(|text| (key.clone(), text))
                .ok_or_else(|| invalid("env", &format!("expected a string for `{key}`"), v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(pairs: &[(&str, Value)]) -> Result<ExecOptions> {
        ExecOptions::from_pairs(pairs.iter().map(|(n, v)| (*n, v)))
    }

    #[test]
    fn test_decode_all_options() {
        let options = decode(&[
            ("timeout", Value::Int(30)),
            ("chdir", Value::from("sub")),
            ("env", Value::map([("GIT_AUTHOR_NAME", Value::from("Ann")), ("N", Value::Int(1))])),
            ("input", Value::from("data")),
        ])
        .unwrap();

        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.chdir, Some(PathBuf::from("sub")));
        assert_eq!(
            options.env,
            vec![
                ("GIT_AUTHOR_NAME".to_string(), "Ann".to_string()),
                ("N".to_string(), "1".to_string())
            ]
        );
        assert_eq!(options.input.as_deref(), Some("data"));
    }

    #[test]
    fn test_nil_is_skipped() {
        let options = decode(&[("timeout", Value::Nil)]).unwrap();
        assert_eq!(options, ExecOptions::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            decode(&[("timeout", Value::Int(0))]),
            Err(ExecError::InvalidOption { .. })
        ));
        assert!(matches!(
            decode(&[("timeout", Value::from("30"))]),
            Err(ExecError::InvalidOption { .. })
        ));
        assert!(matches!(
            decode(&[("env", Value::list(["A=1"]))]),
            Err(ExecError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_names() {
        let err = decode(&[("retries", Value::Int(3))]).unwrap_err();
        assert!(matches!(err, ExecError::UnsupportedOption(name) if name == "retries"));
    }
}
