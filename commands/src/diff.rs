//! `git diff`.

use gitargs_core::{CustomSpec, FlagOrValueSpec, OperandSpec, Schema, ValueKind, ValueSpec};

use crate::command::{GitCommand, with_execution_options};

pub static DIFF: GitCommand = GitCommand::new(
    "diff",
    "Show changes between commits, commit and working tree, etc",
    schema,
);

const DIFF_FILTER_LETTERS: &str = "ACDMRTUXB*";

fn schema() -> Schema {
    Schema::define(|s| {
        let s = s
            .flag(["patch", "p"])
            .flag("stat")
            .flag("numstat")
            .flag("shortstat")
            .flag("name_only")
            .flag("name_status")
            .flag(["cached", "staged"])
            .flag("quiet")
            .flag("exit_code")
            .custom(
                CustomSpec::new(["unified", "U"], |v| match v.as_int() {
                    Some(lines) => vec![format!("--unified={lines}")],
                    None => Vec::new(),
                })
                .types([ValueKind::Integer]),
            )
            .flag_or_value(FlagOrValueSpec::new("color").negatable().inline())
            .flag_or_value(FlagOrValueSpec::new("word_diff").inline())
            .value(ValueSpec::new("diff_filter").inline().validator(|v| {
                v.as_str().is_some_and(|filter| {
                    !filter.is_empty()
                        && filter
                            .chars()
                            .all(|c| DIFF_FILTER_LETTERS.contains(c.to_ascii_uppercase()))
                })
            }))
            .conflicts(["patch", "stat"])
            .conflicts(["name_only", "name_status"])
            .operand("commit")
            .operand("other")
            .literal("--")
            .operand(OperandSpec::new("paths").repeatable());
        with_execution_options(s)
    })
    .expect("static diff schema must be valid")
}
