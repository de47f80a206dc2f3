//! `git log`.

use gitargs_core::{FlagOrValueSpec, OperandSpec, Schema, ValueKind, ValueSpec};

use crate::command::{GitCommand, with_execution_options};

pub static LOG: GitCommand = GitCommand::new("log", "Show commit logs", schema);

fn schema() -> Schema {
    Schema::define(|s| {
        let s = s
            .flag("oneline")
            .flag("all")
            .flag("reverse")
            .flag("first_parent")
            .flag("merges")
            .flag("no_merges")
            .flag("follow")
            .flag(["patch", "p"])
            .flag("stat")
            .value(
                ValueSpec::new(["max_count", "n"])
                    .inline()
                    .types([ValueKind::Integer]),
            )
            .value(ValueSpec::new("skip").inline().types([ValueKind::Integer]))
            .value(ValueSpec::new(["format", "pretty"]).inline())
            .value(ValueSpec::new("since").inline())
            .value(ValueSpec::new("until").inline())
            .value(ValueSpec::new("author").inline().repeatable())
            .value(ValueSpec::new("grep").inline().repeatable())
            .flag_or_value(FlagOrValueSpec::new("decorate").negatable().inline())
            .conflicts(["merges", "no_merges"])
            .operand("revision_range")
            .operand(OperandSpec::new("paths").repeatable().separator("--"));
        with_execution_options(s)
    })
    .expect("static log schema must be valid")
}
