//! `git commit`.

use gitargs_core::{
    FlagOrValueSpec, FlagSpec, KeyValueSpec, OperandSpec, Schema, ValueKind, ValueSpec,
};

use crate::command::{GitCommand, with_execution_options};

pub static COMMIT: GitCommand =
    GitCommand::new("commit", "Record changes to the repository", schema);

const CLEANUP_MODES: [&str; 5] = ["strip", "whitespace", "verbatim", "scissors", "default"];

fn schema() -> Schema {
    Schema::define(|s| {
        let s = s
            .flag(["all", "a"])
            .flag("amend")
            .flag("no_edit")
            .flag("allow_empty")
            .flag("allow_empty_message")
            .flag(FlagSpec::new("verify").negatable())
            .flag(["signoff", "s"])
            .flag(["quiet", "q"])
            .flag("dry_run")
            .value(ValueSpec::new(["message", "m"]).args("-m").repeatable())
            .value(ValueSpec::new(["file", "F"]).types([ValueKind::String]))
            .value(ValueSpec::new("author").inline())
            .value(ValueSpec::new("date").inline())
            .value(
                ValueSpec::new("cleanup")
                    .inline()
                    .validator(|v| v.as_str().is_some_and(|mode| CLEANUP_MODES.contains(&mode))),
            )
            .flag_or_value(FlagOrValueSpec::new(["gpg_sign", "S"]).negatable().inline())
            .key_value(KeyValueSpec::new("trailers", "--trailer"))
            .conflicts(["message", "file"])
            .conflicts(["amend", "allow_empty"])
            .operand(OperandSpec::new("paths").repeatable().separator("--"));
        with_execution_options(s).execution_option("input")
    })
    .expect("static commit schema must be valid")
}
