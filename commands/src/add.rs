//! `git add`.

use gitargs_core::{FlagSpec, OperandSpec, Schema, ValueSpec};

use crate::command::{GitCommand, with_execution_options};

pub static ADD: GitCommand = GitCommand::new("add", "Add file contents to the index", schema);

fn schema() -> Schema {
    Schema::define(|s| {
        let s = s
            .flag(["all", "A"])
            .flag(["update", "u"])
            .flag(["force", "f"])
            .flag(["dry_run", "n"])
            .flag(["verbose", "v"])
            .flag(["intent_to_add", "N"])
            .flag("refresh")
            .flag("ignore_errors")
            .flag(FlagSpec::new("ignore_removal").negatable())
            .value(
                ValueSpec::new("chmod")
                    .inline()
                    .validator(|v| matches!(v.as_str(), Some("+x" | "-x"))),
            )
            .conflicts(["all", "update"])
            .operand(OperandSpec::new("paths").repeatable().separator("--"));
        with_execution_options(s)
    })
    .expect("static add schema must be valid")
}
