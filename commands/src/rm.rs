//! `git rm`.

use gitargs_core::{FlagSpec, OperandSpec, Schema, ValueSpec};

use crate::command::{GitCommand, with_execution_options};

pub static RM: GitCommand = GitCommand::new(
    "rm",
    "Remove files from the working tree and from the index",
    schema,
);

fn schema() -> Schema {
    Schema::define(|s| {
        let s = s
            .flag(["force", "f"])
            .flag(["dry_run", "n"])
            .flag(FlagSpec::new("recursive").args("-r"))
            .flag("cached")
            .flag(["quiet", "q"])
            .flag("ignore_unmatch")
            .flag("sparse")
            .value(ValueSpec::new("pathspec_from_file").inline())
            .flag("pathspec_file_nul")
            .operand(OperandSpec::new("paths").repeatable().separator("--"));
        with_execution_options(s)
    })
    .expect("static rm schema must be valid")
}
