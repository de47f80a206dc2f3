//! `git checkout`.

use gitargs_core::{FlagOrValueSpec, FlagSpec, OperandSpec, Schema, ValueSpec};

use crate::command::{GitCommand, with_execution_options};

pub static CHECKOUT: GitCommand = GitCommand::new(
    "checkout",
    "Switch branches or restore working tree files",
    schema,
);

fn schema() -> Schema {
    Schema::define(|s| {
        let s = s
            .flag(["quiet", "q"])
            .flag(["force", "f"])
            .flag(["merge", "m"])
            .flag("detach")
            .flag(FlagSpec::new("guess").negatable())
            .flag_or_value(FlagOrValueSpec::new(["track", "t"]).negatable().inline())
            .value(ValueSpec::new("new_branch").args("-b"))
            .value(ValueSpec::new("reset_branch").args("-B"))
            .value("orphan")
            .conflicts(["new_branch", "reset_branch", "orphan"])
            .conflicts(["detach", "new_branch"])
            .operand("start_point")
            .operand(OperandSpec::new("paths").repeatable().separator("--"));
        with_execution_options(s)
    })
    .expect("static checkout schema must be valid")
}

#[cfg(test)]
mod tests {
    use gitargs_core::{BindError, Options, Value};

    use super::*;

    #[test]
    fn test_new_branch_from_start_point() {
        let bound = CHECKOUT
            .schema()
            .bind(
                &[Value::from("origin/main")],
                &Options::new().with("new_branch", "feature").with("track", true),
            )
            .unwrap();
        assert_eq!(bound.tokens(), ["--track", "-b", "feature", "origin/main"]);
    }

    #[test]
    fn test_restore_paths() {
        let bound = CHECKOUT
            .schema()
            .bind(&[Value::from("HEAD"), Value::from("a.rs")], &Options::new())
            .unwrap();
        assert_eq!(bound.tokens(), ["HEAD", "--", "a.rs"]);
    }

    #[test]
    fn test_start_point_must_not_look_like_option() {
        let err = CHECKOUT
            .schema()
            .bind(&[Value::from("--orphan")], &Options::new())
            .unwrap_err();
        assert!(matches!(err, BindError::OptionLikeValue { ref name, .. } if name == "start_point"));
    }
}
