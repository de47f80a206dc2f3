//! `git mv`.

use gitargs_core::{FlagSpec, OperandSpec, Schema};

use crate::command::{GitCommand, with_execution_options};

pub static MV: GitCommand = GitCommand::new(
    "mv",
    "Move or rename a file, a directory, or a symlink",
    schema,
);

fn schema() -> Schema {
    Schema::define(|s| {
        let s = s
            .flag(["force", "f"])
            .flag(["dry_run", "n"])
            .flag(["verbose", "v"])
            .flag(FlagSpec::new("skip_errors").args("-k"))
            .operand(OperandSpec::new("sources").repeatable().required())
            .operand(OperandSpec::new("destination").required());
        with_execution_options(s)
    })
    .expect("static mv schema must be valid")
}

#[cfg(test)]
mod tests {
    use gitargs_core::{BindError, Options, Value};

    use super::*;

    #[test]
    fn test_sources_then_destination() {
        let positionals = [Value::from("a.rs"), Value::from("b.rs"), Value::from("src/")];
        let bound = MV
            .schema()
            .bind(&positionals, &Options::new().with("skip_errors", true))
            .unwrap();
        assert_eq!(bound.tokens(), ["-k", "a.rs", "b.rs", "src/"]);
        assert_eq!(bound.list("sources").len(), 2);
        assert_eq!(bound.str("destination"), Some("src/"));
    }

    #[test]
    fn test_requires_a_source() {
        let err = MV
            .schema()
            .bind(&[Value::from("dest")], &Options::new())
            .unwrap_err();
        assert_eq!(err, BindError::EmptyRepeatableOperand("sources".into()));
    }

    #[test]
    fn test_sources_must_not_look_like_options() {
        let err = MV
            .schema()
            .bind(&[Value::from("-x"), Value::from("dest")], &Options::new())
            .unwrap_err();
        assert_eq!(
            err,
            BindError::OptionLikeValue {
                name: "sources".into(),
                value: "-x".into()
            }
        );
    }
}
