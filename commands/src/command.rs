//! The shared shape of every git command.

use std::fmt;
use std::sync::LazyLock;

use gitargs_core::{BoundArgs, Options, Schema, Value};
use gitargs_exec::{CommandOutput, ExecOptions, Execute};
use tracing::debug;

use crate::error::Result;

/// A git subcommand backed by a schema built on first use.
pub struct GitCommand {
    name: &'static str,
    summary: &'static str,
    schema: LazyLock<Schema>,
}

/// A fully bound call, ready to hand to an executor.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Subcommand name followed by the rendered tokens.
    pub argv: Vec<String>,
    pub options: ExecOptions,
    pub bound: BoundArgs,
}

impl GitCommand {
    /// `define` runs once, the first time the schema is needed.
    pub const fn new(name: &'static str, summary: &'static str, define: fn() -> Schema) -> Self {
        Self {
            name,
            summary,
            schema: LazyLock::new(define),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn summary(&self) -> &'static str {
        self.summary
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Binds a call and prepares its argv and execution options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`](crate::Error::Bind) for arguments the schema
    /// rejects and [`Error::Exec`](crate::Error::Exec) for malformed
    /// execution options.
    pub fn build(&self, positionals: &[Value], options: &Options) -> Result<Invocation> {
        let bound = self.schema.bind(positionals, options)?;
        let exec_options = ExecOptions::from_bound(&bound)?;
        let argv = std::iter::once(self.name.to_string())
            .chain(bound.tokens().iter().cloned())
            .collect();
        Ok(Invocation {
            argv,
            options: exec_options,
            bound,
        })
    }

    /// Builds the call and executes it.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build); execution failures are returned as
    /// [`Error::Exec`](crate::Error::Exec).
    pub fn run<E: Execute + ?Sized>(
        &self,
        executor: &E,
        positionals: &[Value],
        options: &Options,
    ) -> Result<CommandOutput> {
        let invocation = self.build(positionals, options)?;
        debug!(command = self.name, argv = ?invocation.argv, "Running git command");
        Ok(executor.execute(&invocation.argv, &invocation.options)?)
    }
}

impl fmt::Debug for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitCommand")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

/// Declares the execution options every command accepts.
pub(crate) fn with_execution_options(
    builder: gitargs_core::SchemaBuilder,
) -> gitargs_core::SchemaBuilder {
    builder
        .execution_option("timeout")
        .execution_option("chdir")
        .execution_option("env")
}
