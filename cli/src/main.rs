use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use gitargs_commands::{Error as CommandError, GitCommand};
use gitargs_core::{Options, Value};
use gitargs_exec::{ExecError, GitRunner, RunnerConfig};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// How `render` prints the argv.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum RenderFormat {
    /// A JSON array of strings.
    Json,
    /// One token per line.
    Lines,
}

#[derive(Debug, Parser)]
#[command(name = "gitargs")]
#[command(about = "Render and run git commands from declarative argument schemas")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the available git commands.
    Commands,
    /// Print the argv a call binds to, without running it.
    Render(RenderArgs),
    /// Bind a call and run it with git.
    Run(RunArgs),
    /// Print the version of the configured git binary.
    Version(RunnerArgs),
}

#[derive(Debug, Args)]
struct CallArgs {
    /// Command name (see `gitargs commands`).
    command: String,
    /// Options as a JSON object, e.g. '{"message": "Fix", "all": true}'.
    #[arg(long, short = 'o', conflicts_with = "options_file")]
    options: Option<String>,
    /// Read the options JSON object from a file ("-" for stdin).
    #[arg(long)]
    options_file: Option<PathBuf>,
    /// Positional values, in order.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    call: CallArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: RenderFormat,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[command(flatten)]
    call: CallArgs,
    #[command(flatten)]
    runner: RunnerArgs,
}

#[derive(Debug, Args)]
struct RunnerArgs {
    /// Runner configuration YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Repository directory to run git in.
    #[arg(long)]
    repo: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Command::Commands => run_commands(),
        Command::Render(args) => run_render(args),
        Command::Run(args) => run_run(args),
        Command::Version(args) => run_version(args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn run_commands() -> Result<i32, String> {
    for command in gitargs_commands::all() {
        println!("{:<10} {}", command.name(), command.summary());
    }
    Ok(0)
}

fn run_render(args: RenderArgs) -> Result<i32, String> {
    let (command, positionals, options) = parse_call(&args.call)?;
    let invocation = command
        .build(&positionals, &options)
        .map_err(|err| err.to_string())?;

    match args.format {
        RenderFormat::Json => {
            let raw = serde_json::to_string(&invocation.argv)
                .map_err(|err| format!("Failed to serialize argv: {err}"))?;
            println!("{raw}");
        }
        RenderFormat::Lines => {
            for token in &invocation.argv {
                println!("{token}");
            }
        }
    }
    Ok(0)
}

fn run_run(args: RunArgs) -> Result<i32, String> {
    let (command, positionals, options) = parse_call(&args.call)?;
    let runner = build_runner(&args.runner)?;

    match command.run(&runner, &positionals, &options) {
        Ok(output) => {
            print!("{}", output.stdout);
            eprint!("{}", output.stderr);
            Ok(0)
        }
        Err(CommandError::Exec(ExecError::Failed {
            code,
            stdout,
            stderr,
            ..
        })) => {
            print!("{stdout}");
            eprint!("{stderr}");
            let _ = std::io::stdout().flush();
            debug!(command = command.name(), code, "git exited with an error");
            Ok(code)
        }
        Err(err) => Err(err.to_string()),
    }
}

fn run_version(args: RunnerArgs) -> Result<i32, String> {
    let runner = build_runner(&args)?;
    let version = runner.version().map_err(|err| err.to_string())?;
    println!("git version {version}");
    Ok(0)
}

fn build_runner(args: &RunnerArgs) -> Result<GitRunner, String> {
    let mut config = match &args.config {
        Some(path) => RunnerConfig::load(path)
            .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?,
        None => RunnerConfig::default(),
    };
    if let Some(repo) = &args.repo {
        config = config.with_work_dir(repo);
    }
    Ok(GitRunner::new(config))
}

fn parse_call(args: &CallArgs) -> Result<(&'static GitCommand, Vec<Value>, Options), String> {
    let command = gitargs_commands::require(&args.command).map_err(|err| err.to_string())?;
    let positionals = args.args.iter().map(Value::from).collect();

    let raw = match (&args.options, &args.options_file) {
        (Some(raw), _) => Some(raw.clone()),
        (None, Some(path)) => Some(read_options_file(path)?),
        (None, None) => None,
    };
    let options = match raw {
        Some(raw) => parse_options(&raw)?,
        None => Options::new(),
    };
    Ok((command, positionals, options))
}

fn read_options_file(path: &Path) -> Result<String, String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        return Ok(raw);
    }
    fs::read_to_string(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

fn parse_options(raw: &str) -> Result<Options, String> {
    let json: serde_json::Value =
        serde_json::from_str(raw).map_err(|err| format!("Invalid options JSON: {err}"))?;
    let serde_json::Value::Object(map) = json else {
        return Err(String::from("Options must be a JSON object"));
    };
    Ok(map.into_iter().map(|(name, value)| (name, Value::from(value))).collect())
}
