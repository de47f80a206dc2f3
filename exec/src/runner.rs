//! Subprocess execution of rendered argument vectors.
//!
//! [`GitRunner`] spawns the configured binary directly (never through a
//! shell) with `global_args` followed by the call's argv. Stdout and stderr
//! are drained on background threads so a chatty process cannot block on a
//! full pipe while the runner waits for it to exit.

use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use crate::config::RunnerConfig;
use crate::error::{ExecError, Result};
use crate::options::ExecOptions;
use crate::version::GitVersion;

/// Captured output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs an argument vector and returns its output.
///
/// `argv` starts with the git subcommand name. Implementations report a
/// non-zero exit, a signal or a timeout as an error.
pub trait Execute {
    fn execute(&self, argv: &[String], options: &ExecOptions) -> Result<CommandOutput>;
}

/// [`Execute`] implementation that spawns git.
#[derive(Debug, Clone, Default)]
pub struct GitRunner {
    config: RunnerConfig,
}

type Drain = JoinHandle<(Vec<u8>, std::io::Result<usize>)>;
type StdinWriter = JoinHandle<std::io::Result<()>>;

impl GitRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Full command line for `argv`: binary, global args, then argv.
    pub fn command_line(&self, argv: &[String]) -> Vec<String> {
        std::iter::once(self.config.binary.clone())
            .chain(self.config.global_args.iter().cloned())
            .chain(argv.iter().cloned())
            .collect()
    }

    /// Runs `--version` and parses the result.
    ///
    /// # Errors
    ///
    /// Propagates execution failures, and returns
    /// [`ExecError::UnparseableVersion`] for unexpected output.
    pub fn version(&self) -> Result<GitVersion> {
        let output = self.execute(&[String::from("--version")], &ExecOptions::default())?;
        GitVersion::parse(&output.stdout)
    }

    fn work_dir(&self, options: &ExecOptions) -> Option<PathBuf> {
        match (&self.config.work_dir, &options.chdir) {
            (Some(base), Some(dir)) => Some(base.join(dir)),
            (None, Some(dir)) => Some(dir.clone()),
            (base, None) => base.clone(),
        }
    }

    fn timeout(&self, options: &ExecOptions) -> Option<Duration> {
        options
            .timeout
            .or_else(|| self.config.timeout_secs.map(Duration::from_secs))
    }
}

impl Execute for GitRunner {
    fn execute(&self, argv: &[String], options: &ExecOptions) -> Result<CommandOutput> {
        let command_line = self.command_line(argv);
        let display = command_line.join(" ");

        let mut command = Command::new(&self.config.binary);
        command
            .args(&self.config.global_args)
            .args(argv)
            .stdin(if options.input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = self.work_dir(options) {
            command.current_dir(dir);
        }
        command.envs(&self.config.env);
        command.envs(options.env.iter().map(|(k, v)| (k, v)));

        debug!(command = ?command_line, "Spawning process");
        let mut child = command.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => ExecError::NotFound(self.config.binary.clone()),
            _ => ExecError::Spawn {
                program: self.config.binary.clone(),
                source: e,
            },
        })?;

        let stdin_thread = match (child.stdin.take(), options.input.clone()) {
            (Some(mut pipe), Some(input)) => Some(std::thread::spawn(move || {
                // Dropping the pipe at the end of the closure closes stdin.
                pipe.write_all(input.as_bytes())
            })),
            _ => None,
        };
        let stdout_thread = child.stdout.take().map(drain);
        let stderr_thread = child.stderr.take().map(drain);

        let timeout = self.timeout(options);
        let status = match wait(&mut child, timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let timeout_secs = timeout.map(|t| t.as_secs()).unwrap_or_default();
                warn!(command = ?command_line, timeout_secs, "Process timed out, killing it");
                let _ = child.kill();
                let _ = child.wait();
                return Err(ExecError::Timeout {
                    command: display,
                    timeout_secs,
                });
            }
            Err(e) => {
                debug!(command = ?command_line, error = %e, "Failed to wait on process");
                let _ = child.kill();
                let _ = child.wait();
                return Err(ExecError::Io(e));
            }
        };

        let stdout = collect(stdout_thread, &command_line, "stdout")?;
        let stderr = collect(stderr_thread, &command_line, "stderr")?;
        finish_stdin(stdin_thread, &command_line)?;

        info!(command = ?command_line, status = ?status.code(), "Process finished");
        let output = CommandOutput {
            status: status.code(),
            stdout,
            stderr,
        };
        check_status(display, status, output)
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Drain {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let result = pipe.read_to_end(&mut buf);
        (buf, result)
    })
}

fn collect(thread: Option<Drain>, command: &[String], stream: &str) -> Result<String> {
    match thread.map(JoinHandle::join) {
        None => Ok(String::new()),
        Some(Ok((buf, Ok(_)))) => Ok(String::from_utf8_lossy(&buf).into_owned()),
        Some(Ok((_, Err(e)))) => {
            warn!(command = ?command, stream, error = %e, "Failed to read output");
            Err(ExecError::Io(e))
        }
        Some(Err(_)) => {
            warn!(command = ?command, stream, "Output reader panicked");
            Err(ExecError::Io(std::io::Error::other(format!(
                "{stream} reader thread panicked"
            ))))
        }
    }
}

fn finish_stdin(thread: Option<StdinWriter>, command: &[String]) -> Result<()> {
    match thread.map(JoinHandle::join) {
        None | Some(Ok(Ok(()))) => Ok(()),
        // A process that exits without reading its input closes the pipe.
        Some(Ok(Err(e))) if e.kind() == ErrorKind::BrokenPipe => {
            debug!(command = ?command, "Process closed stdin before reading all input");
            Ok(())
        }
        Some(Ok(Err(e))) => {
            warn!(command = ?command, error = %e, "Failed to write stdin");
            Err(ExecError::Io(e))
        }
        Some(Err(_)) => {
            warn!(command = ?command, "Stdin writer panicked");
            Err(ExecError::Io(std::io::Error::other(
                "stdin writer thread panicked",
            )))
        }
    }
}

fn wait(child: &mut Child, timeout: Option<Duration>) -> std::io::Result<Option<ExitStatus>> {
    match timeout {
        Some(limit) => child.wait_timeout(limit),
        None => child.wait().map(Some),
    }
}

fn check_status(command: String, status: ExitStatus, output: CommandOutput) -> Result<CommandOutput> {
    if status.success() {
        return Ok(output);
    }
    if let Some(code) = status.code() {
        return Err(ExecError::Failed {
            command,
            code,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }
    Err(ExecError::Signaled {
        command,
        signal: signal(status),
    })
}

#[cfg(unix)]
fn signal(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().unwrap_or_default()
}

#[cfg(not(unix))]
fn signal(_status: ExitStatus) -> i32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_prepends_binary_and_globals() {
        let runner = GitRunner::new(RunnerConfig {
            global_args: vec!["-c".into(), "color.ui=never".into()],
            ..RunnerConfig::default()
        });
        assert_eq!(
            runner.command_line(&["status".into()]),
            vec!["git", "-c", "color.ui=never", "status"]
        );
    }

    #[test]
    fn test_chdir_is_relative_to_work_dir() {
        let runner = GitRunner::new(RunnerConfig::default().with_work_dir("/srv/repo"));
        let options = ExecOptions::new().with_chdir("sub");
        assert_eq!(runner.work_dir(&options), Some(PathBuf::from("/srv/repo/sub")));
        assert_eq!(
            runner.work_dir(&ExecOptions::new()),
            Some(PathBuf::from("/srv/repo"))
        );
        assert_eq!(GitRunner::default().work_dir(&ExecOptions::new()), None);
    }

    #[test]
    fn test_call_timeout_overrides_config() {
        let runner = GitRunner::new(RunnerConfig {
            timeout_secs: Some(60),
            ..RunnerConfig::default()
        });
        assert_eq!(runner.timeout(&ExecOptions::new()), Some(Duration::from_secs(60)));
        let options = ExecOptions::new().with_timeout(Duration::from_secs(2));
        assert_eq!(runner.timeout(&options), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_missing_binary() {
        let runner = GitRunner::new(RunnerConfig {
            binary: "gitargs-definitely-missing-binary".into(),
            ..RunnerConfig::default()
        });
        let err = runner.execute(&[], &ExecOptions::new()).unwrap_err();
        assert!(matches!(err, ExecError::NotFound(_)));
    }

    #[test]
    fn test_stdin_write_errors_surface_except_broken_pipe() {
        let command = vec!["git".to_string()];
        let writer = |kind: ErrorKind| -> StdinWriter {
            std::thread::spawn(move || Err(std::io::Error::from(kind)))
        };

        assert!(finish_stdin(None, &command).is_ok());
        assert!(finish_stdin(Some(writer(ErrorKind::BrokenPipe)), &command).is_ok());
        let err = finish_stdin(Some(writer(ErrorKind::PermissionDenied)), &command).unwrap_err();
        assert!(matches!(err, ExecError::Io(e) if e.kind() == ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_panicked_threads_are_io_errors() {
        let command = vec!["git".to_string()];

        let reader: Drain = std::thread::spawn(|| panic!("reader"));
        let err = collect(Some(reader), &command, "stdout").unwrap_err();
        assert!(matches!(err, ExecError::Io(e) if e.to_string().contains("stdout")));

        let writer: StdinWriter = std::thread::spawn(|| panic!("writer"));
        assert!(matches!(
            finish_stdin(Some(writer), &command),
            Err(ExecError::Io(_))
        ));
    }

    #[test]
    fn test_collect_decodes_output() {
        let reader: Drain = std::thread::spawn(|| (b"ok\n".to_vec(), Ok(3)));
        assert_eq!(collect(Some(reader), &[], "stdout").unwrap(), "ok\n");
        assert_eq!(collect(None, &[], "stderr").unwrap(), "");
    }
}
