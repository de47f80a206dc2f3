//! Runner configuration.
//!
//! Every field is optional in the YAML file; missing fields take the
//! defaults of [`RunnerConfig::default`].
//!
//! # Example YAML
//!
//! ```yaml
//! binary: /usr/bin/git
//! global_args:
//!   - -c
//!   - color.ui=never
//! work_dir: /srv/repo
//! timeout_secs: 30
//! env:
//!   GIT_TERMINAL_PROMPT: "0"
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How [`GitRunner`](crate::GitRunner) launches git.
///
/// # Examples
///
/// ```
/// # use gitargs_exec::RunnerConfig;
/// let config: RunnerConfig = serde_yaml::from_str("timeout_secs: 10").unwrap();
/// assert_eq!(config.binary, "git");
/// assert_eq!(config.timeout_secs, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Executable to spawn.
    pub binary: String,
    /// Arguments placed before every command name (e.g. `-c key=value`).
    pub global_args: Vec<String>,
    /// Working directory; the current directory when unset.
    pub work_dir: Option<PathBuf>,
    /// Default timeout applied when a call does not set its own.
    pub timeout_secs: Option<u64>,
    /// Extra environment variables for every call.
    pub env: BTreeMap<String, String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: String::from("git"),
            global_args: Vec::new(),
            work_dir: None,
            timeout_secs: None,
            env: BTreeMap::new(),
        }
    }
}

impl RunnerConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ExecError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::ExecError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ExecError::Io) if the file cannot be written,
    /// or [`Yaml`](crate::ExecError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Sets the working directory.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }
}
