// SPDX-License-Identifier: GPL-3.0-or-later

//! The behavior of one fake compiler invocation.

use super::supervise::{SuperviseError, Supervisor};
use super::{Language, log as invocation_log, record};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// One shim invocation, configured from its name and environment.
#[derive(Debug, PartialEq)]
pub struct Shim {
    language: Language,
    log: Option<PathBuf>,
    passthrough: Option<PathBuf>,
}

impl Shim {
    /// Configure the shim from the program name it was invoked as and the
    /// environment lookup function.
    pub fn configure<F>(program: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let language = Language::from_program_name(program);
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty()).map(PathBuf::from);

        Self { language, log: non_empty(language.log_key()), passthrough: non_empty(language.passthrough_key()) }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Record the invocation, then run the real compiler if there is one.
    ///
    /// The arguments include the program name. Returns the exit code the
    /// process shall terminate with.
    pub fn run(&self, arguments: &[String]) -> Result<i32, ShimError> {
        match &self.passthrough {
            Some(compiler) => {
                if let Err(error) = self.record(arguments) {
                    log::error!("Failed to record the invocation: {error}");
                }
                self.delegate(compiler, arguments)
            }
            None => {
                self.record(arguments)?;
                Ok(0)
            }
        }
    }

    fn record(&self, arguments: &[String]) -> Result<(), ShimError> {
        let path = self.log.as_deref().ok_or(ShimError::MissingLog(self.language.log_key()))?;
        let line = record::serialize(arguments);
        log::debug!("Recording into {}: {line}", path.display());
        invocation_log::append(path, &line)?;
        Ok(())
    }

    fn delegate(&self, compiler: &Path, arguments: &[String]) -> Result<i32, ShimError> {
        let mut command = Command::new(compiler);
        command.args(arguments.iter().skip(1));
        log::debug!("Delegating to {}", compiler.display());

        let status = Supervisor::new()?.run(&mut command)?;
        Ok(exit_code(status))
    }
}

/// The exit code of a child, as a shell reports it: a child terminated by a
/// signal gives 128 plus the signal number.
fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(1)
}

#[derive(Error, Debug)]
pub enum ShimError {
    #[error("Environment variable {0} is not set")]
    MissingLog(&'static str),
    #[error(transparent)]
    Log(#[from] invocation_log::LogError),
    #[error(transparent)]
    Supervise(#[from] SuperviseError),
}
