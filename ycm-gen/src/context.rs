// SPDX-License-Identifier: GPL-3.0-or-later

use crate::environment::{self, KEY_OS__PATH};
use anyhow::{Context as AnyhowContext, Result};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// The process state ycm-gen was started with.
///
/// Taken once at startup. The later phases (settings, compiler lookup, the
/// build environment) read this snapshot, never the live process state.
#[derive(Debug, Clone)]
pub struct Context {
    /// Path of the running `ycm-gen` executable
    pub current_executable: PathBuf,
    /// Relative paths of the command line are resolved against this
    pub current_directory: PathBuf,
    /// Environment variables with unicode keys and values
    pub environment: HashMap<String, String>,
}

impl Context {
    pub fn capture() -> Result<Self> {
        let current_executable =
            env::current_exe().with_context(|| "Failed to get current executable path")?;
        let current_directory =
            env::current_dir().with_context(|| "Failed to get current working directory")?;

        let environment: HashMap<String, String> = env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    log::debug!("Ignoring non-unicode environment variable: {key:?}");
                    None
                }
            })
            .collect();

        Ok(Context { current_executable, current_directory, environment })
    }

    /// The key and value of the executable search path.
    ///
    /// The key is matched case insensitively (`Path` on Windows).
    pub fn path(&self) -> Option<(String, String)> {
        self.environment
            .iter()
            .find(|(key, _)| key.to_uppercase() == KEY_OS__PATH)
            .map(|(key, value)| (key.clone(), value.clone()))
    }

    /// The directory of the running executable, where `ycm-shim` is installed.
    pub fn executable_directory(&self) -> Option<PathBuf> {
        self.current_executable.parent().map(|dir| dir.to_path_buf())
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Context:")?;
        writeln!(f, "  executable: {}", self.current_executable.display())?;
        writeln!(f, "  working directory: {}", self.current_directory.display())?;
        writeln!(f, "  environment: {} variables, of which relevant:", self.environment.len())?;

        let mut relevant: Vec<_> =
            self.environment.iter().filter(|(key, _)| environment::relevant_env(key)).collect();
        relevant.sort();
        for (key, value) in relevant {
            writeln!(f, "    {key}={value}")?;
        }
        Ok(())
    }
}
