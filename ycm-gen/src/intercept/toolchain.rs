// SPDX-License-Identifier: GPL-3.0-or-later

//! The directory of fake compilers.
//!
//! Every compiler name is a hard link to the same shim executable (a copy
//! where the filesystem does not support hard links). The directory is put
//! first on `PATH` for the build, and removed when the run is over.

use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

/// The compiler names the shim is installed under.
pub const PROGRAM_NAMES: [&str; 6] = ["cc", "gcc", "clang", "c++", "g++", "clang++"];

pub struct ToolchainDirectory {
    directory: TempDir,
    programs: Vec<PathBuf>,
}

impl ToolchainDirectory {
    /// Create a fresh temporary directory and install the shim under every
    /// compiler name.
    pub fn create(shim: &Path) -> Result<Self, ToolchainError> {
        if !shim.is_file() {
            return Err(ToolchainError::ShimNotFound(shim.to_path_buf()));
        }
        let directory = tempfile::Builder::new()
            .prefix("ycm-gen-toolchain-")
            .tempdir()
            .map_err(ToolchainError::DirCreation)?;

        let programs = PROGRAM_NAMES
            .iter()
            .map(|name| install(shim, &directory.path().join(format!("{name}{}", std::env::consts::EXE_SUFFIX))))
            .collect::<Result<Vec<_>, _>>()?;

        let result = Self { directory, programs };
        log::info!("{result}");
        Ok(result)
    }

    pub fn path(&self) -> &Path {
        self.directory.path()
    }

    pub fn programs(&self) -> &[PathBuf] {
        &self.programs
    }
}

fn install(shim: &Path, destination: &Path) -> Result<PathBuf, ToolchainError> {
    #[cfg(not(windows))]
    if let Err(error) = std::fs::hard_link(shim, destination) {
        log::debug!("Hard link failed ({error}), falling back to copy");
        copy(shim, destination)?;
    }
    #[cfg(windows)]
    copy(shim, destination)?;

    Ok(destination.to_path_buf())
}

fn copy(shim: &Path, destination: &Path) -> Result<(), ToolchainError> {
    std::fs::copy(shim, destination)
        .map(|_| ())
        .map_err(|source| ToolchainError::Install { path: destination.to_path_buf(), source })
}

impl fmt::Display for ToolchainDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Set up toolchain directory: {}", self.path().display())?;
        for program in &self.programs {
            if let Some(name) = program.file_name() {
                writeln!(f, "    {}", name.to_string_lossy())?;
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("Shim executable not found: {}", .0.display())]
    ShimNotFound(PathBuf),
    #[error("Failed to create toolchain directory: {0}")]
    DirCreation(#[source] std::io::Error),
    #[error("Failed to install shim as {path}: {source}", path = .path.display())]
    Install {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
