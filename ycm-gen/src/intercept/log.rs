// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-language invocation logs.
//!
//! The shim processes append records to these files concurrently, while the
//! reducer reads them once the build has finished. The files are owned by
//! the run that created them: they are removed when the owner is dropped,
//! unless the owner decides to preserve them for diagnostics.

use super::Language;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;

/// Append one record to the log file.
///
/// The file is opened in append mode and locked for the time of writing, and
/// the whole line goes out in a single write. Concurrent writers therefore
/// never interleave their lines, only the order of the lines is undefined.
pub fn append(path: &Path, record: &str) -> Result<(), LogError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogError::Open { path: path.to_path_buf(), source })?;

    let mut line = String::with_capacity(record.len() + 1);
    line.push_str(record);
    line.push('\n');

    file.lock().map_err(|source| LogError::Lock { path: path.to_path_buf(), source })?;
    let result = file
        .write_all(line.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|source| LogError::Write { path: path.to_path_buf(), source });
    if let Err(error) = file.unlock() {
        log::debug!("Failed to unlock {}: {error}", path.display());
    }
    result
}

/// Streams the lines of a log file.
pub struct LogReader<R: BufRead> {
    source: R,
    path: PathBuf,
}

impl LogReader<BufReader<File>> {
    /// Open the log file for reading.
    pub fn open(path: &Path) -> Result<Self, LogError> {
        let file = File::open(path).map_err(|source| LogError::Open { path: path.to_path_buf(), source })?;
        Ok(Self { source: BufReader::new(file), path: path.to_path_buf() })
    }
}

impl<R: BufRead> LogReader<R> {
    pub fn new(source: R, path: &Path) -> Self {
        Self { source, path: path.to_path_buf() }
    }

    /// The lines of the log in file order.
    ///
    /// Invalid UTF-8 sequences are replaced, read errors end the stream with
    /// a warning.
    pub fn lines(self) -> impl Iterator<Item = String> {
        let path = self.path;
        self.source
            .split(b'\n')
            .map_while(move |line| match line {
                Ok(bytes) => Some(bytes),
                Err(error) => {
                    log::warn!("Failed to read log {}: {error}", path.display());
                    None
                }
            })
            .map(|bytes| {
                let line = String::from_utf8_lossy(&bytes);
                let line: &str = &line;
                line.strip_suffix('\r').unwrap_or(line).to_string()
            })
    }
}

/// The pair of log files of a run.
///
/// The files are created empty up front, so an absent file never has to be
/// distinguished from a build which did not compile anything.
pub struct InvocationLogs {
    c: TempPath,
    cxx: TempPath,
}

impl InvocationLogs {
    /// Create both log files in the temporary directory.
    pub fn create() -> Result<Self, LogError> {
        Ok(Self { c: Self::create_one(Language::C)?, cxx: Self::create_one(Language::Cxx)? })
    }

    fn create_one(language: Language) -> Result<TempPath, LogError> {
        let prefix = match language {
            Language::C => "ycm-gen-c-",
            Language::Cxx => "ycm-gen-cxx-",
        };
        tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".log")
            .tempfile()
            .map(|file| file.into_temp_path())
            .map_err(LogError::Create)
    }

    pub fn path(&self, language: Language) -> &Path {
        match language {
            Language::C => &self.c,
            Language::Cxx => &self.cxx,
        }
    }

    pub fn reader(&self, language: Language) -> Result<LogReader<BufReader<File>>, LogError> {
        LogReader::open(self.path(language))
    }

    /// Keep the files on disk after the run, and return their locations.
    pub fn preserve(self) -> Result<PreservedLogs, LogError> {
        let c = self.c.keep().map_err(|error| LogError::Preserve(error.error))?;
        let cxx = self.cxx.keep().map_err(|error| LogError::Preserve(error.error))?;
        Ok(PreservedLogs { c, cxx })
    }
}

/// Locations of the log files which were left on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct PreservedLogs {
    pub c: PathBuf,
    pub cxx: PathBuf,
}

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to create log file: {0}")]
    Create(std::io::Error),
    #[error("Failed to open log file {path}: {source}", path = .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to lock log file {path}: {source}", path = .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write log file {path}: {source}", path = .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to preserve log file: {0}")]
    Preserve(std::io::Error),
}
