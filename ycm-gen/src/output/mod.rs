// SPDX-License-Identifier: GPL-3.0-or-later

//! Writing the selected flags into the configuration file of a completion
//! engine.
//!
//! The file is written next to its final location with a `.tmp` suffix and
//! renamed once complete, so an interrupted run never leaves a truncated
//! configuration behind.

mod formats;

use crate::intercept::Language;
use crate::reduce::{CanonicalFlagSet, Flag};
use formats::{ColorCoded, ConfigFormat, YcmExtraConf};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// The supported configuration file formats.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Format {
    #[default]
    #[serde(rename = "ycm")]
    Ycm,
    #[serde(rename = "cc")]
    ColorCoded,
}

impl Format {
    /// The file name the format is looked up by its completion engine.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Format::Ycm => ".ycm_extra_conf.py",
            Format::ColorCoded => ".color_coded",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ycm" => Ok(Format::Ycm),
            "cc" => Ok(Format::ColorCoded),
            _ => Err(format!("unknown output format: {value}")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Ycm => write!(f, "ycm"),
            Format::ColorCoded => write!(f, "cc"),
        }
    }
}

/// Writes one configuration file.
#[derive(Clone, Debug, PartialEq)]
pub struct Emitter {
    format: Format,
    path: PathBuf,
}

impl Emitter {
    pub fn new(format: Format, path: PathBuf) -> Self {
        Self { format, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// The arguments handed to the completion engine.
    pub fn flags(language: Language, flag_set: &CanonicalFlagSet) -> Vec<Flag> {
        std::iter::once(Flag::Paired("-x".to_string(), language.option_value().to_string()))
            .chain(flag_set.flags.iter().cloned())
            .collect()
    }

    pub fn emit(&self, language: Language, flag_set: &CanonicalFlagSet) -> Result<(), EmitError> {
        let flags = Self::flags(language, flag_set);
        let temp_path = temporary_path(&self.path);

        let result = self.write(&temp_path, &flags).and_then(|_| {
            fs::rename(&temp_path, &self.path)
                .map_err(|source| EmitError::Io { path: self.path.clone(), source })
        });
        if result.is_err() && temp_path.exists() {
            if let Err(error) = fs::remove_file(&temp_path) {
                log::debug!("Failed to remove {}: {error}", temp_path.display());
            }
        }
        result
    }

    fn write(&self, path: &Path, flags: &[Flag]) -> Result<(), EmitError> {
        let file = fs::File::create(path).map_err(|source| EmitError::Io { path: path.to_path_buf(), source })?;
        let writer = BufWriter::new(file);
        match self.format {
            Format::Ycm => YcmExtraConf::write(writer, flags),
            Format::ColorCoded => ColorCoded::write(writer, flags),
        }
        .map_err(|source| EmitError::Io { path: path.to_path_buf(), source })
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Ask the user whether an existing file shall be replaced.
///
/// Only an answer starting with `y` (any case) confirms.
pub fn confirm_overwrite<R: BufRead, W: Write>(path: &Path, mut input: R, mut output: W) -> std::io::Result<bool> {
    write!(output, "'{}' already exists. Overwrite? [y/N] ", path.display())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim_start().to_lowercase().starts_with('y'))
}

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Failed to write {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
