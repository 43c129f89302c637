// SPDX-License-Identifier: GPL-3.0-or-later

//! The module contains the compiler invocation interception functionality.
//!
//! The build runs with a directory of fake compilers placed first on `PATH`.
//! Each fake compiler is the same shim executable under a compiler name. When
//! the build system executes one of them, the shim records the argument vector
//! into a per-language log file, and then either exits (fake build) or runs
//! the real compiler (configuration stage). This happens in many short-lived
//! processes concurrently, the log files are the only shared resource.

pub mod log;
pub mod record;
pub mod shim;
pub mod supervise;
pub mod toolchain;

use crate::environment::{
    KEY_SHIM__C_LOG, KEY_SHIM__C_PASSTHROUGH, KEY_SHIM__CXX_LOG, KEY_SHIM__CXX_PASSTHROUGH,
};
use std::fmt;
use std::str::FromStr;

/// The two languages the fake toolchain can stand in for.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Language {
    C,
    Cxx,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::C, Language::Cxx];

    /// Decide the personality of a compiler by the name it was invoked as.
    ///
    /// Names like `c++`, `g++` or `clang++-18` are C++ compilers, everything
    /// else is treated as a C compiler.
    pub fn from_program_name(name: &str) -> Self {
        let name = name.strip_suffix(std::env::consts::EXE_SUFFIX).unwrap_or(name);
        if name.contains("++") || name == "cxx" || name == "CC" {
            Language::Cxx
        } else {
            Language::C
        }
    }

    /// The value of the `-x` compiler option selecting this language.
    pub fn option_value(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
        }
    }

    /// The environment variable which points the shim to its log file.
    pub fn log_key(&self) -> &'static str {
        match self {
            Language::C => KEY_SHIM__C_LOG,
            Language::Cxx => KEY_SHIM__CXX_LOG,
        }
    }

    /// The environment variable which points the shim to a real compiler.
    pub fn passthrough_key(&self) -> &'static str {
        match self {
            Language::C => KEY_SHIM__C_PASSTHROUGH,
            Language::Cxx => KEY_SHIM__CXX_PASSTHROUGH,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::C => write!(f, "C"),
            Language::Cxx => write!(f, "C++"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "c" => Ok(Language::C),
            "c++" | "cxx" | "cpp" => Ok(Language::Cxx),
            _ => Err(format!("unknown language: {value}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_program_name() {
        assert_eq!(Language::from_program_name("cc"), Language::C);
        assert_eq!(Language::from_program_name("gcc"), Language::C);
        assert_eq!(Language::from_program_name("clang"), Language::C);
        assert_eq!(Language::from_program_name("clang-18"), Language::C);
        assert_eq!(Language::from_program_name("c++"), Language::Cxx);
        assert_eq!(Language::from_program_name("g++"), Language::Cxx);
        assert_eq!(Language::from_program_name("clang++"), Language::Cxx);
        assert_eq!(Language::from_program_name("clang++-18"), Language::Cxx);
        assert_eq!(Language::from_program_name("cxx"), Language::Cxx);
        assert_eq!(Language::from_program_name("CC"), Language::Cxx);
        assert_eq!(Language::from_program_name("x86_64-linux-gnu-g++"), Language::Cxx);
        assert_eq!(Language::from_program_name("x86_64-linux-gnu-gcc"), Language::C);
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("c".parse::<Language>(), Ok(Language::C));
        assert_eq!("C++".parse::<Language>(), Ok(Language::Cxx));
        assert_eq!("cxx".parse::<Language>(), Ok(Language::Cxx));
        assert!("fortran".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_keys_are_distinct() {
        assert_ne!(Language::C.log_key(), Language::Cxx.log_key());
        assert_ne!(Language::C.passthrough_key(), Language::Cxx.passthrough_key());
        assert_eq!(Language::Cxx.option_value(), "c++");
        assert_eq!(Language::Cxx.to_string(), "C++");
    }
}
