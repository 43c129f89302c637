// SPDX-License-Identifier: GPL-3.0-or-later

//! Lookup of the real compilers.
//!
//! The configuration stage of the build probes the compilers (CMake and
//! configure scripts compile test programs), so the shim has to delegate
//! those runs to a working compiler.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The real C and C++ compilers.
#[derive(Clone, Debug, PartialEq)]
pub struct Compilers {
    pub c: PathBuf,
    pub cxx: PathBuf,
}

impl Compilers {
    /// Resolve the C compiler by name and derive the C++ compiler from it.
    ///
    /// `clang` becomes `clang++`, `/opt/llvm/bin/clang-18` becomes
    /// `/opt/llvm/bin/clang++-18`. Names without `clang` are used for both.
    pub fn locate<P: AsRef<OsStr>>(c_compiler: &str, paths: Option<P>, cwd: &Path) -> Result<Self, CompilerError> {
        let cxx_compiler = cxx_name(c_compiler);

        let c = Self::resolve(c_compiler, paths.as_ref(), cwd)?;
        let cxx = Self::resolve(&cxx_compiler, paths.as_ref(), cwd)?;
        log::info!("Using compilers: {} and {}", c.display(), cxx.display());
        Ok(Self { c, cxx })
    }

    fn resolve<P: AsRef<OsStr>>(name: &str, paths: Option<&P>, cwd: &Path) -> Result<PathBuf, CompilerError> {
        which::which_in(name, paths, cwd)
            .map_err(|source| CompilerError::NotFound { name: name.to_string(), source })
    }
}

/// The C++ compiler name of a C compiler name.
fn cxx_name(c_compiler: &str) -> String {
    c_compiler.replace("clang", "clang++")
}

#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("Compiler '{name}' not found: {source}")]
    NotFound {
        name: String,
        #[source]
        source: which::Error,
    },
}
