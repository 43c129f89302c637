// SPDX-License-Identifier: GPL-3.0-or-later

use super::compilers::Compilers;
use crate::environment::{KEY_MAKE__C_COMPILER, KEY_MAKE__CXX_COMPILER, KEY_OS__PATH, essential_env};
use crate::intercept::Language;
use std::collections::HashMap;
use std::env::JoinPathsError;
use std::path::{Path, PathBuf};

/// The environments the build commands run with.
///
/// Both are computed once, before the first command runs. The configuration
/// stage environment additionally names the real compilers, so the shims
/// delegate the compiler probes of the build system.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildEnvironment {
    build: HashMap<String, String>,
    configure: HashMap<String, String>,
}

impl BuildEnvironment {
    /// Create the environments.
    ///
    /// # Arguments
    ///
    /// * `captured` - The environment of the current process
    /// * `preserve` - Keep all variables, not only the essential ones
    /// * `toolchain` - The directory of the fake compilers
    /// * `log` - The log file of each language
    /// * `compilers` - The real compilers for the configuration stage
    pub fn create<'a>(
        captured: &HashMap<String, String>,
        preserve: bool,
        toolchain: &Path,
        log: impl Fn(Language) -> &'a Path,
        compilers: &Compilers,
    ) -> Result<Self, JoinPathsError> {
        let mut build: HashMap<String, String> = captured
            .iter()
            .filter(|(key, _)| preserve || essential_env(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let path_original = build.remove(KEY_OS__PATH).unwrap_or_default();
        let path_updated = insert_to_path(&path_original, toolchain)?;
        build.insert(KEY_OS__PATH.to_string(), path_updated);

        build.insert(KEY_MAKE__C_COMPILER.to_string(), "clang".to_string());
        build.insert(KEY_MAKE__CXX_COMPILER.to_string(), "clang++".to_string());
        for language in Language::ALL {
            build.insert(language.log_key().to_string(), log(language).to_string_lossy().to_string());
        }

        let mut configure = build.clone();
        configure.insert(Language::C.passthrough_key().to_string(), compilers.c.to_string_lossy().to_string());
        configure.insert(Language::Cxx.passthrough_key().to_string(), compilers.cxx.to_string_lossy().to_string());

        Ok(Self { build, configure })
    }

    /// The environment of the compile stage.
    pub fn build(&self) -> &HashMap<String, String> {
        &self.build
    }

    /// The environment of the configuration stage.
    pub fn configure(&self) -> &HashMap<String, String> {
        &self.configure
    }
}

/// Put the directory first on a `PATH`-like list, removing other occurrences.
fn insert_to_path(original: &str, first: &Path) -> Result<String, JoinPathsError> {
    if original.is_empty() {
        return Ok(first.to_string_lossy().to_string());
    }

    let mut paths: Vec<PathBuf> = std::env::split_paths(original).filter(|path| path.as_path() != first).collect();
    paths.insert(0, first.to_owned());
    std::env::join_paths(paths).map(|joined| joined.to_string_lossy().to_string())
}
