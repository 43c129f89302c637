// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashSet;

// Contract between the build driver and the toolchain shim.
pub const KEY_SHIM__C_LOG: &str = "YCM_CONFIG_GEN_CC_LOG";
pub const KEY_SHIM__CXX_LOG: &str = "YCM_CONFIG_GEN_CXX_LOG";
pub const KEY_SHIM__C_PASSTHROUGH: &str = "YCM_CONFIG_GEN_CC_PASSTHROUGH";
pub const KEY_SHIM__CXX_PASSTHROUGH: &str = "YCM_CONFIG_GEN_CXX_PASSTHROUGH";

// man page for `exec` (Linux system call)
pub const KEY_OS__PATH: &str = "PATH";
pub const KEY_OS__HOME: &str = "HOME";
pub const KEY_OS__TMPDIR: &str = "TMPDIR";

// https://gcc.gnu.org/onlinedocs/cpp/Environment-Variables.html
pub const KEY_GCC__C_INCLUDE_1: &str = "CPATH";
pub const KEY_GCC__C_INCLUDE_2: &str = "C_INCLUDE_PATH";
pub const KEY_GCC__C_INCLUDE_3: &str = "CPLUS_INCLUDE_PATH";

// https://www.gnu.org/software/make/manual/html_node/Implicit-Variables.html
pub const KEY_MAKE__C_COMPILER: &str = "CC";
pub const KEY_MAKE__CXX_COMPILER: &str = "CXX";
pub const KEY_MAKE__C_PREPROCESSOR: &str = "CPP";

pub const KEY_MAKE__C_FLAGS: &str = "CFLAGS";
pub const KEY_MAKE__CXX_FLAGS: &str = "CXXFLAGS";
pub const KEY_MAKE__C_PREPROCESSOR_FLAGS: &str = "CPPFLAGS";
pub const KEY_MAKE__LINKER_FLAGS: &str = "LDFLAGS";

static SHIM_KEYS: std::sync::LazyLock<HashSet<&'static str>> = std::sync::LazyLock::new(|| {
    [KEY_SHIM__C_LOG, KEY_SHIM__CXX_LOG, KEY_SHIM__C_PASSTHROUGH, KEY_SHIM__CXX_PASSTHROUGH]
        .iter()
        .cloned()
        .collect()
});

static MAKE_KEYS: std::sync::LazyLock<HashSet<&'static str>> = std::sync::LazyLock::new(|| {
    [
        KEY_MAKE__C_COMPILER,
        KEY_MAKE__CXX_COMPILER,
        KEY_MAKE__C_PREPROCESSOR,
        KEY_MAKE__C_FLAGS,
        KEY_MAKE__CXX_FLAGS,
        KEY_MAKE__C_PREPROCESSOR_FLAGS,
        KEY_MAKE__LINKER_FLAGS,
    ]
    .iter()
    .cloned()
    .collect()
});

static GCC_INCLUDE_KEYS: std::sync::LazyLock<HashSet<&'static str>> = std::sync::LazyLock::new(|| {
    [KEY_GCC__C_INCLUDE_1, KEY_GCC__C_INCLUDE_2, KEY_GCC__C_INCLUDE_3].iter().cloned().collect()
});

/// Variables worth showing in diagnostics, because they influence which
/// compiler the build picks up or which flags it passes.
pub fn relevant_env(key: &str) -> bool {
    SHIM_KEYS.contains(key)
        || MAKE_KEYS.contains(key)
        || GCC_INCLUDE_KEYS.contains(key)
        || key.to_uppercase() == KEY_OS__PATH
}

/// Variables that survive into the build when the environment is not preserved.
pub fn essential_env(key: &str) -> bool {
    matches!(key, KEY_OS__PATH | KEY_OS__HOME | KEY_OS__TMPDIR)
}
