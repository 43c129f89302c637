// SPDX-License-Identifier: GPL-3.0-or-later

pub const YCM_GEN_EXECUTABLE_PATH: &str = env!("YCM_GEN_EXECUTABLE_PATH");
#[allow(dead_code)]
pub const SHIM_EXECUTABLE_PATH: &str = env!("SHIM_EXECUTABLE_PATH");

#[cfg(has_executable_true)]
#[allow(dead_code)]
pub const TRUE_PATH: &str = env!("TRUE_PATH");
#[cfg(has_executable_false)]
#[allow(dead_code)]
pub const FALSE_PATH: &str = env!("FALSE_PATH");
#[cfg(has_executable_shell)]
#[allow(dead_code)]
pub const SHELL_PATH: &str = env!("SHELL_PATH");
#[cfg(has_executable_make)]
#[allow(dead_code)]
pub const MAKE_PATH: &str = env!("MAKE_PATH");
#[cfg(has_executable_compiler_c)]
#[allow(dead_code)]
pub const COMPILER_C_PATH: &str = env!("COMPILER_C_PATH");
