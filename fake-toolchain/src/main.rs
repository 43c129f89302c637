// SPDX-License-Identifier: GPL-3.0-or-later

//! The fake compiler of the toolchain directory.
//!
//! The executable is installed under the names of the common compilers
//! (`cc`, `gcc`, `clang`, `c++`, `g++`, `clang++`). The name it was invoked
//! as selects the language, and with it the invocation log the command line
//! is appended to. During the configuration stage of the build the real
//! compiler is also run, so the configure checks see a working toolchain.
//! Otherwise it does not compile anything and always succeeds.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use ycm_gen::intercept::shim::Shim;

fn main() -> Result<()> {
    let pid = std::process::id();
    let _ = env_logger::Builder::from_default_env()
        .format(move |buf, record| {
            let timestamp = buf.timestamp();
            writeln!(buf, "[{timestamp} shim/{pid}] {}", record.args())
        })
        .try_init();

    let arguments: Vec<String> =
        std::env::args_os().map(|argument| argument.to_string_lossy().to_string()).collect();
    let program = program_name(&arguments)?;

    let shim = Shim::configure(&program, |key| std::env::var(key).ok());
    log::debug!("Invoked as {program} for {} compilation", shim.language());

    match shim.run(&arguments) {
        Ok(code) => {
            log::debug!("Exiting with {code}");
            std::process::exit(code)
        }
        Err(error) => {
            log::debug!("Shim failed: {error:?}");
            eprintln!("ycm-shim: {error}");
            std::process::exit(1)
        }
    }
}

/// The file name the process was started with, without the executable suffix.
fn program_name(arguments: &[String]) -> Result<String> {
    let from_arguments = arguments.first().and_then(|first| file_stem(Path::new(first)));
    match from_arguments {
        Some(name) => Ok(name),
        None => {
            let executable = std::env::current_exe().with_context(|| "Cannot get the current executable")?;
            file_stem(&executable).with_context(|| "Cannot get the name of the executable")
        }
    }
}

fn file_stem(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_string();
    let suffix = std::env::consts::EXE_SUFFIX;
    let name = match name.strip_suffix(suffix) {
        Some(stripped) if !suffix.is_empty() => stripped.to_string(),
        _ => name,
    };
    if name.is_empty() { None } else { Some(name) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_from_path() {
        let arguments = vec!["/tmp/ycm-gen-toolchain-x/clang++".to_string(), "-c".to_string()];

        assert_eq!(program_name(&arguments).unwrap(), "clang++");
    }

    #[test]
    fn test_program_name_from_bare_name() {
        let arguments = vec!["gcc".to_string()];

        assert_eq!(program_name(&arguments).unwrap(), "gcc");
    }

    #[test]
    fn test_program_name_falls_back_to_executable() {
        let name = program_name(&[]).unwrap();

        assert!(!name.is_empty());
    }
}
