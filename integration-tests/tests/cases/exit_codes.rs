// SPDX-License-Identifier: GPL-3.0-or-later

//! Exit codes of the unsuccessful runs.

use crate::fixtures::*;
use anyhow::Result;

#[test]
fn help_exits_with_success() -> Result<()> {
    let env = TestEnvironment::new("help")?;

    let output = env.run_ycm_gen(&["--help"])?;
    output.assert_success()?;
    assert!(output.stdout().contains("PROJECT_DIR"));

    Ok(())
}

#[test]
fn usage_error_exits_with_one() -> Result<()> {
    let env = TestEnvironment::new("usage_error")?;

    let output = env.run_ycm_gen(&["--format", "json", "."])?;
    output.assert_exit_code(1)?;

    Ok(())
}

#[test]
fn missing_project_directory_exits_with_one() -> Result<()> {
    let env = TestEnvironment::new("missing_project")?;

    let output = env.run_ycm_gen(&["no-such-project"])?;
    output.assert_exit_code(1)?;
    assert!(output.stderr().contains("Project directory not found"));

    Ok(())
}

#[cfg(has_executable_true)]
#[test]
fn unknown_build_system_exits_with_two() -> Result<()> {
    let env = TestEnvironment::new("unknown_build_system")?;
    env.create_source_files(&[("main.c", "int main() { return 0; }\n")])?;

    let output = env.run_ycm_gen(&["--compiler", TRUE_PATH, "."])?;
    output.assert_exit_code(2)?;
    assert!(output.stderr().contains("Unknown build system"));
    assert!(!env.file_exists(".ycm_extra_conf.py"));

    Ok(())
}

#[test]
fn unavailable_compiler_exits_with_four() -> Result<()> {
    let env = TestEnvironment::new("unavailable_compiler")?;
    env.create_makefile("all:\n")?;

    let output = env.run_ycm_gen(&["--compiler", "no-such-compiler-ycm-gen", "."])?;
    output.assert_exit_code(4)?;
    assert!(output.stderr().contains("no-such-compiler-ycm-gen"));

    Ok(())
}

#[cfg(all(has_executable_true, has_executable_make, has_executable_shell))]
#[test]
fn empty_logs_exit_with_three_and_are_kept() -> Result<()> {
    let env = TestEnvironment::new("empty_logs")?;
    env.create_makefile("all:\n\t@echo nothing to compile\nclean:\n\t@echo clean\n")?;

    let output = env.run_ycm_gen(&["--compiler", TRUE_PATH, "--make", MAKE_PATH, "."])?;
    output.assert_exit_code(3)?;

    let logs = preserved_logs(&output.stderr());
    assert!(!logs.is_empty());
    for log in &logs {
        assert!(log.exists(), "log is not kept: {}", log.display());
    }
    for log in &logs {
        let _ = std::fs::remove_file(log);
    }
    assert!(!env.file_exists(".ycm_extra_conf.py"));

    Ok(())
}

#[cfg(has_executable_true)]
#[test]
fn declined_overwrite_exits_with_five() -> Result<()> {
    let env = TestEnvironment::new("declined_overwrite")?;
    env.create_makefile("all:\n")?;
    env.create_source_files(&[(".ycm_extra_conf.py", "# hand written\n")])?;

    let output = env.run_ycm_gen_with_input(&["--compiler", TRUE_PATH, "."], "n\n")?;
    output.assert_exit_code(5)?;
    assert!(output.stdout().contains("already exists. Overwrite? [y/N]"));
    assert_eq!(env.read_file(".ycm_extra_conf.py")?, "# hand written\n");

    Ok(())
}
