// SPDX-License-Identifier: GPL-3.0-or-later

//! Complete runs against make projects.
//!
//! The projects are not compiled for real: the fake compilers only record
//! the command lines, so the source files do not have to exist.

#![cfg(all(has_executable_make, has_executable_shell, has_executable_compiler_c))]

use crate::fixtures::*;
use anyhow::Result;

const MAKEFILE: &str = "\
all:
\t$(CXX) -DNAME=first -Iinclude -std=c++17 -Wall -c main.cpp -o main.o
\t$(CXX) -DNAME=second -isystem /opt/vendor/include -O2 -c util.cpp -o util.o
\t$(CC) -DLEGACY -Wextra -c legacy.c -o legacy.o
\t$(CC) -E legacy.c -o /dev/null
clean:
\trm -f *.o
";

#[test]
fn make_project_produces_ycm_config() -> Result<()> {
    let env = TestEnvironment::new("make_ycm")?;
    env.create_makefile(MAKEFILE)?;

    let output = env.run_ycm_gen(&["--compiler", COMPILER_C_PATH, "--make", MAKE_PATH, "."])?;
    output.assert_success()?;

    let stdout = output.stdout();
    assert!(stdout.contains("Collected 1 relevant entries for C compilation (1 skipped)."));
    assert!(stdout.contains("Collected 2 relevant entries for C++ compilation (0 skipped)."));

    let config = env.read_file(".ycm_extra_conf.py")?;
    assert!(config.starts_with("# Generated by ycm-gen at "));
    assert!(config.contains(
        "flags = [\n    '-x', 'c++',\n    '-DNAME=second',\n    '-I', 'include',\n    '-Wall',\n    \
         '-isystem', '/opt/vendor/include',\n    '-std=c++17',\n]\n"
    ));
    assert!(config.contains("def FlagsForFile(filename, **kwargs):"));

    Ok(())
}

#[test]
fn language_override_produces_color_coded_config() -> Result<()> {
    let env = TestEnvironment::new("make_color_coded")?;
    env.create_makefile(MAKEFILE)?;

    let output = env.run_ycm_gen(&[
        "--compiler",
        COMPILER_C_PATH,
        "--make",
        MAKE_PATH,
        "--format",
        "cc",
        "--language",
        "c",
        ".",
    ])?;
    output.assert_success()?;

    assert_eq!(env.read_file(".color_coded")?, "-x\nc\n-DLEGACY\n-Wextra\n");
    assert!(!env.file_exists(".ycm_extra_conf.py"));

    Ok(())
}

#[test]
fn confirmed_overwrite_replaces_the_config() -> Result<()> {
    let env = TestEnvironment::new("make_overwrite")?;
    env.create_makefile(MAKEFILE)?;
    env.create_source_files(&[("flags.txt", "stale\n")])?;

    let output = env.run_ycm_gen_with_input(
        &["--compiler", COMPILER_C_PATH, "--make", MAKE_PATH, "-f", "cc", "-o", "flags.txt", "."],
        "yes\n",
    )?;
    output.assert_success()?;

    let config = env.read_file("flags.txt")?;
    assert!(config.starts_with("-x\nc++\n"));
    assert!(!config.contains("stale"));
    assert!(!env.file_exists("flags.txt.tmp"));

    Ok(())
}

#[test]
fn configuration_file_sets_the_format() -> Result<()> {
    let env = TestEnvironment::new("make_config_file")?;
    env.create_makefile(MAKEFILE)?;
    env.create_source_files(&[("ycm-gen.yml", "schema: \"1.0\"\noutput:\n  format: cc\n")])?;

    let output = env.run_ycm_gen(&[
        "--config",
        "ycm-gen.yml",
        "--compiler",
        COMPILER_C_PATH,
        "--make",
        MAKE_PATH,
        ".",
    ])?;
    output.assert_success()?;

    assert!(env.file_exists(".color_coded"));

    Ok(())
}
