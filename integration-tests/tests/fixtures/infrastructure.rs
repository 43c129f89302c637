// SPDX-License-Identifier: GPL-3.0-or-later

//! Test infrastructure for the integration tests
//!
//! This module provides utilities for setting up project directories,
//! running the ycm-gen executable, and validating outputs.
//!
//! Set `YCM_GEN_TEST_VERBOSE=1` to show the output of the executable when
//! a test fails, and `YCM_GEN_TEST_PRESERVE_FAILURES=1` to keep the project
//! directory of a failed test.

use super::constants::*;
use anyhow::{Context, Result};
use assert_cmd::Command;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

/// Test environment of one test case.
///
/// Owns a temporary project directory and a separate home directory, so a
/// configuration file of the user running the tests is never picked up.
#[derive(Debug)]
pub struct TestEnvironment {
    temp_dir: tempfile::TempDir,
    home_dir: tempfile::TempDir,
    test_name: String,
    preserve_on_failure: bool,
    verbose: bool,
    last_output: RefCell<Option<RunOutput>>,
}

impl TestEnvironment {
    /// Create a new test environment
    pub fn new(test_name: &str) -> Result<Self> {
        let temp_dir = tempfile::TempDir::new()
            .with_context(|| format!("Failed to create temp dir for test: {}", test_name))?;
        let home_dir = tempfile::TempDir::new()
            .with_context(|| format!("Failed to create home dir for test: {}", test_name))?;

        let preserve_on_failure = std::env::var("YCM_GEN_TEST_PRESERVE_FAILURES")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let verbose = std::env::var("YCM_GEN_TEST_VERBOSE")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Ok(Self {
            temp_dir,
            home_dir,
            test_name: test_name.to_string(),
            preserve_on_failure,
            verbose,
            last_output: RefCell::new(None),
        })
    }

    /// Get the temporary directory path
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create source files in the test directory
    pub fn create_source_files(&self, files: &[(&str, &str)]) -> Result<()> {
        for (path, content) in files {
            let file_path = self.temp_dir().join(path);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
            fs::write(&file_path, content).with_context(|| format!("Failed to write file: {}", path))?;
        }
        Ok(())
    }

    /// Create a Makefile in the test directory
    #[allow(dead_code)]
    pub fn create_makefile(&self, content: &str) -> Result<PathBuf> {
        let makefile_path = self.temp_dir().join("Makefile");
        fs::write(&makefile_path, content)?;
        Ok(makefile_path)
    }

    /// Check if a file exists in the test directory
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.temp_dir().join(path).exists()
    }

    /// Read file content from test directory
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.temp_dir().join(path);
        fs::read_to_string(&file_path).with_context(|| format!("Failed to read file: {}", path))
    }

    /// Run ycm-gen with the given arguments in the test directory
    pub fn run_ycm_gen(&self, args: &[&str]) -> Result<RunOutput> {
        self.run_ycm_gen_with_input(args, "")
    }

    /// Run ycm-gen with the given arguments and standard input
    pub fn run_ycm_gen_with_input(&self, args: &[&str], input: &str) -> Result<RunOutput> {
        let mut cmd = Command::new(YCM_GEN_EXECUTABLE_PATH);
        cmd.current_dir(self.temp_dir())
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("RUST_LOG", "debug")
            .env("RUST_BACKTRACE", "1")
            .args(args)
            .write_stdin(input.to_string());

        let output = cmd.output()?;
        let result = RunOutput { output, verbose: self.verbose };

        *self.last_output.borrow_mut() = Some(result.clone());

        Ok(result)
    }

    /// Show the last output for debugging
    pub fn show_last_output(&self) {
        if let Some(ref output) = *self.last_output.borrow() {
            output.show_verbose_output();
        } else {
            eprintln!("No ycm-gen output available to show");
        }
    }

    /// Preserve test directory for debugging if test fails
    fn preserve_on_panic(&self) {
        if self.preserve_on_failure && std::thread::panicking() {
            let preserve_dir = std::env::temp_dir()
                .join(format!("ycm-gen-test-{}-{}", self.test_name, std::process::id()));

            if let Err(e) = fs::rename(self.temp_dir(), &preserve_dir) {
                eprintln!("Failed to preserve test directory: {}", e);
            } else {
                eprintln!("Test failed. Directory preserved at: {}", preserve_dir.display());
            }
        }

        if self.verbose && std::thread::panicking() {
            eprintln!("\n=== ycm-gen Verbose Output (Test: {}) ===", self.test_name);
            self.show_last_output();
            eprintln!("=== End ycm-gen Output ===\n");
        }
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        self.preserve_on_panic();
    }
}

/// Output of one ycm-gen run
#[derive(Debug, Clone)]
pub struct RunOutput {
    output: Output,
    verbose: bool,
}

impl RunOutput {
    pub fn exit_code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }

    /// Assert that the run terminated with the given exit code
    pub fn assert_exit_code(&self, expected: i32) -> Result<&Self> {
        if self.exit_code() != Some(expected) {
            if self.verbose {
                self.show_verbose_output();
            }
            anyhow::bail!(
                "Expected exit code {}, got {:?}\nstdout: {}\nstderr: {}",
                expected,
                self.exit_code(),
                self.stdout(),
                self.stderr()
            );
        }
        Ok(self)
    }

    /// Assert that the run succeeded
    #[allow(dead_code)]
    pub fn assert_success(&self) -> Result<&Self> {
        self.assert_exit_code(0)
    }

    /// Print the captured streams
    pub fn show_verbose_output(&self) {
        eprintln!("--- stdout ---\n{}", self.stdout());
        eprintln!("--- stderr ---\n{}", self.stderr());
    }
}

/// Paths of the logs kept after an unsuccessful run, taken from the error
/// message.
#[allow(dead_code)]
pub fn preserved_logs(stderr: &str) -> Vec<PathBuf> {
    stderr
        .lines()
        .filter_map(|line| line.split_once("The logs are kept at "))
        .flat_map(|(_, paths)| paths.split(" and ").map(|path| PathBuf::from(path.trim())).collect::<Vec<_>>())
        .collect()
}
