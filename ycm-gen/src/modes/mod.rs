// SPDX-License-Identifier: GPL-3.0-or-later

//! The run of the application: build, reduce, select and emit.

mod settings;

pub use settings::Settings;

use crate::build::{self, BuildEnvironment, BuildError, BuildSystem, CompilerError, Compilers};
use crate::context::Context;
use crate::intercept::Language;
use crate::intercept::log::{InvocationLogs, LogError};
use crate::intercept::toolchain::{ToolchainDirectory, ToolchainError};
use crate::output::{self, EmitError};
use crate::reduce::{self, CanonicalFlagSet};
use crate::select::{self, NothingRecorded};
use crate::{args, config};
use std::env::JoinPathsError;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// The configured application, ready to run.
pub struct Application {
    context: Context,
    settings: Settings,
}

impl Application {
    /// Merge the command line and the configuration, and check that the
    /// project directory exists.
    pub fn configure(
        context: Context,
        arguments: args::Arguments,
        configuration: config::Main,
    ) -> Result<Self, RunError> {
        let settings = Settings::new(&context, arguments, configuration)?;
        log::info!("{settings}");
        Ok(Self { context, settings })
    }

    /// Run the application and report the outcome as the process exit code.
    pub fn run(self) -> ExitCode {
        match self.execute() {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                log::debug!("Run failed: {error:?}");
                eprintln!("ycm-gen: {error}");
                ExitCode::from(error.exit_code())
            }
        }
    }

    fn execute(&self) -> Result<(), RunError> {
        let settings = &self.settings;

        let search_path = self.context.path().map(|(_, value)| value);
        let compilers = Compilers::locate(&settings.compiler, search_path, &self.context.current_directory)?;

        let system = settings
            .build_system
            .or_else(|| BuildSystem::detect(&settings.project))
            .ok_or_else(|| RunError::UnrecognizedBuildSystem(settings.project.clone()))?;
        log::info!("Build system: {system}");

        self.confirm_overwrite()?;

        let logs = InvocationLogs::create()?;
        {
            let toolchain = ToolchainDirectory::create(&settings.shim)?;
            let logs_ref = &logs;
            let environment = BuildEnvironment::create(
                &self.context.environment,
                settings.preserve_environment,
                toolchain.path(),
                move |language| logs_ref.path(language),
                &compilers,
            )
            .map_err(RunError::Environment)?;

            build::run(system, &settings.project, &settings.build, &environment)?;
        }

        let c = reduce::reduce(logs.reader(Language::C)?.lines());
        let cxx = reduce::reduce(logs.reader(Language::Cxx)?.lines());
        report(Language::C, &c);
        report(Language::Cxx, &cxx);

        let selection = match select::select(c, cxx, settings.language) {
            Ok(selection) => selection,
            Err(counts) => {
                let preserved = logs.preserve()?;
                return Err(RunError::EmptyInvocationLog { c_log: preserved.c, cxx_log: preserved.cxx, counts });
            }
        };

        settings.emitter.emit(selection.language, &selection.flags)?;
        println!(
            "Created {} config file '{}' with {} flags",
            settings.emitter.format(),
            settings.emitter.path().display(),
            selection.language
        );
        Ok(())
    }

    fn confirm_overwrite(&self) -> Result<(), RunError> {
        let path = self.settings.emitter.path();
        if self.settings.force || !path.exists() {
            return Ok(());
        }
        let confirmed = output::confirm_overwrite(path, std::io::stdin().lock(), std::io::stdout())
            .map_err(RunError::Prompt)?;
        if confirmed {
            Ok(())
        } else {
            Err(RunError::Aborted(path.to_path_buf()))
        }
    }
}

fn report(language: Language, flag_set: &CanonicalFlagSet) {
    println!(
        "Collected {} relevant entries for {language} compilation ({} skipped).",
        flag_set.relevant, flag_set.skipped
    );
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Project directory not found: {}", .0.display())]
    ProjectNotFound(PathBuf),
    #[error(transparent)]
    Compiler(#[from] CompilerError),
    #[error("Unknown build system in {}", .0.display())]
    UnrecognizedBuildSystem(PathBuf),
    #[error("Not overwriting {}", .0.display())]
    Aborted(PathBuf),
    #[error("Failed to read the answer: {0}")]
    Prompt(#[source] std::io::Error),
    #[error(transparent)]
    Log(#[from] LogError),
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
    #[error("Failed to set up the build environment: {0}")]
    Environment(#[source] JoinPathsError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(
        "No relevant compiler invocations were recorded (C: {} relevant, {} skipped; C++: {} relevant, {} skipped). \
         The logs are kept at {} and {}",
        .counts.c_relevant, .counts.c_skipped, .counts.cxx_relevant, .counts.cxx_skipped,
        .c_log.display(), .cxx_log.display()
    )]
    EmptyInvocationLog { c_log: PathBuf, cxx_log: PathBuf, counts: NothingRecorded },
    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl RunError {
    /// The exit status of the process for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::UnrecognizedBuildSystem(_) => 2,
            RunError::EmptyInvocationLog { .. } => 3,
            RunError::Compiler(_) => 4,
            RunError::Aborted(_) => 5,
            RunError::ProjectNotFound(_)
            | RunError::Prompt(_)
            | RunError::Log(_)
            | RunError::Toolchain(_)
            | RunError::Environment(_)
            | RunError::Build(_)
            | RunError::Emit(_) => 1,
        }
    }
}
