// SPDX-License-Identifier: GPL-3.0-or-later

//! Driving the build of the project against the fake toolchain.
//!
//! The build commands are run the same way a developer would run them:
//! generate the makefiles first (configuration stage), then run make (build
//! stage). The generators run out of the project tree where they can, so the
//! project is not left with build products.

mod compilers;
mod detect;
mod environment;

pub use compilers::{CompilerError, Compilers};
pub use detect::BuildSystem;
pub use environment::BuildEnvironment;

use crate::intercept::supervise::{SuperviseError, Supervisor};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// The parameters of the build commands.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildOptions {
    pub make: String,
    pub make_flags: Vec<String>,
    pub configure_options: Vec<String>,
    pub out_of_tree: bool,
    pub verbose: bool,
}

impl BuildOptions {
    /// Ignore errors and use all processors.
    ///
    /// Errors are ignored, because makefiles can run scripts which depend on
    /// outputs the fake compilers never produce.
    pub fn default_make_flags() -> Vec<String> {
        let jobs = std::thread::available_parallelism().map(|count| count.get()).unwrap_or(1);
        vec!["-i".to_string(), format!("-j{jobs}")]
    }
}

/// Which environment a step runs with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Configure,
    Build,
}

/// One command of the build.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub program: String,
    pub arguments: Vec<String>,
    pub directory: PathBuf,
    pub stage: Stage,
}

impl Step {
    fn new(program: impl Into<String>, arguments: Vec<String>, directory: &Path, stage: Stage) -> Self {
        Self { program: program.into(), arguments, directory: directory.to_path_buf(), stage }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$ {}", self.program)?;
        for argument in &self.arguments {
            write!(f, " {argument}")?;
        }
        Ok(())
    }
}

/// The commands to run for the build system.
///
/// `build_dir` is the scratch directory for the build systems which build
/// out of the project tree.
pub fn plan(
    system: BuildSystem,
    project: &Path,
    build_dir: Option<&Path>,
    options: &BuildOptions,
) -> Result<Vec<Step>, BuildError> {
    let make = |arguments: Vec<String>, directory: &Path| {
        Step::new(options.make.clone(), arguments, directory, Stage::Build)
    };
    let scratch = || build_dir.ok_or(BuildError::MissingBuildDirectory(system));

    let steps = match system {
        BuildSystem::CMake => {
            let directory = scratch()?;
            let mut arguments = vec![project.to_string_lossy().to_string()];
            arguments.extend(options.configure_options.iter().cloned());
            vec![
                Step::new("cmake", arguments, directory, Stage::Configure),
                make(options.make_flags.clone(), directory),
            ]
        }
        BuildSystem::Autotools => {
            let directory = if options.out_of_tree { scratch()? } else { project };
            let configure = project.join("configure").to_string_lossy().to_string();
            let mut steps = vec![
                Step::new(configure, options.configure_options.clone(), directory, Stage::Configure),
                make(options.make_flags.clone(), directory),
            ];
            if !options.out_of_tree {
                steps.push(make(vec!["maintainer-clean".to_string()], directory));
            }
            steps
        }
        BuildSystem::QMake => {
            let directory = scratch()?;
            let project_file =
                detect::qmake_project_file(project).ok_or_else(|| BuildError::ProjectFileMissing(project.to_path_buf()))?;
            let mut arguments = vec![
                "QMAKE_CC=clang".to_string(),
                "QMAKE_CXX=clang++".to_string(),
                project_file.to_string_lossy().to_string(),
            ];
            arguments.extend(options.configure_options.iter().cloned());
            vec![
                Step::new("qmake", arguments, directory, Stage::Configure),
                make(options.make_flags.clone(), directory),
            ]
        }
        BuildSystem::Make => vec![
            make(vec!["clean".to_string()], project),
            make(options.make_flags.clone(), project),
        ],
    };
    Ok(steps)
}

fn needs_build_directory(system: BuildSystem, options: &BuildOptions) -> bool {
    match system {
        BuildSystem::CMake | BuildSystem::QMake => true,
        BuildSystem::Autotools => options.out_of_tree,
        BuildSystem::Make => false,
    }
}

/// Run the build of the project.
///
/// The exit status of the steps are not checked, a failing step is logged
/// and the build goes on. A step which can not be started stops the build,
/// and so does a termination signal received during a step.
pub fn run(
    system: BuildSystem,
    project: &Path,
    options: &BuildOptions,
    environment: &BuildEnvironment,
) -> Result<(), BuildError> {
    let build_dir = if needs_build_directory(system, options) {
        let directory = tempfile::Builder::new()
            .prefix("ycm-gen-build-")
            .tempdir()
            .map_err(BuildError::BuildDirectory)?;
        println!("Building {system} project in '{}'", directory.path().display());
        Some(directory)
    } else {
        println!("Building {system} project in '{}'", project.display());
        None
    };

    let steps = plan(system, project, build_dir.as_ref().map(|directory| directory.path()), options)?;
    let supervisor = Supervisor::new()?;
    for step in &steps {
        execute(&supervisor, step, options.verbose, environment)?;
        if let Some(signal) = supervisor.interrupted() {
            log::info!("Build interrupted by signal {signal} during '{}'", step.program);
            return Err(BuildError::Interrupted(signal));
        }
    }
    Ok(())
}

fn execute(
    supervisor: &Supervisor,
    step: &Step,
    verbose: bool,
    environment: &BuildEnvironment,
) -> Result<(), BuildError> {
    println!("{step}");

    let variables = match step.stage {
        Stage::Configure => environment.configure(),
        Stage::Build => environment.build(),
    };
    let mut command = Command::new(&step.program);
    command.args(&step.arguments).current_dir(&step.directory).env_clear().envs(variables);
    if !verbose {
        command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
    }

    let status = supervisor.run(&mut command)?;
    if !status.success() {
        log::warn!("Build step '{}' finished with {status}", step.program);
    }
    Ok(())
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to create build directory: {0}")]
    BuildDirectory(#[source] std::io::Error),
    #[error("No build directory given for {0} build")]
    MissingBuildDirectory(BuildSystem),
    #[error("No qmake project file found in {}", .0.display())]
    ProjectFileMissing(PathBuf),
    #[error("Build step failed: {0}")]
    Step(#[from] SuperviseError),
    #[error("Build interrupted by signal {0}")]
    Interrupted(i32),
}
