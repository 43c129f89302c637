// SPDX-License-Identifier: GPL-3.0-or-later

//! The merged view of the command line and the configuration file.

use super::RunError;
use crate::build::{BuildOptions, BuildSystem};
use crate::context::Context;
use crate::intercept::Language;
use crate::output::Emitter;
use crate::{args, config};
use std::fmt;
use std::path::PathBuf;

const SHIM_NAME: &str = "ycm-shim";

/// Everything the run needs to know, decided before the run starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub project: PathBuf,
    pub compiler: String,
    pub shim: PathBuf,
    pub build_system: Option<BuildSystem>,
    pub build: BuildOptions,
    pub preserve_environment: bool,
    pub language: Option<Language>,
    pub emitter: Emitter,
    pub force: bool,
}

impl Settings {
    /// Merge the sources, the command line takes precedence.
    ///
    /// Relative paths of the command line are resolved against the current
    /// directory of the context. The project directory has to exist.
    pub fn new(context: &Context, arguments: args::Arguments, config: config::Main) -> Result<Self, RunError> {
        let project = context.current_directory.join(&arguments.project);
        if !project.is_dir() {
            return Err(RunError::ProjectNotFound(project));
        }
        let project = project.canonicalize().map_err(|_| RunError::ProjectNotFound(project.clone()))?;

        let format = arguments.format.unwrap_or(config.output.format);
        let output = match &arguments.output {
            Some(output) => context.current_directory.join(output),
            None => project.join(format.default_file_name()),
        };

        let shim = config.shim.path.unwrap_or_else(|| {
            let name = format!("{SHIM_NAME}{}", std::env::consts::EXE_SUFFIX);
            context.executable_directory().map(|directory| directory.join(&name)).unwrap_or_else(|| PathBuf::from(name))
        });

        let build = BuildOptions {
            make: arguments.make.unwrap_or(config.build.make),
            make_flags: arguments
                .make_flags
                .or(config.build.make_flags)
                .unwrap_or_else(BuildOptions::default_make_flags),
            configure_options: arguments.configure_options.unwrap_or(config.build.configure_options),
            out_of_tree: arguments.out_of_tree || config.build.out_of_tree,
            verbose: arguments.verbose,
        };

        Ok(Self {
            project,
            compiler: arguments.compiler.unwrap_or(config.compiler),
            shim,
            build_system: arguments.build_system,
            build,
            preserve_environment: arguments.preserve_environment || config.build.preserve_environment,
            language: arguments.language,
            emitter: Emitter::new(format, output),
            force: arguments.force,
        })
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Settings:")?;
        writeln!(f, "  project: {}", self.project.display())?;
        writeln!(f, "  compiler: {}", self.compiler)?;
        writeln!(f, "  shim: {}", self.shim.display())?;
        match self.build_system {
            Some(system) => writeln!(f, "  build system: {system}")?,
            None => writeln!(f, "  build system: detect")?,
        }
        writeln!(f, "  make: {} {}", self.build.make, self.build.make_flags.join(" "))?;
        writeln!(f, "  configure options: {}", self.build.configure_options.join(" "))?;
        writeln!(f, "  output: {}", self.emitter.path().display())
    }
}
