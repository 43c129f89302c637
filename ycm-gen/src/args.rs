// SPDX-License-Identifier: GPL-3.0-or-later

//! This module contains the command line interface of the application.
//!
//! The command line parsing is implemented using the `clap` library.
//! The `Arguments` type is the structured form of the program invocation.
//! Values which are not given on the command line are `None`, so they can
//! fall back to the configuration file.

use crate::build::BuildSystem;
use crate::intercept::Language;
use crate::output::Format;
use anyhow::{Context, anyhow};
use clap::{ArgAction, ArgMatches, Command, arg, command};
use std::fmt;

/// Represents the command line arguments of the application.
#[derive(Debug, Default, PartialEq)]
pub struct Arguments {
    /// The path of the configuration file.
    pub config: Option<String>,
    /// Show the output of the build commands.
    pub verbose: bool,
    pub project: String,
    pub format: Option<Format>,
    pub output: Option<String>,
    pub make: Option<String>,
    pub compiler: Option<String>,
    pub configure_options: Option<Vec<String>>,
    pub make_flags: Option<Vec<String>>,
    pub build_system: Option<BuildSystem>,
    pub language: Option<Language>,
    pub out_of_tree: bool,
    pub preserve_environment: bool,
    pub force: bool,
}

impl TryFrom<ArgMatches> for Arguments {
    type Error = anyhow::Error;

    fn try_from(matches: ArgMatches) -> Result<Self, Self::Error> {
        let string = |id: &str| matches.get_one::<String>(id).map(String::to_string);
        let flag = |id: &str| matches.get_flag(id);

        let project = string("PROJECT_DIR").ok_or_else(|| anyhow!("missing project directory"))?;
        let format = string("format").map(|value| value.parse::<Format>()).transpose().map_err(|e| anyhow!(e))?;
        let build_system =
            string("build-system").map(|value| value.parse::<BuildSystem>()).transpose().map_err(|e| anyhow!(e))?;
        let language = string("language").map(|value| value.parse::<Language>()).transpose().map_err(|e| anyhow!(e))?;
        let configure_options = string("configure-opts")
            .map(|value| shell_words::split(&value))
            .transpose()
            .with_context(|| "Failed to split the configure options")?;
        let make_flags = string("make-flags")
            .map(|value| shell_words::split(&value))
            .transpose()
            .with_context(|| "Failed to split the make flags")?;

        Ok(Arguments {
            config: string("config"),
            verbose: matches.get_count("verbose") > 0,
            project,
            format,
            output: string("output"),
            make: string("make"),
            compiler: string("compiler"),
            configure_options,
            make_flags,
            build_system,
            language,
            out_of_tree: flag("out-of-tree"),
            preserve_environment: flag("preserve-environment"),
            force: flag("force"),
        })
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Arguments:")?;
        writeln!(f, "  project: {}", self.project)?;
        if let Some(config) = &self.config {
            writeln!(f, "  config: {config}")?;
        }
        if let Some(format) = &self.format {
            writeln!(f, "  format: {format}")?;
        }
        if let Some(output) = &self.output {
            writeln!(f, "  output: {output}")?;
        }
        if let Some(make) = &self.make {
            writeln!(f, "  make: {make}")?;
        }
        if let Some(compiler) = &self.compiler {
            writeln!(f, "  compiler: {compiler}")?;
        }
        if let Some(options) = &self.configure_options {
            writeln!(f, "  configure options: {options:?}")?;
        }
        if let Some(flags) = &self.make_flags {
            writeln!(f, "  make flags: {flags:?}")?;
        }
        if let Some(build_system) = &self.build_system {
            writeln!(f, "  build system: {build_system}")?;
        }
        if let Some(language) = &self.language {
            writeln!(f, "  language: {language}")?;
        }
        writeln!(
            f,
            "  verbose: {}, out of tree: {}, preserve environment: {}, force: {}",
            self.verbose, self.out_of_tree, self.preserve_environment, self.force
        )
    }
}

/// Represents the command line interface of the application.
pub fn cli() -> Command {
    command!()
        .about("Generates a code completion configuration by building the project with a fake toolchain")
        .arg_required_else_help(true)
        .args(&[
            arg!(-v --verbose ... "Show the output of the build commands").action(ArgAction::Count),
            arg!(--config <FILE> "Path of the config file"),
            arg!(-f --format <FORMAT> "Format of the generated configuration")
                .value_parser(["ycm", "cc"]),
            arg!(-o --output <FILE> "Path of the generated configuration (default: inside the project)"),
            arg!(-m --make <MAKE> "The make executable to use"),
            arg!(-c --compiler <CC> "The real C compiler used at the configuration stage (default: clang)"),
            arg!(-C --"configure-opts" <OPTS> "Additional flags for configure, cmake or qmake")
                .allow_hyphen_values(true),
            arg!(-M --"make-flags" <FLAGS> "Flags for make (default: -i -j<processors>)")
                .allow_hyphen_values(true),
            arg!(-b --"build-system" <SYSTEM> "Use this build system instead of detecting it")
                .value_parser(["cmake", "autotools", "qmake", "make"]),
            arg!(-x --language <LANGUAGE> "Only generate flags for this language")
                .value_parser(["c", "c++"]),
            arg!(--"out-of-tree" "Build autotools projects out of the source tree"),
            arg!(-e --"preserve-environment" "Pass the whole environment to the build"),
            arg!(--force "Overwrite an existing configuration without asking"),
            arg!(<PROJECT_DIR> "The directory of the project"),
        ])
}
