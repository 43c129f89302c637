// SPDX-License-Identifier: GPL-3.0-or-later

//! The optional `ycm-gen.yml` configuration file.
//!
//! It holds the defaults of a user or a project: which compiler answers the
//! configure checks, how make is called, where the shim lives and which
//! output format is written. Every value has a built-in default, and the
//! command line overrides the file.
//!
//! Without an explicit `--config` the first existing file is taken from:
//! the current directory, the user's local and roaming configuration
//! directories, then the application's local and roaming configuration
//! directories.
//!
//! ```yaml
//! schema: 1.0
//!
//! compiler: clang
//!
//! build:
//!   make: gmake
//!   make_flags: ["-i", "-j8"]
//!   configure_options: ["--disable-docs"]
//!   out_of_tree: false
//!   preserve_environment: false
//!
//! shim:
//!   path: /usr/local/libexec/ycm-gen/ycm-shim
//!
//! output:
//!   format: ycm
//! ```

pub use loader::{ConfigError, Loader};
pub use types::*;
pub use validation::Validator;

mod types {
    use crate::output::Format;
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::path::PathBuf;

    pub(super) const SUPPORTED_SCHEMA_VERSION: &str = "1.0";

    /// Represents the application configuration.
    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    pub struct Main {
        #[serde(deserialize_with = "validate_schema_version")]
        pub schema: String,
        #[serde(default = "default_compiler")]
        pub compiler: String,
        #[serde(default)]
        pub build: Build,
        #[serde(default)]
        pub shim: Shim,
        #[serde(default)]
        pub output: Output,
    }

    impl Default for Main {
        fn default() -> Self {
            Self {
                schema: String::from(SUPPORTED_SCHEMA_VERSION),
                compiler: default_compiler(),
                build: Build::default(),
                shim: Shim::default(),
                output: Output::default(),
            }
        }
    }

    impl fmt::Display for Main {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "Configuration:")?;
            let yaml = serde_yml::to_string(self).map_err(|_| fmt::Error)?;
            for line in yaml.lines() {
                writeln!(f, "{line}")?;
            }
            Ok(())
        }
    }

    /// How the build of the project is run.
    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    pub struct Build {
        #[serde(default = "default_make")]
        pub make: String,
        /// The flags of the make invocations. Computed from the machine when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub make_flags: Option<Vec<String>>,
        #[serde(default)]
        pub configure_options: Vec<String>,
        #[serde(default)]
        pub out_of_tree: bool,
        #[serde(default)]
        pub preserve_environment: bool,
    }

    impl Default for Build {
        fn default() -> Self {
            Self {
                make: default_make(),
                make_flags: None,
                configure_options: vec![],
                out_of_tree: false,
                preserve_environment: false,
            }
        }
    }

    /// Location of the shim executable.
    ///
    /// When not given, the `ycm-shim` next to the running executable is used.
    #[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
    pub struct Shim {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub path: Option<PathBuf>,
    }

    #[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
    pub struct Output {
        #[serde(default)]
        pub format: Format,
    }

    pub(super) fn default_compiler() -> String {
        String::from("clang")
    }

    fn default_make() -> String {
        String::from("make")
    }

    // Custom deserialization function to validate the schema version
    fn validate_schema_version<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let schema: String = Deserialize::deserialize(deserializer)?;
        if schema != SUPPORTED_SCHEMA_VERSION {
            use serde::de::Error;
            Err(Error::custom(format!(
                "Unsupported schema version: {schema}. Expected: {SUPPORTED_SCHEMA_VERSION}"
            )))
        } else {
            Ok(schema)
        }
    }
}

pub mod validation {
    use super::types::*;
    use thiserror::Error;

    /// Trait for validating configuration objects
    pub trait Validator<T> {
        type Error: std::error::Error;

        fn validate(config: &T) -> Result<(), Self::Error>;
    }

    /// Validation errors for configuration
    #[derive(Debug, Error)]
    pub enum ValidationError {
        #[error("Empty string value for field '{field}'")]
        EmptyString { field: String },
        #[error("Path does not exist: '{path}'")]
        PathNotFound { path: String },
        #[error("Multiple validation errors: {errors:?}")]
        Multiple { errors: Vec<ValidationError> },
    }

    /// Combinator for collecting and handling validation errors
    #[derive(Default)]
    struct ValidationCollector {
        errors: Vec<ValidationError>,
    }

    impl ValidationCollector {
        fn add(&mut self, error: ValidationError) {
            self.errors.push(error);
        }

        fn add_result(&mut self, result: Result<(), ValidationError>) {
            if let Err(error) = result {
                match error {
                    ValidationError::Multiple { errors } => self.errors.extend(errors),
                    single_error => self.errors.push(single_error),
                }
            }
        }

        fn require_non_empty(&mut self, field: &str, value: &str) {
            if value.trim().is_empty() {
                self.add(ValidationError::EmptyString { field: field.to_string() });
            }
        }

        fn finish(mut self) -> Result<(), ValidationError> {
            match self.errors.len() {
                0 => Ok(()),
                1 => Err(self.errors.remove(0)),
                _ => Err(ValidationError::Multiple { errors: self.errors }),
            }
        }
    }

    impl Validator<Main> for Main {
        type Error = ValidationError;

        fn validate(config: &Main) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();

            collector.require_non_empty("compiler", &config.compiler);
            collector.add_result(Build::validate(&config.build));
            collector.add_result(Shim::validate(&config.shim));

            collector.finish()
        }
    }

    impl Validator<Build> for Build {
        type Error = ValidationError;

        fn validate(config: &Build) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();

            collector.require_non_empty("build.make", &config.make);
            for (idx, flag) in config.make_flags.iter().flatten().enumerate() {
                collector.require_non_empty(&format!("build.make_flags[{idx}]"), flag);
            }
            for (idx, option) in config.configure_options.iter().enumerate() {
                collector.require_non_empty(&format!("build.configure_options[{idx}]"), option);
            }

            collector.finish()
        }
    }

    impl Validator<Shim> for Shim {
        type Error = ValidationError;

        fn validate(config: &Shim) -> Result<(), Self::Error> {
            match &config.path {
                Some(path) if !path.exists() => {
                    Err(ValidationError::PathNotFound { path: path.display().to_string() })
                }
                _ => Ok(()),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::path::PathBuf;

        #[test]
        fn test_default_config_is_valid() {
            assert!(Main::validate(&Main::default()).is_ok());
        }

        #[test]
        fn test_errors_are_collected() {
            let config = Main {
                compiler: String::from(" "),
                build: Build {
                    make: String::new(),
                    make_flags: Some(vec![String::from("-i"), String::new()]),
                    ..Build::default()
                },
                shim: Shim { path: Some(PathBuf::from("/nonexistent/ycm-shim")) },
                ..Main::default()
            };

            match Main::validate(&config) {
                Err(ValidationError::Multiple { errors }) => assert_eq!(errors.len(), 4),
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[test]
        fn test_single_error_is_not_wrapped() {
            let config = Main { compiler: String::new(), ..Main::default() };

            let result = Main::validate(&config);
            assert!(matches!(result, Err(ValidationError::EmptyString { field }) if field == "compiler"));
        }
    }
}

pub mod loader {
    use super::{Main, Validator};
    use directories::{BaseDirs, ProjectDirs};
    use log::{debug, info};
    use std::fs::OpenOptions;
    use std::path::{Path, PathBuf};
    use thiserror::Error;

    const CONFIG_FILE_NAME: &str = "ycm-gen.yml";

    pub struct Loader {}

    impl Loader {
        /// Loads the configuration from the specified file or the default locations.
        ///
        /// If the configuration file is not found at the default locations, the
        /// default configuration is returned. A specified file must exist.
        pub fn load(context: &crate::context::Context, filename: &Option<String>) -> Result<Main, ConfigError> {
            if let Some(path) = filename {
                return Self::from_file(Path::new(path));
            }
            for location in Self::file_locations(context) {
                debug!("Checking configuration file: {}", location.display());
                if location.exists() {
                    return Self::from_file(location.as_path());
                }
            }
            debug!("Configuration file not found. Using the default configuration.");
            Ok(Main::default())
        }

        fn file_locations(context: &crate::context::Context) -> Vec<PathBuf> {
            let mut locations = vec![context.current_directory.clone()];

            if let Some(base_dirs) = BaseDirs::new() {
                locations.push(base_dirs.config_local_dir().to_path_buf());
                locations.push(base_dirs.config_dir().to_path_buf());
            }
            if let Some(proj_dirs) = ProjectDirs::from("com.github", "ycm-gen", "ycm-gen") {
                locations.push(proj_dirs.config_local_dir().to_path_buf());
                locations.push(proj_dirs.config_dir().to_path_buf());
            }
            locations.dedup();
            locations.iter().map(|location| location.join(CONFIG_FILE_NAME)).collect()
        }

        /// Loads the configuration from the specified file.
        pub fn from_file(path: &Path) -> Result<Main, ConfigError> {
            info!("Loading configuration file: {}", path.display());

            let reader = OpenOptions::new()
                .read(true)
                .open(path)
                .map_err(|source| ConfigError::FileAccess { path: path.to_path_buf(), source })?;

            let content: Main = Self::from_reader(reader)
                .map_err(|source| ConfigError::ParseError { path: path.to_path_buf(), source })?;

            Main::validate(&content)
                .map_err(|source| ConfigError::ValidationError { path: path.to_path_buf(), source })?;

            Ok(content)
        }

        /// Define the deserialization format of the config file.
        fn from_reader<R, T>(rdr: R) -> serde_yml::Result<T>
        where
            R: std::io::Read,
            T: serde::de::DeserializeOwned,
        {
            serde_yml::from_reader(rdr)
        }
    }

    /// Represents all possible configuration-related errors.
    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("Failed to access configuration file '{path}': {source}", path = .path.display())]
        FileAccess {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        #[error("Failed to parse configuration from file '{path}': {source}", path = .path.display())]
        ParseError {
            path: PathBuf,
            #[source]
            source: serde_yml::Error,
        },
        #[error("Configuration validation failed in '{path}': {source}", path = .path.display())]
        ValidationError {
            path: PathBuf,
            #[source]
            source: crate::config::validation::ValidationError,
        },
    }

}
