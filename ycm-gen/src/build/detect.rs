// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The build systems the driver knows how to run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildSystem {
    CMake,
    Autotools,
    QMake,
    Make,
}

const MAKEFILE_NAMES: [&str; 3] = ["GNUmakefile", "makefile", "Makefile"];

impl BuildSystem {
    /// Recognize the build system by the marker files of the project.
    ///
    /// Make is checked last, the others can leave generated makefiles in the
    /// project directory.
    pub fn detect(project: &Path) -> Option<Self> {
        if project.join("CMakeLists.txt").is_file() {
            Some(BuildSystem::CMake)
        } else if project.join("configure").is_file() {
            Some(BuildSystem::Autotools)
        } else if qmake_project_file(project).is_some() {
            Some(BuildSystem::QMake)
        } else if MAKEFILE_NAMES.iter().any(|name| project.join(name).is_file()) {
            Some(BuildSystem::Make)
        } else {
            None
        }
    }
}

/// The first `*.pro` file of the project directory, by name.
pub fn qmake_project_file(project: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(project).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|extension| extension == "pro"))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

impl FromStr for BuildSystem {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "cmake" => Ok(BuildSystem::CMake),
            "autotools" => Ok(BuildSystem::Autotools),
            "qmake" => Ok(BuildSystem::QMake),
            "make" => Ok(BuildSystem::Make),
            _ => Err(format!("unknown build system: {value}")),
        }
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildSystem::CMake => write!(f, "cmake"),
            BuildSystem::Autotools => write!(f, "autotools"),
            BuildSystem::QMake => write!(f, "qmake"),
            BuildSystem::Make => write!(f, "make"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[&str]) -> TempDir {
        let directory = tempfile::tempdir().unwrap();
        for file in files {
            fs::write(directory.path().join(file), "").unwrap();
        }
        directory
    }

    #[test]
    fn test_detection_order() {
        let all = project(&["Makefile", "app.pro", "configure", "CMakeLists.txt"]);
        assert_eq!(BuildSystem::detect(all.path()), Some(BuildSystem::CMake));

        let autotools = project(&["Makefile", "app.pro", "configure"]);
        assert_eq!(BuildSystem::detect(autotools.path()), Some(BuildSystem::Autotools));

        let qmake = project(&["Makefile", "app.pro"]);
        assert_eq!(BuildSystem::detect(qmake.path()), Some(BuildSystem::QMake));
    }

    #[test]
    fn test_makefile_names() {
        for name in MAKEFILE_NAMES {
            let make = project(&[name]);
            assert_eq!(BuildSystem::detect(make.path()), Some(BuildSystem::Make), "marker: {name}");
        }
    }

    #[test]
    fn test_unrecognized_project() {
        let sources = project(&["main.c", "README"]);
        assert_eq!(BuildSystem::detect(sources.path()), None);

        let directory_marker = tempfile::tempdir().unwrap();
        fs::create_dir(directory_marker.path().join("configure")).unwrap();
        assert_eq!(BuildSystem::detect(directory_marker.path()), None);
    }

    #[test]
    fn test_qmake_project_file_is_deterministic() {
        let qmake = project(&["b.pro", "a.pro", "notes.txt"]);

        assert_eq!(qmake_project_file(qmake.path()), Some(qmake.path().join("a.pro")));
    }

    #[test]
    fn test_names() {
        assert_eq!("CMake".parse::<BuildSystem>(), Ok(BuildSystem::CMake));
        assert_eq!("autotools".parse::<BuildSystem>(), Ok(BuildSystem::Autotools));
        assert!("ninja".parse::<BuildSystem>().is_err());
        assert_eq!(BuildSystem::QMake.to_string(), "qmake");
    }
}
