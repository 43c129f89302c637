// SPDX-License-Identifier: GPL-3.0-or-later

use std::env;
use std::process::ExitCode;
use ycm_gen::{args, config, context, modes};

/// Driver function of the application.
fn main() -> anyhow::Result<ExitCode> {
    // Initialize the logging system.
    env_logger::init();
    // Get the package name and version from Cargo
    let pkg_name = env!("CARGO_PKG_NAME");
    let pkg_version = env!("CARGO_PKG_VERSION");
    log::info!("{pkg_name} v{pkg_version}");
    let os = env::consts::OS;
    let family = env::consts::FAMILY;
    let arch = env::consts::ARCH;
    log::info!("Running on... {family}/{os} {arch}");

    // Capture application context.
    let context = context::Context::capture()?;
    log::info!("{context}");
    // Parse the command line arguments. Usage errors exit with 1, the
    // other exit codes are reserved for the run.
    let matches = match args::cli().try_get_matches() {
        Ok(matches) => matches,
        Err(error) => {
            let _ = error.print();
            return Ok(if error.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS });
        }
    };
    let arguments = args::Arguments::try_from(matches)?;
    log::info!("{arguments}");
    // Load the configuration.
    let configuration = config::Loader::load(&context, &arguments.config)?;
    log::info!("{configuration}");

    // Run the application.
    let application = match modes::Application::configure(context, arguments, configuration) {
        Ok(application) => application,
        Err(error) => {
            log::debug!("Configuration failed: {error:?}");
            eprintln!("ycm-gen: {error}");
            return Ok(ExitCode::from(error.exit_code()));
        }
    };
    log::debug!("Configuration complete, running the build now...");
    let result = application.run();
    log::debug!("Exit code: {result:?}");

    Ok(result)
}
