// SPDX-License-Identifier: GPL-3.0-or-later

use signal_hook::SigId;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time;
use thiserror::Error;

/// Runs child processes to completion while watching for termination signals.
///
/// The signal handlers are registered when the supervisor is created. A
/// termination signal received while a child is running kills the child,
/// and the supervisor keeps waiting until the child has exited. The signal
/// is remembered, callers check it with [`Supervisor::interrupted`].
///
/// A second termination signal runs the default action of the signal. So
/// does every signal after the supervisor was dropped.
pub struct Supervisor {
    signaled: Arc<AtomicUsize>,
    terminate: Arc<AtomicBool>,
    handlers: Vec<SigId>,
}

impl Supervisor {
    pub fn new() -> Result<Self, SuperviseError> {
        let signaled = Arc::new(AtomicUsize::new(0));
        let terminate = Arc::new(AtomicBool::new(false));
        let mut handlers = Vec::new();
        for signal in signal_hook::consts::TERM_SIGNALS {
            // The conditional default must be registered before the flag which arms it.
            signal_hook::flag::register_conditional_default(*signal, Arc::clone(&terminate))
                .map_err(SuperviseError::SignalRegistration)?;
            handlers.push(
                signal_hook::flag::register_usize(*signal, Arc::clone(&signaled), *signal as usize)
                    .map_err(SuperviseError::SignalRegistration)?,
            );
            handlers.push(
                signal_hook::flag::register(*signal, Arc::clone(&terminate))
                    .map_err(SuperviseError::SignalRegistration)?,
            );
        }
        Ok(Self { signaled, terminate, handlers })
    }

    /// The termination signal received since the supervisor was created.
    pub fn interrupted(&self) -> Option<i32> {
        match self.signaled.load(Ordering::SeqCst) {
            0 => None,
            signal => Some(signal as i32),
        }
    }

    /// Start the command and wait for its completion.
    pub fn run(&self, command: &mut Command) -> Result<ExitStatus, SuperviseError> {
        let executable = PathBuf::from(command.get_program());

        let mut child = command
            .spawn()
            .map_err(|err| SuperviseError::ProcessSpawn { executable: executable.clone(), source: err })?;

        let mut killed = false;
        loop {
            if !killed && self.interrupted().is_some() {
                log::debug!("Received signal, forwarding to child process");
                child
                    .kill()
                    .map_err(|err| SuperviseError::ProcessKill { executable: executable.clone(), source: err })?;
                killed = true;
            }

            match child.try_wait() {
                Ok(Some(exit_status)) => {
                    log::debug!("Child process exited: {exit_status:?}");
                    return Ok(exit_status);
                }
                Ok(None) => {
                    thread::sleep(time::Duration::from_millis(20));
                }
                Err(err) => {
                    log::error!("Error waiting for child process: {err}");
                    return Err(SuperviseError::ProcessWait { executable, source: err });
                }
            }
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.terminate.store(true, Ordering::SeqCst);
        for handler in self.handlers.drain(..) {
            signal_hook::low_level::unregister(handler);
        }
    }
}

/// Errors that can occur during process supervision.
#[derive(Error, Debug)]
pub enum SuperviseError {
    #[error("Failed to register signal handler: {0}")]
    SignalRegistration(#[source] std::io::Error),
    #[error("Failed to execute '{executable}': {source}", executable = .executable.display())]
    ProcessSpawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to kill process '{executable}': {source}", executable = .executable.display())]
    ProcessKill {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to wait for process '{executable}': {source}", executable = .executable.display())]
    ProcessWait {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
