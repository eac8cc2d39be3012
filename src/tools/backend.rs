//! Image tool trait, planned invocations and running child processes.
//!
//! The [`ImageTool`] trait plans the three operations the album needs:
//! resize, rotate and display. Planning is pure: it returns an
//! [`Invocation`] describing the child process. Spawning turns an invocation
//! into a [`Job`], which owns the child until it is waited on or terminated.
//!
//! The production implementation is
//! [`MagickTool`](super::magick::MagickTool), which shells out to the
//! ImageMagick `convert` and `display` programs.

use super::params::{ResizeParams, RotateParams};
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{label} failed ({status})")]
    Failed { label: String, status: ExitStatus },
    #[error("IO error while waiting for {label}: {source}")]
    Wait {
        label: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not signal {label}: {source}")]
    Signal {
        label: String,
        #[source]
        source: Errno,
    },
}

/// A fully planned child process: program name plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Start the child. Stdin is detached so children never compete with
    /// the album prompts for terminal input.
    pub fn spawn(&self, label: impl Into<String>) -> Result<Job, ToolError> {
        let label = label.into();
        let child = self
            .to_command()
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        log::debug!("spawned {} (pid {}): {}", label, child.id(), self);
        Ok(Job { label, child })
    }

    /// Spawn and wait in one step.
    pub fn run(&self, label: impl Into<String>) -> Result<(), ToolError> {
        self.spawn(label)?.wait()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// A running child process.
#[derive(Debug)]
pub struct Job {
    label: String,
    child: Child,
}

impl Job {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Block until the child exits. A non-zero exit (or death by signal)
    /// is an error.
    pub fn wait(mut self) -> Result<(), ToolError> {
        let status = self.child.wait().map_err(|source| ToolError::Wait {
            label: self.label.clone(),
            source,
        })?;
        log::debug!("{} (pid {}) exited: {}", self.label, self.pid(), status);
        if status.success() {
            Ok(())
        } else {
            Err(ToolError::Failed {
                label: self.label,
                status,
            })
        }
    }

    /// Non-blocking check. `Some(status)` once the child has exited.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>, ToolError> {
        self.child.try_wait().map_err(|source| ToolError::Wait {
            label: self.label.clone(),
            source,
        })
    }

    /// Send SIGTERM and reap the child. A child that already exited is not
    /// an error; its status is returned as is.
    pub fn terminate(mut self) -> Result<ExitStatus, ToolError> {
        if let Some(status) = self.try_wait()? {
            return Ok(status);
        }
        let pid = Pid::from_raw(self.child.id() as i32);
        match signal::kill(pid, Signal::SIGTERM) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(source) => {
                return Err(ToolError::Signal {
                    label: self.label,
                    source,
                });
            }
        }
        let status = self.child.wait().map_err(|source| ToolError::Wait {
            label: self.label.clone(),
            source,
        })?;
        log::debug!("terminated {} (pid {}): {}", self.label, pid, status);
        Ok(status)
    }
}

/// Trait for external image tools.
///
/// Implementations only plan invocations; spawning and waiting are shared
/// by every tool through [`Invocation`] and [`Job`].
pub trait ImageTool: Sync {
    /// Plan a proportional resize.
    fn resize(&self, params: &ResizeParams) -> Invocation;

    /// Plan a quarter-turn rotation.
    fn rotate(&self, params: &RotateParams) -> Invocation;

    /// Plan an image viewer window for `path`.
    fn display(&self, path: &Path) -> Invocation;
}
