//! Read-only access to the OS process table.
//!
//! [`SystemProcessTable`] is a `sysinfo` snapshot taken once per run. A
//! process can exit before the snapshot or belong to another user, so every
//! lookup is independently fallible.

use std::path::{Path, PathBuf};

use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Process {0} not found")]
    NotFound(u32),

    #[error("Process {0} has an empty command line")]
    EmptyCommandLine(u32),

    #[error("Working directory of process {0} is not readable")]
    UnreadableWorkingDirectory(u32),
}

pub type Result<T> = std::result::Result<T, ProcessError>;

/// Per-process lookups needed to walk a process tree.
pub trait ProcessTable {
    /// Current working directory of `pid`.
    fn working_directory(&self, pid: u32) -> Result<PathBuf>;

    /// Full argument vector of `pid`, `argv[0]` first. Never empty on success.
    fn command_line(&self, pid: u32) -> Result<Vec<String>>;

    /// Direct children of `pid`, in ascending pid order.
    fn children(&self, pid: u32) -> Result<Vec<u32>>;
}

/// [`ProcessTable`] backed by a snapshot of the running system.
pub struct SystemProcessTable {
    system: System,
}

impl SystemProcessTable {
    /// Captures argv and cwd of every process visible to the current user.
    pub fn snapshot() -> Self {
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_cmd(UpdateKind::Always)
                .with_cwd(UpdateKind::Always),
        );
        tracing::debug!("Captured {} processes", system.processes().len());

        Self { system }
    }

    fn process(&self, pid: u32) -> Result<&Process> {
        self.system
            .process(Pid::from_u32(pid))
            .ok_or(ProcessError::NotFound(pid))
    }
}

impl ProcessTable for SystemProcessTable {
    fn working_directory(&self, pid: u32) -> Result<PathBuf> {
        self.process(pid)?
            .cwd()
            .map(Path::to_path_buf)
            .ok_or(ProcessError::UnreadableWorkingDirectory(pid))
    }

    fn command_line(&self, pid: u32) -> Result<Vec<String>> {
        let argv: Vec<String> = self
            .process(pid)?
            .cmd()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        if argv.is_empty() {
            // Kernel threads and zombies
            return Err(ProcessError::EmptyCommandLine(pid));
        }
        Ok(argv)
    }

    fn children(&self, pid: u32) -> Result<Vec<u32>> {
        self.process(pid)?;
        let parent = Pid::from_u32(pid);

        // Threads are listed alongside processes on Linux; skip them
        let mut children: Vec<u32> = self
            .system
            .processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
            .filter(|(_, process)| process.parent() == Some(parent))
            .map(|(child, _)| child.as_u32())
            .collect();
        children.sort_unstable();
        Ok(children)
    }
}
