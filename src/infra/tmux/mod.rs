//! Tmux pane discovery and control.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Output};

use thiserror::Error;

/// Format passed to `list-panes -F`; one colon-separated line per pane.
const PANE_FORMAT: &str = "#{session_name}:#{window_index}:#{pane_id}:#{pane_pid}";

#[derive(Error, Debug)]
pub enum TmuxError {
    #[error("tmux command '{}' failed: {message}{}", .args.join(" "), stderr_suffix(.stderr))]
    CommandFailed {
        args: Vec<String>,
        message: String,
        stderr: Option<String>,
    },

    #[error("Invalid tmux pane line '{line}': {reason}")]
    InvalidPaneLine { line: String, reason: String },
}

impl TmuxError {
    fn command_failed(args: &[&str], message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::CommandFailed {
            args: args.iter().map(|s| s.to_string()).collect(),
            message: message.into(),
            stderr,
        }
    }

    fn invalid_line(line: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPaneLine {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

fn stderr_suffix(stderr: &Option<String>) -> String {
    match stderr {
        Some(s) if !s.is_empty() => format!(" ({s})"),
        _ => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, TmuxError>;

/// Executes the tmux binary.
/// Enables dependency injection for testing without a running tmux server.
pub trait CommandRunner {
    fn run_tmux(&self, args: &[&str]) -> io::Result<Output>;
}

/// Production implementation that spawns the configured tmux executable.
#[derive(Debug, Clone)]
pub struct RealCommandRunner {
    program: PathBuf,
}

impl RealCommandRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl CommandRunner for RealCommandRunner {
    fn run_tmux(&self, args: &[&str]) -> io::Result<Output> {
        Command::new(&self.program).args(args).output()
    }
}

/// A pane as reported by `tmux list-panes -a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneDescriptor {
    pub session_name: String,
    pub window_index: u32,
    pub pane_id: String,
    /// PID of the process tmux started in the pane (usually a shell).
    pub root_pid: u32,
}

pub struct Tmux<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> Tmux<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run a tmux command and return stdout on success.
    fn run_tmux_output(&self, args: &[&str]) -> Result<String> {
        tracing::debug!("Running command 'tmux {}'", args.join(" "));

        let output = self
            .runner
            .run_tmux(args)
            .map_err(|e| TmuxError::command_failed(args, e.to_string(), None))?;

        let code = output.status.code();
        tracing::debug!("tmux returned with code {}", format_code(code));

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(TmuxError::command_failed(
                args,
                format!("exited with code {}", format_code(code)),
                Some(stderr),
            ))
        }
    }

    /// Run a tmux command, returning Ok(()) on success.
    fn run_tmux(&self, args: &[&str]) -> Result<()> {
        self.run_tmux_output(args).map(|_| ())
    }

    /// List every pane of every session, in tmux's enumeration order.
    pub fn list_panes(&self) -> Result<Vec<PaneDescriptor>> {
        let stdout = self.run_tmux_output(&["list-panes", "-a", "-F", PANE_FORMAT])?;

        stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_pane_line)
            .collect()
    }

    /// Select a window, addressed as `session:window`.
    pub fn select_window(&self, target: &str) -> Result<()> {
        self.run_tmux(&["select-window", "-t", target])
    }

    /// Select a pane by its global id (e.g. `%3`).
    pub fn select_pane(&self, pane_id: &str) -> Result<()> {
        self.run_tmux(&["select-pane", "-t", pane_id])
    }

    /// Send key names to the active pane of `target`.
    pub fn send_keys(&self, target: &str, keys: &[&str]) -> Result<()> {
        let mut args = vec!["send-keys", "-t", target];
        args.extend_from_slice(keys);
        self.run_tmux(&args)
    }
}

fn format_code(code: Option<i32>) -> String {
    code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string())
}

/// Parses a single line from `list-panes` output.
/// Format: "#{session_name}:#{window_index}:#{pane_id}:#{pane_pid}"
fn parse_pane_line(line: &str) -> Result<PaneDescriptor> {
    let parts: Vec<&str> = line.trim().split(':').collect();

    let [session_name, window_index, pane_id, root_pid] = parts.as_slice() else {
        return Err(TmuxError::invalid_line(
            line,
            format!("expected 4 fields, found {}", parts.len()),
        ));
    };

    let window_index = window_index
        .parse::<u32>()
        .map_err(|e| TmuxError::invalid_line(line, format!("window index: {e}")))?;
    let root_pid = root_pid
        .parse::<u32>()
        .map_err(|e| TmuxError::invalid_line(line, format!("pane pid: {e}")))?;

    Ok(PaneDescriptor {
        session_name: session_name.to_string(),
        window_index,
        pane_id: pane_id.to_string(),
        root_pid,
    })
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io;
    use std::os::unix::process::ExitStatusExt;
    use std::process::{ExitStatus, Output};

    use super::CommandRunner;

    /// Mock implementation of CommandRunner for testing.
    /// Records every invocation and replays queued responses in order;
    /// once the queue is empty every command succeeds with empty output.
    #[derive(Default)]
    pub struct MockCommandRunner {
        calls: RefCell<Vec<Vec<String>>>,
        responses: RefCell<VecDeque<io::Result<Output>>>,
    }

    impl MockCommandRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_stdout(self, stdout: &str) -> Self {
            self.push(Ok(Self::make_output(stdout, 0)))
        }

        pub fn with_exit_code(self, code: i32) -> Self {
            self.push(Ok(Self::make_output("", code)))
        }

        pub fn with_spawn_error(self) -> Self {
            self.push(Err(io::Error::new(io::ErrorKind::NotFound, "tmux not found")))
        }

        fn push(self, response: io::Result<Output>) -> Self {
            self.responses.borrow_mut().push_back(response);
            self
        }

        fn make_output(stdout: &str, code: i32) -> Output {
            Output {
                // wait(2) status: exit code lives in the second byte
                status: ExitStatus::from_raw(code << 8),
                stdout: stdout.as_bytes().to_vec(),
                stderr: if code == 0 {
                    Vec::new()
                } else {
                    b"mock failure".to_vec()
                },
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c.join(" ")).collect()
        }
    }

    impl CommandRunner for MockCommandRunner {
        fn run_tmux(&self, args: &[&str]) -> io::Result<Output> {
            self.calls
                .borrow_mut()
                .push(args.iter().map(|s| s.to_string()).collect());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(Self::make_output("", 0)))
        }
    }
}
