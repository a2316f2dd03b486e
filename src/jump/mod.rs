//! Find the tmux pane whose editor has a file open and jump to a line in it.

mod commander;
mod matcher;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::infra::process::{ProcessTable, SystemProcessTable};
use crate::infra::tmux::{self, CommandRunner, PaneDescriptor, RealCommandRunner, Tmux};
use crate::shared::path::absolutize;

pub use matcher::{DEFAULT_EDITORS, EditorMatcher};

/// Everything a single run needs, after merging CLI flags and config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpRequest {
    pub line_number: u32,
    /// File as given on the command line, possibly relative.
    pub file: PathBuf,
    pub tmux: PathBuf,
    pub editors: Vec<String>,
}

/// The pane that hosts the matching editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneTarget {
    pub session_name: String,
    pub window_index: u32,
    pub pane_id: String,
}

impl PaneTarget {
    /// `session:window`, as accepted by `select-window -t` and `send-keys -t`.
    pub fn window_target(&self) -> String {
        format!("{}:{}", self.session_name, self.window_index)
    }
}

impl From<PaneDescriptor> for PaneTarget {
    fn from(pane: PaneDescriptor) -> Self {
        Self {
            session_name: pane.session_name,
            window_index: pane.window_index,
            pane_id: pane.pane_id,
        }
    }
}

/// Runs the whole search-and-jump against the real tmux and process table.
/// Returns the pane that was activated, or None if no editor had the file open.
pub fn run(request: &JumpRequest) -> Result<Option<PaneTarget>> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let target_file = absolutize(&cwd, &request.file);

    let tmux = Tmux::new(RealCommandRunner::new(&request.tmux));
    let table = SystemProcessTable::snapshot();
    let matcher = EditorMatcher::new(&table, &request.editors);

    jump_to_file(&tmux, &matcher, &target_file, request.line_number)
}

/// Locates the editor editing `target_file` and moves it to `line_number`.
/// `target_file` must be absolute.
pub fn jump_to_file<R: CommandRunner, T: ProcessTable>(
    tmux: &Tmux<R>,
    matcher: &EditorMatcher<'_, T>,
    target_file: &Path,
    line_number: u32,
) -> Result<Option<PaneTarget>> {
    let Some(target) = find_editor_pane(tmux, matcher, target_file)
        .context("Failed to enumerate tmux panes")?
    else {
        tracing::warn!(
            "Could not find tmux window with an editor editing {}",
            target_file.display()
        );
        return Ok(None);
    };

    commander::activate(tmux, &target, line_number);
    Ok(Some(target))
}

/// Returns the first pane, in tmux's enumeration order, whose process tree
/// contains an editor with `target_file` open.
///
/// When several panes qualify the first one wins; no further tie-break.
pub fn find_editor_pane<R: CommandRunner, T: ProcessTable>(
    tmux: &Tmux<R>,
    matcher: &EditorMatcher<'_, T>,
    target_file: &Path,
) -> tmux::Result<Option<PaneTarget>> {
    let panes = tmux.list_panes()?;
    tracing::debug!("Detected tmux panes {panes:?}");

    for pane in panes {
        tracing::debug!(
            "Examining tmux session {}, window {}, pane {}",
            pane.session_name,
            pane.window_index,
            pane.pane_id
        );

        if matcher.matches(pane.root_pid, target_file) {
            tracing::debug!(
                "Found editor editing {} in pane {} (window {} of tmux session {})",
                target_file.display(),
                pane.pane_id,
                pane.window_index,
                pane.session_name
            );
            return Ok(Some(pane.into()));
        }
    }

    Ok(None)
}
