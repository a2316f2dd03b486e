use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::infra::process::{self, ProcessTable};
use crate::shared::path::absolutize;

/// Editors recognized without any configuration.
pub const DEFAULT_EDITORS: &[&str] = &["vim", "nvim"];

/// What a single process turned out to be.
enum Inspection {
    /// An editor with the target file open.
    Match,
    /// An editor with some other file (or no file) open; its subtree is skipped.
    OtherFile,
    /// Not an editor; these children should be searched.
    Descend(Vec<u32>),
}

/// Searches process trees for an editor that has a given file open.
pub struct EditorMatcher<'a, T: ProcessTable> {
    table: &'a T,
    editors: &'a [String],
}

impl<'a, T: ProcessTable> EditorMatcher<'a, T> {
    pub fn new(table: &'a T, editors: &'a [String]) -> Self {
        Self { table, editors }
    }

    /// Returns true if `root_pid` or any of its descendants is a known editor
    /// whose last argument resolves to `target`.
    ///
    /// `target` must already be absolute and normalized. Processes whose argv
    /// or cwd cannot be read (exited, owned by another user) are treated as
    /// non-matching and their subtrees are skipped. Children are visited
    /// depth-first in the order the table reports them; the search stops at
    /// the first match.
    pub fn matches(&self, root_pid: u32, target: &Path) -> bool {
        let mut stack = vec![root_pid];
        // pids can be recycled while we walk; never visit one twice
        let mut visited = HashSet::new();

        while let Some(pid) = stack.pop() {
            if !visited.insert(pid) {
                continue;
            }

            match self.inspect(pid, target) {
                Ok(Inspection::Match) => return true,
                Ok(Inspection::OtherFile) => {}
                Ok(Inspection::Descend(children)) => {
                    // Reversed so the first child is popped first
                    stack.extend(children.into_iter().rev());
                }
                Err(e) => {
                    tracing::debug!("Skipping process {pid}: {e}");
                }
            }
        }

        false
    }

    fn inspect(&self, pid: u32, target: &Path) -> process::Result<Inspection> {
        let argv = self.table.command_line(pid)?;
        let cwd = self.table.working_directory(pid)?;

        let Some(editor) = self.editor_name(&argv) else {
            tracing::debug!("Process {pid} is not running an editor");
            return Ok(Inspection::Descend(self.table.children(pid)?));
        };

        let Some(open_file) = argv.get(1..).and_then(|args| args.last()) else {
            tracing::debug!("Process {pid} is running {editor} without a file");
            return Ok(Inspection::OtherFile);
        };

        let open_file: PathBuf = absolutize(&cwd, Path::new(open_file));

        if open_file == target {
            tracing::debug!(
                "Process {pid} is running {editor}, with correct filename {}",
                open_file.display()
            );
            Ok(Inspection::Match)
        } else {
            tracing::debug!(
                "Process {pid} is running {editor}, but with filename {}",
                open_file.display()
            );
            Ok(Inspection::OtherFile)
        }
    }

    /// Returns the editor name if `argv[0]` (or its basename) is a known editor.
    fn editor_name<'s>(&self, argv: &'s [String]) -> Option<&'s str> {
        let program = argv.first()?;
        let name = Path::new(program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(program.as_str());

        self.editors
            .iter()
            .any(|editor| editor == name)
            .then_some(name)
    }
}
