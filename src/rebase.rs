use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::git::GitCli;
use crate::plan::PlanEntry;

const TODO_FILE_NAME: &str = "todo.txt";
const EDITOR_FILE_NAME: &str = "seq_editor.sh";
const SEQUENCE_EDITOR_ENV: &str = "GIT_SEQUENCE_EDITOR";

#[derive(Debug, thiserror::Error)]
pub enum RebaseError {
    #[error("no commits to rebase")]
    NothingToRebase,
    #[error("failed to create rebase workspace: {0}")]
    CreateWorkspace(#[source] io::Error),
    #[error("failed to write rebase todo: {0}")]
    WriteTodo(#[source] io::Error),
    #[error("failed to write sequence editor: {0}")]
    WriteEditor(#[source] io::Error),
    #[error("failed to launch git rebase: {0}")]
    Launch(#[source] io::Error),
}

/// Range handed to `git rebase -i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebaseTarget {
    /// `--root`: the whole history.
    Root,
    /// `HEAD~N`.
    Recent(usize),
}

impl RebaseTarget {
    /// Addressing by count fails once the plan reaches the total history depth.
    pub fn select(plan_len: usize, ancestor_count: usize) -> Self {
        if plan_len >= ancestor_count {
            Self::Root
        } else {
            Self::Recent(plan_len)
        }
    }

    pub fn arg(self) -> String {
        match self {
            Self::Root => "--root".to_string(),
            Self::Recent(count) => format!("HEAD~{count}"),
        }
    }
}

/// Builds the todo list in instruction order (oldest first) from a
/// newest-first plan.
pub fn render_todo(entries: &[PlanEntry]) -> Result<String, RebaseError> {
    if entries.is_empty() {
        return Err(RebaseError::NothingToRebase);
    }
    Ok(entries
        .iter()
        .rev()
        .map(|entry| {
            format!(
                "{} {} {}\n",
                entry.action.keyword(),
                entry.commit.hash,
                entry.commit.subject
            )
        })
        .collect())
}

/// Temporary directory holding the todo list and the sequence editor that
/// copies it into place. Removed when dropped.
#[derive(Debug)]
pub struct RebaseWorkspace {
    dir: TempDir,
    editor_path: PathBuf,
}

impl RebaseWorkspace {
    pub fn create_in(root: &Path, todo: &str) -> Result<Self, RebaseError> {
        let dir = tempfile::Builder::new()
            .prefix("rebase-tui-")
            .tempdir_in(root)
            .map_err(RebaseError::CreateWorkspace)?;
        let todo_path = dir.path().join(TODO_FILE_NAME);
        fs::write(&todo_path, todo).map_err(RebaseError::WriteTodo)?;

        let editor_path = dir.path().join(EDITOR_FILE_NAME);
        let script = format!(
            "#!/bin/sh\ncat {} > \"$1\"\n",
            shell_quote(&todo_path.to_string_lossy())
        );
        fs::write(&editor_path, script).map_err(RebaseError::WriteEditor)?;
        make_executable(&editor_path).map_err(RebaseError::WriteEditor)?;
        debug!(dir = %dir.path().display(), "prepared rebase workspace");
        Ok(Self { dir, editor_path })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Value for git's sequence editor setting, which git runs through the shell.
    pub fn sequence_editor(&self) -> String {
        shell_quote(&self.editor_path.to_string_lossy())
    }
}

pub struct Rebaser<'a> {
    git: &'a GitCli,
    temp_root: PathBuf,
}

impl<'a> Rebaser<'a> {
    pub fn new(git: &'a GitCli) -> Self {
        Self {
            git,
            temp_root: std::env::temp_dir(),
        }
    }

    #[cfg(test)]
    pub fn with_temp_root(git: &'a GitCli, temp_root: impl Into<PathBuf>) -> Self {
        Self {
            git,
            temp_root: temp_root.into(),
        }
    }

    /// Runs `git rebase -i` over the plan and blocks until git exits. Git
    /// inherits the terminal, so its own prompts (edit stops, conflicts) work
    /// as they would in a manual rebase.
    pub fn run(&self, entries: &[PlanEntry]) -> Result<ExitStatus, RebaseError> {
        let todo = render_todo(entries)?;
        let workspace = RebaseWorkspace::create_in(&self.temp_root, &todo)?;
        let target = self.target_for(entries.len());
        info!(
            entries = entries.len(),
            target = %target.arg(),
            workspace = %workspace.path().display(),
            "starting interactive rebase"
        );

        // GIT_SEQUENCE_EDITOR outranks sequence.editor, so an inherited one
        // would replace the todo list.
        let editor = workspace.sequence_editor();
        let status = self
            .git
            .command()
            .env(SEQUENCE_EDITOR_ENV, &editor)
            .arg("-c")
            .arg(format!("sequence.editor={editor}"))
            .args(["rebase", "-i"])
            .arg(target.arg())
            .status()
            .map_err(RebaseError::Launch)?;
        info!(%status, "git rebase finished");
        Ok(status)
    }

    fn target_for(&self, plan_len: usize) -> RebaseTarget {
        match self.git.count_ancestors() {
            Ok(total) => RebaseTarget::select(plan_len, total),
            Err(err) => {
                warn!(%err, "could not count ancestors; addressing range by count");
                RebaseTarget::Recent(plan_len)
            }
        }
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/rebase_tests.rs"]
mod tests;
