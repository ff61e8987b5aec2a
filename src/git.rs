use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use chrono::NaiveDate;
use tracing::debug;

const FIELD_SEPARATOR: char = '\u{1f}';
const LOG_FORMAT: &str = "--pretty=format:%h%x1f%H%x1f%s%x1f%an%x1f%ad%x1f%D";
const TAG_DECORATION_PREFIX: &str = "tag: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub subject: String,
    pub author: String,
    pub date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

impl Commit {
    pub fn date_label(&self) -> String {
        self.date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to run git: {0}")]
    Spawn(#[source] io::Error),
    #[error("git exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("no commits found; are you in a git repo?")]
    Empty,
    #[error("unexpected commit count from git: {0:?}")]
    InvalidCount(String),
}

/// How to invoke git. Every invocation runs with `GIT_PAGER=cat`.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
    args_prefix: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
    workdir: Option<PathBuf>,
}

impl GitCli {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args_prefix: Vec::new(),
            envs: Vec::new(),
            workdir: None,
        }
    }

    pub fn with_workdir(mut self, workdir: Option<PathBuf>) -> Self {
        self.workdir = workdir;
        self
    }

    #[cfg(test)]
    pub fn with_args_prefix<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args_prefix = args.into_iter().map(Into::into).collect();
        self
    }

    #[cfg(test)]
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args_prefix)
            .envs(self.envs.iter().map(|(key, value)| (key, value)))
            .env("GIT_PAGER", "cat");
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }
        command
    }

    /// Newest-first list of at most `max_count` commits reachable from HEAD.
    pub fn list_commits(&self, max_count: usize) -> Result<Vec<Commit>, HistoryError> {
        let max_count = max_count.to_string();
        let stdout = self.capture(&["log", "--date=short", LOG_FORMAT, "-n", &max_count])?;
        let commits = parse_log_output(&stdout);
        debug!(count = commits.len(), "loaded commit history");
        if commits.is_empty() {
            return Err(HistoryError::Empty);
        }
        Ok(commits)
    }

    pub fn count_ancestors(&self) -> Result<usize, HistoryError> {
        let stdout = self.capture(&["rev-list", "--count", "HEAD"])?;
        let trimmed = stdout.trim();
        trimmed
            .parse::<usize>()
            .map_err(|_| HistoryError::InvalidCount(trimmed.to_string()))
    }

    fn capture(&self, args: &[&str]) -> Result<String, HistoryError> {
        debug!(?args, "running git");
        let output = self
            .command()
            .args(args)
            .output()
            .map_err(HistoryError::Spawn)?;
        if !output.status.success() {
            return Err(HistoryError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub fn parse_log_output(text: &str) -> Vec<Commit> {
    text.lines().filter_map(parse_log_line).collect()
}

fn parse_log_line(line: &str) -> Option<Commit> {
    let mut fields = line.splitn(6, FIELD_SEPARATOR);
    let short_hash = fields.next()?;
    let hash = fields.next()?;
    let subject = fields.next()?;
    let author = fields.next()?;
    let date = fields.next()?;
    let tags = fields.next().map(parse_tags).unwrap_or_default();
    Some(Commit {
        hash: hash.to_string(),
        short_hash: short_hash.to_string(),
        subject: subject.to_string(),
        author: author.to_string(),
        date: NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok(),
        tags,
    })
}

fn parse_tags(decorations: &str) -> Vec<String> {
    decorations
        .split(',')
        .filter_map(|segment| segment.trim().strip_prefix(TAG_DECORATION_PREFIX))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
