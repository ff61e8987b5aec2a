use std::fmt;

use crate::git::Commit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    #[default]
    Pick,
    Squash,
    Fixup,
    Edit,
    Drop,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Pick,
        Action::Squash,
        Action::Fixup,
        Action::Edit,
        Action::Drop,
    ];

    /// Keyword understood by `git rebase -i` todo lists.
    pub fn keyword(self) -> &'static str {
        match self {
            Action::Pick => "pick",
            Action::Squash => "squash",
            Action::Fixup => "fixup",
            Action::Edit => "edit",
            Action::Drop => "drop",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Pick => "Pick",
            Action::Squash => "Squash",
            Action::Fixup => "Fixup",
            Action::Edit => "Edit",
            Action::Drop => "Drop",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Action::Pick => "use commit as-is",
            Action::Squash => "combine into previous commit; edit combined message",
            Action::Fixup => "combine into previous commit; keep previous message",
            Action::Edit => "pause to edit this commit during rebase",
            Action::Drop => "remove this commit",
        }
    }

    pub fn merges_into_previous(self) -> bool {
        matches!(self, Action::Squash | Action::Fixup)
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub commit: Commit,
    pub action: Action,
}

impl PlanEntry {
    pub fn new(commit: Commit) -> Self {
        Self {
            commit,
            action: Action::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward position 0 (newer).
    Up,
    /// Away from position 0 (older).
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("Can't squash/fixup the oldest commit. Move it above another or pick it.")]
    OldestCannotMerge(Action),
    #[error("no plan entry at position {0}")]
    NoSuchEntry(usize),
}

/// Commits being rewritten, newest first, each with the action the rebase
/// should apply. The oldest entry never carries squash or fixup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    entries: Vec<PlanEntry>,
}

impl Plan {
    pub fn from_commits(commits: Vec<Commit>) -> Self {
        Self {
            entries: commits.into_iter().map(PlanEntry::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&PlanEntry> {
        self.entries.get(position)
    }

    /// Swaps the entry at `position` with its neighbour and returns the
    /// entry's new position. Moves past either end are ignored.
    pub fn move_entry(&mut self, position: usize, direction: Direction) -> Option<usize> {
        if position >= self.entries.len() {
            return None;
        }
        let target = match direction {
            Direction::Up => position.checked_sub(1)?,
            Direction::Down => position + 1,
        };
        if target >= self.entries.len() {
            return None;
        }
        self.entries.swap(position, target);
        Some(target)
    }

    pub fn set_action(&mut self, position: usize, action: Action) -> Result<(), PlanError> {
        let last = self.entries.len().checked_sub(1);
        if Some(position) == last && action.merges_into_previous() {
            return Err(PlanError::OldestCannotMerge(action));
        }
        let entry = self
            .entries
            .get_mut(position)
            .ok_or(PlanError::NoSuchEntry(position))?;
        entry.action = action;
        Ok(())
    }

    pub fn snapshot(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PlanEntry> {
        self.entries
    }
}

#[cfg(test)]
#[path = "../tests/unit/plan_tests.rs"]
mod tests;
