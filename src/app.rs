use tracing::{debug, warn};

use crate::events::AppEvent;
use crate::git::{Commit, HistoryError};
use crate::plan::{Action, Direction, Plan, PlanEntry};

pub const EMPTY_HISTORY_ADVISORY: &str =
    "No commits found or not a Git repo. Open inside a repo to begin.";
pub const NOTHING_TO_REBASE: &str = "Nothing to rebase.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub tone: StatusTone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Quit,
    Rebase(Vec<PlanEntry>),
}

#[derive(Debug, Clone, Copy)]
struct ActionPickerState {
    selected: usize,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    plan: Plan,
    selected: usize,
    picker: Option<ActionPickerState>,
    show_full_help: bool,
    status: Option<StatusMessage>,
    rebase_requested: bool,
}

impl App {
    pub fn new(plan: Plan) -> Self {
        Self {
            running: true,
            plan,
            selected: 0,
            picker: None,
            show_full_help: false,
            status: None,
            rebase_requested: false,
        }
    }

    /// An unavailable history is not fatal: the session starts empty with an
    /// advisory on the status line.
    pub fn from_history(history: Result<Vec<Commit>, HistoryError>) -> Self {
        match history {
            Ok(commits) => Self::new(Plan::from_commits(commits)),
            Err(err) => {
                warn!(%err, "commit history unavailable");
                let mut app = Self::new(Plan::default());
                app.set_status(EMPTY_HISTORY_ADVISORY, StatusTone::Info);
                app
            }
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    #[cfg(test)]
    pub fn is_picker_open(&self) -> bool {
        self.picker.is_some()
    }

    pub fn picker_selection(&self) -> Option<Action> {
        self.picker
            .map(|picker| Action::ALL[picker.selected.min(Action::ALL.len() - 1)])
    }

    pub fn show_full_help(&self) -> bool {
        self.show_full_help
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        if self.picker.is_some() {
            self.handle_picker_event(event);
            return;
        }
        match event {
            AppEvent::Tick | AppEvent::Cancel => {}
            AppEvent::Interrupt | AppEvent::Quit => self.quit(),
            AppEvent::StartRebase => self.request_rebase(),
            AppEvent::CursorUp => self.select_prev(),
            AppEvent::CursorDown => self.select_next(),
            AppEvent::Reorder(direction) => self.move_selected(direction),
            AppEvent::Confirm => self.open_action_picker(),
            AppEvent::SetAction(action) => self.set_selected_action(action),
            AppEvent::ToggleHelp => self.show_full_help = !self.show_full_help,
        }
    }

    fn handle_picker_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Interrupt => self.quit(),
            AppEvent::StartRebase => {
                self.picker = None;
                self.request_rebase();
            }
            AppEvent::Confirm => self.apply_picker_selection(),
            AppEvent::Cancel | AppEvent::Quit => self.picker = None,
            AppEvent::CursorUp => {
                if let Some(picker) = self.picker.as_mut() {
                    picker.selected = picker.selected.saturating_sub(1);
                }
            }
            AppEvent::CursorDown => {
                if let Some(picker) = self.picker.as_mut() {
                    picker.selected = (picker.selected + 1).min(Action::ALL.len() - 1);
                }
            }
            AppEvent::Tick
            | AppEvent::Reorder(_)
            | AppEvent::SetAction(_)
            | AppEvent::ToggleHelp => {}
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.plan.len() {
            self.selected += 1;
        }
    }

    /// Selection follows the moved commit.
    pub fn move_selected(&mut self, direction: Direction) {
        if let Some(position) = self.plan.move_entry(self.selected, direction) {
            self.selected = position;
            self.status = None;
        }
    }

    pub fn set_selected_action(&mut self, action: Action) {
        if self.plan.is_empty() {
            return;
        }
        match self.plan.set_action(self.selected, action) {
            Ok(()) => self.status = None,
            Err(err) => {
                debug!(%err, position = self.selected, "rejected action change");
                self.set_status(err.to_string(), StatusTone::Error);
            }
        }
    }

    pub fn open_action_picker(&mut self) {
        let Some(entry) = self.plan.get(self.selected) else {
            return;
        };
        self.picker = Some(ActionPickerState {
            selected: entry.action.index(),
        });
    }

    fn apply_picker_selection(&mut self) {
        if let Some(action) = self.picker_selection() {
            self.set_selected_action(action);
        }
        self.picker = None;
    }

    pub fn request_rebase(&mut self) {
        if self.plan.is_empty() {
            self.set_status(NOTHING_TO_REBASE, StatusTone::Error);
            return;
        }
        self.rebase_requested = true;
        self.running = false;
    }

    pub fn into_outcome(self) -> SessionOutcome {
        if self.rebase_requested {
            SessionOutcome::Rebase(self.plan.into_entries())
        } else {
            SessionOutcome::Quit
        }
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.status = Some(StatusMessage {
            text: text.into(),
            tone,
        });
    }
}

#[cfg(test)]
#[path = "../tests/unit/app_tests.rs"]
mod tests;
