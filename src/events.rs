use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::plan::{Action, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    Interrupt,
    Quit,
    Cancel,
    CursorUp,
    CursorDown,
    Reorder(Direction),
    Confirm,
    SetAction(Action),
    ToggleHelp,
    StartRebase,
}

fn map_key_event(key_event: KeyEvent) -> AppEvent {
    if key_event.kind != KeyEventKind::Press {
        return AppEvent::Tick;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key_event.modifiers.contains(KeyModifiers::SHIFT);
    if ctrl && key_event.code == KeyCode::Char('c') {
        return AppEvent::Interrupt;
    }
    if ctrl && key_event.code == KeyCode::Char('r') {
        return AppEvent::StartRebase;
    }

    match key_event.code {
        KeyCode::Up if ctrl || shift => AppEvent::Reorder(Direction::Up),
        KeyCode::Down if ctrl || shift => AppEvent::Reorder(Direction::Down),
        KeyCode::Char('K') => AppEvent::Reorder(Direction::Up),
        KeyCode::Char('J') => AppEvent::Reorder(Direction::Down),
        KeyCode::Up | KeyCode::Char('k') => AppEvent::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => AppEvent::CursorDown,
        KeyCode::Enter => AppEvent::Confirm,
        KeyCode::Esc => AppEvent::Cancel,
        KeyCode::Char('q') => AppEvent::Quit,
        KeyCode::Char('?') => AppEvent::ToggleHelp,
        KeyCode::Char('p') => AppEvent::SetAction(Action::Pick),
        KeyCode::Char('s') => AppEvent::SetAction(Action::Squash),
        KeyCode::Char('f') => AppEvent::SetAction(Action::Fixup),
        KeyCode::Char('e') => AppEvent::SetAction(Action::Edit),
        KeyCode::Char('x') | KeyCode::Char('d') => AppEvent::SetAction(Action::Drop),
        _ => AppEvent::Tick,
    }
}

pub fn next_event() -> io::Result<AppEvent> {
    if event::poll(Duration::from_millis(50))? {
        if let Event::Key(key_event) = event::read()? {
            return Ok(map_key_event(key_event));
        }
    }

    Ok(AppEvent::Tick)
}
