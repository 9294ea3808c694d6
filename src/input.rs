use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    TogglePause,
    ToggleHud,
    Redraw,
    Resize(u16, u16),
}

/// Drains pending terminal events without blocking the frame.
pub(crate) fn poll_actions() -> anyhow::Result<Vec<Action>> {
    let mut out = Vec::new();
    while event::poll(Duration::from_millis(0))? {
        if let Some(action) = map_event(event::read()?) {
            out.push(action);
            if out.len() >= 32 {
                break;
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event(ev: Event) -> Option<Action> {
    match ev {
        Event::Resize(w, h) => Some(Action::Resize(w, h)),
        Event::Key(KeyEvent {
            code, modifiers, kind, ..
        }) => {
            if kind != KeyEventKind::Press {
                return None;
            }
            let ctrl = modifiers.contains(KeyModifiers::CONTROL);
            match code {
                KeyCode::Char('c') | KeyCode::Char('C') if ctrl => Some(Action::Quit),
                KeyCode::Char('l') | KeyCode::Char('L') if ctrl => Some(Action::Redraw),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
                KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => Some(Action::TogglePause),
                KeyCode::Char('h') | KeyCode::Char('H') => Some(Action::ToggleHud),
                _ => None,
            }
        }
        _ => None,
    }
}
