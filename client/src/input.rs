//! Keyboard handling on a dedicated blocking thread.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use shared::Command;
use tokio::sync::mpsc;

/// What a keypress means to the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Command(Command),
    Quit,
}

/// Maps one key event to an action. Arrows and `hjkl` move and aim,
/// space shoots, `q`/Esc/Ctrl-C quit; anything else is ignored.
pub fn action_for_key(key: KeyEvent) -> Option<InputAction> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputAction::Quit)
        }
        KeyCode::Up | KeyCode::Char('k') => Some(InputAction::Command(Command::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(InputAction::Command(Command::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(InputAction::Command(Command::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(InputAction::Command(Command::Right)),
        KeyCode::Char(' ') => Some(InputAction::Command(Command::Shoot)),
        KeyCode::Char('q') | KeyCode::Esc => Some(InputAction::Quit),
        _ => None,
    }
}

/// Spawns the blocking reader thread. `crossterm::event::read` has no
/// async form, so keys cross into the runtime through a channel. The
/// thread exits after sending [`InputAction::Quit`] or when the receiver
/// is dropped.
pub fn spawn_input_thread() -> mpsc::Receiver<InputAction> {
    let (sender, receiver) = mpsc::channel(16);

    std::thread::spawn(move || loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if let Some(action) = action_for_key(key) {
                    let quitting = action == InputAction::Quit;
                    if sender.blocking_send(action).is_err() || quitting {
                        break;
                    }
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });

    receiver
}
