//! Key mapping from terminal events to commands.

use crate::types::{Command, Phase};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// The slice of game state that decides what a key means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputContext {
    pub phase: Phase,
    pub quit_pending: bool,
}

impl InputContext {
    pub fn new(phase: Phase, quit_pending: bool) -> Self {
        Self {
            phase,
            quit_pending,
        }
    }
}

fn is_left(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A')
    )
}

fn is_right(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D')
    )
}

fn is_down(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S')
    )
}

fn is_rotate(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W')
    )
}

fn is_escape(code: KeyCode) -> bool {
    matches!(code, KeyCode::Esc | KeyCode::Char('q' | 'Q'))
}

/// Map a keyboard event to a command.
///
/// Releases only matter for held keys; auto-repeated presses only matter for keys
/// whose command is idempotent while held.
pub fn map_key(key: KeyEvent, ctx: InputContext) -> Option<Command> {
    let code = key.code;

    if key.kind == KeyEventKind::Release {
        return if is_left(code) {
            Some(Command::ReleaseLeft)
        } else if is_right(code) {
            Some(Command::ReleaseRight)
        } else if is_down(code) {
            Some(Command::SoftDropEnd)
        } else {
            None
        };
    }
    let repeat = key.kind == KeyEventKind::Repeat;

    if ctx.quit_pending {
        return match code {
            KeyCode::Enter | KeyCode::Char('y' | 'Y') if !repeat => Some(Command::ConfirmQuit),
            KeyCode::Esc | KeyCode::Char('n' | 'N') if !repeat => Some(Command::CancelQuit),
            _ => None,
        };
    }

    match ctx.phase {
        Phase::Initial => match code {
            KeyCode::Enter if !repeat => Some(Command::Start),
            _ => None,
        },
        Phase::GameOver => match code {
            KeyCode::Enter | KeyCode::Char('r' | 'R') if !repeat => Some(Command::Restart),
            c if is_escape(c) && !repeat => Some(Command::Quit),
            _ => None,
        },
        Phase::Playing | Phase::Paused => {
            if is_left(code) {
                Some(Command::MoveLeft)
            } else if is_right(code) {
                Some(Command::MoveRight)
            } else if is_down(code) {
                Some(Command::SoftDropStart)
            } else if repeat {
                None
            } else if is_rotate(code) {
                Some(Command::Rotate)
            } else if is_escape(code) {
                Some(Command::RequestQuit)
            } else {
                match code {
                    KeyCode::Char(' ') => Some(Command::HardDrop),
                    KeyCode::Char('p' | 'P') => Some(Command::TogglePause),
                    KeyCode::Char('r' | 'R') => Some(Command::Restart),
                    _ => None,
                }
            }
        }
    }
}

/// Check if key should leave the program.
///
/// Ctrl+C always exits; Esc/q exit from the title screen, where there is no game
/// to quit.
pub fn should_exit(key: KeyEvent, ctx: InputContext) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        || (ctx.phase == Phase::Initial && !ctx.quit_pending && is_escape(key.code))
}
