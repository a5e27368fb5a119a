//! Held-key tracking for terminal environments.
//!
//! Supports terminals that do not emit key release events by using a timeout: a
//! held key that is not refreshed by an auto-repeat press within the timeout is
//! treated as released, and the matching release command is synthesised.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{map_key, InputContext};
use crate::types::Command;

// Shorter than the engine's 150ms move repeat, so a tap on a terminal without
// release events moves exactly one column.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 140;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Held {
    Left,
    Right,
    Down,
}

impl Held {
    fn release(self) -> Command {
        match self {
            Held::Left => Command::ReleaseLeft,
            Held::Right => Command::ReleaseRight,
            Held::Down => Command::SoftDropEnd,
        }
    }

    fn pressed_by(command: Command) -> Option<Self> {
        match command {
            Command::MoveLeft => Some(Held::Left),
            Command::MoveRight => Some(Held::Right),
            Command::SoftDropStart => Some(Held::Down),
            _ => None,
        }
    }

    fn released_by(command: Command) -> Option<Self> {
        match command {
            Command::ReleaseLeft => Some(Held::Left),
            Command::ReleaseRight => Some(Held::Right),
            Command::SoftDropEnd => Some(Held::Down),
            _ => None,
        }
    }
}

/// Turns raw key events into commands and tracks which keys are held.
#[derive(Debug, Clone)]
pub struct InputHandler {
    held: ArrayVec<(Held, Instant), 3>,
    release_events: bool,
    key_release_timeout: Duration,
}

impl InputHandler {
    /// `release_events` says whether the terminal reports key releases.
    pub fn new(release_events: bool) -> Self {
        Self {
            held: ArrayVec::new(),
            release_events,
            key_release_timeout: Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
        }
    }

    pub fn with_key_release_timeout(mut self, timeout: Duration) -> Self {
        self.key_release_timeout = timeout;
        self
    }

    pub fn key_release_timeout(&self) -> Duration {
        self.key_release_timeout
    }

    pub fn release_events(&self) -> bool {
        self.release_events
    }

    fn forget(&mut self, key: Held) {
        self.held.retain(|(k, _)| *k != key);
    }

    /// Map one key event and update held state.
    pub fn handle_key(&mut self, key: KeyEvent, ctx: InputContext, now: Instant) -> Option<Command> {
        if !self.release_events && key.kind == KeyEventKind::Release {
            return None;
        }
        let command = map_key(key, ctx)?;

        if let Some(k) = Held::pressed_by(command) {
            // Left and right share the one repeat slot in the engine.
            if matches!(k, Held::Left | Held::Right) {
                self.held.retain(|(h, _)| *h == Held::Down);
            }
            match self.held.iter_mut().find(|(h, _)| *h == k) {
                Some(entry) => entry.1 = now,
                None => {
                    let _ = self.held.try_push((k, now));
                }
            }
        } else if let Some(k) = Held::released_by(command) {
            self.forget(k);
        }
        Some(command)
    }

    /// Release commands for held keys whose timeout has lapsed.
    ///
    /// Always empty when the terminal reports releases itself.
    pub fn expire(&mut self, now: Instant) -> ArrayVec<Command, 3> {
        let mut released = ArrayVec::new();
        if self.release_events {
            return released;
        }
        let timeout = self.key_release_timeout;
        self.held.retain(|(k, seen)| {
            if now.saturating_duration_since(*seen) > timeout {
                released.push(k.release());
                false
            } else {
                true
            }
        });
        released
    }

    /// Time until the next held key would expire.
    pub fn next_expiry(&self, now: Instant) -> Option<Duration> {
        if self.release_events {
            return None;
        }
        self.held
            .iter()
            .map(|(_, seen)| (*seen + self.key_release_timeout).saturating_duration_since(now))
            .min()
    }

    pub fn reset(&mut self) {
        self.held.clear();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(false)
    }
}
