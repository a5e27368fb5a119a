//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no engine logic, so they can be shared by the
//! core engine, the terminal front end and the async runtime alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn column**: `BOARD_WIDTH / 2 - 1` (4), spawn row 0
//!
//! # Timing
//!
//! Gravity follows the NES frame curve converted from 60 fps frames to time:
//!
//! | Level | Frames per row | Interval |
//! |-------|----------------|----------|
//! | 1 | 48 | 800ms |
//! | 2 | 43 | ~717ms |
//! | 5 | 28 | ~467ms |
//! | 9 | 8 | ~133ms |
//! | 10+ | 6 | 100ms |
//!
//! Held left/right repeats every `MOVE_REPEAT_MS`. Soft drop divides the
//! gravity interval by `SOFT_DROP_DIVISOR` unless configured otherwise.
//!
//! # Examples
//!
//! ```
//! use jafris_types::{Command, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(ShapeKind::from_str("t"), Some(ShapeKind::T));
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//! assert_eq!(Command::SoftDropStart.as_str(), "softDropStart");
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Frames per second used to convert gravity frame counts into time.
pub const FRAMES_PER_SECOND: u64 = 60;

/// Gravity frames per row at level 1.
pub const GRAVITY_FRAMES_START: u32 = 48;

/// Frames shaved off per level until the floor kicks in.
pub const GRAVITY_FRAMES_STEP: u32 = 5;

/// Number of levels (counted from level 1) that follow the linear curve.
pub const GRAVITY_LINEAR_LEVELS: u32 = 9;

/// Gravity frames per row from level 10 onwards.
pub const GRAVITY_FRAMES_FLOOR: u32 = 6;

/// Auto-repeat interval while a horizontal direction is held.
pub const MOVE_REPEAT_MS: u64 = 150;

/// Default soft drop divisor (gravity interval / 10).
pub const SOFT_DROP_DIVISOR: u32 = 10;

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per cell descended under soft drop.
pub const SOFT_DROP_POINTS_PER_CELL: u32 = 1;

/// Points per cell descended by a hard drop.
pub const HARD_DROP_POINTS_PER_CELL: u32 = 2;

/// Line clear scoring table (classic marathon rules).
///
/// Base points for clearing N lines, multiplied by the current level (1-based):
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// The five shape kinds used by the game
///
/// - **T**: T-shaped, 3x2
/// - **O**: 2x2 square
/// - **L**: vertical bar with a foot to the right, 2x3
/// - **J**: vertical bar with a foot to the left, 2x3
/// - **I**: horizontal bar, 4x1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    T,
    O,
    L,
    J,
    I,
}

impl ShapeKind {
    /// Every kind, in template order.
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::T,
        ShapeKind::O,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::I,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use jafris_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("O"), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_str("s"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "t" => Some(ShapeKind::T),
            "o" => Some(ShapeKind::O),
            "l" => Some(ShapeKind::L),
            "j" => Some(ShapeKind::J),
            "i" => Some(ShapeKind::I),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::T => "t",
            ShapeKind::O => "o",
            ShapeKind::L => "l",
            ShapeKind::J => "j",
            ShapeKind::I => "i",
        }
    }
}

/// Game phase. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// No game started yet (also reached via quit).
    Initial,
    /// Game is running; gravity is armed.
    Playing,
    /// Game is suspended; no timers are armed.
    Paused,
    /// The last spawned piece collided. Stable until restart or quit.
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Initial => "initial",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::GameOver => "gameOver",
        }
    }
}

/// Horizontal direction of a held move key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column delta for one step in this direction.
    pub fn dx(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// The two kinds of recurring timer the state machine owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerKind {
    /// Autonomous one-row descent (also carries soft drop).
    Gravity,
    /// Auto-repeat for a held horizontal direction.
    HorizontalRepeat,
}

/// Commands accepted by the state machine
///
/// These are the abstract inputs a front end sends. Key-down and key-up of
/// held keys are separate commands so the engine owns all repeat timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Restart,
    Pause,
    Resume,
    TogglePause,
    Quit,
    /// Open the quit confirmation overlay (or quit directly if disabled).
    RequestQuit,
    CancelQuit,
    ConfirmQuit,
    MoveLeft,
    MoveRight,
    /// Release whichever horizontal direction is held.
    ReleaseHorizontal,
    /// Release left only if left is the held direction.
    ReleaseLeft,
    /// Release right only if right is the held direction.
    ReleaseRight,
    SoftDropStart,
    SoftDropEnd,
    HardDrop,
    Rotate,
}

impl Command {
    pub const ALL: [Command; 18] = [
        Command::Start,
        Command::Restart,
        Command::Pause,
        Command::Resume,
        Command::TogglePause,
        Command::Quit,
        Command::RequestQuit,
        Command::CancelQuit,
        Command::ConfirmQuit,
        Command::MoveLeft,
        Command::MoveRight,
        Command::ReleaseHorizontal,
        Command::ReleaseLeft,
        Command::ReleaseRight,
        Command::SoftDropStart,
        Command::SoftDropEnd,
        Command::HardDrop,
        Command::Rotate,
    ];

    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use jafris_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("softdropend"), Some(Command::SoftDropEnd));
    /// assert_eq!(Command::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "restart" => Some(Command::Restart),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "togglepause" => Some(Command::TogglePause),
            "quit" => Some(Command::Quit),
            "requestquit" => Some(Command::RequestQuit),
            "cancelquit" => Some(Command::CancelQuit),
            "confirmquit" => Some(Command::ConfirmQuit),
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "releasehorizontal" => Some(Command::ReleaseHorizontal),
            "releaseleft" => Some(Command::ReleaseLeft),
            "releaseright" => Some(Command::ReleaseRight),
            "softdropstart" => Some(Command::SoftDropStart),
            "softdropend" => Some(Command::SoftDropEnd),
            "harddrop" => Some(Command::HardDrop),
            "rotate" => Some(Command::Rotate),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Restart => "restart",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::TogglePause => "togglePause",
            Command::Quit => "quit",
            Command::RequestQuit => "requestQuit",
            Command::CancelQuit => "cancelQuit",
            Command::ConfirmQuit => "confirmQuit",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::ReleaseHorizontal => "releaseHorizontal",
            Command::ReleaseLeft => "releaseLeft",
            Command::ReleaseRight => "releaseRight",
            Command::SoftDropStart => "softDropStart",
            Command::SoftDropEnd => "softDropEnd",
            Command::HardDrop => "hardDrop",
            Command::Rotate => "rotate",
        }
    }
}

/// Cue emitted by the state machine for front ends (sound, UI text).
///
/// Events are queued on the machine and drained by the caller; the engine
/// itself never plays audio or touches the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    Started,
    Rotated,
    /// The current piece was written into the board.
    Locked,
    LinesCleared { count: u32, points: u32 },
    LevelUp { level: u32 },
    Paused,
    Resumed,
    QuitRequested,
    QuitCancelled,
    GameOver { score: u32 },
    /// Returned to the initial phase via quit.
    Reset,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(ShapeKind)`: Occupied, remembering which shape filled it
pub type Cell = Option<ShapeKind>;
