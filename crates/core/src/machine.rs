//! Game state machine - phases, commands and timer-driven play
//!
//! The machine owns a [`GameSession`] and two recurring timers (gravity and
//! horizontal auto-repeat) armed through a [`Scheduler`]. Commands and timer fires
//! both arrive on the caller's single thread of control; neither ever blocks.
//!
//! Phase transitions:
//!
//! ```text
//! Initial --start--> Playing <--pause/resume--> Paused
//!                       |
//!                  spawn blocked
//!                       v
//!                   GameOver --start/restart--> Playing
//!
//! any --quit--> Initial
//! ```
//!
//! Commands that do not apply in the current phase are no-ops and return `false`.

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::board::Board;
use crate::collision::{collides, lowest_valid_y, place};
use crate::config::GameConfig;
use crate::piece::Piece;
use crate::rng::ShapeSource;
use crate::scoring::{gravity_interval, soft_drop_interval};
use crate::session::GameSession;
use crate::snapshot::GameSnapshot;
use crate::timer::{ManualScheduler, Scheduler, TimerHandle, TimerSlots};
use crate::types::{Command, Direction, GameEvent, Phase, ShapeKind, TimerKind};

pub struct GameMachine<S: Scheduler> {
    session: GameSession,
    scheduler: S,
    timers: TimerSlots,
    config: GameConfig,
    phase: Phase,
    quit_pending: bool,
    soft_drop: bool,
    held: Option<Direction>,
    events: Vec<GameEvent>,
}

impl<S: Scheduler> GameMachine<S> {
    /// Create a machine in the `Initial` phase with a random shape source.
    pub fn new(scheduler: S, config: GameConfig) -> Self {
        let source = ShapeSource::random(config.resolved_seed());
        Self::with_source(scheduler, config, source)
    }

    pub fn with_source(scheduler: S, config: GameConfig, source: ShapeSource) -> Self {
        Self {
            session: GameSession::new(source),
            scheduler,
            timers: TimerSlots::default(),
            config,
            phase: Phase::Initial,
            quit_pending: false,
            soft_drop: false,
            held: None,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.session.board
    }

    pub fn current(&self) -> Option<Piece> {
        self.session.current
    }

    pub fn next(&self) -> Option<ShapeKind> {
        self.session.next
    }

    pub fn score(&self) -> u32 {
        self.session.score.score()
    }

    pub fn level(&self) -> u32 {
        self.session.score.level()
    }

    pub fn lines(&self) -> u32 {
        self.session.score.lines()
    }

    pub fn quit_pending(&self) -> bool {
        self.quit_pending
    }

    pub fn soft_drop(&self) -> bool {
        self.soft_drop
    }

    pub fn held_direction(&self) -> Option<Direction> {
        self.held
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn timers(&self) -> &TimerSlots {
        &self.timers
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    /// Gravity interval at the current level.
    pub fn gravity_interval(&self) -> Duration {
        gravity_interval(self.level())
    }

    /// Interval the gravity timer should run at right now.
    fn effective_gravity(&self) -> Duration {
        let base = self.gravity_interval();
        if self.soft_drop {
            soft_drop_interval(base, self.config.soft_drop_divisor)
        } else {
            base
        }
    }

    /// Row the current piece would land on.
    pub fn ghost_y(&self) -> Option<i8> {
        if !matches!(self.phase, Phase::Playing | Phase::Paused) {
            return None;
        }
        let piece = self.session.current?;
        Some(lowest_valid_y(&self.session.board, &piece))
    }

    /// Take every cue event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Gameplay commands only act while playing with no quit dialog open.
    fn running(&self) -> bool {
        self.phase == Phase::Playing && !self.quit_pending
    }

    fn emit(&mut self, event: GameEvent) {
        trace!(?event, "event");
        self.events.push(event);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            info!(from = self.phase.as_str(), to = phase.as_str(), "phase change");
            self.phase = phase;
        }
    }

    fn arm_gravity(&mut self) {
        let every = self.effective_gravity();
        self.timers
            .arm(&mut self.scheduler, TimerKind::Gravity, every);
    }

    fn arm_repeat(&mut self) {
        let every = self.config.move_repeat;
        self.timers
            .arm(&mut self.scheduler, TimerKind::HorizontalRepeat, every);
    }

    /// Recreate the timers a running game needs from level and held state.
    fn rearm_timers(&mut self) {
        self.arm_gravity();
        if self.held.is_some() {
            self.arm_repeat();
        } else {
            self.timers
                .disarm(&mut self.scheduler, TimerKind::HorizontalRepeat);
        }
    }

    fn suspend_timers(&mut self) {
        self.timers.disarm_all(&mut self.scheduler);
    }

    // ---- lifecycle -------------------------------------------------------

    /// Start a game from `Initial`; from `GameOver` this is a restart.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::Initial => {
                self.begin();
                true
            }
            Phase::GameOver => self.restart(),
            Phase::Playing | Phase::Paused => false,
        }
    }

    /// Throw away the current game (if any) and begin a fresh one.
    pub fn restart(&mut self) -> bool {
        self.begin();
        true
    }

    fn begin(&mut self) {
        self.suspend_timers();
        self.quit_pending = false;
        self.soft_drop = false;
        self.held = None;

        let spawned = self.session.begin();
        self.set_phase(Phase::Playing);
        self.emit(GameEvent::Started);

        if spawned {
            self.arm_gravity();
        } else {
            self.game_over();
        }
    }

    /// Abandon the game and return to `Initial`. Valid from any phase.
    pub fn quit(&mut self) -> bool {
        self.suspend_timers();
        self.session.reset();
        self.quit_pending = false;
        self.soft_drop = false;
        self.held = None;
        self.set_phase(Phase::Initial);
        self.emit(GameEvent::Reset);
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.running() {
            return false;
        }
        self.suspend_timers();
        self.soft_drop = false;
        self.set_phase(Phase::Paused);
        self.emit(GameEvent::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused || self.quit_pending {
            return false;
        }
        self.set_phase(Phase::Playing);
        self.rearm_timers();
        self.emit(GameEvent::Resumed);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Playing => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Initial | Phase::GameOver => false,
        }
    }

    /// Ask to quit. Opens the confirmation step while a game is live, otherwise
    /// quits straight away.
    pub fn request_quit(&mut self) -> bool {
        let live = matches!(self.phase, Phase::Playing | Phase::Paused);
        if !self.config.confirm_quit || !live {
            return self.quit();
        }
        if self.quit_pending {
            return false;
        }
        self.suspend_timers();
        self.soft_drop = false;
        self.quit_pending = true;
        self.emit(GameEvent::QuitRequested);
        true
    }

    pub fn cancel_quit(&mut self) -> bool {
        if !self.quit_pending {
            return false;
        }
        self.quit_pending = false;
        if self.phase == Phase::Playing {
            self.rearm_timers();
        }
        self.emit(GameEvent::QuitCancelled);
        true
    }

    pub fn confirm_quit(&mut self) -> bool {
        if !self.quit_pending {
            return false;
        }
        self.quit()
    }

    // ---- movement --------------------------------------------------------

    /// Press a horizontal direction: move once now, then auto-repeat.
    ///
    /// Pressing the direction already held does nothing; pressing the other one
    /// takes over the repeat timer.
    pub fn press_horizontal(&mut self, dir: Direction) -> bool {
        if !self.running() || self.held == Some(dir) {
            return false;
        }
        self.held = Some(dir);
        self.try_shift(dir.dx());
        self.arm_repeat();
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.press_horizontal(Direction::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.press_horizontal(Direction::Right)
    }

    /// Release the held direction. With `Some(dir)`, only if `dir` is the one held.
    fn release(&mut self, dir: Option<Direction>) -> bool {
        let Some(held) = self.held else {
            return false;
        };
        if dir.is_some_and(|d| d != held) {
            return false;
        }
        self.held = None;
        self.timers
            .disarm(&mut self.scheduler, TimerKind::HorizontalRepeat);
        true
    }

    pub fn release_horizontal(&mut self) -> bool {
        self.release(None)
    }

    pub fn release_left(&mut self) -> bool {
        self.release(Some(Direction::Left))
    }

    pub fn release_right(&mut self) -> bool {
        self.release(Some(Direction::Right))
    }

    pub fn soft_drop_start(&mut self) -> bool {
        if !self.running() || self.soft_drop {
            return false;
        }
        self.soft_drop = true;
        self.arm_gravity();
        true
    }

    pub fn soft_drop_end(&mut self) -> bool {
        if !self.soft_drop {
            return false;
        }
        self.soft_drop = false;
        if self.running() {
            self.arm_gravity();
        }
        true
    }

    /// Drop straight to the landing row, score 2 per cell, then lock.
    pub fn hard_drop(&mut self) -> bool {
        if !self.running() {
            return false;
        }
        let Some(mut piece) = self.session.current else {
            return false;
        };

        let target = lowest_valid_y(&self.session.board, &piece);
        let cells = (target - piece.y).max(0) as u32;
        piece.y = target;
        self.session.current = Some(piece);
        self.session.score.add_drop(cells, true);
        debug!(cells, "hard drop");

        self.lock_and_spawn();
        true
    }

    /// Rotate clockwise in place; rejected if the result collides.
    pub fn rotate(&mut self) -> bool {
        if !self.running() {
            return false;
        }
        let Some(piece) = self.session.current else {
            return false;
        };

        let rotated = piece.rotated_cw();
        if collides(&self.session.board, &rotated) {
            debug!(kind = piece.kind.as_str(), "rotation blocked");
            return false;
        }
        self.session.current = Some(rotated);
        self.emit(GameEvent::Rotated);
        true
    }

    fn try_shift(&mut self, dx: i8) -> bool {
        let Some(piece) = self.session.current else {
            return false;
        };
        let moved = piece.shifted(dx, 0);
        if collides(&self.session.board, &moved) {
            trace!(dx, "shift blocked");
            return false;
        }
        self.session.current = Some(moved);
        true
    }

    // ---- timers ----------------------------------------------------------

    /// Handle a timer fire. Fires from replaced or cancelled timers are ignored.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if !self.timers.is_live(handle) {
            trace!(kind = ?handle.kind, id = handle.id, "stale timer fire ignored");
            return false;
        }
        match handle.kind {
            TimerKind::Gravity => self.gravity_tick(),
            TimerKind::HorizontalRepeat => self.repeat_tick(),
        }
    }

    /// One row of descent; lock and spawn when the piece cannot fall further.
    fn gravity_tick(&mut self) -> bool {
        if !self.running() {
            return false;
        }
        let Some(piece) = self.session.current else {
            return false;
        };

        let below = piece.shifted(0, 1);
        if collides(&self.session.board, &below) {
            self.lock_and_spawn();
        } else {
            self.session.current = Some(below);
            if self.soft_drop {
                self.session.score.add_drop(1, false);
            }
        }
        true
    }

    fn repeat_tick(&mut self) -> bool {
        if !self.running() {
            return false;
        }
        match self.held {
            Some(dir) => self.try_shift(dir.dx()),
            None => false,
        }
    }

    fn lock_and_spawn(&mut self) {
        let Some(piece) = self.session.current else {
            return;
        };
        place(&mut self.session.board, &piece);
        self.emit(GameEvent::Locked);

        let cleared = self.session.board.clear_full_rows().len() as u32;
        if cleared > 0 {
            let award = self.session.score.add_line_clear(cleared);
            debug!(rows = cleared, points = award.points, "lines cleared");
            self.emit(GameEvent::LinesCleared {
                count: cleared,
                points: award.points,
            });

            if let Some(level) = award.new_level {
                info!(level, "level up");
                self.emit(GameEvent::LevelUp { level });
                self.arm_gravity();
            }
        }

        if !self.session.spawn_next() {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.suspend_timers();
        self.soft_drop = false;
        self.held = None;
        self.set_phase(Phase::GameOver);
        let score = self.score();
        info!(score, lines = self.lines(), level = self.level(), "game over");
        self.emit(GameEvent::GameOver { score });
    }

    // ---- dispatch --------------------------------------------------------

    /// Apply a command. Returns whether anything changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Restart => self.restart(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::TogglePause => self.toggle_pause(),
            Command::Quit => self.quit(),
            Command::RequestQuit => self.request_quit(),
            Command::CancelQuit => self.cancel_quit(),
            Command::ConfirmQuit => self.confirm_quit(),
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::ReleaseHorizontal => self.release_horizontal(),
            Command::ReleaseLeft => self.release_left(),
            Command::ReleaseRight => self.release_right(),
            Command::SoftDropStart => self.soft_drop_start(),
            Command::SoftDropEnd => self.soft_drop_end(),
            Command::HardDrop => self.hard_drop(),
            Command::Rotate => self.rotate(),
        }
    }

    // ---- snapshot --------------------------------------------------------

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.session.board.write_grid(&mut out.board);
        out.current = self.session.current;
        out.ghost_y = if self.config.ghost_piece {
            self.ghost_y()
        } else {
            None
        };
        out.next = self.session.next;
        out.score = self.score();
        out.level = self.level();
        out.lines = self.lines();
        out.phase = self.phase;
        out.quit_pending = self.quit_pending;
        out.soft_drop = self.soft_drop;
        out.held = self.held;
        out.gravity_interval = self.gravity_interval();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl GameMachine<ManualScheduler> {
    /// Machine on a virtual clock.
    pub fn manual(config: GameConfig) -> Self {
        Self::new(ManualScheduler::new(), config)
    }

    /// Advance virtual time by `dt`, handling every timer fire that falls inside it
    /// in chronological order. Returns the number of fires delivered.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let until = self.scheduler.now() + dt;
        let mut fired = 0;
        while let Some(handle) = self.scheduler.pop_due(until) {
            self.on_timer(handle);
            fired += 1;
        }
        self.scheduler.settle(until);
        fired
    }
}
