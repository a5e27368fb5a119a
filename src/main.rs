//! Terminal runner (default binary).
//!
//! Three pieces cooperate:
//! - the game driver task (jafris-runtime) owns the state machine and its timers
//! - an input thread blocks on crossterm events and sends commands to the driver
//! - the main task renders each new snapshot into a framebuffer
//!
//! Logging goes to the file named by `JAFRIS_LOG_PATH` (the terminal is in raw
//! mode); `JAFRIS_LOG` sets the filter.

use std::fs::File;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use jafris::core::{GameConfig, GameSnapshot};
use jafris::input::{should_exit, InputContext, InputHandler};
use jafris::runtime::{spawn_game, GameHandle};
use jafris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use jafris::types::Command;

/// Longest the input thread blocks before checking held-key timeouts.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Redraw at least this often so terminal resizes are picked up.
const IDLE_REDRAW: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    init_logging()?;
    let config = GameConfig::from_env()?;
    let rt = Runtime::new()?;

    let mut term = TerminalRenderer::new();
    let release_events = term.enter()?;

    let result = rt.block_on(run(&mut term, config, release_events));

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        error!("{:#}", err);
    }
    result
}

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("JAFRIS_LOG_PATH") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", path.to_string_lossy()))?;
    let filter = EnvFilter::try_from_env("JAFRIS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();
    Ok(())
}

async fn run(term: &mut TerminalRenderer, config: GameConfig, release_events: bool) -> Result<()> {
    info!(?config, release_events, "starting");
    let GameHandle {
        commands,
        mut snapshots,
        task,
    } = spawn_game(config)?;

    let input_snapshots = snapshots.clone();
    thread::spawn(move || {
        if let Err(err) = input_loop(commands, input_snapshots, release_events) {
            error!("input thread failed: {:#}", err);
        }
    });

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    loop {
        let snap = *snapshots.borrow_and_update();
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::time::sleep(IDLE_REDRAW) => {}
        }
    }

    let last = task.await.context("game driver panicked")??;
    info!(score = last.score, level = last.level, lines = last.lines, "exiting");
    Ok(())
}

/// Read terminal events until an exit key; dropping `commands` stops the driver.
fn input_loop(
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<GameSnapshot>,
    release_events: bool,
) -> Result<()> {
    let mut handler = InputHandler::new(release_events);

    loop {
        let timeout = handler
            .next_expiry(Instant::now())
            .map_or(INPUT_POLL, |d| d.min(INPUT_POLL));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                let ctx = {
                    let snap = snapshots.borrow();
                    InputContext::new(snap.phase, snap.quit_pending)
                };
                if should_exit(key, ctx) {
                    return Ok(());
                }
                if let Some(cmd) = handler.handle_key(key, ctx, Instant::now()) {
                    if commands.send(cmd).is_err() {
                        return Ok(());
                    }
                }
            }
        }

        for cmd in handler.expire(Instant::now()) {
            if commands.send(cmd).is_err() {
                return Ok(());
            }
        }
    }
}
