//! Async driver: one task owns the machine and feeds it commands and timer fires.
//!
//! The driver `select!`s over the command channel and the scheduler's fire channel.
//! After every input it publishes a fresh snapshot on a `watch` channel and hands
//! queued cue events to the event log and an optional subscriber. It stops when
//! every command sender has been dropped.

use std::fs::File;
use std::io::BufWriter;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::{GameConfig, GameMachine, GameSnapshot};
use crate::event_log::EventLog;
use crate::scheduler::{TimerFires, TokioScheduler};
use crate::types::{Command, GameEvent};

pub struct Driver {
    machine: GameMachine<TokioScheduler>,
    fires: TimerFires,
    snapshots: watch::Sender<GameSnapshot>,
    log: Option<EventLog<BufWriter<File>>>,
    events: Option<mpsc::UnboundedSender<GameEvent>>,
}

impl Driver {
    /// Wrap a machine and the fire channel of its scheduler.
    pub fn new(machine: GameMachine<TokioScheduler>, fires: TimerFires) -> Self {
        let (snapshots, _) = watch::channel(machine.snapshot());
        Self {
            machine,
            fires,
            snapshots,
            log: None,
            events: None,
        }
    }

    pub fn with_event_log(mut self, log: EventLog<BufWriter<File>>) -> Self {
        self.log = Some(log);
        self
    }

    /// Forward every cue event to `tx` as well.
    pub fn with_event_sink(mut self, tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn machine(&self) -> &GameMachine<TokioScheduler> {
        &self.machine
    }

    /// Run until the command channel closes; returns the final snapshot.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> Result<GameSnapshot> {
        info!("driver started");
        loop {
            tokio::select! {
                biased;
                cmd = commands.recv() => {
                    let Some(cmd) = cmd else { break };
                    let changed = self.machine.apply(cmd);
                    debug!(command = cmd.as_str(), changed, "command");
                    if !changed {
                        continue;
                    }
                }
                Some(handle) = self.fires.recv() => {
                    if !self.machine.on_timer(handle) {
                        continue;
                    }
                }
            }
            self.dispatch_events()?;
            self.snapshots.send_replace(self.machine.snapshot());
        }
        info!(score = self.machine.score(), "driver stopped");
        Ok(self.machine.snapshot())
    }

    fn dispatch_events(&mut self) -> Result<()> {
        let events = self.machine.drain_events();
        if events.is_empty() {
            return Ok(());
        }
        if let Some(log) = &mut self.log {
            log.record_all(&events)?;
        }
        let subscriber_gone = match &self.events {
            Some(tx) => events.iter().any(|event| tx.send(*event).is_err()),
            None => false,
        };
        if subscriber_gone {
            warn!("event subscriber dropped");
            self.events = None;
        }
        Ok(())
    }
}

/// A driver running on its own task.
pub struct GameHandle {
    pub commands: mpsc::UnboundedSender<Command>,
    pub snapshots: watch::Receiver<GameSnapshot>,
    pub task: JoinHandle<Result<GameSnapshot>>,
}

/// Build a machine from `config` on the current runtime and spawn its driver.
///
/// Opens the configured event log, if any.
pub fn spawn_game(config: GameConfig) -> Result<GameHandle> {
    let (scheduler, fires) = TokioScheduler::current()?;
    let log = match &config.event_log {
        Some(path) => Some(EventLog::open(path)?),
        None => None,
    };
    let machine = GameMachine::new(scheduler, config);

    let mut driver = Driver::new(machine, fires);
    if let Some(log) = log {
        driver = driver.with_event_log(log);
    }
    let snapshots = driver.subscribe();
    let (commands, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(driver.run(rx));

    Ok(GameHandle {
        commands,
        snapshots,
        task,
    })
}
