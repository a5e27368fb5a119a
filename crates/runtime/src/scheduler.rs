//! Tokio-backed scheduler.
//!
//! Every armed timer is a spawned task ticking a `tokio::time::interval` and
//! sending its handle into an unbounded channel. Cancelling aborts the task. A fire
//! already queued when its timer is cancelled still arrives; the machine drops it
//! as stale.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::core::{Scheduler, TimerHandle};
use crate::types::TimerKind;

pub type TimerFires = mpsc::UnboundedReceiver<TimerHandle>;

pub struct TokioScheduler {
    runtime: Handle,
    fire_tx: mpsc::UnboundedSender<TimerHandle>,
    tasks: HashMap<u64, JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    /// Scheduler spawning onto `runtime`, plus the receiving end for its fires.
    pub fn new(runtime: Handle) -> (Self, TimerFires) {
        let (fire_tx, fire_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            runtime,
            fire_tx,
            tasks: HashMap::new(),
            next_id: 0,
        };
        (scheduler, fire_rx)
    }

    /// Scheduler on the runtime the caller is running in.
    pub fn current() -> Result<(Self, TimerFires)> {
        let runtime = Handle::try_current().context("no tokio runtime for the scheduler")?;
        Ok(Self::new(runtime))
    }

    /// Number of timer tasks that have not been cancelled.
    pub fn live_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&mut self, kind: TimerKind, every: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle {
            kind,
            id: self.next_id,
        };
        let every = every.max(Duration::from_millis(1));
        let tx = self.fire_tx.clone();

        let task = self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(handle.id, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle.id) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
