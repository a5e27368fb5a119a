//! JSON-lines log of cue events.
//!
//! One object per line: `{"tMs":1234,"event":{"type":"linesCleared","count":2,"points":100}}`.
//! `tMs` counts milliseconds since the log was opened.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::types::GameEvent;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogLine<'a> {
    t_ms: u64,
    event: &'a GameEvent,
}

pub struct EventLog<W: Write> {
    out: W,
    opened: Instant,
    written: u64,
}

impl EventLog<BufWriter<File>> {
    /// Append to `path`, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening event log {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            opened: Instant::now(),
            written: 0,
        }
    }

    pub fn record(&mut self, event: &GameEvent) -> Result<()> {
        let line = LogLine {
            t_ms: self.opened.elapsed().as_millis() as u64,
            event,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Record a batch and flush once.
    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) -> Result<()> {
        for event in events {
            self.record(event)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Number of events written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
