//! JSONL event log - one serialized `EngineEvent` per line.

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::core::EngineEvent;

/// Environment variable naming a log file when `--event-log` is not given
pub const EVENT_LOG_ENV: &str = "TETR_EVENT_LOG_PATH";

/// Log path from [`EVENT_LOG_ENV`]; blank values count as unset
pub fn event_log_path_from_env() -> Option<PathBuf> {
    env::var(EVENT_LOG_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) })
}

pub struct EventLog<W: Write> {
    out: W,
    buf: Vec<u8>,
    written: usize,
}

impl EventLog<BufWriter<File>> {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| anyhow!("event log: open {} failed: {}", path.display(), e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(256),
            written: 0,
        }
    }

    pub fn write(&mut self, event: &EngineEvent) -> Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, event)?;
        self.buf.push(b'\n');
        self.out.write_all(&self.buf)?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Number of events written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
