use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DEFAULT_STATE_FILE: &str = "last_send_time.txt";

/// Below this a stored value is whole seconds rather than milliseconds. As seconds it
/// is the year 5138, as milliseconds it is early 1973.
const SECONDS_THRESHOLD: i64 = 100_000_000_000;

/// Holds the instant of the most recent send attempt.
pub trait TimestampStore: Send + Sync {
    fn load(&self) -> Result<Option<DateTime<Utc>>>;
    fn store(&self, instant: DateTime<Utc>) -> Result<()>;
}

/// Keeps the last send instant in a text file as integer Unix milliseconds.
///
/// Files holding whole Unix seconds, as written by older senders, are still read correctly.
pub struct FileTimestampStore {
    path: PathBuf,
}

impl FileTimestampStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TimestampStore for FileTimestampStore {
    fn load(&self) -> Result<Option<DateTime<Utc>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read {}", self.path.display()))?;

        let contents = contents.trim();
        if contents.is_empty() {
            return Ok(None);
        }

        let value = contents
            .parse::<i64>()
            .with_context(|| format!("Bad timestamp in {}: {:?}", self.path.display(), contents))?;

        let instant = if value.abs() < SECONDS_THRESHOLD {
            DateTime::from_timestamp(value, 0)
        } else {
            DateTime::from_timestamp_millis(value)
        }
        .with_context(|| format!("Timestamp out of range: {}", value))?;

        Ok(Some(instant))
    }

    fn store(&self, instant: DateTime<Utc>) -> Result<()> {
        fs::write(&self.path, instant.timestamp_millis().to_string())
            .with_context(|| format!("Unable to write {}", self.path.display()))
    }
}

#[derive(Default)]
pub struct MemoryTimestampStore {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryTimestampStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_send(instant: DateTime<Utc>) -> Self {
        Self {
            last: Mutex::new(Some(instant)),
        }
    }

    pub fn last_send(&self) -> Option<DateTime<Utc>> {
        *self.last.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TimestampStore for MemoryTimestampStore {
    fn load(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.last_send())
    }

    fn store(&self, instant: DateTime<Utc>) -> Result<()> {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(instant);
        Ok(())
    }
}
