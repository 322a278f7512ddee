//! Transmission log: the decoded message history and connection status.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::FeedResult;
use crate::message::{decode_message, FeedMessage, MessageCategory};

/// Feed connection indicator. There is no automatic reconnect: once the
/// feed is closed or errored it stays that way until someone sets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Open,
    Error,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Arrival order, starting at 1.
    pub seq: u64,
    pub message: FeedMessage,
}

#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
    status: ConnectionStatus,
    dropped: usize,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        if status != self.status {
            info!(from = ?self.status, to = ?status, "feed status changed");
            self.status = status;
        }
    }

    pub fn push(&mut self, message: FeedMessage) -> &LogEntry {
        let seq = self.entries.len() as u64 + 1;
        debug!(seq, %message, "feed message");
        self.entries.push(LogEntry { seq, message });
        &self.entries[self.entries.len() - 1]
    }

    /// Decode and append one raw payload. Malformed payloads are logged
    /// and dropped; the log carries on.
    pub fn ingest_raw(&mut self, raw: &str) -> Option<&LogEntry> {
        match decode_message(raw) {
            Ok(message) => Some(self.push(message)),
            Err(err) => {
                self.dropped += 1;
                error!(%err, "dropping malformed feed payload");
                None
            }
        }
    }

    /// Read newline-delimited JSON until end of stream. Blank lines are
    /// ignored. Status goes Open while reading, then Closed at end of
    /// stream or Error if the stream fails. Returns messages appended.
    pub fn pump(&mut self, reader: impl BufRead) -> FeedResult<usize> {
        self.set_status(ConnectionStatus::Open);
        let mut appended = 0;
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    self.set_status(ConnectionStatus::Error);
                    return Err(err.into());
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            if self.ingest_raw(&line).is_some() {
                appended += 1;
            }
        }
        self.set_status(ConnectionStatus::Closed);
        Ok(appended)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Payloads dropped as malformed.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn count(&self, category: MessageCategory) -> usize {
        self.entries
            .iter()
            .filter(|e| e.message.category == category)
            .count()
    }
}
