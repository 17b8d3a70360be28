//! JSON-lines history of dialogue session effects.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{
    log::{info, warn},
    prelude::*,
};
use serde::Serialize;

use crate::core::plugin::SimulationClock;

use super::{events::DialogueSessionEvent, session::SessionEffect};

const DEFAULT_DIALOGUE_TELEMETRY_LOG_PATH: &str = "logs/dialogue_history.jsonl";
const DEFAULT_MAX_PENDING_RECORDS: usize = 512;

/// Single telemetry entry.
#[derive(Debug, Clone)]
pub struct DialogueTelemetryRecord {
    pub occurred_at_seconds: f64,
    pub effect: SessionEffect,
}

/// System that queues every session effect for the on-disk log.
pub fn record_dialogue_telemetry(
    clock: Res<SimulationClock>,
    mut session_events: MessageReader<DialogueSessionEvent>,
    mut log: ResMut<DialogueTelemetryLog>,
) {
    let now = clock.elapsed().as_secs_f64();
    for event in session_events.read() {
        log.push(DialogueTelemetryRecord {
            occurred_at_seconds: now,
            effect: event.effect.clone(),
        });
    }
}

/// Pending records written to disk for offline inspection. The backlog is
/// capped so a broken log path cannot grow it without bound.
#[derive(Resource, Debug)]
pub struct DialogueTelemetryLog {
    output_path: PathBuf,
    pending: VecDeque<DialogueTelemetryRecord>,
    max_pending: usize,
    dropped: u64,
    failing: bool,
}

impl DialogueTelemetryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, DEFAULT_MAX_PENDING_RECORDS)
    }

    pub fn with_capacity(path: impl Into<PathBuf>, max_pending: usize) -> Self {
        Self {
            output_path: path.into(),
            pending: VecDeque::new(),
            max_pending: max_pending.max(1),
            dropped: 0,
            failing: false,
        }
    }

    /// Queues a record, evicting the oldest one once the backlog is full.
    pub fn push(&mut self, record: DialogueTelemetryRecord) {
        if self.pending.len() >= self.max_pending {
            self.pending.pop_front();
            self.dropped += 1;
        }
        self.pending.push_back(record);
    }

    fn ensure_directory(&self) -> std::io::Result<()> {
        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Appends every pending record. On error the backlog is left intact for
    /// the next attempt.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut buffer = Vec::new();
        for record in &self.pending {
            let serialisable = SerializableDialogueTelemetryRecord::from(record);
            serde_json::to_writer(&mut buffer, &serialisable)?;
            buffer.push(b'\n');
        }

        self.ensure_directory()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;
        file.write_all(&buffer)?;
        file.flush()?;

        self.pending.clear();
        Ok(())
    }

    /// Returns true only for the first failure of a streak.
    fn record_failure(&mut self) -> bool {
        !std::mem::replace(&mut self.failing, true)
    }

    /// Returns true when a failure streak just ended.
    fn record_recovery(&mut self) -> bool {
        std::mem::replace(&mut self.failing, false)
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for DialogueTelemetryLog {
    fn default() -> Self {
        Self::new(DEFAULT_DIALOGUE_TELEMETRY_LOG_PATH)
    }
}

/// Flushes pending telemetry log entries to disk. Warns once per failure
/// streak and logs when writing succeeds again.
pub fn flush_dialogue_telemetry_log(mut log: ResMut<DialogueTelemetryLog>) {
    match log.flush() {
        Ok(()) => {
            if log.record_recovery() {
                info!(
                    "Dialogue telemetry is writing to {:?} again ({} records dropped)",
                    log.path(),
                    log.dropped()
                );
            }
        }
        Err(err) => {
            if log.record_failure() {
                warn!(
                    "Failed to persist dialogue telemetry to {:?}: {}. Keeping the latest {} records.",
                    log.path(),
                    err,
                    log.max_pending
                );
            }
        }
    }
}

#[derive(Serialize)]
struct SerializableDialogueTelemetryRecord<'a> {
    occurred_at_seconds: f64,
    event: SerializableSessionEffect<'a>,
}

impl<'a> From<&'a DialogueTelemetryRecord> for SerializableDialogueTelemetryRecord<'a> {
    fn from(value: &'a DialogueTelemetryRecord) -> Self {
        Self {
            occurred_at_seconds: value.occurred_at_seconds,
            event: SerializableSessionEffect::from(&value.effect),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
enum SerializableSessionEffect<'a> {
    Opened {
        target: &'a str,
    },
    Dispatched {
        request_id: u64,
        target: &'a str,
        message: &'a str,
    },
    Replied {
        request_id: u64,
        target: &'a str,
        content: &'a str,
    },
    Failed {
        request_id: u64,
        target: &'a str,
        error_kind: &'static str,
        error: String,
    },
    Discarded {
        request_id: u64,
    },
    Closed {
        target: &'a str,
        abandoned_request_id: Option<u64>,
    },
}

impl<'a> From<&'a SessionEffect> for SerializableSessionEffect<'a> {
    fn from(value: &'a SessionEffect) -> Self {
        match value {
            SessionEffect::Opened { target } => Self::Opened {
                target: target.as_str(),
            },
            SessionEffect::Dispatched(outgoing) => Self::Dispatched {
                request_id: outgoing.token.value(),
                target: outgoing.target.as_str(),
                message: &outgoing.request.message,
            },
            SessionEffect::Resolved {
                token,
                target,
                outcome: Ok(content),
            } => Self::Replied {
                request_id: token.value(),
                target: target.as_str(),
                content,
            },
            SessionEffect::Resolved {
                token,
                target,
                outcome: Err(err),
            } => Self::Failed {
                request_id: token.value(),
                target: target.as_str(),
                error_kind: err.kind_label(),
                error: err.to_string(),
            },
            SessionEffect::Discarded { token } => Self::Discarded {
                request_id: token.value(),
            },
            SessionEffect::Closed { target, abandoned } => Self::Closed {
                target: target.as_str(),
                abandoned_request_id: abandoned.map(|token| token.value()),
            },
        }
    }
}
