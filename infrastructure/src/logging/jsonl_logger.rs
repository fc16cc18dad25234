//! JSONL transcript writer, one file per debate session.
//!
//! Each [`TranscriptEvent`] is serialized as a single JSON line with a
//! `type` field and `timestamp`, appended to
//! `<dir>/<session id>.transcript.jsonl` via a buffered writer. The file is
//! closed once the session's final event has been written.

use battle_application::{TranscriptEvent, TranscriptLogger};
use battle_domain::SessionId;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// JSONL transcript logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<HashMap<SessionId, BufWriter<File>>>`. Flushes on `Drop`.
pub struct JsonlTranscriptLogger {
    dir: PathBuf,
    writers: Mutex<HashMap<SessionId, BufWriter<File>>>,
}

impl JsonlTranscriptLogger {
    /// Create a logger writing into `dir`.
    ///
    /// Creates the directory if it doesn't exist. Returns `None` if it
    /// cannot be created.
    pub fn new(dir: impl AsRef<Path>) -> Option<Self> {
        let dir = dir.as_ref();
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!(
                "Could not create transcript directory {}: {}",
                dir.display(),
                e
            );
            return None;
        }
        Some(Self {
            dir: dir.to_path_buf(),
            writers: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Transcript file for one session
    pub fn path_for(&self, session_id: &SessionId) -> PathBuf {
        self.dir
            .join(format!("{}.transcript.jsonl", file_stem(session_id.as_str())))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, BufWriter<File>>> {
        self.writers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn open(&self, session_id: &SessionId) -> Option<BufWriter<File>> {
        let path = self.path_for(session_id);
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(BufWriter::new(file)),
            Err(e) => {
                warn!(
                    "Could not open transcript file {}: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }
}

/// Client-chosen ids may contain path separators; keep only safe characters.
fn file_stem(id: &str) -> String {
    let stem: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "session".to_string()
    } else {
        stem
    }
}

fn to_record(event: TranscriptEvent, session_id: &SessionId) -> serde_json::Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    // Merge payload with type + timestamp
    if let serde_json::Value::Object(mut map) = event.payload {
        map.insert(
            "type".to_string(),
            serde_json::Value::String(event.event_type.to_string()),
        );
        map.insert(
            "session_id".to_string(),
            serde_json::Value::String(session_id.to_string()),
        );
        map.insert(
            "timestamp".to_string(),
            serde_json::Value::String(timestamp),
        );
        serde_json::Value::Object(map)
    } else {
        serde_json::json!({
            "type": event.event_type,
            "session_id": session_id.as_str(),
            "timestamp": timestamp,
            "data": event.payload,
        })
    }
}

impl TranscriptLogger for JsonlTranscriptLogger {
    fn log(&self, session_id: &SessionId, event: TranscriptEvent) {
        let is_final = event.is_final();
        let Ok(line) = serde_json::to_string(&to_record(event, session_id)) else {
            return;
        };

        let mut writers = self.lock();
        if !writers.contains_key(session_id) {
            let Some(writer) = self.open(session_id) else {
                return;
            };
            writers.insert(session_id.clone(), writer);
        }
        if let Some(writer) = writers.get_mut(session_id) {
            let _ = writeln!(writer, "{}", line);
            // JSONL is append-only; flush every line
            let _ = writer.flush();
        }
        if is_final {
            writers.remove(session_id);
        }
    }
}

impl Drop for JsonlTranscriptLogger {
    fn drop(&mut self) {
        for writer in self.lock().values_mut() {
            let _ = writer.flush();
        }
    }
}
