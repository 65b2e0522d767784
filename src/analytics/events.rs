//! Analytics event log — one JSON object per line.
//!
//! Records user-facing outcomes (waitlist submissions, view failures,
//! access attempts) for later inspection. Every write is best-effort: a
//! failing sink never changes what the user sees.
//!
//! Log file: `~/.heliox/events.jsonl`

use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// A single analytics event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub timestamp: String,
    /// Event name, e.g. `"waitlist_submitted"`.
    pub event: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl AnalyticsEvent {
    pub fn new(event: &str, properties: Value) -> Self {
        let properties = match properties {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Self {
            timestamp: Utc::now().to_rfc3339(),
            event: event.to_string(),
            properties,
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Destination for analytics events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &AnalyticsEvent);

    /// Convenience: build and emit an event.
    fn track(&self, event: &str, properties: Value) {
        self.emit(&AnalyticsEvent::new(event, properties));
    }
}

/// Appends events to a JSONL file.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: Option<PathBuf>,
}

impl JsonlSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Sink at `~/.heliox/events.jsonl`, or a no-op when disabled.
    pub fn from_config(enabled: bool) -> Self {
        let path = if enabled { events_log_path() } else { None };
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    fn append(&self, event: &AnalyticsEvent) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }
}

impl EventSink for JsonlSink {
    fn emit(&self, event: &AnalyticsEvent) {
        let _ = self.append(event);
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.event).collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &AnalyticsEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Return the path to the events log file.
pub fn events_log_path() -> Option<PathBuf> {
    crate::config::state_dir().map(|dir| dir.join("events.jsonl"))
}
