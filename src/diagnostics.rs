//! Injected diagnostics for silent protocol rejections.
//!
//! Rejections never surface as errors, so the only way to observe them is
//! through the diagnostics sink a node is built with. The default sink
//! discards everything; tests inject [`MemorySink`] and assert on the
//! recorded lines. There is no global logger.

use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// Debug configuration carried by each node.
///
/// Set at build time, read-only afterwards. When `enabled` is false the
/// node emits nothing, whatever sink it holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugConfig {
    /// Master switch for all diagnostic output.
    pub enabled: bool,
    /// Identifier routing output to a display channel (an overlay slot,
    /// a log stream) chosen by the integrator.
    pub channel_key: i8,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel_key: 0,
        }
    }
}

/// One diagnostic line.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagnosticRecord {
    /// Channel key from the emitting node's [`DebugConfig`].
    pub channel_key: i8,
    /// Human-readable text naming the entity and the outcome.
    pub message: String,
    /// When the line was emitted.
    pub at: DateTime<Utc>,
}

impl DiagnosticRecord {
    /// Create a record stamped with the current time.
    pub fn now(channel_key: i8, message: impl Into<String>) -> Self {
        Self {
            channel_key,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Destination for diagnostic lines.
///
/// Implementations must tolerate being shared across nodes.
pub trait DiagnosticsSink: Send + Sync {
    /// Accept one line. Must not panic; dropping the line is acceptable.
    fn emit(&self, record: DiagnosticRecord);
}

/// Sink that discards everything. The default for built nodes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn emit(&self, _record: DiagnosticRecord) {}
}

/// Sink that records every line in memory, for test assertions.
///
/// # Example
///
/// ```rust
/// use replistate::diagnostics::{DiagnosticRecord, DiagnosticsSink, MemorySink};
///
/// let sink = MemorySink::new();
/// sink.emit(DiagnosticRecord::now(3, "could not switch state"));
///
/// let records = sink.records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].channel_key, 3);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Number of recorded lines.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

impl DiagnosticsSink for MemorySink {
    fn emit(&self, record: DiagnosticRecord) {
        self.records.lock().unwrap().push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_preserves_emission_order() {
        let sink = MemorySink::new();
        sink.emit(DiagnosticRecord::now(1, "first"));
        sink.emit(DiagnosticRecord::now(1, "second"));

        let records = sink.records();
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].message, "second");
    }

    #[test]
    fn memory_sink_snapshot_is_independent() {
        let sink = MemorySink::new();
        sink.emit(DiagnosticRecord::now(0, "only"));

        let snapshot = sink.records();
        sink.emit(DiagnosticRecord::now(0, "later"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn noop_sink_discards_records() {
        let sink = NoopSink;
        sink.emit(DiagnosticRecord::now(7, "dropped"));
    }

    #[test]
    fn debug_config_defaults_to_disabled() {
        let config = DebugConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.channel_key, 0);
    }
}
