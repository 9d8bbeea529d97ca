//! Write-only fragment log.
//!
//! For every scored fragment the engine emits `(text, entropy, perplexity,
//! resonance)`. The engine never reads the log back for weaving decisions;
//! an optional host collaborator may read recent entries to feed them back
//! in as ordinary submissions.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::StoreError;
use text_metrics::Metrics;

/// Unique identifier for fragment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Create a new random record ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One scored fragment as emitted to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentRecord {
    pub id: RecordId,
    pub content: String,
    pub entropy: f64,
    pub perplexity: f64,
    pub resonance: f64,
}

impl FragmentRecord {
    pub fn new(content: impl Into<String>, metrics: Metrics) -> Self {
        Self {
            id: RecordId::new(),
            content: content.into(),
            entropy: metrics.entropy,
            perplexity: metrics.perplexity,
            resonance: metrics.resonance,
        }
    }
}

/// Write-only sink for scored fragments.
pub trait FragmentSink {
    fn record(&mut self, record: &FragmentRecord) -> Result<(), StoreError>;
}

/// In-memory sink; keeps records in insertion order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<FragmentRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[FragmentRecord] {
        &self.records
    }

    /// The most recent `n` fragment texts, newest first. This is the read
    /// surface for the optional feed collaborator, not for the engine.
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.records
            .iter()
            .rev()
            .take(n)
            .map(|r| r.content.clone())
            .collect()
    }
}

impl FragmentSink for MemorySink {
    fn record(&mut self, record: &FragmentRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Append-only JSON-lines sink.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FragmentSink for JsonlSink {
    fn record(&mut self, record: &FragmentRecord) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(StoreError::Write)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}").map_err(StoreError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(content: &str, resonance: f64) -> FragmentRecord {
        FragmentRecord::new(
            content,
            Metrics {
                entropy: 0.0,
                perplexity: 1.0,
                resonance,
            },
        )
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.record(&sample("first", 0.0)).unwrap();
        sink.record(&sample("second", 1.0)).unwrap();

        let contents: Vec<_> = sink.records().iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[test]
    fn test_memory_sink_recent_is_newest_first() {
        let mut sink = MemorySink::new();
        for content in ["a", "b", "c"] {
            sink.record(&sample(content, 0.0)).unwrap();
        }
        assert_eq!(sink.recent(2), vec!["c", "b"]);
    }

    #[test]
    fn test_jsonl_sink_appends_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fragments.jsonl");
        let mut sink = JsonlSink::new(&path);

        sink.record(&sample("line one", 0.5)).unwrap();
        sink.record(&sample("line two", 1.5)).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: FragmentRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.content, "line two");
        assert!((parsed.resonance - 1.5).abs() < 1e-9);
    }
}
