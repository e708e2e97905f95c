//! Document sinks and the best-effort bulk insert.
//!
//! The sink stands in for a document collection: the production
//! implementation appends JSON lines to a file, and tests use the
//! in-memory variant with an injectable failure rule.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use osmw_model::OutputRecord;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("write document: {0}")]
    Io(#[from] std::io::Error),
    #[error("document rejected: {0}")]
    Rejected(String),
}

/// Destination for normalized documents, inserted one at a time.
pub trait DocumentSink {
    fn insert(&mut self, record: &OutputRecord) -> Result<(), SinkError>;
}

/// File-backed sink: one JSON document per line.
pub struct JsonLinesSink {
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Flush buffered lines; called once after the batch.
    pub fn finish(mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl DocumentSink for JsonLinesSink {
    fn insert(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

type FailureRule = Box<dyn Fn(&OutputRecord) -> Option<String>>;

/// In-memory sink for tests, with an optional per-record failure rule.
#[derive(Default)]
pub struct MemorySink {
    pub inserted: Vec<OutputRecord>,
    failure_rule: Option<FailureRule>,
}

impl MemorySink {
    pub fn failing_when(rule: impl Fn(&OutputRecord) -> Option<String> + 'static) -> Self {
        Self {
            inserted: Vec::new(),
            failure_rule: Some(Box::new(rule)),
        }
    }
}

impl DocumentSink for MemorySink {
    fn insert(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        if let Some(rule) = &self.failure_rule
            && let Some(reason) = rule(record)
        {
            return Err(SinkError::Rejected(reason));
        }
        self.inserted.push(record.clone());
        Ok(())
    }
}

/// One record the sink refused, kept as its literal document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertFailure {
    pub document: String,
    pub reason: String,
}

/// Result of a bulk insert: how many landed, and what did not.
#[derive(Debug, Default)]
pub struct InsertOutcome {
    pub inserted: usize,
    pub failures: Vec<InsertFailure>,
}

/// Insert every record, one attempt each. A failed record is captured and
/// the batch continues; the batch itself never aborts.
pub fn bulk_insert(sink: &mut dyn DocumentSink, records: &[OutputRecord]) -> InsertOutcome {
    let mut outcome = InsertOutcome::default();
    for record in records {
        match sink.insert(record) {
            Ok(()) => outcome.inserted += 1,
            Err(error) => {
                let document = serde_json::to_string(record)
                    .unwrap_or_else(|_| format!("{record:?}"));
                warn!(%error, "document insert failed");
                outcome.failures.push(InsertFailure {
                    document,
                    reason: error.to_string(),
                });
            }
        }
    }
    debug!(
        inserted = outcome.inserted,
        failed = outcome.failures.len(),
        "bulk insert complete"
    );
    outcome
}
