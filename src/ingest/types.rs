//! Ingest types

use std::fmt;

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestState {
    /// No run in progress
    #[default]
    Idle,
    /// Waiting on the source for the next document
    Reading,
    /// Folding a document into the schema
    Generating,
    /// Run finished and the schema session ended
    Done,
}

impl IngestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Reading => "reading",
            Self::Generating => "generating",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for IngestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of an ingest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents contributed
    pub documents: u64,
    /// Tables in the schema after the run
    pub tables: usize,
    /// Columns in the schema after the run
    pub columns: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl IngestReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self) {
        self.documents += 1;
    }

    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents, {} tables, {} columns in {}ms",
            self.documents, self.tables, self.columns, self.duration_ms
        )
    }
}
