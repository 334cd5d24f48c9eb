//! Generation orchestrator

use super::types::{IngestReport, IngestState};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::schema::TosserSchema;
use crate::source::Source;
use crate::traverse::ROOT_SENTINEL;
use futures::StreamExt;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};

/// Drives a schema session from a source
///
/// Documents are pulled one at a time and each is fully folded into the
/// schema before the next is requested. A failed run leaves the schema
/// generating with the documents processed so far.
#[derive(Debug, Default)]
pub struct Ingest {
    state: IngestState,
    report: IngestReport,
}

impl Ingest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> IngestState {
        self.state
    }

    /// Report of the last (or current) run
    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    /// Run a fresh session: `begin`, contribute every document, `end`
    pub async fn generate(
        &mut self,
        schema: &mut TosserSchema,
        source: &dyn Source,
    ) -> Result<IngestReport> {
        schema.begin()?;
        self.run(schema, source).await
    }

    /// Keep widening an existing (typically reloaded) schema
    pub async fn resume(
        &mut self,
        schema: &mut TosserSchema,
        source: &dyn Source,
    ) -> Result<IngestReport> {
        schema.resume()?;
        self.run(schema, source).await
    }

    async fn run(&mut self, schema: &mut TosserSchema, source: &dyn Source) -> Result<IngestReport> {
        let span = info_span!("ingest", schema = %schema.name(), driver = source.driver());
        async {
            let start = Instant::now();
            self.report = IngestReport::new();
            info!("Starting schema generation");

            self.transition(IngestState::Reading);
            let mut documents = source.documents().await?;

            while let Some(document) = documents.next().await {
                let document = document?;
                self.transition(IngestState::Generating);
                contribute(schema, &document)?;
                self.report.add_document();
                self.transition(IngestState::Reading);
            }

            schema.end()?;
            self.transition(IngestState::Done);

            self.report.tables = schema.tables().count();
            self.report.columns = schema.column_count();
            self.report.set_duration(start.elapsed().as_millis() as u64);
            info!(
                documents = self.report.documents,
                tables = self.report.tables,
                columns = self.report.columns,
                duration_ms = self.report.duration_ms,
                "Schema generation complete"
            );
            Ok::<_, Error>(self.report.clone())
        }
        .instrument(span)
        .await
    }

    fn transition(&mut self, next: IngestState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "Ingest state");
            self.state = next;
        }
    }
}

/// Reject root-level arrays before any traversal
fn contribute(schema: &mut TosserSchema, document: &Document) -> Result<()> {
    if document.is_root_array() {
        let origin = document.source_name().unwrap_or("document");
        return Err(Error::unsupported(
            ROOT_SENTINEL,
            format!("{origin} has a root-level array"),
        ));
    }
    schema.contribute(document)
}
