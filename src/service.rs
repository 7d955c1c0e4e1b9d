use std::path::PathBuf;

use crate::{
    core::{
        pipeline::{
            self,
            EnrichmentTools,
            ImageEnrichment,
        },
        SukiyakiError,
        VocabularyRecord,
    },
    deck::DeckExporter,
    store::VocabularyStore,
};

/// The surface the front end talks to: enrich, review, commit, export.
/// Enrichment returns transient records; nothing becomes durable until the
/// caller commits, and committed records may have been edited in between.
pub struct VocabService {
    tools: EnrichmentTools,
    store: VocabularyStore,
    exporter: DeckExporter,
}

/// Outcome of one commit: how many records landed, and which failed with
/// what error. A failure never rolls back earlier records.
#[derive(Debug, Default)]
pub struct CommitSummary {
    pub saved: usize,
    pub failed: Vec<(String, String)>,
}

impl VocabService {
    pub fn new(tools: EnrichmentTools, store: VocabularyStore, exporter: DeckExporter) -> Self {
        VocabService { tools, store, exporter }
    }

    pub async fn enrich_text(&self, text: &str) -> Result<Vec<VocabularyRecord>, SukiyakiError> {
        pipeline::enrich_text(&self.tools, text).await
    }

    pub async fn enrich_texts(&self, texts: &[String]) -> Vec<Vec<VocabularyRecord>> {
        pipeline::enrich_texts(&self.tools, texts).await
    }

    pub async fn enrich_images(&self, paths: &[PathBuf]) -> Vec<ImageEnrichment> {
        pipeline::enrich_images(&self.tools, paths).await
    }

    /// Upserts each record independently. One bad record is reported and
    /// skipped; the rest of the batch still lands.
    pub async fn commit(&self, records: &[VocabularyRecord]) -> CommitSummary {
        let mut summary = CommitSummary::default();

        for record in records {
            match self.store.upsert(record).await {
                Ok(()) => summary.saved += 1,
                Err(e) => {
                    eprintln!("Failed to save {}: {}", record.lemma, e);
                    summary.failed.push((record.lemma.clone(), e.to_string()));
                }
            }
        }

        println!("Committed {} records ({} failed)", summary.saved, summary.failed.len());
        summary
    }

    pub async fn export_deck(&self) -> Result<PathBuf, SukiyakiError> {
        self.exporter.export(&self.store).await
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}
