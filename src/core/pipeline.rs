use std::{
    collections::HashSet,
    path::PathBuf,
    sync::Arc,
    time::Instant,
};

use futures::future;

use crate::{
    core::{
        filter::filter_candidates,
        Candidate,
        DictionaryHit,
        ExamplePair,
        Lookup,
        SukiyakiError,
        VocabularyRecord,
    },
    lookup::{
        DictionarySource,
        ExampleSource,
    },
    ocr::TextRecognizer,
    segmentation::Analyzer,
};

/// The collaborators one enrichment run needs. The recognizer is optional:
/// text input never touches it, and image input degrades softly without it.
#[derive(Clone)]
pub struct EnrichmentTools {
    pub analyzer: Arc<dyn Analyzer>,
    pub dictionary: Arc<dyn DictionarySource>,
    pub examples: Arc<dyn ExampleSource>,
    pub recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl std::fmt::Debug for EnrichmentTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentTools")
            .field("analyzer", &"Arc<dyn Analyzer>")
            .field("dictionary", &"Arc<dyn DictionarySource>")
            .field("examples", &"Arc<dyn ExampleSource>")
            .field("recognizer", &self.recognizer.is_some())
            .finish()
    }
}

/// What one image contributed: the recognized text and the records mined
/// from it. Failed recognition leaves both empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEnrichment {
    pub text: String,
    pub records: Vec<VocabularyRecord>,
}

pub async fn enrich_text(
    tools: &EnrichmentTools,
    text: &str,
) -> Result<Vec<VocabularyRecord>, SukiyakiError> {
    let mut seen = HashSet::new();
    enrich_block(tools, text, &mut seen).await
}

/// Batch variant with cross-text dedup: a lemma enriched for an earlier text
/// is not enriched again for a later one. A text whose analysis fails
/// contributes an empty batch without aborting the rest.
pub async fn enrich_texts(
    tools: &EnrichmentTools,
    texts: &[String],
) -> Vec<Vec<VocabularyRecord>> {
    let mut seen = HashSet::new();
    let mut batches = Vec::with_capacity(texts.len());

    for text in texts {
        match enrich_block(tools, text, &mut seen).await {
            Ok(records) => batches.push(records),
            Err(e) => {
                eprintln!("Failed to enrich text: {}", e);
                batches.push(Vec::new());
            }
        }
    }

    batches
}

/// Image variant: recognize, then enrich the recognized text. Recognition
/// failure on one image (or a missing recognizer) contributes an empty entry
/// and the batch moves on.
pub async fn enrich_images(
    tools: &EnrichmentTools,
    paths: &[PathBuf],
) -> Vec<ImageEnrichment> {
    let mut seen = HashSet::new();
    let mut enrichments = Vec::with_capacity(paths.len());

    for path in paths {
        let text = match &tools.recognizer {
            Some(recognizer) => match recognizer.recognize(path) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Text recognition failed for {}: {}", path.display(), e);
                    String::new()
                }
            },
            None => {
                eprintln!("No text recognizer configured, skipping {}", path.display());
                String::new()
            }
        };

        let records = if text.trim().is_empty() {
            Vec::new()
        } else {
            match enrich_block(tools, &text, &mut seen).await {
                Ok(records) => records,
                Err(e) => {
                    eprintln!("Failed to enrich text from {}: {}", path.display(), e);
                    Vec::new()
                }
            }
        };

        enrichments.push(ImageEnrichment { text, records });
    }

    enrichments
}

async fn enrich_block(
    tools: &EnrichmentTools,
    text: &str,
    seen: &mut HashSet<String>,
) -> Result<Vec<VocabularyRecord>, SukiyakiError> {
    let start = Instant::now();

    let tokens = tools.analyzer.tokenize(text)?;
    let candidates = filter_candidates(tokens);
    println!("Extracted {} candidates", candidates.len());

    let mut records = Vec::new();
    for candidate in candidates {
        if !seen.insert(candidate.lemma.clone()) {
            continue;
        }

        let raw_lemma = candidate.lemma.clone();
        let record = enrich_candidate(tools, candidate).await;

        // The dictionary may correct the lemma to its headword. Re-check so
        // two raw lemmas corrected to one headword are emitted once.
        if record.lemma != raw_lemma && !seen.insert(record.lemma.clone()) {
            continue;
        }

        records.push(record);
    }

    println!("Enriched {} records ({:.1}s)", records.len(), start.elapsed().as_secs_f32());
    Ok(records)
}

/// Both lookups run together and fail independently. The worst case is an
/// under-enriched record, never a dropped candidate.
async fn enrich_candidate(tools: &EnrichmentTools, candidate: Candidate) -> VocabularyRecord {
    let (dictionary, example) = future::join(
        tools.dictionary.lookup(&candidate.lemma),
        tools.examples.lookup(&candidate.lemma),
    )
    .await;

    merge_candidate(candidate, dictionary, example)
}

fn merge_candidate(
    candidate: Candidate,
    dictionary: Lookup<DictionaryHit>,
    example: Lookup<ExamplePair>,
) -> VocabularyRecord {
    let Candidate { lemma, reading } = candidate;

    let (lemma, reading, meaning) = match dictionary {
        Lookup::Found(hit) => {
            (hit.word.unwrap_or(lemma), hit.reading.unwrap_or(reading), hit.meaning)
        }
        Lookup::Absent | Lookup::TransientError => (lemma, reading, String::new()),
    };

    let (example_source, example_target) = match example {
        Lookup::Found(pair) => (pair.source, pair.target),
        Lookup::Absent | Lookup::TransientError => (String::new(), String::new()),
    };

    VocabularyRecord { lemma, reading, meaning, example_source, example_target }
}
