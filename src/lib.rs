pub mod core;
pub mod deck;
pub mod lookup;
pub mod ocr;
pub mod persistence;
pub mod segmentation;
pub mod service;
pub mod settings;
pub mod store;
pub mod testing;

pub use crate::{
    core::{
        pipeline::{
            EnrichmentTools,
            ImageEnrichment,
        },
        Candidate,
        DictionaryHit,
        ExamplePair,
        Lookup,
        PartOfSpeech,
        SukiyakiError,
        Token,
        VocabularyRecord,
    },
    deck::DeckExporter,
    lookup::{
        DictionarySource,
        ExampleSource,
        JishoClient,
        RetryPolicy,
        TatoebaClient,
    },
    ocr::TextRecognizer,
    segmentation::{
        Analyzer,
        DictType,
        VibratoAnalyzer,
    },
    service::{
        CommitSummary,
        VocabService,
    },
    settings::Settings,
    store::VocabularyStore,
};
