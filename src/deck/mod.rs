use std::{
    fs::File,
    io::Write,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};
use zip::{
    write::SimpleFileOptions,
    ZipWriter,
};

use crate::{
    core::{
        SukiyakiError,
        VocabularyRecord,
    },
    store::VocabularyStore,
};

/// Fixed identifiers so consuming software recognizes repeated exports as
/// the same deck, updated, instead of importing duplicates.
pub const DECK_ID: u64 = 2059400110;
pub const MODEL_ID: u64 = 1607392319;

const CARDS_PER_BANK: usize = 1000;

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckIndex {
    pub format: u8,
    pub revision: String,
    pub deck: DeckInfo,
    pub model: ModelInfo,
    pub card_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckInfo {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: u64,
    pub name: String,
    pub fields: Vec<String>,
    pub templates: Vec<CardTemplate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardTemplate {
    pub name: String,
    pub qfmt: String,
    pub afmt: String,
}

/// One flashcard. The guid is the lemma, the store key, so re-imports
/// update cards in place.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckCard {
    pub guid: String,
    pub fields: Vec<String>,
}

pub struct DeckExporter {
    deck_name: String,
    output_path: PathBuf,
}

impl DeckExporter {
    pub fn new(deck_name: &str, output_path: &Path) -> Self {
        DeckExporter { deck_name: deck_name.to_string(), output_path: output_path.to_path_buf() }
    }

    /// Writes the full store snapshot as one zip: an index.json manifest
    /// plus card banks of up to 1000 cards. Overwrites the previous export.
    pub async fn export(&self, store: &VocabularyStore) -> Result<PathBuf, SukiyakiError> {
        let records = store.list_all().await?;

        let file = File::create(&self.output_path)
            .map_err(|e| SukiyakiError::Custom(format!("Failed to create deck file: {}", e)))?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let index = DeckIndex {
            format: 1,
            revision: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            deck: DeckInfo { id: DECK_ID, name: self.deck_name.clone() },
            model: default_model(),
            card_count: records.len(),
        };

        let index_json = serde_json::to_string_pretty(&index)?;
        zip.start_file("index.json", options)
            .map_err(|e| SukiyakiError::Custom(format!("Failed to create index.json: {}", e)))?;
        zip.write_all(index_json.as_bytes())
            .map_err(|e| SukiyakiError::Custom(format!("Failed to write index.json: {}", e)))?;

        for (bank, chunk) in records.chunks(CARDS_PER_BANK).enumerate() {
            let cards: Vec<DeckCard> = chunk.iter().map(card_from_record).collect();
            let bank_json = serde_json::to_string(&cards)?;
            let bank_name = format!("cards_{}.json", bank + 1);

            zip.start_file(bank_name.as_str(), options).map_err(|e| {
                SukiyakiError::Custom(format!("Failed to create {}: {}", bank_name, e))
            })?;
            zip.write_all(bank_json.as_bytes()).map_err(|e| {
                SukiyakiError::Custom(format!("Failed to write {}: {}", bank_name, e))
            })?;
        }

        zip.finish()
            .map_err(|e| SukiyakiError::Custom(format!("Failed to finalize ZIP: {}", e)))?;

        println!("Exported {} cards to {}", records.len(), self.output_path.display());
        Ok(self.output_path.clone())
    }
}

fn default_model() -> ModelInfo {
    ModelInfo {
        id: MODEL_ID,
        name: "Sukiyaki Vocabulary".to_string(),
        fields: vec![
            "Word".to_string(),
            "Reading".to_string(),
            "Meaning".to_string(),
            "ExampleSource".to_string(),
            "ExampleTarget".to_string(),
        ],
        templates: vec![CardTemplate {
            name: "Card 1".to_string(),
            qfmt: "{{Word}}<br>({{Reading}})".to_string(),
            afmt: "{{FrontSide}}<hr id=\"answer\">{{Meaning}}<br><br>{{ExampleSource}}<br><i>{{ExampleTarget}}</i>"
                .to_string(),
        }],
    }
}

fn card_from_record(record: &VocabularyRecord) -> DeckCard {
    DeckCard {
        guid: record.lemma.clone(),
        fields: vec![
            record.lemma.clone(),
            record.reading.clone(),
            record.meaning.clone(),
            record.example_source.clone(),
            record.example_target.clone(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use zip::ZipArchive;

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sukiyaki-{}-{}.zip", name, std::process::id()))
    }

    fn record(lemma: &str, reading: &str, meaning: &str) -> VocabularyRecord {
        VocabularyRecord {
            lemma: lemma.to_string(),
            reading: reading.to_string(),
            meaning: meaning.to_string(),
            example_source: String::new(),
            example_target: String::new(),
        }
    }

    #[tokio::test]
    async fn exports_a_readable_deck() {
        let store = VocabularyStore::in_memory().await.unwrap();
        store.upsert(&record("猫", "ねこ", "cat")).await.unwrap();
        store.upsert(&record("犬", "いぬ", "dog")).await.unwrap();

        let path = scratch_path("deck");
        let exporter = DeckExporter::new("Test Deck", &path);
        let written = exporter.export(&store).await.unwrap();
        assert_eq!(written, path);

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();

        let index: DeckIndex = {
            let entry = archive.by_name("index.json").unwrap();
            serde_json::from_reader(entry).unwrap()
        };
        assert_eq!(index.format, 1);
        assert_eq!(index.deck.id, DECK_ID);
        assert_eq!(index.deck.name, "Test Deck");
        assert_eq!(index.model.id, MODEL_ID);
        assert_eq!(index.model.fields.len(), 5);
        assert_eq!(index.card_count, 2);

        let cards: Vec<DeckCard> = {
            let entry = archive.by_name("cards_1.json").unwrap();
            serde_json::from_reader(entry).unwrap()
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].guid, "猫");
        assert_eq!(cards[0].fields, vec!["猫", "ねこ", "cat", "", ""]);
        assert_eq!(cards[1].guid, "犬");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn empty_store_exports_a_manifest_with_no_banks() {
        let store = VocabularyStore::in_memory().await.unwrap();

        let path = scratch_path("empty-deck");
        DeckExporter::new("Empty", &path).export(&store).await.unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let index: DeckIndex = {
            let entry = archive.by_name("index.json").unwrap();
            serde_json::from_reader(entry).unwrap()
        };
        assert_eq!(index.card_count, 0);
        assert!(archive.by_name("cards_1.json").is_err());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn repeated_exports_overwrite_with_the_same_identity() {
        let store = VocabularyStore::in_memory().await.unwrap();
        store.upsert(&record("猫", "ねこ", "cat")).await.unwrap();

        let path = scratch_path("redeck");
        let exporter = DeckExporter::new("Stable", &path);
        exporter.export(&store).await.unwrap();

        store.upsert(&record("犬", "いぬ", "dog")).await.unwrap();
        exporter.export(&store).await.unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let index: DeckIndex = {
            let entry = archive.by_name("index.json").unwrap();
            serde_json::from_reader(entry).unwrap()
        };
        assert_eq!(index.deck.id, DECK_ID);
        assert_eq!(index.card_count, 2);

        let _ = std::fs::remove_file(&path);
    }
}
