use std::{
    path::PathBuf,
    sync::Arc,
};

use clap::{
    Parser,
    Subcommand,
};
use sukiyaki::{
    persistence,
    DeckExporter,
    DictType,
    EnrichmentTools,
    JishoClient,
    Settings,
    SukiyakiError,
    TatoebaClient,
    TextRecognizer,
    VibratoAnalyzer,
    VocabService,
    VocabularyRecord,
    VocabularyStore,
};

#[derive(Parser)]
#[command(name = "sukiyaki")]
#[command(about = "Mine vocabulary from Japanese text and images into a flashcard deck")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a piece of Japanese text and enrich the new words
    Text {
        text: String,
        /// Save the enriched words to the vocabulary store
        #[arg(long)]
        commit: bool,
    },
    /// Run OCR over images and enrich the words found in them
    Images {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Save the enriched words to the vocabulary store
        #[arg(long)]
        commit: bool,
    },
    /// Export the saved vocabulary as a deck archive
    Export,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let settings = Settings::load();

    let result = match cli.command {
        Commands::Text { text, commit } => cmd_text(&settings, &text, commit).await,
        Commands::Images { paths, commit } => cmd_images(&settings, &paths, commit).await,
        Commands::Export => cmd_export(&settings).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_text(settings: &Settings, text: &str, commit: bool) -> Result<(), SukiyakiError> {
    let service = open_service(settings).await?;

    let records = service.enrich_text(text).await?;
    print_records(&records);

    if commit {
        service.commit(&records).await;
    }

    service.close().await;
    Ok(())
}

async fn cmd_images(
    settings: &Settings,
    paths: &[PathBuf],
    commit: bool,
) -> Result<(), SukiyakiError> {
    let service = open_service(settings).await?;

    let batches = service.enrich_images(paths).await;
    let mut all_records: Vec<VocabularyRecord> = Vec::new();
    for (path, batch) in paths.iter().zip(&batches) {
        println!("\n{}: {} new words", path.display(), batch.records.len());
        print_records(&batch.records);
        all_records.extend(batch.records.iter().cloned());
    }

    if commit {
        service.commit(&all_records).await;
    }

    service.close().await;
    Ok(())
}

async fn cmd_export(settings: &Settings) -> Result<(), SukiyakiError> {
    let store = VocabularyStore::open(&persistence::vocab_db_path()).await?;
    let exporter = DeckExporter::new(&settings.deck_name, &persistence::deck_output_path());

    let path = exporter.export(&store).await?;
    println!("Deck written to {}", path.display());

    store.close().await;
    Ok(())
}

async fn open_service(settings: &Settings) -> Result<VocabService, SukiyakiError> {
    let analyzer = VibratoAnalyzer::init(DictType::Unidic).await?;
    let policy = settings.retry_policy();
    let dictionary = JishoClient::new(settings.dictionary_url.clone(), policy)?;
    let examples = TatoebaClient::new(
        settings.example_url.clone(),
        settings.source_language.clone(),
        settings.target_language.clone(),
        policy,
    )?;

    let tools = EnrichmentTools {
        analyzer: Arc::new(analyzer),
        dictionary: Arc::new(dictionary),
        examples: Arc::new(examples),
        recognizer: build_recognizer(),
    };

    let store = VocabularyStore::open(&persistence::vocab_db_path()).await?;
    let exporter = DeckExporter::new(&settings.deck_name, &persistence::deck_output_path());

    Ok(VocabService::new(tools, store, exporter))
}

#[cfg(feature = "tesseract")]
fn build_recognizer() -> Option<Arc<dyn TextRecognizer>> {
    Some(Arc::new(sukiyaki::ocr::TesseractOcr::default()))
}

#[cfg(not(feature = "tesseract"))]
fn build_recognizer() -> Option<Arc<dyn TextRecognizer>> {
    None
}

fn print_records(records: &[VocabularyRecord]) {
    for record in records {
        println!("{} ({}): {}", record.lemma, record.reading, record.meaning);
        if !record.example_source.is_empty() {
            println!("    {}", record.example_source);
            println!("    {}", record.example_target);
        }
    }
}
