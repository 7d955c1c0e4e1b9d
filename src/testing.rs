//! Test doubles for the enrichment collaborators.
//!
//! These make it possible to exercise pipeline and service logic without a
//! real analyzer, OCR engine, or network access.

use std::{
    collections::HashMap,
    path::Path,
    sync::{
        atomic::{
            AtomicU32,
            Ordering,
        },
        Arc,
    },
};

use async_trait::async_trait;

use crate::{
    core::{
        DictionaryHit,
        ExamplePair,
        Lookup,
        PartOfSpeech,
        SukiyakiError,
        Token,
    },
    lookup::{
        DictionarySource,
        ExampleSource,
    },
    ocr::TextRecognizer,
    segmentation::Analyzer,
};

pub fn token(lemma: &str, reading: &str, tag: &str) -> Token {
    Token {
        lemma: lemma.to_string(),
        reading: reading.to_string(),
        part_of_speech: PartOfSpeech::from_tag(tag),
    }
}

pub fn noun(lemma: &str, reading: &str) -> Token {
    token(lemma, reading, "名詞")
}

/// Deterministic analyzer: canned tokens per exact input text, an error for
/// texts marked failing, no tokens otherwise.
#[derive(Default)]
pub struct FakeAnalyzer {
    tokens_by_text: HashMap<String, Vec<Token>>,
    failing: Vec<String>,
}

impl FakeAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: &str, tokens: Vec<Token>) -> Self {
        self.tokens_by_text.insert(text.to_string(), tokens);
        self
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.push(text.to_string());
        self
    }
}

impl Analyzer for FakeAnalyzer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, SukiyakiError> {
        if self.failing.iter().any(|t| t == text) {
            return Err(SukiyakiError::Custom(format!("analysis refused for: {}", text)));
        }
        Ok(self.tokens_by_text.get(text).cloned().unwrap_or_default())
    }
}

/// Dictionary with canned hits and a shared call counter for dedup
/// assertions. Unknown lemmas are `Absent`.
#[derive(Default)]
pub struct FakeDictionary {
    hits: HashMap<String, DictionaryHit>,
    fail_always: bool,
    calls: Arc<AtomicU32>,
}

impl FakeDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hit(
        mut self,
        lemma: &str,
        word: Option<&str>,
        reading: Option<&str>,
        meaning: &str,
    ) -> Self {
        self.hits.insert(
            lemma.to_string(),
            DictionaryHit {
                word: word.map(str::to_string),
                reading: reading.map(str::to_string),
                meaning: meaning.to_string(),
            },
        );
        self
    }

    pub fn always_failing(mut self) -> Self {
        self.fail_always = true;
        self
    }

    pub fn calls(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl DictionarySource for FakeDictionary {
    async fn lookup(&self, lemma: &str) -> Lookup<DictionaryHit> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_always {
            return Lookup::TransientError;
        }
        match self.hits.get(lemma) {
            Some(hit) => Lookup::Found(hit.clone()),
            None => Lookup::Absent,
        }
    }
}

/// Example corpus with canned pairs. Unknown lemmas are `Absent`.
#[derive(Default)]
pub struct FakeExamples {
    pairs: HashMap<String, ExamplePair>,
    fail_always: bool,
}

impl FakeExamples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(mut self, lemma: &str, source: &str, target: &str) -> Self {
        self.pairs.insert(
            lemma.to_string(),
            ExamplePair { source: source.to_string(), target: target.to_string() },
        );
        self
    }

    pub fn always_failing(mut self) -> Self {
        self.fail_always = true;
        self
    }
}

#[async_trait]
impl ExampleSource for FakeExamples {
    async fn lookup(&self, lemma: &str) -> Lookup<ExamplePair> {
        if self.fail_always {
            return Lookup::TransientError;
        }
        match self.pairs.get(lemma) {
            Some(pair) => Lookup::Found(pair.clone()),
            None => Lookup::Absent,
        }
    }
}

/// Recognizer with canned text per image path.
#[derive(Default)]
pub struct FakeRecognizer {
    texts: HashMap<String, String>,
    failing: Vec<String>,
}

impl FakeRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, path: &str, text: &str) -> Self {
        self.texts.insert(path.to_string(), text.to_string());
        self
    }

    pub fn failing_on(mut self, path: &str) -> Self {
        self.failing.push(path.to_string());
        self
    }
}

impl TextRecognizer for FakeRecognizer {
    fn recognize(&self, image: &Path) -> Result<String, SukiyakiError> {
        let key = image.to_string_lossy();
        if self.failing.iter().any(|p| p == key.as_ref()) {
            return Err(SukiyakiError::Custom(format!("recognition failed for: {}", key)));
        }
        Ok(self.texts.get(key.as_ref()).cloned().unwrap_or_default())
    }
}
