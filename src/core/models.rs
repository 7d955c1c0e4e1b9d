use serde::{Deserialize, Serialize};

/// One analyzer token. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub lemma: String,            // Base form, what is found in a dictionary
    pub reading: String,          // Reading in hiragana (converted from katakana)
    pub part_of_speech: PartOfSpeech,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Other(String),
}

impl PartOfSpeech {
    /// Maps an analyzer's primary tag to a category. 形状詞 (adjectival noun)
    /// counts as an adjective, same as 形容詞.
    pub fn from_tag(tag: &str) -> Self {
        if tag.starts_with("名詞") {
            PartOfSpeech::Noun
        } else if tag.starts_with("動詞") {
            PartOfSpeech::Verb
        } else if tag.starts_with("形容詞") || tag.starts_with("形状詞") {
            PartOfSpeech::Adjective
        } else {
            PartOfSpeech::Other(tag.to_string())
        }
    }

    pub fn is_content_word(&self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Verb | PartOfSpeech::Adjective)
    }
}

/// A token that survived the part-of-speech filter, unique by lemma within
/// one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub lemma: String,
    pub reading: String,
}

/// The canonical vocabulary unit. `lemma` is the identity key everywhere:
/// store uniqueness, batch dedup, deck card guids. Absent data is an empty
/// string, never a null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyRecord {
    pub lemma: String,
    pub reading: String,
    pub meaning: String,
    pub example_source: String,
    pub example_target: String,
}

/// Outcome of one remote lookup. `Absent` and `TransientError` both merge to
/// empty fields downstream; they are kept apart so callers can tell "the
/// service said no" from "the service never answered".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Absent,
    TransientError,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// What the dictionary service returned for a lemma. Optional fields are
/// exactly what the remote provided; fallbacks to the candidate's own fields
/// happen at merge time, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryHit {
    pub word: Option<String>,
    pub reading: Option<String>,
    pub meaning: String,
}

/// One example sentence pair. Both sides are non-empty when this exists;
/// a source sentence without a translation is reported as `Absent` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamplePair {
    pub source: String,
    pub target: String,
}
