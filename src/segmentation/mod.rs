pub mod token_dictionary;
pub mod tokenizer;

use crate::core::{
    SukiyakiError,
    Token,
};

pub use token_dictionary::DictType;
pub use tokenizer::VibratoAnalyzer;

/// Morphological analysis behind a trait: text in, ordered tokens out. The
/// pipeline never sees analyzer internals, only `Token`s.
pub trait Analyzer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, SukiyakiError>;
}
