pub mod jisho;
pub mod retry;
pub mod tatoeba;

use async_trait::async_trait;

use crate::core::{
    DictionaryHit,
    ExamplePair,
    Lookup,
};

pub use jisho::JishoClient;
pub use retry::RetryPolicy;
pub use tatoeba::TatoebaClient;

/// Remote dictionary: lemma in, canonical spelling + reading + gloss out.
/// Implementations absorb their own failures; callers only ever see a
/// `Lookup` outcome.
#[async_trait]
pub trait DictionarySource: Send + Sync {
    async fn lookup(&self, lemma: &str) -> Lookup<DictionaryHit>;
}

/// Remote parallel corpus: lemma in, one example sentence pair out.
#[async_trait]
pub trait ExampleSource: Send + Sync {
    async fn lookup(&self, lemma: &str) -> Lookup<ExamplePair>;
}
