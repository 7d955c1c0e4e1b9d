pub mod errors;
pub mod filter;
pub mod http;
pub mod models;
pub mod pipeline;

pub use errors::SukiyakiError;
pub use models::{
    Candidate,
    DictionaryHit,
    ExamplePair,
    Lookup,
    PartOfSpeech,
    Token,
    VocabularyRecord,
};
