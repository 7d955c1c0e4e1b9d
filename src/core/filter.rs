use std::collections::HashSet;

use super::{
    Candidate,
    Token,
};

/// Keeps content words (nouns, verbs, adjectives) and drops repeats of the
/// same lemma. First occurrence wins, original order is preserved.
pub fn filter_candidates(tokens: Vec<Token>) -> Vec<Candidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for token in tokens {
        if !token.part_of_speech.is_content_word() {
            continue;
        }
        if token.lemma.is_empty() || !seen.insert(token.lemma.clone()) {
            continue;
        }
        candidates.push(Candidate { lemma: token.lemma, reading: token.reading });
    }

    candidates
}
