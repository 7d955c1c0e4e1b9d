use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{
    retry::RetryPolicy,
    ExampleSource,
};
use crate::core::{
    ExamplePair,
    Lookup,
    SukiyakiError,
};

/// Client for the Tatoeba sentence-search API. Asks for approved,
/// non-orphaned sentences in random order and keeps the first one that
/// carries a translation in the target language.
pub struct TatoebaClient {
    client: Client,
    base_url: String,
    source_language: String,
    target_language: String,
    policy: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct TatoebaResponse {
    #[serde(default)]
    results: Vec<TatoebaResult>,
}

#[derive(Debug, Deserialize)]
struct TatoebaResult {
    #[serde(default)]
    text: String,
    #[serde(default)]
    translations: Vec<TranslationGroup>,
}

/// The API nests translations in groups, but some payloads put other JSON
/// where a group belongs. Those are skipped rather than failing the parse.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranslationGroup {
    Group(Vec<TatoebaTranslation>),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct TatoebaTranslation {
    #[serde(default)]
    lang: String,
    #[serde(default)]
    text: String,
}

impl TatoebaClient {
    pub fn new(
        base_url: String,
        source_language: String,
        target_language: String,
        policy: RetryPolicy,
    ) -> Result<Self, SukiyakiError> {
        let client = Client::builder().timeout(policy.timeout).build()?;
        Ok(TatoebaClient { client, base_url, source_language, target_language, policy })
    }

    async fn fetch(&self, lemma: &str) -> Result<Lookup<ExamplePair>, SukiyakiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("from", self.source_language.as_str()),
                ("to", self.target_language.as_str()),
                ("query", lemma),
                ("orphans", "no"),
                ("unapproved", "no"),
                ("sort", "random"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SukiyakiError::Custom(format!(
                "HTTP error {} from {}",
                response.status(),
                response.url()
            )));
        }

        let body = response.text().await?;
        Ok(parse_example_response(&body, &self.target_language))
    }
}

#[async_trait]
impl ExampleSource for TatoebaClient {
    async fn lookup(&self, lemma: &str) -> Lookup<ExamplePair> {
        self.policy.run("Example lookup", || self.fetch(lemma)).await
    }
}

/// A pair needs both sides: a source sentence with no target-language
/// translation is reported as absent, not half-filled.
fn parse_example_response(body: &str, target_language: &str) -> Lookup<ExamplePair> {
    let response: TatoebaResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return Lookup::Absent,
    };

    let result = match response.results.into_iter().next() {
        Some(result) => result,
        None => return Lookup::Absent,
    };

    let source = result.text.trim().to_string();
    if source.is_empty() {
        return Lookup::Absent;
    }

    for group in result.translations {
        let translations = match group {
            TranslationGroup::Group(translations) => translations,
            TranslationGroup::Other(_) => continue,
        };

        for translation in translations {
            let target = translation.text.trim().to_string();
            if translation.lang == target_language && !target.is_empty() {
                return Lookup::Found(ExamplePair { source, target });
            }
        }
    }

    Lookup::Absent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_first_target_language_translation() {
        let body = r#"{
            "results": [{
                "text": "猫が好きです。",
                "translations": [
                    [{"lang": "deu", "text": "Ich mag Katzen."},
                     {"lang": "eng", "text": "I like cats."}],
                    [{"lang": "eng", "text": "I love cats."}]
                ]
            }]
        }"#;

        let pair = parse_example_response(body, "eng").into_option().unwrap();
        assert_eq!(pair.source, "猫が好きです。");
        assert_eq!(pair.target, "I like cats.");
    }

    #[test]
    fn sentence_without_target_translation_is_absent() {
        let body = r#"{
            "results": [{
                "text": "猫が好きです。",
                "translations": [[{"lang": "deu", "text": "Ich mag Katzen."}]]
            }]
        }"#;

        assert_eq!(parse_example_response(body, "eng"), Lookup::Absent);
    }

    #[test]
    fn non_list_translation_groups_are_skipped() {
        let body = r#"{
            "results": [{
                "text": "本を読む。",
                "translations": [
                    {"unexpected": true},
                    [{"lang": "eng", "text": "I read a book."}]
                ]
            }]
        }"#;

        let pair = parse_example_response(body, "eng").into_option().unwrap();
        assert_eq!(pair.target, "I read a book.");
    }

    #[test]
    fn empty_results_are_absent() {
        assert_eq!(parse_example_response(r#"{"results": []}"#, "eng"), Lookup::Absent);
    }

    #[test]
    fn blank_sentences_are_absent() {
        let body = r#"{
            "results": [{
                "text": "  ",
                "translations": [[{"lang": "eng", "text": "I like cats."}]]
            }]
        }"#;

        assert_eq!(parse_example_response(body, "eng"), Lookup::Absent);

        let body = r#"{
            "results": [{
                "text": "猫が好きです。",
                "translations": [[{"lang": "eng", "text": "   "}]]
            }]
        }"#;

        assert_eq!(parse_example_response(body, "eng"), Lookup::Absent);
    }

    #[test]
    fn malformed_body_is_absent_not_a_crash() {
        assert_eq!(parse_example_response("<html>down</html>", "eng"), Lookup::Absent);
        assert_eq!(parse_example_response(r#"{"results": 3}"#, "eng"), Lookup::Absent);
    }
}
