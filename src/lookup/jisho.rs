use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{
    retry::RetryPolicy,
    DictionarySource,
};
use crate::core::{
    DictionaryHit,
    Lookup,
    SukiyakiError,
};

/// Client for the Jisho word-search API. One GET per lookup, the lemma
/// URL-encoded into the `keyword` parameter.
pub struct JishoClient {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct JishoResponse {
    #[serde(default)]
    data: Vec<JishoEntry>,
}

#[derive(Debug, Deserialize)]
struct JishoEntry {
    #[serde(default)]
    japanese: Vec<JishoJapanese>,
    #[serde(default)]
    senses: Vec<JishoSense>,
}

#[derive(Debug, Deserialize)]
struct JishoJapanese {
    word: Option<String>,
    reading: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JishoSense {
    #[serde(default)]
    english_definitions: Vec<String>,
}

impl JishoClient {
    pub fn new(base_url: String, policy: RetryPolicy) -> Result<Self, SukiyakiError> {
        let client = Client::builder().timeout(policy.timeout).build()?;
        Ok(JishoClient { client, base_url, policy })
    }

    async fn fetch(&self, lemma: &str) -> Result<Lookup<DictionaryHit>, SukiyakiError> {
        let response = self.client.get(&self.base_url).query(&[("keyword", lemma)]).send().await?;

        if !response.status().is_success() {
            return Err(SukiyakiError::Custom(format!(
                "HTTP error {} from {}",
                response.status(),
                response.url()
            )));
        }

        let body = response.text().await?;
        Ok(parse_dictionary_response(&body))
    }
}

#[async_trait]
impl DictionarySource for JishoClient {
    async fn lookup(&self, lemma: &str) -> Lookup<DictionaryHit> {
        self.policy.run("Dictionary lookup", || self.fetch(lemma)).await
    }
}

/// First entry wins. A body that is not the expected shape means "nothing
/// found", never an error.
fn parse_dictionary_response(body: &str) -> Lookup<DictionaryHit> {
    let response: JishoResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return Lookup::Absent,
    };

    let entry = match response.data.into_iter().next() {
        Some(entry) => entry,
        None => return Lookup::Absent,
    };

    let (word, reading) = match entry.japanese.into_iter().next() {
        Some(japanese) => (japanese.word, japanese.reading),
        None => (None, None),
    };

    let meaning = entry
        .senses
        .into_iter()
        .next()
        .map(|sense| sense.english_definitions.join(", "))
        .unwrap_or_default();

    Lookup::Found(DictionaryHit { word, reading, meaning })
}
