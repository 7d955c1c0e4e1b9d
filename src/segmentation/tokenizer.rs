use vibrato::Tokenizer;
use wana_kana::ConvertJapanese;

use super::{
    token_dictionary::{
        ensure_dictionary,
        load_dictionary,
        DictType,
    },
    Analyzer,
};
use crate::core::{
    PartOfSpeech,
    SukiyakiError,
    Token,
};

/// Analyzer backed by the vibrato tokenizer. Holds the loaded system
/// dictionary; a fresh worker is made per call so `tokenize` stays `&self`.
pub struct VibratoAnalyzer {
    tokenizer: Tokenizer,
    dict_type: DictType,
}

impl VibratoAnalyzer {
    /// Downloads and unpacks the system dictionary on first use, then loads
    /// it. Later runs find it in the app data directory and skip the network.
    pub async fn init(dict_type: DictType) -> Result<Self, SukiyakiError> {
        let dict_path = ensure_dictionary(&dict_type).await?;
        let dict = load_dictionary(&dict_path)?;
        Ok(VibratoAnalyzer { tokenizer: Tokenizer::new(dict), dict_type })
    }
}

impl Analyzer for VibratoAnalyzer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, SukiyakiError> {
        let mut worker = self.tokenizer.new_worker();
        let mut tokens = Vec::new();

        for sentence in text.split_terminator(['。', '！', '？', '\n']) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }

            worker.reset_sentence(sentence);
            worker.tokenize();

            for token in worker.token_iter() {
                tokens.push(token_from_features(token.surface(), token.feature(), &self.dict_type));
            }
        }

        Ok(tokens)
    }
}

/// Maps one vibrato token to our shape using the dictionary's feature CSV.
/// Starred or missing fields fall back to the surface form; readings come
/// out as hiragana.
fn token_from_features(surface: &str, features: &str, dict_type: &DictType) -> Token {
    let fields: Vec<&str> = features.split(',').collect();
    let get_field = |idx: usize| fields.get(idx).copied().unwrap_or("*");

    let (lemma_idx, reading_idx) = dict_type.lemma_indices();

    let lemma = match get_field(lemma_idx) {
        "" | "*" => surface.to_string(),
        lemma => lemma.to_string(),
    };

    let reading = match get_field(reading_idx) {
        "" | "*" => surface.to_hiragana(),
        reading => reading.to_hiragana(),
    };

    Token { lemma, reading, part_of_speech: PartOfSpeech::from_tag(get_field(0)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_unidic_features() {
        let features = "名詞,普通名詞,一般,*,*,*,ネコ,猫,猫,ネコ,猫,ネコ,和,*,*,*,*,*,*,体,ネコ,ネコ,ネコ,ネコ,*,*,*,*,*";
        let token = token_from_features("猫", features, &DictType::Unidic);

        assert_eq!(token.lemma, "猫");
        assert_eq!(token.reading, "ねこ");
        assert_eq!(token.part_of_speech, PartOfSpeech::Noun);
    }

    #[test]
    fn maps_ipadic_features() {
        let features = "動詞,自立,*,*,五段・ラ行,基本形,走る,ハシル,ハシル";
        let token = token_from_features("走る", features, &DictType::Ipadic);

        assert_eq!(token.lemma, "走る");
        assert_eq!(token.reading, "はしる");
        assert_eq!(token.part_of_speech, PartOfSpeech::Verb);
    }

    #[test]
    fn starred_fields_fall_back_to_the_surface() {
        let token = token_from_features("ヤバい", "形容詞,一般,*,*,*,*", &DictType::Unidic);

        assert_eq!(token.lemma, "ヤバい");
        assert_eq!(token.reading, "やばい");
        assert_eq!(token.part_of_speech, PartOfSpeech::Adjective);
    }

    #[test]
    fn punctuation_is_not_a_content_word() {
        let token = token_from_features("、", "補助記号,読点,*,*,*,*", &DictType::Unidic);
        assert!(!token.part_of_speech.is_content_word());
    }
}
