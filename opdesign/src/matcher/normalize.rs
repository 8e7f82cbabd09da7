//! Text normalization for matching
//!
//! Every comparison in the matcher runs both sides through the same
//! [`TextNormalizer`]. Two implementations exist: a plain case folder and a
//! lemmatizing one that also drops stop words and stems the remaining words.

use serde::{Deserialize, Serialize};

#[cfg(feature = "stemming")]
use rust_stemmers::{Algorithm, Stemmer};

/// Language of the catalog texts and of user queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Tr,
}

/// Lowercase `text`, collapsing the Turkish capital letters onto their
/// lowercase forms first. `İ`, `I` and `ı` all become `i`, so an all-caps
/// Turkish name folds to the same text as its mixed-case spelling.
pub fn fold_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            'İ' | 'I' | 'ı' => out.push('i'),
            'Ü' => out.push('ü'),
            'Ö' => out.push('ö'),
            'Ç' => out.push('ç'),
            'Ş' => out.push('ş'),
            'Ğ' => out.push('ğ'),
            other => out.extend(other.to_lowercase()),
        }
    }
    out
}

/// Common interface of the normalizers.
pub trait TextNormalizer: Send + Sync {
    fn name(&self) -> &str;

    fn normalize(&self, text: &str) -> String;
}

/// Case folding only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseNormalizer;

impl TextNormalizer for LowercaseNormalizer {
    fn name(&self) -> &str {
        "lowercase"
    }

    fn normalize(&self, text: &str) -> String {
        fold_case(text.trim())
    }
}

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "all", "an", "and", "any", "are", "as", "at", "be", "but", "by", "can", "could",
    "do", "for", "from", "get", "give", "have", "how", "i", "in", "is", "it", "its", "make", "me",
    "my", "of", "on", "one", "or", "please", "so", "some", "that", "the", "this", "to", "us",
    "we", "what", "which", "with", "would", "you", "your",
];

const TURKISH_STOP_WORDS: &[&str] = &[
    "ama", "bana", "ben", "bir", "biz", "bu", "da", "daha", "de", "gibi", "için", "ile", "ki",
    "mi", "mu", "mü", "ne", "o", "olan", "sen", "şu", "ve", "veya", "ya",
];

/// Stop-word removal plus Snowball stemming.
#[cfg(feature = "stemming")]
pub struct LemmatizingNormalizer {
    language: Language,
    stemmer: Stemmer,
}

#[cfg(feature = "stemming")]
impl LemmatizingNormalizer {
    pub fn new(language: Language) -> Self {
        let algorithm = match language {
            Language::En => Algorithm::English,
            Language::Tr => Algorithm::Turkish,
        };
        Self {
            language,
            stemmer: Stemmer::create(algorithm),
        }
    }

    fn is_stop_word(&self, word: &str) -> bool {
        let list = match self.language {
            Language::En => ENGLISH_STOP_WORDS,
            Language::Tr => TURKISH_STOP_WORDS,
        };
        list.contains(&word)
    }
}

#[cfg(feature = "stemming")]
impl TextNormalizer for LemmatizingNormalizer {
    fn name(&self) -> &str {
        "lemmatizing"
    }

    fn normalize(&self, text: &str) -> String {
        let folded = fold_case(text);
        folded
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty() && !self.is_stop_word(word))
            .map(|word| self.stemmer.stem(word).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Which normalizer the similarity matcher should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizerKind {
    #[default]
    Lemmatizing,
    Lowercase,
}

/// Build the requested normalizer. Without the `stemming` feature the
/// lemmatizing choice degrades to case folding.
pub fn build_normalizer(kind: NormalizerKind, language: Language) -> Box<dyn TextNormalizer> {
    match kind {
        NormalizerKind::Lowercase => Box::new(LowercaseNormalizer),
        #[cfg(feature = "stemming")]
        NormalizerKind::Lemmatizing => Box::new(LemmatizingNormalizer::new(language)),
        #[cfg(not(feature = "stemming"))]
        NormalizerKind::Lemmatizing => {
            let _ = language;
            tracing::warn!("Stemming support not compiled in, falling back to lowercase matching");
            Box::new(LowercaseNormalizer)
        }
    }
}
