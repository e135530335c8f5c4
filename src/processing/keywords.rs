//! Frequency-based keyword extraction

use crate::config::KeywordConfig;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_KEYWORD_LIMIT: usize = 10;
pub const MIN_TOKEN_CHARS: usize = 4;

/// Which stopword list filters tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopwordList {
    /// Short hand-authored list of filler words common on resumes
    Compact,
    /// Standard English stopword list
    Standard,
}

impl StopwordList {
    pub fn words(&self) -> &'static [&'static str] {
        match self {
            StopwordList::Compact => COMPACT_STOPWORDS,
            StopwordList::Standard => STANDARD_STOPWORDS,
        }
    }
}

const COMPACT_STOPWORDS: &[&str] = &[
    "and", "the", "with", "from", "that", "this", "have", "will", "were", "been",
    "also", "into", "using", "used", "their", "there", "they", "them", "than",
    "then", "such", "over", "well", "more", "most", "other", "some", "each",
    "about", "which", "while", "where", "when", "what", "your", "having",
    "able", "etc", "within", "across", "various", "including",
];

const STANDARD_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "that'll", "these", "those", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
    "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below",
    "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t",
    "can", "will", "just", "don", "don't", "should", "should've", "now", "d", "ll",
    "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
    "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't",
    "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
    "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't",
    "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Coarse part of speech for a single token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    Noun,
    PluralNoun,
    Verb,
    Adjective,
    Adverb,
    Other,
}

impl PosTag {
    pub fn is_common_noun(&self) -> bool {
        matches!(self, PosTag::Noun | PosTag::PluralNoun)
    }
}

/// Part-of-speech tagging collaborator used by the noun-only filter
pub trait PosTagger: Send + Sync {
    fn tag(&self, token: &str) -> PosTag;
}

/// Suffix-based tagger for lowercase tokens.
///
/// Without context it can only guess; unknown shapes default to `Noun`.
pub struct SuffixTagger;

impl SuffixTagger {
    const VERB_SUFFIXES: &'static [&'static str] = &["ing", "ed", "ize", "ise", "ify", "ate"];
    const ADJECTIVE_SUFFIXES: &'static [&'static str] =
        &["ful", "ous", "ive", "able", "ible", "ical", "less", "ish"];
    // Nouns that would otherwise look like verbs or adjectives
    const NOUN_EXCEPTIONS: &'static [&'static str] = &[
        "engineering", "training", "marketing", "testing", "accounting", "planning",
        "learning", "computing", "networking", "programming", "database", "candidate",
        "certificate", "graduate", "template", "objective", "executive", "initiative",
    ];

    fn has_suffix(token: &str, suffixes: &[&str]) -> bool {
        suffixes
            .iter()
            .any(|s| token.len() > s.len() + 2 && token.ends_with(s))
    }
}

impl PosTagger for SuffixTagger {
    fn tag(&self, token: &str) -> PosTag {
        if Self::NOUN_EXCEPTIONS.contains(&token) {
            return PosTag::Noun;
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            return PosTag::Other;
        }
        if token.len() > 4 && token.ends_with("ly") {
            return PosTag::Adverb;
        }
        if Self::has_suffix(token, Self::VERB_SUFFIXES) {
            return PosTag::Verb;
        }
        if Self::has_suffix(token, Self::ADJECTIVE_SUFFIXES) {
            return PosTag::Adjective;
        }
        if token.ends_with('s') && !token.ends_with("ss") && !token.ends_with("us") {
            return PosTag::PluralNoun;
        }
        PosTag::Noun
    }
}

/// Ranks salient terms by frequency after stopword and length filtering
pub struct KeywordExtractor {
    stopwords: HashSet<String>,
    tagger: Option<Box<dyn PosTagger>>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(StopwordList::Standard)
    }
}

impl KeywordExtractor {
    pub fn new(list: StopwordList) -> Self {
        Self {
            stopwords: list.words().iter().map(|s| s.to_string()).collect(),
            tagger: None,
        }
    }

    pub fn from_config(config: &KeywordConfig) -> Self {
        let extractor = Self::new(config.stopwords);
        if config.nouns_only {
            extractor.with_tagger(Box::new(SuffixTagger))
        } else {
            extractor
        }
    }

    /// Keep only tokens the tagger marks as singular or plural common nouns
    pub fn with_tagger(mut self, tagger: Box<dyn PosTagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    /// Up to `limit` distinct lowercase terms, most frequent first. Ties
    /// keep the order in which terms first appear.
    pub fn extract(&self, text: &str, limit: usize) -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();

        for token in self.tokens(text) {
            let count = counts.entry(token.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(token);
            }
            *count += 1;
        }

        let mut ranked: Vec<(String, usize)> = first_seen
            .into_iter()
            .map(|term| {
                let count = counts.get(&term).copied().unwrap_or(0);
                (term, count)
            })
            .collect();
        // sort_by is stable: equal counts stay in first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let keywords: Vec<String> = ranked
            .into_iter()
            .take(limit)
            .map(|(term, _)| term)
            .collect();

        debug!("Extracted {} keywords (limit {})", keywords.len(), limit);
        keywords
    }

    fn tokens(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        cleaned
            .split_whitespace()
            .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|t| !self.stopwords.contains(*t))
            .filter(|t| {
                self.tagger
                    .as_ref()
                    .map_or(true, |tagger| tagger.tag(t).is_common_noun())
            })
            .map(str::to_string)
            .collect()
    }
}

/// Keywords from `text` using the standard stopword list
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    KeywordExtractor::default().extract(text, limit)
}
