// src/provider.rs
// Lexicon/rule-config provider interface and the built-in pattern bank

use anyhow::Result;
use async_trait::async_trait;

use crate::rules::{Morphology, PartialRuleConfig, SentenceLengthBounds};

/// Source of approved words and per-pattern rule overrides. Real
/// deployments back this with a database; tests and the offline CLI use
/// [`StaticLexicon`].
#[async_trait]
pub trait LexiconProvider: Send + Sync {
    async fn get_approved_words(&self, pattern_id: &str) -> Result<Vec<String>>;

    /// Per-pattern overrides, or `None` to use the conservative
    /// defaults unchanged.
    async fn get_rule_config(&self, pattern_id: &str) -> Result<Option<PartialRuleConfig>>;
}

/// In-memory provider with a small built-in bank of phonics patterns.
pub struct StaticLexicon;

struct PatternEntry {
    id: &'static str,
    approved: &'static [&'static str],
    hearts: &'static [&'static str],
}

// Word lists follow the usual scope-and-sequence for each pattern;
// heart words are high-frequency words taught as exceptions.
const PATTERNS: &[PatternEntry] = &[
    PatternEntry {
        id: "cvc-short-a",
        approved: &[
            "am", "an", "at", "as", "ad",
            "bat", "cat", "fat", "hat", "mat", "pat", "rat", "sat", "vat",
            "bad", "dad", "had", "lad", "mad", "pad", "sad",
            "bag", "gag", "hag", "lag", "nag", "rag", "sag", "tag", "wag",
            "ban", "can", "fan", "man", "pan", "ran", "tan", "van",
            "cap", "gap", "lap", "map", "nap", "rap", "sap", "tap", "zap",
            "cab", "dab", "gab", "jab", "lab", "nab", "tab",
        ],
        hearts: &["the", "i", "to", "a", "on"],
    },
    PatternEntry {
        id: "cvc-short-i",
        approved: &[
            "it", "is", "if", "in",
            "big", "dig", "fig", "jig", "pig", "rig", "wig",
            "bid", "did", "hid", "kid", "lid", "rid",
            "bin", "din", "fin", "kin", "pin", "tin", "win",
            "bit", "fit", "hit", "kit", "lit", "pit", "sit", "wit",
            "dip", "hip", "lip", "nip", "rip", "sip", "tip", "zip",
            "bib", "fib", "nib", "rib",
        ],
        hearts: &["the", "i", "to", "a"],
    },
    PatternEntry {
        id: "cvce-long-a",
        approved: &[
            "make", "bake", "cake", "take", "wake", "lake", "rake",
            "came", "game", "name", "same", "tame",
            "gate", "late", "date", "mate",
            "cane", "lane", "mane", "pane", "vane",
            "cape", "tape", "gaze", "maze", "wave", "cave", "save", "gave",
            "at", "and", "a", "we",
        ],
        hearts: &["the", "they", "i", "to", "sam", "emma"],
    },
];

// Fallback for unknown patterns: enough glue words to draft anything.
const FALLBACK_WORDS: &[&str] = &["a", "an", "and", "at", "we"];

impl StaticLexicon {
    fn entry(pattern_id: &str) -> Option<&'static PatternEntry> {
        PATTERNS.iter().find(|p| p.id == pattern_id)
    }

    /// Ids of all built-in patterns, for CLI help output.
    pub fn pattern_ids() -> Vec<&'static str> {
        PATTERNS.iter().map(|p| p.id).collect()
    }
}

#[async_trait]
impl LexiconProvider for StaticLexicon {
    async fn get_approved_words(&self, pattern_id: &str) -> Result<Vec<String>> {
        let words = match Self::entry(pattern_id) {
            Some(entry) => entry.approved,
            None => FALLBACK_WORDS,
        };
        Ok(words.iter().map(|w| w.to_string()).collect())
    }

    async fn get_rule_config(&self, pattern_id: &str) -> Result<Option<PartialRuleConfig>> {
        let Some(entry) = Self::entry(pattern_id) else {
            return Ok(None);
        };
        Ok(Some(PartialRuleConfig {
            proper_nouns_whitelist: Some(entry.hearts.iter().map(|w| w.to_string()).collect()),
            contractions_allowed: Some(false),
            morphology: Some(Morphology {
                plural_s: true,
                past_ed: false,
                gerund_ing: true,
            }),
            sentence_length_bounds: Some(SentenceLengthBounds { min: 3, max: 8 }),
            max_sentences_per_page: Some(2),
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_pattern_has_words_and_overrides() {
        let provider = StaticLexicon;
        let words = provider.get_approved_words("cvc-short-a").await.unwrap();
        assert!(words.contains(&"cat".to_string()));
        let overrides = provider.get_rule_config("cvc-short-a").await.unwrap();
        let overrides = overrides.expect("built-in pattern has overrides");
        assert!(overrides
            .proper_nouns_whitelist
            .unwrap()
            .contains(&"the".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_pattern_falls_back() {
        let provider = StaticLexicon;
        let words = provider.get_approved_words("nope").await.unwrap();
        assert_eq!(words.len(), FALLBACK_WORDS.len());
        assert!(provider.get_rule_config("nope").await.unwrap().is_none());
    }
}
