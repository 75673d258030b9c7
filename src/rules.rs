// src/rules.rs
// Constraint set (rule config), provider overrides, and the violation taxonomy

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::canon::canonicalize;

/// Which inflectional suffixes the current phonics pattern permits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Morphology {
    pub plural_s: bool,
    pub past_ed: bool,
    pub gerund_ing: bool,
}

/// Inclusive tokens-per-sentence bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SentenceLengthBounds {
    pub min: usize,
    pub max: usize,
}

/// The resolved, immutable constraint set a compile pass validates
/// against. `allowed_words` and `proper_nouns_whitelist` are stored in
/// canonical lower-case form; membership probes must be canonicalized
/// the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub allowed_words: HashSet<String>,
    pub allowed_punctuation: HashSet<char>,
    pub disallow_proper_nouns: bool,
    pub proper_nouns_whitelist: HashSet<String>,
    pub contractions_allowed: bool,
    pub morphology: Morphology,
    pub sentence_length_bounds: SentenceLengthBounds,
    pub max_sentences_per_page: usize,
}

impl Default for RuleConfig {
    /// Conservative baseline: terminal punctuation only, no proper
    /// nouns, no contractions, short sentences, two per page.
    fn default() -> Self {
        Self {
            allowed_words: HashSet::new(),
            allowed_punctuation: ['.', '?', '!'].into_iter().collect(),
            disallow_proper_nouns: true,
            proper_nouns_whitelist: HashSet::new(),
            contractions_allowed: false,
            // No inflection suffixes in the baseline; providers opt
            // patterns into "-s"/"-ed"/"-ing" explicitly.
            morphology: Morphology {
                plural_s: false,
                past_ed: false,
                gerund_ing: false,
            },
            sentence_length_bounds: SentenceLengthBounds { min: 3, max: 8 },
            max_sentences_per_page: 2,
        }
    }
}

impl RuleConfig {
    /// Install the approved lexicon, canonicalizing every entry so the
    /// stored-lower-case invariant holds regardless of provider input.
    pub fn with_allowed_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_words = words
            .into_iter()
            .map(|w| canonicalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        self
    }

    /// True when the canonical token is decodable under this config,
    /// either via the approved lexicon or the heart-word whitelist.
    pub fn is_in_scope(&self, canonical: &str) -> bool {
        self.allowed_words.contains(canonical) || self.proper_nouns_whitelist.contains(canonical)
    }

    /// Layer provider overrides on top of this config. Absent fields
    /// keep their current value.
    pub fn merged(mut self, partial: PartialRuleConfig) -> Self {
        if let Some(p) = partial.allowed_punctuation {
            self.allowed_punctuation = p.into_iter().collect();
        }
        if let Some(d) = partial.disallow_proper_nouns {
            self.disallow_proper_nouns = d;
        }
        if let Some(w) = partial.proper_nouns_whitelist {
            self.proper_nouns_whitelist = w
                .into_iter()
                .map(|s| canonicalize(&s))
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(c) = partial.contractions_allowed {
            self.contractions_allowed = c;
        }
        if let Some(m) = partial.morphology {
            self.morphology = m;
        }
        if let Some(b) = partial.sentence_length_bounds {
            self.sentence_length_bounds = b;
        }
        if let Some(n) = partial.max_sentences_per_page {
            self.max_sentences_per_page = n;
        }
        self
    }
}

/// Per-pattern overrides returned by a lexicon provider. Every field is
/// optional; unset fields fall back to the conservative defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialRuleConfig {
    pub allowed_punctuation: Option<Vec<char>>,
    pub disallow_proper_nouns: Option<bool>,
    pub proper_nouns_whitelist: Option<Vec<String>>,
    pub contractions_allowed: Option<bool>,
    pub morphology: Option<Morphology>,
    pub sentence_length_bounds: Option<SentenceLengthBounds>,
    pub max_sentences_per_page: Option<usize>,
}

/// Closed violation taxonomy. `Capitalization` is reserved for a
/// future proper-noun check and is never emitted today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    OutOfScope,
    Morphology,
    Punctuation,
    Capitalization,
    Length,
    Structure,
}

impl ViolationReason {
    /// Wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationReason::OutOfScope => "out_of_scope",
            ViolationReason::Morphology => "morphology",
            ViolationReason::Punctuation => "punctuation",
            ViolationReason::Capitalization => "capitalization",
            ViolationReason::Length => "length",
            ViolationReason::Structure => "structure",
        }
    }
}

/// One detected breach of the constraint set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub page_index: usize,
    /// The offending unit: a canonical word, a sentence, a punctuation
    /// character, or the synthetic `<sentences>` marker.
    pub token: String,
    pub reason: ViolationReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Violation {
    pub fn new(page_index: usize, token: impl Into<String>, reason: ViolationReason) -> Self {
        Self {
            page_index,
            token: token.into(),
            reason,
            span: None,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_span(mut self, span: (usize, usize)) -> Self {
        self.span = Some(span);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_conservative() {
        let rules = RuleConfig::default();
        assert!(rules.allowed_punctuation.contains(&'.'));
        assert!(rules.allowed_punctuation.contains(&'!'));
        assert!(rules.allowed_punctuation.contains(&'?'));
        assert_eq!(rules.allowed_punctuation.len(), 3);
        assert!(rules.disallow_proper_nouns);
        assert!(!rules.contractions_allowed);
        assert!(!rules.morphology.plural_s);
        assert!(!rules.morphology.past_ed);
        assert!(!rules.morphology.gerund_ing);
        assert_eq!(rules.sentence_length_bounds.min, 3);
        assert_eq!(rules.sentence_length_bounds.max, 8);
        assert_eq!(rules.max_sentences_per_page, 2);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let partial = PartialRuleConfig {
            max_sentences_per_page: Some(3),
            ..Default::default()
        };
        let rules = RuleConfig::default().merged(partial);
        assert_eq!(rules.max_sentences_per_page, 3);
        assert_eq!(rules.sentence_length_bounds.max, 8);
        assert!(rules.disallow_proper_nouns);
    }

    #[test]
    fn test_allowed_words_are_canonicalized() {
        let rules = RuleConfig::default().with_allowed_words(["Cat", "  SAT", "mat."]);
        assert!(rules.is_in_scope("cat"));
        assert!(rules.is_in_scope("sat"));
        assert!(rules.is_in_scope("mat"));
        assert!(!rules.is_in_scope("dog"));
    }

    #[test]
    fn test_whitelist_counts_as_in_scope() {
        let partial = PartialRuleConfig {
            proper_nouns_whitelist: Some(vec!["Sam".to_string()]),
            ..Default::default()
        };
        let rules = RuleConfig::default()
            .with_allowed_words(["cat"])
            .merged(partial);
        assert!(rules.is_in_scope("sam"));
    }

    #[test]
    fn test_reason_wire_names() {
        let json = serde_json::to_string(&ViolationReason::OutOfScope).unwrap();
        assert_eq!(json, "\"out_of_scope\"");
        let json = serde_json::to_string(&ViolationReason::Morphology).unwrap();
        assert_eq!(json, "\"morphology\"");
    }
}
