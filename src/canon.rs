// src/canon.rs
// Tokenization and canonical word forms
//
// Canonicalization is total: it never fails, and a token that strips
// down to nothing is punctuation-only and skipped by callers. It is
// also idempotent, which the allowed-word membership contract relies on.

use unicode_normalization::UnicodeNormalization;

/// A whitespace-delimited token with its byte span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub raw: String,
    pub span: (usize, usize),
}

/// Split on whitespace runs, preserving each literal substring and its
/// byte offsets.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(Token {
                    raw: text[s..i].to_string(),
                    span: (s, i),
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            raw: text[s..].to_string(),
            span: (s, text.len()),
        });
    }
    tokens
}

/// Canonical form of a token: NFKC fold, smart quotes and dashes mapped
/// to ASCII, leading/trailing non-letters stripped, lower-cased.
pub fn canonicalize(token: &str) -> String {
    let folded: String = token
        .nfkc()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}' => '"',
            '\u{2014}' | '\u{2013}' => '-',
            other => other,
        })
        .collect();

    folded
        .trim_matches(|c: char| !c.is_alphabetic())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("The cat  sat");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].raw, "The");
        assert_eq!(tokens[0].span, (0, 3));
        assert_eq!(tokens[1].raw, "cat");
        assert_eq!(tokens[1].span, (4, 7));
        assert_eq!(tokens[2].raw, "sat");
        assert_eq!(tokens[2].span, (9, 12));
    }

    #[test]
    fn test_tokenize_empty_and_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_canonicalize_strips_and_lowercases() {
        assert_eq!(canonicalize("Cat."), "cat");
        assert_eq!(canonicalize("\"Mat!\""), "mat");
        assert_eq!(canonicalize("—sat—"), "sat");
        assert_eq!(canonicalize("\u{201C}Ran\u{201D}"), "ran");
    }

    #[test]
    fn test_canonicalize_punctuation_only_is_empty() {
        assert_eq!(canonicalize("..."), "");
        assert_eq!(canonicalize("—"), "");
        assert_eq!(canonicalize("123"), "");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for raw in ["Cat.", "\u{2018}don't\u{2019}", "—well—", "MAT", "ſat", "ﬁt"] {
            let once = canonicalize(raw);
            assert_eq!(canonicalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_canonicalize_nfkc_compatibility_forms() {
        // Fullwidth letters fold to ASCII under NFKC.
        assert_eq!(canonicalize("ＣＡＴ"), "cat");
    }

    #[test]
    fn test_interior_punctuation_survives() {
        // Only edge characters are stripped; contractions keep their
        // apostrophe for the punctuation scan to judge.
        assert_eq!(canonicalize("don't"), "don't");
    }
}
