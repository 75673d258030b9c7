// src/validator.rs
// Deterministic decodability validator: text + rule config -> violations
//
// Pure and infallible. An all-clear result is an empty vec, never an
// error. Violations are emitted in a fixed order per page: structure,
// sentence length, token scope/morphology, punctuation.

use crate::canon::{canonicalize, tokenize};
use crate::rules::{RuleConfig, Violation, ViolationReason};
use crate::story::Story;

/// Synthetic token used for page-level structure violations.
pub const SENTENCES_TOKEN: &str = "<sentences>";

/// Marker the repair collaborator writes for tokens it cannot fix with
/// the allowed lexicon.
pub const UNKNOWN_TOKEN: &str = "[UNK]";

/// Validate one page of text against the resolved constraint set.
pub fn validate_page(text: &str, rules: &RuleConfig, page_index: usize) -> Vec<Violation> {
    let mut out = Vec::new();

    // Structure: sentence count bounds.
    let sentences = split_sentences(text);
    if sentences.len() > rules.max_sentences_per_page {
        out.push(
            Violation::new(page_index, SENTENCES_TOKEN, ViolationReason::Structure)
                .with_note("too many sentences"),
        );
    } else if sentences.is_empty() && !text.trim().is_empty() {
        out.push(
            Violation::new(page_index, SENTENCES_TOKEN, ViolationReason::Structure)
                .with_note("no terminated sentence"),
        );
    }

    // Length: tokens per sentence, inclusive bounds.
    for sentence in &sentences {
        let len = sentence.split_whitespace().count();
        if len < rules.sentence_length_bounds.min || len > rules.sentence_length_bounds.max {
            out.push(Violation::new(
                page_index,
                sentence.clone(),
                ViolationReason::Length,
            ));
        }
    }

    // Token scope and morphology. Both checks are independent and may
    // fire for the same token.
    for token in tokenize(text) {
        let canon = canonicalize(&token.raw);
        if canon.is_empty() {
            continue;
        }
        if !rules.is_in_scope(&canon) {
            out.push(
                Violation::new(page_index, canon.clone(), ViolationReason::OutOfScope)
                    .with_span(token.span),
            );
        }
        if let Some(suffix) = disallowed_suffix(&canon, rules) {
            out.push(
                Violation::new(page_index, canon.clone(), ViolationReason::Morphology)
                    .with_span(token.span)
                    .with_note(format!("-{suffix} inflection not allowed")),
            );
        }
    }

    // Punctuation: any non-alphanumeric, non-whitespace character must
    // be in the allowed set.
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() || ch.is_whitespace() {
            continue;
        }
        if !rules.allowed_punctuation.contains(&ch) {
            out.push(Violation::new(
                page_index,
                ch.to_string(),
                ViolationReason::Punctuation,
            ));
        }
    }

    out
}

/// Validate every page, concatenating results in page order.
pub fn validate_story(story: &Story, rules: &RuleConfig) -> Vec<Violation> {
    story
        .pages
        .iter()
        .flat_map(|p| validate_page(&p.text, rules, p.index))
        .collect()
}

/// Reduced pass/fail projection used by callers that only need a
/// boolean plus the out-of-lexicon words. Agrees with the full
/// contract: `valid` is true iff `validate_story` returns nothing.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidationSummary {
    pub valid: bool,
    pub issues: Vec<String>,
    pub offending_words: Vec<String>,
}

pub fn summarize_story(story: &Story, rules: &RuleConfig) -> ValidationSummary {
    let violations = validate_story(story, rules);
    let mut issues = Vec::new();
    let mut offending = Vec::new();
    for v in &violations {
        issues.push(match &v.note {
            Some(note) => format!(
                "page {}: {} '{}' ({})",
                v.page_index + 1,
                reason_label(v.reason),
                v.token,
                note
            ),
            None => format!(
                "page {}: {} '{}'",
                v.page_index + 1,
                reason_label(v.reason),
                v.token
            ),
        });
        if v.reason == ViolationReason::OutOfScope && !offending.contains(&v.token) {
            offending.push(v.token.clone());
        }
    }
    ValidationSummary {
        valid: violations.is_empty(),
        issues,
        offending_words: offending,
    }
}

fn reason_label(reason: ViolationReason) -> &'static str {
    match reason {
        ViolationReason::OutOfScope => "out-of-scope word",
        ViolationReason::Morphology => "disallowed inflection",
        ViolationReason::Punctuation => "disallowed punctuation",
        ViolationReason::Capitalization => "capitalization",
        ViolationReason::Length => "sentence length out of bounds",
        ViolationReason::Structure => "sentence structure",
    }
}

/// Split on runs of sentence-terminal punctuation, dropping empty
/// fragments.
fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Returns the disallowed inflectional suffix of a canonical token, if
/// any. A suffix only counts when a letter precedes it, so bare "s" or
/// "ing" never fire.
fn disallowed_suffix(canon: &str, rules: &RuleConfig) -> Option<&'static str> {
    let m = &rules.morphology;
    if !m.gerund_ing && ends_with_after_letter(canon, "ing") {
        return Some("ing");
    }
    if !m.past_ed && ends_with_after_letter(canon, "ed") {
        return Some("ed");
    }
    if !m.plural_s && ends_with_after_letter(canon, "s") {
        return Some("s");
    }
    None
}

fn ends_with_after_letter(canon: &str, suffix: &str) -> bool {
    canon
        .strip_suffix(suffix)
        .and_then(|stem| stem.chars().next_back())
        .is_some_and(|c| c.is_ascii_lowercase())
}
