// src/prompt.rs
// Prompt builders for the generation collaborator
//
// Pure string assembly. The collaborator backends own model invocation;
// these builders own the wording of the constraint contract.

use crate::llm::{OutlineRequest, RepairStrategy};
use crate::rules::{RuleConfig, Violation};
use crate::validator::UNKNOWN_TOKEN;

pub fn build_outline_prompt(request: &OutlineRequest) -> String {
    [
        "You are a decodable outline planner for early readers. Use only concepts expressible with allowed words.".to_string(),
        format!("Title: {}", request.title),
        format!("Theme: {}", request.theme),
        format!("Pattern: {}", request.pattern_id),
        format!("Pages: {}", request.page_count),
        format!(
            "Allowed sample (representative only): {}",
            request.sample_allowed.join(", ")
        ),
        format!(
            "Produce exactly {} bullets, one per page, 5-12 words each, no commas. Format:",
            request.page_count
        ),
        "Page 1: ...".to_string(),
        "Page 2: ...".to_string(),
    ]
    .join("\n")
}

pub fn build_draft_page_prompt(
    outline_bullet: &str,
    allowed_words: &[String],
    rules: &RuleConfig,
) -> String {
    [
        "You write decodable page text. If a word is not in ALLOWED_WORDS, do not invent a synonym. Use only ALLOWED_WORDS.".to_string(),
        format!("ALLOWED_WORDS: {}", allowed_words.join(", ")),
        format!(
            "Constraints: sentences {}; tokens per sentence {}-{}; punctuation: {}; proper nouns: {}.",
            rules.max_sentences_per_page,
            rules.sentence_length_bounds.min,
            rules.sentence_length_bounds.max,
            punctuation_list(rules),
            if rules.disallow_proper_nouns { "disallowed" } else { "allowed" }
        ),
        format!("Outline: {outline_bullet}"),
        "Output: page text only. No explanations.".to_string(),
    ]
    .join("\n")
}

pub fn build_repair_prompt(
    original_text: &str,
    violations: &[Violation],
    allowed_words: &[String],
    strategy: RepairStrategy,
) -> String {
    match strategy {
        RepairStrategy::Minimal => {
            let listed = violations
                .iter()
                .map(|v| format!("token=\"{}\", reason=\"{}\"", v.token, v.reason.as_str()))
                .collect::<Vec<_>>()
                .join("\n");
            [
                "You are a repair agent. Replace only offending tokens. Keep all other tokens intact.".to_string(),
                format!("Original: {original_text}"),
                format!("Violations:\n{listed}"),
                format!("ALLOWED_WORDS: {}", allowed_words.join(", ")),
                format!(
                    "If any token is not repairable with ALLOWED_WORDS, write {UNKNOWN_TOKEN} in its place."
                ),
                "Output: repaired page text only.".to_string(),
            ]
            .join("\n")
        }
        RepairStrategy::Rewrite => [
            "Rewrite the page under the same constraints; prioritize clarity and decodability.".to_string(),
            format!("Original: {original_text}"),
            format!("ALLOWED_WORDS: {}", allowed_words.join(", ")),
            "Output: final page text only.".to_string(),
        ]
        .join("\n"),
    }
}

fn punctuation_list(rules: &RuleConfig) -> String {
    let mut chars: Vec<char> = rules.allowed_punctuation.iter().copied().collect();
    chars.sort_unstable();
    chars
        .into_iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ViolationReason;

    fn request() -> OutlineRequest {
        OutlineRequest {
            title: "Make a Cake".into(),
            theme: "baking together".into(),
            pattern_id: "cvce-long-a".into(),
            page_count: 3,
            sample_allowed: vec!["make".into(), "bake".into()],
        }
    }

    #[test]
    fn test_outline_prompt_names_page_count_and_sample() {
        let prompt = build_outline_prompt(&request());
        assert!(prompt.contains("Pages: 3"));
        assert!(prompt.contains("exactly 3 bullets"));
        assert!(prompt.contains("make, bake"));
    }

    #[test]
    fn test_draft_prompt_carries_constraints() {
        let rules = RuleConfig::default();
        let prompt = build_draft_page_prompt("a cake", &["make".into()], &rules);
        assert!(prompt.contains("tokens per sentence 3-8"));
        assert!(prompt.contains("proper nouns: disallowed"));
        assert!(prompt.contains("Outline: a cake"));
    }

    #[test]
    fn test_minimal_repair_prompt_lists_violations_and_unk() {
        let violations = vec![Violation::new(0, "dog", ViolationReason::OutOfScope)];
        let prompt =
            build_repair_prompt("The dog sat.", &violations, &["cat".into()], RepairStrategy::Minimal);
        assert!(prompt.contains("token=\"dog\", reason=\"out_of_scope\""));
        assert!(prompt.contains(UNKNOWN_TOKEN));
        assert!(prompt.contains("Replace only offending tokens"));
    }

    #[test]
    fn test_rewrite_repair_prompt_is_full_regeneration() {
        let prompt = build_repair_prompt("The dog sat.", &[], &["cat".into()], RepairStrategy::Rewrite);
        assert!(prompt.contains("Rewrite the page"));
        assert!(!prompt.contains("Replace only offending tokens"));
    }
}
