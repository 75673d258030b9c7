// tests/validator_scenarios.rs
// End-to-end validator behavior over the public API

use phonica::rules::Morphology;
use phonica::{
    Page, RuleConfig, Story, ViolationReason, summarize_story, validate_page, validate_story,
};

fn mat_rules() -> RuleConfig {
    let mut rules = RuleConfig::default().with_allowed_words(["the", "cat", "sat", "on", "mat"]);
    rules.allowed_punctuation = ['.'].into_iter().collect();
    rules.max_sentences_per_page = 1;
    rules
}

#[test]
fn scenario_a_clean_page() {
    let violations = validate_page("The cat sat on the mat.", &mat_rules(), 0);
    assert!(violations.is_empty());
}

#[test]
fn scenario_b_single_out_of_scope_word() {
    let violations = validate_page("The dog sat on the mat.", &mat_rules(), 0);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].reason, ViolationReason::OutOfScope);
    assert_eq!(violations[0].token, "dog");
}

#[test]
fn scenario_c_dual_fire_scope_and_morphology() {
    let mut rules = RuleConfig::default().with_allowed_words(["cat", "sat"]);
    rules.sentence_length_bounds.min = 1;
    rules.morphology = Morphology {
        plural_s: false,
        past_ed: false,
        gerund_ing: false,
    };

    let violations = validate_page("Cats sat.", &rules, 0);
    let reasons: Vec<_> = violations
        .iter()
        .filter(|v| v.token == "cats")
        .map(|v| v.reason)
        .collect();
    assert!(reasons.contains(&ViolationReason::OutOfScope));
    assert!(reasons.contains(&ViolationReason::Morphology));
    assert_eq!(reasons.len(), 2);
}

#[test]
fn scenario_d_semicolon_flagged() {
    let rules = RuleConfig::default().with_allowed_words(["the", "cat", "sat", "on", "mat"]);
    let violations = validate_page("The cat sat; on the mat.", &rules, 0);
    let punct: Vec<_> = violations
        .iter()
        .filter(|v| v.reason == ViolationReason::Punctuation)
        .collect();
    assert_eq!(punct.len(), 1);
    assert_eq!(punct[0].token, ";");
}

#[test]
fn story_results_concatenate_in_page_order() {
    let story = Story {
        title: "Cat Nap".into(),
        theme: "a cat naps".into(),
        pattern_id: "cvc-short-a".into(),
        pages: vec![
            Page { index: 0, text: "The cat sat on the mat.".into() },
            Page { index: 1, text: "The dog sat on the mat.".into() },
            Page { index: 2, text: "The fox sat on the mat.".into() },
        ],
    };
    let violations = validate_story(&story, &mat_rules());
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].page_index, 1);
    assert_eq!(violations[0].token, "dog");
    assert_eq!(violations[1].page_index, 2);
    assert_eq!(violations[1].token, "fox");
}

#[test]
fn summary_is_a_faithful_projection() {
    let story = Story {
        title: "Cat Nap".into(),
        theme: "a cat naps".into(),
        pattern_id: "cvc-short-a".into(),
        pages: vec![
            Page { index: 0, text: "The dog sat on the mat.".into() },
            Page { index: 1, text: "The dog sat on the dog.".into() },
        ],
    };
    let rules = mat_rules();
    let summary = summarize_story(&story, &rules);
    let full = validate_story(&story, &rules);

    assert_eq!(summary.valid, full.is_empty());
    // Out-of-lexicon words are the union across pages, deduplicated.
    assert_eq!(summary.offending_words, vec!["dog".to_string()]);
    assert_eq!(summary.issues.len(), full.len());
}

#[test]
fn violation_report_serializes_with_taxonomy_names() {
    let violations = validate_page("The dog sat on the mat.", &mat_rules(), 0);
    let json = serde_json::to_value(&violations).unwrap();
    assert_eq!(json[0]["reason"], "out_of_scope");
    assert_eq!(json[0]["token"], "dog");
    assert_eq!(json[0]["page_index"], 0);
}
