// src/compile.rs
// Compile orchestrator: resolve constraints, draft, validate, repair
//
// Never fails on a constraint violation; only collaborator/provider I/O
// errors abort a compile. The report is authoritative: callers must
// check it before trusting the story's decodability.

use anyhow::Result;
use tracing::info;

use crate::author::draft_story;
use crate::llm::StoryCollaborator;
use crate::provider::LexiconProvider;
use crate::repair::repair_story;
use crate::rules::{PartialRuleConfig, RuleConfig, SentenceLengthBounds};
use crate::story::{CompileResult, DraftOptions, PageReport};
use crate::validator::validate_story;
use crate::wordbank::Wordbank;

/// Resolve the constraint set for this compile pass: conservative
/// defaults, then provider overrides, then caller overrides. The result
/// is immutable for the whole pass.
fn resolve_rules(
    partial: PartialRuleConfig,
    allowed_words: &[String],
    opts: &DraftOptions,
) -> RuleConfig {
    let mut rules = RuleConfig::default()
        .merged(partial)
        .with_allowed_words(allowed_words);
    if let Some(n) = opts.max_sentences_per_page {
        rules.max_sentences_per_page = n;
    }
    if let Some((min, max)) = opts.sentence_length_bounds {
        rules.sentence_length_bounds = SentenceLengthBounds { min, max };
    }
    if let Some(extra) = &opts.whitelist {
        for word in extra {
            let canon = crate::canon::canonicalize(word);
            if !canon.is_empty() {
                rules.proper_nouns_whitelist.insert(canon);
            }
        }
    }
    rules
}

pub async fn compile_story_text(
    ai: &dyn StoryCollaborator,
    provider: &dyn LexiconProvider,
    wordbank: &Wordbank,
    opts: &DraftOptions,
    max_attempts_per_page: usize,
) -> Result<CompileResult> {
    let partial = wordbank.rule_config(provider, &opts.pattern_id).await?;
    let allowed_words = wordbank.approved_words(provider, &opts.pattern_id).await?;
    let rules = resolve_rules(partial, &allowed_words, opts);
    info!(
        pattern_id = %opts.pattern_id,
        lexicon = rules.allowed_words.len(),
        "constraints resolved"
    );

    let story = draft_story(ai, opts, &allowed_words, &rules).await?;

    // Single whole-document validation: a clean draft short-circuits
    // with a zero-attempt report and never touches the repair loop.
    let first_violations = validate_story(&story, &rules);
    if first_violations.is_empty() {
        info!("draft is compliant, no repair needed");
        let report = story
            .pages
            .iter()
            .map(|p| PageReport {
                page_index: p.index,
                attempts: 0,
                violations: Vec::new(),
            })
            .collect();
        return Ok(CompileResult { story, report });
    }

    info!(violations = first_violations.len(), "draft violates constraints, repairing");
    let (story, report) =
        repair_story(ai, story, &allowed_words, &rules, max_attempts_per_page).await?;
    Ok(CompileResult { story, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_overrides_win_over_provider() {
        let partial = PartialRuleConfig {
            max_sentences_per_page: Some(2),
            ..Default::default()
        };
        let mut opts = DraftOptions::new("t", "t", "p", 1);
        opts.max_sentences_per_page = Some(4);
        opts.whitelist = Some(vec!["Sam".to_string()]);

        let rules = resolve_rules(partial, &["cat".to_string()], &opts);
        assert_eq!(rules.max_sentences_per_page, 4);
        assert!(rules.is_in_scope("sam"));
        assert!(rules.is_in_scope("cat"));
    }

    #[test]
    fn test_provider_partial_layers_over_defaults() {
        let partial = PartialRuleConfig {
            sentence_length_bounds: Some(SentenceLengthBounds { min: 2, max: 5 }),
            ..Default::default()
        };
        let opts = DraftOptions::new("t", "t", "p", 1);
        let rules = resolve_rules(partial, &[], &opts);
        assert_eq!(rules.sentence_length_bounds.min, 2);
        assert_eq!(rules.sentence_length_bounds.max, 5);
        assert_eq!(rules.max_sentences_per_page, 2);
    }
}
