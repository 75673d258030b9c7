// src/author.rs
// Drafter: outline the story, then draft each page in index order
//
// Assembly only; validation happens downstream. Pages are logically
// independent once the outline exists, so the sequential loop here is a
// default, not a requirement.

use anyhow::Result;
use tracing::{info, warn};

use crate::llm::{OutlineRequest, StoryCollaborator};
use crate::rules::RuleConfig;
use crate::story::{DraftOptions, Page, Story};

/// Cap on allowed words included in the outline prompt; representative
/// sample, not the full lexicon.
const OUTLINE_SAMPLE_SIZE: usize = 60;

pub async fn draft_story(
    ai: &dyn StoryCollaborator,
    opts: &DraftOptions,
    allowed_words: &[String],
    rules: &RuleConfig,
) -> Result<Story> {
    let request = OutlineRequest {
        title: opts.title.clone(),
        theme: opts.theme.clone(),
        pattern_id: opts.pattern_id.clone(),
        page_count: opts.page_count,
        sample_allowed: allowed_words
            .iter()
            .take(OUTLINE_SAMPLE_SIZE)
            .cloned()
            .collect(),
    };

    let outline = ai.outline(&request).await?;
    if outline.len() != opts.page_count {
        // The collaborator contract says exactly page_count bullets;
        // tolerate drift by drafting missing pages from an empty bullet.
        warn!(
            expected = opts.page_count,
            got = outline.len(),
            "outline length mismatch"
        );
    }
    info!(
        backend = ai.name(),
        pages = opts.page_count,
        pattern_id = %opts.pattern_id,
        "outline complete"
    );

    let mut pages = Vec::with_capacity(opts.page_count);
    for i in 0..opts.page_count {
        let bullet = outline.get(i).map(String::as_str).unwrap_or("");
        let text = ai.draft_page(bullet, allowed_words, rules).await?;
        pages.push(Page { index: i, text });
    }
    info!(pages = pages.len(), "draft complete");

    Ok(Story {
        title: opts.title.clone(),
        theme: opts.theme.clone(),
        pattern_id: opts.pattern_id.clone(),
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedCollaborator;

    #[tokio::test]
    async fn test_draft_assigns_stable_indices() {
        let opts = DraftOptions::new("Cat Nap", "a cat naps", "cvc-short-a", 3);
        let words: Vec<String> = ["the", "cat", "sat", "on", "mat"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let rules = RuleConfig::default();

        let story = draft_story(&ScriptedCollaborator, &opts, &words, &rules)
            .await
            .unwrap();
        assert_eq!(story.pages.len(), 3);
        for (i, page) in story.pages.iter().enumerate() {
            assert_eq!(page.index, i);
            assert!(!page.text.is_empty());
        }
        assert_eq!(story.pattern_id, "cvc-short-a");
    }
}
