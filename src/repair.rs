// src/repair.rs
// Per-page repair orchestrator
//
// Each page runs an independent stage machine:
//   Drafted -> Violating -> ... -> Accepted | Exhausted
// Attempt 0 uses the minimal strategy (surgical token replacement);
// every later attempt escalates to a full rewrite. Exhaustion is a
// reported outcome, never an error.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::llm::{RepairStrategy, StoryCollaborator};
use crate::rules::{RuleConfig, Violation};
use crate::story::{PageReport, Story};
use crate::validator::validate_page;

/// Default repair ceiling; production runs with up to 3.
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

/// Typed stage of one page moving through repair.
#[derive(Debug)]
enum PageStage {
    Violating {
        text: String,
        violations: Vec<Violation>,
        attempts: usize,
    },
    Accepted {
        text: String,
        attempts: usize,
    },
    Exhausted {
        text: String,
        violations: Vec<Violation>,
        attempts: usize,
    },
}

impl PageStage {
    fn start(text: String, page_index: usize, rules: &RuleConfig) -> Self {
        let violations = validate_page(&text, rules, page_index);
        if violations.is_empty() {
            PageStage::Accepted { text, attempts: 0 }
        } else {
            PageStage::Violating { text, violations, attempts: 0 }
        }
    }

    fn is_terminal(&self) -> bool {
        !matches!(self, PageStage::Violating { .. })
    }
}

/// Run one repair attempt, advancing the stage machine.
async fn step(
    ai: &dyn StoryCollaborator,
    stage: PageStage,
    page_index: usize,
    allowed_words: &[String],
    rules: &RuleConfig,
    max_attempts: usize,
) -> Result<PageStage> {
    let PageStage::Violating { text, violations, attempts } = stage else {
        return Ok(stage);
    };

    // Ceiling guard comes first: a ceiling of N means at most N
    // collaborator calls, so zero means none at all.
    if attempts >= max_attempts {
        return Ok(PageStage::Exhausted { text, violations, attempts });
    }

    let strategy = if attempts == 0 {
        RepairStrategy::Minimal
    } else {
        RepairStrategy::Rewrite
    };
    debug!(
        page_index,
        attempt = attempts + 1,
        strategy = strategy.as_str(),
        outstanding = violations.len(),
        "repair attempt"
    );

    let repaired = ai
        .repair_page(&text, &violations, allowed_words, rules, strategy)
        .await?;
    let attempts = attempts + 1;
    let violations = validate_page(&repaired, rules, page_index);

    if violations.is_empty() {
        Ok(PageStage::Accepted { text: repaired, attempts })
    } else if attempts >= max_attempts {
        Ok(PageStage::Exhausted { text: repaired, violations, attempts })
    } else {
        Ok(PageStage::Violating { text: repaired, violations, attempts })
    }
}

/// Repair every violating page in place, re-validating after each
/// attempt. Returns the best-attempt story plus one report entry per
/// page in page order.
pub async fn repair_story(
    ai: &dyn StoryCollaborator,
    story: Story,
    allowed_words: &[String],
    rules: &RuleConfig,
    max_attempts: usize,
) -> Result<(Story, Vec<PageReport>)> {
    let mut repaired = story;
    let mut report = Vec::with_capacity(repaired.pages.len());

    for page in &mut repaired.pages {
        let mut stage = PageStage::start(std::mem::take(&mut page.text), page.index, rules);
        while !stage.is_terminal() {
            stage = step(ai, stage, page.index, allowed_words, rules, max_attempts).await?;
        }

        let entry = match stage {
            PageStage::Accepted { text, attempts } => {
                info!(page_index = page.index, attempts, "page accepted");
                page.text = text;
                PageReport { page_index: page.index, attempts, violations: Vec::new() }
            }
            PageStage::Exhausted { text, violations, attempts } => {
                warn!(
                    page_index = page.index,
                    attempts,
                    outstanding = violations.len(),
                    "repair exhausted"
                );
                page.text = text;
                PageReport { page_index: page.index, attempts, violations }
            }
            PageStage::Violating { .. } => unreachable!("loop exits only on terminal stages"),
        };
        report.push(entry);
    }

    Ok((repaired, report))
}
