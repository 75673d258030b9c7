// src/llm/scripted.rs
// Deterministic offline collaborator for tests and the CLI's
// `--backend scripted` mode. No model calls; output is derived from the
// allowed-word list so small lexicons still produce valid pages.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::canon::tokenize;
use crate::llm::{OutlineRequest, RepairStrategy, StoryCollaborator};
use crate::rules::{RuleConfig, Violation};
use crate::validator::UNKNOWN_TOKEN;

pub struct ScriptedCollaborator;

impl ScriptedCollaborator {
    /// Build one terminated sentence from the first usable allowed
    /// words, sized to the lower length bound.
    fn stock_sentence(allowed_words: &[String], rules: &RuleConfig) -> String {
        let want = rules.sentence_length_bounds.min.max(3);
        let mut picked: Vec<&str> = Vec::with_capacity(want);
        for w in allowed_words {
            if picked.len() == want {
                break;
            }
            picked.push(w.as_str());
        }
        while picked.len() < want {
            picked.push("a");
        }
        let mut line = picked.join(" ");
        if let Some(first) = line.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        format!("{line}.")
    }
}

#[async_trait]
impl StoryCollaborator for ScriptedCollaborator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn outline(&self, request: &OutlineRequest) -> Result<Vec<String>> {
        debug!(pages = request.page_count, "scripted outline");
        Ok((1..=request.page_count)
            .map(|n| format!("Page {n} about {}", request.theme))
            .collect())
    }

    async fn draft_page(
        &self,
        outline_bullet: &str,
        allowed_words: &[String],
        rules: &RuleConfig,
    ) -> Result<String> {
        debug!(outline_bullet, "scripted draft");
        Ok(Self::stock_sentence(allowed_words, rules))
    }

    async fn repair_page(
        &self,
        original_text: &str,
        violations: &[Violation],
        allowed_words: &[String],
        rules: &RuleConfig,
        strategy: RepairStrategy,
    ) -> Result<String> {
        debug!(strategy = strategy.as_str(), "scripted repair");
        match strategy {
            RepairStrategy::Rewrite => Ok(Self::stock_sentence(allowed_words, rules)),
            RepairStrategy::Minimal => {
                // Surgical: splice a replacement over each flagged
                // token's span, keeping every other byte (whitespace
                // included) identical. Edge punctuation on the token
                // is preserved around the replacement.
                let replacement = allowed_words
                    .first()
                    .map(|w| w.as_str())
                    .unwrap_or(UNKNOWN_TOKEN);
                let flagged: HashSet<&str> =
                    violations.iter().map(|v| v.token.as_str()).collect();

                let mut out = String::with_capacity(original_text.len());
                let mut cursor = 0;
                for t in tokenize(original_text) {
                    out.push_str(&original_text[cursor..t.span.0]);
                    let canon = crate::canon::canonicalize(&t.raw);
                    if !canon.is_empty() && flagged.contains(canon.as_str()) {
                        let core_start =
                            t.raw.find(|c: char| c.is_alphanumeric()).unwrap_or(0);
                        let core_end = t
                            .raw
                            .rfind(|c: char| c.is_alphanumeric())
                            .map(|i| i + t.raw[i..].chars().next().map_or(1, char::len_utf8))
                            .unwrap_or(t.raw.len());
                        out.push_str(&t.raw[..core_start]);
                        out.push_str(replacement);
                        out.push_str(&t.raw[core_end..]);
                    } else {
                        out.push_str(&t.raw);
                    }
                    cursor = t.span.1;
                }
                out.push_str(&original_text[cursor..]);
                Ok(out)
            }
        }
    }
}
