// src/llm/mod.rs
// Generation collaborator interface and backends

pub mod gemini;
pub mod scripted;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::rules::{RuleConfig, Violation};

pub use gemini::GeminiCollaborator;
pub use scripted::ScriptedCollaborator;

/// How a violating page gets corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStrategy {
    /// Replace only flagged tokens, leaving everything else intact.
    Minimal,
    /// Regenerate the whole page under the same constraints.
    Rewrite,
}

impl RepairStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStrategy::Minimal => "minimal",
            RepairStrategy::Rewrite => "rewrite",
        }
    }
}

/// Inputs for requesting a story outline.
#[derive(Debug, Clone)]
pub struct OutlineRequest {
    pub title: String,
    pub theme: String,
    pub pattern_id: String,
    pub page_count: usize,
    /// Representative sample of allowed words for prompting, not the
    /// full lexicon.
    pub sample_allowed: Vec<String>,
}

/// Text-generation collaborator. The core depends only on this
/// contract; backends may be a real model or a deterministic script.
///
/// Implementations must return exactly `page_count` outline bullets,
/// padding or truncating as needed.
#[async_trait]
pub trait StoryCollaborator: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    async fn outline(&self, request: &OutlineRequest) -> Result<Vec<String>>;

    async fn draft_page(
        &self,
        outline_bullet: &str,
        allowed_words: &[String],
        rules: &RuleConfig,
    ) -> Result<String>;

    async fn repair_page(
        &self,
        original_text: &str,
        violations: &[Violation],
        allowed_words: &[String],
        rules: &RuleConfig,
        strategy: RepairStrategy,
    ) -> Result<String>;
}
