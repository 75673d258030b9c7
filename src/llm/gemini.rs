// src/llm/gemini.rs
// Gemini generateContent backend for the story collaborator
//
// Plain REST via reqwest; no streaming, no tools. I/O failures and
// malformed responses propagate as errors and abort the compile.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CONFIG;
use crate::llm::{OutlineRequest, RepairStrategy, StoryCollaborator};
use crate::prompt::{build_draft_page_prompt, build_outline_prompt, build_repair_prompt};
use crate::rules::{RuleConfig, Violation};

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY not set")]
    MissingApiKey,

    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Gemini returned no candidate text")]
    EmptyResponse,

    #[error("unparseable outline: {raw}")]
    OutlineParse { raw: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub struct GeminiCollaborator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

// ============================================================================
// API types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiTextPart>,
}

#[derive(Serialize)]
struct GeminiTextPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

// ============================================================================
// Outline parsing
// ============================================================================

/// Result of parsing an outline response. Failure keeps the raw text so
/// callers can surface it instead of substituting a zeroed default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineParse {
    Parsed(Vec<String>),
    Failed { raw: String },
}

static PAGE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Page\s*(\d+)\s*:\s*(.*)$").expect("valid regex"));

/// Parse `Page N: bullet` lines into exactly `page_count` bullets.
/// Unnumbered non-empty lines fill remaining slots in order; short
/// responses are padded with a placeholder bullet. A response with no
/// usable lines at all is a parse failure.
pub fn parse_outline(text: &str, page_count: usize) -> OutlineParse {
    let mut slots: Vec<Option<String>> = vec![None; page_count];
    let mut next_free = 0usize;
    let mut any = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = PAGE_LINE.captures(line) {
            let n: usize = caps[1].parse().unwrap_or(0);
            if n >= 1 && n <= page_count {
                slots[n - 1] = Some(caps[2].trim().to_string());
                any = true;
            }
        } else if next_free < page_count {
            while next_free < page_count && slots[next_free].is_some() {
                next_free += 1;
            }
            if next_free < page_count {
                slots[next_free] = Some(line.to_string());
                next_free += 1;
                any = true;
            }
        }
    }

    if !any {
        return OutlineParse::Failed { raw: text.to_string() };
    }

    let bullets = slots
        .into_iter()
        .map(|s| s.unwrap_or_else(|| "(outline)".to_string()))
        .collect();
    OutlineParse::Parsed(bullets)
}

// ============================================================================
// Collaborator implementation
// ============================================================================

impl GeminiCollaborator {
    pub fn from_env() -> Result<Self, GeminiError> {
        let api_key = CONFIG
            .gemini_api_key
            .clone()
            .ok_or(GeminiError::MissingApiKey)?;
        Ok(Self {
            client: Client::new(),
            api_key,
            model: CONFIG.gemini_model.clone(),
            base_url: CONFIG.gemini_base_url.clone(),
        })
    }

    async fn generate(&self, prompt: String) -> Result<String, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiTextPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| "<no body>".to_string());
            return Err(GeminiError::Api { status, body });
        }

        let parsed: GeminiResponse = response.json().await?;
        let text = first_candidate_text(parsed).ok_or(GeminiError::EmptyResponse)?;

        debug!(model = %self.model, chars = text.len(), "gemini response");
        Ok(text)
    }
}

/// Text of the first candidate, if it has any.
fn first_candidate_text(response: GeminiResponse) -> Option<String> {
    response
        .candidates
        .and_then(|c| c.into_iter().next())
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|t| !t.trim().is_empty())
}

#[async_trait]
impl StoryCollaborator for GeminiCollaborator {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn outline(&self, request: &OutlineRequest) -> Result<Vec<String>> {
        let prompt = build_outline_prompt(request);
        let text = self.generate(prompt).await?;
        match parse_outline(&text, request.page_count) {
            OutlineParse::Parsed(bullets) => Ok(bullets),
            OutlineParse::Failed { raw } => {
                warn!(pages = request.page_count, "outline response did not parse");
                Err(GeminiError::OutlineParse { raw }.into())
            }
        }
    }

    async fn draft_page(
        &self,
        outline_bullet: &str,
        allowed_words: &[String],
        rules: &RuleConfig,
    ) -> Result<String> {
        let prompt = build_draft_page_prompt(outline_bullet, allowed_words, rules);
        let text = self.generate(prompt).await?;
        Ok(collapse_whitespace(&text))
    }

    async fn repair_page(
        &self,
        original_text: &str,
        violations: &[Violation],
        allowed_words: &[String],
        _rules: &RuleConfig,
        strategy: RepairStrategy,
    ) -> Result<String> {
        let prompt = build_repair_prompt(original_text, violations, allowed_words, strategy);
        let text = self.generate(prompt).await?;
        Ok(collapse_whitespace(&text))
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
