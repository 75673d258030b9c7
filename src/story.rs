// src/story.rs
// Core data types for the decodable story pipeline

use serde::{Deserialize, Serialize};

use crate::rules::Violation;

/// A multi-page story draft produced by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub theme: String,
    pub pattern_id: String,
    pub pages: Vec<Page>,
}

/// One page of story text. `index` is assigned at draft time (0-based)
/// and stays stable across repairs; only `text` is ever rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    pub text: String,
}

/// Caller-supplied options for a compile run.
#[derive(Debug, Clone)]
pub struct DraftOptions {
    pub title: String,
    pub theme: String,
    pub pattern_id: String,
    pub page_count: usize,
    /// Override for sentences per page; `None` keeps the resolved rule value.
    pub max_sentences_per_page: Option<usize>,
    /// Override for tokens-per-sentence bounds.
    pub sentence_length_bounds: Option<(usize, usize)>,
    /// Extra heart words allowed beyond the approved lexicon.
    pub whitelist: Option<Vec<String>>,
}

impl DraftOptions {
    pub fn new(title: &str, theme: &str, pattern_id: &str, page_count: usize) -> Self {
        Self {
            title: title.to_string(),
            theme: theme.to_string(),
            pattern_id: pattern_id.to_string(),
            page_count,
            max_sentences_per_page: None,
            sentence_length_bounds: None,
            whitelist: None,
        }
    }
}

/// Per-page compile outcome. `violations` empty means the page is
/// fully decodable; `attempts` counts repair iterations consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub page_index: usize,
    pub attempts: usize,
    pub violations: Vec<Violation>,
}

/// Final document plus the authoritative compliance report, one entry
/// per page in page order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileResult {
    pub story: Story,
    pub report: Vec<PageReport>,
}

impl CompileResult {
    /// True iff every page ended with zero outstanding violations.
    pub fn is_compliant(&self) -> bool {
        self.report.iter().all(|r| r.violations.is_empty())
    }
}
