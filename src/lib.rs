// src/lib.rs

pub mod author;
pub mod canon;
pub mod compile;
pub mod config;
pub mod llm;
pub mod prompt;
pub mod provider;
pub mod repair;
pub mod rules;
pub mod story;
pub mod validator;
pub mod wordbank;

pub use compile::compile_story_text;
pub use llm::{GeminiCollaborator, RepairStrategy, ScriptedCollaborator, StoryCollaborator};
pub use provider::{LexiconProvider, StaticLexicon};
pub use rules::{PartialRuleConfig, RuleConfig, Violation, ViolationReason};
pub use story::{CompileResult, DraftOptions, Page, PageReport, Story};
pub use validator::{ValidationSummary, summarize_story, validate_page, validate_story};
pub use wordbank::{Clock, SystemClock, Wordbank};
