//! One generation strategy per intent category.

use std::sync::Arc;
use tracing::{debug, info};

use super::intent::IntentCategory;
use super::prompts;
use crate::completion::{CompletionError, CompletionGateway, CompletionRequest};

pub const DEFAULT_MAX_CHARS: usize = 1100;

/// Longest reply kept for a category; longer answers are cut.
pub fn max_chars(category: IntentCategory) -> usize {
    match category {
        IntentCategory::Summary => 1400,
        IntentCategory::Taskify => 1200,
        IntentCategory::Decisions | IntentCategory::Actions => 1000,
        _ => DEFAULT_MAX_CHARS,
    }
}

/// Cuts `text` to at most `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut kept: String = text.chars().take(max.saturating_sub(3)).collect();
    kept.push_str("...");
    kept
}

/// Adds any of the three summary sections the model left out.
pub fn ensure_summary_sections(text: &str) -> String {
    let mut out = if text.contains(prompts::SUMMARY_HEADER) {
        text.to_string()
    } else {
        format!("{}\n- {}", prompts::SUMMARY_HEADER, text)
    };

    if !out.contains(prompts::DECISIONS_HEADER) {
        out.push_str(&format!(
            "\n\n{}\n{}",
            prompts::DECISIONS_HEADER,
            prompts::NO_DECISION_PLACEHOLDER
        ));
    }

    if !out.contains(prompts::NEXT_STEPS_HEADER) {
        out.push_str(&format!(
            "\n\n{}\n{}",
            prompts::NEXT_STEPS_HEADER,
            prompts::NEXT_STEPS_PLACEHOLDER
        ));
    }

    out
}

/// Summary returned when there is nothing to summarize yet.
pub fn empty_summary() -> String {
    format!(
        "{}\n{}\n\n{}\n{}\n\n{}\n{}",
        prompts::SUMMARY_HEADER,
        prompts::EMPTY_SUMMARY_POINT,
        prompts::DECISIONS_HEADER,
        prompts::NO_DECISION_PLACEHOLDER,
        prompts::NEXT_STEPS_HEADER,
        prompts::NEXT_STEPS_PLACEHOLDER
    )
}

#[derive(Clone)]
pub struct TaskGenerators {
    gateway: Arc<dyn CompletionGateway>,
}

impl TaskGenerators {
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self { gateway }
    }

    pub async fn generate(
        &self,
        category: IntentCategory,
        context: &str,
    ) -> Result<String, CompletionError> {
        info!("Generating {} reply", category);
        let request = CompletionRequest::new(prompts::instruction_for(category), context);
        let raw = self.gateway.complete(request).await?;
        let text = truncate(&raw, max_chars(category));
        debug!("{} reply: {} chars", category, text.chars().count());

        Ok(match category {
            IntentCategory::Summary => ensure_summary_sections(&text),
            _ => text,
        })
    }

    /// Always yields the three summary sections.
    pub async fn summarize_transcript(&self, transcript: &str) -> Result<String, CompletionError> {
        if transcript.trim().is_empty() {
            return Ok(empty_summary());
        }
        self.generate(IntentCategory::Summary, transcript).await
    }

    pub async fn extract_decisions(&self, transcript: &str) -> Result<String, CompletionError> {
        self.generate(IntentCategory::Decisions, transcript).await
    }

    pub async fn extract_actions(&self, transcript: &str) -> Result<String, CompletionError> {
        self.generate(IntentCategory::Actions, transcript).await
    }

    pub async fn client_status_message(&self, context: &str) -> Result<String, CompletionError> {
        self.generate(IntentCategory::ClientMessage, context).await
    }
}
