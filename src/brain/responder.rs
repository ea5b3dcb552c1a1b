//! Free-form conversational replies.

use std::sync::Arc;
use tracing::{debug, info};

use super::generators::{truncate, DEFAULT_MAX_CHARS};
use super::guard::violates_format_policy;
use super::prompts;
use super::tone::Tone;
use crate::completion::{CompletionError, CompletionGateway, CompletionRequest};

#[derive(Clone)]
pub struct ConversationalResponder {
    gateway: Arc<dyn CompletionGateway>,
}

impl ConversationalResponder {
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self { gateway }
    }

    /// Answers in prose. A reply that comes back as a list or minutes is
    /// rewritten once; the rewrite is returned whatever it looks like.
    pub async fn respond(&self, text: &str, tone: Tone) -> Result<String, CompletionError> {
        let system = format!("{}\n\n{}", prompts::BASE_PERSONA, tone.style_directive());
        let user = format!(
            "{}\n\nMensagem da pessoa:\n{}",
            prompts::CONVERSATION_CONSTRAINTS,
            text
        );

        let first = truncate(
            &self
                .gateway
                .complete(CompletionRequest::new(system.clone(), user))
                .await?,
            DEFAULT_MAX_CHARS,
        );
        debug!("Conversational reply in {} tone", tone.as_str());

        if !violates_format_policy(&first) {
            return Ok(first);
        }

        info!("Reply broke the prose format, rewriting once");
        let rewrite = format!(
            "{}\n\nRESPOSTA ORIGINAL:\n{}",
            prompts::REWRITE_INSTRUCTION,
            first
        );
        let second = self
            .gateway
            .complete(CompletionRequest::new(system, rewrite))
            .await?;
        Ok(truncate(&second, DEFAULT_MAX_CHARS))
    }
}
