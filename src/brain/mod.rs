//! Intent routing for live meeting utterances.
//!
//! [`Brain::ask`] decides whether an utterance is for the assistant, which
//! kind of reply it wants, and produces it. The session layer owns the
//! tone mode and hands it in on every call.

pub mod diarize;
pub mod generators;
pub mod guard;
pub mod intent;
pub mod prompts;
pub mod responder;
pub mod tone;

use std::sync::Arc;
use tracing::debug;

use crate::completion::{CompletionError, CompletionGateway};
use crate::config::AssistantConfig;

pub use diarize::{Diarization, Diarizer};
pub use generators::TaskGenerators;
pub use intent::{IntentCategory, IntentClassifier, KeywordClassifier, Normalized};
pub use responder::ConversationalResponder;
pub use tone::{Tone, ToneMode};

/// What the assistant decided to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    ToneChanged(ToneMode),
    Greeting,
    Clarification,
    Task {
        category: IntentCategory,
        text: String,
    },
    Conversation {
        tone: Tone,
        text: String,
    },
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Self::ToneChanged(mode) => mode.confirmation(),
            Self::Greeting => prompts::GREETING_REPLY,
            Self::Clarification => prompts::CLARIFY_REPLY,
            Self::Task { text, .. } | Self::Conversation { text, .. } => text,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ToneChanged(_) => "tone",
            Self::Greeting => "greeting",
            Self::Clarification => "clarification",
            Self::Task { .. } => "task",
            Self::Conversation { .. } => "conversation",
        }
    }
}

pub struct Brain {
    classifier: Box<dyn IntentClassifier>,
    generators: TaskGenerators,
    responder: ConversationalResponder,
    diarizer: Diarizer,
    wake_word: String,
    min_request_chars: usize,
}

impl Brain {
    pub fn new(gateway: Arc<dyn CompletionGateway>, config: &AssistantConfig) -> Self {
        Self {
            classifier: Box::new(KeywordClassifier::with_order(&config.category_order)),
            generators: TaskGenerators::new(gateway.clone()),
            responder: ConversationalResponder::new(gateway.clone()),
            diarizer: Diarizer::new(gateway),
            wake_word: config.wake_word.clone(),
            min_request_chars: config.min_request_chars,
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn wake_word(&self) -> &str {
        &self.wake_word
    }

    /// Routes one utterance. `Ok(None)` means the assistant stays quiet.
    ///
    /// Tone commands update `tone` in place and never reach the gateway.
    pub async fn ask(
        &self,
        text: &str,
        tone: &mut ToneMode,
    ) -> Result<Option<Reply>, CompletionError> {
        let normalized = Normalized::new(text);

        if let Some(mode) = ToneMode::parse_command(&normalized) {
            debug!("Tone mode set to {}", mode.as_str());
            *tone = mode;
            return Ok(Some(Reply::ToneChanged(mode)));
        }

        let addressed = intent::is_addressed(&normalized, &self.wake_word);
        let category = self.classifier.classify(normalized.as_str());

        if !addressed && category.is_none() {
            return Ok(None);
        }

        if addressed && category.is_none() {
            if intent::is_greeting(&normalized, &self.wake_word) {
                return Ok(Some(Reply::Greeting));
            }
            if intent::needs_clarification(text, self.min_request_chars) {
                return Ok(Some(Reply::Clarification));
            }
        }

        let request = intent::strip_wake_word(text, &self.wake_word);

        if intent::is_brainstorm(&normalized)
            && intent::needs_clarification(&request, self.min_request_chars)
        {
            return Ok(Some(Reply::Clarification));
        }

        match category {
            Some(category) => {
                let text = self.generators.generate(category, &request).await?;
                Ok(Some(Reply::Task { category, text }))
            }
            None => {
                let resolved = tone.resolve(&normalized);
                let text = self.responder.respond(&request, resolved).await?;
                Ok(Some(Reply::Conversation {
                    tone: resolved,
                    text,
                }))
            }
        }
    }

    pub async fn summarize_transcript(&self, transcript: &str) -> Result<String, CompletionError> {
        self.generators.summarize_transcript(transcript).await
    }

    pub async fn extract_decisions(&self, transcript: &str) -> Result<String, CompletionError> {
        self.generators.extract_decisions(transcript).await
    }

    pub async fn extract_actions(&self, transcript: &str) -> Result<String, CompletionError> {
        self.generators.extract_actions(transcript).await
    }

    pub async fn client_status_message(&self, context: &str) -> Result<String, CompletionError> {
        self.generators.client_status_message(context).await
    }

    /// Never fails; degrades to a heuristic split when the gateway does.
    pub async fn diarize(&self, transcript: &str) -> Diarization {
        self.diarizer.diarize(transcript).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedGateway;

    fn brain_with(gateway: Arc<ScriptedGateway>) -> Brain {
        Brain::new(gateway, &AssistantConfig::default())
    }

    #[tokio::test]
    async fn test_unaddressed_chatter_is_silent() {
        let gateway = Arc::new(ScriptedGateway::new());
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain.ask("acho que o layout ficou bom", &mut tone).await.unwrap();

        assert!(reply.is_none());
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_addressed_summary_goes_to_generator() {
        let gateway = Arc::new(ScriptedGateway::with_answers([
            "Resumo rápido:\n- deploy sexta\n\nDecisões:\n- manter data\n\nPróximos passos:\n- Ana — revisar — quinta",
        ]));
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain
            .ask("Orlem, faz um resumo da reunião", &mut tone)
            .await
            .unwrap()
            .unwrap();

        match &reply {
            Reply::Task { category, text } => {
                assert_eq!(*category, IntentCategory::Summary);
                assert!(text.starts_with("Resumo rápido:"));
            }
            other => panic!("unexpected reply {:?}", other),
        }
        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user, "faz um resumo da reunião");
    }

    #[tokio::test]
    async fn test_unaddressed_command_still_routes() {
        let gateway = Arc::new(ScriptedGateway::with_answers(["Olá, tudo bem? Seguimos no prazo."]));
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain
            .ask("manda uma mensagem pro cliente sobre o status", &mut tone)
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            reply,
            Reply::Task {
                category: IntentCategory::ClientMessage,
                ..
            }
        ));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_greeting_makes_no_gateway_call() {
        let gateway = Arc::new(ScriptedGateway::new());
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain.ask("bom dia orlem", &mut tone).await.unwrap().unwrap();

        assert_eq!(reply, Reply::Greeting);
        assert_eq!(reply.text(), prompts::GREETING_REPLY);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_addressed_request_asks_for_context() {
        let gateway = Arc::new(ScriptedGateway::new());
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain.ask("orlem, isso", &mut tone).await.unwrap().unwrap();
        assert_eq!(reply, Reply::Clarification);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_vague_brainstorm_asks_for_context() {
        let gateway = Arc::new(ScriptedGateway::new());
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain
            .ask("orlem, me dá ideias de post", &mut tone)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(reply, Reply::Clarification);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_vague_brainstorm_outranked_by_other_category_still_clarifies() {
        let gateway = Arc::new(ScriptedGateway::new());
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain
            .ask("orlem, me dá ideias de proposta", &mut tone)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(reply, Reply::Clarification);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_outranking_category_with_context_is_generated() {
        let gateway = Arc::new(ScriptedGateway::with_answers(["Proposta em três blocos."]));
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain
            .ask(
                "orlem, me dá ideias de proposta com objetivo de fechar o piloto até o prazo de março",
                &mut tone,
            )
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            reply,
            Reply::Task {
                category: IntentCategory::Sales,
                ..
            }
        ));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_brainstorm_with_context_is_generated() {
        let gateway = Arc::new(ScriptedGateway::with_answers(["Três ideias práticas."]));
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain
            .ask(
                "orlem, me dá ideias de post com objetivo de gerar leads, público B2B, canal LinkedIn",
                &mut tone,
            )
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            reply,
            Reply::Task {
                category: IntentCategory::Brainstorm,
                ..
            }
        ));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_tone_command_changes_mode_without_gateway() {
        let gateway = Arc::new(ScriptedGateway::new());
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain.ask("orlem, modo cliente", &mut tone).await.unwrap().unwrap();

        assert_eq!(reply, Reply::ToneChanged(ToneMode::Client));
        assert_eq!(tone, ToneMode::Client);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_pinned_tone_applies_to_conversation() {
        let gateway = Arc::new(ScriptedGateway::new());
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Client;

        let reply = brain
            .ask("orlem, o que você acha do novo deploy?", &mut tone)
            .await
            .unwrap()
            .unwrap();

        match reply {
            Reply::Conversation { tone, .. } => assert_eq!(tone, Tone::Client),
            other => panic!("unexpected reply {:?}", other),
        }
        assert!(gateway.requests()[0].system.contains(prompts::STYLE_CLIENT));
    }

    #[tokio::test]
    async fn test_conversation_rewrites_lists_once() {
        let gateway = Arc::new(ScriptedGateway::with_answers([
            "1) Validar o fluxo\n2) Ajustar",
            "Eu validaria o fluxo com o time antes de mexer no resto.",
        ]));
        let brain = brain_with(gateway.clone());
        let mut tone = ToneMode::Auto;

        let reply = brain
            .ask("orlem, como você seguiria com esse fluxo de cadastro?", &mut tone)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            reply.text(),
            "Eu validaria o fluxo com o time antes de mexer no resto."
        );
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_reported() {
        let gateway = Arc::new(ScriptedGateway::failing());
        let brain = brain_with(gateway);
        let mut tone = ToneMode::Auto;

        let err = brain
            .ask("orlem, faz um resumo da reunião", &mut tone)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "RequestError");
    }

    #[tokio::test]
    async fn test_custom_classifier_is_used() {
        struct AlwaysEmail;
        impl IntentClassifier for AlwaysEmail {
            fn classify(&self, _text: &str) -> Option<IntentCategory> {
                Some(IntentCategory::Email)
            }
        }

        let gateway = Arc::new(ScriptedGateway::new());
        let brain = brain_with(gateway.clone()).with_classifier(Box::new(AlwaysEmail));
        let mut tone = ToneMode::Auto;

        let reply = brain
            .ask("qualquer coisa sem wake word", &mut tone)
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            reply,
            Reply::Task {
                category: IntentCategory::Email,
                ..
            }
        ));
    }
}
