//! Per-connection dispatch.
//!
//! One [`Session`] per socket. [`SessionOrchestrator::handle`] processes a
//! single inbound frame to completion: it logs and persists the utterance,
//! asks the brain, and returns the frames to send back. Control actions
//! (`summarize`, `diarize`, `end`, `save`) bypass the brain routing.

use anyhow::Context;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::brain::{Brain, Reply, ToneMode};
use crate::completion::CompletionError;
use crate::logs::{LogError, LogResult, LogStore};
use crate::meeting::{MeetingStore, MessageRole};

pub const CONNECTED_MESSAGE: &str = "Conectado. Reunião será salva automaticamente.";
pub const SAVE_MESSAGE: &str = "Reunião já está sendo salva automaticamente.";
pub const CLOSED_MESSAGE: &str = "Reunião encerrada. Resumo final arquivado.";
pub const NOTHING_TO_SUMMARIZE: &str = "Nenhuma mensagem para resumir nesta sessão.";
pub const NOTHING_TO_DIARIZE: &str = "Nenhuma reunião ativa para diarizar.";
pub const NOTHING_TO_END: &str = "Nenhuma reunião ativa para encerrar.";
pub const LOG_NOT_FOUND: &str = "Log não encontrado.";
pub const HISTORY_UNAVAILABLE: &str =
    "⚠️ Não consegui ler o histórico da reunião agora. Tente de novo em instantes.";

pub const LIVE_SOURCE: &str = "live";

/// `sess-YYYYMMDD-HHMMSS` plus four hex characters.
pub fn new_session_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "sess-{}{}",
        Local::now().format("%Y%m%d-%H%M%S"),
        &suffix[..4]
    )
}

/// Connection-scoped state.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub meeting_id: Option<i64>,
    pub tone: ToneMode,
    closed: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(new_session_id())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meeting_id: None,
            tone: ToneMode::default(),
            closed: false,
        }
    }

    /// Set once `end` succeeded; the transport should hang up.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Summarize,
    Diarize,
    End,
    Save,
}

impl Action {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "summarize" => Some(Self::Summarize),
            "diarize" => Some(Self::Diarize),
            "end" => Some(Self::End),
            "save" => Some(Self::Save),
            _ => None,
        }
    }
}

/// Inbound frame. Anything that is not a JSON object is plain text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InboundPayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub target_log: Option<String>,
}

impl InboundPayload {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<InboundPayload>(raw) {
            Ok(payload) => payload,
            Err(_) => Self::text(raw),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn action(&self) -> Option<Action> {
        self.action.as_deref().and_then(Action::parse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboundKind {
    Status,
    Answer,
    Summary,
    Diarize,
    Info,
    Warning,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outbound {
    #[serde(rename = "type")]
    pub kind: OutboundKind,
    pub session_id: String,
    pub answer: String,
}

impl Outbound {
    pub fn new(kind: OutboundKind, session_id: &str, answer: impl Into<String>) -> Self {
        Self {
            kind,
            session_id: session_id.to_string(),
            answer: answer.into(),
        }
    }
}

fn service_warning(context: &str, err: &CompletionError) -> String {
    format!(
        "⚠️ Não consegui {} agora ({}). Tente de novo em instantes.",
        context,
        err.kind()
    )
}

pub struct SessionOrchestrator {
    brain: Arc<Brain>,
    meetings: Arc<dyn MeetingStore>,
    logs: Arc<dyn LogStore>,
    owner: String,
}

impl SessionOrchestrator {
    pub fn new(
        brain: Arc<Brain>,
        meetings: Arc<dyn MeetingStore>,
        logs: Arc<dyn LogStore>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            brain,
            meetings,
            logs,
            owner: owner.into(),
        }
    }

    /// First frame sent on a new connection.
    pub fn connected(&self, session: &Session) -> Outbound {
        Outbound::new(OutboundKind::Status, &session.id, CONNECTED_MESSAGE)
    }

    pub async fn handle(&self, session: &mut Session, raw: &str) -> Vec<Outbound> {
        self.handle_payload(session, InboundPayload::parse(raw)).await
    }

    pub async fn handle_payload(
        &self,
        session: &mut Session,
        payload: InboundPayload,
    ) -> Vec<Outbound> {
        let session_id = payload
            .session_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| session.id.clone());

        match payload.action() {
            Some(Action::Summarize) => {
                vec![self.summarize(session, &session_id, payload.target_log.as_deref()).await]
            }
            Some(Action::Diarize) => vec![self.diarize(session, &session_id).await],
            Some(Action::End) => self.end(session, &session_id).await,
            Some(Action::Save) => vec![Outbound::new(OutboundKind::Info, &session_id, SAVE_MESSAGE)],
            None => {
                let text = payload.text.as_deref().unwrap_or("").trim();
                if text.is_empty() {
                    return Vec::new();
                }
                self.utterance(session, &session_id, text)
                    .await
                    .into_iter()
                    .collect()
            }
        }
    }

    async fn utterance(
        &self,
        session: &mut Session,
        session_id: &str,
        text: &str,
    ) -> Option<Outbound> {
        let meeting_id = self.ensure_meeting(session).await;
        self.record(session_id, meeting_id, MessageRole::User, text, None)
            .await;

        match self.brain.ask(text, &mut session.tone).await {
            Ok(None) => {
                debug!("Session {} listening silently", session_id);
                None
            }
            Ok(Some(reply)) => {
                let meta = reply_meta(&reply);
                self.record(
                    session_id,
                    meeting_id,
                    MessageRole::Assistant,
                    reply.text(),
                    Some(meta),
                )
                .await;
                Some(Outbound::new(OutboundKind::Answer, session_id, reply.text()))
            }
            Err(e) => {
                warn!("Session {} reply failed: {}", session_id, e);
                Some(Outbound::new(
                    OutboundKind::Warning,
                    session_id,
                    service_warning("gerar a resposta", &e),
                ))
            }
        }
    }

    async fn summarize(
        &self,
        session: &Session,
        session_id: &str,
        target_log: Option<&str>,
    ) -> Outbound {
        let transcript = match target_log.map(str::trim).filter(|t| !t.is_empty()) {
            Some(name) => match self.read_log_transcript(name).await {
                Ok(transcript) => transcript,
                Err(LogError::NotFound(_)) | Err(LogError::InvalidName(_)) => {
                    return Outbound::new(OutboundKind::Warning, session_id, LOG_NOT_FOUND);
                }
                Err(e) => {
                    error!("Failed to read log {}: {}", name, e);
                    return Outbound::new(OutboundKind::Warning, session_id, LOG_NOT_FOUND);
                }
            },
            None => {
                let Some(meeting_id) = session.meeting_id else {
                    return Outbound::new(OutboundKind::Warning, session_id, NOTHING_TO_SUMMARIZE);
                };
                match self.load_transcript(meeting_id).await {
                    Ok(transcript) => transcript,
                    Err(e) => {
                        error!("Failed to load transcript for meeting {}: {:#}", meeting_id, e);
                        return Outbound::new(OutboundKind::Warning, session_id, HISTORY_UNAVAILABLE);
                    }
                }
            }
        };

        match self.brain.summarize_transcript(&transcript).await {
            Ok(summary) => Outbound::new(OutboundKind::Summary, session_id, summary),
            Err(e) => {
                warn!("Summary failed for session {}: {}", session_id, e);
                Outbound::new(
                    OutboundKind::Warning,
                    session_id,
                    service_warning("gerar o resumo", &e),
                )
            }
        }
    }

    async fn diarize(&self, session: &Session, session_id: &str) -> Outbound {
        let Some(meeting_id) = session.meeting_id else {
            return Outbound::new(OutboundKind::Warning, session_id, NOTHING_TO_DIARIZE);
        };

        let transcript = match self.load_transcript(meeting_id).await {
            Ok(transcript) => transcript,
            Err(e) => {
                error!("Failed to load transcript for meeting {}: {:#}", meeting_id, e);
                return Outbound::new(OutboundKind::Warning, session_id, HISTORY_UNAVAILABLE);
            }
        };
        let result = self.brain.diarize(&transcript).await;
        Outbound::new(OutboundKind::Diarize, session_id, result.text)
    }

    async fn end(&self, session: &mut Session, session_id: &str) -> Vec<Outbound> {
        let Some(meeting_id) = session.meeting_id else {
            return vec![Outbound::new(OutboundKind::Warning, session_id, NOTHING_TO_END)];
        };

        let transcript = match self.load_transcript(meeting_id).await {
            Ok(transcript) => transcript,
            Err(e) => {
                error!("Failed to load transcript for meeting {}: {:#}", meeting_id, e);
                return vec![Outbound::new(
                    OutboundKind::Warning,
                    session_id,
                    HISTORY_UNAVAILABLE,
                )];
            }
        };

        let summary = match self.brain.summarize_transcript(&transcript).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Closing summary failed for meeting {}: {}", meeting_id, e);
                return vec![Outbound::new(
                    OutboundKind::Warning,
                    session_id,
                    service_warning("gerar o resumo final", &e),
                )];
            }
        };

        let archived = {
            let summary = summary.clone();
            self.with_meetings(move |store| store.close_meeting(meeting_id, &summary, &transcript))
                .await
        };
        if let Err(e) = archived {
            error!("Failed to archive meeting {}: {:#}", meeting_id, e);
        } else {
            info!("Meeting {} closed by session {}", meeting_id, session_id);
        }

        session.meeting_id = None;
        session.closed = true;

        vec![
            Outbound::new(OutboundKind::Summary, session_id, summary),
            Outbound::new(OutboundKind::Closed, session_id, CLOSED_MESSAGE),
        ]
    }

    /// Binds a meeting to the session on its first substantive utterance.
    async fn ensure_meeting(&self, session: &mut Session) -> Option<i64> {
        if session.meeting_id.is_some() {
            return session.meeting_id;
        }

        let owner = self.owner.clone();
        let title = format!("Reunião {}", Local::now().format("%d/%m/%Y %H:%M"));
        let created = self
            .with_meetings(move |store| store.create_meeting(&owner, &title, LIVE_SOURCE))
            .await;

        match created {
            Ok(meeting) => {
                info!("Session {} bound to meeting {}", session.id, meeting.id);
                session.meeting_id = Some(meeting.id);
                Some(meeting.id)
            }
            Err(e) => {
                error!("Failed to create meeting for session {}: {:#}", session.id, e);
                None
            }
        }
    }

    /// Runs meeting storage work on the blocking pool.
    async fn with_meetings<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        F: FnOnce(&dyn MeetingStore) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.meetings);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .context("Meeting storage task failed")?
    }

    async fn load_transcript(&self, meeting_id: i64) -> anyhow::Result<String> {
        self.with_meetings(move |store| store.transcript(meeting_id))
            .await
    }

    async fn read_log_transcript(&self, name: &str) -> LogResult<String> {
        let logs = Arc::clone(&self.logs);
        let name = name.to_string();
        tokio::task::spawn_blocking(move || logs.read_transcript(&name))
            .await
            .context("Log storage task failed")?
    }

    /// Storage failures are logged and never block the reply.
    async fn record(
        &self,
        session_id: &str,
        meeting_id: Option<i64>,
        role: MessageRole,
        content: &str,
        meta: Option<Value>,
    ) {
        let logs = Arc::clone(&self.logs);
        let meetings = Arc::clone(&self.meetings);
        let session_id = session_id.to_string();
        let content = content.to_string();

        let stored = tokio::task::spawn_blocking(move || {
            if let Err(e) = logs.append(&session_id, role, &content) {
                error!("Failed to append to log {}: {}", session_id, e);
            }

            if let Some(meeting_id) = meeting_id {
                if let Err(e) = meetings.add_message(meeting_id, role, &content, meta.as_ref()) {
                    error!("Failed to store message for meeting {}: {:#}", meeting_id, e);
                }
            }
        })
        .await;

        if let Err(e) = stored {
            error!("Message storage task failed: {}", e);
        }
    }
}

fn reply_meta(reply: &Reply) -> Value {
    match reply {
        Reply::Task { category, .. } => json!({"kind": reply.kind(), "category": category}),
        Reply::Conversation { tone, .. } => json!({"kind": reply.kind(), "tone": tone}),
        Reply::ToneChanged(mode) => json!({"kind": reply.kind(), "mode": mode}),
        Reply::Greeting | Reply::Clarification => json!({"kind": reply.kind()}),
    }
}
