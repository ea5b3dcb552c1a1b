//! Speaker-attributed rendering of a meeting transcript.
//!
//! The remote strategy asks the model to group the log by speaker. When it
//! fails, the heuristic strategy splits lines by their role prefix so the
//! caller always gets something back.

use std::sync::Arc;
use tracing::warn;

use super::prompts;
use crate::completion::{CompletionError, CompletionGateway, CompletionRequest};

const REMOTE_TEMPERATURE: f32 = 0.2;
const REMOTE_MAX_TOKENS: u32 = 700;

const MAX_LINES_PER_SPEAKER: usize = 6;
const MAX_LINE_CHARS: usize = 140;
const NO_LINES: &str = "(sem falas)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diarization {
    pub text: String,
    /// Set when the heuristic fallback produced the text.
    pub degraded: bool,
}

pub struct RemoteDiarization {
    gateway: Arc<dyn CompletionGateway>,
}

impl RemoteDiarization {
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self { gateway }
    }

    pub async fn diarize(&self, transcript: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest::new(prompts::DIARIZE_SYSTEM, prompts::diarize_prompt(transcript))
            .with_temperature(REMOTE_TEMPERATURE)
            .with_max_tokens(REMOTE_MAX_TOKENS);
        let text = self.gateway.complete(request).await?;

        if !text.contains("Falante") && !text.contains(':') {
            return Ok(format!("Falante A:\n- {}", text));
        }
        Ok(text)
    }
}

/// Splits lines by their `user:` / `assistant:` prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicDiarization;

impl HeuristicDiarization {
    pub fn diarize(&self, transcript: &str, reason: &str) -> String {
        let mut speaker_a: Vec<String> = Vec::new();
        let mut speaker_b: Vec<String> = Vec::new();

        for line in transcript.lines() {
            let line = line.trim();
            let lowered = line.to_lowercase();
            let target = if lowered.starts_with("user:") {
                &mut speaker_a
            } else if lowered.starts_with("assistant:") || lowered.starts_with("orlem:") {
                &mut speaker_b
            } else {
                continue;
            };

            if target.len() >= MAX_LINES_PER_SPEAKER {
                continue;
            }
            let content = line.split_once(':').map(|(_, rest)| rest.trim()).unwrap_or("");
            if content.is_empty() {
                continue;
            }
            target.push(content.chars().take(MAX_LINE_CHARS).collect());
        }

        format!(
            "Falante A:\n{}\n\nFalante B:\n{}\n\n(observação: diarização simplificada por erro técnico: {})",
            render_group(&speaker_a),
            render_group(&speaker_b),
            reason
        )
    }
}

fn render_group(lines: &[String]) -> String {
    if lines.is_empty() {
        return format!("- {}", NO_LINES);
    }
    lines
        .iter()
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remote first, heuristic on failure.
pub struct Diarizer {
    remote: RemoteDiarization,
    fallback: HeuristicDiarization,
}

impl Diarizer {
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self {
            remote: RemoteDiarization::new(gateway),
            fallback: HeuristicDiarization,
        }
    }

    pub async fn diarize(&self, transcript: &str) -> Diarization {
        if transcript.trim().is_empty() {
            return Diarization {
                text: prompts::DIARIZE_UNAVAILABLE.to_string(),
                degraded: false,
            };
        }

        match self.remote.diarize(transcript).await {
            Ok(text) => Diarization {
                text,
                degraded: false,
            },
            Err(e) => {
                warn!("Remote diarization failed, using heuristic: {}", e);
                Diarization {
                    text: self.fallback.diarize(transcript, e.kind()),
                    degraded: true,
                }
            }
        }
    }
}
