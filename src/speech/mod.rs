//! Speech adapters: audio bytes to text and back.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{LlmConfig, SpeechConfig};

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech service not configured: {0}")]
    NotConfigured(String),
    #[error("Speech request failed: {0}")]
    Request(String),
    #[error("Speech service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Empty audio payload")]
    EmptyAudio,
}

#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, SpeechError>;
}

#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

/// A zero timeout would fail every request; one second is the floor.
fn client_timeout(seconds: u64) -> Duration {
    Duration::from_secs(seconds.max(1))
}

/// OpenAI `/audio/transcriptions` and `/audio/speech`.
pub struct OpenAiSpeech {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    transcription_model: String,
    tts_model: String,
    voice: String,
    language: Option<String>,
}

impl OpenAiSpeech {
    pub fn from_config(llm: &LlmConfig, speech: &SpeechConfig) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(client_timeout(llm.timeout_seconds))
            .build()
            .map_err(|e| SpeechError::NotConfigured(e.to_string()))?;
        let base_url = llm.api_base.trim_end_matches('/').to_string();

        info!(
            "Initialized speech client with base URL {} (stt {}, tts {})",
            base_url, speech.transcription_model, speech.tts_model
        );

        Ok(Self {
            client,
            api_key: llm.api_key.clone(),
            base_url,
            transcription_model: speech.transcription_model.clone(),
            tts_model: speech.tts_model.clone(),
            voice: speech.voice.clone(),
            language: speech.language.clone(),
        })
    }

    fn api_key(&self) -> Result<&str, SpeechError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| SpeechError::NotConfigured("missing API key".to_string()))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SpeechError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        error!("Speech request failed with status {}: {}", status, message);
        Err(SpeechError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SpeechToText for OpenAiSpeech {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        let api_key = self.api_key()?;
        debug!("Transcribing {} bytes of audio", audio.len());

        let part = Part::bytes(audio)
            .file_name("audio.webm")
            .mime_str("audio/webm")
            .map_err(|e| SpeechError::Request(e.to_string()))?;
        let mut form = Form::new()
            .text("model", self.transcription_model.clone())
            .part("file", part);
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        let body: TranscriptionResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        Ok(body.text.trim().to_string())
    }
}

#[async_trait]
impl TextToSpeech for OpenAiSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let api_key = self.api_key()?;
        let request = SpeechRequest {
            model: &self.tts_model,
            voice: &self.voice,
            input: text,
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        let bytes = Self::check(response)
            .await?
            .bytes()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
