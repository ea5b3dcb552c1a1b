//! Conversational tone.
//!
//! A session carries a [`ToneMode`]. In `Auto` the effective [`Tone`] is
//! detected per utterance; any other mode pins it until reset.

use serde::{Deserialize, Serialize};

use super::intent::Normalized;
use super::prompts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMode {
    #[default]
    Auto,
    Internal,
    Client,
    Neutral,
}

/// Style actually applied to a conversational reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Internal,
    Client,
    Neutral,
}

const CLIENT_SIGNALS: &[&str] = &[
    "cliente",
    "proposta",
    "contrato",
    "apresentar ao cliente",
    "call com o cliente",
];

const INTERNAL_SIGNALS: &[&str] = &[
    "interno",
    "alinhamento do time",
    "sprint",
    "retro",
    "roadmap",
    "deploy",
    "estimativa",
];

impl ToneMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Internal => "internal",
            Self::Client => "client",
            Self::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<ToneMode> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "internal" | "interno" => Some(Self::Internal),
            "client" | "cliente" => Some(Self::Client),
            "neutral" | "neutro" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Recognizes an explicit tone command anywhere in the utterance.
    pub fn parse_command(text: &Normalized) -> Option<ToneMode> {
        if text.contains("modo interno") {
            Some(Self::Internal)
        } else if text.contains("modo cliente") {
            Some(Self::Client)
        } else if text.contains("tom neutro") {
            Some(Self::Neutral)
        } else if text.contains_any(&["resetar tom", "modo auto", "tom automático"]) {
            Some(Self::Auto)
        } else {
            None
        }
    }

    pub fn confirmation(&self) -> &'static str {
        match self {
            Self::Internal => "Fechado, falo no tom interno daqui pra frente.",
            Self::Client => "Perfeito, sigo no tom para cliente.",
            Self::Neutral => "Certo, ajustei para tom neutro.",
            Self::Auto => "Resetado: volto a detectar o tom automaticamente.",
        }
    }

    pub fn resolve(&self, text: &Normalized) -> Tone {
        match self {
            Self::Auto => Tone::detect(text),
            Self::Internal => Tone::Internal,
            Self::Client => Tone::Client,
            Self::Neutral => Tone::Neutral,
        }
    }
}

impl Tone {
    /// Client signals win over internal ones.
    pub fn detect(text: &Normalized) -> Tone {
        if text.contains_any(CLIENT_SIGNALS) {
            Tone::Client
        } else if text.contains_any(INTERNAL_SIGNALS) {
            Tone::Internal
        } else {
            Tone::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Client => "client",
            Self::Neutral => "neutral",
        }
    }

    pub fn style_directive(&self) -> &'static str {
        match self {
            Self::Internal => prompts::STYLE_INTERNAL,
            Self::Client => prompts::STYLE_CLIENT,
            Self::Neutral => prompts::STYLE_NEUTRAL,
        }
    }
}
