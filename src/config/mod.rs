use crate::brain::IntentCategory;
use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "MODEL_NAME";
pub const PORT_ENV: &str = "ORLEM_PORT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub assistant: AssistantConfig,
    pub storage: StorageConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/web` when it exists (the browser client).
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: Some("web".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Token that marks an utterance as addressed to the assistant.
    pub wake_word: String,
    /// Normalized requests shorter than this are considered vague.
    pub min_request_chars: usize,
    /// Tie-break order between categories whose triggers overlap.
    pub category_order: Vec<IntentCategory>,
    /// Workspace owner that live meetings are filed under.
    pub owner: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake_word: "orlem".to_string(),
            min_request_chars: 12,
            category_order: IntentCategory::ALL.to_vec(),
            owner: "Default User".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: Option<String>,
    pub logs_dir: Option<String>,
}

impl StorageConfig {
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => global::db_file(),
        }
    }

    pub fn logs_dir(&self) -> Result<PathBuf> {
        match &self.logs_dir {
            Some(path) => Ok(PathBuf::from(path)),
            None => global::logs_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub transcription_model: String,
    pub tts_model: String,
    pub voice: String,
    pub language: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            transcription_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            language: Some("pt".to_string()),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            config
        } else {
            let content =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
            info!("Loaded config from {:?}", config_path);
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Environment wins over the file so secrets can stay out of it.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.llm.model = model;
        }
        if let Some(port) = lookup(PORT_ENV).and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
        }
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.assistant.wake_word, "orlem");
        assert_eq!(config.assistant.min_request_chars, 12);
        assert_eq!(config.assistant.category_order.len(), 20);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [assistant]
            wake_word = "ada"

            [llm]
            model = "gpt-4o"
            "#,
        )
        .unwrap();

        assert_eq!(config.assistant.wake_word, "ada");
        assert_eq!(config.assistant.min_request_chars, 12);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.api_base, "https://api.openai.com/v1");
    }

    #[test]
    fn test_category_order_round_trips_as_kebab_case() {
        let config: Config = toml::from_str(
            r#"
            [assistant]
            category_order = ["budget", "sales", "client-message"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.assistant.category_order,
            vec![
                IntentCategory::Budget,
                IntentCategory::Sales,
                IntentCategory::ClientMessage
            ]
        );
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (API_KEY_ENV, "sk-test"),
            (MODEL_ENV, "gpt-4.1-mini"),
            (PORT_ENV, "9100"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.model, "gpt-4.1-mini");
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == API_KEY_ENV).then(|| "  ".to_string()));
        assert!(config.llm.api_key.is_none());
    }
}
