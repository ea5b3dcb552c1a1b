use crate::api::{ApiServer, AppState};
use crate::brain::Brain;
use crate::completion::{CompletionGateway, OpenAiCompletionGateway};
use crate::config::Config;
use crate::db::SqliteMeetingStore;
use crate::logs::JsonlLogStore;
use crate::session::SessionOrchestrator;
use crate::speech::OpenAiSpeech;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a running assistant needs, wired from config.
pub struct Services {
    pub brain: Arc<Brain>,
    pub meetings: Arc<SqliteMeetingStore>,
    pub logs: Arc<JsonlLogStore>,
}

impl Services {
    pub fn build(config: &Config) -> Result<Self> {
        let gateway = build_gateway(config)?;
        let brain = Arc::new(Brain::new(gateway, &config.assistant));

        let meetings = Arc::new(SqliteMeetingStore::open(&config.storage.db_path()?)?);
        let logs = Arc::new(JsonlLogStore::new(config.storage.logs_dir()?)?);

        Ok(Self {
            brain,
            meetings,
            logs,
        })
    }
}

pub fn build_gateway(config: &Config) -> Result<Arc<dyn CompletionGateway>> {
    if config.llm.api_key.is_none() {
        warn!(
            "No API key configured; set {} or [llm] api_key. Replies will fail until then.",
            crate::config::API_KEY_ENV
        );
    }
    let gateway = OpenAiCompletionGateway::from_config(&config.llm)
        .context("Failed to initialize completion gateway")?;
    Ok(Arc::new(gateway))
}

pub async fn run_service() -> Result<()> {
    info!("Starting Orlem service");

    let config = Config::load()?;
    let services = Services::build(&config)?;

    let speech = Arc::new(
        OpenAiSpeech::from_config(&config.llm, &config.speech)
            .context("Failed to initialize speech client")?,
    );

    let orchestrator = Arc::new(SessionOrchestrator::new(
        services.brain.clone(),
        services.meetings.clone(),
        services.logs.clone(),
        config.assistant.owner.clone(),
    ));

    let state = AppState {
        orchestrator,
        meetings: services.meetings.clone(),
        logs: services.logs.clone(),
        stt: speech.clone(),
        tts: speech,
        owner: config.assistant.owner.clone(),
    };

    info!(
        "Orlem is ready! Wake word '{}', model {}",
        config.assistant.wake_word, config.llm.model
    );

    ApiServer::new(state, &config).start().await
}
