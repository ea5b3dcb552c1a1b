//! HTTP and WebSocket server for Orlem.
//!
//! Provides:
//! - The live meeting socket (`/ws`)
//! - Conversation log browsing
//! - Meeting and message history
//! - Speech transcription and synthesis
//! - The static browser client under `/web`

pub mod error;
pub mod routes;

use crate::config::Config;
use crate::logs::LogStore;
use crate::meeting::MeetingStore;
use crate::session::SessionOrchestrator;
use crate::speech::{SpeechToText, TextToSpeech};
use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

/// Shared handles for every route.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SessionOrchestrator>,
    pub meetings: Arc<dyn MeetingStore>,
    pub logs: Arc<dyn LogStore>,
    pub stt: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
    pub owner: String,
}

pub struct ApiServer {
    host: String,
    port: u16,
    static_dir: Option<PathBuf>,
    state: AppState,
}

impl ApiServer {
    pub fn new(state: AppState, config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            static_dir: config.server.static_dir.as_ref().map(PathBuf::from),
            state,
        }
    }

    pub fn router(&self) -> Router {
        let mut app = Router::new()
            .route("/", get(status))
            .route("/version", get(version))
            .merge(routes::ws::router())
            .nest("/logs", routes::logs::router())
            .nest("/meetings", routes::meetings::router())
            .nest("/speech", routes::speech::router());

        match &self.static_dir {
            Some(dir) if dir.is_dir() => {
                app = app.nest_service("/web", ServeDir::new(dir));
            }
            Some(dir) => warn!("Static directory {:?} not found, /web disabled", dir),
            None => {}
        }

        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(self.state.clone())
    }

    pub async fn start(self) -> Result<()> {
        let app = self.router();
        let addr = format!("{}:{}", self.host, self.port);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("API server listening on http://{}", addr);
        info!("Endpoints:");
        info!("  GET  /                   - Service info");
        info!("  GET  /version            - Get version info");
        info!("  GET  /ws                 - Live meeting socket");
        info!("  GET  /logs               - List conversation logs");
        info!("  GET  /logs/:name         - Read one log");
        info!("  POST /logs/rename        - Rename a log");
        info!("  GET  /meetings           - List meetings");
        info!("  GET  /meetings/:id       - Meeting with closing snapshot");
        info!("  GET  /meetings/:id/messages - Meeting messages and transcript");
        info!("  POST /speech/transcribe  - Audio to text");
        info!("  POST /speech/synthesize  - Text to audio");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "orlem",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "orlem"
    }))
}
