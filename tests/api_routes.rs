//! HTTP routes driven through the router without binding a socket.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use orlem::api::{ApiServer, AppState};
use orlem::brain::Brain;
use orlem::completion::{CompletionError, CompletionGateway, CompletionRequest};
use orlem::config::Config;
use orlem::db::SqliteMeetingStore;
use orlem::logs::{JsonlLogStore, LogStore};
use orlem::meeting::{MeetingStore, MessageRole};
use orlem::session::SessionOrchestrator;
use orlem::speech::{SpeechError, SpeechToText, TextToSpeech};

const OWNER: &str = "Equipe Produto";

struct OfflineGateway;

#[async_trait]
impl CompletionGateway for OfflineGateway {
    fn name(&self) -> &str {
        "offline"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::NotConfigured("offline".to_string()))
    }
}

struct FakeSpeech;

#[async_trait]
impl SpeechToText for FakeSpeech {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        Ok(format!("{} bytes ouvidos", audio.len()))
    }
}

#[async_trait]
impl TextToSpeech for FakeSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        Ok(text.as_bytes().to_vec())
    }
}

struct Fixture {
    server: ApiServer,
    meetings: Arc<SqliteMeetingStore>,
    logs: Arc<JsonlLogStore>,
    _dir: TempDir,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.server.static_dir = None;
    config.assistant.owner = OWNER.to_string();

    let brain = Arc::new(Brain::new(Arc::new(OfflineGateway), &config.assistant));
    let meetings = Arc::new(SqliteMeetingStore::in_memory().unwrap());
    let logs = Arc::new(JsonlLogStore::new(dir.path().join("logs")).unwrap());
    let speech = Arc::new(FakeSpeech);

    let state = AppState {
        orchestrator: Arc::new(SessionOrchestrator::new(
            brain,
            meetings.clone(),
            logs.clone(),
            OWNER,
        )),
        meetings: meetings.clone(),
        logs: logs.clone(),
        stt: speech.clone(),
        tts: speech,
        owner: OWNER.to_string(),
    };

    Fixture {
        server: ApiServer::new(state, &config),
        meetings,
        logs,
        _dir: dir,
    }
}

async fn send(fixture: &Fixture, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = fixture.server.router().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(fixture: &Fixture, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(fixture, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn post_json(fixture: &Fixture, uri: &str, payload: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    send(fixture, request).await
}

#[tokio::test]
async fn test_root_reports_service() {
    let f = fixture();
    let (status, body) = get_json(&f, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "orlem");
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn test_logs_list_read_and_rename() {
    let f = fixture();
    f.logs
        .append("sess-1", MessageRole::User, "bom dia pessoal")
        .unwrap();

    let (status, body) = get_json(&f, "/logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "logs": ["sess-1.jsonl"] }));

    let request = Request::get("/logs/sess-1.jsonl").body(Body::empty()).unwrap();
    let (status, raw) = send(&f, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(raw).unwrap().contains("bom dia pessoal"));

    let (status, _) = get_json(&f, "/logs/nada.jsonl").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(&f, "/logs/rename", json!({ "old_name": "sess-1.jsonl" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &f,
        "/logs/rename",
        json!({ "old_name": "sess-1.jsonl", "new_name": "kickoff" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["new_name"], "kickoff.jsonl");
    assert_eq!(f.logs.list().unwrap(), vec!["kickoff.jsonl".to_string()]);
}

#[tokio::test]
async fn test_meetings_default_to_configured_owner() {
    let f = fixture();
    let ours = f.meetings.create_meeting(OWNER, "Planejamento", "live").unwrap();
    f.meetings.create_meeting("Outra Equipe", "Vendas", "live").unwrap();
    f.meetings
        .add_message(ours.id, MessageRole::User, "vamos fechar o escopo", None)
        .unwrap();

    let (status, body) = get_json(&f, "/meetings").await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["meetings"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "Planejamento");

    let (_, body) = get_json(&f, "/meetings?owner=*").await;
    assert_eq!(body["meetings"].as_array().unwrap().len(), 2);

    let (status, body) = get_json(&f, &format!("/meetings/{}", ours.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meeting"]["status"], "open");
    assert!(body["archive"].is_null());

    let (status, body) = get_json(&f, &format!("/meetings/{}/messages", ours.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcript"], "user: vamos fechar o escopo");
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);

    let (status, body) = get_json(&f, "/meetings/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_speech_routes() {
    let f = fixture();

    let request = Request::post("/speech/transcribe")
        .body(Body::from(vec![1u8, 2, 3]))
        .unwrap();
    let (status, body) = send(&f, request).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["text"], "3 bytes ouvidos");

    let request = Request::post("/speech/transcribe").body(Body::empty()).unwrap();
    let (status, _) = send(&f, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&f, "/speech/synthesize", json!({ "text": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, audio) = post_json(&f, "/speech/synthesize", json!({ "text": "olá" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audio, "olá".as_bytes());
}
