//! Speech routes.

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/synthesize", post(synthesize))
}

/// POST /speech/transcribe - Raw audio body in, text out.
async fn transcribe(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    let text = state.stt.transcribe(body.to_vec()).await?;
    Ok(Json(json!({ "text": text })))
}

/// POST /speech/synthesize - Text in, MP3 audio out.
async fn synthesize(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> ApiResult<Response> {
    if request.text.trim().is_empty() {
        return Err(ApiError::bad_request("text is required"));
    }
    let audio = state.tts.synthesize(&request.text).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}
