//! Conversation log routes.

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub old_name: Option<String>,
    pub new_name: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_logs))
        .route("/rename", post(rename_log))
        .route("/:name", get(get_log))
}

/// GET /logs - List log file names.
async fn list_logs(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let logs = state.logs.list()?;
    Ok(Json(json!({ "logs": logs })))
}

/// GET /logs/:name - Raw JSONL content.
async fn get_log(Path(name): Path<String>, State(state): State<AppState>) -> ApiResult<String> {
    Ok(state.logs.read(&name)?)
}

/// POST /logs/rename - Rename a log, adding `.jsonl` when missing.
async fn rename_log(
    State(state): State<AppState>,
    Json(request): Json<RenameRequest>,
) -> ApiResult<Json<Value>> {
    let (old_name, new_name) = match (request.old_name, request.new_name) {
        (Some(old), Some(new)) if !old.trim().is_empty() && !new.trim().is_empty() => (old, new),
        _ => {
            return Err(ApiError::bad_request(
                "old_name e new_name são obrigatórios",
            ))
        }
    };

    let new_name = state.logs.rename(&old_name, &new_name)?;
    Ok(Json(json!({ "ok": true, "new_name": new_name })))
}
