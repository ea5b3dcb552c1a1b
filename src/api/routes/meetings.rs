//! Meeting history routes.

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::meeting::transcript;
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Query parameters for the meeting list.
#[derive(Debug, Deserialize, Default)]
pub struct MeetingsQueryParams {
    /// Maximum results (default 20)
    pub limit: Option<usize>,
    /// Workspace owner; defaults to the configured owner, `*` for everyone
    pub owner: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meetings))
        .route("/:id", get(get_meeting))
        .route("/:id/messages", get(get_messages))
}

async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .map_err(ApiError::from)
}

/// GET /meetings - List meetings, newest first.
async fn list_meetings(
    Query(params): Query<MeetingsQueryParams>,
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    let limit = params.limit.unwrap_or(20);
    let owner = match params.owner {
        Some(owner) if owner == "*" => None,
        Some(owner) => Some(owner),
        None => Some(state.owner.clone()),
    };

    let store = state.meetings.clone();
    let meetings = blocking(move || store.list_meetings(owner.as_deref(), limit)).await?;

    Ok(Json(json!({ "meetings": meetings })))
}

/// GET /meetings/:id - One meeting plus its closing snapshot, if any.
async fn get_meeting(Path(id): Path<i64>, State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let store = state.meetings.clone();
    let (meeting, archive) = blocking(move || {
        let meeting = store.get_meeting(id)?;
        let archive = store.get_archive(id)?;
        Ok((meeting, archive))
    })
    .await?;

    let meeting = meeting.ok_or_else(|| ApiError::not_found(format!("Meeting {} not found", id)))?;
    Ok(Json(json!({ "meeting": meeting, "archive": archive })))
}

/// GET /meetings/:id/messages - Ordered messages and the derived transcript.
async fn get_messages(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    let store = state.meetings.clone();
    let (exists, messages) = blocking(move || {
        let exists = store.get_meeting(id)?.is_some();
        let messages = store.get_messages(id)?;
        Ok((exists, messages))
    })
    .await?;

    if !exists {
        return Err(ApiError::not_found(format!("Meeting {} not found", id)));
    }

    Ok(Json(json!({
        "meeting_id": id,
        "transcript": transcript(&messages),
        "messages": messages,
    })))
}
