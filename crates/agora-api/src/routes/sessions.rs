use crate::{
    app::{ChatApp, Starter},
    error::{ApiError, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub starters: Vec<Starter>,
}

/// Open a new session; the response carries the id and the app's
/// conversation starters so the UI can render them right away.
pub async fn create_session<A: ChatApp + 'static>(
    State(state): State<AppState<A>>,
) -> ApiResult<Json<CreateSessionResponse>> {
    let session = state.app.on_session_start().await?;
    let session_id = state.sessions.insert(session).await;

    tracing::info!(%session_id, app = state.app.name(), "session created");

    Ok(Json(CreateSessionResponse {
        session_id,
        starters: state.app.starters(),
    }))
}

/// Conversation starters the app offers to new sessions.
pub async fn list_starters<A: ChatApp + 'static>(
    State(state): State<AppState<A>>,
) -> Json<Vec<Starter>> {
    Json(state.app.starters())
}

pub async fn delete_session<A: ChatApp + 'static>(
    State(state): State<AppState<A>>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusCode> {
    let session_id = parse_session_id(&session_id)?;

    if state.sessions.remove(&session_id).await {
        tracing::info!(%session_id, "session deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(session_id.to_string()))
    }
}

pub(crate) fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::from_str(raw).map_err(|_| ApiError::BadRequest("Invalid session ID format".to_string()))
}
