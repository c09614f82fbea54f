use crate::{app::ChatApp, state::AppState};
use axum::{extract::State, Json};

pub async fn health_check<A: ChatApp + 'static>(
    State(state): State<AppState<A>>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "app": state.app.name(),
        "sessions": state.sessions.len().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
