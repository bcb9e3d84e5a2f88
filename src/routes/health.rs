use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{error::Result, AppState};

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let candidates = state.candidate_service.count().await?;
    let body = json!({
        "status": "ok",
        "candidates": candidates,
    });
    Ok((StatusCode::OK, Json(body)))
}
