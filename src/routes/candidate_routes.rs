use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::candidate_dto::{
        CandidateEnvelope, CreateCandidatePayload, MessageResponse, UpdateCandidatePayload,
    },
    error::{Error, Result},
    extract::{parse_candidate_id, ApiJson},
    models::candidate::CandidatePatch,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates",
    tag = "candidates",
    responses(
        (status = 200, description = "All candidates, newest first", body = [crate::models::candidate::Candidate])
    )
)]
#[axum::debug_handler]
pub async fn list_candidates(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let candidates = state.candidate_service.list_candidates().await?;
    Ok(Json(candidates))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    tag = "candidates",
    params(
        ("id" = i64, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate found", body = crate::models::candidate::Candidate),
        (status = 400, description = "Invalid candidate ID"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_candidate_id(&id)?;
    let candidate = state.candidate_service.get_candidate(id).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    post,
    path = "/api/candidates",
    tag = "candidates",
    request_body = CreateCandidatePayload,
    responses(
        (status = 201, description = "Candidate added", body = CandidateEnvelope),
        (status = 400, description = "Missing fields or malformed email/phone"),
        (status = 409, description = "Email already in use")
    )
)]
#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state
        .candidate_service
        .create_candidate(payload.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CandidateEnvelope::new("Candidate added successfully", candidate)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/candidates/{id}",
    tag = "candidates",
    params(
        ("id" = i64, Path, description = "Candidate ID")
    ),
    request_body = UpdateCandidatePayload,
    responses(
        (status = 200, description = "Candidate updated", body = CandidateEnvelope),
        (status = 400, description = "Invalid ID or payload"),
        (status = 404, description = "Candidate not found"),
        (status = 409, description = "Email already in use")
    )
)]
#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<ApiJson<UpdateCandidatePayload>, Error>,
) -> Result<impl IntoResponse> {
    let id = parse_candidate_id(&id)?;
    // An unknown id is reported before anything about the body.
    state.candidate_service.get_candidate(id).await?;

    let ApiJson(payload) = body?;
    payload.validate()?;

    let patch = CandidatePatch::from(payload);
    tracing::debug!(candidate_id = id, empty = patch.is_empty(), "Applying candidate patch");
    let candidate = state.candidate_service.update_candidate(id, patch).await?;
    Ok(Json(CandidateEnvelope::new(
        "Candidate updated successfully",
        candidate,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/candidates/{id}",
    tag = "candidates",
    params(
        ("id" = i64, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate deleted", body = MessageResponse),
        (status = 400, description = "Invalid candidate ID"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_candidate_id(&id)?;
    state.candidate_service.delete_candidate(id).await?;
    Ok(Json(MessageResponse {
        message: "Candidate deleted successfully".to_string(),
    }))
}
