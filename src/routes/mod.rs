pub mod candidate_routes;
pub mod cv_routes;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{
    middleware::{
        cors::permissive_cors, error_detail::attach_internal_detail, panic::catch_panic,
    },
    AppState,
};

/// Room for multipart boundaries and any extra form fields on top of the
/// CV itself.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        candidate_routes::list_candidates,
        candidate_routes::get_candidate,
        candidate_routes::create_candidate,
        candidate_routes::update_candidate,
        candidate_routes::delete_candidate,
        cv_routes::upload_cv,
        cv_routes::download_cv,
    ),
    tags(
        (name = "candidates", description = "Candidate records"),
        (name = "cv", description = "CV upload and download")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found", "error": "NOT_FOUND" })),
    )
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.cv_storage.max_bytes() + MULTIPART_OVERHEAD_BYTES;
    let config = state.config.clone();

    let candidates_api = Router::new()
        .route(
            "/api/candidates",
            get(candidate_routes::list_candidates).post(candidate_routes::create_candidate),
        )
        .route(
            "/api/candidates/:id",
            get(candidate_routes::get_candidate)
                .put(candidate_routes::update_candidate)
                .delete(candidate_routes::delete_candidate),
        )
        .route(
            "/api/candidates/upload-cv/:id",
            post(cv_routes::upload_cv).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/candidates/download-cv/:id",
            get(cv_routes::download_cv),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .merge(candidates_api)
        .fallback(route_not_found)
        .with_state(state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(catch_panic())
        .layer(axum::middleware::map_response_with_state(
            config,
            attach_internal_detail,
        ))
}
