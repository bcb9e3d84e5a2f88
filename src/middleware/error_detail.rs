use std::sync::Arc;

use axum::{body::Body, extract::State, http::header, response::Response};
use serde_json::json;

use crate::{config::Config, error::InternalErrorDetail};

/// Adds the `detail` field to 5xx error bodies outside production. Status and
/// headers set by inner layers are kept.
pub async fn attach_internal_detail(
    State(config): State<Arc<Config>>,
    mut response: Response,
) -> Response {
    let Some(InternalErrorDetail {
        message,
        code,
        detail,
    }) = response.extensions_mut().remove::<InternalErrorDetail>()
    else {
        return response;
    };
    if config.is_production() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    let body = json!({ "message": message, "error": code, "detail": detail });
    Response::from_parts(parts, Body::from(body.to_string()))
}
