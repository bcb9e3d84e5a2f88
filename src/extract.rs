use axum::extract::FromRequest;

use crate::error::{Error, Result};
use crate::models::candidate::CandidateId;

/// `axum::Json` whose rejections use the API's JSON error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Path ids must be plain integers; `"12abc"` is rejected, not truncated.
pub fn parse_candidate_id(raw: &str) -> Result<CandidateId> {
    raw.parse::<CandidateId>().map_err(|_| Error::InvalidId)
}
