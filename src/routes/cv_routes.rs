use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bytes::{Bytes, BytesMut};
use http::header;
use tokio_util::io::ReaderStream;

use crate::{
    dto::candidate_dto::CandidateEnvelope,
    error::{Error, Result},
    extract::parse_candidate_id,
    services::cv_storage::{download_file_name, is_pdf_content_type, PDF_CONTENT_TYPE},
    AppState,
};

/// Multipart field the CV file must be sent under.
pub const CV_FIELD: &str = "cv";

struct CvUpload {
    file_name: Option<String>,
    data: Bytes,
}

fn multipart_error(err: MultipartError, limit: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::FileTooLarge { limit }
    } else {
        Error::Multipart(err)
    }
}

/// Pulls the single `cv` file out of the form, enforcing type and size
/// before anything touches the disk.
async fn read_cv_field(multipart: &mut Multipart, limit: usize) -> Result<Option<CvUpload>> {
    let mut upload: Option<CvUpload> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(CV_FIELD) || field.file_name().is_none() {
            continue;
        }
        if upload.is_some() {
            return Err(Error::TooManyFiles);
        }
        if !is_pdf_content_type(field.content_type()) {
            tracing::info!(content_type = ?field.content_type(), "Rejected non-PDF CV upload");
            return Err(Error::UnsupportedFileType);
        }

        let file_name = field.file_name().map(str::to_string);
        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
            if data.len() + chunk.len() > limit {
                tracing::info!(limit, "Rejected oversized CV upload");
                return Err(Error::FileTooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }

        if !data.is_empty() {
            upload = Some(CvUpload {
                file_name,
                data: data.freeze(),
            });
        }
    }

    Ok(upload)
}

#[utoipa::path(
    post,
    path = "/api/candidates/upload-cv/{id}",
    tag = "cv",
    params(
        ("id" = i64, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "CV stored and attached", body = CandidateEnvelope),
        (status = 400, description = "Missing, non-PDF or oversized file"),
        (status = 404, description = "Candidate not found"),
        (status = 500, description = "File could not be written")
    )
)]
#[axum::debug_handler]
pub async fn upload_cv(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    let id = parse_candidate_id(&id)?;
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!("CV upload without a multipart body: {}", rejection);
        Error::MissingFile
    })?;

    let limit = state.cv_storage.max_bytes();
    let upload = read_cv_field(&mut multipart, limit)
        .await?
        .ok_or(Error::MissingFile)?;

    state.candidate_service.get_candidate(id).await?;

    let cv_path = state
        .cv_storage
        .save(upload.file_name.as_deref(), &upload.data)
        .await?;
    let candidate = state.candidate_service.attach_cv(id, cv_path).await?;

    tracing::info!(candidate_id = id, "CV uploaded");
    Ok(Json(CandidateEnvelope::new("CV uploaded successfully", candidate)))
}

#[utoipa::path(
    get,
    path = "/api/candidates/download-cv/{id}",
    tag = "cv",
    params(
        ("id" = i64, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "The candidate's CV as application/pdf"),
        (status = 404, description = "Candidate, CV or file not found")
    )
)]
#[axum::debug_handler]
pub async fn download_cv(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_candidate_id(&id)?;
    let candidate = state.candidate_service.get_candidate(id).await?;
    let cv_path = candidate.cv_path.as_deref().ok_or(Error::CvNotFound)?;

    let stored = state.cv_storage.open(cv_path).await.map_err(|e| {
        if matches!(e, Error::FileNotFoundOnDisk) {
            tracing::warn!(candidate_id = id, path = cv_path, "CV file missing on disk");
        }
        e
    })?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        download_file_name(&candidate.first_name, &candidate.last_name)
    );
    let body = Body::from_stream(ReaderStream::new(stored.file));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, stored.len.to_string()),
        ],
        body,
    ))
}
