use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use candidate_tracker::{config::Config, routes::build_router, AppState};
use serde_json::{json, Value as JsonValue};
use std::path::Path;
use tower::ServiceExt;

const BOUNDARY: &str = "X-CANDIDATE-TRACKER-BOUNDARY";
const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n%%EOF\n";

fn setup_app() -> (Router, tempfile::TempDir) {
    let uploads = tempfile::tempdir().expect("tempdir");
    let config = Config {
        uploads_dir: uploads.path().to_path_buf(),
        ..Config::default()
    };
    (build_router(AppState::new(config)), uploads)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_john(app: &Router) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/candidates")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "firstName": "John", "lastName": "Doe", "email": "john.doe@example.com" })
                .to_string(),
        ))
        .unwrap();
    let (status, _) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED);
}

/// One file part per entry: (field name, file name, content type, bytes).
fn multipart_body(parts: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, content_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(id: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/candidates/upload-cv/{id}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test]
async fn upload_then_download_round_trip() {
    let (app, uploads) = setup_app();
    create_john(&app).await;

    let body = multipart_body(&[("cv", "resume.pdf", "application/pdf", PDF_BYTES)]);
    let (status, body) = send(&app, upload_request("1", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "CV uploaded successfully");

    let cv_path = body["candidate"]["cvPath"].as_str().unwrap().to_string();
    let file_name = Path::new(&cv_path).file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("cv-"));
    assert!(file_name.ends_with(".pdf"));
    assert_eq!(std::fs::read(&cv_path).unwrap(), PDF_BYTES);
    assert_eq!(file_count(uploads.path()), 1);

    let resp = app
        .clone()
        .oneshot(get("/api/candidates/download-cv/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"CV_John_Doe.pdf\""
    );
    assert_eq!(
        resp.headers()[header::CONTENT_LENGTH],
        PDF_BYTES.len().to_string().as_str()
    );
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    assert_eq!(&bytes[..], PDF_BYTES);
}

#[tokio::test]
async fn replacing_a_cv_points_at_the_new_file() {
    let (app, _uploads) = setup_app();
    create_john(&app).await;

    let first = multipart_body(&[("cv", "a.pdf", "application/pdf", PDF_BYTES)]);
    let (_, first) = send(&app, upload_request("1", first)).await;
    let second = multipart_body(&[("cv", "b.pdf", "application/pdf", b"%PDF-1.7 second")]);
    let (status, second) = send(&app, upload_request("1", second)).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(first["candidate"]["cvPath"], second["candidate"]["cvPath"]);

    let resp = app
        .clone()
        .oneshot(get("/api/candidates/download-cv/1"))
        .await
        .unwrap();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.7 second");
}

#[tokio::test]
async fn non_pdf_upload_is_rejected_without_side_effects() {
    let (app, uploads) = setup_app();
    create_john(&app).await;

    let body = multipart_body(&[("cv", "photo.png", "image/png", b"\x89PNG....")]);
    let (status, body) = send(&app, upload_request("1", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "UNSUPPORTED_FILE_TYPE");
    assert_eq!(body["message"], "Only PDF files are allowed for CV uploads");

    let (_, candidate) = send(&app, get("/api/candidates/1")).await;
    assert!(candidate.get("cvPath").is_none());
    assert_eq!(file_count(uploads.path()), 0);
}

#[tokio::test]
async fn oversized_upload_is_rejected_without_side_effects() {
    let (app, uploads) = setup_app();
    create_john(&app).await;

    let big = vec![b'a'; 6 * 1024 * 1024];
    let body = multipart_body(&[("cv", "huge.pdf", "application/pdf", &big)]);
    let (status, body) = send(&app, upload_request("1", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "FILE_TOO_LARGE");

    let (_, candidate) = send(&app, get("/api/candidates/1")).await;
    assert!(candidate.get("cvPath").is_none());
    assert_eq!(file_count(uploads.path()), 0);
}

#[tokio::test]
async fn missing_and_duplicate_files() {
    let (app, _uploads) = setup_app();
    create_john(&app).await;

    let wrong_field = multipart_body(&[("resume", "cv.pdf", "application/pdf", PDF_BYTES)]);
    let (status, body) = send(&app, upload_request("1", wrong_field)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_FILE");
    assert_eq!(body["message"], "No file uploaded");

    let not_multipart = Request::builder()
        .method("POST")
        .uri("/api/candidates/upload-cv/1")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(&app, not_multipart).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_FILE");

    let two = multipart_body(&[
        ("cv", "a.pdf", "application/pdf", PDF_BYTES),
        ("cv", "b.pdf", "application/pdf", PDF_BYTES),
    ]);
    let (status, body) = send(&app, upload_request("1", two)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "TOO_MANY_FILES");
}

#[tokio::test]
async fn upload_for_unknown_candidate_writes_nothing() {
    let (app, uploads) = setup_app();

    let body = multipart_body(&[("cv", "cv.pdf", "application/pdf", PDF_BYTES)]);
    let (status, body) = send(&app, upload_request("9999", body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "CANDIDATE_NOT_FOUND");
    assert_eq!(file_count(uploads.path()), 0);

    let body = multipart_body(&[("cv", "cv.pdf", "application/pdf", PDF_BYTES)]);
    let (status, body) = send(&app, upload_request("abc", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ID");
}

#[tokio::test]
async fn download_errors() {
    let (app, _uploads) = setup_app();
    create_john(&app).await;

    let (status, body) = send(&app, get("/api/candidates/download-cv/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "CANDIDATE_NOT_FOUND");

    let (status, body) = send(&app, get("/api/candidates/download-cv/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "CV_NOT_FOUND");
    assert_eq!(body["message"], "CV not found for this candidate");

    let upload = multipart_body(&[("cv", "cv.pdf", "application/pdf", PDF_BYTES)]);
    let (_, body) = send(&app, upload_request("1", upload)).await;
    std::fs::remove_file(body["candidate"]["cvPath"].as_str().unwrap()).unwrap();

    let (status, body) = send(&app, get("/api/candidates/download-cv/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "FILE_NOT_FOUND");
    assert_eq!(body["message"], "CV file not found on server");
}

#[tokio::test]
async fn size_limit_is_inclusive() {
    let (app, uploads) = setup_app();
    create_john(&app).await;
    let limit = Config::default().max_cv_size_bytes;

    let over = vec![b'a'; limit + 1];
    let body = multipart_body(&[("cv", "over.pdf", "application/pdf", &over)]);
    let (status, body) = send(&app, upload_request("1", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "FILE_TOO_LARGE");
    assert_eq!(file_count(uploads.path()), 0);

    let exact = vec![b'a'; limit];
    let body = multipart_body(&[("cv", "exact.pdf", "application/pdf", &exact)]);
    let (status, body) = send(&app, upload_request("1", body)).await;
    assert_eq!(status, StatusCode::OK);
    let cv_path = body["candidate"]["cvPath"].as_str().unwrap();
    assert_eq!(std::fs::metadata(cv_path).unwrap().len(), limit as u64);
}

/// App whose uploads "directory" is a regular file, so every write fails.
fn unwritable_app(environment: &str) -> (Router, tempfile::NamedTempFile) {
    let blocker = tempfile::NamedTempFile::new().expect("tempfile");
    let config = Config {
        uploads_dir: blocker.path().to_path_buf(),
        environment: environment.to_string(),
        ..Config::default()
    };
    (build_router(AppState::new(config)), blocker)
}

#[tokio::test]
async fn failed_write_is_an_upload_error_with_detail_outside_production() {
    let (app, _blocker) = unwritable_app("development");
    create_john(&app).await;

    let body = multipart_body(&[("cv", "cv.pdf", "application/pdf", PDF_BYTES)]);
    let (status, body) = send(&app, upload_request("1", body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "UPLOAD_ERROR");
    assert_eq!(body["message"], "Failed to upload CV");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Failed to store CV file"));

    let (_, candidate) = send(&app, get("/api/candidates/1")).await;
    assert!(candidate.get("cvPath").is_none());
}

#[tokio::test]
async fn production_hides_internal_error_detail() {
    let (app, _blocker) = unwritable_app("production");
    create_john(&app).await;

    let req = upload_request(
        "1",
        multipart_body(&[("cv", "cv.pdf", "application/pdf", PDF_BYTES)]),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");

    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "message": "Failed to upload CV", "error": "UPLOAD_ERROR" }));
}
