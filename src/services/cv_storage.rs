use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Error, Result};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Stores uploaded CV files on local disk and opens them again for download.
#[derive(Debug, Clone)]
pub struct CvStorage {
    dir: PathBuf,
    max_bytes: usize,
}

/// A stored CV opened for streaming.
#[derive(Debug)]
pub struct StoredCv {
    pub file: fs::File,
    pub len: u64,
}

impl CvStorage {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Writes the file under a fresh name and returns the path to record on
    /// the candidate.
    pub async fn save(&self, original_name: Option<&str>, data: &[u8]) -> Result<String> {
        if data.len() > self.max_bytes {
            return Err(Error::FileTooLarge {
                limit: self.max_bytes,
            });
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(Error::UploadFailed)?;

        let file_path = self.dir.join(stored_file_name(original_name));
        fs::write(&file_path, data).await.map_err(|e| {
            tracing::error!(path = %file_path.display(), "Failed to write CV file: {}", e);
            Error::UploadFailed(e)
        })?;

        tracing::info!(path = %file_path.display(), bytes = data.len(), "Stored CV file");
        Ok(file_path.to_string_lossy().into_owned())
    }

    /// Opens a recorded CV path. Only regular files inside the uploads
    /// directory are served.
    pub async fn open(&self, cv_path: &str) -> Result<StoredCv> {
        let resolved = match fs::canonicalize(cv_path).await {
            Ok(path) => path,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFoundOnDisk)
            }
            Err(e) => return Err(Error::Io(e)),
        };
        let root = fs::canonicalize(&self.dir)
            .await
            .map_err(|_| Error::FileNotFoundOnDisk)?;
        if !resolved.starts_with(&root) {
            tracing::warn!(path = cv_path, "Refusing to serve CV outside the uploads directory");
            return Err(Error::FileNotFoundOnDisk);
        }

        let metadata = fs::metadata(&resolved).await?;
        if !metadata.is_file() {
            return Err(Error::FileNotFoundOnDisk);
        }
        let file = fs::File::open(&resolved).await?;
        Ok(StoredCv {
            file,
            len: metadata.len(),
        })
    }
}

/// `cv-<uuid><ext>`, keeping the uploaded file's extension (`.pdf` when it
/// has none).
pub fn stored_file_name(original_name: Option<&str>) -> String {
    let ext = original_name
        .map(Path::new)
        .and_then(Path::extension)
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("pdf");
    format!("cv-{}.{}", uuid::Uuid::new_v4(), ext)
}

/// Accepts `application/pdf`, ignoring case and any parameters.
pub fn is_pdf_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
}

/// `CV_<first>_<last>.pdf`, with characters that cannot sit inside a quoted
/// header value replaced by `_`.
pub fn download_file_name(first_name: &str, last_name: &str) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    };
    format!("CV_{}_{}.pdf", clean(first_name), clean(last_name))
}
