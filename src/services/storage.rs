//! Cover image storage on the local filesystem

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// File extensions accepted for cover uploads
const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

/// URL prefix under which stored covers are served
pub const COVERS_URL_PREFIX: &str = "/uploads";

/// An uploaded cover file, read out of a multipart form
#[derive(Debug, Clone)]
pub struct CoverUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Stores cover files under a single directory, naming them with fresh UUIDs.
#[derive(Clone)]
pub struct CoverStore {
    dir: PathBuf,
}

impl CoverStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Normalized extension of an uploaded filename. A missing extension is
    /// treated as `.jpg`; anything outside the allow-list is rejected.
    pub fn validate_extension(filename: &str) -> AppResult<String> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_else(|| ".jpg".to_string());

        if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(AppError::BadRequest(
                "cover must be .jpg/.jpeg/.png/.webp".to_string(),
            ))
        }
    }

    /// Write an uploaded cover to disk and return its public URL path
    pub async fn save(&self, upload: &CoverUpload) -> AppResult<String> {
        let ext = Self::validate_extension(&upload.filename)?;
        let filename = format!("{}{}", Uuid::new_v4(), ext);

        let dst = self.dir.join(&filename);
        fs::write(&dst, &upload.data)
            .await
            .map_err(|e| AppError::Internal(format!("failed to save cover: {}", e)))?;

        tracing::debug!("stored cover {} ({} bytes)", dst.display(), upload.data.len());

        Ok(format!("{}/{}", COVERS_URL_PREFIX, filename))
    }

    /// Remove a stored cover by its public URL path. A file that is already
    /// gone is not an error.
    pub async fn delete(&self, url: &str) {
        let name = url.rsplit('/').next().unwrap_or(url);
        if name.is_empty() {
            return;
        }

        let path = self.dir.join(name);
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to remove cover {}: {}", path.display(), e);
            }
        }
    }
}
