//! Audio upload storage
//!
//! Uploads land under `<public_dir>/audio/uploads` with fully
//! deterministic names; re-uploading the same (surah, reciter) pair
//! overwrites the prior file. No versioning, no explicit deletion.

use chrono::Utc;
use minbar_common::db::records::{self, UploadRecord};
use minbar_common::{ReciterId, Surah};
use sqlx::SqlitePool;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Upload directory relative to the public document root
pub const UPLOADS_SUBDIR: &str = "audio/uploads";

/// Upload store errors
#[derive(Debug, Error)]
pub enum UploadError {
    /// Rejected before any side effect
    #[error("Invalid upload: {0}")]
    Validation(String),

    /// Filesystem write failure
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Record persistence failure
    #[error("Database error: {0}")]
    Database(#[from] minbar_common::Error),
}

/// Filesystem-backed store for recitation uploads
pub struct UploadStore {
    public_dir: PathBuf,
}

impl UploadStore {
    pub fn new(public_dir: PathBuf) -> Self {
        Self { public_dir }
    }

    /// Absolute upload directory on disk
    pub fn upload_dir(&self) -> PathBuf {
        self.public_dir.join(UPLOADS_SUBDIR)
    }

    /// Deterministic filename for a (surah, reciter) pair
    pub fn filename(surah: Surah, reciter: &ReciterId) -> String {
        format!("surah_{}_{}.mp3", surah.padded(), reciter)
    }

    /// Validate and persist an uploaded recitation
    ///
    /// Validation happens before any side effect. Directory creation is
    /// idempotent and best-effort: a creation failure is logged and the
    /// write is still attempted, so only the write failure itself
    /// surfaces as a storage error.
    pub async fn store(
        &self,
        db: &SqlitePool,
        bytes: &[u8],
        content_type: Option<&str>,
        surah: Surah,
        reciter: &ReciterId,
    ) -> Result<UploadRecord, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Validation("uploaded file is empty".to_string()));
        }
        match content_type {
            Some(ct) if ct.starts_with("audio/") => {}
            Some(ct) => {
                return Err(UploadError::Validation(format!(
                    "expected an audio media type, got {:?}",
                    ct
                )))
            }
            None => {
                return Err(UploadError::Validation(
                    "uploaded file has no media type".to_string(),
                ))
            }
        }

        let dir = self.upload_dir();
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            warn!(dir = %dir.display(), error = %e, "Upload directory creation failed");
        }

        let filename = Self::filename(surah, reciter);
        let target = dir.join(&filename);
        tokio::fs::write(&target, bytes).await?;

        let record = UploadRecord {
            filename: filename.clone(),
            path: format!("/{}/{}", UPLOADS_SUBDIR, filename),
            surah: surah.get(),
            reciter: reciter.as_str().to_string(),
            size_bytes: bytes.len() as u64,
            uploaded_at: Utc::now(),
        };
        records::upsert_upload(db, &record).await?;

        info!(
            path = %record.path,
            size_bytes = record.size_bytes,
            "Stored recitation upload"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::resolver;

    #[test]
    fn test_filename_is_deterministic() {
        let surah = Surah::new(7).unwrap();
        let reciter = ReciterId::new("afasy").unwrap();
        assert_eq!(UploadStore::filename(surah, &reciter), "surah_007_afasy.mp3");
    }

    #[test]
    fn test_stored_path_matches_resolver_local_candidate() {
        // The first resolver candidate must point at what the store writes
        let surah = Surah::new(36).unwrap();
        let reciter = ReciterId::new("husary").unwrap();
        let stored = format!("/{}/{}", UPLOADS_SUBDIR, UploadStore::filename(surah, &reciter));
        assert_eq!(stored, resolver::local_upload_path(&reciter, surah));
    }
}
