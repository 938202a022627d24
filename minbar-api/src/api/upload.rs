//! Admin upload endpoint for recitation audio

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use minbar_common::{ReciterId, Surah};

use crate::error::ApiResult;
use crate::{ApiError, AppState};

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub file: UploadedFile,
}

#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub filename: String,
    pub path: String,
    pub surah: u16,
    pub reciter: String,
    pub size: u64,
}

/// POST /api/audio/upload
///
/// Multipart form: `file` (audio payload), `surah`, `reciter`.
/// Admin-gated by the router.
pub async fn upload_recitation(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut file: Option<(Vec<u8>, Option<String>)> = None;
    let mut surah_field: Option<String> = None;
    let mut reciter_field: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().map(|ct| ct.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read file: {}", e)))?;
                file = Some((bytes.to_vec(), content_type));
            }
            "surah" => {
                surah_field = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("failed to read surah field: {}", e))
                })?);
            }
            "reciter" => {
                reciter_field = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("failed to read reciter field: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let (bytes, content_type) =
        file.ok_or_else(|| ApiError::BadRequest("missing file field".to_string()))?;
    let surah: Surah = surah_field
        .ok_or_else(|| ApiError::BadRequest("missing surah field".to_string()))?
        .parse()
        .map_err(ApiError::Common)?;
    let reciter = ReciterId::new(
        &reciter_field.ok_or_else(|| ApiError::BadRequest("missing reciter field".to_string()))?,
    )
    .map_err(ApiError::Common)?;

    let record = state
        .uploads
        .store(&state.db, &bytes, content_type.as_deref(), surah, &reciter)
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        file: UploadedFile {
            filename: record.filename,
            path: record.path,
            surah: record.surah,
            reciter: record.reciter,
            size: record.size_bytes,
        },
    }))
}
