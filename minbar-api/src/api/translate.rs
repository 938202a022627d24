//! Translation endpoint

use axum::Json;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::services::translate::{self, Translation};
use crate::ApiError;

/// Translation request
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(alias = "targetLanguage")]
    pub target_language: String,
    #[serde(default, alias = "sourceLanguage")]
    pub source_language: Option<String>,
}

/// POST /api/translate
pub async fn translate_text(
    Json(request): Json<TranslateRequest>,
) -> ApiResult<Json<Translation>> {
    if request.text.is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }
    if request.target_language.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "target_language must not be empty".to_string(),
        ));
    }

    Ok(Json(translate::translate(
        &request.text,
        &request.target_language,
        request.source_language.as_deref(),
    )))
}
