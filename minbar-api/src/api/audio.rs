//! Audio recitation endpoints: candidate listing and playback redirect

use axum::{
    extract::{Host, Query, State},
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use minbar_common::db::records;
use minbar_common::{ReciterId, Surah};

use crate::error::ApiResult;
use crate::services::resolver;
use crate::{ApiError, AppState};

/// Query parameters shared by the recitation endpoints
#[derive(Debug, Deserialize)]
pub struct RecitationQuery {
    pub surah: String,

    #[serde(default = "default_reciter")]
    pub reciter: String,
}

fn default_reciter() -> String {
    "afasy".to_string()
}

impl RecitationQuery {
    fn parse(&self) -> ApiResult<(Surah, ReciterId)> {
        let surah: Surah = self.surah.parse().map_err(ApiError::Common)?;
        let reciter = ReciterId::new(&self.reciter).map_err(ApiError::Common)?;
        Ok((surah, reciter))
    }
}

/// Candidate listing response
#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub surah: u16,
    pub reciter: String,
    /// Whether a local upload exists for this pair
    pub uploaded: bool,
    /// Playback URLs in priority order (index 0 = highest)
    pub sources: Vec<String>,
}

/// GET /api/audio/sources
///
/// Returns the deterministic ordered candidate list without probing.
pub async fn list_sources(
    State(state): State<AppState>,
    Query(query): Query<RecitationQuery>,
) -> ApiResult<Json<SourcesResponse>> {
    let (surah, reciter) = query.parse()?;

    let sources = resolver::candidate_urls(&reciter, surah);
    let uploaded = records::get_upload(&state.db, surah.get(), reciter.as_str())
        .await?
        .is_some();

    Ok(Json(SourcesResponse {
        surah: surah.get(),
        reciter: reciter.as_str().to_string(),
        uploaded,
        sources,
    }))
}

/// GET /api/audio/recitation
///
/// Redirects to the first reachable source. Candidates are probed
/// strictly in order; if every one is unreachable the bilingual 503 is
/// returned and the caller surfaces the outage.
pub async fn recitation_redirect(
    State(state): State<AppState>,
    Host(host): Host,
    Query(query): Query<RecitationQuery>,
) -> ApiResult<Redirect> {
    let (surah, reciter) = query.parse()?;

    let candidates = resolver::candidate_urls(&reciter, surah);

    // Server-relative candidates (the local upload) are probed against
    // this host; the redirect keeps the relative form.
    let probe_targets: Vec<String> = candidates
        .iter()
        .map(|candidate| {
            if candidate.starts_with('/') {
                format!("http://{}{}", host, candidate)
            } else {
                candidate.clone()
            }
        })
        .collect();

    let timeout = Duration::from_millis(state.config.probe_timeout_ms);
    match resolver::resolve_reachable(state.probe.as_ref(), &probe_targets, timeout).await {
        Some(reachable) => {
            let index = probe_targets
                .iter()
                .position(|target| *target == reachable)
                .unwrap_or(0);
            Ok(Redirect::temporary(&candidates[index]))
        }
        None => Err(ApiError::AllSourcesUnreachable),
    }
}
