//! Payment intent endpoints
//!
//! Validation fails fast before the processor is contacted; processor
//! responses are relayed back with amounts in whole currency units.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::debug;

use minbar_common::auth::Session;
use minbar_common::db::records::{self, PaymentIntentRecord};

use crate::error::ApiResult;
use crate::services::payments::{self, IntentStatus};
use crate::{ApiError, AppState};

/// Intent creation request
#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    #[serde(alias = "userId")]
    pub user_id: String,
    pub plan: String,
    pub currency: String,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "creditcard".to_string()
}

/// POST /api/payments/intent
///
/// Session-gated by the router.
pub async fn create_intent(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateIntentRequest>,
) -> ApiResult<Json<PaymentIntentRecord>> {
    debug!(session_user = %session.user_id, plan = %request.plan, "Payment intent requested");

    if request.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("user_id must not be empty".to_string()));
    }
    if !payments::is_supported_method(&request.method) {
        return Err(ApiError::BadRequest(format!(
            "unsupported payment method {:?}",
            request.method
        )));
    }

    let record = state
        .payments
        .create_intent(
            &request.user_id,
            &request.plan,
            &request.currency,
            &request.method,
        )
        .await?;

    records::insert_intent(&state.db, &record).await?;

    Ok(Json(record))
}

/// GET /api/payments/intent/:id/status
///
/// Pure pass-through read from the processor; no local state mutation.
pub async fn intent_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<IntentStatus>> {
    let status = state.payments.intent_status(&id).await?;
    Ok(Json(status))
}
