//! minbar-api library — HTTP backend for the Minbar education platform
//!
//! Exposes the router and application state for the binary and for
//! integration tests.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use minbar_common::config::Config;

pub mod api;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use crate::services::geoip::GeoIpClient;
use crate::services::payments::PaymentClient;
use crate::services::resolver::HeadProbe;
use crate::services::uploads::UploadStore;

// Multipart audio uploads can be several MB; raise the default extractor cap.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Application state shared across HTTP handlers
///
/// External-service clients are built once at startup and reused for the
/// life of the process; no ambient module state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved service configuration
    pub config: Arc<Config>,
    /// Payment processor client
    pub payments: Arc<PaymentClient>,
    /// Geolocation provider client
    pub geoip: Arc<GeoIpClient>,
    /// Reachability probe for audio source resolution
    pub probe: Arc<HeadProbe>,
    /// Filesystem-backed upload store
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    /// Create application state, building the external-service clients
    pub fn new(db: SqlitePool, config: Config) -> minbar_common::Result<Self> {
        let payments = PaymentClient::new(
            config.payment_api_url.clone(),
            config.payment_api_key.clone(),
        )
        .map_err(|e| minbar_common::Error::Internal(format!("payment client: {}", e)))?;

        let geoip = GeoIpClient::new(config.geoip_api_url.clone())
            .map_err(|e| minbar_common::Error::Internal(format!("geoip client: {}", e)))?;

        let probe = HeadProbe::new()
            .map_err(|e| minbar_common::Error::Internal(format!("source probe: {}", e)))?;

        let uploads = UploadStore::new(config.public_dir.clone());

        Ok(Self {
            db,
            config: Arc::new(config),
            payments: Arc::new(payments),
            geoip: Arc::new(geoip),
            probe: Arc::new(probe),
            uploads: Arc::new(uploads),
        })
    }
}

/// Build application router
///
/// Route groups: admin-gated (upload), session-gated (payments), and
/// public (health, geo, translate, audio resolution, uploaded files).
pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/api/audio/upload", post(api::upload_recitation))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_admin,
        ));

    let session = Router::new()
        .route("/api/payments/intent", post(api::create_intent))
        .route("/api/payments/intent/:id/status", get(api::intent_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_session,
        ));

    let public = Router::new()
        .route("/api/geo", get(api::geolocate))
        .route("/api/translate", post(api::translate_text))
        .route("/api/audio/sources", get(api::list_sources))
        .route("/api/audio/recitation", get(api::recitation_redirect))
        .merge(api::health_routes());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(admin)
        .merge(session)
        .merge(public)
        .nest_service(
            "/audio/uploads",
            ServeDir::new(state.uploads.upload_dir()),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
