//! HTTP API handlers for minbar-api

pub mod audio;
pub mod auth;
pub mod geo;
pub mod health;
pub mod payments;
pub mod translate;
pub mod upload;

pub use audio::{list_sources, recitation_redirect};
pub use auth::{require_admin, require_session};
pub use geo::geolocate;
pub use health::health_routes;
pub use payments::{create_intent, intent_status};
pub use translate::translate_text;
pub use upload::upload_recitation;
