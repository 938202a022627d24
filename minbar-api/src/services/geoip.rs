//! Geolocation lookup with fixed-default masking
//!
//! Forwards a client IP to the geolocation provider and normalizes the
//! response. Lookups never fail from the caller's perspective: any
//! upstream problem is masked by substituting fixed defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

const USER_AGENT: &str = concat!("Minbar/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Normalized geolocation projection, always fully populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoInfo {
    pub country_code: String,
    pub country: String,
    pub city: String,
    pub language: String,
    pub ip: String,
}

impl GeoInfo {
    /// Fixed defaults substituted on any lookup failure
    pub fn fallback() -> Self {
        Self {
            country_code: "US".to_string(),
            country: "Unknown".to_string(),
            city: "Unknown".to_string(),
            language: "en".to_string(),
            ip: "unknown".to_string(),
        }
    }
}

#[derive(Debug, Error)]
enum GeoError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error {0}")]
    Status(u16),

    #[error("Provider reported failure for {0}")]
    Failed(String),

    #[error("Malformed response: {0}")]
    Parse(String),
}

/// Provider response shape (ip-api style)
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    status: Option<String>,
    country: Option<String>,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    city: Option<String>,
}

/// Primary platform language per country (default "en")
fn language_for_country(code: &str) -> &'static str {
    match code {
        "SA" | "AE" | "KW" | "QA" | "BH" | "OM" | "JO" | "IQ" | "SY" | "LB" | "YE" | "EG"
        | "LY" | "SD" | "MA" | "DZ" | "TN" | "PS" => "ar",
        "FR" => "fr",
        "TR" => "tr",
        "ID" => "id",
        "MY" => "ms",
        "PK" => "ur",
        "BD" => "bn",
        "IR" => "fa",
        _ => "en",
    }
}

/// Geolocation provider client
pub struct GeoIpClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeoIpClient {
    pub fn new(base_url: String) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Look up a client IP; every failure masks to the fixed defaults
    pub async fn lookup(&self, client_ip: Option<&str>) -> GeoInfo {
        let Some(ip) = client_ip else {
            return GeoInfo::fallback();
        };

        match self.try_lookup(ip).await {
            Ok(info) => info,
            Err(e) => {
                warn!(ip = %ip, error = %e, "Geolocation lookup failed, using defaults");
                GeoInfo::fallback()
            }
        }
    }

    async fn try_lookup(&self, ip: &str) -> Result<GeoInfo, GeoError> {
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, ip))
            .send()
            .await
            .map_err(|e| GeoError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Status(status.as_u16()));
        }

        let body: ProviderResponse = response
            .json()
            .await
            .map_err(|e| GeoError::Parse(e.to_string()))?;

        if body.status.as_deref() == Some("fail") {
            return Err(GeoError::Failed(ip.to_string()));
        }

        let country_code = body
            .country_code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| GeoError::Parse("missing countryCode".to_string()))?;

        Ok(GeoInfo {
            language: language_for_country(&country_code).to_string(),
            country_code,
            country: body.country.unwrap_or_else(|| "Unknown".to_string()),
            city: body.city.unwrap_or_else(|| "Unknown".to_string()),
            ip: ip.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let info = GeoInfo::fallback();
        assert_eq!(info.country_code, "US");
        assert_eq!(info.country, "Unknown");
        assert_eq!(info.city, "Unknown");
        assert_eq!(info.language, "en");
        assert_eq!(info.ip, "unknown");
    }

    #[test]
    fn test_language_mapping() {
        assert_eq!(language_for_country("SA"), "ar");
        assert_eq!(language_for_country("EG"), "ar");
        assert_eq!(language_for_country("FR"), "fr");
        assert_eq!(language_for_country("PK"), "ur");
        assert_eq!(language_for_country("US"), "en");
        assert_eq!(language_for_country("ZZ"), "en");
    }

    #[tokio::test]
    async fn test_missing_ip_short_circuits_to_defaults() {
        // Unroutable base URL: a request would fail loudly, but no request
        // should even be attempted without an IP
        let client = GeoIpClient::new("http://127.0.0.1:1".to_string()).unwrap();
        assert_eq!(client.lookup(None).await, GeoInfo::fallback());
    }

    #[tokio::test]
    async fn test_upstream_failure_masks_to_defaults() {
        let client = GeoIpClient::new("http://127.0.0.1:1".to_string()).unwrap();
        assert_eq!(client.lookup(Some("8.8.8.8")).await, GeoInfo::fallback());
    }
}
