//! Geolocation endpoint

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::services::geoip::GeoInfo;
use crate::AppState;

/// GET /api/geo
///
/// Always 200: lookup failures are masked with fixed defaults inside the
/// client.
pub async fn geolocate(State(state): State<AppState>, headers: HeaderMap) -> Json<GeoInfo> {
    let ip = client_ip(&headers);
    Json(state.geoip.lookup(ip.as_deref()).await)
}

/// Client IP from forwarding headers
///
/// `X-Forwarded-For` first hop, then `X-Real-IP`. Absent both, the caller
/// gets the fixed defaults without an upstream call.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        let first = forwarded
            .split(',')
            .next()
            .map(str::trim)
            .filter(|hop| !hop.is_empty());
        if let Some(ip) = first {
            return Some(ip.to_string());
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));
        assert_eq!(client_ip(&headers).as_deref(), Some("198.51.100.7"));
    }

    #[test]
    fn test_no_headers_means_no_ip() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn test_empty_header_values_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" "));
        assert_eq!(client_ip(&headers), None);
    }
}
