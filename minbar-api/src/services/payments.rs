//! Payment processor adapter
//!
//! Translates a static price-table lookup into a create-payment call
//! against the processor and relays the response fields back, normalizing
//! the amount from minor units and uppercasing the currency. Charge
//! authorization itself is entirely the processor's business.

use chrono::{Duration, Utc};
use minbar_common::db::records::PaymentIntentRecord;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

const USER_AGENT: &str = concat!("Minbar/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Payment methods accepted by the processor integration
pub const PAYMENT_METHODS: [&str; 4] = ["creditcard", "mada", "stcpay", "applepay"];

/// Payment adapter errors
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Unrecognized (currency, plan) pair — never a default amount
    #[error("Unknown plan {plan:?} for currency {currency:?}")]
    UnknownPlan { currency: String, plan: String },

    /// Processor secret key not configured
    #[error("Payment processor credentials not configured")]
    MissingCredentials,

    /// Network error talking to the processor
    #[error("Network error: {0}")]
    Network(String),

    /// Processor rejected the request
    #[error("Processor error {0}: {1}")]
    Api(u16, String),

    /// Processor response did not parse
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Subscription price table: currency -> plan -> whole currency units
static PRICE_TABLE: Lazy<HashMap<&'static str, HashMap<&'static str, i64>>> = Lazy::new(|| {
    HashMap::from([
        (
            "SAR",
            HashMap::from([("basic", 49), ("premium", 99), ("family", 149)]),
        ),
        (
            "USD",
            HashMap::from([("basic", 13), ("premium", 26), ("family", 39)]),
        ),
        (
            "EUR",
            HashMap::from([("basic", 12), ("premium", 24), ("family", 36)]),
        ),
    ])
});

/// Resolve the price for a (currency, plan) pair
///
/// Currency matching is case-insensitive; the returned code is uppercased.
pub fn plan_price(currency: &str, plan: &str) -> Result<(String, i64), PaymentError> {
    let upper = currency.trim().to_uppercase();
    match PRICE_TABLE.get(upper.as_str()).and_then(|plans| plans.get(plan)) {
        Some(amount) => Ok((upper, *amount)),
        None => Err(PaymentError::UnknownPlan {
            currency: currency.to_string(),
            plan: plan.to_string(),
        }),
    }
}

/// Whether the method is one the processor integration supports
pub fn is_supported_method(method: &str) -> bool {
    PAYMENT_METHODS.contains(&method)
}

#[derive(Debug, Serialize)]
struct CreatePaymentRequest<'a> {
    /// Minor units (halalas, cents)
    amount: i64,
    currency: &'a str,
    description: String,
    source: PaymentSource<'a>,
    metadata: PaymentMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct PaymentSource<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Debug, Serialize)]
struct PaymentMetadata<'a> {
    user_id: &'a str,
    plan: &'a str,
    /// Client-side reference for reconciliation against processor records
    reference_id: Uuid,
}

/// Processor-side payment representation (amount in minor units)
#[derive(Debug, Deserialize)]
pub struct ProcessorPayment {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub source: Option<ProcessorSource>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessorSource {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Status projection relayed to callers
#[derive(Debug, Clone, Serialize)]
pub struct IntentStatus {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub method: Option<String>,
}

/// Payment processor API client
pub struct PaymentClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: Option<String>,
}

impl PaymentClient {
    pub fn new(base_url: String, secret_key: Option<String>) -> Result<Self, PaymentError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            secret_key,
        })
    }

    fn key(&self) -> Result<&str, PaymentError> {
        self.secret_key
            .as_deref()
            .ok_or(PaymentError::MissingCredentials)
    }

    /// Create a payment intent for a validated (currency, plan) price
    ///
    /// The 24 hour expiry is encoded here, at creation time; nothing in
    /// this system enforces it later.
    pub async fn create_intent(
        &self,
        user_id: &str,
        plan: &str,
        currency: &str,
        method: &str,
    ) -> Result<PaymentIntentRecord, PaymentError> {
        let (currency, amount) = plan_price(currency, plan)?;
        let key = self.key()?;

        let request = CreatePaymentRequest {
            amount: amount * 100,
            currency: &currency,
            description: format!("Minbar {} plan subscription", plan),
            source: PaymentSource { kind: method },
            metadata: PaymentMetadata {
                user_id,
                plan,
                reference_id: Uuid::new_v4(),
            },
        };

        debug!(plan = %plan, currency = %currency, amount = amount, "Creating payment intent");

        let response = self
            .http
            .post(format!("{}/payments", self.base_url))
            .basic_auth(key, None::<&str>)
            .json(&request)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api(status.as_u16(), body));
        }

        let payment: ProcessorPayment = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        let created_at = Utc::now();
        let record = PaymentIntentRecord {
            id: payment.id,
            user_id: user_id.to_string(),
            plan: plan.to_string(),
            amount: payment.amount / 100,
            currency: payment.currency.to_uppercase(),
            status: payment.status,
            method: method.to_string(),
            created_at,
            expires_at: created_at + Duration::hours(24),
        };

        info!(intent = %record.id, status = %record.status, "Payment intent created");
        Ok(record)
    }

    /// Pass-through status read by intent id; no local state mutation
    pub async fn intent_status(&self, id: &str) -> Result<IntentStatus, PaymentError> {
        let key = self.key()?;

        let response = self
            .http
            .get(format!("{}/payments/{}", self.base_url, id))
            .basic_auth(key, None::<&str>)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api(status.as_u16(), body));
        }

        let payment: ProcessorPayment = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        Ok(IntentStatus {
            id: payment.id,
            status: payment.status,
            amount: payment.amount / 100,
            currency: payment.currency.to_uppercase(),
            method: payment.source.and_then(|s| s.kind),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sar_basic_is_49() {
        let (currency, amount) = plan_price("SAR", "basic").unwrap();
        assert_eq!(currency, "SAR");
        assert_eq!(amount, 49);
    }

    #[test]
    fn test_currency_matching_is_case_insensitive() {
        let (currency, amount) = plan_price("sar", "premium").unwrap();
        assert_eq!(currency, "SAR");
        assert_eq!(amount, 99);
    }

    #[test]
    fn test_unknown_pair_is_an_error_not_a_default() {
        assert!(matches!(
            plan_price("SAR", "platinum"),
            Err(PaymentError::UnknownPlan { .. })
        ));
        assert!(matches!(
            plan_price("GBP", "basic"),
            Err(PaymentError::UnknownPlan { .. })
        ));
    }

    #[test]
    fn test_supported_methods() {
        assert!(is_supported_method("creditcard"));
        assert!(is_supported_method("mada"));
        assert!(!is_supported_method("barter"));
        assert!(!is_supported_method(""));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_any_request() {
        let client = PaymentClient::new("http://127.0.0.1:1".to_string(), None).unwrap();
        let result = client.create_intent("user-1", "basic", "SAR", "creditcard").await;
        assert!(matches!(result, Err(PaymentError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_plan_fails_before_any_request() {
        // Validation precedes the network call, so the unroutable base URL
        // is never contacted
        let client = PaymentClient::new(
            "http://127.0.0.1:1".to_string(),
            Some("sk_test".to_string()),
        )
        .unwrap();
        let result = client.create_intent("user-1", "gold", "SAR", "creditcard").await;
        assert!(matches!(result, Err(PaymentError::UnknownPlan { .. })));
    }
}
