//! Record queries for uploads and payment intents
//!
//! Both are flat records: no cross-entity referential integrity is
//! enforced in-process.

use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A stored audio upload
///
/// Immutable once written; a re-upload of the same (surah, reciter) pair
/// replaces the row.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRecord {
    pub filename: String,
    pub path: String,
    pub surah: u16,
    pub reciter: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Insert or replace the upload record for a (surah, reciter) pair
pub async fn upsert_upload(db: &SqlitePool, record: &UploadRecord) -> Result<()> {
    sqlx::query(
        "INSERT OR REPLACE INTO uploads (surah, reciter, filename, path, size_bytes, uploaded_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(record.surah as i64)
    .bind(&record.reciter)
    .bind(&record.filename)
    .bind(&record.path)
    .bind(record.size_bytes as i64)
    .bind(record.uploaded_at.timestamp())
    .execute(db)
    .await?;
    Ok(())
}

/// Fetch the upload record for a (surah, reciter) pair, if any
pub async fn get_upload(
    db: &SqlitePool,
    surah: u16,
    reciter: &str,
) -> Result<Option<UploadRecord>> {
    let row: Option<(i64, String, String, String, i64, i64)> = sqlx::query_as(
        "SELECT surah, reciter, filename, path, size_bytes, uploaded_at \
         FROM uploads WHERE surah = ? AND reciter = ?",
    )
    .bind(surah as i64)
    .bind(reciter)
    .fetch_optional(db)
    .await?;

    Ok(row.map(
        |(surah, reciter, filename, path, size_bytes, uploaded_at)| UploadRecord {
            filename,
            path,
            surah: surah as u16,
            reciter,
            size_bytes: size_bytes as u64,
            uploaded_at: from_unix(uploaded_at),
        },
    ))
}

/// A stored payment intent
///
/// Status transitions happen at the processor, never locally. The expiry
/// policy (24 hours) is encoded at creation time; no scheduler enforces it.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntentRecord {
    pub id: String,
    pub user_id: String,
    pub plan: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub method: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Insert a newly created payment intent
pub async fn insert_intent(db: &SqlitePool, record: &PaymentIntentRecord) -> Result<()> {
    sqlx::query(
        "INSERT INTO payment_intents \
         (id, user_id, plan, amount, currency, status, method, created_at, expires_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(&record.plan)
    .bind(record.amount)
    .bind(&record.currency)
    .bind(&record.status)
    .bind(&record.method)
    .bind(record.created_at.timestamp())
    .bind(record.expires_at.timestamp())
    .execute(db)
    .await?;
    Ok(())
}

/// Fetch a stored payment intent by processor id
pub async fn get_intent(db: &SqlitePool, id: &str) -> Result<Option<PaymentIntentRecord>> {
    let row: Option<(String, String, String, i64, String, String, String, i64, i64)> =
        sqlx::query_as(
            "SELECT id, user_id, plan, amount, currency, status, method, created_at, expires_at \
             FROM payment_intents WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(row.map(
        |(id, user_id, plan, amount, currency, status, method, created_at, expires_at)| {
            PaymentIntentRecord {
                id,
                user_id,
                plan,
                amount,
                currency,
                status,
                method,
                created_at: from_unix(created_at),
                expires_at: from_unix(expires_at),
            }
        },
    ))
}
