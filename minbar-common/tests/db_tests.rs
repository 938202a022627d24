//! Integration tests for database initialization and record queries

use chrono::{Duration, Utc};
use minbar_common::auth;
use minbar_common::db::records::{self, PaymentIntentRecord, UploadRecord};
use minbar_common::db::init_database;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test helper: fresh database in a temp directory
async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("minbar.db"))
        .await
        .expect("Should initialize database");
    (dir, pool)
}

#[tokio::test]
async fn test_init_creates_schema() {
    let (_dir, pool) = setup_db().await;

    let version: Option<(String,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = 'schema_version'")
            .fetch_optional(&pool)
            .await
            .unwrap();
    assert_eq!(version, Some(("1".to_string(),)));
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("minbar.db");

    let pool = init_database(&db_path).await.unwrap();
    drop(pool);

    // Re-opening an existing database must not fail or reset data
    let pool = init_database(&db_path).await.unwrap();
    sqlx::query("SELECT COUNT(*) FROM uploads")
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upload_upsert_and_get() {
    let (_dir, pool) = setup_db().await;

    let record = UploadRecord {
        filename: "surah_007_afasy.mp3".to_string(),
        path: "/audio/uploads/surah_007_afasy.mp3".to_string(),
        surah: 7,
        reciter: "afasy".to_string(),
        size_bytes: 1024,
        uploaded_at: Utc::now(),
    };
    records::upsert_upload(&pool, &record).await.unwrap();

    let fetched = records::get_upload(&pool, 7, "afasy").await.unwrap().unwrap();
    assert_eq!(fetched.filename, "surah_007_afasy.mp3");
    assert_eq!(fetched.size_bytes, 1024);

    assert!(records::get_upload(&pool, 8, "afasy").await.unwrap().is_none());
}

#[tokio::test]
async fn test_upload_reupload_replaces_row() {
    let (_dir, pool) = setup_db().await;

    let mut record = UploadRecord {
        filename: "surah_001_afasy.mp3".to_string(),
        path: "/audio/uploads/surah_001_afasy.mp3".to_string(),
        surah: 1,
        reciter: "afasy".to_string(),
        size_bytes: 100,
        uploaded_at: Utc::now(),
    };
    records::upsert_upload(&pool, &record).await.unwrap();

    record.size_bytes = 999;
    records::upsert_upload(&pool, &record).await.unwrap();

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM uploads")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);

    let fetched = records::get_upload(&pool, 1, "afasy").await.unwrap().unwrap();
    assert_eq!(fetched.size_bytes, 999);
}

#[tokio::test]
async fn test_intent_insert_and_get() {
    let (_dir, pool) = setup_db().await;

    let created = Utc::now();
    let record = PaymentIntentRecord {
        id: "pi_test_123".to_string(),
        user_id: "user-1".to_string(),
        plan: "basic".to_string(),
        amount: 49,
        currency: "SAR".to_string(),
        status: "initiated".to_string(),
        method: "card".to_string(),
        created_at: created,
        expires_at: created + Duration::hours(24),
    };
    records::insert_intent(&pool, &record).await.unwrap();

    let fetched = records::get_intent(&pool, "pi_test_123").await.unwrap().unwrap();
    assert_eq!(fetched.amount, 49);
    assert_eq!(fetched.currency, "SAR");
    // 24 hour expiry encoded at creation time
    assert_eq!(
        (fetched.expires_at - fetched.created_at).num_hours(),
        24
    );

    assert!(records::get_intent(&pool, "pi_missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_create_and_verify() {
    let (_dir, pool) = setup_db().await;

    let token = auth::create_session(&pool, "user-1", auth::ROLE_ADMIN, Duration::hours(1))
        .await
        .unwrap();

    let session = auth::verify_session(&pool, &token).await.unwrap().unwrap();
    assert_eq!(session.user_id, "user-1");
    assert!(session.is_admin());

    // Unknown token is rejected
    assert!(auth::verify_session(&pool, "bogus").await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_expiry() {
    let (_dir, pool) = setup_db().await;

    let token = auth::create_session(&pool, "user-2", auth::ROLE_STUDENT, Duration::seconds(-10))
        .await
        .unwrap();

    assert!(auth::verify_session(&pool, &token).await.unwrap().is_none());

    let purged = auth::purge_expired_sessions(&pool).await.unwrap();
    assert_eq!(purged, 1);
}

#[tokio::test]
async fn test_plaintext_token_never_stored() {
    let (_dir, pool) = setup_db().await;

    let token = auth::create_session(&pool, "user-3", auth::ROLE_STUDENT, Duration::hours(1))
        .await
        .unwrap();

    let row: Option<(String,)> =
        sqlx::query_as("SELECT token_digest FROM sessions WHERE token_digest = ?")
            .bind(&token)
            .fetch_optional(&pool)
            .await
            .unwrap();
    assert!(row.is_none(), "plaintext token must not appear in the table");
}
