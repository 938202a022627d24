//! # Minbar Common Library
//!
//! Shared code for the Minbar backend services:
//! - Error types
//! - Configuration resolution
//! - Database schema and record queries
//! - Session verification
//! - Recitation domain types (surah numbers, reciter identifiers)

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod recitation;

pub use error::{Error, Result};
pub use recitation::{ReciterId, Surah};
