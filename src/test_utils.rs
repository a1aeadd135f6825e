//! Shared test utilities.
//!
//! Common helpers for setting up in-memory test databases and building
//! decimals without ceremony.

use crate::{config, errors::Result};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a decimal literal.
///
/// # Panics
/// Panics on malformed input; only for tests.
#[allow(clippy::unwrap_used)]
pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}
