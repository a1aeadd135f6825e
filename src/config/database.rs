//! Database configuration module.
//!
//! Handles `SQLite` connection setup and table creation using `SeaORM`.
//! Schema statements are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database layout always matches
//! the Rust structs without hand-written SQL. The process entry point owns
//! the lifecycle: it calls [`init_db`] once and passes the handle down.

use crate::entities::{Item, LedgerEntry, Transaction, Wallet};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Gets the database URL from the environment or returns the default
/// `SQLite` path.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/tillbook.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the database at `url`.
pub async fn connect(url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at: {}", url);
    Database::connect(url).await.map_err(Into::into)
}

/// Creates all tables and secondary indexes from the entity definitions.
///
/// Idempotent: existing tables and indexes are left alone, so it is safe to
/// run against a database that was initialized by an earlier process.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut wallet_table = schema.create_table_from_entity(Wallet);
    let mut ledger_entry_table = schema.create_table_from_entity(LedgerEntry);
    let mut transaction_table = schema.create_table_from_entity(Transaction);
    let mut item_table = schema.create_table_from_entity(Item);

    db.execute(builder.build(wallet_table.if_not_exists()))
        .await?;
    db.execute(builder.build(ledger_entry_table.if_not_exists()))
        .await?;
    db.execute(builder.build(transaction_table.if_not_exists()))
        .await?;
    db.execute(builder.build(item_table.if_not_exists())).await?;

    create_indexes(db, &schema, Wallet).await?;
    create_indexes(db, &schema, LedgerEntry).await?;
    create_indexes(db, &schema, Transaction).await?;
    create_indexes(db, &schema, Item).await?;

    Ok(())
}

async fn create_indexes<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    for mut stmt in schema.create_index_from_entity(entity) {
        db.execute(builder.build(stmt.if_not_exists())).await?;
    }
    Ok(())
}

/// Connects to the database and ensures the schema exists.
///
/// This is the single entry point the host process calls during startup; the
/// returned handle is passed explicitly to every store and core function.
#[instrument]
pub async fn init_db(url: &str) -> Result<DatabaseConnection> {
    let db = connect(url).await?;
    info!("Database connection opened. Ensuring tables are created...");
    create_tables(&db).await?;
    Ok(db)
}
