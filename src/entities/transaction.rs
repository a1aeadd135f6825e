//! Transaction entity - Record of one completed purchase.
//!
//! The id is pre-allocated by the purchase orchestrator and doubles as an
//! idempotency key: a retried purchase with the same id finds this row and
//! writes nothing new. Exactly two ledger entries (customer debit, merchant
//! credit) carry it as their `related_transaction_id`.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Pre-allocated purchase id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Item that was purchased
    pub item_id: i64,
    /// Merchant whose wallet was credited
    #[sea_orm(indexed)]
    pub merchant_id: i64,
    /// Customer whose wallet was debited
    #[sea_orm(indexed)]
    pub customer_id: i64,
    /// Catalog price at the time of purchase
    pub price: Decimal,
    /// When the purchase completed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
