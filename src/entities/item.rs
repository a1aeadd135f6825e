//! Item entity - A catalog listing owned by a merchant.
//!
//! Backs the database-backed `ItemCatalog` implementation. Delisted items are
//! soft-deleted so past transactions keep a valid reference.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Merchant offering the item
    #[sea_orm(indexed)]
    pub merchant_id: i64,
    /// Display name of the item
    pub name: String,
    /// Current asking price
    pub price: Decimal,
    /// Soft delete flag - delisted items are hidden from the catalog
    pub is_delisted: bool,
    /// When the item was listed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Item and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
