//! Wallet entity - Per-owner balance record.
//!
//! A wallet is created when its owner registers and is only ever mutated
//! through ledger appends. `version` is bumped on every balance change and
//! backs the optimistic concurrency checks in the store.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wallet database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    /// Unique identifier for the wallet
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Opaque identifier of the owning user, one wallet per owner
    #[sea_orm(unique)]
    pub owner_id: i64,
    /// Current balance; never negative
    pub balance: Decimal,
    /// Monotonic counter, incremented on every balance mutation
    pub version: i64,
    /// Soft delete flag - wallets with ledger history are retained for audit
    pub is_deleted: bool,
}

/// Defines relationships between Wallet and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One wallet has many ledger entries
    #[sea_orm(has_many = "super::ledger_entry::Entity")]
    LedgerEntries,
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
