//! Ledger entry entity - Immutable record of one balance change.
//!
//! Rows are append-only: never updated, never deleted. Corrections are new
//! offsetting entries. Each row snapshots `resulting_balance` so a wallet's
//! history can be replayed for audit.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Why a balance changed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum EntryReason {
    /// Customer side of a purchase
    #[sea_orm(string_value = "purchase_debit")]
    PurchaseDebit,
    /// Merchant side of a purchase
    #[sea_orm(string_value = "purchase_credit")]
    PurchaseCredit,
    /// Operator credit or debit outside any purchase
    #[sea_orm(string_value = "manual_adjustment")]
    ManualAdjustment,
}

/// Ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    /// Unique, monotonically assigned entry id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Wallet this entry applies to
    #[sea_orm(indexed)]
    pub wallet_id: i64,
    /// Signed amount applied to the wallet balance
    pub delta: Decimal,
    /// Why the balance changed
    pub reason: EntryReason,
    /// Purchase this entry belongs to, if any
    #[sea_orm(indexed)]
    pub related_transaction_id: Option<Uuid>,
    /// Balance immediately after `delta` was applied
    pub resulting_balance: Decimal,
    /// When the entry was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between LedgerEntry and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ledger entry belongs to one wallet
    #[sea_orm(
        belongs_to = "super::wallet::Entity",
        from = "Column::WalletId",
        to = "super::wallet::Column::Id"
    )]
    Wallet,
}

impl Related<super::wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
