//! Wallet row access - creation, lookup, and soft deletion.
//!
//! Balances and versions are written exclusively by `entries::append`; the
//! only exception is the opening entry a funded wallet is born with, which is
//! recorded here so the ledger replays to the stored balance from day one.

use crate::{
    entities::{Wallet, ledger_entry, wallet},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::info;

/// Finds the active (non-deleted) wallet for an owner.
pub async fn get_by_owner<C>(conn: &C, owner_id: i64) -> Result<Option<wallet::Model>>
where
    C: ConnectionTrait,
{
    Wallet::find()
        .filter(wallet::Column::OwnerId.eq(owner_id))
        .filter(wallet::Column::IsDeleted.eq(false))
        .one(conn)
        .await
        .map_err(Into::into)
}

/// Finds an owner's wallet whether or not it has been closed.
///
/// Used by duplicate checks and audit, which must see closed wallets too.
pub(crate) async fn get_by_owner_any<C>(conn: &C, owner_id: i64) -> Result<Option<wallet::Model>>
where
    C: ConnectionTrait,
{
    Wallet::find()
        .filter(wallet::Column::OwnerId.eq(owner_id))
        .one(conn)
        .await
        .map_err(Into::into)
}

/// Creates a wallet for `owner_id` holding `initial_balance`.
///
/// A positive opening balance is recorded as a `manual_adjustment` ledger
/// entry in the same storage transaction, keeping the replay invariant intact
/// from the first row. Fails with [`Error::WalletAlreadyExists`] if the owner
/// already has a wallet, closed or not.
pub async fn create(
    db: &DatabaseConnection,
    owner_id: i64,
    initial_balance: Decimal,
) -> Result<wallet::Model> {
    if initial_balance < Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: initial_balance,
        });
    }

    let txn = db.begin().await?;

    if get_by_owner_any(&txn, owner_id).await?.is_some() {
        return Err(Error::WalletAlreadyExists { owner_id });
    }

    let wallet = wallet::ActiveModel {
        owner_id: Set(owner_id),
        balance: Set(initial_balance),
        version: Set(0),
        is_deleted: Set(false),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if initial_balance > Decimal::ZERO {
        ledger_entry::ActiveModel {
            wallet_id: Set(wallet.id),
            delta: Set(initial_balance),
            reason: Set(ledger_entry::EntryReason::ManualAdjustment),
            related_transaction_id: Set(None),
            resulting_balance: Set(initial_balance),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    info!(owner_id, wallet_id = wallet.id, "Created wallet");
    Ok(wallet)
}

/// Soft-deletes an owner's wallet, retaining the row and its ledger history.
pub async fn soft_delete(db: &DatabaseConnection, owner_id: i64) -> Result<wallet::Model> {
    let wallet = get_by_owner(db, owner_id)
        .await?
        .ok_or(Error::WalletNotFound { owner_id })?;

    let mut active: wallet::ActiveModel = wallet.into();
    active.is_deleted = Set(true);
    active.update(db).await.map_err(Into::into)
}
