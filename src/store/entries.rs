//! Ledger entry persistence - the version-checked append batch plus the
//! read-side history and replay queries.
//!
//! `append` is the only code path that changes a wallet's balance. It is
//! crate-private on purpose: the ledger service in `core::ledger` is its sole
//! caller and always wraps it in a storage transaction, so a rejected batch
//! leaves no partial effect.

use crate::{
    entities::{LedgerEntry, Wallet, ledger_entry, wallet},
    errors::{Error, Result},
    paging::{self, Page, PageRequest},
};
use rust_decimal::Decimal;
use sea_orm::{PaginatorTrait, QueryOrder, Set, sea_query::Expr, prelude::*};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One balance change to be appended, before it has an id or a snapshot.
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// Wallet the delta applies to
    pub wallet_id: i64,
    /// Signed amount to apply
    pub delta: Decimal,
    /// Why the balance is changing
    pub reason: ledger_entry::EntryReason,
    /// Purchase this entry belongs to, if any
    pub related_transaction_id: Option<Uuid>,
}

/// Atomically appends a batch of ledger entries and folds their deltas into
/// the affected wallets, bumping each wallet's version.
///
/// Every entry's wallet must come with an expected version; if any stored
/// version differs, the whole batch fails with [`Error::VersionConflict`] and
/// nothing is applied (the caller's transaction rolls back). Wallets are
/// processed in ascending wallet-id order so concurrent multi-wallet batches
/// cannot deadlock each other.
///
/// Must run inside the caller's storage transaction.
pub(crate) async fn append<C>(
    conn: &C,
    batch: &[NewEntry],
    expected_versions: &[(i64, i64)],
) -> Result<Vec<ledger_entry::Model>>
where
    C: ConnectionTrait,
{
    if batch.is_empty() {
        return Err(Error::Config {
            message: "ledger batch is empty".to_string(),
        });
    }

    // BTreeMap keys give the deterministic ascending wallet-id order
    let mut checks: BTreeMap<i64, i64> = BTreeMap::new();
    for (wallet_id, version) in expected_versions {
        if checks.insert(*wallet_id, *version).is_some() {
            return Err(Error::Config {
                message: format!("duplicate expected version for wallet {wallet_id}"),
            });
        }
    }
    let touched: BTreeSet<i64> = batch.iter().map(|entry| entry.wallet_id).collect();
    for wallet_id in &touched {
        if !checks.contains_key(wallet_id) {
            return Err(Error::Config {
                message: format!("no expected version for wallet {wallet_id}"),
            });
        }
    }
    if checks.len() != touched.len() {
        return Err(Error::Config {
            message: "expected version supplied for a wallet with no entries".to_string(),
        });
    }

    let mut balances: BTreeMap<i64, Decimal> = BTreeMap::new();
    for (&wallet_id, &expected) in &checks {
        match Wallet::find_by_id(wallet_id).one(conn).await? {
            Some(stored) if stored.version == expected => {
                balances.insert(wallet_id, stored.balance);
            }
            // A changed or vanished row reads as staleness either way; the
            // caller's retry re-resolves the wallet and reports what it finds.
            Some(stored) => {
                debug!(
                    wallet_id,
                    expected,
                    stored = stored.version,
                    "Stale wallet version, rejecting batch"
                );
                return Err(Error::VersionConflict { wallet_id });
            }
            None => return Err(Error::VersionConflict { wallet_id }),
        }
    }

    let now = chrono::Utc::now();
    let mut inserted = Vec::with_capacity(batch.len());
    for entry in batch {
        let balance = balances
            .get_mut(&entry.wallet_id)
            .ok_or_else(|| Error::Config {
                message: format!("no balance tracked for wallet {}", entry.wallet_id),
            })?;
        *balance += entry.delta;
        let resulting = *balance;

        let model = ledger_entry::ActiveModel {
            wallet_id: Set(entry.wallet_id),
            delta: Set(entry.delta),
            reason: Set(entry.reason),
            related_transaction_id: Set(entry.related_transaction_id),
            resulting_balance: Set(resulting),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        inserted.push(model);
    }

    for (&wallet_id, &expected) in &checks {
        let update = Wallet::update_many()
            .col_expr(wallet::Column::Balance, Expr::value(balances[&wallet_id]))
            .col_expr(
                wallet::Column::Version,
                Expr::col(wallet::Column::Version).add(1),
            )
            .filter(wallet::Column::Id.eq(wallet_id))
            .filter(wallet::Column::Version.eq(expected))
            .exec(conn)
            .await?;
        if update.rows_affected != 1 {
            return Err(Error::VersionConflict { wallet_id });
        }
    }

    Ok(inserted)
}

/// Pages through a wallet's ledger history, newest entries first.
pub async fn for_wallet(
    db: &DatabaseConnection,
    wallet_id: i64,
    request: PageRequest,
) -> Result<Page<ledger_entry::Model>> {
    let paginator = LedgerEntry::find()
        .filter(ledger_entry::Column::WalletId.eq(wallet_id))
        .order_by_desc(ledger_entry::Column::Id)
        .paginate(db, request.limit());
    paging::fetch_page(paginator, request).await
}

/// Fetches the entries recorded for one purchase, in append order.
pub async fn for_transaction(
    db: &DatabaseConnection,
    transaction_id: Uuid,
) -> Result<Vec<ledger_entry::Model>> {
    LedgerEntry::find()
        .filter(ledger_entry::Column::RelatedTransactionId.eq(transaction_id))
        .order_by_asc(ledger_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Recomputes a wallet's balance by summing every delta ever appended to it.
pub async fn replay_balance(db: &DatabaseConnection, wallet_id: i64) -> Result<Decimal> {
    let entries = LedgerEntry::find()
        .filter(ledger_entry::Column::WalletId.eq(wallet_id))
        .all(db)
        .await?;
    Ok(entries
        .iter()
        .fold(Decimal::ZERO, |total, entry| total + entry.delta))
}
